use config::{Config, ConfigError, File as ConfigFile};
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const DEFAULT_EXTENSION: &str = "txt";

#[derive(Debug, Clone, Deserialize)]
pub struct ShardConfig {
    /// Worker threads for the flush phase. `None` or `0` means one per logical CPU.
    #[serde(default)]
    pub workers: Option<usize>,
    /// Parent of the shard tree. Defaults to the current directory.
    #[serde(default)]
    pub output_dir: Option<PathBuf>,
    /// Extension appended to every shard file name.
    #[serde(default = "default_extension")]
    pub extension: String,
}

fn default_extension() -> String {
    DEFAULT_EXTENSION.to_string()
}

impl Default for ShardConfig {
    fn default() -> Self {
        Self {
            workers: None,
            output_dir: None,
            extension: default_extension(),
        }
    }
}

impl ShardConfig {
    pub fn worker_count(&self) -> usize {
        match self.workers {
            Some(n) if n > 0 => n,
            _ => num_cpus::get(),
        }
    }

    /// Shard file name for a two-character stem, e.g. `ab` -> `ab.txt`.
    pub fn file_name(&self, stem: &str) -> String {
        let ext = self.extension.trim_start_matches('.');
        if ext.is_empty() {
            stem.to_string()
        } else {
            format!("{}.{}", stem, ext)
        }
    }
}

/// Build the configuration from built-in defaults, optionally layered with a
/// TOML file. No file is consulted unless one is named explicitly.
pub fn load_configuration(path: Option<&Path>) -> Result<ShardConfig, ConfigError> {
    let mut builder = Config::builder().set_default("extension", DEFAULT_EXTENSION)?;
    if let Some(path) = path {
        builder = builder.add_source(ConfigFile::from(path).required(true));
    }
    builder.build()?.try_deserialize::<ShardConfig>()
}

/// Name of the shard root: the input's file name with its extension stripped.
pub fn root_name(input: &Path) -> Option<String> {
    input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .filter(|s| !s.is_empty())
}
