use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "line-sharder")]
#[command(about = "Split a text file into deduplicated, sorted shards by line prefix", long_about = None)]
pub struct Cli {
    /// Input text file, one entry per line
    pub input: PathBuf,

    /// Number of worker threads (defaults to the number of CPUs)
    #[arg(short = 'j', long)]
    pub workers: Option<usize>,

    /// Directory in which the shard tree is created
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Optional TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}
