use super::aggregate::Outcome;
use crate::error::FlushError;
use crate::partition::WorkItem;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use tracing::{debug, warn};

/// Sort and write a single bucket, overwriting any previous shard file.
///
/// Never fails outright: every error is folded into the returned outcome so
/// the rest of the pool keeps going.
pub fn persist(item: WorkItem) -> Outcome {
    let WorkItem {
        dir_path,
        file_path,
        mut lines,
    } = item;

    if let Err(source) = fs::create_dir_all(&dir_path) {
        let error = FlushError::CreateDir {
            path: dir_path,
            source,
        };
        warn!("{}", error);
        return Outcome::Failed {
            path: file_path,
            error,
        };
    }

    // Lines are unique within a bucket, so an unstable sort is exact.
    lines.sort_unstable();

    let file = match File::create(&file_path) {
        Ok(file) => file,
        Err(source) => {
            let error = FlushError::CreateFile {
                path: file_path.clone(),
                source,
            };
            warn!("{}", error);
            return Outcome::Failed {
                path: file_path,
                error,
            };
        }
    };

    if let Err(source) = write_lines(file, &lines) {
        let error = FlushError::Write {
            path: file_path.clone(),
            source,
        };
        warn!("{}", error);
        return Outcome::Failed {
            path: file_path,
            error,
        };
    }

    debug!("Wrote {} lines to {}", lines.len(), file_path.display());
    Outcome::Written {
        path: file_path,
        count: lines.len(),
    }
}

fn write_lines(file: File, lines: &[String]) -> io::Result<()> {
    let mut writer = BufWriter::new(file);
    for line in lines {
        writer.write_all(line.as_bytes())?;
        writer.write_all(b"\n")?;
    }
    writer.flush()
}
