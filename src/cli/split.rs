use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use rand::rngs::OsRng;

use crate::error::{HorcruxError, Result};
use crate::shard::EXTENSION;
use crate::split::{split_stream, SplitOptions, StreamSummary};

/// Outcome of a file split: where the shards went and how many bytes moved.
#[derive(Debug)]
pub struct SplitFileReport {
    pub paths: Vec<PathBuf>,
    pub original_size: u64,
    pub total_size: u64,
}

/// Split a file on disk into shard files in `output_dir`, streaming the
/// payload rather than buffering it. A failed split removes whatever shard
/// files it had already created, so no half-written shard survives.
pub fn split_file(
    input: &Path,
    output_dir: &Path,
    options: &SplitOptions,
) -> Result<SplitFileReport> {
    options.validate()?;
    if !input.is_file() {
        return Err(HorcruxError::NotAFile(input.to_path_buf()));
    }
    let filename = input
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| HorcruxError::NotAFile(input.to_path_buf()))?;

    fs::create_dir_all(output_dir)?;
    let paths: Vec<PathBuf> = (1..=options.total)
        .map(|index| {
            output_dir.join(format!(
                "{}.{}_{}.{}",
                filename, index, options.total, EXTENSION
            ))
        })
        .collect();

    match write_shards(input, filename, options, &paths) {
        Ok(summary) => Ok(SplitFileReport {
            paths,
            original_size: summary.original_size,
            total_size: summary.total_size,
        }),
        Err(error) => {
            for path in &paths {
                let _ = fs::remove_file(path);
            }
            Err(error)
        }
    }
}

fn write_shards(
    input: &Path,
    filename: &str,
    options: &SplitOptions,
    paths: &[PathBuf],
) -> Result<StreamSummary> {
    let mut reader = BufReader::new(File::open(input)?);
    let mut sinks = paths
        .iter()
        .map(|path| File::create(path).map(BufWriter::new))
        .collect::<io::Result<Vec<_>>>()?;

    let summary = split_stream(&mut reader, filename, options, &mut sinks, &mut OsRng)?;

    for sink in &mut sinks {
        sink.flush()?;
    }
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discover::auto_bind;
    use tempfile::tempdir;

    #[test]
    fn test_split_file_creates_named_shards() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("secret note.txt");
        let shards = dir.path().join("shards");
        fs::write(&input, b"the chamber is under the lake").unwrap();

        let options = SplitOptions {
            total: 5,
            threshold: 3,
        };
        let report = split_file(&input, &shards, &options).unwrap();

        assert_eq!(report.original_size, 29);
        assert_eq!(report.total_size, 29 * 5);
        assert_eq!(report.paths.len(), 5);
        assert!(report.paths[0].ends_with("secret note.txt.1_5.horcrux"));
        assert!(report.paths.iter().all(|path| path.exists()));
    }

    #[test]
    fn test_split_file_binds_back() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("payload.bin");
        let shards = dir.path().join("shards");
        let data: Vec<u8> = (0..4096u32).map(|i| (i % 256) as u8).collect();
        fs::write(&input, &data).unwrap();

        let options = SplitOptions {
            total: 4,
            threshold: 4,
        };
        split_file(&input, &shards, &options).unwrap();

        let result = auto_bind(&shards).unwrap();
        assert_eq!(result.data, data);
        assert_eq!(result.filename, "payload.bin");
    }

    #[test]
    fn test_missing_input_is_not_a_file() {
        let dir = tempdir().unwrap();
        let options = SplitOptions {
            total: 3,
            threshold: 2,
        };
        let result = split_file(&dir.path().join("absent"), dir.path(), &options);
        assert!(matches!(result, Err(HorcruxError::NotAFile(_))));

        // A directory is not splittable either
        let result = split_file(dir.path(), dir.path(), &options);
        assert!(matches!(result, Err(HorcruxError::NotAFile(_))));
    }

    #[test]
    fn test_failed_split_leaves_no_shards() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("empty.bin");
        let shards = dir.path().join("shards");
        fs::write(&input, b"").unwrap();

        let options = SplitOptions {
            total: 3,
            threshold: 2,
        };
        let result = split_file(&input, &shards, &options);
        assert!(matches!(result, Err(HorcruxError::EmptySecret)));

        let leftovers: Vec<_> = fs::read_dir(&shards).unwrap().collect();
        assert!(leftovers.is_empty(), "partial shards left behind");
    }
}
