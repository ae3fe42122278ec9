use std::path::Path;

use crate::error::Result;
use crate::shard::read_horcrux_file;

/// Display information about a horcrux file
pub fn show_info(path: &Path) -> Result<String> {
    let horcrux = read_horcrux_file(path)?;
    let header = &horcrux.header;

    let mode = if header.is_multiplexed() {
        "multiplexed (each horcrux holds a stripe of the payload)"
    } else {
        "replicated (each horcrux holds the full payload)"
    };

    let mut output = String::new();
    output.push_str("Horcrux Shard Information\n");
    output.push_str("=========================\n\n");
    output.push_str(&format!("File: {}\n", path.display()));
    output.push_str(&format!("Original file: {}\n", header.original_filename));
    output.push_str(&format!("Split run: {}\n", header.timestamp));
    output.push_str(&format!(
        "Shard: {} of {} (any {} resurrect the original)\n",
        header.index, header.total, header.threshold
    ));
    output.push_str(&format!("Mode: {}\n", mode));
    output.push_str(&format!("Version: {}\n", header.version));
    output.push_str(&format!(
        "Body: {}\n",
        format_size(horcrux.content.len() as u64)
    ));
    output.push_str(&format!("Key fragment x: {}\n", header.key_fragment.x));

    Ok(output)
}

fn format_size(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else if bytes < 1024 * 1024 * 1024 {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    } else {
        format!("{:.1} GB", bytes as f64 / (1024.0 * 1024.0 * 1024.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shard::save_horcruxes;
    use crate::split::{split_buffer, SplitOptions};
    use rand::rngs::OsRng;
    use tempfile::tempdir;

    #[test]
    fn test_show_info() {
        let dir = tempdir().unwrap();
        let options = SplitOptions {
            total: 5,
            threshold: 3,
        };
        let split = split_buffer(b"some payload", "ledger.txt", &options, &mut OsRng).unwrap();
        let paths = save_horcruxes(&split.horcruxes, dir.path()).unwrap();

        let info = show_info(&paths[1]).unwrap();
        assert!(info.contains("Original file: ledger.txt"));
        assert!(info.contains("Shard: 2 of 5 (any 3 resurrect the original)"));
        assert!(info.contains("Mode: replicated"));
        assert!(info.contains("Version: 1"));
    }

    #[test]
    fn test_info_never_prints_key_bytes() {
        let dir = tempdir().unwrap();
        let options = SplitOptions {
            total: 2,
            threshold: 2,
        };
        let split = split_buffer(b"hush", "quiet.txt", &options, &mut OsRng).unwrap();
        let paths = save_horcruxes(&split.horcruxes, dir.path()).unwrap();

        let fragment = split.horcruxes[0].header.key_fragment.clone();
        let info = show_info(&paths[0]).unwrap();
        let y_rendered = format!("{:?}", fragment.y);
        assert!(!info.contains(&y_rendered));
    }

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(500), "500 B");
        assert_eq!(format_size(1024), "1.0 KB");
        assert_eq!(format_size(1536), "1.5 KB");
        assert_eq!(format_size(1048576), "1.0 MB");
    }
}
