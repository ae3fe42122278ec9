//! The shard container: a UTF-8 text prefix followed by raw ciphertext.
//!
//! Byte layout:
//!
//! ```text
//! <human-readable comment line>\n
//! !HORCRUX-BEGIN-HEADER!\n
//! <header JSON>\n
//! !HORCRUX-BEGIN-BODY!\n
//! <raw body bytes>
//! ```
//!
//! The parser locates the first occurrence of each marker, so anything
//! before the header marker is free-form commentary and the body may
//! contain arbitrary binary data.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{HorcruxError, Result};
use crate::header::HorcruxHeader;

pub const HEADER_MARKER: &[u8] = b"!HORCRUX-BEGIN-HEADER!";
pub const BODY_MARKER: &[u8] = b"!HORCRUX-BEGIN-BODY!";

/// File extension for persisted shards.
pub const EXTENSION: &str = "horcrux";

/// One shard: header plus its slice of the ciphertext (or all of it, in
/// replicated mode).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Horcrux {
    pub header: HorcruxHeader,
    pub content: Vec<u8>,
}

/// Everything up to and including the body marker line, ready to have body
/// bytes appended. The streaming splitter writes this first, then streams.
pub(crate) fn container_prefix(header: &HorcruxHeader) -> Result<Vec<u8>> {
    let mut prefix = Vec::new();
    prefix.extend_from_slice(
        format!(
            "# This file is horcrux {} of {} of \"{}\". It is useless on its own; any {} of them resurrect the original.\n",
            header.index, header.total, header.original_filename, header.threshold
        )
        .as_bytes(),
    );
    prefix.extend_from_slice(HEADER_MARKER);
    prefix.push(b'\n');
    prefix.extend_from_slice(&header.to_bytes()?);
    prefix.push(b'\n');
    prefix.extend_from_slice(BODY_MARKER);
    prefix.push(b'\n');
    Ok(prefix)
}

fn find(haystack: &[u8], needle: &[u8], from: usize) -> Option<usize> {
    if from > haystack.len() {
        return None;
    }
    haystack[from..]
        .windows(needle.len())
        .position(|window| window == needle)
        .map(|position| position + from)
}

impl Horcrux {
    /// Serialize to the on-disk container format.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut bytes = container_prefix(&self.header)?;
        bytes.extend_from_slice(&self.content);
        Ok(bytes)
    }

    /// Parse a container. Inverse of `to_bytes` for any valid shard.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let header_at = find(data, HEADER_MARKER, 0).ok_or(HorcruxError::MissingHeaderMarker)?;
        let mut json_start = header_at + HEADER_MARKER.len();
        if data.get(json_start) == Some(&b'\n') {
            json_start += 1;
        }

        let body_at = find(data, BODY_MARKER, json_start).ok_or(HorcruxError::MissingBodyMarker)?;
        let mut json_end = body_at;
        if json_end > json_start && data[json_end - 1] == b'\n' {
            json_end -= 1;
        }

        let header = HorcruxHeader::from_bytes(&data[json_start..json_end])?;

        let mut body_start = body_at + BODY_MARKER.len();
        if data.get(body_start) == Some(&b'\n') {
            body_start += 1;
        }

        Ok(Self {
            header,
            content: data[body_start..].to_vec(),
        })
    }

    /// Conventional file name: `<originalFilename>.<index>_<total>.horcrux`.
    pub fn file_name(&self) -> String {
        format!(
            "{}.{}_{}.{}",
            self.header.original_filename, self.header.index, self.header.total, EXTENSION
        )
    }
}

/// Read and parse one shard file.
pub fn read_horcrux_file(path: &Path) -> Result<Horcrux> {
    Horcrux::from_bytes(&fs::read(path)?)
}

/// Write one shard file.
pub fn write_horcrux_file(path: &Path, horcrux: &Horcrux) -> Result<()> {
    fs::write(path, horcrux.to_bytes()?)?;
    Ok(())
}

/// Persist a shard list into a directory using the naming convention.
/// Returns the written paths in shard order.
pub fn save_horcruxes(horcruxes: &[Horcrux], output_dir: &Path) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(output_dir)?;
    let mut paths = Vec::with_capacity(horcruxes.len());
    for horcrux in horcruxes {
        let path = output_dir.join(horcrux.file_name());
        write_horcrux_file(&path, horcrux)?;
        paths.push(path);
    }
    Ok(paths)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::header::{KeyFragment, FORMAT_VERSION};
    use tempfile::tempdir;

    fn sample_horcrux() -> Horcrux {
        Horcrux {
            header: HorcruxHeader {
                original_filename: "secret.pdf".into(),
                timestamp: 1722600000000,
                index: 3,
                total: 5,
                threshold: 3,
                key_fragment: KeyFragment {
                    x: 17,
                    y: (0..32u8).collect(),
                },
                version: FORMAT_VERSION,
            },
            // Binary body, including newlines and marker-ish bytes
            content: vec![0, 1, 2, b'\n', 0xFF, b'!', b'H', 0x80, 0x00, 42],
        }
    }

    #[test]
    fn test_serialize_parse_roundtrip() {
        let horcrux = sample_horcrux();
        let bytes = horcrux.to_bytes().unwrap();
        let parsed = Horcrux::from_bytes(&bytes).unwrap();
        assert_eq!(parsed, horcrux);
        // Writer and parser are byte-exact inverses
        assert_eq!(parsed.to_bytes().unwrap(), bytes);
    }

    #[test]
    fn test_container_is_text_prefixed() {
        let bytes = sample_horcrux().to_bytes().unwrap();
        let text = String::from_utf8_lossy(&bytes);
        assert!(text.starts_with("# This file is horcrux 3 of 5"));
        assert!(text.contains("!HORCRUX-BEGIN-HEADER!\n"));
        assert!(text.contains("\n!HORCRUX-BEGIN-BODY!\n"));
    }

    #[test]
    fn test_parse_without_comment_line() {
        let horcrux = sample_horcrux();
        let mut bytes = Vec::new();
        bytes.extend_from_slice(HEADER_MARKER);
        bytes.push(b'\n');
        bytes.extend_from_slice(&horcrux.header.to_bytes().unwrap());
        bytes.push(b'\n');
        bytes.extend_from_slice(BODY_MARKER);
        bytes.push(b'\n');
        bytes.extend_from_slice(&horcrux.content);

        assert_eq!(Horcrux::from_bytes(&bytes).unwrap(), horcrux);
    }

    #[test]
    fn test_missing_header_marker() {
        assert!(matches!(
            Horcrux::from_bytes(b"just some file"),
            Err(HorcruxError::MissingHeaderMarker)
        ));
    }

    #[test]
    fn test_missing_body_marker() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(HEADER_MARKER);
        bytes.extend_from_slice(b"\n{}");
        assert!(matches!(
            Horcrux::from_bytes(&bytes),
            Err(HorcruxError::MissingBodyMarker)
        ));
    }

    #[test]
    fn test_empty_body() {
        let mut horcrux = sample_horcrux();
        horcrux.content.clear();
        let parsed = Horcrux::from_bytes(&horcrux.to_bytes().unwrap()).unwrap();
        assert!(parsed.content.is_empty());
    }

    #[test]
    fn test_file_name_convention() {
        assert_eq!(sample_horcrux().file_name(), "secret.pdf.3_5.horcrux");
    }

    #[test]
    fn test_file_roundtrip() {
        let dir = tempdir().unwrap();
        let horcrux = sample_horcrux();
        let path = dir.path().join(horcrux.file_name());

        write_horcrux_file(&path, &horcrux).unwrap();
        let loaded = read_horcrux_file(&path).unwrap();
        assert_eq!(loaded, horcrux);
    }

    #[test]
    fn test_save_horcruxes_names_and_order() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("shards");
        let mut first = sample_horcrux();
        first.header.index = 1;
        let mut second = sample_horcrux();
        second.header.index = 2;

        let paths = save_horcruxes(&[first, second], &out).unwrap();
        assert_eq!(paths.len(), 2);
        assert!(paths[0].ends_with("secret.pdf.1_5.horcrux"));
        assert!(paths[1].ends_with("secret.pdf.2_5.horcrux"));
        assert!(paths.iter().all(|p| p.exists()));
    }
}
