use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum HorcruxError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid total: {0}. Must be between 2 and 99")]
    InvalidTotal(u8),

    #[error("Invalid threshold: {0}. Must be between 2 and 99")]
    InvalidThreshold(u8),

    #[error("Threshold {threshold} exceeds total {total}")]
    ThresholdExceedsTotal { threshold: u8, total: u8 },

    #[error("Not a file: {}", .0.display())]
    NotAFile(PathBuf),

    #[error("Refusing to split an empty file")]
    EmptySecret,

    #[error("Missing header marker: not a horcrux file")]
    MissingHeaderMarker,

    #[error("Missing body marker: horcrux file is truncated or corrupted")]
    MissingBodyMarker,

    #[error("Malformed header: {0}")]
    MalformedHeader(String),

    #[error("Unsupported horcrux version: {0}")]
    UnsupportedVersion(u32),

    #[error("No horcruxes found")]
    NoShards,

    #[error("Horcruxes belong to different original files")]
    DifferentFiles,

    #[error("Horcruxes come from different split runs")]
    DifferentSplitRuns,

    #[error("Horcruxes disagree on the total count")]
    InconsistentTotal,

    #[error("Horcruxes disagree on the threshold")]
    InconsistentThreshold,

    #[error("Duplicate horcrux index: {0}")]
    DuplicateIndex(u8),

    #[error("Multiple horcrux sets found: {}", .0.join(", "))]
    AmbiguousShardSets(Vec<String>),

    #[error("Insufficient horcruxes: have {have}, need {need}")]
    InsufficientShards { have: usize, need: usize },

    #[error("Invalid key length: {0} bytes, expected 32")]
    InvalidKeyLength(usize),

    #[error("Division by zero in GF(256): corrupted key fragments")]
    DivisionByZero,

    #[error("No key fragments to combine")]
    EmptyShares,

    #[error("Key fragments have mismatched lengths")]
    LengthMismatch,
}

impl HorcruxError {
    /// Process exit code for the CLI. Each error category maps to a
    /// distinct non-zero value.
    pub fn exit_code(&self) -> u8 {
        use HorcruxError::*;
        match self {
            Io(_) => 1,
            InvalidTotal(_) | InvalidThreshold(_) | ThresholdExceedsTotal { .. } => 2,
            NotAFile(_) | EmptySecret => 3,
            Json(_) | MissingHeaderMarker | MissingBodyMarker | MalformedHeader(_)
            | UnsupportedVersion(_) => 4,
            NoShards | DifferentFiles | DifferentSplitRuns | InconsistentTotal
            | InconsistentThreshold | DuplicateIndex(_) | AmbiguousShardSets(_)
            | InsufficientShards { .. } => 5,
            InvalidKeyLength(_) | DivisionByZero | EmptyShares | LengthMismatch => 6,
        }
    }
}

pub type Result<T> = std::result::Result<T, HorcruxError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes_by_category() {
        assert_eq!(HorcruxError::InvalidTotal(1).exit_code(), 2);
        assert_eq!(
            HorcruxError::NotAFile(PathBuf::from("/tmp/missing")).exit_code(),
            3
        );
        assert_eq!(HorcruxError::MissingHeaderMarker.exit_code(), 4);
        assert_eq!(
            HorcruxError::InsufficientShards { have: 2, need: 3 }.exit_code(),
            5
        );
        assert_eq!(HorcruxError::InvalidKeyLength(16).exit_code(), 6);
    }

    #[test]
    fn test_insufficient_shards_message() {
        let err = HorcruxError::InsufficientShards { have: 2, need: 3 };
        assert_eq!(format!("{}", err), "Insufficient horcruxes: have 2, need 3");
    }
}
