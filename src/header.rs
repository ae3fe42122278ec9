//! Shard header: the metadata record carried at the top of every horcrux.
//!
//! On disk the header is JSON for interoperability; decoding is a fallible
//! boundary whose output is validated before anything else touches it. The
//! key fragment's y bytes serialize as a JSON array of integers 0..255.

use serde::{Deserialize, Serialize};

use crate::error::{HorcruxError, Result};
use crate::shamir::Share;

/// Current shard format version.
pub const FORMAT_VERSION: u32 = 1;

/// One Shamir share of the AES key, as stored in a header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyFragment {
    pub x: u8,
    pub y: Vec<u8>,
}

impl From<Share> for KeyFragment {
    fn from(share: Share) -> Self {
        Self {
            x: share.x,
            y: share.y,
        }
    }
}

impl From<&KeyFragment> for Share {
    fn from(fragment: &KeyFragment) -> Self {
        Self {
            x: fragment.x,
            y: fragment.y.clone(),
        }
    }
}

/// Metadata common to one split run plus this shard's own index and key
/// fragment. Every shard of a run shares (originalFilename, timestamp,
/// total, threshold); the timestamp doubles as the run identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HorcruxHeader {
    pub original_filename: String,
    /// Wall-clock milliseconds at split time; identifies the split run.
    pub timestamp: u64,
    /// 1-based position within the split.
    pub index: u8,
    pub total: u8,
    pub threshold: u8,
    pub key_fragment: KeyFragment,
    pub version: u32,
}

impl HorcruxHeader {
    /// Multiplexed mode stripes the ciphertext across all shards; it is in
    /// force exactly when every shard is needed to rebuild.
    pub fn is_multiplexed(&self) -> bool {
        self.threshold == self.total
    }

    /// Serialize to JSON bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }

    /// Parse and validate JSON bytes into a header.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let header: HorcruxHeader = serde_json::from_slice(data)
            .map_err(|e| HorcruxError::MalformedHeader(e.to_string()))?;

        if header.version > FORMAT_VERSION {
            return Err(HorcruxError::UnsupportedVersion(header.version));
        }
        if header.key_fragment.x == 0 {
            return Err(HorcruxError::MalformedHeader(
                "key fragment x must not be zero".into(),
            ));
        }

        Ok(header)
    }
}
