//! The bind engine: validate a shard set, recover the key, reassemble the
//! ciphertext, decrypt.
//!
//! Validation compares every shard against the first and fails early with a
//! distinct error per violation. Key recovery uses the first `threshold`
//! shards in input order; multiplexed reassembly always proceeds in
//! ascending index order regardless of how the shards were supplied.

use std::collections::HashSet;

use zeroize::Zeroizing;

use crate::cipher;
use crate::demux::mux;
use crate::error::{HorcruxError, Result};
use crate::shamir::{self, Share};
use crate::shard::Horcrux;

#[derive(Debug, Clone, Default)]
pub struct BindOptions {
    /// Override for the filename reported in the result. Does not affect
    /// where the caller writes the output.
    pub output_filename: Option<String>,
}

#[derive(Debug)]
pub struct BindResult {
    pub data: Vec<u8>,
    pub filename: String,
    pub horcruxes_used: usize,
}

/// Check that all shards belong to one split run and carry distinct indexes.
pub fn validate_set(horcruxes: &[Horcrux]) -> Result<()> {
    let first = &horcruxes.first().ok_or(HorcruxError::NoShards)?.header;

    let mut seen_indexes = HashSet::new();
    for horcrux in horcruxes {
        let header = &horcrux.header;
        if header.original_filename != first.original_filename {
            return Err(HorcruxError::DifferentFiles);
        }
        if header.timestamp != first.timestamp {
            return Err(HorcruxError::DifferentSplitRuns);
        }
        if header.total != first.total {
            return Err(HorcruxError::InconsistentTotal);
        }
        if header.threshold != first.threshold {
            return Err(HorcruxError::InconsistentThreshold);
        }
        if !seen_indexes.insert(header.index) {
            return Err(HorcruxError::DuplicateIndex(header.index));
        }
    }

    Ok(())
}

/// Rebuild the original payload from a set of shards.
pub fn bind_horcruxes(horcruxes: &[Horcrux], options: &BindOptions) -> Result<BindResult> {
    validate_set(horcruxes)?;

    let first = &horcruxes[0].header;
    let need = first.threshold as usize;
    if horcruxes.len() < need {
        return Err(HorcruxError::InsufficientShards {
            have: horcruxes.len(),
            need,
        });
    }

    let selected = &horcruxes[..need];
    let shares: Vec<Share> = selected
        .iter()
        .map(|horcrux| Share::from(&horcrux.header.key_fragment))
        .collect();
    let key = Zeroizing::new(shamir::combine(&shares)?);

    let ciphertext = if first.is_multiplexed() {
        // Every shard holds a stripe; reassemble in ascending index order
        let mut ordered: Vec<&Horcrux> = selected.iter().collect();
        ordered.sort_by_key(|horcrux| horcrux.header.index);
        let stripes: Vec<Vec<u8>> = ordered
            .into_iter()
            .map(|horcrux| horcrux.content.clone())
            .collect();
        mux(&stripes)
    } else {
        // Every shard holds the full ciphertext
        selected[0].content.clone()
    };

    let data = cipher::decrypt(&ciphertext, &key)?;
    let filename = options
        .output_filename
        .clone()
        .unwrap_or_else(|| first.original_filename.clone());

    Ok(BindResult {
        data,
        filename,
        horcruxes_used: need,
    })
}
