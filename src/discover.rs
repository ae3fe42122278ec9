//! Auto-discovery: find the shard set sitting in a directory and bind it.
//!
//! Files ending in `.horcrux` are parsed; anything unreadable is skipped
//! with a warning. Parsed shards are grouped by (original filename,
//! timestamp), and exactly one group must remain. Shards of two different
//! splits in one directory is an ambiguity the user has to resolve.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::bind::{bind_horcruxes, BindOptions, BindResult};
use crate::error::{HorcruxError, Result};
use crate::shard::{read_horcrux_file, Horcrux, EXTENSION};

/// Scan a directory and return the single coherent shard set, sorted by
/// index so downstream behavior does not depend on directory order.
pub fn discover_horcruxes(directory: &Path) -> Result<Vec<Horcrux>> {
    let mut groups: BTreeMap<(String, u64), Vec<Horcrux>> = BTreeMap::new();

    for entry in fs::read_dir(directory)? {
        let path = entry?.path();
        if !path.is_file() || path.extension().and_then(|ext| ext.to_str()) != Some(EXTENSION) {
            continue;
        }
        match read_horcrux_file(&path) {
            Ok(horcrux) => {
                let key = (
                    horcrux.header.original_filename.clone(),
                    horcrux.header.timestamp,
                );
                groups.entry(key).or_default().push(horcrux);
            }
            Err(error) => {
                eprintln!("Warning: skipping {}: {}", path.display(), error);
            }
        }
    }

    if groups.len() > 1 {
        let mut filenames: Vec<String> = groups.keys().map(|(name, _)| name.clone()).collect();
        filenames.dedup();
        return Err(HorcruxError::AmbiguousShardSets(filenames));
    }

    let mut horcruxes = groups
        .into_values()
        .next()
        .ok_or(HorcruxError::NoShards)?;
    horcruxes.sort_by_key(|horcrux| horcrux.header.index);
    Ok(horcruxes)
}

/// Bind whatever single shard set the directory contains.
pub fn auto_bind(directory: &Path) -> Result<BindResult> {
    let horcruxes = discover_horcruxes(directory)?;
    bind_horcruxes(&horcruxes, &BindOptions::default())
}
