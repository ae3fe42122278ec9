//! The split engine: one plaintext in, N shard containers out.
//!
//! Pipeline: generate a fresh 32-byte key, Shamir-share it across the shard
//! headers, encrypt the payload under AES-256-OFB, then either replicate the
//! ciphertext into every shard (threshold < total) or stripe it round-robin
//! across them (threshold == total, when every shard is needed anyway).

use std::io::{Read, Write};
use std::time::{SystemTime, UNIX_EPOCH};

use rand::{CryptoRng, RngCore};
use zeroize::Zeroizing;

use crate::cipher::{self, KeystreamCipher, KEY_LENGTH};
use crate::demux::{demux, Demultiplexer};
use crate::error::{HorcruxError, Result};
use crate::header::{HorcruxHeader, FORMAT_VERSION};
use crate::shamir;
use crate::shard::{container_prefix, Horcrux};

/// Fewest shards a split may produce or require.
pub const MIN_SHARDS: u8 = 2;
/// Most shards a split may produce.
pub const MAX_SHARDS: u8 = 99;

#[derive(Debug, Clone, Copy)]
pub struct SplitOptions {
    /// Number of shards to produce.
    pub total: u8,
    /// Shards required to rebuild. Equal to `total` selects multiplexed
    /// mode; less selects replicated mode.
    pub threshold: u8,
}

impl SplitOptions {
    pub fn validate(&self) -> Result<()> {
        if !(MIN_SHARDS..=MAX_SHARDS).contains(&self.total) {
            return Err(HorcruxError::InvalidTotal(self.total));
        }
        if !(MIN_SHARDS..=MAX_SHARDS).contains(&self.threshold) {
            return Err(HorcruxError::InvalidThreshold(self.threshold));
        }
        if self.threshold > self.total {
            return Err(HorcruxError::ThresholdExceedsTotal {
                threshold: self.threshold,
                total: self.total,
            });
        }
        Ok(())
    }
}

/// Outcome of an in-memory split, shards in ascending index order.
#[derive(Debug)]
pub struct SplitResult {
    pub horcruxes: Vec<Horcrux>,
    pub original_size: usize,
    /// Sum of all shard body sizes.
    pub total_size: usize,
}

/// Byte counts reported by the streaming split.
#[derive(Debug, Clone, Copy)]
pub struct StreamSummary {
    pub original_size: u64,
    pub total_size: u64,
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as u64)
        .unwrap_or(0)
}

/// Bare filename recorded at split time; both separator styles stripped.
pub(crate) fn basename(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}

fn build_headers(
    filename: &str,
    timestamp: u64,
    options: &SplitOptions,
    shares: Vec<shamir::Share>,
) -> Vec<HorcruxHeader> {
    shares
        .into_iter()
        .enumerate()
        .map(|(i, share)| HorcruxHeader {
            original_filename: filename.to_string(),
            timestamp,
            index: i as u8 + 1,
            total: options.total,
            threshold: options.threshold,
            key_fragment: share.into(),
            version: FORMAT_VERSION,
        })
        .collect()
}

/// Split an in-memory payload into shards.
pub fn split_buffer<R: RngCore + CryptoRng>(
    data: &[u8],
    filename: &str,
    options: &SplitOptions,
    rng: &mut R,
) -> Result<SplitResult> {
    split_buffer_at(data, filename, options, now_ms(), rng)
}

pub(crate) fn split_buffer_at<R: RngCore + CryptoRng>(
    data: &[u8],
    filename: &str,
    options: &SplitOptions,
    timestamp: u64,
    rng: &mut R,
) -> Result<SplitResult> {
    options.validate()?;
    if data.is_empty() {
        return Err(HorcruxError::EmptySecret);
    }

    let mut key = Zeroizing::new([0u8; KEY_LENGTH]);
    rng.fill_bytes(&mut *key);
    let shares = shamir::split(&*key, options.total, options.threshold, rng)?;
    let headers = build_headers(basename(filename), timestamp, options, shares);

    let ciphertext = cipher::encrypt(data, &*key)?;
    let bodies: Vec<Vec<u8>> = if options.threshold == options.total {
        demux(&ciphertext, options.total as usize)?
    } else {
        vec![ciphertext; options.total as usize]
    };

    let total_size = bodies.iter().map(|body| body.len()).sum();
    let horcruxes = headers
        .into_iter()
        .zip(bodies)
        .map(|(header, content)| Horcrux { header, content })
        .collect();

    Ok(SplitResult {
        horcruxes,
        original_size: data.len(),
        total_size,
    })
}

/// Split a byte stream directly into `sinks`, one complete shard container
/// per sink, without buffering the whole payload. The plaintext is
/// encrypted chunk by chunk and routed as it arrives.
pub fn split_stream<R, W, G>(
    input: &mut R,
    filename: &str,
    options: &SplitOptions,
    sinks: &mut [W],
    rng: &mut G,
) -> Result<StreamSummary>
where
    R: Read,
    W: Write,
    G: RngCore + CryptoRng,
{
    options.validate()?;
    if sinks.len() != options.total as usize {
        return Err(HorcruxError::InvalidTotal(options.total));
    }

    let mut key = Zeroizing::new([0u8; KEY_LENGTH]);
    rng.fill_bytes(&mut *key);
    let shares = shamir::split(&*key, options.total, options.threshold, rng)?;
    let headers = build_headers(basename(filename), now_ms(), options, shares);

    for (sink, header) in sinks.iter_mut().zip(&headers) {
        sink.write_all(&container_prefix(header)?)?;
    }

    let mut cipher = KeystreamCipher::new(&*key)?;
    let mut buffer = [0u8; 8192];
    let mut original_size = 0u64;

    if options.threshold == options.total {
        let mut dispatcher = Demultiplexer::new(sinks);
        loop {
            let n = input.read(&mut buffer)?;
            if n == 0 {
                break;
            }
            cipher.apply(&mut buffer[..n]);
            dispatcher.write_all(&buffer[..n])?;
            original_size += n as u64;
        }
    } else {
        loop {
            let n = input.read(&mut buffer)?;
            if n == 0 {
                break;
            }
            cipher.apply(&mut buffer[..n]);
            for sink in sinks.iter_mut() {
                sink.write_all(&buffer[..n])?;
            }
            original_size += n as u64;
        }
    }

    if original_size == 0 {
        return Err(HorcruxError::EmptySecret);
    }

    let total_size = if options.threshold == options.total {
        original_size
    } else {
        original_size * options.total as u64
    };

    Ok(StreamSummary {
        original_size,
        total_size,
    })
}
