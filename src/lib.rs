//! Horcrux - split a file into encrypted shards, no password required
//!
//! A file is fragmented into N "horcruxes" such that any K of them
//! (2 <= K <= N <= 99) resurrect the original, while fewer than K reveal
//! nothing about the key. The payload is encrypted once with AES-256-OFB
//! under a fresh random key, and the key itself is distributed across the
//! shard headers with Shamir's Secret Sharing over GF(2^8).
//!
//! ## Split pipeline
//!
//! ```text
//! plaintext → AES-256-OFB → (replicate | round-robin stripe) → N bodies
//! random key → Shamir split → N key fragments → N headers
//! header + body → shard file
//! ```
//!
//! When `threshold == total` every shard is needed anyway, so the
//! ciphertext is striped across them (multiplexed mode); otherwise every
//! shard carries the full ciphertext (replicated mode). Bind reverses the
//! pipeline: parse, validate the set, recombine the key, reassemble,
//! decrypt.
//!
//! ## Example
//!
//! ```no_run
//! use horcrux::cli::{split_file, bind_directory};
//! use horcrux::split::SplitOptions;
//! use std::path::Path;
//!
//! let options = SplitOptions { total: 5, threshold: 3 };
//! split_file(
//!     Path::new("secret.pdf"),
//!     Path::new("shards/"),
//!     &options,
//! ).unwrap();
//!
//! // Later, with at least 3 of the 5 shard files present:
//! bind_directory(Path::new("shards/"), None).unwrap();
//! ```
//!
//! The cipher is unauthenticated and the IV is fixed; security rests
//! entirely on the freshness of the per-split key. Callers who need
//! tamper detection must MAC the plaintext before splitting.

pub mod bind;
pub mod cipher;
pub mod cli;
pub mod demux;
pub mod discover;
pub mod error;
pub mod gf256;
pub mod header;
pub mod shamir;
pub mod shard;
pub mod split;

pub use bind::{bind_horcruxes, BindOptions, BindResult};
pub use discover::{auto_bind, discover_horcruxes};
pub use error::{HorcruxError, Result};
pub use header::{HorcruxHeader, KeyFragment, FORMAT_VERSION};
pub use shard::{read_horcrux_file, save_horcruxes, write_horcrux_file, Horcrux};
pub use split::{split_buffer, split_stream, SplitOptions, SplitResult};
