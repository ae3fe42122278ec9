//! Shamir secret sharing over GF(2^8).
//!
//! A secret of L bytes is shared byte-wise: each byte becomes the constant
//! term of a fresh random polynomial of degree threshold-1, and every share
//! is the evaluation of those L polynomials at the share's x-coordinate.
//! Reconstruction is Lagrange interpolation at x = 0.
//!
//! Combining fewer shares than the threshold is NOT an error: it yields a
//! deterministic but meaningless value. That is the security property - a
//! sub-threshold set is indistinguishable from noise.

use rand::seq::SliceRandom;
use rand::{CryptoRng, RngCore};
use zeroize::Zeroizing;

use crate::error::{HorcruxError, Result};
use crate::gf256;

/// One Shamir share: the evaluation point x and one y byte per secret byte.
/// x = 0 is reserved as the reconstruction point and never issued.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Share {
    pub x: u8,
    pub y: Vec<u8>,
}

/// Split a secret into `total` shares, any `threshold` of which recover it.
pub fn split<R: RngCore + CryptoRng>(
    secret: &[u8],
    total: u8,
    threshold: u8,
    rng: &mut R,
) -> Result<Vec<Share>> {
    if secret.is_empty() {
        return Err(HorcruxError::EmptySecret);
    }
    if threshold < 2 {
        return Err(HorcruxError::InvalidThreshold(threshold));
    }
    if threshold > total {
        return Err(HorcruxError::ThresholdExceedsTotal { threshold, total });
    }

    // Distinct x-coordinates, drawn without replacement from [1, 255]
    let pool: Vec<u8> = (1..=255).collect();
    let xs: Vec<u8> = pool
        .choose_multiple(rng, total as usize)
        .copied()
        .collect();

    let mut shares: Vec<Share> = xs
        .into_iter()
        .map(|x| Share {
            x,
            y: Vec::with_capacity(secret.len()),
        })
        .collect();

    // One polynomial per secret byte; the constant term is the byte itself
    let mut coefficients = Zeroizing::new(vec![0u8; threshold as usize]);
    for &byte in secret {
        coefficients[0] = byte;
        rng.fill_bytes(&mut coefficients[1..]);
        for share in shares.iter_mut() {
            share.y.push(gf256::poly_eval(&coefficients, share.x));
        }
    }

    Ok(shares)
}

/// Recover the secret by interpolating every byte position at x = 0.
///
/// With at least `threshold` shares from one split the result is exact.
/// With fewer it is garbage, silently. Duplicate x-coordinates are a
/// structural invariant violation and surface as `DivisionByZero`.
pub fn combine(shares: &[Share]) -> Result<Vec<u8>> {
    let first = shares.first().ok_or(HorcruxError::EmptyShares)?;
    let length = first.y.len();
    if shares.iter().any(|share| share.y.len() != length) {
        return Err(HorcruxError::LengthMismatch);
    }

    // Lagrange basis at x = 0 is independent of the byte position,
    // so compute it once per share
    let mut basis = Vec::with_capacity(shares.len());
    for (j, share_j) in shares.iter().enumerate() {
        let mut weight = 1u8;
        for (k, share_k) in shares.iter().enumerate() {
            if k != j {
                let denominator = gf256::add(share_j.x, share_k.x);
                weight = gf256::mul(weight, gf256::div(share_k.x, denominator)?);
            }
        }
        basis.push(weight);
    }

    let mut secret = vec![0u8; length];
    for (j, share) in shares.iter().enumerate() {
        for (i, &y) in share.y.iter().enumerate() {
            secret[i] = gf256::add(secret[i], gf256::mul(y, basis[j]));
        }
    }

    Ok(secret)
}
