//! AES-256-OFB payload encryption.
//!
//! The IV is fixed at 16 zero bytes for wire compatibility; freshness comes
//! from the random per-split key, which is never reused. OFB is a stream
//! mode, so encryption and decryption are the same keystream XOR and the
//! ciphertext length equals the plaintext length.

use aes::Aes256;
use ofb::cipher::{KeyIvInit, StreamCipher};
use ofb::Ofb;

use crate::error::{HorcruxError, Result};

/// AES-256 key length in bytes.
pub const KEY_LENGTH: usize = 32;

const IV: [u8; 16] = [0u8; 16];

type Aes256Ofb = Ofb<Aes256>;

/// Incremental OFB keystream. Feeding a buffer in chunks produces exactly
/// the same bytes as a single one-shot call.
pub struct KeystreamCipher {
    inner: Aes256Ofb,
}

impl KeystreamCipher {
    pub fn new(key: &[u8]) -> Result<Self> {
        if key.len() != KEY_LENGTH {
            return Err(HorcruxError::InvalidKeyLength(key.len()));
        }
        let inner = Aes256Ofb::new_from_slices(key, &IV)
            .map_err(|_| HorcruxError::InvalidKeyLength(key.len()))?;
        Ok(Self { inner })
    }

    /// XOR the next keystream bytes into the buffer in place.
    pub fn apply(&mut self, buffer: &mut [u8]) {
        self.inner.apply_keystream(buffer);
    }
}

/// One-shot encryption of a buffer.
pub fn encrypt(data: &[u8], key: &[u8]) -> Result<Vec<u8>> {
    let mut output = data.to_vec();
    KeystreamCipher::new(key)?.apply(&mut output);
    Ok(output)
}

/// One-shot decryption. OFB decryption is encryption.
pub fn decrypt(data: &[u8], key: &[u8]) -> Result<Vec<u8>> {
    encrypt(data, key)
}
