//! Round-robin byte striping across N sinks.
//!
//! The demultiplexer deals an input stream out in fixed 100-byte stripes:
//! sink 0 gets bytes [0, 100), sink 1 gets [100, 200), and so on, wrapping
//! around until the input ends. The final stripe may be short. The inverse
//! reads the stripes back in the same order, taking up to a stripe per turn
//! and skipping sinks that have run dry.

use std::io::Write;

use crate::error::Result;

/// Stripe size in bytes.
pub const QUOTA: usize = 100;

/// Streaming round-robin dispatcher. State is the pair (current sink,
/// bytes written to it this turn); input may arrive in arbitrary chunks.
pub struct Demultiplexer<'a, W> {
    sinks: &'a mut [W],
    current: usize,
    written: usize,
}

impl<'a, W: Write> Demultiplexer<'a, W> {
    pub fn new(sinks: &'a mut [W]) -> Self {
        Self {
            sinks,
            current: 0,
            written: 0,
        }
    }

    /// Route the next chunk of input to the sinks.
    pub fn write_all(&mut self, mut data: &[u8]) -> Result<()> {
        while !data.is_empty() {
            let take = (QUOTA - self.written).min(data.len());
            self.sinks[self.current].write_all(&data[..take])?;
            self.written += take;
            if self.written == QUOTA {
                self.written = 0;
                self.current = (self.current + 1) % self.sinks.len();
            }
            data = &data[take..];
        }
        Ok(())
    }
}

/// Stripe a buffer across `sinks` in-memory buffers.
pub fn demux(data: &[u8], sinks: usize) -> Result<Vec<Vec<u8>>> {
    let mut stripes = vec![Vec::new(); sinks];
    Demultiplexer::new(&mut stripes).write_all(data)?;
    Ok(stripes)
}

/// Reassemble a buffer from its stripes. Exact inverse of `demux` when the
/// stripes are presented in their original sink order.
pub fn mux(stripes: &[Vec<u8>]) -> Vec<u8> {
    let total: usize = stripes.iter().map(|stripe| stripe.len()).sum();
    let mut output = Vec::with_capacity(total);
    let mut offsets = vec![0usize; stripes.len()];

    while output.len() < total {
        for (stripe, offset) in stripes.iter().zip(offsets.iter_mut()) {
            if *offset < stripe.len() {
                let take = QUOTA.min(stripe.len() - *offset);
                output.extend_from_slice(&stripe[*offset..*offset + take]);
                *offset += take;
            }
        }
    }

    output
}
