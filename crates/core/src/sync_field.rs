//! LISA sync field generation and bit-level corruption.
//!
//! The canonical sync field is 32 bytes made of two ascending 16-byte runs:
//!
//! ```text
//! index:  0    1    ...  15   16   17   ...  31
//! byte:   A0   A1   ...  AF   50   51   ...  5F
//! ```
//!
//! Corruption flips a fixed number of distinct bits, chosen uniformly from
//! the 256 bit positions of the field. Every chosen position is flipped
//! exactly once, so the Hamming distance from the canonical field always
//! equals the requested bit count.
//!
//! # Example
//! ```
//! use lisa_sync_core::percent::Percentage;
//! use lisa_sync_core::sync_field::{SyncField, SYNC_LEN};
//!
//! let field = SyncField::canonical();
//! assert_eq!(field.as_bytes()[0], 0xA0);
//! assert_eq!(field.as_bytes()[SYNC_LEN - 1], 0x5F);
//!
//! let mut rng = rand::thread_rng();
//! let noisy = SyncField::generate(Percentage::new(10).unwrap(), &mut rng).unwrap();
//! assert_eq!(noisy.corrupted_bits(), 25);
//! ```

use crate::error::{Error, Result};
use crate::percent::Percentage;
use rand::Rng;

/// Length of the sync field in bytes
pub const SYNC_LEN: usize = 32;

/// Length of the sync field in bits
pub const SYNC_BITS: usize = SYNC_LEN * 8;

/// Length of one ascending run
pub const RUN_LEN: usize = 16;

/// Base value of each run
pub const SYNC_PREFIXES: [u8; 2] = [0xA0, 0x50];

/// Canonical byte at logical index `index` (0-31).
pub const fn canonical_byte(index: usize) -> u8 {
    SYNC_PREFIXES[index / RUN_LEN] + (index % RUN_LEN) as u8
}

/// Logical index of `byte` within the canonical field, if it belongs to it.
///
/// The run is picked from the high nibble (`0xA_` is the first run, anything
/// else the second), the position within the run from the distance to the
/// run's base.
pub fn logical_index(byte: u8) -> Option<usize> {
    let run = if byte >> 4 == SYNC_PREFIXES[0] >> 4 { 0 } else { 1 };
    let offset = byte.wrapping_sub(SYNC_PREFIXES[run]) as usize;
    (offset < RUN_LEN).then_some(run * RUN_LEN + offset)
}

/// Number of differing bits between two byte slices of equal length.
pub fn bit_distance(a: &[u8], b: &[u8]) -> usize {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x ^ y).count_ones() as usize)
        .sum()
}

/// A 32-byte LISA sync field, canonical or corrupted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SyncField([u8; SYNC_LEN]);

impl SyncField {
    /// The uncorrupted field. Pure function of the byte index.
    pub fn canonical() -> Self {
        let mut bytes = [0u8; SYNC_LEN];
        for (i, byte) in bytes.iter_mut().enumerate() {
            *byte = canonical_byte(i);
        }
        Self(bytes)
    }

    /// Build a canonical field and corrupt `floor(256 * corruption / 100)` bits.
    ///
    /// 0% returns the canonical field; 100% inverts every bit.
    pub fn generate<R: Rng + ?Sized>(corruption: Percentage, rng: &mut R) -> Result<Self> {
        let mut field = Self::canonical();
        field.corrupt(corruption.of_floor(SYNC_BITS), rng)?;
        Ok(field)
    }

    /// Flip `num_bits` distinct, uniformly chosen bits.
    ///
    /// Draws that hit an already flipped position are repeated until a fresh
    /// position comes up.
    ///
    /// # Errors
    /// Returns `Error::CorruptionExhausted` if `num_bits` exceeds 256.
    pub fn corrupt<R: Rng + ?Sized>(&mut self, num_bits: usize, rng: &mut R) -> Result<()> {
        if num_bits > SYNC_BITS {
            return Err(Error::CorruptionExhausted {
                requested: num_bits,
                available: SYNC_BITS,
            });
        }

        let mut flipped = [false; SYNC_BITS];
        let mut redraws = 0usize;

        for _ in 0..num_bits {
            let position = loop {
                let candidate = rng.gen_range(0..SYNC_BITS);
                if !flipped[candidate] {
                    break candidate;
                }
                redraws += 1;
            };
            flipped[position] = true;
            self.flip_bit(position);
        }

        tracing::debug!(num_bits, redraws, "corrupted sync field");
        Ok(())
    }

    /// Invert the bit at `position` (byte `position / 8`, bit `position % 8`).
    pub fn flip_bit(&mut self, position: usize) {
        self.0[position / 8] ^= 1 << (position % 8);
    }

    /// Number of bits that differ from the canonical field.
    pub fn corrupted_bits(&self) -> usize {
        bit_distance(&self.0, &Self::canonical().0)
    }

    /// Number of bytes that still equal the canonical field.
    pub fn intact_bytes(&self) -> usize {
        self.0
            .iter()
            .enumerate()
            .filter(|&(i, &b)| b == canonical_byte(i))
            .count()
    }

    /// Raw bytes.
    pub fn as_bytes(&self) -> &[u8; SYNC_LEN] {
        &self.0
    }
}
