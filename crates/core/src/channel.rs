//! The channel buffer and the assembler that embeds a frame into it.
//!
//! A channel is a fixed-capacity byte buffer holding one frame
//! `[sync field (32)][payload (N)]` at a random offset, surrounded by filler:
//!
//! ```text
//! +---------+------------+-----------+------------------+
//! | filler  | sync field |  payload  |      filler      |
//! +---------+------------+-----------+------------------+
//! 0     sync_offset   payload_offset               capacity
//! ```

use crate::error::{Error, Result};
use crate::sync_field::{SyncField, SYNC_LEN};
use rand::Rng;

/// Default channel capacity in bytes
pub const DEFAULT_CAPACITY: usize = 1024;

/// Content of the bytes outside the embedded frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Filler {
    /// All zero (deterministic regardless of RNG)
    #[default]
    Zeros,

    /// Uniform random bytes drawn from the assembler's RNG
    Noise,
}

/// A transmitted or received byte stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Channel {
    bytes: Vec<u8>,
}

impl Channel {
    /// Wrap existing bytes.
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// `len` bytes starting at `offset`, or `None` if out of range.
    pub fn slice(&self, offset: usize, len: usize) -> Option<&[u8]> {
        let end = offset.checked_add(len)?;
        self.bytes.get(offset..end)
    }
}

/// Result of embedding a frame into a channel.
#[derive(Debug, Clone)]
pub struct Assembled {
    /// The filled channel
    pub channel: Channel,

    /// Where the sync field starts
    pub sync_offset: usize,

    /// Where the payload starts (ground truth for the locators)
    pub payload_offset: usize,
}

/// Places sync field and payload at a random offset in a new channel.
#[derive(Debug, Clone, Copy)]
pub struct Assembler {
    capacity: usize,
    filler: Filler,
}

impl Assembler {
    /// Create an assembler producing zero-filled channels of `capacity` bytes.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            filler: Filler::Zeros,
        }
    }

    /// Use `filler` for the bytes outside the frame.
    pub fn with_filler(mut self, filler: Filler) -> Self {
        self.filler = filler;
        self
    }

    /// Embed `sync` followed by `payload`.
    ///
    /// The sync offset is uniform over `[0, capacity - 32 - payload.len())`.
    ///
    /// # Errors
    /// Returns `Error::InvalidCapacity` unless `capacity > 32 + payload.len()`.
    pub fn assemble<R: Rng + ?Sized>(
        &self,
        sync: &SyncField,
        payload: &[u8],
        rng: &mut R,
    ) -> Result<Assembled> {
        let frame_len = SYNC_LEN + payload.len();
        if self.capacity <= frame_len {
            return Err(Error::InvalidCapacity {
                capacity: self.capacity,
                required: frame_len,
            });
        }

        let mut bytes = vec![0u8; self.capacity];
        if self.filler == Filler::Noise {
            rng.fill(bytes.as_mut_slice());
        }

        let sync_offset = rng.gen_range(0..self.capacity - frame_len);
        let payload_offset = sync_offset + SYNC_LEN;

        bytes[sync_offset..payload_offset].copy_from_slice(sync.as_bytes());
        bytes[payload_offset..payload_offset + payload.len()].copy_from_slice(payload);

        tracing::debug!(
            capacity = self.capacity,
            sync_offset,
            payload_offset,
            payload_len = payload.len(),
            filler = ?self.filler,
            "assembled channel"
        );

        Ok(Assembled {
            channel: Channel::from_bytes(bytes),
            sync_offset,
            payload_offset,
        })
    }
}

impl Default for Assembler {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
