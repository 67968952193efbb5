//! Persisting channels as flat byte dumps.
//!
//! The on-disk format is the raw channel: one byte per position, no header,
//! no separators. A dump of a channel with capacity N is exactly N bytes.
//!
//! Reading requires the agreed capacity up front. Shorter input is an error;
//! bytes past the capacity are ignored.

use crate::channel::Channel;
use crate::error::{Error, Result};
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

/// Write every byte of `channel` to `writer`.
pub fn write_to<W: Write>(channel: &Channel, mut writer: W) -> Result<()> {
    writer.write_all(channel.as_bytes())?;
    writer.flush()?;
    Ok(())
}

/// Read a channel of exactly `capacity` bytes from `reader`.
///
/// # Errors
/// - `Error::TruncatedInput` if fewer than `capacity` bytes are available
/// - `Error::Io` on read failure
pub fn read_from<R: Read>(reader: R, capacity: usize) -> Result<Channel> {
    let mut bytes = Vec::with_capacity(capacity);
    let mut limited = reader.take(capacity as u64);
    limited.read_to_end(&mut bytes)?;

    if bytes.len() < capacity {
        return Err(Error::TruncatedInput {
            expected: capacity,
            actual: bytes.len(),
        });
    }

    let mut rest = limited.into_inner();
    let mut probe = [0u8; 1];
    if rest.read(&mut probe)? > 0 {
        tracing::warn!(capacity, "input longer than channel capacity, ignoring the rest");
    }

    Ok(Channel::from_bytes(bytes))
}

/// Dump `channel` to the file at `path`, replacing it.
pub fn write_file(channel: &Channel, path: &Path) -> Result<()> {
    let file = File::create(path)?;
    write_to(channel, BufWriter::new(file))?;
    tracing::debug!(path = %path.display(), bytes = channel.len(), "wrote channel");
    Ok(())
}

/// Load a channel of `capacity` bytes from the file at `path`.
pub fn read_file(path: &Path, capacity: usize) -> Result<Channel> {
    let file = File::open(path)?;
    let channel = read_from(BufReader::new(file), capacity)?;
    tracing::debug!(path = %path.display(), bytes = channel.len(), "read channel");
    Ok(channel)
}
