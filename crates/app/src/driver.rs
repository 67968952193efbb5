//! End-to-end run: generate -> corrupt -> embed -> dump -> reload -> locate.
//!
//! The reloaded channel is a separate buffer from the transmitted one, so the
//! locator only ever sees what made it through the dump file.

use crate::config::Config;
use lisa_sync_core::metrics::RunMetrics;
use lisa_sync_core::{buffer_io, Assembler, Percentage, Result, SyncField};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::time::Instant;

/// What a run produced.
#[derive(Debug)]
pub struct Outcome {
    pub metrics: RunMetrics,

    /// Payload bytes read back at the located offset (empty if not found)
    pub recovered: Vec<u8>,
}

impl Outcome {
    pub fn succeeded(&self) -> bool {
        self.metrics.succeeded()
    }
}

/// Run one simulation with resolved percentages.
///
/// # Errors
/// Fails on `InvalidCapacity`, dump I/O errors or `TruncatedInput`. Not
/// finding the payload is reported through the outcome, not as an error.
pub fn run(config: &Config, corruption: Percentage, confidence: Percentage) -> Result<Outcome> {
    let mut metrics = RunMetrics::new();
    let mut rng = ChaCha8Rng::seed_from_u64(config.seed);

    // Sender side
    let phase = Instant::now();
    let sync = SyncField::generate(corruption, &mut rng)?;
    metrics.generate_time = phase.elapsed();
    metrics.corrupted_bits = sync.corrupted_bits();
    metrics.intact_bytes = sync.intact_bytes();

    let phase = Instant::now();
    let sent = Assembler::new(config.capacity)
        .with_filler(config.filler)
        .assemble(&sync, &config.payload, &mut rng)?;
    metrics.assemble_time = phase.elapsed();
    metrics.expected_offset = sent.payload_offset;

    let phase = Instant::now();
    buffer_io::write_file(&sent.channel, &config.dump_file)?;
    metrics.write_time = phase.elapsed();
    drop(sent);

    // Receiver side
    let phase = Instant::now();
    let received = buffer_io::read_file(&config.dump_file, config.capacity)?;
    metrics.read_time = phase.elapsed();
    metrics.channel_bytes = received.len();

    let report = config.strategy.locate(confidence, received.as_bytes());
    metrics.located_offset = report.payload_offset;
    metrics.scan = report.stats;

    let recovered = report
        .payload_offset
        .and_then(|offset| received.slice(offset, config.payload.len()))
        .map(<[u8]>::to_vec)
        .unwrap_or_default();

    metrics.complete();
    tracing::debug!(
        expected = metrics.expected_offset,
        located = ?metrics.located_offset,
        "run complete"
    );

    Ok(Outcome { metrics, recovered })
}
