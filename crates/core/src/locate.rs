//! Payload location by matching against the canonical sync field.
//!
//! Two strategies:
//!
//! - **Vanilla**: slides a 32-byte window over every start position, counts
//!   byte-equal matches against the canonical field and keeps the best
//!   (first on ties). The payload is reported if the best window's match
//!   percentage clears the requested confidence. O(len × 32).
//!
//! - **Heuristic**: uses the structure of the field (two ascending runs from
//!   known bases) to turn any single matching byte into a candidate window
//!   start, then confirms that candidate with a short early-exit pass. Much
//!   cheaper on sparse channels but approximate: it can miss fields with a
//!   badly corrupted first run and can accept a false positive.
//!
//! "Not found" is a normal outcome: `MatchReport::payload_offset` is `None`.

use crate::error::Error;
use crate::metrics::ScanStats;
use crate::percent::Percentage;
use crate::sync_field::{canonical_byte, logical_index, SyncField, RUN_LEN, SYNC_LEN};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use std::time::Instant;

/// Minimum matches per run for the heuristic to accept a candidate.
pub const MIN_RUN_MATCHES: usize = 3;

/// Outcome of a locate call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchReport {
    /// Payload start (just past the sync field), if the threshold was met
    pub payload_offset: Option<usize>,

    /// Best (vanilla) or confirmed (heuristic) window start
    pub window_start: Option<usize>,

    /// Matching bytes counted in that window. The heuristic stops counting
    /// once a run is confirmed, so this is a lower bound there.
    pub matched_bytes: usize,

    /// Work done by the scan
    pub stats: ScanStats,
}

impl MatchReport {
    pub fn is_found(&self) -> bool {
        self.payload_offset.is_some()
    }

    /// Match percentage of `window_start` (matched / 32 × 100).
    pub fn confidence(&self) -> f64 {
        self.matched_bytes as f64 / SYNC_LEN as f64 * 100.0
    }

    /// Payload offset with `0` standing for "not found".
    ///
    /// A real payload always starts at 32 or later, so `0` is unambiguous.
    pub fn offset_or_sentinel(&self) -> usize {
        self.payload_offset.unwrap_or(0)
    }
}

/// Which locator to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Strategy {
    /// Exhaustive sliding window
    #[default]
    Vanilla,

    /// Structure-aware early exit
    Heuristic,
}

impl Strategy {
    pub fn locate(self, confidence: Percentage, channel: &[u8]) -> MatchReport {
        match self {
            Strategy::Vanilla => locate_vanilla(confidence, channel),
            Strategy::Heuristic => locate_heuristic(confidence, channel),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Strategy::Vanilla => "vanilla",
            Strategy::Heuristic => "heuristic",
        }
    }
}

impl FromStr for Strategy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        match s {
            "vanilla" => Ok(Strategy::Vanilla),
            "heuristic" => Ok(Strategy::Heuristic),
            other => Err(Error::Config(format!("unknown algorithm: {}", other))),
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Whether `matched` of 32 bytes reaches `confidence` percent.
fn meets_confidence(matched: usize, confidence: Percentage) -> bool {
    matched * 100 >= confidence.get() as usize * SYNC_LEN
}

/// Number of window starts examined for a channel of `len` bytes.
///
/// The final start position (`len - 32`) is not examined.
fn window_count(len: usize) -> usize {
    len.saturating_sub(SYNC_LEN)
}

/// Exhaustive sliding-window search.
///
/// Returns the payload offset of the best-matching window if its match
/// percentage is at least `confidence`. Confidence 0 succeeds on any channel
/// longer than 32 bytes; confidence 100 requires a byte-perfect field.
pub fn locate_vanilla(confidence: Percentage, channel: &[u8]) -> MatchReport {
    let started = Instant::now();
    let reference = SyncField::canonical();
    let reference = reference.as_bytes();
    let mut stats = ScanStats::default();

    let mut best: Option<(usize, usize)> = None;
    for start in 0..window_count(channel.len()) {
        let window = &channel[start..start + SYNC_LEN];
        let matched = window
            .iter()
            .zip(reference.iter())
            .filter(|(a, b)| a == b)
            .count();

        stats.windows_examined += 1;
        stats.byte_comparisons += SYNC_LEN as u64;

        // Strictly greater: ties keep the lowest start
        if best.map_or(true, |(_, m)| matched > m) {
            best = Some((start, matched));
        }
    }
    stats.elapsed = started.elapsed();

    let (window_start, matched_bytes) = match best {
        Some((start, matched)) => (Some(start), matched),
        None => (None, 0),
    };
    let payload_offset = window_start
        .filter(|_| meets_confidence(matched_bytes, confidence))
        .map(|start| start + SYNC_LEN);

    let report = MatchReport {
        payload_offset,
        window_start,
        matched_bytes,
        stats,
    };
    tracing::info!(
        algorithm = "vanilla",
        window = ?window_start,
        confidence = report.confidence(),
        required = %confidence,
        found = report.is_found(),
        "best window"
    );
    report
}

/// Matches needed in each run of a heuristic candidate.
///
/// `max(3, ceil(16 × confidence / 100))`: low confidences keep the fixed
/// floor of 3, 100% demands both runs intact.
pub fn run_threshold(confidence: Percentage) -> usize {
    confidence.of_ceil(RUN_LEN).max(MIN_RUN_MATCHES)
}

/// Early-exit confirmation of a candidate window.
///
/// Counts first-run matches; once `threshold` is reached the rest of the
/// first run is skipped. Then counts second-run matches, stopping as soon as
/// `threshold` is reached. Returns `(confirmed, matched)`.
fn confirm(
    window: &[u8],
    reference: &[u8; SYNC_LEN],
    threshold: usize,
    stats: &mut ScanStats,
) -> (bool, usize) {
    let last_of_first_run = canonical_byte(RUN_LEN - 1);

    let mut first = 0;
    let mut j = 0;
    while j < RUN_LEN {
        stats.byte_comparisons += 1;
        if window[j] == reference[j] {
            first += 1;
            if first >= threshold {
                // Jump to the end of the run
                j += (last_of_first_run - reference[j]) as usize;
            }
        }
        j += 1;
    }
    if first < threshold {
        return (false, first);
    }

    let mut second = 0;
    for j in RUN_LEN..SYNC_LEN {
        stats.byte_comparisons += 1;
        if window[j] == reference[j] {
            second += 1;
            if second >= threshold {
                break;
            }
        }
    }

    (second >= threshold, first + second)
}

/// Structure-aware search with early termination.
///
/// Every channel byte whose value belongs to the canonical field pins a
/// candidate start (`position - logical_index(byte)`): that byte matches
/// `reference[j]` for the window starting there. Candidates are confirmed in
/// ascending start order and the lowest confirmed start wins. A start is
/// confirmed once the scan is 31 bytes past it, when no lower start can
/// still show up.
///
/// `confidence` sets the per-run threshold through [`run_threshold`].
pub fn locate_heuristic(confidence: Percentage, channel: &[u8]) -> MatchReport {
    let started = Instant::now();
    let reference = SyncField::canonical();
    let reference = reference.as_bytes();
    let threshold = run_threshold(confidence);
    let windows = window_count(channel.len());
    let mut stats = ScanStats::default();

    let mut pending: BTreeSet<usize> = BTreeSet::new();
    let mut result: Option<(usize, usize)> = None;

    let check = |start: usize, stats: &mut ScanStats| -> Option<(usize, usize)> {
        stats.candidates_checked += 1;
        let (confirmed, matched) = confirm(
            &channel[start..start + SYNC_LEN],
            reference,
            threshold,
            stats,
        );
        if confirmed {
            return Some((start, matched));
        }
        tracing::trace!(start, matched, "candidate rejected");
        None
    };

    'scan: for (position, &byte) in channel.iter().enumerate() {
        stats.byte_comparisons += 1;
        if let Some(start) = logical_index(byte).and_then(|index| position.checked_sub(index)) {
            if start < windows {
                pending.insert(start);
            }
        }

        while let Some(&start) = pending.first() {
            if start + SYNC_LEN - 1 > position {
                break;
            }
            pending.remove(&start);
            if let Some(hit) = check(start, &mut stats) {
                result = Some(hit);
                break 'scan;
            }
        }
    }

    if result.is_none() {
        while let Some(start) = pending.pop_first() {
            if let Some(hit) = check(start, &mut stats) {
                result = Some(hit);
                break;
            }
        }
    }

    // Window starts the nested (start, offset) scan walks through
    stats.windows_examined = match result {
        Some((start, _)) => start as u64 + 1,
        None => windows as u64,
    };
    stats.elapsed = started.elapsed();

    let report = match result {
        Some((start, matched)) => MatchReport {
            payload_offset: Some(start + SYNC_LEN),
            window_start: Some(start),
            matched_bytes: matched,
            stats,
        },
        None => MatchReport {
            payload_offset: None,
            window_start: None,
            matched_bytes: 0,
            stats,
        },
    };
    tracing::info!(
        algorithm = "heuristic",
        window = ?report.window_start,
        run_threshold = threshold,
        candidates = stats.candidates_checked,
        found = report.is_found(),
        "scan finished"
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::Assembler;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    const PAYLOAD: &[u8] = b"Hello LISA!";

    fn pct(value: i64) -> Percentage {
        Percentage::new(value).unwrap()
    }

    /// Zero-filled channel with `sync` + payload at `start`.
    fn channel_with(sync: &[u8; SYNC_LEN], start: usize, capacity: usize) -> Vec<u8> {
        let mut channel = vec![0u8; capacity];
        channel[start..start + SYNC_LEN].copy_from_slice(sync);
        channel[start + SYNC_LEN..start + SYNC_LEN + PAYLOAD.len()].copy_from_slice(PAYLOAD);
        channel
    }

    /// Canonical field with the given byte indices zeroed.
    fn damaged(indices: impl IntoIterator<Item = usize>) -> [u8; SYNC_LEN] {
        let mut bytes = *SyncField::canonical().as_bytes();
        for i in indices {
            bytes[i] = 0;
        }
        bytes
    }

    #[test]
    fn test_vanilla_clean_field() {
        let channel = channel_with(SyncField::canonical().as_bytes(), 300, 1024);

        let report = locate_vanilla(Percentage::FULL, &channel);
        assert_eq!(report.payload_offset, Some(332));
        assert_eq!(report.window_start, Some(300));
        assert_eq!(report.matched_bytes, SYNC_LEN);
        assert_eq!(report.confidence(), 100.0);
        assert_eq!(report.stats.windows_examined, (1024 - SYNC_LEN) as u64);
    }

    #[test]
    fn test_vanilla_threshold() {
        // 24 of 32 bytes intact = 75%
        let channel = channel_with(&damaged(0..8), 100, 512);

        assert_eq!(locate_vanilla(pct(75), &channel).payload_offset, Some(132));
        let report = locate_vanilla(pct(76), &channel);
        assert_eq!(report.payload_offset, None);
        assert_eq!(report.offset_or_sentinel(), 0);
        assert_eq!(report.window_start, Some(100));
        assert_eq!(report.matched_bytes, 24);
    }

    #[test]
    fn test_vanilla_ties_keep_first() {
        let sync = SyncField::canonical();
        let mut channel = channel_with(sync.as_bytes(), 400, 1024);
        channel[50..50 + SYNC_LEN].copy_from_slice(sync.as_bytes());

        let report = locate_vanilla(Percentage::FULL, &channel);
        assert_eq!(report.payload_offset, Some(50 + SYNC_LEN));
    }

    #[test]
    fn test_vanilla_zero_confidence_always_finds() {
        let channel = vec![0u8; 256];
        let report = locate_vanilla(Percentage::ZERO, &channel);
        assert_eq!(report.payload_offset, Some(SYNC_LEN));
        assert_eq!(report.matched_bytes, 0);
    }

    #[test]
    fn test_short_channels() {
        for len in [0, 1, SYNC_LEN] {
            let channel = vec![0xA0; len];
            assert!(!locate_vanilla(Percentage::ZERO, &channel).is_found());
            assert!(!locate_heuristic(Percentage::ZERO, &channel).is_found());
        }
    }

    #[test]
    fn test_vanilla_confidence_monotonic() {
        let mut rng = ChaCha8Rng::seed_from_u64(77);
        let sync = SyncField::generate(pct(8), &mut rng).unwrap();
        let out = Assembler::default().assemble(&sync, PAYLOAD, &mut rng).unwrap();
        let channel = out.channel.as_bytes();

        let highest = (0..=100)
            .rev()
            .find(|&c| locate_vanilla(pct(c), channel).is_found())
            .unwrap();
        for c in 0..=highest {
            assert!(locate_vanilla(pct(c), channel).is_found(), "lost at {}%", c);
        }
    }

    #[test]
    fn test_heuristic_clean_field() {
        let channel = channel_with(SyncField::canonical().as_bytes(), 300, 1024);

        for c in [0, 50, 100] {
            let report = locate_heuristic(pct(c), &channel);
            assert_eq!(report.payload_offset, Some(332), "at {}%", c);
            assert_eq!(report.stats.candidates_checked, 1);
        }
    }

    #[test]
    fn test_heuristic_exits_early() {
        let channel = channel_with(SyncField::canonical().as_bytes(), 300, 1024);

        let fast = locate_heuristic(Percentage::ZERO, &channel);
        let slow = locate_vanilla(Percentage::ZERO, &channel);
        assert_eq!(fast.payload_offset, slow.payload_offset);
        // Bytes 0..=331 scanned before start 300 is settled, then
        // 3 first-run + 3 second-run comparisons
        assert_eq!(fast.stats.byte_comparisons, 332 + 6);
        assert_eq!(fast.stats.windows_examined, 301);
        assert_eq!(fast.matched_bytes, 6);
        assert!(fast.stats.byte_comparisons * 50 < slow.stats.byte_comparisons);
    }

    #[test]
    fn test_heuristic_misses_broken_first_run() {
        // Only indices 14 and 15 survive in the first run
        let channel = channel_with(&damaged(0..14), 200, 1024);

        assert!(!locate_heuristic(Percentage::ZERO, &channel).is_found());
        assert_eq!(
            locate_vanilla(Percentage::ZERO, &channel).payload_offset,
            Some(232)
        );
    }

    #[test]
    fn test_heuristic_threshold_scales_with_confidence() {
        // 10 intact bytes per run
        let channel = channel_with(&damaged((0..6).chain(16..22)), 500, 1024);

        assert_eq!(run_threshold(pct(50)), 8);
        assert_eq!(locate_heuristic(pct(50), &channel).payload_offset, Some(532));

        assert_eq!(run_threshold(pct(70)), 12);
        assert!(!locate_heuristic(pct(70), &channel).is_found());
    }

    #[test]
    fn test_heuristic_recovers_damaged_prefix() {
        let mut channel = channel_with(SyncField::canonical().as_bytes(), 40, 256);
        channel[40..53].fill(0);

        // Indices 13, 14, 15 are the only first-run matches left
        let report = locate_heuristic(Percentage::ZERO, &channel);
        assert_eq!(report.payload_offset, Some(72));
        assert_eq!(report.window_start, Some(40));
    }

    #[test]
    fn test_heuristic_second_run_byte_pins_start() {
        // A lone second-run byte at 150 infers a start of 150 - 20 = 130
        let mut channel = vec![0u8; 256];
        channel[150] = canonical_byte(20);

        let report = locate_heuristic(Percentage::ZERO, &channel);
        assert!(!report.is_found());
        assert_eq!(report.stats.candidates_checked, 1);
        assert_eq!(report.stats.windows_examined, (256 - SYNC_LEN) as u64);
    }

    #[test]
    fn test_heuristic_confirms_lowest_start_first() {
        // Two confirmable windows: start 100 only matches from index 13 on,
        // start 105 matches from index 0, so its first hit comes earlier.
        let mut channel = vec![0u8; 512];
        for j in 13..=18 {
            channel[100 + j] = canonical_byte(j);
        }
        for j in [0, 1, 2, 28, 29, 30] {
            channel[105 + j] = canonical_byte(j);
        }

        let vanilla = locate_vanilla(Percentage::ZERO, &channel);
        assert_eq!(vanilla.window_start, Some(100));

        let heuristic = locate_heuristic(Percentage::ZERO, &channel);
        assert_eq!(heuristic.window_start, Some(100));
        assert_eq!(heuristic.payload_offset, Some(100 + SYNC_LEN));
        assert_eq!(heuristic.stats.candidates_checked, 1);
        assert_eq!(heuristic.stats.windows_examined, 101);
    }

    #[test]
    fn test_run_threshold_floor() {
        assert_eq!(run_threshold(Percentage::ZERO), 3);
        assert_eq!(run_threshold(pct(18)), 3);
        assert_eq!(run_threshold(pct(19)), 4);
        assert_eq!(run_threshold(Percentage::FULL), 16);
    }

    #[test]
    fn test_strategy_dispatch() {
        let channel = channel_with(SyncField::canonical().as_bytes(), 10, 128);

        for strategy in [Strategy::Vanilla, Strategy::Heuristic] {
            let parsed: Strategy = strategy.name().parse().unwrap();
            assert_eq!(parsed, strategy);
            assert_eq!(
                strategy.locate(Percentage::FULL, &channel).payload_offset,
                Some(42)
            );
        }
        assert!("fast".parse::<Strategy>().is_err());
    }
}
