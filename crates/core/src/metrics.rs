//! Metrics collection and reporting for simulation runs.
//!
//! Two levels:
//! - [`ScanStats`]: work done by a single locate call, attached to its report
//! - [`RunMetrics`]: phase timings and outcome of one end-to-end run
//!
//! Both are plain single-threaded structs updated explicitly by their owner.

use std::time::{Duration, Instant};

/// Work performed by one locator scan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanStats {
    /// Window starts walked by the scan (up to the hit, or all of them)
    pub windows_examined: u64,

    /// Individual byte comparisons against the reference field
    pub byte_comparisons: u64,

    /// Candidate windows handed to the confirmation pass (heuristic only)
    pub candidates_checked: u64,

    /// Wall time spent scanning
    pub elapsed: Duration,
}

impl ScanStats {
    /// Average comparisons per channel byte.
    pub fn comparisons_per_byte(&self, channel_len: usize) -> f64 {
        if channel_len == 0 {
            0.0
        } else {
            self.byte_comparisons as f64 / channel_len as f64
        }
    }
}

/// Timing and outcome of one generate → embed → persist → reload → locate run.
#[derive(Debug, Clone)]
pub struct RunMetrics {
    /// When the run started
    pub start_time: Instant,

    /// When the run ended (set on completion)
    pub end_time: Option<Instant>,

    // === Phases ===
    pub generate_time: Duration,
    pub assemble_time: Duration,
    pub write_time: Duration,
    pub read_time: Duration,

    // === Sync field ===
    /// Bits flipped in the transmitted sync field
    pub corrupted_bits: usize,

    /// Sync bytes that survived corruption untouched
    pub intact_bytes: usize,

    // === Channel ===
    pub channel_bytes: usize,

    // === Location ===
    /// Ground-truth payload offset
    pub expected_offset: usize,

    /// Offset reported by the locator (None = not found)
    pub located_offset: Option<usize>,

    /// Locator statistics
    pub scan: ScanStats,
}

impl RunMetrics {
    /// Create new metrics with start time set to now.
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            end_time: None,
            generate_time: Duration::ZERO,
            assemble_time: Duration::ZERO,
            write_time: Duration::ZERO,
            read_time: Duration::ZERO,
            corrupted_bits: 0,
            intact_bytes: 0,
            channel_bytes: 0,
            expected_offset: 0,
            located_offset: None,
            scan: ScanStats::default(),
        }
    }

    /// Mark the run as complete.
    pub fn complete(&mut self) {
        self.end_time = Some(Instant::now());
    }

    /// Get total duration (or current elapsed if not complete).
    pub fn duration(&self) -> Duration {
        match self.end_time {
            Some(end) => end.duration_since(self.start_time),
            None => self.start_time.elapsed(),
        }
    }

    /// Whether the locator recovered the ground-truth offset.
    pub fn succeeded(&self) -> bool {
        self.located_offset == Some(self.expected_offset)
    }

    /// Print a human-readable summary to stdout.
    pub fn print_summary(&self) {
        println!("\n=== Run Summary ===");
        println!("Duration: {:.3} ms", self.duration().as_secs_f64() * 1000.0);
        println!();

        println!("=== Sync Field ===");
        println!("Corrupted bits: {}", self.corrupted_bits);
        println!("Intact bytes: {} of 32", self.intact_bytes);
        println!();

        println!("=== Phases ===");
        println!("Generate: {:?}", self.generate_time);
        println!("Assemble: {:?}", self.assemble_time);
        println!("Write:    {:?}", self.write_time);
        println!("Read:     {:?}", self.read_time);
        println!("Locate:   {:?}", self.scan.elapsed);
        println!();

        println!("=== Scan ===");
        println!("Channel: {} bytes", self.channel_bytes);
        println!("Windows examined: {}", self.scan.windows_examined);
        println!("Candidates checked: {}", self.scan.candidates_checked);
        println!(
            "Byte comparisons: {} ({:.2} per byte)",
            self.scan.byte_comparisons,
            self.scan.comparisons_per_byte(self.channel_bytes)
        );
        println!();
    }

    /// Export metrics as a simple text format (for parsing/testing).
    pub fn export_text(&self) -> String {
        format!(
            "duration_us={}\n\
             corrupted_bits={}\n\
             intact_bytes={}\n\
             channel_bytes={}\n\
             expected_offset={}\n\
             located_offset={}\n\
             windows_examined={}\n\
             candidates_checked={}\n\
             byte_comparisons={}\n\
             locate_us={}\n\
             success={}\n",
            self.duration().as_micros(),
            self.corrupted_bits,
            self.intact_bytes,
            self.channel_bytes,
            self.expected_offset,
            self.located_offset.unwrap_or(0),
            self.scan.windows_examined,
            self.scan.candidates_checked,
            self.scan.byte_comparisons,
            self.scan.elapsed.as_micros(),
            self.succeeded(),
        )
    }
}

impl Default for RunMetrics {
    fn default() -> Self {
        Self::new()
    }
}
