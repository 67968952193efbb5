//! Configuration for the lisa-sync application.
//!
//! Handles parsing command-line arguments and filling in defaults.
//!
//! # Philosophy
//!
//! The tool should work with ZERO arguments: the two percentages are then
//! asked for interactively and everything else has a default. The seed is
//! always printed with `--print-config` so any run can be replayed.

use lisa_sync_core::{Filler, Percentage, Strategy, DEFAULT_CAPACITY};
use std::path::PathBuf;
use tracing::Level;

/// Default payload embedded after the sync field
pub const DEFAULT_PAYLOAD: &str = "Hello LISA!";

/// Default dump file
pub const DEFAULT_DUMP_FILE: &str = "lisa_output.bin";

/// Complete configuration for a simulation run.
#[derive(Debug, Clone)]
pub struct Config {
    // === Randomness ===
    /// Seed for the run's RNG
    pub seed: u64,

    // === Channel ===
    /// Channel capacity in bytes
    pub capacity: usize,

    /// Payload bytes
    pub payload: Vec<u8>,

    /// Filler outside the frame
    pub filler: Filler,

    /// Dump file path
    pub dump_file: PathBuf,

    // === Percentages (None = prompt) ===
    pub corruption: Option<Percentage>,
    pub confidence: Option<Percentage>,

    // === Location ===
    pub strategy: Strategy,

    // === Behavior ===
    /// Whether to print detailed config
    pub print_config: bool,

    /// Whether to print the metrics summary
    pub print_metrics: bool,

    /// Maximum log level
    pub log_level: Level,
}

impl Config {
    /// Parse configuration from command-line arguments.
    ///
    /// Without `--seed` a time-based seed is used.
    pub fn from_args(args: &[String]) -> Result<Self, String> {
        let mut seed: Option<u64> = None;
        let mut capacity: Option<usize> = None;
        let mut payload: Option<Vec<u8>> = None;
        let mut dump_file: Option<PathBuf> = None;
        let mut corruption: Option<Percentage> = None;
        let mut confidence: Option<Percentage> = None;
        let mut strategy = Strategy::default();
        let mut filler = Filler::default();
        let mut print_config = false;
        let mut print_metrics = true;
        let mut log_level = Level::INFO;

        let mut i = 0;
        while i < args.len() {
            match args[i].as_str() {
                "--seed" => {
                    i += 1;
                    let value = args.get(i).ok_or("--seed requires a number")?;
                    seed = Some(value.parse().map_err(|_| "invalid seed")?);
                }
                "--capacity" => {
                    i += 1;
                    let value = args.get(i).ok_or("--capacity requires a number")?;
                    capacity = Some(value.parse().map_err(|_| "invalid capacity")?);
                }
                "--payload" => {
                    i += 1;
                    let value = args.get(i).ok_or("--payload requires text")?;
                    payload = Some(value.as_bytes().to_vec());
                }
                "--file" => {
                    i += 1;
                    let value = args.get(i).ok_or("--file requires a path")?;
                    dump_file = Some(PathBuf::from(value));
                }
                "--corruption" => {
                    i += 1;
                    let value = args.get(i).ok_or("--corruption requires a percentage")?;
                    corruption = Some(
                        value
                            .parse()
                            .map_err(|e| format!("invalid corruption: {}", e))?,
                    );
                }
                "--confidence" => {
                    i += 1;
                    let value = args.get(i).ok_or("--confidence requires a percentage")?;
                    confidence = Some(
                        value
                            .parse()
                            .map_err(|e| format!("invalid confidence: {}", e))?,
                    );
                }
                "--algorithm" => {
                    i += 1;
                    let value = args
                        .get(i)
                        .ok_or("--algorithm requires vanilla or heuristic")?;
                    strategy = value.parse().map_err(|e| format!("{}", e))?;
                }
                "--noise" => {
                    filler = Filler::Noise;
                }
                "--print-config" => {
                    print_config = true;
                }
                "--no-metrics" => {
                    print_metrics = false;
                }
                "--verbose" | "-v" => {
                    log_level = Level::DEBUG;
                }
                "--quiet" | "-q" => {
                    log_level = Level::WARN;
                }
                "--help" | "-h" => {
                    print_help();
                    std::process::exit(0);
                }
                _ => {
                    return Err(format!("unknown argument: {}", args[i]));
                }
            }
            i += 1;
        }

        // Determine seed (explicit or time-based)
        let seed = seed.unwrap_or_else(|| {
            use std::time::{SystemTime, UNIX_EPOCH};
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|t| t.as_millis() as u64)
                .unwrap_or(0)
        });

        Ok(Config {
            seed,
            capacity: capacity.unwrap_or(DEFAULT_CAPACITY),
            payload: payload.unwrap_or_else(|| DEFAULT_PAYLOAD.as_bytes().to_vec()),
            filler,
            dump_file: dump_file.unwrap_or_else(|| PathBuf::from(DEFAULT_DUMP_FILE)),
            corruption,
            confidence,
            strategy,
            print_config,
            print_metrics,
            log_level,
        })
    }

    /// Print the configuration in human-readable form.
    pub fn print(&self) {
        let pct = |p: Option<Percentage>| p.map_or("(prompt)".to_string(), |p| p.to_string());

        println!("=== Configuration ===");
        println!("Seed: {}", self.seed);
        println!("Dump file: {}", self.dump_file.display());
        println!();
        println!("=== Channel ===");
        println!("Capacity: {} bytes", self.capacity);
        println!("Payload: {:?} ({} bytes)", String::from_utf8_lossy(&self.payload), self.payload.len());
        println!("Filler: {:?}", self.filler);
        println!();
        println!("=== Sync ===");
        println!("Corruption: {}", pct(self.corruption));
        println!("Confidence: {}", pct(self.confidence));
        println!("Algorithm: {}", self.strategy);
        println!();
    }
}

fn print_help() {
    println!("lisa-sync: LISA sync field injection and payload recovery");
    println!();
    println!("USAGE:");
    println!("    lisa-sync [OPTIONS]");
    println!();
    println!("OPTIONS:");
    println!("    --seed <N>              Random seed for determinism (default: time-based)");
    println!("    --capacity <N>          Channel capacity in bytes (default: 1024)");
    println!("    --payload <TEXT>        Payload text (default: \"Hello LISA!\")");
    println!("    --file <PATH>           Dump file (default: ./lisa_output.bin)");
    println!("    --noise                 Fill the channel with random bytes instead of zeros");
    println!();
    println!("    --corruption <PCT>      Sync field bits to flip, 0-100 (default: prompt)");
    println!("    --confidence <PCT>      Required match confidence, 0-100 (default: prompt)");
    println!("    --algorithm <NAME>      vanilla | heuristic (default: vanilla)");
    println!();
    println!("    --print-config          Print resolved configuration");
    println!("    --no-metrics            Don't print metrics summary");
    println!("    --verbose, -v           Debug logging");
    println!("    --quiet, -q             Warnings only");
    println!("    --help, -h              Print this help");
    println!();
    println!("EXAMPLES:");
    println!("    lisa-sync                                        # Interactive run");
    println!("    lisa-sync --seed 97 --corruption 0 --confidence 100");
    println!("    lisa-sync --corruption 10 --confidence 60 --algorithm heuristic");
    println!();
}
