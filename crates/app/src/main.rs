//! lisa-sync: embed a LISA sync field + payload in a channel, corrupt it,
//! dump it to disk, reload it and try to find the payload again.

mod config;
mod driver;
mod prompt;

use config::Config;
use lisa_sync_core::{Percentage, Result};
use std::io;
use std::process::ExitCode;

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let config = match Config::from_args(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {}", e);
            eprintln!("run with --help for usage");
            return ExitCode::from(2);
        }
    };

    tracing_subscriber::fmt()
        .with_max_level(config.log_level)
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    if config.print_config {
        config.print();
    }

    match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

/// Resolve a percentage from the command line or by prompting.
fn resolve(value: Option<Percentage>, prompt: &str) -> Result<Percentage> {
    match value {
        Some(value) => Ok(value),
        None => prompt::prompt_percentage(&mut io::stdin().lock(), &mut io::stdout(), prompt),
    }
}

fn run(config: &Config) -> Result<()> {
    let corruption = resolve(config.corruption, "% LISA Sync Field Corruption? [0-100]: ")?;
    let confidence = resolve(config.confidence, "% Confidence level to apply [0-100]: ")?;

    tracing::info!(
        seed = config.seed,
        %corruption,
        %confidence,
        algorithm = %config.strategy,
        "starting run"
    );

    let outcome = driver::run(config, corruption, confidence)?;
    let metrics = &outcome.metrics;

    if outcome.succeeded() {
        println!(
            "[SUCCESS] Payload found at index {}: {}",
            metrics.expected_offset,
            String::from_utf8_lossy(&outcome.recovered)
        );
    } else {
        println!(
            "[ERROR] Failed to find payload with confidence >= {}. [(E){} , (R){}]",
            confidence,
            metrics.expected_offset,
            metrics.located_offset.unwrap_or(0)
        );
    }
    println!("Total time taken: {:.6} s", metrics.scan.elapsed.as_secs_f64());

    if config.print_metrics {
        metrics.print_summary();
    }

    Ok(())
}
