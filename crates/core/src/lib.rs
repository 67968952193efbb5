//! lisa-sync-core: LISA sync field injection and noisy-channel recovery
//!
//! This library provides the core components for a simulation that:
//! - Builds the 32-byte LISA sync field and corrupts a chosen share of its bits
//! - Embeds sync field + payload at a random offset inside a channel buffer
//! - Persists and reloads the channel as a flat byte dump
//! - Relocates the payload by matching against the canonical sync field
//!
//! # Architecture
//!
//! - `sync_field`: canonical field and unique-bit corruption
//! - `channel`: channel buffer and frame assembler
//! - `locate`: vanilla (exhaustive) and heuristic (early-exit) locators
//! - `buffer_io`: raw binary dump format
//! - `percent`: validated 0-100 percentages
//! - `metrics`: scan statistics and run timing
//!
//! # Design Principles
//!
//! - **No panics**: structural failures are `Error`s, "no match" is a report
//! - **Deterministic**: all randomness comes from a caller-supplied `Rng`
//! - **Stateless**: every call owns or borrows its buffers for its duration

pub mod buffer_io;
pub mod channel;
pub mod error;
pub mod locate;
pub mod metrics;
pub mod percent;
pub mod sync_field;

// Re-export commonly used types
pub use channel::{Assembled, Assembler, Channel, Filler, DEFAULT_CAPACITY};
pub use error::{Error, Result};
pub use locate::{locate_heuristic, locate_vanilla, MatchReport, Strategy};
pub use percent::Percentage;
pub use sync_field::{SyncField, SYNC_LEN};
