//! Validated percentages for corruption rates and confidence levels.

use crate::error::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// An integer percentage guaranteed to lie in `0..=100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Percentage(u8);

impl Percentage {
    /// 0%
    pub const ZERO: Percentage = Percentage(0);

    /// 100%
    pub const FULL: Percentage = Percentage(100);

    /// Validate a raw value.
    ///
    /// # Errors
    /// Returns `Error::InvalidPercentage` if `value` is outside 0-100.
    pub fn new(value: i64) -> Result<Self> {
        if (0..=100).contains(&value) {
            Ok(Percentage(value as u8))
        } else {
            Err(Error::InvalidPercentage { value })
        }
    }

    /// The raw percentage value.
    pub fn get(self) -> u8 {
        self.0
    }

    /// Apply this percentage to `total`, rounding down.
    pub fn of_floor(self, total: usize) -> usize {
        total * self.0 as usize / 100
    }

    /// Apply this percentage to `total`, rounding up.
    pub fn of_ceil(self, total: usize) -> usize {
        (total * self.0 as usize).div_ceil(100)
    }
}

impl FromStr for Percentage {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let value: i64 = s
            .trim()
            .parse()
            .map_err(|_| Error::Config(format!("not an integer: {:?}", s.trim())))?;
        Percentage::new(value)
    }
}

impl fmt::Display for Percentage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}
