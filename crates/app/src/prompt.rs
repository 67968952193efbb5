//! Interactive percentage prompts with bounded retries.

use lisa_sync_core::{Error, Percentage, Result};
use std::io::{BufRead, Write};

/// Attempts allowed before giving up
pub const MAX_ATTEMPTS: usize = 3;

/// Ask for a percentage until a valid one is entered.
///
/// Each invalid answer (out of range or not an integer) costs one attempt.
///
/// # Errors
/// - The last validation error once `MAX_ATTEMPTS` answers were rejected
/// - `Error::Io` if input ends or cannot be read
pub fn prompt_percentage<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    prompt: &str,
) -> Result<Percentage> {
    let mut line = String::new();
    let mut attempt = 0;

    loop {
        attempt += 1;
        write!(output, "{}", prompt)?;
        output.flush()?;

        line.clear();
        if input.read_line(&mut line)? == 0 {
            return Err(Error::Io(std::io::ErrorKind::UnexpectedEof.into()));
        }

        match line.parse::<Percentage>() {
            Ok(value) => {
                writeln!(output, "[INFO] Value set: {}", value)?;
                return Ok(value);
            }
            Err(err) => {
                writeln!(
                    output,
                    "({} of {} attempts) Value needs to be between 0-100. You entered: {}",
                    attempt,
                    MAX_ATTEMPTS,
                    line.trim()
                )?;
                if attempt >= MAX_ATTEMPTS {
                    writeln!(output, "[ERROR] Too many failed attempts.")?;
                    return Err(err);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn run(input: &str) -> (Result<Percentage>, String) {
        let mut reader = Cursor::new(input.as_bytes().to_vec());
        let mut out = Vec::new();
        let result = prompt_percentage(&mut reader, &mut out, "% Corruption? [0-100]: ");
        (result, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_first_answer_valid() {
        let (result, out) = run("25\n");
        assert_eq!(result.unwrap().get(), 25);
        assert!(out.contains("[INFO] Value set: 25%"));
    }

    #[test]
    fn test_retry_then_valid() {
        let (result, out) = run("150\nabc\n100\n");
        assert_eq!(result.unwrap(), Percentage::FULL);
        assert!(out.contains("(1 of 3 attempts)"));
        assert!(out.contains("(2 of 3 attempts)"));
    }

    #[test]
    fn test_gives_up_after_three() {
        let (result, out) = run("-1\n101\n200\n50\n");
        assert!(matches!(result, Err(Error::InvalidPercentage { value: 200 })));
        assert!(out.contains("Too many failed attempts"));
    }

    #[test]
    fn test_end_of_input() {
        let (result, _) = run("");
        assert!(matches!(result, Err(Error::Io(_))));
    }
}
