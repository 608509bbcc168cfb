//! Exit-code parsing utilities.

use stdiocheck_core::ExitCodeRange;
use thiserror::Error;

/// Error type for rule attribute parsing.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("Invalid exit code range: {0}")]
    InvalidRange(String),
    #[error("Invalid stream source: {0}")]
    InvalidSource(String),
    #[error("Invalid profile version: {0}")]
    InvalidProfile(String),
}

/// Parse an exit-code range.
///
/// Supports:
/// - `N` (exactly one code)
/// - `A:B` (inclusive)
/// - `A:` and `:B` (open-ended)
/// - `inf` / `-inf` as explicit unbounded ends
///
/// An empty string covers every exit code. Inverted ranges are swapped.
pub fn parse_exit_code_range(s: &str) -> Result<ExitCodeRange, ParseError> {
    let s = s.trim();
    let invalid = || ParseError::InvalidRange(s.to_string());

    let Some((start, end)) = s.split_once(':') else {
        if s.is_empty() {
            return Ok(ExitCodeRange::all());
        }
        return s
            .parse::<i64>()
            .map(ExitCodeRange::single)
            .map_err(|_| invalid());
    };

    let start = parse_bound(start, "-inf").ok_or_else(invalid)?;
    let end = parse_bound(end, "inf").ok_or_else(invalid)?;

    match (start, end) {
        (Some(s_val), Some(e_val)) if s_val > e_val => {
            tracing::warn!(
                "Inverted exit code range {}; treating it as {}:{}",
                s,
                e_val,
                s_val
            );
            Ok(ExitCodeRange::new(Some(e_val), Some(s_val)))
        }
        _ => Ok(ExitCodeRange::new(start, end)),
    }
}

/// Parse one side of a range. `Some(None)` is an unbounded side.
fn parse_bound(token: &str, infinity: &str) -> Option<Option<i64>> {
    let token = token.trim();
    if token.is_empty() || token.eq_ignore_ascii_case(infinity) {
        return Some(None);
    }
    if infinity == "inf" && token.eq_ignore_ascii_case("+inf") {
        return Some(None);
    }
    token.parse::<i64>().ok().map(Some)
}

/// Parse the contents of an exit-code file.
///
/// Returns None for blank or non-numeric contents, in which case the job
/// reports no exit code.
pub fn parse_exit_code(s: &str) -> Option<i64> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return None;
    }
    match trimmed.parse() {
        Ok(code) => Some(code),
        Err(_) => {
            tracing::warn!("Ignoring non-numeric exit code: {:?}", trimmed);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_single_code() {
        assert_eq!(parse_exit_code_range("137"), Ok(ExitCodeRange::single(137)));
        assert_eq!(parse_exit_code_range(" -1 "), Ok(ExitCodeRange::single(-1)));
    }

    #[test]
    fn test_parse_open_ranges() {
        assert_eq!(
            parse_exit_code_range("1:"),
            Ok(ExitCodeRange::new(Some(1), None))
        );
        assert_eq!(
            parse_exit_code_range(":-1"),
            Ok(ExitCodeRange::new(None, Some(-1)))
        );
        assert_eq!(
            parse_exit_code_range("-inf:-1"),
            Ok(ExitCodeRange::new(None, Some(-1)))
        );
        assert_eq!(
            parse_exit_code_range("1:inf"),
            Ok(ExitCodeRange::new(Some(1), None))
        );
        assert_eq!(parse_exit_code_range(""), Ok(ExitCodeRange::all()));
        assert_eq!(parse_exit_code_range(":"), Ok(ExitCodeRange::all()));
    }

    #[test]
    fn test_parse_closed_and_inverted() {
        assert_eq!(
            parse_exit_code_range("2:5"),
            Ok(ExitCodeRange::new(Some(2), Some(5)))
        );
        assert_eq!(
            parse_exit_code_range("5:2"),
            Ok(ExitCodeRange::new(Some(2), Some(5)))
        );
    }

    #[test]
    fn test_parse_invalid_range() {
        assert!(parse_exit_code_range("one").is_err());
        assert!(parse_exit_code_range("1:x").is_err());
        assert!(parse_exit_code_range("inf:").is_err());
    }

    #[test]
    fn test_parse_exit_code() {
        assert_eq!(parse_exit_code("0\n"), Some(0));
        assert_eq!(parse_exit_code(" 137 "), Some(137));
        assert_eq!(parse_exit_code("-9"), Some(-9));
        assert_eq!(parse_exit_code(""), None);
        assert_eq!(parse_exit_code("killed"), None);
    }
}
