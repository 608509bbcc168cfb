//! Stream source and tool profile parsing.

use crate::range::ParseError;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Streams a regex rule applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamSource {
    pub stdout: bool,
    pub stderr: bool,
}

impl StreamSource {
    pub const BOTH: StreamSource = StreamSource {
        stdout: true,
        stderr: true,
    };
}

impl Default for StreamSource {
    fn default() -> Self {
        Self::BOTH
    }
}

/// Parse a regex source: `stdout`, `stderr`, `both`, or a comma-separated list.
pub fn parse_stream_source(s: &str) -> Result<StreamSource, ParseError> {
    let mut source = StreamSource {
        stdout: false,
        stderr: false,
    };
    for part in s.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        match part.to_ascii_lowercase().as_str() {
            "stdout" => source.stdout = true,
            "stderr" => source.stderr = true,
            "both" => source = StreamSource::BOTH,
            _ => return Err(ParseError::InvalidSource(s.to_string())),
        }
    }
    if !source.stdout && !source.stderr {
        return Err(ParseError::InvalidSource(s.to_string()));
    }
    Ok(source)
}

/// Tool profile version such as `16.04` or `21.01`.
///
/// Compared component-wise, so `16.10` sorts after `16.04`.
#[derive(Debug, Clone)]
pub struct ProfileVersion(Vec<u32>);

impl ProfileVersion {
    /// Profile assumed for tools that declare none.
    pub fn legacy() -> Self {
        Self(vec![16, 1])
    }

    /// First profile where exit-code checking is on by default.
    pub fn exit_code_default() -> Self {
        Self(vec![16, 4])
    }
}

impl FromStr for ProfileVersion {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Result<Vec<u32>, _> = s.trim().split('.').map(str::parse).collect();
        match parts {
            Ok(parts) if !parts.is_empty() => Ok(Self(parts)),
            _ => Err(ParseError::InvalidProfile(s.to_string())),
        }
    }
}

impl PartialEq for ProfileVersion {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other).is_eq()
    }
}

impl Eq for ProfileVersion {}

impl PartialOrd for ProfileVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ProfileVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        let len = self.0.len().max(other.0.len());
        (0..len)
            .map(|i| {
                let a = self.0.get(i).copied().unwrap_or(0);
                let b = other.0.get(i).copied().unwrap_or(0);
                a.cmp(&b)
            })
            .find(|o| o.is_ne())
            .unwrap_or(Ordering::Equal)
    }
}

impl fmt::Display for ProfileVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(|p| format!("{:02}", p)).collect();
        f.write_str(&parts.join("."))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_stream_source() {
        assert_eq!(parse_stream_source("both"), Ok(StreamSource::BOTH));
        assert_eq!(
            parse_stream_source("stdout"),
            Ok(StreamSource {
                stdout: true,
                stderr: false
            })
        );
        assert_eq!(
            parse_stream_source("STDERR"),
            Ok(StreamSource {
                stdout: false,
                stderr: true
            })
        );
        assert_eq!(parse_stream_source("stdout, stderr"), Ok(StreamSource::BOTH));
        assert!(parse_stream_source("logfile").is_err());
        assert!(parse_stream_source("").is_err());
    }

    #[test]
    fn test_profile_ordering() {
        let v1604: ProfileVersion = "16.04".parse().unwrap();
        let v1610: ProfileVersion = "16.10".parse().unwrap();
        let v21: ProfileVersion = "21".parse().unwrap();
        assert!(ProfileVersion::legacy() < v1604);
        assert_eq!(v1604, ProfileVersion::exit_code_default());
        assert!(v1610 > v1604);
        assert!(v21 > v1610);
        assert!("abc".parse::<ProfileVersion>().is_err());
    }

    #[test]
    fn test_profile_display() {
        assert_eq!(ProfileVersion::exit_code_default().to_string(), "16.04");
    }
}
