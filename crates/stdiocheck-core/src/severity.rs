//! Ordered severity scale for detected conditions.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// How serious a detected condition is.
///
/// Variants are ordered; comparisons follow the underlying integer value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum Severity {
    #[default]
    NoError = 0,
    Log = 1,
    Warning = 2,
    Fatal = 3,
    #[serde(rename = "fatal_oom")]
    FatalOutOfMemory = 4,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown error level: {0}")]
pub struct UnknownSeverity(pub String);

impl Severity {
    /// Top of the scale. Reaching it ends rule evaluation.
    pub const MAX: Severity = Severity::FatalOutOfMemory;

    const DESCRIPTIONS: [&'static str; 5] =
        ["No error", "Log", "Warning", "Fatal error", "Out of memory error"];

    /// Canonical human-readable description.
    pub fn description(self) -> &'static str {
        Self::DESCRIPTIONS[self as usize]
    }

    /// Describe a raw numeric level, returning "Unknown error" outside the scale.
    pub fn describe_level(level: i64) -> &'static str {
        usize::try_from(level)
            .ok()
            .and_then(|idx| Self::DESCRIPTIONS.get(idx).copied())
            .unwrap_or("Unknown error")
    }

    /// Name used in rule definitions.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NoError => "no_error",
            Self::Log => "log",
            Self::Warning => "warning",
            Self::Fatal => "fatal",
            Self::FatalOutOfMemory => "fatal_oom",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

impl FromStr for Severity {
    type Err = UnknownSeverity;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "no_error" => Ok(Self::NoError),
            "log" => Ok(Self::Log),
            "warning" => Ok(Self::Warning),
            "fatal" => Ok(Self::Fatal),
            "fatal_oom" => Ok(Self::FatalOutOfMemory),
            _ => Err(UnknownSeverity(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordering() {
        assert!(Severity::NoError < Severity::Log);
        assert!(Severity::Log < Severity::Warning);
        assert!(Severity::Warning < Severity::Fatal);
        assert!(Severity::Fatal < Severity::FatalOutOfMemory);
        assert_eq!(Severity::MAX, Severity::FatalOutOfMemory);
    }

    #[test]
    fn test_describe_level() {
        assert_eq!(Severity::describe_level(0), "No error");
        assert_eq!(Severity::describe_level(3), "Fatal error");
        assert_eq!(Severity::describe_level(4), "Out of memory error");
        assert_eq!(Severity::describe_level(5), "Unknown error");
        assert_eq!(Severity::describe_level(-1), "Unknown error");
    }

    #[test]
    fn test_from_str() {
        assert_eq!("warning".parse::<Severity>(), Ok(Severity::Warning));
        assert_eq!(" FATAL_OOM ".parse::<Severity>(), Ok(Severity::FatalOutOfMemory));
        assert!("qc".parse::<Severity>().is_err());
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&Severity::FatalOutOfMemory).unwrap();
        assert_eq!(json, "\"fatal_oom\"");
        let parsed: Severity = serde_json::from_str("\"log\"").unwrap();
        assert_eq!(parsed, Severity::Log);
    }
}
