//! Final job states produced by classification.

use crate::severity::Severity;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Detected state of a finished job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DetectedJobState {
    #[default]
    #[serde(rename = "ok")]
    Ok,
    #[serde(rename = "oom_error")]
    OutOfMemoryError,
    #[serde(rename = "generic_error")]
    GenericError,
}

impl DetectedJobState {
    /// Map the running maximum severity to a state.
    pub fn from_severity(severity: Severity) -> Self {
        match severity {
            Severity::FatalOutOfMemory => Self::OutOfMemoryError,
            Severity::Fatal => Self::GenericError,
            Severity::NoError | Severity::Log | Severity::Warning => Self::Ok,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::OutOfMemoryError => "oom_error",
            Self::GenericError => "generic_error",
        }
    }

    /// Process exit status used by the command-line front end.
    pub fn exit_status(&self) -> i32 {
        match self {
            Self::Ok => 0,
            Self::GenericError => 1,
            Self::OutOfMemoryError => 2,
        }
    }
}

impl fmt::Display for DetectedJobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_severity() {
        assert_eq!(DetectedJobState::from_severity(Severity::NoError), DetectedJobState::Ok);
        assert_eq!(DetectedJobState::from_severity(Severity::Log), DetectedJobState::Ok);
        assert_eq!(DetectedJobState::from_severity(Severity::Warning), DetectedJobState::Ok);
        assert_eq!(
            DetectedJobState::from_severity(Severity::Fatal),
            DetectedJobState::GenericError
        );
        assert_eq!(
            DetectedJobState::from_severity(Severity::FatalOutOfMemory),
            DetectedJobState::OutOfMemoryError
        );
    }

    #[test]
    fn test_names() {
        assert_eq!(DetectedJobState::OutOfMemoryError.to_string(), "oom_error");
        let json = serde_json::to_string(&DetectedJobState::GenericError).unwrap();
        assert_eq!(json, "\"generic_error\"");
    }
}
