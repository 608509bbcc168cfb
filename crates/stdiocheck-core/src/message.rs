//! Structured diagnostics recorded during classification.

use crate::severity::Severity;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Output stream of a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stream {
    Stdout,
    Stderr,
}

impl Stream {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Stdout => "stdout",
            Self::Stderr => "stderr",
        }
    }
}

impl fmt::Display for Stream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One diagnostic produced by a matching rule.
///
/// `desc` is the exact line prepended to the annotated stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum JobMessage {
    ExitCode {
        desc: String,
        exit_code: i64,
        code_desc: String,
        error_level: Severity,
    },
    Regex {
        desc: String,
        stream: Stream,
        code_desc: Option<String>,
        #[serde(rename = "match")]
        matched: String,
        error_level: Severity,
    },
}

impl JobMessage {
    pub fn desc(&self) -> &str {
        match self {
            Self::ExitCode { desc, .. } | Self::Regex { desc, .. } => desc,
        }
    }

    /// Stream the message is attached to. Exit-code diagnostics go to stderr.
    pub fn stream(&self) -> Stream {
        match self {
            Self::ExitCode { .. } => Stream::Stderr,
            Self::Regex { stream, .. } => *stream,
        }
    }
}
