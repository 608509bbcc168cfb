//! Declarative exit-code and output-regex rules.
//!
//! Rules are built once when a tool definition is loaded and are read-only
//! afterwards, so a [`ToolRuleSet`] can be shared freely across threads.

use crate::severity::Severity;
use regex::{Regex, RegexBuilder};
use std::fmt;
use thiserror::Error;

/// Maximum number of matched characters quoted in a diagnostic.
pub const MATCH_QUOTE_LIMIT: usize = 256;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RuleError {
    #[error("Invalid regex pattern {pattern:?}: {reason}")]
    InvalidPattern { pattern: String, reason: String },
}

/// Inclusive range of exit codes. `None` bounds are unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExitCodeRange {
    pub start: Option<i64>,
    pub end: Option<i64>,
}

impl ExitCodeRange {
    pub fn new(start: Option<i64>, end: Option<i64>) -> Self {
        Self { start, end }
    }

    /// Range containing exactly one code.
    pub fn single(code: i64) -> Self {
        Self::new(Some(code), Some(code))
    }

    /// Range containing every code.
    pub fn all() -> Self {
        Self::new(None, None)
    }

    pub fn contains(&self, code: i64) -> bool {
        self.start.is_none_or(|start| start <= code) && self.end.is_none_or(|end| code <= end)
    }
}

impl fmt::Display for ExitCodeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.start, self.end) {
            (Some(s), Some(e)) if s == e => write!(f, "{}", s),
            (Some(s), Some(e)) => write!(f, "{}:{}", s, e),
            (Some(s), None) => write!(f, "{}:", s),
            (None, Some(e)) => write!(f, ":{}", e),
            (None, None) => f.write_str(":"),
        }
    }
}

/// Maps a range of exit codes to a severity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExitCodeRule {
    pub range: ExitCodeRange,
    pub severity: Severity,
    pub description: Option<String>,
}

impl ExitCodeRule {
    pub fn new(range: ExitCodeRange, severity: Severity) -> Self {
        Self {
            range,
            severity,
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn matches(&self, exit_code: i64) -> bool {
        self.range.contains(exit_code)
    }
}

/// A pattern match found in one line of output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternMatch {
    /// Matched text, at most [`MATCH_QUOTE_LIMIT`] characters.
    pub text: String,
    /// Whether the match was longer than the quoted text.
    pub truncated: bool,
}

impl PatternMatch {
    fn from_span(span: &str) -> Self {
        match span.char_indices().nth(MATCH_QUOTE_LIMIT) {
            Some((cut, _)) => Self {
                text: span[..cut].to_string(),
                truncated: true,
            },
            None => Self {
                text: span.to_string(),
                truncated: false,
            },
        }
    }

    /// Text as quoted in diagnostics, with a trailing `...` when truncated.
    pub fn quoted(&self) -> String {
        if self.truncated {
            format!("{}...", self.text)
        } else {
            self.text.clone()
        }
    }
}

/// Matches a pattern against stdout and/or stderr.
///
/// The pattern is compiled case-insensitively at construction. A pattern
/// that fails to compile is kept so that evaluation can report it.
#[derive(Debug, Clone)]
pub struct OutputRegexRule {
    pattern: String,
    compiled: Result<Regex, RuleError>,
    pub match_stdout: bool,
    pub match_stderr: bool,
    pub severity: Severity,
    pub description: Option<String>,
}

impl OutputRegexRule {
    /// Build a rule matching both streams.
    pub fn new(pattern: impl Into<String>, severity: Severity) -> Self {
        let pattern = pattern.into();
        let compiled = RegexBuilder::new(&pattern)
            .case_insensitive(true)
            .build()
            .map_err(|e| RuleError::InvalidPattern {
                pattern: pattern.clone(),
                reason: e.to_string(),
            });
        if let Err(e) = &compiled {
            tracing::warn!("{}", e);
        }
        Self {
            pattern,
            compiled,
            match_stdout: true,
            match_stderr: true,
            severity,
            description: None,
        }
    }

    pub fn with_streams(mut self, stdout: bool, stderr: bool) -> Self {
        self.match_stdout = stdout;
        self.match_stderr = stderr;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Source text of the pattern.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Compilation error, if the pattern is unusable.
    pub fn error(&self) -> Option<&RuleError> {
        self.compiled.as_ref().err()
    }

    /// Search `text` line by line from the last line to the first.
    ///
    /// Lines are split on `\n` only, so a trailing newline yields a final
    /// empty line and empty text is a single empty line. Returns the first
    /// match found, i.e. the last occurrence in the text.
    pub fn find_last(&self, text: &str) -> Result<Option<PatternMatch>, RuleError> {
        let regex = self.compiled.as_ref().map_err(Clone::clone)?;
        Ok(text
            .split('\n')
            .rev()
            .find_map(|line| regex.find(line))
            .map(|m| PatternMatch::from_span(m.as_str())))
    }
}

impl PartialEq for OutputRegexRule {
    fn eq(&self, other: &Self) -> bool {
        self.pattern == other.pattern
            && self.match_stdout == other.match_stdout
            && self.match_stderr == other.match_stderr
            && self.severity == other.severity
            && self.description == other.description
    }
}

/// Ordered rules declared by one tool.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ToolRuleSet {
    pub exit_codes: Vec<ExitCodeRule>,
    pub regexes: Vec<OutputRegexRule>,
}

impl ToolRuleSet {
    pub fn new(exit_codes: Vec<ExitCodeRule>, regexes: Vec<OutputRegexRule>) -> Self {
        Self {
            exit_codes,
            regexes,
        }
    }

    /// True when neither exit-code nor regex rules are declared.
    pub fn is_empty(&self) -> bool {
        self.exit_codes.is_empty() && self.regexes.is_empty()
    }

    /// Regex rules whose pattern failed to compile.
    pub fn invalid_patterns(&self) -> impl Iterator<Item = &RuleError> {
        self.regexes.iter().filter_map(|r| r.error())
    }
}
