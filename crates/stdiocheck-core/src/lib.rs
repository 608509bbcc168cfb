//! Core types for stdiocheck.
//!
//! Severity levels, declarative exit-code and regex rules, the per-tool rule
//! set, and the states a finished job can be classified into.

pub mod message;
pub mod rules;
pub mod severity;
pub mod state;

pub use message::{JobMessage, Stream};
pub use rules::{ExitCodeRange, ExitCodeRule, OutputRegexRule, PatternMatch, RuleError, ToolRuleSet};
pub use severity::{Severity, UnknownSeverity};
pub use state::DetectedJobState;
