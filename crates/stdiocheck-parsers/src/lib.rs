//! Parsing utilities for tool stdio rule definitions.
//!
//! Attribute-level parsers (exit-code ranges, levels, stream sources,
//! profile versions) plus the JSON rule document that turns a tool's
//! declared `stdio` block or `detect_errors` mode into a [`ToolRuleSet`].
//!
//! [`ToolRuleSet`]: stdiocheck_core::ToolRuleSet

pub mod document;
pub mod profiles;
pub mod range;
pub mod source;

pub use document::{
    DetectErrors, DocumentError, ExitCodeDef, RegexDef, RuleDocument, StdioDef, load_rule_document,
};
pub use profiles::{aggressive_error_checks, error_on_exit_code};
pub use range::{ParseError, parse_exit_code, parse_exit_code_range};
pub use source::{ProfileVersion, StreamSource, parse_stream_source};
