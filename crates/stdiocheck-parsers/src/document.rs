//! JSON rule documents describing how a tool's output is checked.

use crate::profiles::{aggressive_error_checks, error_on_exit_code};
use crate::range::{ParseError, parse_exit_code_range};
use crate::source::{ProfileVersion, StreamSource, parse_stream_source};
use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};
use stdiocheck_core::{ExitCodeRule, OutputRegexRule, Severity, ToolRuleSet};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{section} rule {index}: {source}")]
    Rule {
        section: &'static str,
        index: usize,
        #[source]
        source: ParseError,
    },
    #[error(transparent)]
    Profile(ParseError),
}

/// Error detection mode used when a tool declares no `stdio` block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectErrors {
    /// Follow the profile: exit-code checking from 16.04 on, otherwise no
    /// rules and a non-empty stderr fails the job.
    Default,
    /// Any non-zero exit code fails the job.
    ExitCode,
    /// Exit codes plus common error and out-of-memory messages.
    Aggressive,
}

/// One declared exit-code rule.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExitCodeDef {
    #[serde(default)]
    pub range: String,
    pub level: Option<String>,
    pub description: Option<String>,
}

/// One declared regex rule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegexDef {
    #[serde(rename = "match")]
    pub pattern: String,
    pub source: Option<String>,
    pub level: Option<String>,
    pub description: Option<String>,
}

/// Explicitly declared rules.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StdioDef {
    #[serde(default)]
    pub exit_codes: Vec<ExitCodeDef>,
    #[serde(default)]
    pub regexes: Vec<RegexDef>,
}

/// How a tool's output is checked.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuleDocument {
    /// Tool identifier, used in log messages.
    pub id: Option<String>,
    /// Tool profile version, e.g. `21.01`.
    pub profile: Option<String>,
    pub detect_errors: Option<DetectErrors>,
    /// Exit code that signals the tool ran out of memory.
    pub oom_exit_code: Option<i64>,
    pub stdio: Option<StdioDef>,
}

impl RuleDocument {
    /// Parse a document from JSON text.
    pub fn from_json(content: &str) -> Result<Self, DocumentError> {
        Ok(serde_json::from_str(content)?)
    }

    /// Resolve the document into the rule set used for classification.
    ///
    /// A `stdio` block wins over `detect_errors`. An absent or `default`
    /// mode is resolved from the profile.
    pub fn rule_set(&self) -> Result<ToolRuleSet, DocumentError> {
        if let Some(stdio) = &self.stdio {
            return stdio.rule_set();
        }
        let mode = match self.detect_errors {
            None | Some(DetectErrors::Default) => self.default_detect_errors()?,
            Some(mode) => mode,
        };
        Ok(match mode {
            DetectErrors::Default => ToolRuleSet::default(),
            DetectErrors::ExitCode => error_on_exit_code(self.oom_exit_code),
            DetectErrors::Aggressive => aggressive_error_checks(self.oom_exit_code),
        })
    }

    fn default_detect_errors(&self) -> Result<DetectErrors, DocumentError> {
        let profile = match &self.profile {
            Some(p) => p.parse().map_err(DocumentError::Profile)?,
            None => ProfileVersion::legacy(),
        };
        if profile >= ProfileVersion::exit_code_default() {
            Ok(DetectErrors::ExitCode)
        } else {
            Ok(DetectErrors::Default)
        }
    }
}

impl StdioDef {
    fn rule_set(&self) -> Result<ToolRuleSet, DocumentError> {
        let exit_codes = self
            .exit_codes
            .iter()
            .enumerate()
            .map(|(index, def)| {
                let range = parse_exit_code_range(&def.range).map_err(|source| {
                    DocumentError::Rule {
                        section: "exit_codes",
                        index,
                        source,
                    }
                })?;
                let mut rule = ExitCodeRule::new(range, parse_level(def.level.as_deref()));
                rule.description = def.description.clone();
                Ok(rule)
            })
            .collect::<Result<Vec<_>, DocumentError>>()?;

        let regexes = self
            .regexes
            .iter()
            .enumerate()
            .map(|(index, def)| {
                let source = match &def.source {
                    Some(s) => parse_stream_source(s).map_err(|source| DocumentError::Rule {
                        section: "regexes",
                        index,
                        source,
                    })?,
                    None => StreamSource::BOTH,
                };
                let mut rule = OutputRegexRule::new(&def.pattern, parse_level(def.level.as_deref()))
                    .with_streams(source.stdout, source.stderr);
                rule.description = def.description.clone();
                Ok(rule)
            })
            .collect::<Result<Vec<_>, DocumentError>>()?;

        Ok(ToolRuleSet::new(exit_codes, regexes))
    }
}

/// Parse a rule level, falling back to fatal for absent or unknown levels.
fn parse_level(level: Option<&str>) -> Severity {
    match level {
        None => Severity::Fatal,
        Some(s) => s.parse().unwrap_or_else(|e| {
            tracing::warn!("{}; using fatal", e);
            Severity::Fatal
        }),
    }
}

/// Load a rule document from a JSON file.
pub fn load_rule_document(path: &Utf8Path) -> Result<RuleDocument, DocumentError> {
    let content = std::fs::read_to_string(path).map_err(|source| DocumentError::Io {
        path: path.to_owned(),
        source,
    })?;
    RuleDocument::from_json(&content)
}
