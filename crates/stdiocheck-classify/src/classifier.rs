//! Exit-code and output-regex classification of finished jobs.
//!
//! Exit-code rules are evaluated first, then regex rules, each in declared
//! order. The running maximum severity decides the final state. Evaluation
//! stops as soon as the maximum reaches [`Severity::MAX`]; an out-of-memory
//! exit code therefore skips regex scanning entirely, while a merely fatal
//! one does not.
//!
//! Classification cannot fail. A rule that cannot be evaluated is logged and
//! contributes nothing.

use crate::annotate::MessageBuilder;
use crate::job::Job;
use serde::Serialize;
use stdiocheck_core::{
    DetectedJobState, JobMessage, OutputRegexRule, PatternMatch, Severity, Stream, ToolRuleSet,
};

/// Outcome of checking one job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Classification {
    pub state: DetectedJobState,
    /// Highest severity encountered.
    pub max_severity: Severity,
    pub stdout: String,
    pub stderr: String,
    /// Diagnostics in the order they were added.
    pub messages: Vec<JobMessage>,
}

/// Classify a job from its exit code and output.
///
/// `id_tag` only appears in log messages.
pub fn classify(
    rules: &ToolRuleSet,
    stdout: &str,
    stderr: &str,
    exit_code: Option<i64>,
    id_tag: &str,
) -> Classification {
    if rules.is_empty() {
        // No declared rules: any stderr output fails the job.
        let state = if stderr.is_empty() {
            DetectedJobState::Ok
        } else {
            DetectedJobState::GenericError
        };
        tracing::debug!("({}) no stdio rules declared, legacy state {}", id_tag, state);
        return Classification {
            state,
            max_severity: Severity::NoError,
            stdout: stdout.to_string(),
            stderr: stderr.to_string(),
            messages: Vec::new(),
        };
    }

    let mut pass = Evaluation::new(id_tag);
    if let Some(code) = exit_code {
        pass.check_exit_code(rules, code);
    }
    if pass.max_severity < Severity::MAX {
        pass.check_regexes(rules, stdout, stderr);
    }

    let max_severity = pass.max_severity;
    let state = DetectedJobState::from_severity(max_severity);
    let (stdout, stderr, messages) = pass.messages.finish(stdout, stderr);
    tracing::info!(
        "({}) job state {} (max level: {})",
        id_tag,
        state,
        max_severity.as_str()
    );

    Classification {
        state,
        max_severity,
        stdout,
        stderr,
        messages,
    }
}

/// Classify a job and write the annotated streams back to it.
pub fn check_output<J: Job + ?Sized>(
    rules: &ToolRuleSet,
    stdout: &str,
    stderr: &str,
    exit_code: Option<i64>,
    job: &mut J,
) -> Classification {
    let id_tag = job.id_tag();
    let result = classify(rules, stdout, stderr, exit_code, &id_tag);
    job.set_streams(&result.stdout, &result.stderr);
    result
}

/// State for a single classification pass.
struct Evaluation<'a> {
    id_tag: &'a str,
    max_severity: Severity,
    messages: MessageBuilder,
}

impl<'a> Evaluation<'a> {
    fn new(id_tag: &'a str) -> Self {
        Self {
            id_tag,
            max_severity: Severity::NoError,
            messages: MessageBuilder::new(),
        }
    }

    fn raise(&mut self, severity: Severity) {
        self.max_severity = self.max_severity.max(severity);
    }

    fn check_exit_code(&mut self, rules: &ToolRuleSet, exit_code: i64) {
        for rule in rules.exit_codes.iter().filter(|r| r.matches(exit_code)) {
            let code_desc = rule.description.clone().unwrap_or_default();
            let desc = format!(
                "{}: Exit code {} ({})",
                rule.severity.description(),
                exit_code,
                code_desc
            );
            tracing::debug!("({}) {}", self.id_tag, desc);
            self.messages.append_stderr_message(JobMessage::ExitCode {
                desc,
                exit_code,
                code_desc,
                error_level: rule.severity,
            });
            self.raise(rule.severity);
            if self.max_severity >= Severity::MAX {
                break;
            }
        }
    }

    fn check_regexes(&mut self, rules: &ToolRuleSet, stdout: &str, stderr: &str) {
        for rule in &rules.regexes {
            if rule.match_stdout {
                self.check_stream(rule, Stream::Stdout, stdout);
            }
            if rule.match_stderr {
                self.check_stream(rule, Stream::Stderr, stderr);
            }
            if self.max_severity >= Severity::MAX {
                break;
            }
        }
    }

    fn check_stream(&mut self, rule: &OutputRegexRule, stream: Stream, text: &str) {
        let found = match rule.find_last(text) {
            Ok(Some(found)) => found,
            Ok(None) => return,
            Err(e) => {
                tracing::warn!("({}) skipping {} rule: {}", self.id_tag, stream, e);
                return;
            }
        };
        let desc = regex_message(rule, &found);
        tracing::debug!("({}) {} {}", self.id_tag, stream, desc);
        let message = JobMessage::Regex {
            desc,
            stream,
            code_desc: rule.description.clone(),
            matched: found.quoted(),
            error_level: rule.severity,
        };
        match stream {
            Stream::Stdout => self.messages.append_stdout_message(message),
            Stream::Stderr => self.messages.append_stderr_message(message),
        }
        self.raise(rule.severity);
    }
}

fn regex_message(rule: &OutputRegexRule, found: &PatternMatch) -> String {
    match &rule.description {
        Some(description) => format!("{}: {}", rule.severity.description(), description),
        None => format!(
            "{}: Matched on {}",
            rule.severity.description(),
            found.quoted()
        ),
    }
}
