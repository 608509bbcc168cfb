//! Built-in rule sets for tools that declare `detect_errors` instead of rules.

use once_cell::sync::Lazy;
use stdiocheck_core::{ExitCodeRange, ExitCodeRule, OutputRegexRule, Severity, ToolRuleSet};

/// Messages that indicate the process ran out of memory.
const OOM_MARKERS: [&str; 4] = [
    "MemoryError",
    "std::bad_alloc",
    "java.lang.OutOfMemoryError",
    "Out of memory",
];

/// Line prefixes treated as fatal by aggressive checking.
const ERROR_PREFIXES: [&str; 2] = ["exception:", "error:"];

static EXIT_CODE_RULES: Lazy<ToolRuleSet> = Lazy::new(|| {
    ToolRuleSet::new(
        vec![
            ExitCodeRule::new(ExitCodeRange::new(None, Some(-1)), Severity::Fatal),
            ExitCodeRule::new(ExitCodeRange::new(Some(1), None), Severity::Fatal),
        ],
        vec![],
    )
});

static AGGRESSIVE_RULES: Lazy<ToolRuleSet> = Lazy::new(|| {
    let oom = OOM_MARKERS
        .iter()
        .map(|m| OutputRegexRule::new(regex::escape(m), Severity::FatalOutOfMemory));
    let errors = ERROR_PREFIXES
        .iter()
        .map(|p| OutputRegexRule::new(format!("^{}", regex::escape(p)), Severity::Fatal));
    ToolRuleSet::new(EXIT_CODE_RULES.exit_codes.clone(), oom.chain(errors).collect())
});

fn with_oom_exit_code(mut rules: ToolRuleSet, oom_exit_code: Option<i64>) -> ToolRuleSet {
    if let Some(code) = oom_exit_code {
        rules.exit_codes.insert(
            0,
            ExitCodeRule::new(ExitCodeRange::single(code), Severity::FatalOutOfMemory),
        );
    }
    rules
}

/// Any non-zero exit code is fatal.
///
/// When `oom_exit_code` is set, that code is checked first and classified as
/// out of memory.
pub fn error_on_exit_code(oom_exit_code: Option<i64>) -> ToolRuleSet {
    with_oom_exit_code(EXIT_CODE_RULES.clone(), oom_exit_code)
}

/// Exit-code checking plus common out-of-memory and error messages on
/// either stream.
pub fn aggressive_error_checks(oom_exit_code: Option<i64>) -> ToolRuleSet {
    with_oom_exit_code(AGGRESSIVE_RULES.clone(), oom_exit_code)
}
