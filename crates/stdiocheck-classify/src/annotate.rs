//! Ordered diagnostics for one classification pass.

use stdiocheck_core::{JobMessage, Stream};

/// Start of the line separating added diagnostics from the original stream.
pub const SEPARATOR_PREFIX: &str = "### END of messages added by Galaxy AND START of original";

/// Collects diagnostics per stream in the order they are found.
#[derive(Debug, Clone, Default)]
pub struct MessageBuilder {
    stdout: Vec<String>,
    stderr: Vec<String>,
    messages: Vec<JobMessage>,
}

impl MessageBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append_stdout_message(&mut self, message: JobMessage) {
        self.stdout.push(message.desc().to_string());
        self.messages.push(message);
    }

    pub fn append_stderr_message(&mut self, message: JobMessage) {
        self.stderr.push(message.desc().to_string());
        self.messages.push(message);
    }

    /// Prepend accumulated diagnostics to the original streams.
    ///
    /// Returns `(stdout, stderr, messages)`. A stream with no diagnostics is
    /// returned unchanged.
    pub fn finish(self, stdout: &str, stderr: &str) -> (String, String, Vec<JobMessage>) {
        (
            prepend(&self.stdout, stdout, Stream::Stdout),
            prepend(&self.stderr, stderr, Stream::Stderr),
            self.messages,
        )
    }
}

fn prepend(lines: &[String], original: &str, stream: Stream) -> String {
    if lines.is_empty() {
        return original.to_string();
    }
    format!(
        "{}\n{} {}\n{}",
        lines.join("\n"),
        SEPARATOR_PREFIX,
        stream,
        original
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use stdiocheck_core::Severity;

    fn exit_message(desc: &str) -> JobMessage {
        JobMessage::ExitCode {
            desc: desc.to_string(),
            exit_code: 1,
            code_desc: String::new(),
            error_level: Severity::Fatal,
        }
    }

    #[test]
    fn test_empty_builder_leaves_streams_alone() {
        let (stdout, stderr, messages) = MessageBuilder::new().finish("out\n", "err\n");
        assert_eq!(stdout, "out\n");
        assert_eq!(stderr, "err\n");
        assert!(messages.is_empty());
    }

    #[test]
    fn test_prepends_with_separator() {
        let mut builder = MessageBuilder::new();
        builder.append_stderr_message(exit_message("first"));
        builder.append_stderr_message(exit_message("second"));
        let (stdout, stderr, messages) = builder.finish("out", "err");

        assert_eq!(stdout, "out");
        assert_eq!(
            stderr,
            "first\nsecond\n### END of messages added by Galaxy AND START of original stderr\nerr"
        );
        assert_eq!(messages.len(), 2);
    }

    #[test]
    fn test_stdout_message_leaves_stderr_alone() {
        let mut builder = MessageBuilder::new();
        builder.append_stdout_message(JobMessage::Regex {
            desc: "Warning: Matched on x".to_string(),
            stream: Stream::Stdout,
            code_desc: None,
            matched: "x".to_string(),
            error_level: Severity::Warning,
        });
        let (stdout, stderr, _) = builder.finish("", "");
        assert!(stdout.starts_with("Warning: Matched on x\n"));
        assert!(stdout.ends_with("original stdout\n"));
        assert_eq!(stderr, "");
    }
}
