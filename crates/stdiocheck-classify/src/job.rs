//! Job handle that receives annotated output.

/// A finished job whose streams are being checked.
pub trait Job {
    /// Identifier used in log messages.
    fn id_tag(&self) -> String;

    /// Store the (possibly annotated) output streams.
    ///
    /// Implementations absorb their own storage failures.
    fn set_streams(&mut self, stdout: &str, stderr: &str);
}

/// Job that keeps its streams in memory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryJob {
    pub id: String,
    pub stdout: String,
    pub stderr: String,
}

impl MemoryJob {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }
}

impl Job for MemoryJob {
    fn id_tag(&self) -> String {
        self.id.clone()
    }

    fn set_streams(&mut self, stdout: &str, stderr: &str) {
        self.stdout = stdout.to_string();
        self.stderr = stderr.to_string();
    }
}
