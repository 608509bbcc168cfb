use camino::{Utf8Path, Utf8PathBuf};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use stdiocheck_classify::{Classification, Job};
use stdiocheck_core::{DetectedJobState, JobMessage};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum JobDirError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Summary of a checked job, stored as `job.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobRecord {
    pub id: String,
    pub state: DetectedJobState,
    pub exit_code: Option<i64>,
    #[serde(default)]
    pub messages: Vec<JobMessage>,
    pub finished_at: DateTime<Utc>,
}

impl JobRecord {
    pub fn new(id: String, exit_code: Option<i64>, result: &Classification) -> Self {
        Self {
            id,
            state: result.state,
            exit_code,
            messages: result.messages.clone(),
            finished_at: Utc::now(),
        }
    }
}

/// Directory holding a job's annotated `stdout`, `stderr` and `job.json`.
pub struct JobDir {
    path: Utf8PathBuf,
    id: Option<String>,
}

impl JobDir {
    pub fn new(path: impl Into<Utf8PathBuf>) -> Self {
        Self {
            path: path.into(),
            id: None,
        }
    }

    /// Use an explicit id tag instead of the directory name.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn stdout_path(&self) -> Utf8PathBuf {
        self.path.join("stdout")
    }

    pub fn stderr_path(&self) -> Utf8PathBuf {
        self.path.join("stderr")
    }

    pub fn record_path(&self) -> Utf8PathBuf {
        self.path.join("job.json")
    }

    fn write_streams(&self, stdout: &str, stderr: &str) -> Result<(), JobDirError> {
        fs::create_dir_all(&self.path)?;
        fs::write(self.stdout_path(), stdout)?;
        fs::write(self.stderr_path(), stderr)?;
        Ok(())
    }

    /// Save the job record.
    ///
    /// Creates the directory if needed.
    pub fn save_record(&self, record: &JobRecord) -> Result<(), JobDirError> {
        fs::create_dir_all(&self.path)?;
        let content = serde_json::to_string_pretty(record)?;
        fs::write(self.record_path(), content)?;
        Ok(())
    }

    /// Load the job record.
    ///
    /// Returns None if no record has been saved.
    pub fn load_record(&self) -> Result<Option<JobRecord>, JobDirError> {
        let path = self.record_path();
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&path)?;
        Ok(Some(serde_json::from_str(&content)?))
    }
}

impl Job for JobDir {
    fn id_tag(&self) -> String {
        match (&self.id, self.path.file_name()) {
            (Some(id), _) => id.clone(),
            (None, Some(name)) => name.to_string(),
            (None, None) => self.path.to_string(),
        }
    }

    fn set_streams(&mut self, stdout: &str, stderr: &str) {
        if let Err(e) = self.write_streams(stdout, stderr) {
            tracing::warn!("Failed to write streams to {}: {}", self.path, e);
        }
    }
}
