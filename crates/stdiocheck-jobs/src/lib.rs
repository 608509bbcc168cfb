//! Running tool commands and storing checked job output.

pub mod exec;
pub mod job_dir;

pub use exec::{CommandError, CommandOutput, run_command};
pub use job_dir::{JobDir, JobDirError, JobRecord};
