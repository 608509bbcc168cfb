//! CLI argument parsing for stdiocheck.

use camino::Utf8PathBuf;
use clap::{Args as ClapArgs, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "stdiocheck")]
#[command(about = "Classify finished tool jobs from exit codes and output")]
pub struct Args {
    /// Default log level when RUST_LOG is not set
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Check the captured output of a finished job
    Check(CheckArgs),
    /// Run a command and check its output
    Run(RunArgs),
    /// Report rule patterns that do not compile
    Validate(ValidateArgs),
}

/// Options shared by commands that produce a job state.
#[derive(ClapArgs, Debug)]
pub struct OutputArgs {
    /// Tool rule document (JSON)
    #[arg(long)]
    pub rules: Utf8PathBuf,

    /// Write annotated streams and job.json to this directory
    #[arg(long)]
    pub job_dir: Option<Utf8PathBuf>,

    /// Print a JSON report instead of the state name
    #[arg(long)]
    pub json: bool,
}

#[derive(ClapArgs, Debug)]
pub struct CheckArgs {
    #[command(flatten)]
    pub output: OutputArgs,

    /// File holding the job's stdout
    #[arg(long)]
    pub stdout: Option<Utf8PathBuf>,

    /// File holding the job's stderr
    #[arg(long)]
    pub stderr: Option<Utf8PathBuf>,

    /// Exit code reported by the job
    #[arg(long, allow_hyphen_values = true, conflicts_with = "exit_code_file")]
    pub exit_code: Option<i64>,

    /// File holding the job's exit code
    #[arg(long)]
    pub exit_code_file: Option<Utf8PathBuf>,
}

#[derive(ClapArgs, Debug)]
pub struct RunArgs {
    #[command(flatten)]
    pub output: OutputArgs,

    /// Program and arguments to run
    #[arg(last = true, required = true)]
    pub command: Vec<String>,
}

#[derive(ClapArgs, Debug)]
pub struct ValidateArgs {
    /// Tool rule document (JSON)
    #[arg(long)]
    pub rules: Utf8PathBuf,
}
