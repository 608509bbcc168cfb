//! Subcommand implementations.

use camino::Utf8Path;
use miette::{IntoDiagnostic, Result, WrapErr, miette};
use stdiocheck_classify::{Classification, Job, MemoryJob, check_output};
use stdiocheck_cli::{CheckArgs, OutputArgs, RunArgs, ValidateArgs};
use stdiocheck_core::ToolRuleSet;
use stdiocheck_jobs::{JobDir, JobRecord, run_command};
use stdiocheck_parsers::{RuleDocument, load_rule_document, parse_exit_code};
use tokio::process::Command;

/// Tool rules loaded from a rule document.
struct LoadedRules {
    tool_id: String,
    rules: ToolRuleSet,
}

fn load_rules(path: &Utf8Path) -> Result<LoadedRules> {
    let doc: RuleDocument = load_rule_document(path).into_diagnostic()?;
    let rules = doc.rule_set().into_diagnostic()?;
    let tool_id = doc
        .id
        .unwrap_or_else(|| path.file_stem().unwrap_or("tool").to_string());
    Ok(LoadedRules { tool_id, rules })
}

fn read_stream(path: Option<&Utf8Path>) -> Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path)
            .into_diagnostic()
            .wrap_err_with(|| format!("reading {}", path)),
        None => Ok(String::new()),
    }
}

fn read_exit_code_file(path: &Utf8Path) -> Option<i64> {
    match std::fs::read_to_string(path) {
        Ok(content) => parse_exit_code(&content),
        Err(e) => {
            tracing::warn!("Failed to read exit code file {}: {}", path, e);
            None
        }
    }
}

/// Classify, write streams back to the job, and report the state.
fn finish(
    loaded: &LoadedRules,
    output: &OutputArgs,
    stdout: &str,
    stderr: &str,
    exit_code: Option<i64>,
) -> Result<Classification> {
    let result = match &output.job_dir {
        Some(dir) => {
            let mut job = JobDir::new(dir.clone());
            let result = check_output(&loaded.rules, stdout, stderr, exit_code, &mut job);
            let record = JobRecord::new(job.id_tag(), exit_code, &result);
            job.save_record(&record).into_diagnostic()?;
            result
        }
        None => {
            let mut job = MemoryJob::new(loaded.tool_id.clone());
            check_output(&loaded.rules, stdout, stderr, exit_code, &mut job)
        }
    };

    if output.json {
        println!("{}", serde_json::to_string_pretty(&result).into_diagnostic()?);
    } else {
        println!("{}", result.state);
    }
    Ok(result)
}

pub fn check(args: &CheckArgs) -> Result<Classification> {
    let loaded = load_rules(&args.output.rules)?;
    let stdout = read_stream(args.stdout.as_deref())?;
    let stderr = read_stream(args.stderr.as_deref())?;
    let exit_code = match &args.exit_code_file {
        Some(path) => read_exit_code_file(path),
        None => args.exit_code,
    };
    finish(&loaded, &args.output, &stdout, &stderr, exit_code)
}

pub async fn run(args: &RunArgs) -> Result<Classification> {
    let loaded = load_rules(&args.output.rules)?;
    let (program, rest) = args
        .command
        .split_first()
        .ok_or_else(|| miette!("no command given"))?;

    let mut cmd = Command::new(program);
    cmd.args(rest);
    let output = run_command(&mut cmd, program).await.into_diagnostic()?;
    tracing::info!("{} exited with {:?}", program, output.exit_code);

    finish(
        &loaded,
        &args.output,
        &output.stdout,
        &output.stderr,
        output.exit_code,
    )
}

pub fn validate(args: &ValidateArgs) -> Result<()> {
    let loaded = load_rules(&args.rules)?;
    let invalid: Vec<String> = loaded
        .rules
        .invalid_patterns()
        .map(|e| e.to_string())
        .collect();
    if !invalid.is_empty() {
        for line in &invalid {
            eprintln!("{}", line);
        }
        return Err(miette!(
            "{}: {} invalid regex pattern(s)",
            loaded.tool_id,
            invalid.len()
        ));
    }
    println!(
        "{}: {} exit code rule(s), {} regex rule(s)",
        loaded.tool_id,
        loaded.rules.exit_codes.len(),
        loaded.rules.regexes.len()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;
    use stdiocheck_core::DetectedJobState;
    use tempfile::TempDir;

    fn write(dir: &Utf8Path, name: &str, content: &str) -> Utf8PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    fn output_args(rules: Utf8PathBuf, job_dir: Option<Utf8PathBuf>) -> OutputArgs {
        OutputArgs {
            rules,
            job_dir,
            json: false,
        }
    }

    #[test]
    fn test_check_with_exit_code_file() {
        let temp = TempDir::new().unwrap();
        let dir = Utf8Path::from_path(temp.path()).unwrap();
        let rules = write(dir, "tool.json", r#"{"detect_errors": "exit_code", "oom_exit_code": 42}"#);
        let ec = write(dir, "job.ec", "42\n");
        let job_dir = dir.join("job-1");

        let args = CheckArgs {
            output: output_args(rules, Some(job_dir.clone())),
            stdout: None,
            stderr: None,
            exit_code: None,
            exit_code_file: Some(ec),
        };
        let result = check(&args).unwrap();
        assert_eq!(result.state, DetectedJobState::OutOfMemoryError);

        let stored = JobDir::new(job_dir.clone()).load_record().unwrap().unwrap();
        assert_eq!(stored.id, "job-1");
        assert_eq!(stored.exit_code, Some(42));
        let stderr = std::fs::read_to_string(job_dir.join("stderr")).unwrap();
        assert!(stderr.starts_with("Out of memory error: Exit code 42 ()\n"));
    }

    #[test]
    fn test_check_legacy_stderr() {
        let temp = TempDir::new().unwrap();
        let dir = Utf8Path::from_path(temp.path()).unwrap();
        let rules = write(dir, "tool.json", "{}");
        let stderr = write(dir, "err.txt", "warning: something\n");

        let args = CheckArgs {
            output: output_args(rules, None),
            stdout: None,
            stderr: Some(stderr),
            exit_code: Some(0),
            exit_code_file: None,
        };
        let result = check(&args).unwrap();
        assert_eq!(result.state, DetectedJobState::GenericError);
        assert_eq!(result.stderr, "warning: something\n");
    }

    #[tokio::test]
    async fn test_run_command_is_checked() {
        let temp = TempDir::new().unwrap();
        let dir = Utf8Path::from_path(temp.path()).unwrap();
        let rules = write(dir, "tool.json", r#"{"detect_errors": "aggressive"}"#);

        let args = RunArgs {
            output: output_args(rules, None),
            command: vec![
                "sh".to_string(),
                "-c".to_string(),
                "echo 'Exception: bad input' >&2".to_string(),
            ],
        };
        let result = run(&args).await.unwrap();
        assert_eq!(result.state, DetectedJobState::GenericError);
        assert_eq!(result.messages.len(), 1);
    }

    #[test]
    fn test_validate_reports_bad_patterns() {
        let temp = TempDir::new().unwrap();
        let dir = Utf8Path::from_path(temp.path()).unwrap();

        let good = write(dir, "good.json", r#"{"stdio": {"regexes": [{"match": "error"}]}}"#);
        assert!(validate(&ValidateArgs { rules: good }).is_ok());

        let bad = write(dir, "bad.json", r#"{"stdio": {"regexes": [{"match": "(error"}]}}"#);
        assert!(validate(&ValidateArgs { rules: bad }).is_err());
    }
}
