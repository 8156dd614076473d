//! Single job execution
//!
//! Runs the test runner against one target with an injected credential set,
//! captures its output, and writes the per-target logs.

use chrono::Utc;
use std::io::Write;
use std::path::PathBuf;
use std::process::{Output, Stdio};
use thiserror::Error;
use tokio::process::Command;
use tracing::{debug, error, info, warn};

use super::pool::CredentialLease;
use crate::config::env::PRIVATE_KEYS;
use crate::models::{CredentialSet, JobResult, TestTarget};
use crate::results::ResultsStorage;
use crate::utils::Timer;

/// Errors that end a single job without an exit status
#[derive(Error, Debug)]
pub enum JobError {
    #[error("Runner command is empty")]
    EmptyCommand,

    #[error("Failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write logs: {0:#}")]
    Logs(anyhow::Error),
}

/// Runs one target at a time
#[derive(Clone, Debug)]
pub struct JobRunner {
    command: Vec<String>,
    project_dir: PathBuf,
    storage: ResultsStorage,
    echo_output: bool,
}

impl JobRunner {
    pub fn new(command: Vec<String>, project_dir: impl Into<PathBuf>, storage: ResultsStorage) -> Self {
        Self {
            command,
            project_dir: project_dir.into(),
            storage,
            echo_output: true,
        }
    }

    /// Print captured stdout/stderr to the console after each job
    pub fn with_echo(mut self, echo: bool) -> Self {
        self.echo_output = echo;
        self
    }

    /// Run a target. Failures are folded into the returned result.
    pub async fn run(&self, target: TestTarget, lease: CredentialLease) -> JobResult {
        let slot = lease.slot();

        match self.try_run(&target, lease).await {
            Ok(result) => result,
            Err(e) => {
                error!("Test {} failed with error: {}", target, e);
                JobResult::error(target, e.to_string()).with_credential_slot(slot)
            }
        }
    }

    async fn try_run(&self, target: &TestTarget, lease: CredentialLease) -> Result<JobResult, JobError> {
        info!("Run {}", target);
        debug!("{} uses {}", target, lease.credentials());

        let started_at = Utc::now();
        let timer = Timer::start(target.to_string());

        let output = self.execute(target, lease.credentials()).await;
        let slot = lease.slot();
        drop(lease);
        let output = output?;

        let duration_ms = timer.stop();
        let exit_code = output.status.code();
        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

        match exit_code {
            Some(code) => info!("Test {} finished with code {}", target, code),
            None => warn!("Test {} terminated by signal", target),
        }

        if self.echo_output {
            echo(&stdout, &stderr);
        }

        let log_dir = self
            .storage
            .write_job_logs(target, &stdout, &stderr)
            .await
            .map_err(JobError::Logs)?;

        Ok(
            JobResult::finished(target.clone(), exit_code, started_at, duration_ms)
                .with_credential_slot(slot)
                .with_log_dir(log_dir),
        )
    }

    async fn execute(&self, target: &TestTarget, credentials: &CredentialSet) -> Result<Output, JobError> {
        let (program, args) = self.command.split_first().ok_or(JobError::EmptyCommand)?;

        Command::new(program)
            .args(args)
            .arg(target.path())
            .current_dir(&self.project_dir)
            .env(PRIVATE_KEYS, credentials.joined())
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|source| JobError::Spawn {
                program: program.clone(),
                source,
            })
    }
}

/// Print a job's output as one block so concurrent jobs don't interleave
fn echo(stdout: &str, stderr: &str) {
    let mut out = std::io::stdout().lock();
    let _ = writeln!(out, "{stdout}");
    let _ = writeln!(out, "{stderr}");
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::executor::CredentialPool;
    use crate::models::JobStatus;
    use crate::results::storage::{STDERR_LOG, STDOUT_LOG};
    use std::fs;
    use tempfile::tempdir;

    fn stub(script: &str) -> Vec<String> {
        vec![
            "sh".to_string(),
            "-c".to_string(),
            script.to_string(),
            "sh".to_string(),
        ]
    }

    fn pool() -> std::sync::Arc<CredentialPool> {
        CredentialPool::new(vec![CredentialSet::new(
            0,
            vec!["0xaa".to_string(), "0xbb".to_string()],
        )])
    }

    #[tokio::test]
    async fn test_run_passes_keys_and_writes_logs() {
        let dir = tempdir().unwrap();
        let storage = ResultsStorage::new(dir.path().join("results"));
        let runner = JobRunner::new(
            stub(r#"echo "keys=$PRIVATE_KEYS target=$1"; echo oops >&2"#),
            dir.path(),
            storage,
        )
        .with_echo(false);

        let pool = pool();
        let target = TestTarget::new("test/a.test.js");
        let result = runner.run(target, pool.checkout().await).await;

        assert_eq!(result.status, JobStatus::Pass);
        assert_eq!(result.exit_code, Some(0));
        assert_eq!(result.credential_slot, Some(0));
        assert_eq!(pool.len(), 1);

        let log_dir = result.log_dir.unwrap();
        assert!(log_dir.ends_with("test_a_test_js"));
        assert_eq!(
            fs::read_to_string(log_dir.join(STDOUT_LOG)).unwrap(),
            "keys=0xaa,0xbb target=test/a.test.js\n"
        );
        assert_eq!(fs::read_to_string(log_dir.join(STDERR_LOG)).unwrap(), "oops\n");
    }

    #[tokio::test]
    async fn test_nonzero_exit_is_failure() {
        let dir = tempdir().unwrap();
        let storage = ResultsStorage::new(dir.path().join("results"));
        let runner = JobRunner::new(stub("echo failing; exit 3"), dir.path(), storage).with_echo(false);

        let pool = pool();
        let result = runner
            .run(TestTarget::new("test/b.test.js"), pool.checkout().await)
            .await;

        assert_eq!(result.status, JobStatus::Fail);
        assert_eq!(result.exit_code, Some(3));
        assert!(result.log_dir.unwrap().join(STDOUT_LOG).is_file());
        assert_eq!(pool.len(), 1);
    }

    #[tokio::test]
    async fn test_spawn_failure_returns_credentials() {
        let dir = tempdir().unwrap();
        let storage = ResultsStorage::new(dir.path().join("results"));
        let runner = JobRunner::new(
            vec!["/nonexistent/oz-runner-stub".to_string()],
            dir.path(),
            storage,
        )
        .with_echo(false);

        let pool = pool();
        let result = runner
            .run(TestTarget::new("test/c.test.js"), pool.checkout().await)
            .await;

        assert_eq!(result.status, JobStatus::Error);
        assert!(result.message.unwrap().contains("/nonexistent/oz-runner-stub"));
        assert_eq!(result.credential_slot, Some(0));
        assert_eq!(pool.len(), 1);
    }

    #[tokio::test]
    async fn test_empty_command() {
        let dir = tempdir().unwrap();
        let storage = ResultsStorage::new(dir.path().join("results"));
        let runner = JobRunner::new(Vec::new(), dir.path(), storage).with_echo(false);

        let pool = pool();
        let result = runner
            .run(TestTarget::new("test/d.test.js"), pool.checkout().await)
            .await;

        assert_eq!(result.status, JobStatus::Error);
        assert_eq!(pool.len(), 1);
    }
}
