//! Test target and job result models
//!
//! Defines discovered targets, per-job outcomes and the run summary.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// A single discovered test file, relative to the project directory
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TestTarget {
    path: PathBuf,
}

impl TestTarget {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Directory name for this target's logs under the results root
    pub fn log_dir_name(&self) -> String {
        sanitize_target_path(&self.path.to_string_lossy())
    }
}

impl fmt::Display for TestTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path.display())
    }
}

/// Flatten a target path into a single directory name.
///
/// Every `/`, `\` and `.` becomes `_`, so `test/sub/dir/foo.test.js` maps to
/// `test_sub_dir_foo_test_js`. Paths that differ only in those characters or a
/// literal `_` share a name; discovery warns about such pairs.
pub fn sanitize_target_path(path: &str) -> String {
    path.chars()
        .map(|c| match c {
            '/' | '\\' | '.' => '_',
            c => c,
        })
        .collect()
}

/// Job execution status
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    /// Runner exited with code 0
    Pass,
    /// Runner exited non-zero or was killed by a signal
    Fail,
    /// The job never produced an exit status (spawn or log write failed)
    Error,
}

impl JobStatus {
    pub fn symbol(&self) -> &'static str {
        match self {
            JobStatus::Pass => "✓",
            JobStatus::Fail => "✗",
            JobStatus::Error => "!",
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, JobStatus::Pass)
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobStatus::Pass => write!(f, "PASS"),
            JobStatus::Fail => write!(f, "FAIL"),
            JobStatus::Error => write!(f, "ERROR"),
        }
    }
}

/// Outcome of one runner invocation against one target
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct JobResult {
    pub target: TestTarget,
    pub status: JobStatus,
    pub exit_code: Option<i32>,
    pub credential_slot: Option<usize>,
    pub started_at: DateTime<Utc>,
    pub duration_ms: u64,
    pub log_dir: Option<PathBuf>,
    pub message: Option<String>,
}

impl JobResult {
    /// Build a result from a finished process. Its output lives in the
    /// target's log directory, not in the result.
    pub fn finished(
        target: TestTarget,
        exit_code: Option<i32>,
        started_at: DateTime<Utc>,
        duration_ms: u64,
    ) -> Self {
        let status = match exit_code {
            Some(0) => JobStatus::Pass,
            _ => JobStatus::Fail,
        };
        let message = match exit_code {
            Some(0) => None,
            Some(code) => Some(format!("exited with code {code}")),
            None => Some("terminated by signal".to_string()),
        };

        Self {
            target,
            status,
            exit_code,
            credential_slot: None,
            started_at,
            duration_ms,
            log_dir: None,
            message,
        }
    }

    pub fn error(target: TestTarget, error: impl Into<String>) -> Self {
        Self {
            target,
            status: JobStatus::Error,
            exit_code: None,
            credential_slot: None,
            started_at: Utc::now(),
            duration_ms: 0,
            log_dir: None,
            message: Some(error.into()),
        }
    }

    pub fn with_credential_slot(mut self, slot: usize) -> Self {
        self.credential_slot = Some(slot);
        self
    }

    pub fn with_log_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.log_dir = Some(dir.into());
        self
    }
}

impl fmt::Display for JobResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} [{}ms]",
            self.status.symbol(),
            self.target,
            self.duration_ms
        )?;
        if let Some(msg) = &self.message {
            write!(f, " - {msg}")?;
        }
        Ok(())
    }
}

/// Summary of a full dispatch run
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RunSummary {
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
    pub jobs: usize,
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub errors: usize,
    pub total_duration_ms: u64,
    pub results: Vec<JobResult>,
}

impl RunSummary {
    pub fn new(jobs: usize, started_at: DateTime<Utc>, results: Vec<JobResult>) -> Self {
        let total = results.len();
        let passed = results
            .iter()
            .filter(|r| r.status == JobStatus::Pass)
            .count();
        let failed = results
            .iter()
            .filter(|r| r.status == JobStatus::Fail)
            .count();
        let errors = results
            .iter()
            .filter(|r| r.status == JobStatus::Error)
            .count();
        let completed_at = Utc::now();
        let total_duration_ms = (completed_at - started_at).num_milliseconds().max(0) as u64;

        Self {
            started_at,
            completed_at,
            jobs,
            total,
            passed,
            failed,
            errors,
            total_duration_ms,
            results,
        }
    }

    pub fn pass_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            (self.passed as f64 / self.total as f64) * 100.0
        }
    }

    pub fn is_all_passed(&self) -> bool {
        self.passed == self.total
    }

    pub fn failures(&self) -> impl Iterator<Item = &JobResult> {
        self.results.iter().filter(|r| !r.status.is_success())
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Test run with {} jobs", self.jobs)?;
        writeln!(f, "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━")?;
        for result in &self.results {
            writeln!(f, "  {result}")?;
        }
        writeln!(f, "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━")?;
        writeln!(
            f,
            "Total: {} | Pass: {} | Fail: {} | Error: {}",
            self.total, self.passed, self.failed, self.errors
        )?;
        writeln!(
            f,
            "Pass Rate: {:.1}% | Duration: {}ms",
            self.pass_rate(),
            self.total_duration_ms
        )
    }
}
