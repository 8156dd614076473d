//! Results storage
//!
//! Lays out the results root: one log directory per target, a copy of the
//! project manifest, and a JSON summary of the run.

#![allow(dead_code)]

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::models::{RunSummary, TestTarget};

pub const STDOUT_LOG: &str = "stdout.log";
pub const STDERR_LOG: &str = "stderr.log";
pub const SUMMARY_FILE: &str = "summary.json";

/// Environment information
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EnvironmentInfo {
    /// Operating system
    pub os: String,

    /// Architecture
    pub arch: String,

    /// Tool version
    pub tool_version: String,

    /// Runner command line, without the target
    pub command: Vec<String>,
}

impl EnvironmentInfo {
    pub fn new(command: &[String]) -> Self {
        Self {
            os: std::env::consts::OS.to_string(),
            arch: std::env::consts::ARCH.to_string(),
            tool_version: env!("CARGO_PKG_VERSION").to_string(),
            command: command.to_vec(),
        }
    }
}

/// Summary file contents
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StoredRun {
    pub environment: EnvironmentInfo,
    pub summary: RunSummary,
}

/// Results storage manager
#[derive(Clone, Debug)]
pub struct ResultsStorage {
    /// Base directory for results
    base_dir: PathBuf,
}

impl ResultsStorage {
    /// Create a new results storage
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Ensure storage directory exists, creating parents as needed
    pub fn ensure_dir(&self) -> Result<()> {
        fs::create_dir_all(&self.base_dir).with_context(|| {
            format!("Failed to create results directory: {}", self.base_dir.display())
        })?;
        Ok(())
    }

    /// Log directory for a target
    pub fn log_dir(&self, target: &TestTarget) -> PathBuf {
        self.base_dir.join(target.log_dir_name())
    }

    /// Copy the project manifest into the results root under `copy_name`
    pub fn copy_manifest(&self, manifest: &Path, copy_name: &str) -> Result<PathBuf> {
        let dest = self.base_dir.join(copy_name);
        fs::copy(manifest, &dest).with_context(|| {
            format!("Failed to copy {} to {}", manifest.display(), dest.display())
        })?;

        debug!("Copied {} to {}", manifest.display(), dest.display());
        Ok(dest)
    }

    /// Write a job's captured output, returning the log directory
    pub async fn write_job_logs(
        &self,
        target: &TestTarget,
        stdout: &str,
        stderr: &str,
    ) -> Result<PathBuf> {
        let dir = self.log_dir(target);
        tokio::fs::create_dir_all(&dir)
            .await
            .with_context(|| format!("Failed to create log directory: {}", dir.display()))?;

        tokio::fs::write(dir.join(STDOUT_LOG), stdout)
            .await
            .context("Failed to write stdout log")?;
        tokio::fs::write(dir.join(STDERR_LOG), stderr)
            .await
            .context("Failed to write stderr log")?;

        debug!("Wrote logs for {} to {}", target, dir.display());
        Ok(dir)
    }

    /// Save the run summary
    pub fn save_summary(&self, run: &StoredRun) -> Result<PathBuf> {
        self.ensure_dir()?;

        let path = self.base_dir.join(SUMMARY_FILE);
        let file = File::create(&path).context("Failed to create summary file")?;
        let writer = BufWriter::new(file);

        serde_json::to_writer_pretty(writer, run).context("Failed to write summary")?;

        info!("Saved run summary to {}", path.display());
        Ok(path)
    }
}
