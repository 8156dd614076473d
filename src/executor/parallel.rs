//! Parallel test execution
//!
//! Dispatches every target onto a bounded set of concurrent jobs.

#![allow(dead_code)]

use chrono::Utc;
use futures::future::join_all;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{error, info};

use super::pool::CredentialPool;
use super::runner::JobRunner;
use crate::models::{JobResult, RunSummary, TestTarget};

/// Parallel job executor
pub struct ParallelExecutor {
    max_concurrent: usize,
    runner: Arc<JobRunner>,
}

impl ParallelExecutor {
    pub fn new(max_concurrent: usize, runner: JobRunner) -> Self {
        Self {
            max_concurrent: max_concurrent.max(1),
            runner: Arc::new(runner),
        }
    }

    pub fn max_concurrent(&self) -> usize {
        self.max_concurrent
    }

    /// Run every target and wait for all of them.
    ///
    /// Targets are dispatched in order: each waits for a free job slot, then
    /// for the next credential set, before its job is spawned. A failing job
    /// never stops the others.
    pub async fn run_all(&self, targets: Vec<TestTarget>, pool: Arc<CredentialPool>) -> RunSummary {
        info!(
            "Running {} test files in {} jobs with {} credential sets",
            targets.len(),
            self.max_concurrent,
            pool.len()
        );

        let started_at = Utc::now();
        let semaphore = Arc::new(Semaphore::new(self.max_concurrent));
        let mut handles = Vec::with_capacity(targets.len());

        for target in targets {
            let permit = match Arc::clone(&semaphore).acquire_owned().await {
                Ok(permit) => permit,
                Err(e) => {
                    error!("Worker pool closed: {}", e);
                    break;
                }
            };
            let lease = pool.checkout().await;
            let runner = Arc::clone(&self.runner);
            let job_target = target.clone();

            let handle = tokio::spawn(async move {
                let _permit = permit;
                runner.run(job_target, lease).await
            });

            handles.push((target, handle));
        }

        let (targets, handles): (Vec<_>, Vec<_>) = handles.into_iter().unzip();
        let results: Vec<JobResult> = join_all(handles)
            .await
            .into_iter()
            .zip(targets)
            .map(|(joined, target)| match joined {
                Ok(result) => result,
                Err(e) => {
                    error!("Job for {} panicked: {}", target, e);
                    JobResult::error(target, format!("job task failed: {e}"))
                }
            })
            .collect();

        let summary = RunSummary::new(self.max_concurrent, started_at, results);

        info!(
            "Parallel execution completed in {}ms - Pass: {}/{} ({:.1}%)",
            summary.total_duration_ms,
            summary.passed,
            summary.total,
            summary.pass_rate()
        );

        summary
    }
}
