//! oz-runner - parallel Hardhat test dispatcher
//!
//! Runs every `*.test.js` file of a Hardhat project as its own
//! `npx hardhat test <file>` process, at most `--jobs` at a time.
//!
//! ## Features
//!
//! - Validates `NETWORK_ID`, `PROXY_URL` and `NESTED_ACCOUNTS` before any work
//! - Round-robin distribution of credential sets through `PRIVATE_KEYS`
//! - Per-file stdout/stderr logs under `results/`
//! - Run summary as table or JSON, saved to `results/summary.json`
//!
//! ## Usage
//!
//! ```bash
//! export NETWORK_ID=111
//! export PROXY_URL=http://127.0.0.1:9090/solana
//! export NESTED_ACCOUNTS='[["0xabc","0xdef"],["0x123"]]'
//!
//! # Run the suite in 8 jobs
//! oz-runner --jobs 8
//!
//! # Fail the run if any test file fails
//! oz-runner -j 8 --fail-on-error --format json
//! ```

use anyhow::Result;
use clap::Parser;
use tracing::{info, warn};

mod cli;
mod config;
mod discovery;
mod executor;
mod models;
mod output;
mod results;
mod utils;

use cli::Args;
use config::{EnvConfig, RunnerConfig};
use executor::{CredentialPool, JobRunner, ParallelExecutor};
use models::RunSummary;
use output::{OutputFormat, ResultFormatter};
use results::{EnvironmentInfo, ResultsStorage, StoredRun};
use utils::{init_logger, LogLevel};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    init_logger(LogLevel::resolve(args.log_level.as_deref(), args.verbose));

    let env = EnvConfig::load()?;

    let summary = run(&args, env).await?;

    let mut formatter =
        ResultFormatter::new(OutputFormat::from_str(&args.format).unwrap_or(OutputFormat::Table));
    if args.no_color {
        formatter = formatter.no_color();
    }
    println!("{}", formatter.format_summary(&summary));

    if args.fail_on_error && !summary.is_all_passed() {
        anyhow::bail!(
            "{} of {} test files did not pass",
            summary.total - summary.passed,
            summary.total
        );
    }

    Ok(())
}

async fn run(args: &Args, env: EnvConfig) -> Result<RunSummary> {
    let project_dir = args.project_dir.as_path();

    let mut config = match &args.config {
        Some(path) => RunnerConfig::load(path)?,
        None => RunnerConfig::load_default(project_dir)?,
    };
    args.apply_overrides(&mut config);
    config.validate()?;

    info!("Running OpenZeppelin tests in {} jobs", args.jobs());
    info!(
        "Network {} via {} with {} credential sets",
        env.network_id,
        env.proxy_url,
        env.credentials.len()
    );

    let storage = ResultsStorage::new(project_dir.join(&config.results_dir));
    storage.ensure_dir()?;

    match storage.copy_manifest(&project_dir.join(&config.manifest), &config.manifest_copy_name) {
        Ok(path) => info!("Copied package manifest to {}", path.display()),
        Err(e) => warn!("{:#}", e),
    }

    let targets = discovery::discover_targets(project_dir, &config.test_dir, &config.pattern)?;
    let pool = CredentialPool::new(env.credentials);

    let runner = JobRunner::new(config.command.clone(), project_dir, storage.clone())
        .with_echo(!args.quiet);
    let executor = ParallelExecutor::new(args.jobs(), runner);

    let summary = executor.run_all(targets, pool).await;

    for failed in summary.failures() {
        warn!("{}", failed);
    }

    let stored = StoredRun {
        environment: EnvironmentInfo::new(&config.command),
        summary,
    };
    if let Err(e) = storage.save_summary(&stored) {
        warn!("Could not save run summary: {:#}", e);
    }

    Ok(stored.summary)
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::models::{CredentialSet, JobStatus};
    use crate::results::storage::{STDOUT_LOG, SUMMARY_FILE};
    use std::fs;
    use std::io::BufReader;
    use std::path::Path;
    use tempfile::tempdir;

    fn env() -> EnvConfig {
        EnvConfig {
            network_id: "111".to_string(),
            proxy_url: "http://127.0.0.1:9090/solana".to_string(),
            credentials: CredentialSet::from_nested(vec![
                vec!["0xaa".to_string()],
                vec!["0xbb".to_string(), "0xcc".to_string()],
            ]),
        }
    }

    fn project(root: &Path) {
        for rel in ["test/a.t.js", "test/sub/b.t.js", "test/c.test.js"] {
            let path = root.join(rel);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, "// test").unwrap();
        }
        fs::write(
            root.join("oz-runner.json"),
            r#"{
                "command": ["sh", "-c", "echo \"$PRIVATE_KEYS\"", "sh"],
                "pattern": ".t.js",
                "results_dir": "from-config"
            }"#,
        )
        .unwrap();
    }

    fn load_stored(path: &Path) -> StoredRun {
        let file = fs::File::open(path).unwrap();
        serde_json::from_reader(BufReader::new(file)).unwrap()
    }

    #[tokio::test]
    async fn test_run_combines_config_file_and_flags() {
        let dir = tempdir().unwrap();
        project(dir.path());

        let args = Args::parse_from([
            "oz-runner",
            "-j",
            "2",
            "--quiet",
            "--project-dir",
            dir.path().to_str().unwrap(),
            "--results-dir",
            "out",
        ]);

        let summary = run(&args, env()).await.unwrap();

        // Pattern and command come from the file, the results dir from the flag
        assert_eq!(summary.total, 2);
        assert_eq!(summary.passed, 2);
        assert!(!dir.path().join("from-config").exists());

        let results = dir.path().join("out");
        assert_eq!(
            fs::read_to_string(results.join("test_a_t_js").join(STDOUT_LOG)).unwrap(),
            "0xaa\n"
        );
        assert_eq!(
            fs::read_to_string(results.join("test_sub_b_t_js").join(STDOUT_LOG)).unwrap(),
            "0xbb,0xcc\n"
        );

        // No package.json: the copy is skipped and the run still completes
        assert!(!results.join("openzeppelin-package.json").exists());

        let stored = load_stored(&results.join(SUMMARY_FILE));
        assert_eq!(stored.summary.total, 2);
        assert_eq!(stored.summary.jobs, 2);
        assert_eq!(stored.environment.command[0], "sh");
        assert!(stored
            .summary
            .results
            .iter()
            .all(|r| r.status == JobStatus::Pass));
    }

    #[tokio::test]
    async fn test_run_copies_manifest_and_records_failures() {
        let dir = tempdir().unwrap();
        project(dir.path());
        fs::write(dir.path().join("package.json"), r#"{"name":"openzeppelin-solidity"}"#).unwrap();

        let args = Args::parse_from([
            "oz-runner",
            "-j",
            "1",
            "--quiet",
            "--project-dir",
            dir.path().to_str().unwrap(),
            "--command",
            "false",
        ]);

        let summary = run(&args, env()).await.unwrap();
        assert_eq!(summary.total, 2);
        assert_eq!(summary.failed, 2);
        assert!(!summary.is_all_passed());

        let results = dir.path().join("from-config");
        assert_eq!(
            fs::read_to_string(results.join("openzeppelin-package.json")).unwrap(),
            r#"{"name":"openzeppelin-solidity"}"#
        );
        assert_eq!(load_stored(&results.join(SUMMARY_FILE)).summary.failed, 2);
    }
}
