//! CLI argument parsing
//!
//! Defines command-line interface using clap.

use clap::Parser;
use std::path::PathBuf;

use crate::config::env::ENV_HELP;
use crate::config::RunnerConfig;

/// Run Hardhat test files in parallel with round-robin credential sets
#[derive(Parser, Debug)]
#[command(name = "oz-runner")]
#[command(version)]
#[command(about = "Run OZ tests in parallel")]
#[command(after_help = ENV_HELP)]
pub struct Args {
    /// Number of parallel jobs
    #[arg(short, long, value_parser = clap::value_parser!(u64).range(1..))]
    pub jobs: u64,

    /// Project directory containing package.json and the test directory
    #[arg(long, default_value = ".")]
    pub project_dir: PathBuf,

    /// Runner config file (YAML or JSON)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Directory scanned for test files, relative to the project directory
    #[arg(long)]
    pub test_dir: Option<PathBuf>,

    /// File name suffix of test files
    #[arg(long)]
    pub pattern: Option<String>,

    /// Results directory, relative to the project directory
    #[arg(long)]
    pub results_dir: Option<PathBuf>,

    /// Runner command; the test file path is appended
    #[arg(long)]
    pub command: Option<String>,

    /// Summary output format (table, json, json-pretty)
    #[arg(short, long, default_value = "table")]
    pub format: String,

    /// Exit non-zero if any test file fails
    #[arg(long)]
    pub fail_on_error: bool,

    /// Do not echo runner output to the console
    #[arg(short, long)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    pub log_level: Option<String>,
}

impl Args {
    /// Pool size
    pub fn jobs(&self) -> usize {
        usize::try_from(self.jobs).unwrap_or(usize::MAX)
    }

    /// Apply explicitly given flags over file or default settings
    pub fn apply_overrides(&self, config: &mut RunnerConfig) {
        if let Some(test_dir) = &self.test_dir {
            config.test_dir = test_dir.clone();
        }
        if let Some(pattern) = &self.pattern {
            config.pattern = pattern.clone();
        }
        if let Some(results_dir) = &self.results_dir {
            config.results_dir = results_dir.clone();
        }
        if let Some(command) = &self.command {
            config.command = RunnerConfig::parse_command(command);
        }
    }
}
