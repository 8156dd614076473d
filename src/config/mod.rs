//! Configuration module
//!
//! Runner settings from an optional config file, plus the required
//! environment inputs in [`env`].

#![allow(dead_code)]

pub mod env;

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub use env::EnvConfig;

/// Config file names looked up in the project directory, in order of precedence
const CONFIG_LOCATIONS: &[&str] = &[
    "oz-runner.yaml",
    "oz-runner.yml",
    "oz-runner.json",
    ".oz-runner.yaml",
];

/// Settings for discovering and running test targets
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    /// Runner command; the target path is appended as the last argument
    pub command: Vec<String>,

    /// Directory scanned for test files, relative to the project directory
    pub test_dir: PathBuf,

    /// File name suffix that marks a test file
    pub pattern: String,

    /// Results root, relative to the project directory
    pub results_dir: PathBuf,

    /// Package manifest copied into the results root
    pub manifest: PathBuf,

    /// File name of the manifest copy
    pub manifest_copy_name: String,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            command: vec!["npx".to_string(), "hardhat".to_string(), "test".to_string()],
            test_dir: PathBuf::from("test"),
            pattern: ".test.js".to_string(),
            results_dir: PathBuf::from("results"),
            manifest: PathBuf::from("package.json"),
            manifest_copy_name: "openzeppelin-package.json".to_string(),
        }
    }
}

impl RunnerConfig {
    /// Find a config file in the project directory
    pub fn find(project_dir: &Path) -> Option<PathBuf> {
        CONFIG_LOCATIONS
            .iter()
            .map(|name| project_dir.join(name))
            .find(|path| path.is_file())
    }

    /// Load the config found in the project directory, or the defaults
    pub fn load_default(project_dir: &Path) -> Result<Self> {
        match Self::find(project_dir) {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    /// Load configuration from file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content =
            std::fs::read_to_string(path.as_ref()).context("Failed to read config file")?;

        let config: Self = if is_yaml(path.as_ref()) {
            serde_yaml::from_str(&content).context("Failed to parse YAML config")?
        } else {
            serde_json::from_str(&content).context("Failed to parse JSON config")?
        };

        config.validate()?;
        Ok(config)
    }

    /// Split a shell-style command line on whitespace
    pub fn parse_command(command: &str) -> Vec<String> {
        command.split_whitespace().map(str::to_string).collect()
    }

    pub fn validate(&self) -> Result<()> {
        if self.command.is_empty() {
            anyhow::bail!("Runner command must not be empty");
        }
        if self.pattern.is_empty() {
            anyhow::bail!("Test file pattern must not be empty");
        }
        Ok(())
    }
}

fn is_yaml(path: &Path) -> bool {
    path.extension()
        .map(|e| e == "yaml" || e == "yml")
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = RunnerConfig::default();
        assert_eq!(config.command, ["npx", "hardhat", "test"]);
        assert_eq!(config.test_dir, PathBuf::from("test"));
        assert_eq!(config.pattern, ".test.js");
        assert_eq!(config.results_dir, PathBuf::from("results"));
        assert_eq!(config.manifest_copy_name, "openzeppelin-package.json");
    }

    #[test]
    fn test_parse_command() {
        assert_eq!(
            RunnerConfig::parse_command("  npx hardhat   test "),
            ["npx", "hardhat", "test"]
        );
        assert!(RunnerConfig::parse_command("   ").is_empty());
    }

    #[test]
    fn test_yaml_partial_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("runner.yaml");
        std::fs::write(&path, "pattern: .spec.js\ntest_dir: spec\n").unwrap();

        let config = RunnerConfig::load(&path).unwrap();
        assert_eq!(config.pattern, ".spec.js");
        assert_eq!(config.test_dir, PathBuf::from("spec"));
        assert_eq!(config.command, ["npx", "hardhat", "test"]);
    }

    #[test]
    fn test_json_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("runner.json");
        std::fs::write(
            &path,
            r#"{"command": ["yarn", "hardhat", "test"], "results_dir": "out"}"#,
        )
        .unwrap();

        let config = RunnerConfig::load(&path).unwrap();
        assert_eq!(config.command, ["yarn", "hardhat", "test"]);
        assert_eq!(config.results_dir, PathBuf::from("out"));
        assert_eq!(config.pattern, ".test.js");
    }

    #[test]
    fn test_find_prefers_yaml() {
        let dir = tempdir().unwrap();
        assert!(RunnerConfig::find(dir.path()).is_none());
        assert_eq!(
            RunnerConfig::load_default(dir.path()).unwrap(),
            RunnerConfig::default()
        );

        std::fs::write(dir.path().join("oz-runner.json"), r#"{"pattern": ".t.js"}"#).unwrap();
        std::fs::write(dir.path().join("oz-runner.yaml"), "pattern: .y.js\n").unwrap();

        let found = RunnerConfig::find(dir.path()).unwrap();
        assert!(found.ends_with("oz-runner.yaml"));
        assert_eq!(RunnerConfig::load_default(dir.path()).unwrap().pattern, ".y.js");
    }

    #[test]
    fn test_empty_command_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("runner.yaml");
        std::fs::write(&path, "command: []\n").unwrap();

        assert!(RunnerConfig::load(&path).is_err());
    }
}
