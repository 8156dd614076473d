//! Output formatters for run results
//!
//! Provides table and JSON output for the console.

use crate::models::{JobResult, JobStatus, RunSummary};

/// Output format options
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
    JsonPretty,
}

impl OutputFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "table" => Some(OutputFormat::Table),
            "json" => Some(OutputFormat::Json),
            "json-pretty" | "jsonpretty" => Some(OutputFormat::JsonPretty),
            _ => None,
        }
    }
}

/// Result formatter
pub struct ResultFormatter {
    format: OutputFormat,
    colorize: bool,
}

impl ResultFormatter {
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            colorize: true,
        }
    }

    pub fn no_color(mut self) -> Self {
        self.colorize = false;
        self
    }

    fn format_result_table(&self, result: &JobResult) -> String {
        let status_str = if self.colorize {
            match result.status {
                JobStatus::Pass => "\x1b[32m✓ PASS \x1b[0m",
                JobStatus::Fail => "\x1b[31m✗ FAIL \x1b[0m",
                JobStatus::Error => "\x1b[31m! ERROR\x1b[0m",
            }
        } else {
            match result.status {
                JobStatus::Pass => "✓ PASS ",
                JobStatus::Fail => "✗ FAIL ",
                JobStatus::Error => "! ERROR",
            }
        };

        let code = result
            .exit_code
            .map(|c| c.to_string())
            .unwrap_or_else(|| "-".to_string());
        let slot = result
            .credential_slot
            .map(|s| format!("#{s}"))
            .unwrap_or_else(|| "-".to_string());

        format!(
            "{} {:>4} {:>4} [{:>8}ms] {}",
            status_str, code, slot, result.duration_ms, result.target
        )
    }

    /// Format the run summary
    pub fn format_summary(&self, summary: &RunSummary) -> String {
        match self.format {
            OutputFormat::Table => self.format_summary_table(summary),
            OutputFormat::Json => serde_json::to_string(summary).unwrap_or_default(),
            OutputFormat::JsonPretty => serde_json::to_string_pretty(summary).unwrap_or_default(),
        }
    }

    fn format_summary_table(&self, summary: &RunSummary) -> String {
        let mut output = String::new();

        // Header
        output.push_str("\n══════════════════════════════════════════════════════════════\n");
        output.push_str(&format!(" Test run - {} jobs\n", summary.jobs));
        output.push_str("══════════════════════════════════════════════════════════════\n");
        output.push_str(" Status  Code  Keys  Duration    Target\n");
        output.push_str("──────────────────────────────────────────────────────────────\n");

        // Results
        for result in &summary.results {
            output.push_str(&format!(" {}\n", self.format_result_table(result)));
        }

        // Footer
        output.push_str("══════════════════════════════════════════════════════════════\n");

        let pass_str = if self.colorize {
            format!("\x1b[32m{}\x1b[0m", summary.passed)
        } else {
            summary.passed.to_string()
        };
        let fail_str = if self.colorize && summary.failed > 0 {
            format!("\x1b[31m{}\x1b[0m", summary.failed)
        } else {
            summary.failed.to_string()
        };

        output.push_str(&format!(
            " Total: {} | Pass: {} | Fail: {} | Error: {}\n",
            summary.total, pass_str, fail_str, summary.errors
        ));
        output.push_str(&format!(
            " Pass Rate: {:5.1}% | Duration: {}ms\n",
            summary.pass_rate(),
            summary.total_duration_ms
        ));
        output.push_str("══════════════════════════════════════════════════════════════\n");

        output
    }
}
