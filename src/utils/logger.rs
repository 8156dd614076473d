//! Logging utilities
//!
//! Provides logging configuration and helpers.

use std::io::IsTerminal;
use tracing::{Level, Subscriber};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Log level configuration
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn to_tracing_level(self) -> Level {
        match self {
            LogLevel::Trace => Level::TRACE,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Info => Level::INFO,
            LogLevel::Warn => Level::WARN,
            LogLevel::Error => Level::ERROR,
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "trace" => Some(LogLevel::Trace),
            "debug" => Some(LogLevel::Debug),
            "info" => Some(LogLevel::Info),
            "warn" | "warning" => Some(LogLevel::Warn),
            "error" => Some(LogLevel::Error),
            _ => None,
        }
    }

    /// Level from CLI flags; `--verbose` wins over a less detailed `--log-level`
    pub fn resolve(level: Option<&str>, verbose: bool) -> Self {
        let level = level.and_then(Self::from_str).unwrap_or(LogLevel::Info);
        if verbose && level.to_tracing_level() < Level::DEBUG {
            LogLevel::Debug
        } else {
            level
        }
    }
}

/// Filter directive for this crate at `level`
fn default_directive(level: LogLevel) -> String {
    format!("oz_runner={}", level.to_tracing_level())
}

/// Initialize the logger with specified level. `RUST_LOG` takes precedence.
///
/// Logs go to stderr; stdout carries only runner output and the summary.
pub fn init_logger(level: LogLevel) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(level)));

    let ansi = std::io::stderr().is_terminal();
    build_subscriber(filter, std::io::stderr, ansi).init();
}

fn build_subscriber<W>(filter: EnvFilter, writer: W, ansi: bool) -> impl Subscriber + Send + Sync + 'static
where
    W: for<'a> MakeWriter<'a> + Send + Sync + 'static,
{
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(ansi)
        .compact()
        .with_writer(writer)
        .finish()
}
