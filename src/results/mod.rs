//! Results storage module
//!
//! Per-target log files, the manifest copy and the run summary.

pub mod storage;

pub use storage::{EnvironmentInfo, ResultsStorage, StoredRun};
