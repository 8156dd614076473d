//! Data models for parallel test dispatch
//!
//! Credential sets, discovered test targets, and per-job results.

mod credentials;
mod job;

pub use credentials::CredentialSet;
pub use job::{JobResult, JobStatus, RunSummary, TestTarget};
