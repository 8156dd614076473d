//! Test execution engine
//!
//! Credential rotation, single-job execution and the bounded parallel pool.

mod parallel;
mod pool;
mod runner;

pub use parallel::ParallelExecutor;
pub use pool::CredentialPool;
pub use runner::JobRunner;
