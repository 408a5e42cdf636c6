//! # ghlog-pipeline
//!
//! The mirror-CI driver: checkout → lint → conditional remote sync.
//!
//! Call [`run`] with a loaded [`ghlog_core::PipelineConfig`] to execute the
//! three stages in order with fail-fast semantics and an exclusive per-pipeline
//! run lock, or [`run_with`] to drive the stages over a custom
//! [`CommandRunner`].

pub mod detect;
pub mod driver;
pub mod error;
pub mod lock;
pub mod runner;

pub use driver::{run, run_with, PipelineReport, RunOptions, StageKind, StageOutcome, StageStatus};
pub use error::PipelineError;
pub use lock::RunLock;
pub use runner::{CommandOutput, CommandRunner, SystemRunner};
