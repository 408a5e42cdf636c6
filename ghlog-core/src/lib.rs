//! ghlog core library — domain types, pipeline config persistence, errors.
//!
//! Public API surface:
//! - [`types`] — newtypes and domain structs
//! - [`error`] — [`ConfigError`]
//! - [`config`] — load / save / init / list

pub mod config;
pub mod error;
pub mod types;

pub use error::ConfigError;
pub use types::{BranchName, LintCommand, MirrorTarget, PipelineConfig, PipelineName, Username};
