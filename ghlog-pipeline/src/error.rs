//! Error types for ghlog-pipeline.
//!
//! Stage failures (nonzero exits from the delegated commands) are NOT errors —
//! they are [`crate::StageStatus::Failed`] outcomes in the report. This enum
//! covers failures of the driver itself.

use std::path::PathBuf;

use thiserror::Error;

use ghlog_core::types::PipelineName;

/// All errors that can arise from driving a pipeline run.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// An I/O error, with annotated path for context.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An external command could not be started at all (binary missing, etc.).
    #[error("failed to spawn '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// Run-lock contention surfaced in no-wait mode.
    #[error("pipeline '{name}' is already running")]
    AlreadyRunning { name: PipelineName },

    /// No lint command configured and none could be inferred from the work tree.
    #[error("could not determine a lint command for '{path}' — no known indicator file found")]
    UnknownStack { path: PathBuf },
}

/// Convenience constructor for [`PipelineError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> PipelineError {
    PipelineError::Io {
        path: path.into(),
        source,
    }
}
