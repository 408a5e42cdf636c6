//! Per-pipeline run lock.
//!
//! An advisory `flock` on `<home>/.ghlog/run/<name>.lock` gives the
//! single-flight guarantee: a second run for the same pipeline blocks until
//! the first finishes (or errors immediately in no-wait mode). The lock file
//! carries the holder's pid for operator forensics; it is never deleted, only
//! unlocked.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use fs2::FileExt;

use ghlog_core::config::run_dir;
use ghlog_core::types::PipelineName;

use crate::error::{io_err, PipelineError};

/// `<home>/.ghlog/run/<name>.lock` — pure, no I/O.
pub fn lock_path_at(home: &Path, name: &PipelineName) -> PathBuf {
    run_dir(home).join(format!("{}.lock", name.0))
}

/// Held exclusive run lock; released on drop.
#[derive(Debug)]
pub struct RunLock {
    file: File,
    path: PathBuf,
}

impl RunLock {
    /// Acquire the run lock for `name`.
    ///
    /// `wait = true` blocks until the current holder releases (queue
    /// semantics); `wait = false` returns [`PipelineError::AlreadyRunning`]
    /// on contention.
    pub fn acquire_at(home: &Path, name: &PipelineName, wait: bool) -> Result<Self, PipelineError> {
        let path = lock_path_at(home, name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| io_err(parent, e))?;
        }

        let mut file = File::create(&path).map_err(|e| io_err(&path, e))?;
        if wait {
            file.lock_exclusive().map_err(|e| io_err(&path, e))?;
        } else {
            file.try_lock_exclusive().map_err(|e| {
                if e.raw_os_error() == fs2::lock_contended_error().raw_os_error() {
                    PipelineError::AlreadyRunning { name: name.clone() }
                } else {
                    io_err(&path, e)
                }
            })?;
        }

        writeln!(file, "{}", std::process::id()).map_err(|e| io_err(&path, e))?;
        tracing::debug!("acquired run lock: {}", path.display());
        Ok(Self { file, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for RunLock {
    fn drop(&mut self) {
        let _ = FileExt::unlock(&self.file);
        tracing::debug!("released run lock: {}", self.path.display());
    }
}
