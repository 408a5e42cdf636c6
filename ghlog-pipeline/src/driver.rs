//! Three-stage pipeline driver: checkout → lint → sync.
//!
//! Stages run strictly in order. Any nonzero exit halts the run there; the
//! sync stage additionally sits behind a branch guard and is *skipped* (not
//! failed) when the checked-out branch is not the mirror branch. The branch
//! fed to the guard is always the one the work tree reports after checkout,
//! never a caller-supplied value.

use std::fmt;
use std::path::Path;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};

use ghlog_core::types::{BranchName, LintCommand, PipelineConfig, PipelineName};

use crate::detect::detect_lint;
use crate::error::{io_err, PipelineError};
use crate::lock::RunLock;
use crate::runner::{CommandOutput, CommandRunner, SystemRunner};

// ---------------------------------------------------------------------------
// Outcome types
// ---------------------------------------------------------------------------

/// The fixed pipeline stages, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageKind {
    Checkout,
    Lint,
    Sync,
}

impl fmt::Display for StageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StageKind::Checkout => write!(f, "checkout"),
            StageKind::Lint => write!(f, "lint"),
            StageKind::Sync => write!(f, "sync"),
        }
    }
}

/// Outcome of one attempted (or skipped) stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StageStatus {
    Passed,
    /// The delegated command exited nonzero (`None` = killed by signal).
    Failed { code: Option<i32> },
    /// The stage's guard condition was false; skipping is not a failure.
    Skipped { reason: String },
}

/// One stage's entry in the run report.
#[derive(Debug, Clone)]
pub struct StageOutcome {
    pub stage: StageKind,
    pub status: StageStatus,
    pub duration: Duration,
}

/// Summary of a pipeline run. Stages after a failure are absent: they were
/// never attempted.
#[derive(Debug, Clone)]
pub struct PipelineReport {
    pub pipeline: PipelineName,
    /// Branch reported by the work tree after checkout; `None` when checkout failed.
    pub branch: Option<BranchName>,
    pub started_at: DateTime<Utc>,
    pub stages: Vec<StageOutcome>,
}

impl PipelineReport {
    /// A run succeeds when no attempted stage failed (skips count as success).
    pub fn success(&self) -> bool {
        !self
            .stages
            .iter()
            .any(|s| matches!(s.status, StageStatus::Failed { .. }))
    }

    pub fn failed_stage(&self) -> Option<&StageOutcome> {
        self.stages
            .iter()
            .find(|s| matches!(s.status, StageStatus::Failed { .. }))
    }
}

/// Per-run options.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Branch to check out; `None` keeps the clone/fetch default.
    pub branch: Option<BranchName>,
    /// Wait for the run lock (queue semantics) instead of erroring on contention.
    pub wait: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            branch: None,
            wait: true,
        }
    }
}

// ---------------------------------------------------------------------------
// Entry points
// ---------------------------------------------------------------------------

/// Run the pipeline with the real command runner, under the exclusive run
/// lock when the config asks for it.
pub fn run(
    home: &Path,
    config: &PipelineConfig,
    opts: &RunOptions,
) -> Result<PipelineReport, PipelineError> {
    let _guard = if config.exclusive {
        Some(RunLock::acquire_at(home, &config.name, opts.wait)?)
    } else {
        None
    };
    run_with(&SystemRunner, config, opts)
}

/// Stage sequencing over an arbitrary runner; no locking. This is the
/// canonical entrypoint for the control-flow tests.
pub fn run_with(
    runner: &impl CommandRunner,
    config: &PipelineConfig,
    opts: &RunOptions,
) -> Result<PipelineReport, PipelineError> {
    let mut report = PipelineReport {
        pipeline: config.name.clone(),
        branch: None,
        started_at: Utc::now(),
        stages: Vec::new(),
    };

    // Stage 1: checkout. Also the only source of the branch name.
    let clock = Instant::now();
    let branch = match checkout(runner, config, opts) {
        Ok(branch) => {
            report.branch = Some(branch.clone());
            push_outcome(&mut report, StageKind::Checkout, StageStatus::Passed, clock);
            branch
        }
        Err(StageError::Exit { code, stderr }) => {
            tracing::warn!("checkout failed for '{}': {}", config.name, stderr.trim());
            push_outcome(
                &mut report,
                StageKind::Checkout,
                StageStatus::Failed { code },
                clock,
            );
            return Ok(report);
        }
        Err(StageError::Driver(e)) => return Err(e),
    };

    // Stage 2: lint.
    let clock = Instant::now();
    match lint(runner, config) {
        Ok(()) => push_outcome(&mut report, StageKind::Lint, StageStatus::Passed, clock),
        Err(StageError::Exit { code, stderr }) => {
            tracing::warn!("lint failed for '{}': {}", config.name, stderr.trim());
            push_outcome(
                &mut report,
                StageKind::Lint,
                StageStatus::Failed { code },
                clock,
            );
            return Ok(report);
        }
        Err(StageError::Driver(e)) => return Err(e),
    }

    // Stage 3: sync, behind the branch guard.
    let clock = Instant::now();
    if branch == config.mirror.only_branch {
        match sync(runner, config, &branch) {
            Ok(()) => push_outcome(&mut report, StageKind::Sync, StageStatus::Passed, clock),
            Err(StageError::Exit { code, stderr }) => {
                tracing::warn!("sync failed for '{}': {}", config.name, stderr.trim());
                push_outcome(
                    &mut report,
                    StageKind::Sync,
                    StageStatus::Failed { code },
                    clock,
                );
            }
            Err(StageError::Driver(e)) => return Err(e),
        }
    } else {
        let reason = format!(
            "branch '{}' is not '{}'",
            branch, config.mirror.only_branch
        );
        tracing::info!("sync skipped for '{}': {}", config.name, reason);
        push_outcome(
            &mut report,
            StageKind::Sync,
            StageStatus::Skipped { reason },
            clock,
        );
    }

    Ok(report)
}

fn push_outcome(
    report: &mut PipelineReport,
    stage: StageKind,
    status: StageStatus,
    clock: Instant,
) {
    tracing::info!("stage {stage}: {status:?}");
    report.stages.push(StageOutcome {
        stage,
        status,
        duration: clock.elapsed(),
    });
}

// ---------------------------------------------------------------------------
// Stages
// ---------------------------------------------------------------------------

/// Stage-internal error split: nonzero exits become outcomes, driver errors
/// propagate.
enum StageError {
    Exit { code: Option<i32>, stderr: String },
    Driver(PipelineError),
}

impl From<PipelineError> for StageError {
    fn from(e: PipelineError) -> Self {
        StageError::Driver(e)
    }
}

fn run_checked(
    runner: &impl CommandRunner,
    program: &str,
    args: &[&str],
    cwd: &Path,
) -> Result<CommandOutput, StageError> {
    let output = runner.run(program, args, cwd)?;
    if !output.success() {
        return Err(StageError::Exit {
            code: output.code,
            stderr: output.stderr,
        });
    }
    Ok(output)
}

/// Clone on first run, fetch + hard reset thereafter; then read back the
/// branch the work tree landed on.
fn checkout(
    runner: &impl CommandRunner,
    config: &PipelineConfig,
    opts: &RunOptions,
) -> Result<BranchName, StageError> {
    let workdir = &config.workdir;

    if workdir.join(".git").exists() {
        run_checked(runner, "git", &["fetch", "--prune", "origin"], workdir)?;
        if let Some(branch) = &opts.branch {
            run_checked(runner, "git", &["checkout", &branch.0], workdir)?;
            let upstream = format!("origin/{branch}");
            run_checked(runner, "git", &["reset", "--hard", &upstream], workdir)?;
        }
    } else {
        let parent = workdir.parent().unwrap_or_else(|| Path::new("."));
        std::fs::create_dir_all(parent).map_err(|e| io_err(parent, e))?;
        let target = workdir.to_string_lossy().into_owned();
        let mut args = vec!["clone"];
        if let Some(branch) = &opts.branch {
            args.push("--branch");
            args.push(&branch.0);
        }
        args.push(&config.repo);
        args.push(&target);
        run_checked(runner, "git", &args, parent)?;
    }

    let head = run_checked(
        runner,
        "git",
        &["rev-parse", "--abbrev-ref", "HEAD"],
        workdir,
    )?;
    Ok(BranchName::from(head.stdout.trim()))
}

/// Run the configured lint command, inferring one from the work tree when the
/// config leaves it out.
fn lint(runner: &impl CommandRunner, config: &PipelineConfig) -> Result<(), StageError> {
    let command: LintCommand = match &config.lint {
        Some(lint) => lint.clone(),
        None => detect_lint(&config.workdir)?,
    };
    tracing::debug!("lint command: {command}");
    let args: Vec<&str> = command.args.iter().map(String::as_str).collect();
    run_checked(runner, &command.program, &args, &config.workdir)?;
    Ok(())
}

/// Push the guarded branch to the mirror remote. Authentication and conflict
/// behavior belong to git and the remote; a nonzero push is just a failed stage.
fn sync(
    runner: &impl CommandRunner,
    config: &PipelineConfig,
    branch: &BranchName,
) -> Result<(), StageError> {
    let refspec = format!("{branch}:{branch}");
    run_checked(
        runner,
        "git",
        &["push", &config.mirror.remote, &refspec],
        &config.workdir,
    )?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
