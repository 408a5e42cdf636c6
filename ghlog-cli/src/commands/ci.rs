//! `ghlog ci` — register, list, and run mirror pipelines.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Args, Subcommand};
use colored::Colorize;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

use ghlog_core::{
    config,
    types::{BranchName, PipelineName},
};
use ghlog_pipeline::{PipelineReport, RunOptions, StageStatus};

/// Subcommands of `ghlog ci`.
#[derive(Subcommand, Debug)]
pub enum CiCommand {
    /// Register a pipeline mirroring a repository.
    Init(InitArgs),

    /// Run the checkout → lint → sync pipeline.
    Run(RunArgs),

    /// List registered pipelines.
    List,
}

pub fn run(command: CiCommand) -> Result<()> {
    match command {
        CiCommand::Init(args) => args.run(),
        CiCommand::Run(args) => args.run(),
        CiCommand::List => list(),
    }
}

// ---------------------------------------------------------------------------
// ci init
// ---------------------------------------------------------------------------

/// Arguments for `ghlog ci init`.
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Clone URL of the source repository.
    pub repo: String,

    /// Mirror remote the guard branch is pushed to.
    #[arg(long)]
    pub remote: String,

    /// Pipeline name (defaults to the repository basename).
    #[arg(long, short = 'n')]
    pub name: Option<String>,

    /// Work tree directory (defaults to ~/.ghlog/work/<name>).
    #[arg(long)]
    pub workdir: Option<PathBuf>,
}

impl InitArgs {
    pub fn run(self) -> Result<()> {
        let home: PathBuf = dirs::home_dir().context("could not determine home directory")?;

        let name = match self.name {
            Some(name) => name,
            None => repo_basename(&self.repo).with_context(|| {
                format!("cannot derive a pipeline name from '{}'; pass --name", self.repo)
            })?,
        };
        let workdir = self
            .workdir
            .unwrap_or_else(|| config::ghlog_root(&home).join("work").join(&name));

        let name = PipelineName::from(name);
        let pipeline = config::init_at(&home, name.clone(), self.repo, self.remote, workdir)
            .with_context(|| format!("failed to register pipeline '{name}'"))?;

        println!("✓ Registered pipeline '{}'", pipeline.name);
        println!("  Saved to: ~/.ghlog/pipelines/{}.yaml", pipeline.name);
        println!(
            "  Mirrors '{}' to {} when the branch is '{}'",
            pipeline.repo, pipeline.mirror.remote, pipeline.mirror.only_branch
        );
        Ok(())
    }
}

/// Last path segment of a clone URL, minus any `.git` suffix.
fn repo_basename(repo: &str) -> Option<String> {
    let tail = repo.trim_end_matches('/');
    let base = tail.rsplit(['/', ':']).next()?;
    let base = base.strip_suffix(".git").unwrap_or(base);
    if base.is_empty() {
        None
    } else {
        Some(base.to_owned())
    }
}

// ---------------------------------------------------------------------------
// ci run
// ---------------------------------------------------------------------------

/// Arguments for `ghlog ci run`.
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Name of the registered pipeline.
    pub name: String,

    /// Branch to check out (defaults to the clone's default branch).
    #[arg(long)]
    pub branch: Option<String>,

    /// Fail immediately if another run holds the pipeline lock, instead of waiting.
    #[arg(long)]
    pub no_wait: bool,

    /// Emit machine-readable JSON.
    #[arg(long)]
    pub json: bool,
}

impl RunArgs {
    pub fn run(self) -> Result<()> {
        let home: PathBuf = dirs::home_dir().context("could not determine home directory")?;
        let name = PipelineName::from(self.name);

        let pipeline = config::load_at(&home, &name)
            .with_context(|| format!("no pipeline '{name}' — run `ghlog ci init` first"))?;
        let opts = RunOptions {
            branch: self.branch.map(BranchName::from),
            wait: !self.no_wait,
        };

        let report = ghlog_pipeline::run(&home, &pipeline, &opts)
            .with_context(|| format!("pipeline '{name}' did not complete"))?;

        if self.json {
            print_json(&report)?;
        } else {
            print_report(&report);
        }

        if !report.success() {
            let stage = report
                .failed_stage()
                .map(|s| s.stage.to_string())
                .unwrap_or_else(|| "unknown stage".to_owned());
            bail!("pipeline '{name}' failed at {stage}");
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// ci list
// ---------------------------------------------------------------------------

fn list() -> Result<()> {
    let home: PathBuf = dirs::home_dir().context("could not determine home directory")?;
    let names = config::list_names_at(&home).context("failed to list pipelines")?;
    if names.is_empty() {
        println!("No pipelines registered. Run `ghlog ci init` first.");
        return Ok(());
    }
    for name in names {
        println!("{name}");
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Report output
// ---------------------------------------------------------------------------

#[derive(Tabled)]
struct StageTableRow {
    #[tabled(rename = "stage")]
    stage: String,
    #[tabled(rename = "status")]
    status: String,
    #[tabled(rename = "duration")]
    duration: String,
    #[tabled(rename = "detail")]
    detail: String,
}

fn print_report(report: &PipelineReport) {
    let branch = report
        .branch
        .as_ref()
        .map(|b| b.to_string())
        .unwrap_or_else(|| "?".to_owned());
    println!(
        "Pipeline '{}' | branch {} | started {}",
        report.pipeline,
        branch,
        report.started_at.to_rfc3339()
    );

    let rows: Vec<StageTableRow> = report
        .stages
        .iter()
        .map(|s| StageTableRow {
            stage: s.stage.to_string(),
            status: status_label(&s.status),
            duration: format_duration(s.duration),
            detail: status_detail(&s.status),
        })
        .collect();
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{table}");

    if report.success() {
        println!("{} pipeline '{}' succeeded", "✓".green().bold(), report.pipeline);
    } else {
        println!("{} pipeline '{}' failed", "✗".red().bold(), report.pipeline);
    }
}

fn status_label(status: &StageStatus) -> String {
    match status {
        StageStatus::Passed => "✓ passed".green().to_string(),
        StageStatus::Failed { .. } => "✗ failed".red().bold().to_string(),
        StageStatus::Skipped { .. } => "· skipped".bright_black().to_string(),
    }
}

fn status_detail(status: &StageStatus) -> String {
    match status {
        StageStatus::Passed => String::new(),
        StageStatus::Failed { code: Some(code) } => format!("exit code {code}"),
        StageStatus::Failed { code: None } => "killed by signal".to_owned(),
        StageStatus::Skipped { reason } => reason.clone(),
    }
}

fn format_duration(duration: std::time::Duration) -> String {
    let millis = duration.as_millis();
    if millis < 1000 {
        return format!("{millis}ms");
    }
    format!("{:.1}s", duration.as_secs_f64())
}

// ---------------------------------------------------------------------------
// JSON output — separate mirror structs, same shape policy as `status --json`
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct ReportJson {
    pipeline: String,
    branch: Option<String>,
    started_at: String,
    success: bool,
    stages: Vec<StageJson>,
}

#[derive(Serialize)]
struct StageJson {
    stage: String,
    status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    exit_code: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<String>,
    duration_ms: u128,
}

fn print_json(report: &PipelineReport) -> Result<()> {
    let payload = ReportJson {
        pipeline: report.pipeline.to_string(),
        branch: report.branch.as_ref().map(|b| b.to_string()),
        started_at: report.started_at.to_rfc3339(),
        success: report.success(),
        stages: report
            .stages
            .iter()
            .map(|s| StageJson {
                stage: s.stage.to_string(),
                status: match &s.status {
                    StageStatus::Passed => "passed".to_owned(),
                    StageStatus::Failed { .. } => "failed".to_owned(),
                    StageStatus::Skipped { .. } => "skipped".to_owned(),
                },
                exit_code: match &s.status {
                    StageStatus::Failed { code } => *code,
                    _ => None,
                },
                reason: match &s.status {
                    StageStatus::Skipped { reason } => Some(reason.clone()),
                    _ => None,
                },
                duration_ms: s.duration.as_millis(),
            })
            .collect(),
    };
    println!(
        "{}",
        serde_json::to_string_pretty(&payload).context("failed to serialize report JSON")?
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repo_basename_handles_common_clone_urls() {
        assert_eq!(
            repo_basename("https://github.com/acme/api.git"),
            Some("api".to_owned())
        );
        assert_eq!(
            repo_basename("git@github.com:acme/api.git"),
            Some("api".to_owned())
        );
        assert_eq!(
            repo_basename("https://github.com/acme/api/"),
            Some("api".to_owned())
        );
        assert_eq!(repo_basename(""), None);
    }
}
