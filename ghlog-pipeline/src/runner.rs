//! Command execution seam.
//!
//! The driver never touches `std::process` directly; it goes through
//! [`CommandRunner`] so the stage-ordering and guard properties can be tested
//! against a recording fake.

use std::path::Path;
use std::process::Command;

use crate::error::PipelineError;

/// Captured result of one external command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    /// Process exit code; `None` when the process died to a signal.
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Runs an external command to completion with captured output.
pub trait CommandRunner {
    fn run(&self, program: &str, args: &[&str], cwd: &Path)
        -> Result<CommandOutput, PipelineError>;
}

/// Real runner — `std::process::Command` with captured stdout/stderr.
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(
        &self,
        program: &str,
        args: &[&str],
        cwd: &Path,
    ) -> Result<CommandOutput, PipelineError> {
        let output = Command::new(program)
            .args(args)
            .current_dir(cwd)
            .output()
            .map_err(|e| PipelineError::Spawn {
                program: program.to_owned(),
                source: e,
            })?;

        Ok(CommandOutput {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

// ---------------------------------------------------------------------------
// Recording fake (tests only)
// ---------------------------------------------------------------------------

/// Recording runner: every invocation is rendered to `"program arg arg …"` and
/// appended to `calls`. Responses are scripted by call-prefix; everything else
/// succeeds with empty output.
#[cfg(test)]
pub(crate) struct FakeRunner {
    calls: std::cell::RefCell<Vec<String>>,
    failures: Vec<(String, i32)>,
    stdout: Vec<(String, String)>,
}

#[cfg(test)]
impl FakeRunner {
    pub(crate) fn new() -> Self {
        Self {
            calls: std::cell::RefCell::new(Vec::new()),
            failures: Vec::new(),
            stdout: Vec::new(),
        }
    }

    /// Commands whose rendered form starts with `prefix` exit with `code`.
    pub(crate) fn fail_on(mut self, prefix: &str, code: i32) -> Self {
        self.failures.push((prefix.to_owned(), code));
        self
    }

    /// Commands whose rendered form starts with `prefix` print `out`.
    pub(crate) fn stdout_for(mut self, prefix: &str, out: &str) -> Self {
        self.stdout.push((prefix.to_owned(), out.to_owned()));
        self
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }
}

#[cfg(test)]
impl CommandRunner for FakeRunner {
    fn run(
        &self,
        program: &str,
        args: &[&str],
        _cwd: &Path,
    ) -> Result<CommandOutput, PipelineError> {
        let rendered = std::iter::once(program)
            .chain(args.iter().copied())
            .collect::<Vec<_>>()
            .join(" ");
        self.calls.borrow_mut().push(rendered.clone());

        if let Some((prefix, code)) = self
            .failures
            .iter()
            .find(|(prefix, _)| rendered.starts_with(prefix))
        {
            return Ok(CommandOutput {
                code: Some(*code),
                stdout: String::new(),
                stderr: format!("{prefix}: scripted failure"),
            });
        }

        let stdout = self
            .stdout
            .iter()
            .find(|(prefix, _)| rendered.starts_with(prefix))
            .map(|(_, out)| out.clone())
            .unwrap_or_default();
        Ok(CommandOutput {
            code: Some(0),
            stdout,
            stderr: String::new(),
        })
    }
}
