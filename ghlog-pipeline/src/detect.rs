//! Lint command detection.
//!
//! `detect_lint(workdir)` inspects indicator files in the work tree root and
//! returns the stack's conventional linter. Checks are ordered by specificity:
//! language-specific manifest files take priority over generic ones.

use std::path::Path;

use ghlog_core::types::LintCommand;

use crate::error::PipelineError;

/// Detect the lint invocation for the work tree at `workdir`.
///
/// Returns `PipelineError::UnknownStack` if no known indicator file is found.
pub fn detect_lint(workdir: &Path) -> Result<LintCommand, PipelineError> {
    if workdir.join("Cargo.toml").exists() {
        return Ok(LintCommand::new(
            "cargo",
            &["clippy", "--all-targets", "--", "-D", "warnings"],
        ));
    }
    if workdir.join("package.json").exists() {
        return Ok(LintCommand::new("npx", &["eslint", "."]));
    }
    if workdir.join("pyproject.toml").exists()
        || workdir.join("setup.py").exists()
        || workdir.join("requirements.txt").exists()
    {
        return Ok(LintCommand::new("ruff", &["check", "."]));
    }
    if workdir.join("go.mod").exists() {
        return Ok(LintCommand::new("go", &["vet", "./..."]));
    }
    Err(PipelineError::UnknownStack {
        path: workdir.to_path_buf(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn workdir_with(files: &[&str]) -> TempDir {
        let dir = TempDir::new().expect("tempdir");
        for f in files {
            std::fs::write(dir.path().join(f), "").expect("write indicator");
        }
        dir
    }

    #[test]
    fn rust_work_tree_lints_with_clippy() {
        let dir = workdir_with(&["Cargo.toml", "requirements.txt"]);
        let lint = detect_lint(dir.path()).expect("detect");
        assert_eq!(lint.program, "cargo");
        assert_eq!(lint.args[0], "clippy");
    }

    #[test]
    fn node_work_tree_lints_with_eslint() {
        let dir = workdir_with(&["package.json"]);
        let lint = detect_lint(dir.path()).expect("detect");
        assert_eq!(lint.to_string(), "npx eslint .");
    }

    #[test]
    fn python_indicators_all_map_to_ruff() {
        for indicator in ["pyproject.toml", "setup.py", "requirements.txt"] {
            let dir = workdir_with(&[indicator]);
            let lint = detect_lint(dir.path()).expect("detect");
            assert_eq!(lint.program, "ruff", "indicator: {indicator}");
        }
    }

    #[test]
    fn go_work_tree_uses_go_vet() {
        let dir = workdir_with(&["go.mod"]);
        let lint = detect_lint(dir.path()).expect("detect");
        assert_eq!(lint.to_string(), "go vet ./...");
    }

    #[test]
    fn unknown_stack_is_an_error_naming_the_path() {
        let dir = workdir_with(&[]);
        let err = detect_lint(dir.path()).unwrap_err();
        match err {
            PipelineError::UnknownStack { path } => assert_eq!(path, dir.path()),
            other => panic!("expected UnknownStack, got {other:?}"),
        }
    }
}
