//! Pipeline config store.
//!
//! # Storage layout
//!
//! ```text
//! ~/.ghlog/
//!   pipelines/
//!     <pipeline_name>.yaml  (one file per pipeline — mode 0600)
//!   run/
//!     <pipeline_name>.lock  (advisory run locks, owned by ghlog-pipeline)
//! ```
//!
//! # API pattern
//!
//! Every function touching the filesystem has two forms:
//! - `fn_at(home: &Path, …)` — explicit home; used in tests with `TempDir`
//! - `fn(…)` — derives home from `dirs::home_dir()`, delegates to `_at`
//!
//! Tests must NEVER call the no-arg wrappers; always use `_at`.

use std::path::{Path, PathBuf};

use chrono::Utc;

use crate::error::ConfigError;
use crate::types::{BranchName, MirrorTarget, PipelineConfig, PipelineName};

// ---------------------------------------------------------------------------
// 1. Path helpers
// ---------------------------------------------------------------------------

/// `<home>/.ghlog/`
pub fn ghlog_root(home: &Path) -> PathBuf {
    home.join(".ghlog")
}

/// `<home>/.ghlog/run/` — lock files live here, one per pipeline.
pub fn run_dir(home: &Path) -> PathBuf {
    ghlog_root(home).join("run")
}

/// `<home>/.ghlog/pipelines/`
///
/// Creates the directory (mode `0700`) if it does not yet exist.
pub fn pipelines_dir_at(home: &Path) -> Result<PathBuf, ConfigError> {
    let dir = ghlog_root(home).join("pipelines");
    if !dir.exists() {
        std::fs::create_dir_all(&dir)?;
        set_dir_permissions(&dir)?;
    }
    Ok(dir)
}

/// `<home>/.ghlog/pipelines/<name>.yaml` — pure, no I/O.
pub fn config_path_at(home: &Path, name: &PipelineName) -> PathBuf {
    ghlog_root(home)
        .join("pipelines")
        .join(format!("{}.yaml", name.0))
}

/// Lists the names of all registered pipelines under `<home>/.ghlog/pipelines/`.
pub fn list_names_at(home: &Path) -> Result<Vec<PipelineName>, ConfigError> {
    let dir = ghlog_root(home).join("pipelines");
    if !dir.exists() {
        return Ok(vec![]);
    }
    let mut names: Vec<PipelineName> = std::fs::read_dir(&dir)?
        .filter_map(|e| e.ok())
        .filter_map(|e| {
            let fname = e.file_name();
            let name = fname.to_string_lossy();
            name.strip_suffix(".yaml").map(PipelineName::from)
        })
        .collect();
    names.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(names)
}

/// `list_names_at` convenience wrapper.
pub fn list_names() -> Result<Vec<PipelineName>, ConfigError> {
    list_names_at(&home()?)
}

// ---------------------------------------------------------------------------
// 2. Load
// ---------------------------------------------------------------------------

/// Load a pipeline config from `<home>/.ghlog/pipelines/<name>.yaml`.
///
/// Returns `ConfigError::ConfigNotFound` if absent,
/// `ConfigError::Parse` (with path + line context) if malformed YAML.
pub fn load_at(home: &Path, name: &PipelineName) -> Result<PipelineConfig, ConfigError> {
    let path = config_path_at(home, name);
    if !path.exists() {
        return Err(ConfigError::ConfigNotFound { path });
    }
    let contents = std::fs::read_to_string(&path)?;
    serde_yaml::from_str(&contents).map_err(|e| ConfigError::Parse { path, source: e })
}

/// `load_at` convenience wrapper.
pub fn load(name: &PipelineName) -> Result<PipelineConfig, ConfigError> {
    load_at(&home()?, name)
}

// ---------------------------------------------------------------------------
// 3. Save (atomic)
// ---------------------------------------------------------------------------

/// Atomically save a pipeline config to `<home>/.ghlog/pipelines/<name>.yaml`.
///
/// Write flow: serialize → `.yaml.tmp` sibling → `chmod 0600` → `rename`.
/// `.tmp` is always in the same directory as the target (same filesystem — no EXDEV).
pub fn save_at(home: &Path, config: &PipelineConfig) -> Result<(), ConfigError> {
    pipelines_dir_at(home)?; // create dir + 0700 if absent
    let path = config_path_at(home, &config.name);
    let tmp_path = path.with_file_name(format!("{}.yaml.tmp", config.name.0));

    let yaml = serde_yaml::to_string(config)?;
    std::fs::write(&tmp_path, yaml)?;
    set_file_permissions(&tmp_path)?;
    std::fs::rename(&tmp_path, &path)?;
    Ok(())
}

/// `save_at` convenience wrapper.
pub fn save(config: &PipelineConfig) -> Result<(), ConfigError> {
    save_at(&home()?, config)
}

// ---------------------------------------------------------------------------
// 4. Init
// ---------------------------------------------------------------------------

/// Register a pipeline mirroring `repo` to `mirror_remote`.
///
/// Creates `<home>/.ghlog/pipelines/<name>.yaml` with the guard branch at its
/// literal default (`main`) and concurrent-run suppression on.
/// Idempotent: if the file already exists, loads and returns it unchanged.
pub fn init_at(
    home: &Path,
    name: PipelineName,
    repo: String,
    mirror_remote: String,
    workdir: PathBuf,
) -> Result<PipelineConfig, ConfigError> {
    let path = config_path_at(home, &name);
    if path.exists() {
        return load_at(home, &name);
    }

    let now = Utc::now();
    let config = PipelineConfig {
        name,
        repo,
        workdir,
        lint: None,
        mirror: MirrorTarget {
            remote: mirror_remote,
            only_branch: BranchName::default(),
        },
        exclusive: true,
        created_at: now,
        updated_at: now,
    };

    save_at(home, &config)?;
    Ok(config)
}

/// `init_at` convenience wrapper.
pub fn init(
    name: PipelineName,
    repo: String,
    mirror_remote: String,
    workdir: PathBuf,
) -> Result<PipelineConfig, ConfigError> {
    init_at(&home()?, name, repo, mirror_remote, workdir)
}

// ---------------------------------------------------------------------------
// Private helpers
// ---------------------------------------------------------------------------

fn home() -> Result<PathBuf, ConfigError> {
    dirs::home_dir().ok_or(ConfigError::HomeNotFound)
}

#[cfg(unix)]
fn set_dir_permissions(path: &Path) -> Result<(), ConfigError> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o700))?;
    Ok(())
}
#[cfg(not(unix))]
fn set_dir_permissions(_path: &Path) -> Result<(), ConfigError> {
    Ok(())
}

#[cfg(unix)]
fn set_file_permissions(path: &Path) -> Result<(), ConfigError> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))?;
    Ok(())
}
#[cfg(not(unix))]
fn set_file_permissions(_path: &Path) -> Result<(), ConfigError> {
    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
