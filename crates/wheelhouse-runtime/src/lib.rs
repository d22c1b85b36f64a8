//! Reproducibility harnesses for wheelhouse.
//!
//! These drive external tools rather than doing the work themselves:
//! `reprotest` for repeated `.deb` builds, `dpkg-deb` for control-file
//! inspection, and `git` plus the wheel build script for checking that
//! committed wheels and hashes match a fresh rebuild. `prereq` reports which
//! of those tools are missing before anything runs.

pub mod deb;
pub mod prereq;
pub mod reprotest;
pub mod wheels;

pub use deb::{check_deb_conffiles, conffiles_violations, find_debs, DEB_BUILD_DIR};
pub use prereq::{check_prereqs, format_missing, MissingPrereq};
pub use reprotest::{ReprotestPlan, DEFAULT_GIT_REF, DEFAULT_VARIATIONS, REPROTEST_PACKAGES};
pub use wheels::{
    check_clean_worktree, parse_porcelain, WheelRebuildPlan, DEFAULT_REPO_URL, WHEEL_PROJECTS,
};

use std::path::{Path, PathBuf};
use std::process::Command;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("runtime I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to run {tool}: {source}")]
    Spawn {
        tool: String,
        source: std::io::Error,
    },
    #[error("{0}")]
    ExecFailed(String),
    #[error("build of {0} is not reproducible")]
    NotReproducible(String),
    #[error("{} has no conffiles control file", .0.display())]
    ConffilesMissing(PathBuf),
    #[error("{} ships conffiles: {}", deb.display(), paths.join(", "))]
    Conffiles { deb: PathBuf, paths: Vec<String> },
    #[error("working tree is dirty after rebuilding {name}: {}", paths.join(", "))]
    DirtyWorktree { name: String, paths: Vec<String> },
}

/// Run `cmd` to completion, turning spawn failures and non-zero exits into
/// errors that name `what`.
pub(crate) fn run_checked(cmd: &mut Command, what: &str) -> Result<(), RuntimeError> {
    let program = cmd.get_program().to_string_lossy().into_owned();
    debug!("running {cmd:?}");
    let status = cmd.status().map_err(|source| RuntimeError::Spawn {
        tool: program,
        source,
    })?;
    if status.success() {
        Ok(())
    } else {
        Err(RuntimeError::ExecFailed(format!("{what} failed with {status}")))
    }
}

/// Capture stdout of `cmd`, failing on a non-zero exit.
pub(crate) fn output_checked(cmd: &mut Command, what: &str) -> Result<String, RuntimeError> {
    let program = cmd.get_program().to_string_lossy().into_owned();
    debug!("running {cmd:?}");
    let output = cmd.output().map_err(|source| RuntimeError::Spawn {
        tool: program,
        source,
    })?;
    if !output.status.success() {
        return Err(RuntimeError::ExecFailed(format!(
            "{what} failed: {}",
            String::from_utf8_lossy(&output.stderr).trim()
        )));
    }
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Top level of the git checkout containing `dir`.
pub fn repo_root(dir: &Path) -> Result<PathBuf, RuntimeError> {
    let out = output_checked(
        Command::new("git")
            .args(["rev-parse", "--show-toplevel"])
            .current_dir(dir),
        "git rev-parse",
    )?;
    Ok(PathBuf::from(out.trim_end()))
}
