use crate::{output_checked, run_checked, RuntimeError};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::info;

pub const DEFAULT_REPO_URL: &str = "https://github.com/freedomofpress/securedrop-client";
/// Components of the monorepo that ship committed wheels.
pub const WHEEL_PROJECTS: &[&str] = &["client", "export", "log", "proxy"];

/// Rebuild the wheels of one component from a fresh clone and check that the
/// working tree is unchanged afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WheelRebuildPlan {
    pub repo_url: String,
    pub name: String,
    pub project: String,
    pub checkout: PathBuf,
    pub build_script: String,
}

impl WheelRebuildPlan {
    pub fn new(name: &str, repo_url: &str, checkout_root: &Path, build_script: &str) -> Self {
        Self {
            repo_url: repo_url.to_owned(),
            name: name.to_owned(),
            project: format!("securedrop-{name}"),
            checkout: checkout_root.join(format!("monorepo-{name}")),
            build_script: build_script.to_owned(),
        }
    }

    pub fn clone_args(&self) -> Vec<String> {
        vec![
            "clone".to_owned(),
            self.repo_url.clone(),
            self.checkout.display().to_string(),
        ]
    }

    pub fn build_args(&self) -> Vec<String> {
        vec![
            "--pkg-dir".to_owned(),
            self.checkout.join(&self.name).display().to_string(),
            "--project".to_owned(),
            self.project.clone(),
            "--clobber".to_owned(),
        ]
    }

    /// Clone, rebuild from `repo_root`, then require a clean working tree.
    pub fn run(&self, repo_root: &Path) -> Result<(), RuntimeError> {
        info!("rebuilding wheels for {}", self.project);
        run_checked(
            Command::new("git").args(self.clone_args()),
            &format!("git clone {}", self.repo_url),
        )?;
        run_checked(
            Command::new(&self.build_script)
                .args(self.build_args())
                .current_dir(repo_root),
            &format!("{} for {}", self.build_script, self.project),
        )?;
        check_clean_worktree(repo_root).map_err(|e| match e {
            RuntimeError::DirtyWorktree { paths, .. } => RuntimeError::DirtyWorktree {
                name: self.name.clone(),
                paths,
            },
            other => other,
        })
    }
}

/// Paths reported by `git status --porcelain`.
pub fn parse_porcelain(text: &str) -> Vec<String> {
    text.lines()
        .filter(|l| l.len() > 3)
        .map(|l| l[3..].to_owned())
        .collect()
}

/// Fail if tracked files changed or untracked files appeared in `repo_root`.
pub fn check_clean_worktree(repo_root: &Path) -> Result<(), RuntimeError> {
    run_checked(
        Command::new("git")
            .args(["diff", "--exit-code"])
            .current_dir(repo_root),
        "git diff --exit-code",
    )?;
    let status = output_checked(
        Command::new("git")
            .args(["status", "--porcelain"])
            .current_dir(repo_root),
        "git status",
    )?;
    let paths = parse_porcelain(&status);
    if paths.is_empty() {
        Ok(())
    } else {
        Err(RuntimeError::DirtyWorktree {
            name: repo_root.display().to_string(),
            paths,
        })
    }
}
