use crate::{run_checked, RuntimeError};
use serde::Serialize;
use std::path::Path;
use std::process::Command;
use tracing::info;

/// Only the execution and build paths vary between the two builds.
pub const DEFAULT_VARIATIONS: &str = "-all, -kernel, +exec_path, +build_path";
pub const DEFAULT_GIT_REF: &str = "main";
pub const REPROTEST_PACKAGES: &[&str] = &[
    "securedrop-client",
    "securedrop-log",
    "securedrop-proxy",
    "securedrop-export",
];

/// One `reprotest` invocation for a Debian package make target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReprotestPlan {
    pub package: String,
    pub git_ref: String,
    pub variations: String,
    pub artifact_glob: String,
}

impl ReprotestPlan {
    pub fn new(package: &str, git_ref: &str) -> Self {
        Self {
            package: package.to_owned(),
            git_ref: git_ref.to_owned(),
            variations: DEFAULT_VARIATIONS.to_owned(),
            artifact_glob: format!("build/debbuild/packaging/{package}*.deb"),
        }
    }

    pub fn args(&self) -> Vec<String> {
        vec![
            "-c".to_owned(),
            format!("make {}", self.package),
            "--variations".to_owned(),
            self.variations.clone(),
            ".".to_owned(),
            self.artifact_glob.clone(),
        ]
    }

    pub fn env(&self) -> [(&'static str, String); 2] {
        [
            ("PKG_GITREF", self.git_ref.clone()),
            ("TERM", "xterm-256color".to_owned()),
        ]
    }

    pub fn command(&self, repo_root: &Path) -> Command {
        let mut cmd = Command::new("reprotest");
        cmd.args(self.args())
            .envs(self.env())
            .current_dir(repo_root);
        cmd
    }

    /// Run reprotest from `repo_root`. Any failure means the package did not
    /// build identically twice.
    pub fn run(&self, repo_root: &Path) -> Result<(), RuntimeError> {
        info!("reprotest {} at {}", self.package, self.git_ref);
        run_checked(&mut self.command(repo_root), &format!("reprotest {}", self.package))
            .map_err(|e| match e {
                RuntimeError::ExecFailed(_) => RuntimeError::NotReproducible(self.package.clone()),
                other => other,
            })
    }
}
