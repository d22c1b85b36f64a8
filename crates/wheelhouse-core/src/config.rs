use crate::CoreError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;
use wheelhouse_store::{RepoLayout, DEFAULT_RETENTION_DAYS, DEFAULT_WHEELS_BASE_URL};

/// Optional `wheelhouse.toml` settings. Command-line flags override them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Root of the wheel repository checkout.
    pub repo_root: PathBuf,
    /// Nightly packages older than this many days are pruned.
    pub retention_days: u64,
    pub wheels_base_url: String,
    /// Hash sums file; defaults to `<repo_root>/sha256sums.txt`.
    pub sums_file: Option<PathBuf>,
    /// Command suggested when wheels are missing from the hash sums file.
    pub build_script: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            repo_root: PathBuf::from("."),
            retention_days: DEFAULT_RETENTION_DAYS,
            wheels_base_url: DEFAULT_WHEELS_BASE_URL.to_owned(),
            sums_file: None,
            build_script: "./scripts/build-sync-wheels".to_owned(),
        }
    }
}

impl Settings {
    pub const DEFAULT_FILE: &'static str = "wheelhouse.toml";

    pub fn parse_str(input: &str) -> Result<Self, CoreError> {
        toml::from_str(input).map_err(|e| CoreError::Settings(e.to_string()))
    }

    pub fn load(path: &Path) -> Result<Self, CoreError> {
        let content = fs::read_to_string(path)
            .map_err(|e| CoreError::Settings(format!("{}: {e}", path.display())))?;
        let settings = Self::parse_str(&content)?;
        debug!("loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Load an explicit settings file, or `wheelhouse.toml` in the working
    /// directory when present. Only an explicit path is required to exist.
    pub fn discover(explicit: Option<&Path>) -> Result<Self, CoreError> {
        match explicit {
            Some(path) => Self::load(path),
            None => {
                let default = Path::new(Self::DEFAULT_FILE);
                if default.is_file() {
                    Self::load(default)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn layout(&self) -> RepoLayout {
        RepoLayout::new(&self.repo_root)
    }

    pub fn sums_path(&self) -> PathBuf {
        self.sums_file
            .clone()
            .unwrap_or_else(|| self.layout().sums_file())
    }
}
