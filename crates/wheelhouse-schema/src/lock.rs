use crate::normalize::requirement_name;
use crate::types::PackageName;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum LockError {
    #[error("lock file not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("failed to read lock file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse lock file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// One artifact entry of a locked package: `{file = "...", hash = "sha256:..."}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LockedFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    pub hash: String,
}

/// A `[[package]]` entry from `poetry.lock`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LockedPackage {
    pub name: String,
    pub version: String,
    /// Names of the packages this one depends on, as spelled in the lockfile.
    pub dependencies: Vec<String>,
    pub files: Vec<LockedFile>,
}

impl LockedPackage {
    pub fn normalized_name(&self) -> PackageName {
        PackageName::new(&self.name)
    }
}

/// Parsed lockfile. Only the data needed for dependency resolution and
/// hash collection is kept; everything else in the document is ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LockFile {
    pub packages: Vec<LockedPackage>,
}

#[derive(Deserialize)]
struct RawLockFile {
    #[serde(default, rename = "package")]
    packages: Vec<RawPackage>,
    #[serde(default)]
    metadata: RawMetadata,
}

#[derive(Default, Deserialize)]
struct RawMetadata {
    #[serde(default)]
    files: BTreeMap<String, Vec<LockedFile>>,
}

#[derive(Deserialize)]
struct RawPackage {
    name: String,
    version: String,
    #[serde(default)]
    dependencies: Option<DependencyList>,
    #[serde(default)]
    files: Vec<LockedFile>,
}

/// Poetry writes `[package.dependencies]` as a table keyed by name; other
/// lockfile writers emit an array of names or `{name = ...}` tables.
#[derive(Deserialize)]
#[serde(untagged)]
enum DependencyList {
    Table(BTreeMap<String, toml::Value>),
    Array(Vec<DependencyRef>),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum DependencyRef {
    Name(String),
    Entry { name: String },
}

impl DependencyList {
    fn into_names(self) -> Vec<String> {
        match self {
            DependencyList::Table(table) => table.into_keys().collect(),
            DependencyList::Array(entries) => entries
                .into_iter()
                .map(|entry| match entry {
                    DependencyRef::Name(spec) => requirement_name(&spec).to_owned(),
                    DependencyRef::Entry { name } => name,
                })
                .filter(|name| !name.is_empty())
                .collect(),
        }
    }
}

impl LockFile {
    pub fn parse_str(input: &str) -> Result<Self, LockError> {
        let raw: RawLockFile = toml::from_str(input)?;

        // Legacy lockfiles keep hashes under [metadata.files] keyed by name.
        let legacy: BTreeMap<PackageName, Vec<LockedFile>> = raw
            .metadata
            .files
            .into_iter()
            .map(|(name, files)| (PackageName::new(&name), files))
            .collect();

        let packages = raw
            .packages
            .into_iter()
            .map(|pkg| {
                let files = if pkg.files.is_empty() {
                    legacy
                        .get(&PackageName::new(&pkg.name))
                        .cloned()
                        .unwrap_or_default()
                } else {
                    pkg.files
                };
                LockedPackage {
                    dependencies: pkg
                        .dependencies
                        .map(DependencyList::into_names)
                        .unwrap_or_default(),
                    name: pkg.name,
                    version: pkg.version,
                    files,
                }
            })
            .collect();

        Ok(Self { packages })
    }

    pub fn read_from_file(path: impl AsRef<Path>) -> Result<Self, LockError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(LockError::NotFound(path.to_path_buf()));
        }
        let content = fs::read_to_string(path).map_err(|source| LockError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let lock = Self::parse_str(&content)?;
        debug!(
            "parsed {} locked packages from {}",
            lock.packages.len(),
            path.display()
        );
        Ok(lock)
    }
}

pub fn read_lockfile_packages(path: impl AsRef<Path>) -> Result<Vec<LockedPackage>, LockError> {
    Ok(LockFile::read_from_file(path)?.packages)
}
