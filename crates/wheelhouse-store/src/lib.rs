//! Artifact repository handling for wheelhouse.
//!
//! This crate owns everything that touches the on-disk wheel repository:
//! `RepoLayout` for its directory structure, `HashSumsFile` for the signed
//! `sha256sums.txt`, `ArtifactFilename` for telling wheels from source
//! distributions, `verify_artifacts` for SHA-256 integrity checks,
//! `NightlyPruner` for retiring aged nightly `.deb` builds, the simple-index
//! writers and the download-URL lister.

pub mod artifact;
pub mod index;
pub mod integrity;
pub mod layout;
pub mod prune;
pub mod sums;
pub mod urls;

pub use artifact::{ArtifactFilename, ArtifactKind};
pub use index::{create_project_dirs, render_simple_index, write_simple_index, ProjectDirsReport};
pub use integrity::{sha256_file, verify_artifacts, IntegrityFailure, IntegrityReport};
pub use layout::{signature_path, RepoLayout, SUMS_FILE};
pub use prune::{cutoff_for, nightly_date, NightlyPruner, PruneReport, DEFAULT_RETENTION_DAYS};
pub use sums::{
    verify_hash_signature_present, verify_hash_sums_file_present, HashSumsEntry, HashSumsFile,
    RejectedLine,
};
pub use urls::{download_urls, DEFAULT_WHEELS_BASE_URL, WHEELS_BASE_URL_ENV};

use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use thiserror::Error;

/// Fsync a directory so that a preceding `rename()` is durable.
pub(crate) fn fsync_dir(dir: &Path) -> Result<(), std::io::Error> {
    let f = std::fs::File::open(dir)?;
    f.sync_all()
}

/// Replace `path` with `content` through a temp file in the same directory.
pub fn write_atomic(path: &Path, content: &[u8]) -> Result<(), StoreError> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| StoreError::Io(e.error))?;
    fsync_dir(dir)?;
    Ok(())
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("hash sums file not found: {}", .0.display())]
    SumsMissing(PathBuf),
    #[error("signature file not found: {}", .0.display())]
    SignatureMissing(PathBuf),
    #[error("malformed hash sums line {line}: '{content}'. Check that hashes are present for all requirements")]
    Format { line: usize, content: String },
    #[error("line {line}: expected 'name==version', got '{content}'")]
    InvalidRequirement { line: usize, content: String },
    #[error("directory not found: {}", .0.display())]
    DirectoryNotFound(PathBuf),
    #[error("template not found: {}", .0.display())]
    TemplateMissing(PathBuf),
}

impl StoreError {
    /// Errors caused by a missing or misplaced input rather than bad data.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            StoreError::DirectoryNotFound(_) | StoreError::TemplateMissing(_)
        )
    }
}
