//! Dependency reconciliation and hash indexing for wheelhouse.
//!
//! This crate ties the schema and store layers together: the dependency
//! resolver computes which locked packages a project actually ships, the hash
//! indexer turns lockfiles or signed hash sums into pinned requirements
//! documents, `Project` wraps a pyproject/lockfile pair, and `Settings` holds
//! the optional `wheelhouse.toml` configuration.

pub mod config;
pub mod hashes;
pub mod project;
pub mod resolve;

pub use config::Settings;
pub use hashes::{
    add_hash_sums, collect_hashes_from_hash_sums, collect_hashes_from_lockfile,
    render_pinned_document, write_pinned_document,
};
pub use project::Project;
pub use resolve::{
    relevant_locked_packages, resolve_relevant_dependencies, unlocked_dependencies,
};

use thiserror::Error;
use wheelhouse_schema::{DigestError, LockError, ManifestError, RequirementsError};
use wheelhouse_store::StoreError;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("manifest error: {0}")]
    Manifest(#[from] ManifestError),
    #[error("lock error: {0}")]
    Lock(#[from] LockError),
    #[error("requirements error: {0}")]
    Requirements(#[from] RequirementsError),
    #[error("store error: {0}")]
    Store(#[from] StoreError),
    #[error("no hashes found for: {}", .dependencies.join(", "))]
    HashMissing {
        dependencies: Vec<String>,
        hint: Option<String>,
    },
    #[error("invalid hash for {dependency}: {source}")]
    Format {
        dependency: String,
        source: DigestError,
    },
    #[error("invalid settings: {0}")]
    Settings(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CoreError {
    /// Missing or unreadable inputs, as opposed to inputs with bad content.
    pub fn is_configuration(&self) -> bool {
        match self {
            CoreError::Manifest(_) | CoreError::Lock(_) | CoreError::Settings(_) => true,
            CoreError::Requirements(e) => matches!(
                e,
                RequirementsError::NotFound(_) | RequirementsError::Io { .. }
            ),
            CoreError::Store(e) => e.is_configuration(),
            CoreError::HashMissing { .. } | CoreError::Format { .. } | CoreError::Io(_) => false,
        }
    }

    /// Operator guidance attached to the error, if any.
    pub fn hint(&self) -> Option<&str> {
        match self {
            CoreError::HashMissing { hint, .. } => hint.as_deref(),
            _ => None,
        }
    }
}
