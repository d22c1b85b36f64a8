//! Dependency manifest parsing, name normalization and digest types for wheelhouse.
//!
//! This crate defines the schema layer: pinned and hashed `requirements.txt`
//! parsing (`read_pinned_requirements`, `read_requirement_hashes`), `poetry.lock`
//! parsing (`LockFile`, `LockedPackage`), `pyproject.toml` dependency declarations
//! (`PyProject`), PEP 503 name normalization (`normalize`) and the validated
//! `Sha256Digest` / `HashRecord` types shared by every other crate.

pub mod lock;
pub mod manifest;
pub mod normalize;
pub mod record;
pub mod requirements;
pub mod types;

pub use lock::{read_lockfile_packages, LockError, LockFile, LockedFile, LockedPackage};
pub use manifest::{
    parse_pyproject_file, parse_pyproject_str, read_project_declared_dependencies,
    read_setup_project_name, ManifestError, PyProject,
};
pub use normalize::{
    distribution_name, normalize, requirement_name, Dependency, PYTHON_PSEUDO_DEPENDENCY,
};
pub use record::{HashRecord, PinnedRequirement};
pub use requirements::{
    parse_pinned_requirements, parse_requirement_hashes, read_pinned_requirements,
    read_requirement_hashes, RequirementsError,
};
pub use types::{DigestError, PackageName, Sha256Digest};
