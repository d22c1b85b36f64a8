use crate::hashes::{collect_hashes_from_lockfile, render_pinned_document, LOCKFILE_HINT};
use crate::resolve::{
    relevant_locked_packages, resolve_relevant_dependencies, unlocked_dependencies,
};
use crate::CoreError;
use std::collections::BTreeSet;
use std::path::Path;
use wheelhouse_schema::{
    read_lockfile_packages, read_project_declared_dependencies, Dependency, HashRecord,
    LockedPackage,
};

/// A Poetry project: its declared main dependencies and its lockfile.
#[derive(Debug, Clone)]
pub struct Project {
    declared: BTreeSet<String>,
    packages: Vec<LockedPackage>,
}

impl Project {
    pub fn open(pyproject: &Path, lockfile: &Path) -> Result<Self, CoreError> {
        Ok(Self {
            declared: read_project_declared_dependencies(pyproject)?,
            packages: read_lockfile_packages(lockfile)?,
        })
    }

    pub fn declared(&self) -> &BTreeSet<String> {
        &self.declared
    }

    pub fn packages(&self) -> &[LockedPackage] {
        &self.packages
    }

    /// Normalized names of every package the main dependencies pull in.
    pub fn relevant_dependencies(&self) -> BTreeSet<String> {
        resolve_relevant_dependencies(&self.declared, &self.packages)
    }

    /// Locked `(name, version)` pairs of the relevant dependencies.
    ///
    /// A relevant name without a lockfile entry has no version to pin, so it
    /// is reported as [`CoreError::HashMissing`].
    pub fn locked_dependencies(&self) -> Result<Vec<Dependency>, CoreError> {
        let relevant = self.relevant_dependencies();
        let unlocked = unlocked_dependencies(&self.packages, &relevant);
        if !unlocked.is_empty() {
            return Err(CoreError::HashMissing {
                dependencies: unlocked,
                hint: Some(LOCKFILE_HINT.to_owned()),
            });
        }
        Ok(relevant_locked_packages(&self.packages, &relevant))
    }

    pub fn hashes(&self) -> Result<HashRecord, CoreError> {
        collect_hashes_from_lockfile(&self.packages, &self.relevant_dependencies())
    }

    /// The hashed requirements document for the main dependencies.
    pub fn requirements_document(&self) -> Result<String, CoreError> {
        Ok(render_pinned_document(&self.hashes()?))
    }
}
