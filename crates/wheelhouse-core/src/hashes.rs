//! Building pinned, hashed requirements documents.
//!
//! Hashes come from one of two places: the `files` entries of a lockfile, or
//! the signed `sha256sums.txt` that lists every wheel we built ourselves.
//! Either way every relevant dependency must end up with at least one digest.

use crate::resolve::unlocked_dependencies;
use crate::CoreError;
use std::collections::BTreeSet;
use std::path::Path;
use tracing::{debug, info, warn};
use wheelhouse_schema::{
    Dependency, HashRecord, LockedPackage, PackageName, PinnedRequirement, Sha256Digest,
};
use wheelhouse_store::{write_atomic, HashSumsFile};

pub(crate) const LOCKFILE_HINT: &str =
    "regenerate the lockfile so every dependency records its files";

/// Hash record for every relevant locked package, keyed by normalized name.
///
/// Relevant names with no lockfile entry, and entries without any files, are
/// reported together as missing.
pub fn collect_hashes_from_lockfile(
    packages: &[LockedPackage],
    relevant: &BTreeSet<String>,
) -> Result<HashRecord, CoreError> {
    let mut record = HashRecord::new();
    let mut missing = Vec::new();

    for pkg in packages {
        let name = pkg.normalized_name();
        if !relevant.contains(name.as_str()) {
            continue;
        }

        let mut hashes = Vec::with_capacity(pkg.files.len());
        for file in &pkg.files {
            let digest = Sha256Digest::parse(&file.hash).map_err(|source| CoreError::Format {
                dependency: format!("{name}=={}", pkg.version),
                source,
            })?;
            hashes.push(digest);
        }
        if hashes.is_empty() {
            missing.push(format!("{name}=={}", pkg.version));
            continue;
        }
        record.push(PinnedRequirement {
            name: name.into_inner(),
            version: pkg.version.clone(),
            hashes,
        });
    }

    missing.extend(unlocked_dependencies(packages, relevant));
    if !missing.is_empty() {
        return Err(CoreError::HashMissing {
            dependencies: missing,
            hint: Some(LOCKFILE_HINT.to_owned()),
        });
    }

    debug!("collected hashes for {} locked packages", record.len());
    Ok(record)
}

/// Hash record for `declared` using only the wheel entries of `sums`.
///
/// Source distributions are never pinned. Every declared dependency without a
/// matching wheel is reported in a single error.
pub fn collect_hashes_from_hash_sums(
    sums: &HashSumsFile,
    declared: &[Dependency],
) -> Result<HashRecord, CoreError> {
    let mut record = HashRecord::new();
    let mut missing = Vec::new();

    for dep in declared {
        let name = PackageName::new(&dep.name);
        let hashes: Vec<Sha256Digest> = sums
            .iter()
            .filter(|entry| entry.artifact().is_wheel_for(&name, &dep.version))
            .map(|entry| entry.digest.clone())
            .collect();
        if hashes.is_empty() {
            warn!("no wheel hash for {}", dep.pin());
            missing.push(dep.pin());
            continue;
        }
        record.push(PinnedRequirement {
            name: dep.name.clone(),
            version: dep.version.clone(),
            hashes,
        });
    }

    if missing.is_empty() {
        Ok(record)
    } else {
        Err(CoreError::HashMissing {
            dependencies: missing,
            hint: None,
        })
    }
}

/// `name==version --hash=sha256:<hex> ...`, one line per entry, in record order.
pub fn render_pinned_document(record: &HashRecord) -> String {
    record
        .iter()
        .map(|req| {
            let mut line = req.key();
            for digest in &req.hashes {
                line.push(' ');
                line.push_str(&digest.requirement_option());
            }
            line
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Render `record` and atomically replace `output` with it.
pub fn write_pinned_document(output: &Path, record: &HashRecord) -> Result<(), CoreError> {
    let mut document = render_pinned_document(record);
    if !document.is_empty() {
        document.push('\n');
    }
    write_atomic(output, document.as_bytes())?;
    info!("wrote {} pinned requirements to {}", record.len(), output.display());
    Ok(())
}

/// Pin `declared` to the wheel digests listed in `sums_path` and write the
/// result to `output`.
///
/// Missing wheels produce a [`CoreError::HashMissing`] whose hint runs
/// `build_script` for `pkg_dir`.
pub fn add_hash_sums(
    output: &Path,
    declared: &[Dependency],
    sums_path: &Path,
    pkg_dir: &Path,
    build_script: &str,
) -> Result<(), CoreError> {
    let sums = HashSumsFile::read_from_file(sums_path)?;
    let record = match collect_hashes_from_hash_sums(&sums, declared) {
        Ok(record) => record,
        Err(CoreError::HashMissing { dependencies, .. }) => {
            return Err(CoreError::HashMissing {
                dependencies,
                hint: Some(format!(
                    "build the missing wheels first: {build_script} --pkg-dir {} --project <project>",
                    pkg_dir.display()
                )),
            })
        }
        Err(e) => return Err(e),
    };
    write_pinned_document(output, &record)
}
