use super::{core_error, json_pretty, spin_fail, spin_ok, spinner, store_error, EXIT_SUCCESS};
use std::path::{Path, PathBuf};
use wheelhouse_core::{add_hash_sums, CoreError, Project};
use wheelhouse_schema::{read_pinned_requirements, Dependency};
use wheelhouse_store::{verify_hash_signature_present, verify_hash_sums_file_present};

/// Where the dependencies to pin come from.
#[derive(Debug)]
pub enum Source {
    Requirements(PathBuf),
    Poetry { pyproject: PathBuf, lock: PathBuf },
}

impl Source {
    fn dependencies(&self) -> Result<Vec<Dependency>, String> {
        match self {
            Source::Requirements(path) => {
                read_pinned_requirements(path).map_err(|e| core_error(&CoreError::from(e)))
            }
            Source::Poetry { pyproject, lock } => Project::open(pyproject, lock)
                .and_then(|project| project.locked_dependencies())
                .map_err(|e| core_error(&e)),
        }
    }
}

pub fn run(
    source: &Source,
    output: &Path,
    sums: &Path,
    pkg_dir: &Path,
    build_script: &str,
    json: bool,
) -> Result<u8, String> {
    verify_hash_sums_file_present(sums).map_err(|e| store_error(&e))?;
    verify_hash_signature_present(sums).map_err(|e| store_error(&e))?;

    let declared = source.dependencies()?;

    let pb = (!json).then(|| spinner("pinning wheel hashes..."));
    match add_hash_sums(output, &declared, sums, pkg_dir, build_script) {
        Ok(()) => {
            if let Some(pb) = &pb {
                spin_ok(
                    pb,
                    &format!("pinned {} requirements in {}", declared.len(), output.display()),
                );
            }
        }
        Err(e) => {
            if let Some(pb) = &pb {
                spin_fail(pb, "pinning failed");
            }
            return Err(core_error(&e));
        }
    }

    if json {
        let payload = serde_json::json!({
            "output": output.display().to_string(),
            "sums": sums.display().to_string(),
            "pinned": declared.iter().map(Dependency::pin).collect::<Vec<_>>(),
        });
        println!("{}", json_pretty(&payload)?);
    }
    Ok(EXIT_SUCCESS)
}
