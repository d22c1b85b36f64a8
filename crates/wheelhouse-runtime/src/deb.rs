use crate::{run_checked, RuntimeError};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::debug;

/// Where `make <package>` leaves built `.deb` files, relative to the repo root.
pub const DEB_BUILD_DIR: &str = "build/debbuild/packaging";

/// Paths listed in a `conffiles` control file.
pub fn conffiles_violations(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_owned)
        .collect()
}

/// Fail unless `deb` ships an empty `conffiles` control file.
pub fn check_deb_conffiles(deb: &Path) -> Result<(), RuntimeError> {
    let control = tempfile::tempdir()?;
    run_checked(
        Command::new("dpkg-deb")
            .arg("--control")
            .arg(deb)
            .arg(control.path()),
        &format!("dpkg-deb --control {}", deb.display()),
    )?;

    let conffiles = control.path().join("conffiles");
    if !conffiles.is_file() {
        return Err(RuntimeError::ConffilesMissing(deb.to_path_buf()));
    }
    let paths = conffiles_violations(&fs::read_to_string(&conffiles)?);
    if paths.is_empty() {
        debug!("{} has no conffiles", deb.display());
        Ok(())
    } else {
        Err(RuntimeError::Conffiles {
            deb: deb.to_path_buf(),
            paths,
        })
    }
}

/// `.deb` files in `dir` whose name starts with `prefix`, sorted.
pub fn find_debs(dir: &Path, prefix: &str) -> Result<Vec<PathBuf>, RuntimeError> {
    let mut debs = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        let matches = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.starts_with(prefix) && n.ends_with(".deb"));
        if matches {
            debs.push(path);
        }
    }
    debs.sort();
    Ok(debs)
}
