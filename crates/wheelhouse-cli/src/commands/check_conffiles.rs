use super::{colorize_status, json_pretty, prereq_error, EXIT_FAILURE, EXIT_SUCCESS};
use std::path::{Path, PathBuf};
use wheelhouse_runtime::{check_deb_conffiles, check_prereqs, find_debs, repo_root, DEB_BUILD_DIR};

pub fn run(debs: &[PathBuf], prefix: &str, json: bool) -> Result<u8, String> {
    let missing = check_prereqs(&["dpkg-deb"]);
    if !missing.is_empty() {
        return Err(prereq_error(&missing));
    }

    let debs = if debs.is_empty() {
        let root = repo_root(Path::new(".")).map_err(|e| e.to_string())?;
        find_debs(&root.join(DEB_BUILD_DIR), prefix).map_err(|e| e.to_string())?
    } else {
        debs.to_vec()
    };
    if debs.is_empty() {
        return Err(format!("no {prefix}*.deb packages found"));
    }

    let mut failures = Vec::new();
    for deb in &debs {
        match check_deb_conffiles(deb) {
            Ok(()) => {
                if !json {
                    println!("  {} {}", colorize_status("ok"), deb.display());
                }
            }
            Err(e) => {
                if !json {
                    println!("  {} {e}", colorize_status("FAIL"));
                }
                failures.push(serde_json::json!({
                    "deb": deb.display().to_string(),
                    "reason": e.to_string(),
                }));
            }
        }
    }

    if json {
        let payload = serde_json::json!({
            "checked": debs.len(),
            "failed": failures,
        });
        println!("{}", json_pretty(&payload)?);
    }
    if failures.is_empty() {
        Ok(EXIT_SUCCESS)
    } else {
        Ok(EXIT_FAILURE)
    }
}
