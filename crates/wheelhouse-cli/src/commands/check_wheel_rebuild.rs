use super::{json_pretty, prereq_error, spin_fail, spin_ok, spinner, EXIT_FAILURE, EXIT_SUCCESS};
use std::path::Path;
use wheelhouse_runtime::{check_prereqs, repo_root, WheelRebuildPlan, WHEEL_PROJECTS};

pub fn run(
    names: &[String],
    repo_url: &str,
    workdir: &Path,
    build_script: &str,
    json: bool,
) -> Result<u8, String> {
    let missing = check_prereqs(&["git"]);
    if !missing.is_empty() {
        return Err(prereq_error(&missing));
    }
    let root = repo_root(Path::new(".")).map_err(|e| e.to_string())?;

    let names: Vec<&str> = if names.is_empty() {
        WHEEL_PROJECTS.to_vec()
    } else {
        names.iter().map(String::as_str).collect()
    };

    let mut failed = Vec::new();
    for name in names {
        let plan = WheelRebuildPlan::new(name, repo_url, workdir, build_script);
        let pb = (!json).then(|| spinner(&format!("rebuilding {}...", plan.project)));
        match plan.run(&root) {
            Ok(()) => {
                if let Some(pb) = &pb {
                    spin_ok(pb, &format!("{} wheels match", plan.project));
                }
            }
            Err(e) => {
                if let Some(pb) = &pb {
                    spin_fail(pb, &e.to_string());
                }
                failed.push(serde_json::json!({
                    "project": plan.project,
                    "reason": e.to_string(),
                }));
                // Later rebuilds would run against an already dirty tree.
                break;
            }
        }
    }

    if json {
        println!("{}", json_pretty(&serde_json::json!({ "failed": failed }))?);
    }
    if failed.is_empty() {
        Ok(EXIT_SUCCESS)
    } else {
        Ok(EXIT_FAILURE)
    }
}
