use super::{json_pretty, prereq_error, spin_fail, spin_ok, spinner, EXIT_FAILURE, EXIT_SUCCESS};
use std::path::Path;
use wheelhouse_runtime::{check_prereqs, repo_root, ReprotestPlan, REPROTEST_PACKAGES};

pub fn run(packages: &[String], git_ref: &str, json: bool) -> Result<u8, String> {
    let missing = check_prereqs(&["reprotest", "make", "git"]);
    if !missing.is_empty() {
        return Err(prereq_error(&missing));
    }
    let root = repo_root(Path::new(".")).map_err(|e| e.to_string())?;

    let plans: Vec<ReprotestPlan> = if packages.is_empty() {
        REPROTEST_PACKAGES
            .iter()
            .map(|p| ReprotestPlan::new(p, git_ref))
            .collect()
    } else {
        packages
            .iter()
            .map(|p| ReprotestPlan::new(p, git_ref))
            .collect()
    };

    let mut results = Vec::new();
    for plan in &plans {
        let pb = (!json).then(|| spinner(&format!("reprotest {}...", plan.package)));
        let outcome = plan.run(&root);
        if let Some(pb) = &pb {
            match &outcome {
                Ok(()) => spin_ok(pb, &format!("{} is reproducible", plan.package)),
                Err(e) => spin_fail(pb, &e.to_string()),
            }
        }
        results.push(serde_json::json!({
            "package": plan.package,
            "git_ref": plan.git_ref,
            "reproducible": outcome.is_ok(),
            "error": outcome.err().map(|e| e.to_string()),
        }));
    }

    let failed = results
        .iter()
        .filter(|r| r["reproducible"] == serde_json::Value::Bool(false))
        .count();
    if json {
        println!("{}", json_pretty(&results)?);
    }
    if failed == 0 {
        Ok(EXIT_SUCCESS)
    } else {
        Ok(EXIT_FAILURE)
    }
}
