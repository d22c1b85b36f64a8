use super::{colorize_status, json_pretty, store_error, EXIT_SUCCESS};
use std::path::Path;
use wheelhouse_store::create_project_dirs;

pub fn run(requirements: &Path, simple: &Path, template: &Path, json: bool) -> Result<u8, String> {
    let text = std::fs::read_to_string(requirements).map_err(|e| {
        format!(
            "{} failed to read {}: {e}",
            super::CONFIG_ERROR_PREFIX,
            requirements.display()
        )
    })?;
    let report = create_project_dirs(simple, &text, template).map_err(|e| store_error(&e))?;

    if json {
        println!("{}", json_pretty(&report)?);
    } else {
        for name in &report.created {
            println!("  {} {name}", colorize_status("created"));
        }
        for name in &report.existing {
            println!("  {} {name}", colorize_status("exists"));
        }
    }
    Ok(EXIT_SUCCESS)
}
