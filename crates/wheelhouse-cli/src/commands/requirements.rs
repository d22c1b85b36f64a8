use super::{core_error, json_pretty, EXIT_SUCCESS};
use std::path::Path;
use wheelhouse_core::{render_pinned_document, write_pinned_document, Project};

pub fn run(pyproject: &Path, lock: &Path, output: Option<&Path>, json: bool) -> Result<u8, String> {
    let project = Project::open(pyproject, lock).map_err(|e| core_error(&e))?;
    let record = project.hashes().map_err(|e| core_error(&e))?;

    match output {
        Some(path) => {
            write_pinned_document(path, &record).map_err(|e| core_error(&e))?;
            if json {
                let payload = serde_json::json!({
                    "output": path.display().to_string(),
                    "requirements": record,
                });
                println!("{}", json_pretty(&payload)?);
            } else {
                println!("wrote {} requirements to {}", record.len(), path.display());
            }
        }
        None if json => println!("{}", json_pretty(&record)?),
        None => println!("{}", render_pinned_document(&record)),
    }
    Ok(EXIT_SUCCESS)
}
