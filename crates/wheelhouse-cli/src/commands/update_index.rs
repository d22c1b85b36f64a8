use super::{json_pretty, store_error, EXIT_SUCCESS};
use std::path::Path;
use wheelhouse_store::write_simple_index;

pub fn run(simple: &Path, json: bool) -> Result<u8, String> {
    let projects = write_simple_index(simple).map_err(|e| store_error(&e))?;

    if json {
        let payload = serde_json::json!({
            "index": simple.join("index.html").display().to_string(),
            "projects": projects,
        });
        println!("{}", json_pretty(&payload)?);
    } else {
        println!("index: {} projects in {}", projects.len(), simple.display());
    }
    Ok(EXIT_SUCCESS)
}
