use super::{core_error, json_pretty, EXIT_SUCCESS};
use std::path::Path;
use wheelhouse_core::CoreError;
use wheelhouse_schema::read_setup_project_name;

pub fn run(dir: &Path, json: bool) -> Result<u8, String> {
    let name = read_setup_project_name(dir).map_err(|e| core_error(&CoreError::from(e)))?;
    if json {
        println!("{}", json_pretty(&serde_json::json!({ "name": name }))?);
    } else {
        println!("{name}");
    }
    Ok(EXIT_SUCCESS)
}
