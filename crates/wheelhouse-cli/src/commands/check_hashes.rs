use super::{core_error, json_pretty, EXIT_SUCCESS};
use std::path::Path;
use wheelhouse_core::CoreError;
use wheelhouse_schema::read_requirement_hashes;

pub fn run(requirements: &Path, json: bool) -> Result<u8, String> {
    let record =
        read_requirement_hashes(requirements).map_err(|e| core_error(&CoreError::from(e)))?;

    if json {
        println!("{}", json_pretty(&record)?);
    } else {
        println!(
            "{}: {} requirements, all hashed",
            requirements.display(),
            record.len()
        );
    }
    Ok(EXIT_SUCCESS)
}
