use super::{colorize_status, json_pretty, store_error, EXIT_FAILURE, EXIT_SUCCESS};
use std::path::Path;
use wheelhouse_store::{verify_artifacts, HashSumsFile};

pub fn run(sums: &Path, dir: &Path, json: bool) -> Result<u8, String> {
    let sums = HashSumsFile::read_from_file(sums).map_err(|e| store_error(&e))?;
    let report = verify_artifacts(dir, &sums).map_err(|e| store_error(&e))?;

    if json {
        println!("{}", json_pretty(&report)?);
    } else {
        println!(
            "artifact integrity: {}/{} files passed",
            report.passed, report.checked
        );
        for name in &report.missing {
            println!("  {} {name}", colorize_status("missing"));
        }
        for f in &report.failed {
            println!("  {} {}: {}", colorize_status("FAIL"), f.filename, f.reason);
        }
    }

    if report.is_clean() {
        Ok(EXIT_SUCCESS)
    } else {
        Ok(EXIT_FAILURE)
    }
}
