use super::{json_pretty, store_error, EXIT_SUCCESS};
use std::path::Path;
use wheelhouse_store::{cutoff_for, NightlyPruner};

pub fn run(dir: &Path, days: u64, dry_run: bool, json: bool) -> Result<u8, String> {
    let cutoff = cutoff_for(chrono::Local::now().date_naive(), days);
    let report = NightlyPruner::new(dir)
        .prune(&cutoff, dry_run)
        .map_err(|e| store_error(&e))?;

    if json {
        println!("{}", json_pretty(&report)?);
    } else {
        let prefix = if dry_run { "would delete" } else { "deleted" };
        for name in &report.expired {
            println!("{prefix} {name}");
        }
        println!(
            "clean-nightlies: {prefix} {} packages older than {cutoff}, kept {}",
            report.expired.len(),
            report.retained
        );
    }
    Ok(EXIT_SUCCESS)
}
