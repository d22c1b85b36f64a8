use super::{json_pretty, store_error, EXIT_SUCCESS};
use std::path::Path;
use tracing::warn;
use wheelhouse_store::{download_urls, HashSumsFile};

pub fn run(sums: &Path, base_url: &str, json: bool) -> Result<u8, String> {
    let (sums, rejected) = HashSumsFile::read_lenient(sums).map_err(|e| store_error(&e))?;
    for r in &rejected {
        warn!("wrong line {}: {}", r.line, r.content);
    }

    let urls = download_urls(&sums, base_url);
    if json {
        println!("{}", json_pretty(&urls)?);
    } else {
        for url in &urls {
            println!("{url}");
        }
    }
    Ok(EXIT_SUCCESS)
}
