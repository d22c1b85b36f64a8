use crate::sums::HashSumsFile;
use std::collections::BTreeSet;

pub const DEFAULT_WHEELS_BASE_URL: &str = "https://dev-bin.ops.securedrop.org/localwheels";
pub const WHEELS_BASE_URL_ENV: &str = "WHEELS_BUCKET_BASE_URL";

/// One download URL per distinct filename in `sums`, sorted by filename.
pub fn download_urls(sums: &HashSumsFile, base_url: &str) -> Vec<String> {
    let base = base_url.trim_end_matches('/');
    sums.iter()
        .map(|entry| entry.filename.as_str())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(|filename| format!("{base}/{filename}"))
        .collect()
}
