use crate::StoreError;
use chrono::{Days, NaiveDate};
use regex::Regex;
use serde::Serialize;
use std::fs;
use std::path::PathBuf;
use std::sync::LazyLock;
use tracing::{debug, info};

pub const DEFAULT_RETENTION_DAYS: u64 = 14;

static NIGHTLY_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"-dev-(\d{8})-").expect("invalid nightly date regex"));

/// The `YYYYMMDD` build date embedded in a nightly package filename.
pub fn nightly_date(filename: &str) -> Option<&str> {
    NIGHTLY_DATE
        .captures(filename)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// `today - retention_days` as a `YYYYMMDD` token.
pub fn cutoff_for(today: NaiveDate, retention_days: u64) -> String {
    today
        .checked_sub_days(Days::new(retention_days))
        .unwrap_or(NaiveDate::MIN)
        .format("%Y%m%d")
        .to_string()
}

/// Removes nightly `.deb` builds older than a cutoff date from one directory.
pub struct NightlyPruner {
    dir: PathBuf,
}

#[derive(Debug, Default, Serialize)]
pub struct PruneReport {
    pub cutoff: String,
    pub dry_run: bool,
    /// Nightlies older than the cutoff, sorted by filename.
    pub expired: Vec<String>,
    pub retained: usize,
    pub removed: usize,
}

impl NightlyPruner {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Delete every `*.deb` whose `-dev-YYYYMMDD-` token sorts strictly
    /// before `cutoff`. Files without a token are ignored.
    pub fn prune(&self, cutoff: &str, dry_run: bool) -> Result<PruneReport, StoreError> {
        if !self.dir.is_dir() {
            return Err(StoreError::DirectoryNotFound(self.dir.clone()));
        }

        let mut report = PruneReport {
            cutoff: cutoff.to_owned(),
            dry_run,
            ..Default::default()
        };

        for entry in fs::read_dir(&self.dir)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let Some(name) = entry.file_name().to_str().map(str::to_owned) else {
                continue;
            };
            if !name.ends_with(".deb") {
                continue;
            }
            match nightly_date(&name) {
                Some(date) if date < cutoff => report.expired.push(name),
                Some(_) => report.retained += 1,
                None => debug!("skipping {name}: no nightly date"),
            }
        }
        report.expired.sort();

        info!("deleting files older than {cutoff}");
        if !dry_run {
            for name in &report.expired {
                info!("deleting {name}");
                fs::remove_file(self.dir.join(name))?;
                report.removed += 1;
            }
        }

        Ok(report)
    }
}
