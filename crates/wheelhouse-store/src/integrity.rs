use crate::sums::HashSumsFile;
use crate::StoreError;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::debug;

#[derive(Debug, Default, Serialize)]
pub struct IntegrityReport {
    pub checked: usize,
    pub passed: usize,
    /// Listed in the sums file but absent from the directory.
    pub missing: Vec<String>,
    pub failed: Vec<IntegrityFailure>,
}

impl IntegrityReport {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

#[derive(Debug, Serialize)]
pub struct IntegrityFailure {
    pub filename: String,
    pub reason: String,
}

/// Hex SHA-256 of a file, streamed in 64 KiB chunks.
pub fn sha256_file(path: &Path) -> std::io::Result<String> {
    let mut reader = BufReader::new(File::open(path)?);
    let mut hasher = Sha256::new();
    let mut buffer = [0u8; 65536];
    loop {
        let n = reader.read(&mut buffer)?;
        if n == 0 {
            break;
        }
        hasher.update(&buffer[..n]);
    }
    Ok(format!("{:x}", hasher.finalize()))
}

/// Recompute the digest of every sums entry present under `dir`.
pub fn verify_artifacts(dir: &Path, sums: &HashSumsFile) -> Result<IntegrityReport, StoreError> {
    if !dir.is_dir() {
        return Err(StoreError::DirectoryNotFound(dir.to_path_buf()));
    }

    let mut report = IntegrityReport::default();
    for entry in sums.iter() {
        let path = dir.join(&entry.filename);
        if !path.is_file() {
            report.missing.push(entry.filename.clone());
            continue;
        }
        report.checked += 1;
        match sha256_file(&path) {
            Ok(actual) if actual == entry.digest.as_str() => report.passed += 1,
            Ok(actual) => report.failed.push(IntegrityFailure {
                filename: entry.filename.clone(),
                reason: format!("sha256 mismatch: expected {}, got {actual}", entry.digest),
            }),
            Err(e) => report.failed.push(IntegrityFailure {
                filename: entry.filename.clone(),
                reason: format!("read error: {e}"),
            }),
        }
    }

    debug!(
        "verified {} artifacts in {}: {} passed, {} missing",
        report.checked,
        dir.display(),
        report.passed,
        report.missing.len()
    );
    Ok(report)
}
