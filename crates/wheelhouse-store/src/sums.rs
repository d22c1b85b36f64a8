use crate::artifact::ArtifactFilename;
use crate::layout::signature_path;
use crate::StoreError;
use serde::Serialize;
use std::fs;
use std::path::Path;
use tracing::debug;
use wheelhouse_schema::Sha256Digest;

/// One `<digest>  <filename>` line of `sha256sums.txt`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HashSumsEntry {
    pub digest: Sha256Digest,
    pub filename: String,
}

impl HashSumsEntry {
    pub fn artifact(&self) -> ArtifactFilename {
        ArtifactFilename::parse(&self.filename)
    }
}

/// A line that did not parse as a hash sums entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RejectedLine {
    pub line: usize,
    pub content: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HashSumsFile {
    pub entries: Vec<HashSumsEntry>,
}

fn parse_line(line: &str) -> Option<HashSumsEntry> {
    let mut parts = line.split_whitespace();
    let digest = Sha256Digest::parse(parts.next()?).ok()?;
    // sha256sum marks binary-mode entries with a leading '*'.
    let filename = parts.next()?.trim_start_matches('*');
    if filename.is_empty() || parts.next().is_some() {
        return None;
    }
    // Entries may carry a relative path; only the file name identifies the artifact.
    let filename = filename.rsplit('/').next().unwrap_or(filename);
    Some(HashSumsEntry {
        digest,
        filename: filename.to_owned(),
    })
}

impl HashSumsFile {
    /// Parse, failing on the first line that is not `<64-hex>  <filename>`.
    pub fn parse(input: &str) -> Result<Self, StoreError> {
        let mut entries = Vec::new();
        for (idx, line) in input.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let entry = parse_line(line).ok_or_else(|| StoreError::Format {
                line: idx + 1,
                content: line.trim().to_owned(),
            })?;
            entries.push(entry);
        }
        Ok(Self { entries })
    }

    /// Parse, collecting unparseable lines instead of failing.
    pub fn parse_lenient(input: &str) -> (Self, Vec<RejectedLine>) {
        let mut entries = Vec::new();
        let mut rejected = Vec::new();
        for (idx, line) in input.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            match parse_line(line) {
                Some(entry) => entries.push(entry),
                None => rejected.push(RejectedLine {
                    line: idx + 1,
                    content: line.trim().to_owned(),
                }),
            }
        }
        (Self { entries }, rejected)
    }

    pub fn read_from_file(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        verify_hash_sums_file_present(path)?;
        let sums = Self::parse(&fs::read_to_string(path)?)?;
        debug!("{} hash sums entries in {}", sums.len(), path.display());
        Ok(sums)
    }

    pub fn read_lenient(path: impl AsRef<Path>) -> Result<(Self, Vec<RejectedLine>), StoreError> {
        let path = path.as_ref();
        verify_hash_sums_file_present(path)?;
        Ok(Self::parse_lenient(&fs::read_to_string(path)?))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, HashSumsEntry> {
        self.entries.iter()
    }
}

/// Fail unless the hash sums file exists.
pub fn verify_hash_sums_file_present(path: &Path) -> Result<(), StoreError> {
    if path.is_file() {
        Ok(())
    } else {
        Err(StoreError::SumsMissing(path.to_path_buf()))
    }
}

/// Fail unless the detached signature `<path>.asc` exists. The signature is
/// not verified.
pub fn verify_hash_signature_present(path: &Path) -> Result<(), StoreError> {
    let signature = signature_path(path);
    if signature.is_file() {
        Ok(())
    } else {
        Err(StoreError::SignatureMissing(signature))
    }
}
