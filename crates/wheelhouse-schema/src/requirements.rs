//! Pinned requirements files (`name==version`, optionally followed by
//! `--hash=sha256:<hex>` options on the same or continuation lines).

use crate::normalize::Dependency;
use crate::record::{HashRecord, PinnedRequirement};
use crate::types::{DigestError, Sha256Digest};
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum RequirementsError {
    #[error("requirements file not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("no hashes for: {}", .0.join(", "))]
    NoHashes(Vec<String>),
    #[error("line {line}: {source}")]
    InvalidDigest { line: usize, source: DigestError },
    #[error("line {line}: hash option without a preceding requirement: '{content}'")]
    Malformed { line: usize, content: String },
}

static HASH_OPTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"--hash[=\s]\s*(\S+)").expect("invalid hash option regex")
});

/// Split a requirement line into name and version.
///
/// The version is the first whitespace-delimited token after the first `==`,
/// with a trailing `\` continuation marker and any `;` environment marker
/// removed. Comments, blank lines, option lines and lines without `==` yield
/// `None`.
fn split_pin(line: &str) -> Option<(&str, &str)> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') || line.starts_with('-') {
        return None;
    }
    let (name, rest) = line.split_once("==")?;
    let token = rest.split_whitespace().next()?;
    let token = token.trim_end_matches('\\');
    let version = token.split(';').next().unwrap_or(token).trim();
    let name = name.trim();
    if name.is_empty() || version.is_empty() {
        return None;
    }
    Some((name, version))
}

pub fn parse_pinned_requirements(input: &str) -> Vec<Dependency> {
    input
        .lines()
        .filter_map(split_pin)
        .map(|(name, version)| Dependency::new(name, version))
        .collect()
}

/// Parse a hashed requirements file into a [`HashRecord`].
///
/// Every requirement must carry at least one hash; all requirements lacking
/// one are reported together.
pub fn parse_requirement_hashes(input: &str) -> Result<HashRecord, RequirementsError> {
    let mut entries: Vec<PinnedRequirement> = Vec::new();

    for (idx, line) in input.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        if let Some((name, version)) = split_pin(trimmed) {
            entries.push(PinnedRequirement {
                name: name.to_owned(),
                version: version.to_owned(),
                hashes: Vec::new(),
            });
        }
        for caps in HASH_OPTION.captures_iter(trimmed) {
            let raw = caps[1].trim_end_matches('\\');
            let digest = Sha256Digest::parse(raw).map_err(|source| {
                RequirementsError::InvalidDigest {
                    line: idx + 1,
                    source,
                }
            })?;
            let Some(current) = entries.last_mut() else {
                return Err(RequirementsError::Malformed {
                    line: idx + 1,
                    content: trimmed.to_owned(),
                });
            };
            current.hashes.push(digest);
        }
    }

    let missing: Vec<String> = entries
        .iter()
        .filter(|e| e.hashes.is_empty())
        .map(PinnedRequirement::key)
        .collect();
    if !missing.is_empty() {
        return Err(RequirementsError::NoHashes(missing));
    }

    Ok(entries.into_iter().collect())
}

fn read_text(path: &Path) -> Result<String, RequirementsError> {
    if !path.exists() {
        return Err(RequirementsError::NotFound(path.to_path_buf()));
    }
    fs::read_to_string(path).map_err(|source| RequirementsError::Io {
        path: path.to_path_buf(),
        source,
    })
}

pub fn read_pinned_requirements(path: impl AsRef<Path>) -> Result<Vec<Dependency>, RequirementsError> {
    let path = path.as_ref();
    let deps = parse_pinned_requirements(&read_text(path)?);
    debug!("{} pinned requirements in {}", deps.len(), path.display());
    Ok(deps)
}

pub fn read_requirement_hashes(path: impl AsRef<Path>) -> Result<HashRecord, RequirementsError> {
    parse_requirement_hashes(&read_text(path.as_ref())?)
}
