use crate::types::PackageName;
use serde::{Deserialize, Serialize};

/// The interpreter entry Poetry keeps alongside real dependencies.
pub const PYTHON_PSEUDO_DEPENDENCY: &str = "python";

/// Normalize a distribution name per PEP 503.
///
/// The name is lowercased and every run of `-`, `_` and `.` collapses into a
/// single `-`, so `Foo_Bar.Baz`, `foo-bar-baz` and `FOO__bar--baz` all compare
/// equal. Idempotent.
pub fn normalize(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut in_separator = false;
    for ch in name.trim().chars() {
        if matches!(ch, '-' | '_' | '.') {
            if !in_separator {
                out.push('-');
                in_separator = true;
            }
        } else {
            out.extend(ch.to_lowercase());
            in_separator = false;
        }
    }
    out
}

/// The distribution-name portion of a PEP 508 requirement string such as
/// `requests[socks] >= 2.0; python_version > "3.8"`, spelled as written.
pub fn requirement_name(spec: &str) -> &str {
    let trimmed = spec.trim().trim_matches(|c| c == '"' || c == '\'');
    let end = trimmed
        .find(|c: char| {
            c.is_ascii_whitespace() || matches!(c, '<' | '>' | '=' | '!' | '~' | ';' | '[' | '@' | '(')
        })
        .unwrap_or(trimmed.len());
    &trimmed[..end]
}

/// Normalized distribution name of a PEP 508 requirement string.
pub fn distribution_name(spec: &str) -> PackageName {
    PackageName::new(requirement_name(spec))
}

/// A pinned `name==version` pair as written in a requirements file or lockfile.
///
/// `name` keeps its original spelling; use [`Dependency::normalized_name`] for
/// comparisons.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
pub struct Dependency {
    pub name: String,
    pub version: String,
}

impl Dependency {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
        }
    }

    pub fn normalized_name(&self) -> PackageName {
        PackageName::new(&self.name)
    }

    /// `name==version`, the key used in hash records.
    pub fn pin(&self) -> String {
        format!("{}=={}", self.name, self.version)
    }
}
