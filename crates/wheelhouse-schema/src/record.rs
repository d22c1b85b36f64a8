use crate::types::Sha256Digest;
use serde::{Deserialize, Serialize};

/// One line of a hashed requirements document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PinnedRequirement {
    pub name: String,
    pub version: String,
    pub hashes: Vec<Sha256Digest>,
}

impl PinnedRequirement {
    /// `name==version`.
    pub fn key(&self) -> String {
        format!("{}=={}", self.name, self.version)
    }
}

/// Ordered mapping from `name==version` to its digests.
///
/// Insertion order is kept so rendered documents follow input order.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct HashRecord {
    entries: Vec<PinnedRequirement>,
}

impl HashRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an entry. An existing entry with the same key is replaced in
    /// place.
    pub fn push(&mut self, requirement: PinnedRequirement) {
        let key = requirement.key();
        if let Some(existing) = self.entries.iter_mut().find(|e| e.key() == key) {
            *existing = requirement;
        } else {
            self.entries.push(requirement);
        }
    }

    pub fn get(&self, key: &str) -> Option<&PinnedRequirement> {
        self.entries.iter().find(|e| e.key() == key)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PinnedRequirement> {
        self.entries.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = String> + '_ {
        self.entries.iter().map(PinnedRequirement::key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> IntoIterator for &'a HashRecord {
    type Item = &'a PinnedRequirement;
    type IntoIter = std::slice::Iter<'a, PinnedRequirement>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl FromIterator<PinnedRequirement> for HashRecord {
    fn from_iter<I: IntoIterator<Item = PinnedRequirement>>(iter: I) -> Self {
        let mut record = Self::new();
        for requirement in iter {
            record.push(requirement);
        }
        record
    }
}
