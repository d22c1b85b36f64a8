//! Newtype wrappers for package names and content digests.
//!
//! Both serialize as plain strings. Construction always goes through
//! normalization or validation, so a value of either type is known-good.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Deref;
use thiserror::Error;

macro_rules! string_newtype_impls {
    ($name:ident) => {
        impl $name {
            /// Return the inner string as a slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume self and return the inner `String`.
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl Deref for $name {
            type Target = str;
            fn deref(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl PartialEq<str> for $name {
            fn eq(&self, other: &str) -> bool {
                self.0 == other
            }
        }

        impl PartialEq<&str> for $name {
            fn eq(&self, other: &&str) -> bool {
                self.0 == *other
            }
        }

        impl PartialEq<String> for $name {
            fn eq(&self, other: &String) -> bool {
                self.0 == *other
            }
        }
    };
}

/// A PEP 503 normalized distribution name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct PackageName(String);

string_newtype_impls!(PackageName);

impl PackageName {
    /// Normalize `raw` and wrap it.
    pub fn new(raw: &str) -> Self {
        Self(crate::normalize::normalize(raw))
    }
}

impl From<String> for PackageName {
    fn from(s: String) -> Self {
        Self::new(&s)
    }
}

impl From<&str> for PackageName {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<PackageName> for String {
    fn from(name: PackageName) -> Self {
        name.0
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DigestError {
    #[error("invalid sha256 digest '{0}': expected 64 hexadecimal characters")]
    Invalid(String),
    #[error("unsupported hash algorithm '{algorithm}' in '{value}', only sha256 is accepted")]
    UnsupportedAlgorithm { algorithm: String, value: String },
}

/// Lowercase hex-encoded SHA-256 digest, always 64 characters.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Sha256Digest(String);

string_newtype_impls!(Sha256Digest);

impl Sha256Digest {
    pub const HEX_LEN: usize = 64;

    /// Parse a digest, accepting an optional `sha256:` algorithm prefix.
    pub fn parse(value: &str) -> Result<Self, DigestError> {
        let trimmed = value.trim();
        let hex = match trimmed.split_once(':') {
            Some(("sha256", rest)) => rest,
            Some((algorithm, _)) => {
                return Err(DigestError::UnsupportedAlgorithm {
                    algorithm: algorithm.to_owned(),
                    value: trimmed.to_owned(),
                })
            }
            None => trimmed,
        };
        if hex.len() != Self::HEX_LEN || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(DigestError::Invalid(trimmed.to_owned()));
        }
        Ok(Self(hex.to_ascii_lowercase()))
    }

    /// The `--hash=sha256:<hex>` option used in requirements files.
    pub fn requirement_option(&self) -> String {
        format!("--hash=sha256:{}", self.0)
    }
}

impl TryFrom<String> for Sha256Digest {
    type Error = DigestError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Sha256Digest> for String {
    fn from(digest: Sha256Digest) -> Self {
        digest.0
    }
}
