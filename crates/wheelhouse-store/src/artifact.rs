use serde::Serialize;
use std::fmt;
use wheelhouse_schema::PackageName;

const SDIST_SUFFIXES: &[&str] = &[".tar.gz", ".tar.bz2", ".tgz", ".zip"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactKind {
    Wheel,
    Sdist,
    Other,
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArtifactKind::Wheel => write!(f, "wheel"),
            ArtifactKind::Sdist => write!(f, "sdist"),
            ArtifactKind::Other => write!(f, "other"),
        }
    }
}

/// What a distribution filename says about its contents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtifactFilename {
    pub kind: ArtifactKind,
    pub name: Option<PackageName>,
    pub version: Option<String>,
}

impl ArtifactFilename {
    /// Classify `filename`.
    ///
    /// Wheels follow `name-version(-build)?-py-abi-platform.whl`; source
    /// distributions are `name-version` plus an archive suffix, split at the
    /// last `-`.
    pub fn parse(filename: &str) -> Self {
        if let Some(stem) = filename.strip_suffix(".whl") {
            let mut parts = stem.split('-');
            if let (Some(name), Some(version)) = (parts.next(), parts.next()) {
                if !name.is_empty() && !version.is_empty() {
                    return Self {
                        kind: ArtifactKind::Wheel,
                        name: Some(PackageName::new(name)),
                        version: Some(version.to_owned()),
                    };
                }
            }
            return Self::other(ArtifactKind::Wheel);
        }

        for suffix in SDIST_SUFFIXES {
            if let Some(stem) = filename.strip_suffix(suffix) {
                return match stem.rsplit_once('-') {
                    Some((name, version)) if !name.is_empty() && !version.is_empty() => Self {
                        kind: ArtifactKind::Sdist,
                        name: Some(PackageName::new(name)),
                        version: Some(version.to_owned()),
                    },
                    _ => Self::other(ArtifactKind::Sdist),
                };
            }
        }

        Self::other(ArtifactKind::Other)
    }

    fn other(kind: ArtifactKind) -> Self {
        Self {
            kind,
            name: None,
            version: None,
        }
    }

    pub fn is_wheel(&self) -> bool {
        self.kind == ArtifactKind::Wheel
    }

    /// True for a wheel of exactly `name` (normalized) at `version`.
    pub fn is_wheel_for(&self, name: &PackageName, version: &str) -> bool {
        self.is_wheel()
            && self.name.as_ref() == Some(name)
            && self.version.as_deref() == Some(version)
    }
}
