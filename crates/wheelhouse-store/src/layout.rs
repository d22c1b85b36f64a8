use std::path::{Path, PathBuf};

pub const SUMS_FILE: &str = "sha256sums.txt";
pub const SIGNATURE_SUFFIX: &str = "asc";

/// Directory layout of a wheel repository checkout.
///
/// ```text
/// <root>/
///   localwheels/                  built wheels and sdists
///   simple/<project>/index.html   PEP 503 project pages
///   simple/index.html             root index
///   templates/project-index.html  page template, `PROJECT` is substituted
///   sha256sums.txt(.asc)          signed digests of localwheels/
/// ```
#[derive(Debug, Clone)]
pub struct RepoLayout {
    root: PathBuf,
}

impl RepoLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[inline]
    pub fn simple_dir(&self) -> PathBuf {
        self.root.join("simple")
    }

    #[inline]
    pub fn sums_file(&self) -> PathBuf {
        self.root.join(SUMS_FILE)
    }

    #[inline]
    pub fn project_index_template(&self) -> PathBuf {
        self.root.join("templates").join("project-index.html")
    }

    #[inline]
    pub fn localwheels_dir(&self) -> PathBuf {
        self.root.join("localwheels")
    }
}

/// `<path>.asc`, the detached signature next to a signed file.
pub fn signature_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".");
    name.push(SIGNATURE_SUFFIX);
    PathBuf::from(name)
}
