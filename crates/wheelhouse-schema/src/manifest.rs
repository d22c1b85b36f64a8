use crate::normalize::{distribution_name, normalize, PYTHON_PSEUDO_DEPENDENCY};
use regex::Regex;
use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("project manifest not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse project manifest: {0}")]
    ParseToml(#[from] toml::de::Error),
    #[error("no dependency section in {0}: expected [tool.poetry.dependencies] or [project] dependencies")]
    MissingDependencySection(String),
    #[error("setup.py not found in {}, pass the project name explicitly", .0.display())]
    SetupPyMissing(PathBuf),
    #[error("no project name found in {}, pass the project name explicitly", .0.display())]
    ProjectNameNotFound(PathBuf),
}

/// The parts of `pyproject.toml` that declare dependencies.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct PyProject {
    #[serde(default)]
    pub project: Option<ProjectSection>,
    #[serde(default)]
    pub tool: ToolSection,
}

/// PEP 621 `[project]` table.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct ProjectSection {
    #[serde(default)]
    pub dependencies: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct ToolSection {
    #[serde(default)]
    pub poetry: Option<PoetrySection>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct PoetrySection {
    #[serde(default)]
    pub dependencies: Option<BTreeMap<String, toml::Value>>,
}

impl PyProject {
    /// Normalized names of the main dependencies, without `python`.
    ///
    /// Poetry's table wins when present; otherwise the PEP 621 list is used.
    /// `None` means neither section exists.
    pub fn declared_dependencies(&self) -> Option<BTreeSet<String>> {
        if let Some(deps) = self.tool.poetry.as_ref().and_then(|p| p.dependencies.as_ref()) {
            return Some(without_python(deps.keys().map(|name| normalize(name))));
        }
        let deps = self.project.as_ref()?.dependencies.as_ref()?;
        Some(without_python(
            deps.iter().map(|spec| distribution_name(spec).into_inner()),
        ))
    }
}

fn without_python(names: impl Iterator<Item = String>) -> BTreeSet<String> {
    names.filter(|n| n != PYTHON_PSEUDO_DEPENDENCY).collect()
}

pub fn parse_pyproject_str(input: &str) -> Result<PyProject, ManifestError> {
    Ok(toml::from_str(input)?)
}

pub fn parse_pyproject_file(path: impl AsRef<Path>) -> Result<PyProject, ManifestError> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(ManifestError::NotFound(path.to_path_buf()));
    }
    let content = fs::read_to_string(path).map_err(|source| ManifestError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_pyproject_str(&content)
}

pub fn read_project_declared_dependencies(
    path: impl AsRef<Path>,
) -> Result<BTreeSet<String>, ManifestError> {
    let path = path.as_ref();
    let declared = parse_pyproject_file(path)?
        .declared_dependencies()
        .ok_or_else(|| ManifestError::MissingDependencySection(path.display().to_string()))?;
    debug!(
        "{} declares {} main dependencies",
        path.display(),
        declared.len()
    );
    Ok(declared)
}

static SETUP_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"name\s*=\s*["']([^"']*)["']"#).expect("invalid setup.py name regex")
});

/// Extract the `name="..."` argument from `setup.py` in `dir`.
pub fn read_setup_project_name(dir: impl AsRef<Path>) -> Result<String, ManifestError> {
    let setup = dir.as_ref().join("setup.py");
    if !setup.is_file() {
        return Err(ManifestError::SetupPyMissing(dir.as_ref().to_path_buf()));
    }
    let content = fs::read_to_string(&setup).map_err(|source| ManifestError::Io {
        path: setup.clone(),
        source,
    })?;
    SETUP_NAME
        .captures(&content)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_owned())
        .filter(|name| !name.is_empty())
        .ok_or(ManifestError::ProjectNameNotFound(setup))
}
