use crate::{write_atomic, StoreError};
use serde::Serialize;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

const INDEX_FILE: &str = "index.html";
const TEMPLATE_PLACEHOLDER: &str = "PROJECT";

const INDEX_HEAD: &str = "<!DOCTYPE html>
<html>
  <head>
    <title>Simple index</title>
  </head>
  <body>
";
const INDEX_TAIL: &str = "  </body>
</html>
";

/// Render the root simple index for the given project names.
pub fn render_simple_index<'a>(names: impl IntoIterator<Item = &'a str>) -> String {
    let mut names: Vec<&str> = names.into_iter().filter(|n| *n != INDEX_FILE).collect();
    names.sort_unstable();
    let mut out = String::from(INDEX_HEAD);
    for name in names {
        out.push_str(&format!("    <a href=\"/simple/{name}/\">{name}</a>\n"));
    }
    out.push_str(INDEX_TAIL);
    out
}

/// Rewrite `<simple_dir>/index.html` to list every entry of `simple_dir`.
///
/// Returns the listed names.
pub fn write_simple_index(simple_dir: &Path) -> Result<Vec<String>, StoreError> {
    if !simple_dir.is_dir() {
        return Err(StoreError::DirectoryNotFound(simple_dir.to_path_buf()));
    }
    let mut names = Vec::new();
    for entry in fs::read_dir(simple_dir)? {
        let entry = entry?;
        if let Some(name) = entry.file_name().to_str() {
            if name != INDEX_FILE {
                names.push(name.to_owned());
            }
        }
    }
    names.sort();

    let html = render_simple_index(names.iter().map(String::as_str));
    write_atomic(&simple_dir.join(INDEX_FILE), html.as_bytes())?;
    info!("wrote {} with {} projects", simple_dir.join(INDEX_FILE).display(), names.len());
    Ok(names)
}

#[derive(Debug, Default, Serialize)]
pub struct ProjectDirsReport {
    /// Projects whose index page was written.
    pub created: Vec<String>,
    /// Projects that already had an index page.
    pub existing: Vec<String>,
}

/// Create `simple/<name>/index.html` from `template` for every `name==version`
/// line in `requirements`. Existing index pages are left untouched.
pub fn create_project_dirs(
    simple_dir: &Path,
    requirements: &str,
    template: &Path,
) -> Result<ProjectDirsReport, StoreError> {
    if !template.is_file() {
        return Err(StoreError::TemplateMissing(template.to_path_buf()));
    }

    // Validate everything before touching the filesystem.
    let mut names = Vec::new();
    for (idx, line) in requirements.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let parts: Vec<&str> = line.split("==").collect();
        match parts.as_slice() {
            [name, version] if !name.trim().is_empty() && !version.trim().is_empty() => {
                names.push(name.trim().to_owned());
            }
            _ => {
                return Err(StoreError::InvalidRequirement {
                    line: idx + 1,
                    content: line.to_owned(),
                })
            }
        }
    }

    let page = fs::read_to_string(template)?;
    let mut report = ProjectDirsReport::default();
    for name in names {
        let project_dir = simple_dir.join(&name);
        fs::create_dir_all(&project_dir)?;
        let index = project_dir.join(INDEX_FILE);
        if index.exists() {
            debug!("{} already exists", index.display());
            report.existing.push(name);
            continue;
        }
        write_atomic(&index, page.replace(TEMPLATE_PLACEHOLDER, &name).as_bytes())?;
        info!("project {name}");
        report.created.push(name);
    }
    Ok(report)
}
