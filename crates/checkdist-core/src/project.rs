//! Reading project configuration from the source tree.

use std::path::Path;

use log::debug;
use serde::Deserialize;

use crate::CheckDistError;
use crate::Result;
use crate::config::DeclaredConfig;
use crate::config::HatchBuildConfig;
use crate::config::TemplateAnswers;

/// Name of the project metadata file.
pub const PYPROJECT_FILE: &str = "pyproject.toml";

/// Name of the project-template answers file.
pub const TEMPLATE_ANSWERS_FILE: &str = ".copier-answers.yaml";

/// The parts of `pyproject.toml` that shape the checks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectConfig {
    /// `[tool.check-dist]`, if present.
    pub declared: DeclaredConfig,
    /// `[tool.hatch.build]`, if present.
    pub backend: HatchBuildConfig,
}

#[derive(Debug, Default, Deserialize)]
struct PyProject {
    #[serde(default)]
    tool: Tools,
}

#[derive(Debug, Default, Deserialize)]
struct Tools {
    #[serde(rename = "check-dist", default)]
    check_dist: DeclaredConfig,
    #[serde(default)]
    hatch: Hatch,
}

#[derive(Debug, Default, Deserialize)]
struct Hatch {
    #[serde(default)]
    build: HatchBuildConfig,
}

/// Reads `pyproject.toml` from `source_dir`.
///
/// A missing file or missing tables yield empty configuration.
///
/// # Errors
///
/// Returns [`CheckDistError::Config`] if the file is not valid TOML or the
/// relevant tables have the wrong shape, and an I/O error if it exists but
/// cannot be read.
///
/// # Examples
///
/// ```no_run
/// use checkdist_core::project::read_project_config;
/// use std::path::Path;
///
/// let config = read_project_config(Path::new("."))?;
/// println!("{:?}", config.declared);
/// # Ok::<(), checkdist_core::CheckDistError>(())
/// ```
pub fn read_project_config(source_dir: &Path) -> Result<ProjectConfig> {
    let path = source_dir.join(PYPROJECT_FILE);
    if !path.is_file() {
        debug!("no {} in {}", PYPROJECT_FILE, source_dir.display());
        return Ok(ProjectConfig::default());
    }

    let text = std::fs::read_to_string(&path)?;
    parse_project_config(&text).map_err(|message| CheckDistError::Config { path, message })
}

fn parse_project_config(text: &str) -> std::result::Result<ProjectConfig, String> {
    let pyproject: PyProject = toml::from_str(text).map_err(|e| e.to_string().trim().to_string())?;
    Ok(ProjectConfig {
        declared: pyproject.tool.check_dist,
        backend: pyproject.tool.hatch.build,
    })
}

/// Reads `.copier-answers.yaml` from `source_dir`.
///
/// Returns `Ok(None)` if the file does not exist.
///
/// # Errors
///
/// Returns [`CheckDistError::TemplateAnswers`] if the file cannot be read or
/// parsed.
pub fn read_template_answers(source_dir: &Path) -> Result<Option<TemplateAnswers>> {
    let path = source_dir.join(TEMPLATE_ANSWERS_FILE);
    if !path.is_file() {
        return Ok(None);
    }

    let text = std::fs::read_to_string(&path).map_err(|e| CheckDistError::TemplateAnswers {
        path: path.clone(),
        message: e.to_string(),
    })?;

    if text.trim().is_empty() {
        return Ok(Some(TemplateAnswers::default()));
    }

    serde_yaml::from_str(&text)
        .map(Some)
        .map_err(|e| CheckDistError::TemplateAnswers {
            path,
            message: e.to_string(),
        })
}
