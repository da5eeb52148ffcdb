//! End-to-end distribution check.
//!
//! Reads the project configuration, builds (or locates) the distributions,
//! lists them, queries version control and hands everything to the
//! [`Verifier`]. Collaborator failures that only affect part of the check
//! become warnings; configuration errors abort.

use std::path::Path;
use std::path::PathBuf;

use log::info;
use log::warn;

use crate::CheckDistError;
use crate::DistKind;
use crate::FileListing;
use crate::PackagingScope;
use crate::Platform;
use crate::Result;
use crate::archive::DistFiles;
use crate::archive::find_dist_files;
use crate::archive::list_dist_files;
use crate::build::BuildOptions;
use crate::build::build_dists;
use crate::config::ResolvedRules;
use crate::config::RuleSource;
use crate::config::resolve;
use crate::exec::CommandExecutor;
use crate::project::read_project_config;
use crate::project::read_template_answers;
use crate::vcs::list_tracked_files;
use crate::verify::DistListings;
use crate::verify::Finding;
use crate::verify::FindingCategory;
use crate::verify::Verdict;
use crate::verify::Verifier;

/// Inputs of a check run.
#[derive(Debug, Clone)]
pub struct CheckOptions {
    /// Project root containing `pyproject.toml`.
    pub source_dir: PathBuf,
    /// Use existing archives from this directory instead of building.
    pub pre_built: Option<PathBuf>,
    /// Build frontend settings.
    pub build: BuildOptions,
    /// Platform whose extension conventions apply.
    pub platform: Platform,
}

impl CheckOptions {
    /// Checks `source_dir` by building it for the current platform.
    #[must_use]
    pub fn new(source_dir: impl Into<PathBuf>) -> Self {
        Self {
            source_dir: source_dir.into(),
            pre_built: None,
            build: BuildOptions::default(),
            platform: Platform::current(),
        }
    }
}

/// One archive that was listed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveListing {
    /// Archive kind.
    pub kind: DistKind,
    /// File name of the archive.
    pub name: String,
    /// Files the checker saw.
    pub files: FileListing,
}

/// Everything a check run produced.
#[derive(Debug, Clone)]
pub struct CheckReport {
    /// The verdict.
    pub verdict: Verdict,
    /// Where the sdist rules came from.
    pub sdist_source: RuleSource,
    /// Where the wheel rules came from.
    pub wheel_source: RuleSource,
    /// Archives that were listed, sdist first.
    pub archives: Vec<ArchiveListing>,
    /// Platform the check ran for.
    pub platform: Platform,
    /// Pre-built directory, if one was used.
    pub pre_built: Option<PathBuf>,
}

impl CheckReport {
    /// Returns `true` if the verdict has no errors.
    #[must_use]
    pub const fn success(&self) -> bool {
        self.verdict.success()
    }
}

/// Runs every check for the project in `options.source_dir`.
///
/// # Errors
///
/// Returns a configuration error if `pyproject.toml` is malformed or a
/// pattern does not compile, [`CheckDistError::BuildFailed`] if neither
/// distribution can be built, and an I/O error if the output directory
/// cannot be created or read.
///
/// [`CheckDistError::BuildFailed`]: crate::CheckDistError::BuildFailed
pub fn check_dist(options: &CheckOptions, executor: &dyn CommandExecutor) -> Result<CheckReport> {
    let source_dir = options.source_dir.as_path();
    let mut warnings = Vec::new();

    let project = read_project_config(source_dir)?;
    let template = match read_template_answers(source_dir) {
        Ok(template) => template,
        Err(e) => {
            warn!("{e}");
            warnings.push(Finding::warning(
                None,
                FindingCategory::TemplateAnswersInvalid,
                e.to_string(),
            ));
            None
        }
    };

    let rules = resolve(&project.declared, &project.backend, template.as_ref());
    rules.validate()?;
    let scope = PackagingScope::from_backend(&project.backend);

    // Keeps the build output alive until every archive has been listed
    let (dist_files, _build_dir) = match &options.pre_built {
        Some(dir) => {
            info!("using pre-built distributions from {}", dir.display());
            (find_dist_files(dir)?, None)
        }
        None => {
            let build_dir = tempfile::Builder::new().prefix("check-dist-").tempdir()?;
            warnings.extend(build_dists(
                source_dir,
                build_dir.path(),
                &options.build,
                executor,
            )?);
            (find_dist_files(build_dir.path())?, Some(build_dir))
        }
    };

    let (mut listings, archives) = list_archives(&dist_files, options.pre_built.as_deref(), &mut warnings)?;

    if listings.sdist.is_some() {
        match list_tracked_files(source_dir, executor) {
            Ok(tracked) => listings.tracked = Some(tracked),
            Err(e) => {
                warn!("could not compare against version control: {e}");
                warnings.push(Finding::warning(
                    Some(DistKind::Sdist),
                    FindingCategory::VcsUnavailable,
                    format!("could not compare against version control: {e}"),
                ));
            }
        }
    }
    listings.warnings = warnings;

    let verdict = Verifier::new(rules.clone(), options.platform)
        .with_scope(scope)
        .with_artifacts(project.backend.artifacts.clone())
        .verify(&listings);

    Ok(report(verdict, &rules, archives, options))
}

fn list_archives(
    dist_files: &DistFiles,
    pre_built: Option<&Path>,
    warnings: &mut Vec<Finding>,
) -> Result<(DistListings, Vec<ArchiveListing>)> {
    let mut listings = DistListings::default();
    let mut archives = Vec::new();
    let mut failures = Vec::new();

    for kind in DistKind::ALL {
        let Some(path) = dist_files.get(kind) else {
            let built_failed = warnings
                .iter()
                .any(|w| w.dist == Some(kind) && w.category == FindingCategory::BuildFailed);
            if !built_failed {
                let message = match pre_built {
                    Some(dir) => format!("no {kind} found in {}", dir.display()),
                    None => format!("no {kind} found after build"),
                };
                warnings.push(Finding::warning(
                    Some(kind),
                    FindingCategory::ListingUnavailable,
                    message,
                ));
            }
            continue;
        };

        match list_dist_files(path, kind) {
            Ok(files) => {
                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default();
                info!("{kind} ({name}): {} file(s)", files.len());
                archives.push(ArchiveListing {
                    kind,
                    name,
                    files: files.clone(),
                });
                match kind {
                    DistKind::Sdist => listings.sdist = Some(files),
                    DistKind::Wheel => listings.wheel = Some(files),
                }
            }
            Err(e) => {
                let message = format!("could not list {}: {e}", path.display());
                warn!("{message}");
                warnings.push(Finding::warning(
                    Some(kind),
                    FindingCategory::ListingUnavailable,
                    message.clone(),
                ));
                failures.push(message);
            }
        }
    }

    // Archives exist but none of them is readable
    if listings.sdist.is_none() && listings.wheel.is_none() && !failures.is_empty() {
        return Err(CheckDistError::InvalidArchive(failures.join("; ")));
    }

    Ok((listings, archives))
}

fn report(
    verdict: Verdict,
    rules: &ResolvedRules,
    archives: Vec<ArchiveListing>,
    options: &CheckOptions,
) -> CheckReport {
    CheckReport {
        verdict,
        sdist_source: rules.source(DistKind::Sdist),
        wheel_source: rules.source(DistKind::Wheel),
        archives,
        platform: options.platform,
        pre_built: options.pre_built.clone(),
    }
}
