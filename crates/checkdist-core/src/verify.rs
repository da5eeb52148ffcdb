//! Verification of distribution listings against resolved rules.
//!
//! Every check runs and every finding is kept. Findings come out in a fixed
//! order: collaborator warnings, then the sdist (VCS comparison, present,
//! absent, extensions), then the wheel (present, absent, extensions).

use std::collections::BTreeSet;
use std::fmt;

use log::debug;
use serde::Serialize;

use crate::DistKind;
use crate::FileListing;
use crate::PackagingScope;
use crate::Platform;
use crate::config::ResolvedRules;
use crate::pattern::basename;
use crate::pattern::matches;
use crate::platform::classify_violation;
use crate::platform::translate;
use crate::scope::expected_source_files;

/// Whether a finding fails the check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Contributes to failure.
    Error,
    /// Informational only.
    Warning,
}

/// What a finding is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FindingCategory {
    /// A tracked source file is missing from the sdist.
    MissingFromSource,
    /// The sdist ships a file version control does not know about.
    UntrackedInSource,
    /// A required pattern matched nothing.
    PresentNotFound,
    /// A forbidden pattern matched a file.
    AbsentMatched,
    /// A shared library uses another platform's extension.
    WrongPlatformExtension,
    /// Neither archive could be listed.
    NoDistributions,
    /// One archive kind is not available.
    ListingUnavailable,
    /// Version control could not be queried.
    VcsUnavailable,
    /// One build target failed.
    BuildFailed,
    /// Template answers could not be read; template defaults are off.
    TemplateAnswersInvalid,
}

/// A single check result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    /// The archive the finding concerns, if any.
    pub dist: Option<DistKind>,
    /// What kind of problem this is.
    pub category: FindingCategory,
    /// Whether it fails the check.
    pub severity: Severity,
    /// The offending file, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// The rule involved, as written by the user.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    /// Human-readable description.
    pub message: String,
}

impl Finding {
    /// Creates an error finding.
    #[must_use]
    pub fn error(
        dist: Option<DistKind>,
        category: FindingCategory,
        message: impl Into<String>,
    ) -> Self {
        Self {
            dist,
            category,
            severity: Severity::Error,
            path: None,
            pattern: None,
            message: message.into(),
        }
    }

    /// Creates a warning finding.
    #[must_use]
    pub fn warning(
        dist: Option<DistKind>,
        category: FindingCategory,
        message: impl Into<String>,
    ) -> Self {
        Self {
            severity: Severity::Warning,
            ..Self::error(dist, category, message)
        }
    }

    /// Attaches the offending path.
    #[must_use]
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Attaches the rule involved.
    #[must_use]
    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = Some(pattern.into());
        self
    }

    /// Returns `true` for error findings.
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.dist {
            Some(dist) => write!(f, "{dist}: {}", self.message),
            None => f.write_str(&self.message),
        }
    }
}

/// Outcome of a verification run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Verdict {
    success: bool,
    findings: Vec<Finding>,
}

impl Verdict {
    /// Builds a verdict from ordered findings.
    #[must_use]
    pub fn from_findings(findings: Vec<Finding>) -> Self {
        let success = !findings.iter().any(Finding::is_error);
        Self { success, findings }
    }

    /// Returns `true` if no error finding was produced.
    #[must_use]
    pub const fn success(&self) -> bool {
        self.success
    }

    /// All findings, in reporting order.
    #[must_use]
    pub fn findings(&self) -> &[Finding] {
        &self.findings
    }

    /// Error findings only.
    pub fn errors(&self) -> impl Iterator<Item = &Finding> {
        self.findings.iter().filter(|f| f.is_error())
    }

    /// Warning findings only.
    pub fn warnings(&self) -> impl Iterator<Item = &Finding> {
        self.findings.iter().filter(|f| !f.is_error())
    }

    /// Number of error findings.
    #[must_use]
    pub fn error_count(&self) -> usize {
        self.errors().count()
    }
}

/// Everything the collaborators managed to gather.
#[derive(Debug, Clone, Default)]
pub struct DistListings {
    /// Files in the source archive, if one was built.
    pub sdist: Option<FileListing>,
    /// Files in the binary archive, if one was built.
    pub wheel: Option<FileListing>,
    /// Files tracked by version control, if it could be queried.
    pub tracked: Option<Vec<String>>,
    /// Warnings recorded while gathering the above.
    pub warnings: Vec<Finding>,
}

/// Checks listings against resolved rules for one platform.
///
/// # Examples
///
/// ```
/// use checkdist_core::FileListing;
/// use checkdist_core::Platform;
/// use checkdist_core::config::DistributionRules;
/// use checkdist_core::config::ResolvedRules;
/// use checkdist_core::verify::DistListings;
/// use checkdist_core::verify::Verifier;
///
/// let rules = ResolvedRules::declared(
///     DistributionRules::default(),
///     DistributionRules {
///         present: vec!["mypkg".into()],
///         absent: vec!["tests".into()],
///     },
/// );
/// let listings = DistListings {
///     wheel: Some(FileListing::from_iter(["mypkg/__init__.py"])),
///     ..DistListings::default()
/// };
///
/// let verdict = Verifier::new(rules, Platform::Linux).verify(&listings);
/// assert!(verdict.success());
/// ```
#[derive(Debug, Clone)]
pub struct Verifier {
    rules: ResolvedRules,
    platform: Platform,
    scope: PackagingScope,
    artifacts: Vec<String>,
}

impl Verifier {
    /// Creates a verifier with no packaging scope and no artifacts.
    #[must_use]
    pub fn new(rules: ResolvedRules, platform: Platform) -> Self {
        Self {
            rules,
            platform,
            scope: PackagingScope::Unscoped,
            artifacts: Vec::new(),
        }
    }

    /// Restricts the tracked files expected in the sdist.
    #[must_use]
    pub fn with_scope(mut self, scope: PackagingScope) -> Self {
        self.scope = scope;
        self
    }

    /// Patterns for untracked build outputs allowed in the sdist.
    #[must_use]
    pub fn with_artifacts(mut self, artifacts: Vec<String>) -> Self {
        self.artifacts = artifacts;
        self
    }

    /// Runs every check and collects the findings.
    #[must_use]
    pub fn verify(&self, listings: &DistListings) -> Verdict {
        let mut findings = listings.warnings.clone();

        if listings.sdist.is_none() && listings.wheel.is_none() {
            findings.push(Finding::error(
                None,
                FindingCategory::NoDistributions,
                "no distributions available to check",
            ));
        }

        if let Some(sdist) = &listings.sdist {
            if let Some(tracked) = &listings.tracked {
                self.compare_with_vcs(sdist, tracked, &mut findings);
            }
            self.check_listing(DistKind::Sdist, sdist, &mut findings);
        }

        if let Some(wheel) = &listings.wheel {
            self.check_listing(DistKind::Wheel, wheel, &mut findings);
        }

        let verdict = Verdict::from_findings(findings);
        debug!(
            "verification finished: {} finding(s), {} error(s)",
            verdict.findings().len(),
            verdict.error_count()
        );
        verdict
    }

    fn check_listing(&self, kind: DistKind, listing: &FileListing, findings: &mut Vec<Finding>) {
        let rules = self.rules.rules(kind);

        for pattern in &rules.present {
            let translated = translate(pattern, self.platform);
            if !listing.iter().any(|f| matches(f, &translated)) {
                let message = format!(
                    "required pattern '{pattern}' not found{}",
                    self.translation_note(pattern, &translated)
                );
                findings.push(
                    Finding::error(Some(kind), FindingCategory::PresentNotFound, message)
                        .with_pattern(pattern),
                );
            }
        }

        for pattern in &rules.absent {
            let translated = translate(pattern, self.platform);
            let note = self.translation_note(pattern, &translated);
            for file in listing.iter().filter(|f| matches(f, &translated)) {
                findings.push(
                    Finding::error(
                        Some(kind),
                        FindingCategory::AbsentMatched,
                        format!("unwanted pattern '{pattern}' matched '{file}'{note}"),
                    )
                    .with_path(file)
                    .with_pattern(pattern),
                );
            }
        }

        for file in listing {
            if let Some(violation) = classify_violation(file, self.platform) {
                findings.push(
                    Finding::error(
                        Some(kind),
                        FindingCategory::WrongPlatformExtension,
                        format!("'{file}' uses {violation}"),
                    )
                    .with_path(file.as_str()),
                );
            }
        }
    }

    fn compare_with_vcs(&self, sdist: &FileListing, tracked: &[String], findings: &mut Vec<Finding>) {
        let shipped: BTreeSet<&str> = sdist.iter().filter(|f| !is_generated(f)).collect();
        let tracked_set: BTreeSet<&str> = tracked.iter().map(String::as_str).collect();
        let absent: Vec<String> = self
            .rules
            .rules(DistKind::Sdist)
            .absent
            .iter()
            .map(|p| translate(p, self.platform))
            .collect();

        let expected = expected_source_files(tracked, &self.scope);
        let missing = expected
            .iter()
            .filter(|f| !shipped.contains(f.as_str()))
            .filter(|f| !absent.iter().any(|p| matches(f, p)));

        for file in missing {
            findings.push(
                Finding::error(
                    Some(DistKind::Sdist),
                    FindingCategory::MissingFromSource,
                    format!("'{file}' is tracked by version control but missing from the archive"),
                )
                .with_path(file.as_str()),
            );
        }

        let untracked = shipped
            .iter()
            .filter(|f| !tracked_set.contains(*f))
            .filter(|f| !self.artifacts.iter().any(|a| matches(f, a)));

        for file in untracked {
            findings.push(
                Finding::error(
                    Some(DistKind::Sdist),
                    FindingCategory::UntrackedInSource,
                    format!("'{file}' is in the archive but not tracked by version control"),
                )
                .with_path(*file),
            );
        }
    }

    fn translation_note(&self, pattern: &str, translated: &str) -> String {
        if pattern == translated {
            String::new()
        } else {
            format!(" (translated to '{translated}' for {})", self.platform)
        }
    }
}

/// Metadata the build backend writes into every sdist.
fn is_generated(path: &str) -> bool {
    path == "PKG-INFO" || path.contains(".egg-info/") || basename(path).ends_with(".egg-info")
}
