//! Expected source-archive contents derived from version control.
//!
//! A build backend may restrict what reaches the source archive. Comparing
//! the archive against every tracked file would then report files the user
//! never meant to ship, so the tracked list is first narrowed by the
//! backend's packaging scope.
//!
//! Some backends force-include VCS ignore files regardless of exclude rules.
//! That inclusion is not modeled here: this module only ever removes files
//! from the tracked list.

use std::collections::BTreeSet;

use crate::config::HatchBuildConfig;
use crate::pattern::glob_matches;
use crate::pattern::is_glob;
use crate::pattern::matches_exclude;

/// The build backend's inclusion policy for the source archive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PackagingScope {
    /// Every tracked file is expected.
    #[default]
    Unscoped,
    /// Only files under the named package directories.
    Packages(Vec<String>),
    /// Only files under the include paths, minus excluded files.
    Paths {
        /// Paths (or path globs) whose files are expected.
        include: Vec<String>,
        /// Exclude patterns, see [`matches_exclude`].
        exclude: Vec<String>,
    },
}

impl PackagingScope {
    /// Derives the source-archive scope from a hatch build configuration.
    ///
    /// Precedence follows hatch: `only-include`, then `packages`, then
    /// `include`. Target-level keys win over build-level keys. Packages with
    /// excludes become a path scope so the excludes still apply.
    ///
    /// # Examples
    ///
    /// ```
    /// use checkdist_core::PackagingScope;
    /// use checkdist_core::config::HatchBuildConfig;
    ///
    /// let hatch: HatchBuildConfig = toml::from_str(
    ///     r#"
    ///     [targets.sdist]
    ///     packages = ["mylib"]
    ///     "#,
    /// )
    /// .unwrap();
    /// assert_eq!(
    ///     PackagingScope::from_backend(&hatch),
    ///     PackagingScope::Packages(vec!["mylib".to_string()])
    /// );
    /// ```
    #[must_use]
    pub fn from_backend(hatch: &HatchBuildConfig) -> Self {
        let sdist = hatch.sdist_target();
        let exclude = sdist.exclude.clone().or_else(|| hatch.exclude.clone()).unwrap_or_default();

        if let Some(only_include) = sdist.only_include.clone().or_else(|| hatch.only_include.clone()) {
            return Self::Paths {
                include: only_include,
                exclude,
            };
        }

        if let Some(packages) = sdist.packages.clone().or_else(|| hatch.packages.clone()) {
            if exclude.is_empty() {
                return Self::Packages(packages);
            }
            return Self::Paths {
                include: packages,
                exclude,
            };
        }

        match sdist.include.clone().or_else(|| hatch.include.clone()) {
            Some(include) => Self::Paths { include, exclude },
            None => Self::Unscoped,
        }
    }

    /// Returns `true` if the backend places no restriction on the archive.
    #[must_use]
    pub const fn is_unscoped(&self) -> bool {
        matches!(self, Self::Unscoped)
    }

    /// Returns `true` if a tracked `path` is eligible for the source archive.
    #[must_use]
    pub fn admits(&self, path: &str) -> bool {
        match self {
            Self::Unscoped => true,
            Self::Packages(packages) => packages.iter().any(|pkg| {
                let pkg = pkg.trim_matches('/');
                !pkg.is_empty()
                    && path
                        .strip_prefix(pkg)
                        .is_some_and(|rest| rest.starts_with('/'))
            }),
            Self::Paths { include, exclude } => {
                include.iter().any(|inc| is_included(path, inc))
                    && !exclude.iter().any(|exc| matches_exclude(path, exc))
            }
        }
    }
}

/// Computes the tracked files that should appear in the source archive.
///
/// The result is always a subset of `tracked_files`.
///
/// # Examples
///
/// ```
/// use checkdist_core::PackagingScope;
/// use checkdist_core::scope::expected_source_files;
///
/// let tracked = ["pkg/a.py", "README.md", ".github/workflows/ci.yml"];
/// let expected = expected_source_files(tracked, &PackagingScope::Packages(vec!["pkg".into()]));
/// assert_eq!(expected.into_iter().collect::<Vec<_>>(), ["pkg/a.py"]);
/// ```
pub fn expected_source_files<I, S>(tracked_files: I, scope: &PackagingScope) -> BTreeSet<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    tracked_files
        .into_iter()
        .filter(|f| scope.admits(f.as_ref()))
        .map(|f| f.as_ref().to_string())
        .collect()
}

fn is_included(path: &str, include: &str) -> bool {
    let include = include.trim_matches('/');
    if include.is_empty() {
        return false;
    }

    if is_glob(include) {
        return glob_matches(path, include);
    }

    path == include
        || path
            .strip_prefix(include)
            .is_some_and(|rest| rest.starts_with('/'))
}
