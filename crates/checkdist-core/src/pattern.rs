//! Pattern matching for present/absent rules.
//!
//! A pattern carries no explicit mode tag. Its mode is inferred from the
//! shape of the string by [`MatchMode::of`], which is a total function:
//!
//! | shape                              | mode                       |
//! |------------------------------------|----------------------------|
//! | no `/`, no `*?[`                   | [`MatchMode::ExactName`]       |
//! | contains `/`, no `*?[`             | [`MatchMode::DirectoryPrefix`] |
//! | contains `/` and `*?[`             | [`MatchMode::GlobPath`]        |
//! | no `/`, contains `*?[`             | [`MatchMode::GlobBasename`]    |
//!
//! Globs follow shell wildcard rules. `*` crosses `/`, `**` is the same as
//! `*`, and matching is case-sensitive on every platform.
//!
//! # Examples
//!
//! ```
//! use checkdist_core::pattern::matches;
//!
//! assert!(matches("some/deep/path/setup.cfg", "setup.cfg"));
//! assert!(matches(".github/workflows/ci.yml", ".github"));
//! assert!(matches("pkg/__init__.py", "*.py"));
//! assert!(matches("pkg/__init__.py", "pkg/*.py"));
//! assert!(!matches("pkg_extra/foo.py", "pkg"));
//! ```

use glob::MatchOptions;
use glob::Pattern;

use crate::CheckDistError;
use crate::Result;

/// Characters that turn a pattern into a glob.
pub const GLOB_METACHARACTERS: [char; 3] = ['*', '?', '['];

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: false,
    require_literal_leading_dot: false,
};

/// How a pattern is compared against a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchMode {
    /// Final path component equals the pattern, at any depth. A bare name
    /// also matches the full path and a top-level directory of that name.
    ExactName,
    /// Path equals the pattern or lies under it.
    DirectoryPrefix,
    /// Shell glob against the full path.
    GlobPath,
    /// Shell glob against the final path component.
    GlobBasename,
}

impl MatchMode {
    /// Infers the matching mode from the shape of `pattern`.
    ///
    /// Returns `None` for the empty pattern, which matches nothing.
    ///
    /// # Examples
    ///
    /// ```
    /// use checkdist_core::pattern::MatchMode;
    ///
    /// assert_eq!(MatchMode::of("LICENSE"), Some(MatchMode::ExactName));
    /// assert_eq!(MatchMode::of("src/pkg"), Some(MatchMode::DirectoryPrefix));
    /// assert_eq!(MatchMode::of("pkg/*.py"), Some(MatchMode::GlobPath));
    /// assert_eq!(MatchMode::of("*.so"), Some(MatchMode::GlobBasename));
    /// assert_eq!(MatchMode::of(""), None);
    /// ```
    #[must_use]
    pub fn of(pattern: &str) -> Option<Self> {
        if pattern.is_empty() {
            return None;
        }

        let has_slash = pattern.contains('/');
        Some(match (has_slash, is_glob(pattern)) {
            (false, false) => Self::ExactName,
            (true, false) => Self::DirectoryPrefix,
            (true, true) => Self::GlobPath,
            (false, true) => Self::GlobBasename,
        })
    }
}

/// Returns `true` if `pattern` contains a glob metacharacter.
#[must_use]
pub fn is_glob(pattern: &str) -> bool {
    pattern.contains(GLOB_METACHARACTERS)
}

/// Returns the final component of a forward-slash path.
#[must_use]
pub fn basename(path: &str) -> &str {
    path.rsplit_once('/').map_or(path, |(_, name)| name)
}

/// Checks whether `path` matches `pattern` under the inferred [`MatchMode`].
#[must_use]
pub fn matches(path: &str, pattern: &str) -> bool {
    let Some(mode) = MatchMode::of(pattern) else {
        return false;
    };

    match mode {
        MatchMode::ExactName => basename(path) == pattern || is_under(path, pattern),
        MatchMode::DirectoryPrefix => {
            let dir = pattern.trim_end_matches('/');
            !dir.is_empty() && is_under(path, dir)
        }
        MatchMode::GlobPath => glob_matches(path, pattern),
        MatchMode::GlobBasename => glob_matches(basename(path), pattern),
    }
}

/// Checks whether `path` matches a build-backend exclude pattern.
///
/// Exclude patterns are gitignore-like: a leading `/` anchors the pattern at
/// the project root, a literal name matches the file or directory of that
/// name at any depth, and globs match the full path or the basename.
///
/// # Examples
///
/// ```
/// use checkdist_core::pattern::matches_exclude;
///
/// assert!(matches_exclude("rust/target/debug/foo", "target"));
/// assert!(matches_exclude(".gitignore", "/.gitignore"));
/// assert!(!matches_exclude("src/.gitignore", "/.gitignore"));
/// assert!(matches_exclude("pkg/mod.pyc", "*.pyc"));
/// ```
#[must_use]
pub fn matches_exclude(path: &str, pattern: &str) -> bool {
    let anchored = pattern.starts_with('/');
    let pattern = pattern.trim_start_matches('/');
    if pattern.is_empty() {
        return false;
    }

    if is_glob(pattern) {
        return glob_matches(path, pattern)
            || (!anchored && !pattern.contains('/') && glob_matches(basename(path), pattern));
    }

    let dir = pattern.trim_end_matches('/');
    if is_under(path, dir) {
        return true;
    }

    // Unanchored literals match any whole run of components
    !anchored && format!("/{path}/").contains(&format!("/{dir}/"))
}

/// Shell-style glob match of `text` against `pattern`.
///
/// A pattern that does not compile never matches; configuration loading
/// rejects such patterns up front via [`validate_pattern`].
#[must_use]
pub fn glob_matches(text: &str, pattern: &str) -> bool {
    compile(pattern).is_ok_and(|compiled| compiled.matches_with(text, MATCH_OPTIONS))
}

/// Compiles a shell glob. Runs of `*` are one wildcard, so `**` never takes
/// on the recursive-directory meaning and may appear inside a component.
fn compile(pattern: &str) -> std::result::Result<Pattern, glob::PatternError> {
    let mut collapsed = String::with_capacity(pattern.len());
    for c in pattern.chars() {
        if c == '*' && collapsed.ends_with('*') {
            continue;
        }
        collapsed.push(c);
    }
    Pattern::new(&collapsed)
}

/// Rejects patterns that cannot be compiled as globs.
///
/// # Errors
///
/// Returns [`CheckDistError::InvalidPattern`] for globs with syntax errors
/// such as an unclosed `[`.
pub fn validate_pattern(pattern: &str) -> Result<()> {
    if !is_glob(pattern) {
        return Ok(());
    }

    compile(pattern)
        .map(|_| ())
        .map_err(|e| CheckDistError::InvalidPattern {
            pattern: pattern.to_string(),
            message: e.msg.to_string(),
        })
}

fn is_under(path: &str, dir: &str) -> bool {
    path == dir
        || path
            .strip_prefix(dir)
            .is_some_and(|rest| rest.starts_with('/'))
}
