//! Error types for distribution checks.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using `CheckDistError`.
pub type Result<T> = std::result::Result<T, CheckDistError>;

/// Errors that can occur while gathering inputs for a distribution check.
///
/// Verification failures are never errors: they are reported as findings in
/// a [`Verdict`](crate::Verdict). Errors describe problems that prevent part
/// or all of the verification from running.
#[derive(Error, Debug)]
pub enum CheckDistError {
    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Project configuration is malformed or contradictory.
    #[error("invalid configuration in {}: {message}", path.display())]
    Config {
        /// The configuration file.
        path: PathBuf,
        /// What was wrong with it.
        message: String,
    },

    /// A declared pattern cannot be compiled as a glob.
    #[error("invalid pattern '{pattern}': {message}")]
    InvalidPattern {
        /// The offending pattern.
        pattern: String,
        /// Compiler message.
        message: String,
    },

    /// The project template answers file could not be read.
    #[error("could not read template answers {}: {message}", path.display())]
    TemplateAnswers {
        /// The answers file.
        path: PathBuf,
        /// Parser message.
        message: String,
    },

    /// Version control is missing or the directory is not under it.
    #[error("version control unavailable: {0}")]
    VcsUnavailable(String),

    /// A distribution could not be built.
    #[error("distribution build failed: {message}")]
    BuildFailed {
        /// Build tool output.
        message: String,
    },

    /// Archive format is unsupported or unrecognized.
    #[error("unsupported archive format: {}", .0.display())]
    UnsupportedFormat(PathBuf),

    /// Archive is corrupted or invalid.
    #[error("invalid archive: {0}")]
    InvalidArchive(String),
}

impl CheckDistError {
    /// Returns `true` if this error comes from malformed user configuration.
    ///
    /// Configuration errors abort the run before any matching happens.
    ///
    /// # Examples
    ///
    /// ```
    /// use checkdist_core::CheckDistError;
    ///
    /// let err = CheckDistError::InvalidPattern {
    ///     pattern: "[".to_string(),
    ///     message: "unclosed class".to_string(),
    /// };
    /// assert!(err.is_configuration_error());
    ///
    /// let err = CheckDistError::VcsUnavailable("git not found".to_string());
    /// assert!(!err.is_configuration_error());
    /// ```
    #[must_use]
    pub const fn is_configuration_error(&self) -> bool {
        matches!(self, Self::Config { .. } | Self::InvalidPattern { .. })
    }

    /// Returns `true` if this error comes from an external collaborator
    /// (build tool, version control, archive reader, answers file).
    ///
    /// Collaborator failures degrade the check where possible instead of
    /// aborting it.
    ///
    /// # Examples
    ///
    /// ```
    /// use checkdist_core::CheckDistError;
    ///
    /// let err = CheckDistError::VcsUnavailable("git not found".to_string());
    /// assert!(err.is_collaborator_failure());
    /// ```
    #[must_use]
    pub const fn is_collaborator_failure(&self) -> bool {
        matches!(
            self,
            Self::Io(_)
                | Self::TemplateAnswers { .. }
                | Self::VcsUnavailable(_)
                | Self::BuildFailed { .. }
                | Self::UnsupportedFormat(_)
                | Self::InvalidArchive(_)
        )
    }
}
