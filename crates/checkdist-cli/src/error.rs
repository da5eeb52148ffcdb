//! Error conversion utilities for CLI.
//!
//! Converts checkdist-core's typed errors (thiserror) into user-friendly
//! contextual errors (anyhow) with actionable guidance.

use anyhow::anyhow;
use checkdist_core::CheckDistError;
use log::debug;
use std::path::Path;

/// Converts `CheckDistError` to a user-friendly anyhow error.
///
/// `target` is the project directory or archive the command was run on.
pub fn convert_check_error(err: CheckDistError, target: &Path) -> anyhow::Error {
    match err {
        CheckDistError::Config { path, message } => {
            anyhow!(
                "Invalid configuration in '{}': {}\n\
                 HINT: Fix the [tool.check-dist] or [tool.hatch.build] tables; \
                 only 'present', 'absent', 'sdist' and 'wheel' keys are accepted.",
                path.display(),
                message
            )
        }
        CheckDistError::InvalidPattern { pattern, message } => {
            anyhow!(
                "Invalid pattern '{pattern}': {message}\n\
                 HINT: Patterns are shell globs. Wrap a literal '[' or ']' in brackets, e.g. '[[]'."
            )
        }
        CheckDistError::BuildFailed { message } => {
            anyhow!(
                "Could not build distributions for '{}':\n{}\n\
                 HINT: Install the build frontend with 'python -m pip install build', \
                 or pass --pre-built with a directory of existing archives.",
                target.display(),
                message.trim_end()
            )
        }
        CheckDistError::UnsupportedFormat(path) => {
            anyhow!(
                "Archive format not supported: {}\n\
                 HINT: Supported formats: .tar.gz, .tgz, .tar, .zip (sdist) and .whl (wheel). \
                 Use --wheel to read a zip with another extension as a wheel.",
                path.display()
            )
        }
        CheckDistError::InvalidArchive(reason) => {
            anyhow!(
                "Invalid archive '{}': {}\n\
                 HINT: The archive may be truncated or corrupted; rebuild it.",
                target.display(),
                reason
            )
        }
        CheckDistError::VcsUnavailable(reason) => {
            anyhow!(
                "Version control unavailable for '{}': {}\n\
                 HINT: Run check-dist from a git checkout with git on PATH.",
                target.display(),
                reason
            )
        }
        CheckDistError::TemplateAnswers { path, message } => {
            anyhow!(
                "Could not read template answers '{}': {}\n\
                 HINT: Regenerate the file with copier, or declare [tool.check-dist] rules.",
                path.display(),
                message
            )
        }
        CheckDistError::Io(io_err) => {
            anyhow!("I/O error while processing '{}': {}", target.display(), io_err)
        }
    }
}

/// Where a core error came from: the user's inputs or a tool the check relies on.
fn error_origin(err: &CheckDistError) -> &'static str {
    if err.is_configuration_error() {
        "configuration rejected"
    } else if err.is_collaborator_failure() {
        "collaborator unavailable"
    } else {
        "check aborted"
    }
}

/// Adds context to a core result for the given project directory or archive.
pub fn add_check_context<T>(
    result: checkdist_core::Result<T>,
    target: &Path,
) -> anyhow::Result<T> {
    result.map_err(|e| {
        debug!("{} for {}: {e}", error_origin(&e), target.display());
        convert_check_error(e, target)
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::io;
    use std::path::PathBuf;

    #[test]
    fn test_convert_config_error() {
        let err = CheckDistError::Config {
            path: PathBuf::from("proj/pyproject.toml"),
            message: "unknown field `presnt`".to_string(),
        };
        let msg = format!("{:?}", convert_check_error(err, Path::new("proj")));
        assert!(msg.contains("proj/pyproject.toml"));
        assert!(msg.contains("presnt"));
        assert!(msg.contains("HINT"));
    }

    #[test]
    fn test_convert_invalid_pattern_error() {
        let err = CheckDistError::InvalidPattern {
            pattern: "pkg/[".to_string(),
            message: "invalid range pattern".to_string(),
        };
        let msg = format!("{:?}", convert_check_error(err, Path::new(".")));
        assert!(msg.contains("pkg/["));
        assert!(msg.contains("HINT"));
    }

    #[test]
    fn test_convert_build_failed_error() {
        let err = CheckDistError::BuildFailed {
            message: "No module named build\n".to_string(),
        };
        let msg = format!("{:?}", convert_check_error(err, Path::new("proj")));
        assert!(msg.contains("Could not build distributions for 'proj'"));
        assert!(msg.contains("No module named build"));
        assert!(msg.contains("--pre-built"));
    }

    #[test]
    fn test_error_origin() {
        let config = CheckDistError::InvalidPattern {
            pattern: "[".to_string(),
            message: "unclosed".to_string(),
        };
        assert_eq!(error_origin(&config), "configuration rejected");

        let build = CheckDistError::BuildFailed {
            message: "no frontend".to_string(),
        };
        assert_eq!(error_origin(&build), "collaborator unavailable");

        let io = CheckDistError::Io(io::Error::other("disk"));
        assert_eq!(error_origin(&io), "collaborator unavailable");
    }

    #[test]
    fn test_convert_unsupported_format_error() {
        let err = CheckDistError::UnsupportedFormat(PathBuf::from("pkg.rar"));
        let msg = format!("{:?}", convert_check_error(err, Path::new("pkg.rar")));
        assert!(msg.contains("not supported"));
        assert!(msg.contains("pkg.rar"));
        assert!(msg.contains(".whl"));
    }

    #[test]
    fn test_convert_invalid_archive_error() {
        let err = CheckDistError::InvalidArchive("unexpected end of file".to_string());
        let msg = format!("{:?}", convert_check_error(err, Path::new("pkg.whl")));
        assert!(msg.contains("Invalid archive"));
        assert!(msg.contains("pkg.whl"));
        assert!(msg.contains("HINT"));
    }

    #[test]
    fn test_convert_vcs_error() {
        let err = CheckDistError::VcsUnavailable("git not found".to_string());
        let msg = format!("{:?}", convert_check_error(err, Path::new("proj")));
        assert!(msg.contains("git not found"));
        assert!(msg.contains("HINT"));
    }

    #[test]
    fn test_convert_io_error() {
        let err = CheckDistError::Io(io::Error::new(io::ErrorKind::NotFound, "missing"));
        let msg = format!("{:?}", convert_check_error(err, Path::new("dist")));
        assert!(msg.contains("I/O error"));
        assert!(msg.contains("dist"));
    }

    #[test]
    fn test_add_check_context() {
        let result: checkdist_core::Result<()> =
            Err(CheckDistError::InvalidArchive("bad header".to_string()));
        let err = add_check_context(result, Path::new("pkg.tar.gz")).unwrap_err();
        assert!(err.to_string().contains("pkg.tar.gz"));

        let ok: checkdist_core::Result<u8> = Ok(7);
        assert_eq!(add_check_context(ok, Path::new(".")).unwrap(), 7);
    }
}
