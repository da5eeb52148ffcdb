//! Files tracked by version control.
//!
//! Only git is supported. Submodule contents are included.

use std::path::Path;

use log::debug;

use crate::CheckDistError;
use crate::Result;
use crate::exec::CommandExecutor;
use crate::exec::stderr_text;

/// Lists the files git tracks under `source_dir`, sorted.
///
/// # Errors
///
/// Returns [`CheckDistError::VcsUnavailable`] if git is not installed or
/// `source_dir` is not inside a git work tree.
pub fn list_tracked_files(source_dir: &Path, executor: &dyn CommandExecutor) -> Result<Vec<String>> {
    let dir = source_dir.to_string_lossy();
    let output = executor
        .run(
            "git",
            &["-C", &dir, "ls-files", "-z", "--recurse-submodules"],
        )
        .map_err(|e| match e {
            CheckDistError::Io(io) if io.kind() == std::io::ErrorKind::NotFound => {
                CheckDistError::VcsUnavailable(
                    "git not found; only git is supported for version control tracking".into(),
                )
            }
            CheckDistError::Io(io) => CheckDistError::VcsUnavailable(format!("failed to run git: {io}")),
            other => other,
        })?;

    if !output.status.success() {
        return Err(CheckDistError::VcsUnavailable(format!(
            "git ls-files failed: {}",
            stderr_text(&output)
        )));
    }

    let mut files: Vec<String> = String::from_utf8_lossy(&output.stdout)
        .split('\0')
        .filter(|f| !f.is_empty())
        .map(|f| f.replace('\\', "/"))
        .collect();
    files.sort();

    debug!("git tracks {} file(s)", files.len());
    Ok(files)
}
