//! Building distributions with the PyPA `build` frontend.

use std::path::Path;

use log::info;
use log::warn;

use crate::CheckDistError;
use crate::DistKind;
use crate::Result;
use crate::exec::CommandExecutor;
use crate::exec::stderr_text;
use crate::verify::Finding;
use crate::verify::FindingCategory;

/// How to invoke the build frontend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildOptions {
    /// Python interpreter with the `build` package installed.
    pub python: String,
    /// Pass `--no-isolation` to the frontend.
    pub no_isolation: bool,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            python: default_python().to_string(),
            no_isolation: false,
        }
    }
}

/// The interpreter name used when none is given.
#[must_use]
pub const fn default_python() -> &'static str {
    if cfg!(windows) { "python" } else { "python3" }
}

/// Builds the sdist and wheel of `source_dir` into `output_dir`.
///
/// Both targets are built in one invocation first. If that fails each target
/// is retried alone, so a wheel that needs a missing native toolchain does
/// not prevent checking the sdist. Returns one warning per target that still
/// failed.
///
/// # Errors
///
/// Returns [`CheckDistError::BuildFailed`] if neither target could be built,
/// or an I/O error if the interpreter cannot be started.
pub fn build_dists(
    source_dir: &Path,
    output_dir: &Path,
    options: &BuildOptions,
    executor: &dyn CommandExecutor,
) -> Result<Vec<Finding>> {
    let src = source_dir.to_string_lossy();
    let out = output_dir.to_string_lossy();

    info!("building distributions for {src}");
    let combined = executor.run(
        &options.python,
        &build_args(&["--sdist", "--wheel"], &out, &src, options.no_isolation),
    )?;
    if combined.status.success() {
        return Ok(Vec::new());
    }

    warn!("combined build failed, retrying each target");
    let mut warnings = Vec::new();
    for kind in DistKind::ALL {
        let flag = match kind {
            DistKind::Sdist => "--sdist",
            DistKind::Wheel => "--wheel",
        };
        let output = executor.run(
            &options.python,
            &build_args(&[flag], &out, &src, options.no_isolation),
        )?;
        if !output.status.success() {
            warnings.push(
                Finding::warning(
                    Some(kind),
                    FindingCategory::BuildFailed,
                    format!("build failed: {}", stderr_text(&output)),
                ),
            );
        }
    }

    if warnings.len() == DistKind::ALL.len() {
        return Err(CheckDistError::BuildFailed {
            message: format!(
                "{}\n{}",
                String::from_utf8_lossy(&combined.stdout).trim(),
                stderr_text(&combined)
            )
            .trim()
            .to_string(),
        });
    }

    Ok(warnings)
}

fn build_args<'a>(targets: &[&'a str], out: &'a str, src: &'a str, no_isolation: bool) -> Vec<&'a str> {
    let mut args = vec!["-m", "build"];
    args.extend_from_slice(targets);
    args.extend(["--outdir", out]);
    if no_isolation {
        args.push("--no-isolation");
    }
    args.push(src);
    args
}
