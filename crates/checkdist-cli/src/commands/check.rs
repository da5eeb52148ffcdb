//! Check command implementation.

use crate::cli::CheckArgs;
use crate::error::add_check_context;
use crate::output::OutputFormatter;
use crate::progress::CliProgress;
use anyhow::Result;
use checkdist_core::CheckOptions;
use checkdist_core::build::BuildOptions;
use checkdist_core::check_dist;
use checkdist_core::exec::SystemCommandExecutor;
use log::info;

/// Runs the check and reports it. Returns `true` if no error finding was
/// produced.
pub fn execute(args: &CheckArgs, formatter: &dyn OutputFormatter, show_progress: bool) -> Result<bool> {
    let options = options_from_args(args);
    info!(
        "checking {} for {}",
        options.source_dir.display(),
        options.platform
    );

    let message = if options.pre_built.is_some() {
        "Checking distributions"
    } else {
        "Building distributions"
    };

    // Use spinner if TTY is detected (not quiet, not JSON, is terminal)
    let report = if show_progress && CliProgress::should_show() {
        let _progress = CliProgress::new(message);
        add_check_context(check_dist(&options, &SystemCommandExecutor), &args.source_dir)?
    } else {
        add_check_context(check_dist(&options, &SystemCommandExecutor), &args.source_dir)?
    };

    formatter.format_check_report(&report)?;

    Ok(report.success())
}

fn options_from_args(args: &CheckArgs) -> CheckOptions {
    let defaults = CheckOptions::new(&args.source_dir);
    CheckOptions {
        pre_built: args.pre_built.clone(),
        build: BuildOptions {
            python: args
                .python
                .clone()
                .unwrap_or_else(|| defaults.build.python.clone()),
            no_isolation: args.no_isolation,
        },
        platform: args.platform.unwrap_or(defaults.platform),
        ..defaults
    }
}
