//! check-dist - checks the contents of Python source and wheel distributions.

mod cli;
mod commands;
mod error;
mod output;
mod progress;

use clap::Parser;
use log::LevelFilter;
use std::process::ExitCode;

/// Some verification rule failed.
const EXIT_FINDINGS: u8 = 1;
/// The check could not run.
const EXIT_ERROR: u8 = 2;

fn init_logging(verbose: bool, quiet: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else if quiet {
        LevelFilter::Error
    } else {
        LevelFilter::Warn
    };

    // RUST_LOG overrides the flag-derived level
    let mut builder = env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(level.as_str()),
    );

    if level < LevelFilter::Debug {
        builder.format_timestamp(None).format_target(false);
    }

    builder.init();
}

fn main() -> ExitCode {
    let cli = cli::Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    let style = output::OutputStyle::from_flags(cli.json, cli.verbose, cli.quiet);
    let formatter = output::create_formatter(style);

    let (operation, result) = match &cli.command {
        None => (
            "check",
            commands::check::execute(&cli.check, &*formatter, style.shows_progress()),
        ),
        Some(cli::Commands::List(args)) => {
            ("list", commands::list::execute(args, &*formatter).map(|()| true))
        }
        Some(cli::Commands::Completion { shell }) => {
            commands::completion::execute(*shell);
            ("completion", Ok(true))
        }
    };

    match result {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(EXIT_FINDINGS),
        Err(err) => {
            formatter.format_error(operation, &err);
            ExitCode::from(EXIT_ERROR)
        }
    }
}
