//! CLI argument parsing using clap.

use checkdist_core::Platform;
use clap::Parser;
use clap::Subcommand;
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "check-dist")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
#[command(args_conflicts_with_subcommands = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[command(flatten)]
    pub check: CheckArgs,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Output results in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the files a distribution archive contains, as the checker sees them
    List(ListArgs),
    /// Generate shell completions
    Completion {
        /// Target shell
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Arguments of the default check command.
#[derive(clap::Args)]
pub struct CheckArgs {
    /// Project directory containing pyproject.toml
    #[arg(value_name = "SOURCE_DIR", default_value = ".")]
    pub source_dir: PathBuf,

    /// Build without an isolated environment (passes --no-isolation to build)
    #[arg(long)]
    pub no_isolation: bool,

    /// Check archives already built in this directory instead of building
    #[arg(long, value_name = "DIR")]
    pub pre_built: Option<PathBuf>,

    /// Python interpreter used to run the build frontend
    #[arg(long, value_name = "EXE")]
    pub python: Option<String>,

    /// Platform whose shared-library extensions are expected [default: current]
    #[arg(long, value_name = "PLATFORM", value_parser = parse_platform)]
    pub platform: Option<Platform>,
}

#[derive(clap::Args)]
pub struct ListArgs {
    /// Path to the sdist or wheel
    #[arg(value_name = "ARCHIVE")]
    pub archive: PathBuf,

    /// Read the archive as a wheel regardless of its extension
    #[arg(long)]
    pub wheel: bool,
}

fn parse_platform(s: &str) -> Result<Platform, String> {
    s.parse()
}
