//! External command execution.
//!
//! Collaborators that shell out (the build frontend, git) go through
//! [`CommandExecutor`] so tests can substitute canned output.

use std::process::Command;
use std::process::Output;

use log::debug;

use crate::Result;

/// Runs external commands.
pub trait CommandExecutor {
    /// Runs `cmd` with `args` and returns the captured output.
    ///
    /// # Errors
    ///
    /// Returns any I/O error encountered while spawning the command. A
    /// non-zero exit status is not an error at this level.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use checkdist_core::exec::CommandExecutor;
    /// use checkdist_core::exec::SystemCommandExecutor;
    ///
    /// let output = SystemCommandExecutor.run("git", &["--version"])?;
    /// assert!(output.status.success());
    /// # Ok::<(), checkdist_core::CheckDistError>(())
    /// ```
    fn run(&self, cmd: &str, args: &[&str]) -> Result<Output>;
}

/// Executes commands on the host system.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemCommandExecutor;

impl CommandExecutor for SystemCommandExecutor {
    fn run(&self, cmd: &str, args: &[&str]) -> Result<Output> {
        debug!("running {cmd} {}", args.join(" "));
        Ok(Command::new(cmd).args(args).output()?)
    }
}

/// Lossily decodes captured stderr, trimmed.
#[must_use]
pub fn stderr_text(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).trim().to_string()
}
