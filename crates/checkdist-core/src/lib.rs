//! Content checks for Python source and wheel distributions.
//!
//! `checkdist-core` verifies that a built sdist and wheel contain the files a
//! maintainer expects: required patterns are present, forbidden patterns are
//! absent, the sdist matches the files tracked by version control, and no
//! shared library uses another platform's extension.
//!
//! The matching engine ([`pattern`], [`platform`], [`config`], [`scope`],
//! [`verify`]) is pure and does no I/O. The collaborators ([`archive`],
//! [`build`], [`project`], [`vcs`]) gather its inputs, and [`check_dist`]
//! wires everything together.
//!
//! # Examples
//!
//! ```no_run
//! use checkdist_core::CheckOptions;
//! use checkdist_core::check_dist;
//! use checkdist_core::exec::SystemCommandExecutor;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let report = check_dist(&CheckOptions::new("."), &SystemCommandExecutor)?;
//! for finding in report.verdict.findings() {
//!     println!("{finding}");
//! }
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod archive;
pub mod build;
pub mod check;
pub mod config;
pub mod error;
pub mod exec;
pub mod pattern;
pub mod platform;
pub mod project;
pub mod scope;
pub mod types;
pub mod vcs;
pub mod verify;

#[cfg(test)]
mod test_utils;

// Re-export main API types
pub use check::CheckOptions;
pub use check::CheckReport;
pub use check::check_dist;
pub use config::ResolvedRules;
pub use error::CheckDistError;
pub use error::Result;
pub use platform::Platform;
pub use scope::PackagingScope;
pub use verify::Finding;
pub use verify::Verdict;
pub use verify::Verifier;

pub use types::DistKind;
pub use types::FileListing;
