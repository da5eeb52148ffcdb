//! Value types shared by the checker.
//!
//! Listings and distribution kinds are plain data handed in by the
//! collaborators; every check treats them as read-only input.

pub mod dist_kind;
pub mod file_listing;

pub use dist_kind::DistKind;
pub use file_listing::FileListing;
