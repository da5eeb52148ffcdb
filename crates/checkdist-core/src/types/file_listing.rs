//! Ordered list of archive-relative file paths.

use std::collections::BTreeSet;

/// An ordered sequence of forward-slash paths relative to an archive or
/// working-tree root.
///
/// Construction normalizes `\` separators to `/` and strips a leading `./`,
/// so listings from every platform compare equal.
///
/// # Examples
///
/// ```
/// use checkdist_core::FileListing;
///
/// let listing = FileListing::from_iter(["pkg\\mod.py", "./LICENSE"]);
/// assert_eq!(listing.files(), ["pkg/mod.py", "LICENSE"]);
/// assert!(listing.contains("LICENSE"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileListing {
    files: Vec<String>,
}

impl FileListing {
    /// Creates an empty listing.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a path, normalizing its separators.
    pub fn push(&mut self, path: impl AsRef<str>) {
        let normalized = path.as_ref().replace('\\', "/");
        let normalized = normalized.trim_start_matches("./");
        if !normalized.is_empty() {
            self.files.push(normalized.to_string());
        }
    }

    /// Sorts the listing lexicographically.
    pub fn sort(&mut self) {
        self.files.sort();
    }

    /// The paths, in listing order.
    #[must_use]
    pub fn files(&self) -> &[String] {
        &self.files
    }

    /// Iterates over the paths.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.files.iter().map(String::as_str)
    }

    /// Returns `true` if `path` is in the listing.
    #[must_use]
    pub fn contains(&self, path: &str) -> bool {
        self.files.iter().any(|f| f == path)
    }

    /// Number of paths.
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Returns `true` if the listing has no paths.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// The paths as a set, for difference computations.
    #[must_use]
    pub fn to_set(&self) -> BTreeSet<&str> {
        self.iter().collect()
    }
}

impl<S: AsRef<str>> FromIterator<S> for FileListing {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut listing = Self::new();
        for path in iter {
            listing.push(path);
        }
        listing
    }
}

impl<'a> IntoIterator for &'a FileListing {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.files.iter()
    }
}
