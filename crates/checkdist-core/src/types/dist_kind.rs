//! Distribution kind enumeration.

use std::fmt;

use serde::Serialize;

/// Kind of distribution archive being checked.
///
/// # Examples
///
/// ```
/// use checkdist_core::DistKind;
///
/// assert_eq!(DistKind::Sdist.to_string(), "sdist");
/// assert_eq!(DistKind::Wheel.to_string(), "wheel");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DistKind {
    /// Source archive, compared against version control.
    Sdist,
    /// Binary archive, may contain compiled shared libraries.
    Wheel,
}

impl DistKind {
    /// Both kinds, in reporting order.
    pub const ALL: [Self; 2] = [Self::Sdist, Self::Wheel];

    /// Returns `true` for the source archive.
    #[must_use]
    pub const fn is_sdist(self) -> bool {
        matches!(self, Self::Sdist)
    }
}

impl fmt::Display for DistKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Sdist => "sdist",
            Self::Wheel => "wheel",
        })
    }
}
