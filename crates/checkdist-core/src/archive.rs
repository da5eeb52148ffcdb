//! Listing the files inside built distributions.
//!
//! Only regular files are reported. Paths inside an sdist are relative to
//! the `<name>-<version>/` directory every sdist is wrapped in; paths inside
//! a wheel are used as-is.

use std::fs::File;
use std::io::BufReader;
use std::io::Read;
use std::io::Seek;
use std::path::Path;
use std::path::PathBuf;

use flate2::read::GzDecoder;
use log::debug;
use log::warn;

use crate::CheckDistError;
use crate::DistKind;
use crate::FileListing;
use crate::Result;

/// Container formats accepted for source archives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SdistFormat {
    /// Plain `.tar`.
    Tar,
    /// Gzip-compressed tar (`.tar.gz`, `.tgz`).
    TarGz,
    /// `.zip`.
    Zip,
}

impl SdistFormat {
    /// Detects the format from the file name.
    ///
    /// # Errors
    ///
    /// Returns [`CheckDistError::UnsupportedFormat`] for any other suffix.
    ///
    /// # Examples
    ///
    /// ```
    /// use checkdist_core::archive::SdistFormat;
    /// use std::path::Path;
    ///
    /// assert_eq!(
    ///     SdistFormat::detect(Path::new("pkg-1.0.tar.gz")).unwrap(),
    ///     SdistFormat::TarGz
    /// );
    /// assert!(SdistFormat::detect(Path::new("pkg-1.0.tar.bz2")).is_err());
    /// ```
    pub fn detect(path: &Path) -> Result<Self> {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_ascii_lowercase())
            .unwrap_or_default();

        if name.ends_with(".tar.gz") || name.ends_with(".tgz") {
            Ok(Self::TarGz)
        } else if name.ends_with(".tar") {
            Ok(Self::Tar)
        } else if name.ends_with(".zip") {
            Ok(Self::Zip)
        } else {
            Err(CheckDistError::UnsupportedFormat(path.to_path_buf()))
        }
    }
}

/// Distributions found in a build output directory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DistFiles {
    /// The source archive, if any.
    pub sdist: Option<PathBuf>,
    /// The binary archive, if any.
    pub wheel: Option<PathBuf>,
}

impl DistFiles {
    /// The archive for `kind`.
    #[must_use]
    pub fn get(&self, kind: DistKind) -> Option<&Path> {
        match kind {
            DistKind::Sdist => self.sdist.as_deref(),
            DistKind::Wheel => self.wheel.as_deref(),
        }
    }
}

/// Classifies a file name as a distribution archive.
#[must_use]
pub fn dist_kind_of(name: &str) -> Option<DistKind> {
    if name.ends_with(".whl") {
        Some(DistKind::Wheel)
    } else if name.ends_with(".tar.gz") || name.ends_with(".zip") {
        Some(DistKind::Sdist)
    } else {
        None
    }
}

/// Finds the sdist and wheel in `dir`.
///
/// When several archives of one kind exist, the first in name order is used.
///
/// # Errors
///
/// Returns an I/O error if `dir` cannot be read.
pub fn find_dist_files(dir: &Path) -> Result<DistFiles> {
    let mut names: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(std::result::Result::ok)
        .filter(|e| e.file_type().is_ok_and(|t| t.is_file()))
        .map(|e| e.path())
        .collect();
    names.sort();

    let mut found = DistFiles::default();
    for path in names {
        let Some(kind) = path
            .file_name()
            .and_then(|n| n.to_str())
            .and_then(dist_kind_of)
        else {
            continue;
        };

        let slot = match kind {
            DistKind::Sdist => &mut found.sdist,
            DistKind::Wheel => &mut found.wheel,
        };
        if let Some(existing) = slot {
            warn!(
                "ignoring {} in favor of {}",
                path.display(),
                existing.display()
            );
        } else {
            debug!("found {kind}: {}", path.display());
            *slot = Some(path);
        }
    }

    Ok(found)
}

/// Lists the regular files of a source archive with the top-level directory
/// stripped, sorted.
///
/// # Errors
///
/// Returns an error if the format is unsupported or the archive is corrupt.
pub fn list_sdist_files(path: &Path) -> Result<FileListing> {
    let names = match SdistFormat::detect(path)? {
        SdistFormat::Tar => {
            let reader = BufReader::new(File::open(path)?);
            list_tar_entries(tar::Archive::new(reader))?
        }
        SdistFormat::TarGz => {
            let reader = BufReader::new(File::open(path)?);
            list_tar_entries(tar::Archive::new(GzDecoder::new(reader)))?
        }
        SdistFormat::Zip => list_zip_entries(File::open(path)?)?,
    };

    let mut listing: FileListing = names.iter().map(|n| strip_top_level(n)).collect();
    listing.sort();
    debug!("{} file(s) in {}", listing.len(), path.display());
    Ok(listing)
}

/// Lists the regular files of a wheel, sorted.
///
/// # Errors
///
/// Returns an error if the wheel is not a valid zip archive.
pub fn list_wheel_files(path: &Path) -> Result<FileListing> {
    let mut listing: FileListing = list_zip_entries(File::open(path)?)?.into_iter().collect();
    listing.sort();
    debug!("{} file(s) in {}", listing.len(), path.display());
    Ok(listing)
}

/// Lists `path` as an archive of the given kind.
///
/// # Errors
///
/// See [`list_sdist_files`] and [`list_wheel_files`].
pub fn list_dist_files(path: &Path, kind: DistKind) -> Result<FileListing> {
    match kind {
        DistKind::Sdist => list_sdist_files(path),
        DistKind::Wheel => list_wheel_files(path),
    }
}

fn strip_top_level(name: &str) -> &str {
    name.split_once('/').map_or(name, |(_, rest)| rest)
}

fn list_tar_entries<R: Read>(mut archive: tar::Archive<R>) -> Result<Vec<String>> {
    let entries = archive
        .entries()
        .map_err(|e| CheckDistError::InvalidArchive(format!("failed to read TAR entries: {e}")))?;

    let mut names = Vec::new();
    for entry_result in entries {
        let entry = entry_result
            .map_err(|e| CheckDistError::InvalidArchive(format!("failed to read TAR entry: {e}")))?;

        if !matches!(
            entry.header().entry_type(),
            tar::EntryType::Regular | tar::EntryType::Continuous
        ) {
            continue;
        }

        names.push(String::from_utf8_lossy(&entry.path_bytes()).into_owned());
    }

    Ok(names)
}

fn list_zip_entries<R: Read + Seek>(reader: R) -> Result<Vec<String>> {
    let mut archive = zip::ZipArchive::new(reader)
        .map_err(|e| CheckDistError::InvalidArchive(format!("failed to open ZIP archive: {e}")))?;

    let mut names = Vec::with_capacity(archive.len());
    for i in 0..archive.len() {
        let entry = archive
            .by_index(i)
            .map_err(|e| CheckDistError::InvalidArchive(format!("failed to read ZIP entry: {e}")))?;

        if entry.is_dir() {
            continue;
        }
        names.push(entry.name().to_string());
    }

    Ok(names)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::test_utils::TarTestBuilder;
    use crate::test_utils::ZipTestBuilder;
    use crate::test_utils::gzip;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, data: &[u8]) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, data).unwrap();
        path
    }

    #[test]
    fn test_list_sdist_tar_gz() {
        let dir = TempDir::new().unwrap();
        let tar = TarTestBuilder::new()
            .add_directory("pkg-1.0/")
            .add_file("pkg-1.0/PKG-INFO", b"Metadata-Version: 2.1")
            .add_file("pkg-1.0/pkg/__init__.py", b"")
            .add_symlink("pkg-1.0/link", "PKG-INFO")
            .build();
        let path = write(&dir, "pkg-1.0.tar.gz", &gzip(&tar));

        let listing = list_sdist_files(&path).unwrap();
        assert_eq!(listing.files(), ["PKG-INFO", "pkg/__init__.py"]);
    }

    #[test]
    fn test_list_sdist_plain_tar() {
        let dir = TempDir::new().unwrap();
        let tar = TarTestBuilder::new().add_file("pkg-1.0/b", b"").add_file("pkg-1.0/a", b"").build();
        let path = write(&dir, "pkg-1.0.tar", &tar);

        let listing = list_sdist_files(&path).unwrap();
        assert_eq!(listing.files(), ["a", "b"]);
    }

    #[test]
    fn test_list_sdist_zip() {
        let dir = TempDir::new().unwrap();
        let zip = ZipTestBuilder::new()
            .add_directory("pkg-1.0/")
            .add_file("pkg-1.0/setup.py", b"")
            .add_file("toplevel.txt", b"")
            .build();
        let path = write(&dir, "pkg-1.0.zip", &zip);

        let listing = list_sdist_files(&path).unwrap();
        assert_eq!(listing.files(), ["setup.py", "toplevel.txt"]);
    }

    #[test]
    fn test_list_sdist_unsupported() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "pkg-1.0.tar.bz2", b"");
        assert!(matches!(
            list_sdist_files(&path),
            Err(CheckDistError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_list_sdist_corrupt() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "pkg-1.0.zip", b"not a zip");
        assert!(matches!(
            list_sdist_files(&path),
            Err(CheckDistError::InvalidArchive(_))
        ));
    }

    #[test]
    fn test_list_wheel() {
        let dir = TempDir::new().unwrap();
        let zip = ZipTestBuilder::new()
            .add_file("pkg/__init__.py", b"")
            .add_directory("pkg/sub/")
            .add_file("pkg-1.0.dist-info/METADATA", b"")
            .build();
        let path = write(&dir, "pkg-1.0-py3-none-any.whl", &zip);

        let listing = list_wheel_files(&path).unwrap();
        assert_eq!(
            listing.files(),
            ["pkg-1.0.dist-info/METADATA", "pkg/__init__.py"]
        );
    }

    #[test]
    fn test_find_dist_files() {
        let dir = TempDir::new().unwrap();
        write(&dir, "pkg-1.0.tar.gz", b"");
        write(&dir, "pkg-1.0-py3-none-any.whl", b"");
        write(&dir, "notes.txt", b"");

        let found = find_dist_files(dir.path()).unwrap();
        assert!(found.sdist.unwrap().ends_with("pkg-1.0.tar.gz"));
        assert!(found.wheel.unwrap().ends_with("pkg-1.0-py3-none-any.whl"));
    }

    #[test]
    fn test_find_dist_files_empty() {
        let dir = TempDir::new().unwrap();
        let found = find_dist_files(dir.path()).unwrap();
        assert_eq!(found, DistFiles::default());
        assert!(found.get(DistKind::Sdist).is_none());
    }

    #[test]
    fn test_dist_kind_of() {
        assert_eq!(dist_kind_of("a-1.0.tar.gz"), Some(DistKind::Sdist));
        assert_eq!(dist_kind_of("a-1.0.zip"), Some(DistKind::Sdist));
        assert_eq!(dist_kind_of("a-1.0-py3-none-any.whl"), Some(DistKind::Wheel));
        assert_eq!(dist_kind_of("a-1.0.tar"), None);
    }

    #[test]
    fn test_strip_top_level() {
        assert_eq!(strip_top_level("pkg-1.0/a/b.py"), "a/b.py");
        assert_eq!(strip_top_level("PKG-INFO"), "PKG-INFO");
    }
}
