//! Platform-aware shared-library extension handling.
//!
//! Python extension modules are `.so` on Linux and macOS and `.pyd` on
//! Windows. Native dynamic libraries are `.so`, `.dylib` and `.dll`
//! respectively. Users write patterns in whichever spelling they know; the
//! translator rewrites them for the platform being checked, and the
//! classifier flags files built for a different one.
//!
//! The platform is always an explicit argument so every platform can be
//! exercised from a single process.

use std::fmt;
use std::str::FromStr;

/// Target platform of a check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    /// Linux and other ELF platforms.
    Linux,
    /// macOS.
    MacOs,
    /// Windows.
    Windows,
}

impl Platform {
    /// All supported platforms.
    pub const ALL: [Self; 3] = [Self::Linux, Self::MacOs, Self::Windows];

    /// The platform this binary was compiled for.
    #[must_use]
    pub const fn current() -> Self {
        if cfg!(windows) {
            Self::Windows
        } else if cfg!(target_os = "macos") {
            Self::MacOs
        } else {
            Self::Linux
        }
    }

    /// Returns the canonical spelling of `family` on this platform.
    #[must_use]
    pub const fn canonical(self, family: ExtensionFamily) -> SharedLibraryExtension {
        match (family, self) {
            (ExtensionFamily::ExtensionModule, Self::Windows) => SharedLibraryExtension::Pyd,
            (ExtensionFamily::ExtensionModule | ExtensionFamily::DynamicLibrary, Self::Linux)
            | (ExtensionFamily::ExtensionModule, Self::MacOs) => SharedLibraryExtension::So,
            (ExtensionFamily::DynamicLibrary, Self::MacOs) => SharedLibraryExtension::Dylib,
            (ExtensionFamily::DynamicLibrary, Self::Windows) => SharedLibraryExtension::Dll,
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Linux => "linux",
            Self::MacOs => "macos",
            Self::Windows => "windows",
        };
        f.write_str(name)
    }
}

impl FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "linux" => Ok(Self::Linux),
            "macos" | "darwin" => Ok(Self::MacOs),
            "windows" | "win32" => Ok(Self::Windows),
            other => Err(format!(
                "unknown platform '{other}' (expected linux, macos or windows)"
            )),
        }
    }
}

/// Group of shared-library spellings that are synonyms across platforms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtensionFamily {
    /// Python extension modules: `.so`, `.pyd`.
    ExtensionModule,
    /// Native dynamic libraries: `.dll`, `.dylib`.
    DynamicLibrary,
}

/// A recognized shared-library file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SharedLibraryExtension {
    /// `.so`
    So,
    /// `.pyd`
    Pyd,
    /// `.dll`
    Dll,
    /// `.dylib`
    Dylib,
}

impl SharedLibraryExtension {
    /// Every recognized extension.
    pub const ALL: [Self; 4] = [Self::So, Self::Pyd, Self::Dll, Self::Dylib];

    /// The suffix including the leading dot.
    #[must_use]
    pub const fn suffix(self) -> &'static str {
        match self {
            Self::So => ".so",
            Self::Pyd => ".pyd",
            Self::Dll => ".dll",
            Self::Dylib => ".dylib",
        }
    }

    /// The family this spelling belongs to.
    #[must_use]
    pub const fn family(self) -> ExtensionFamily {
        match self {
            Self::So | Self::Pyd => ExtensionFamily::ExtensionModule,
            Self::Dll | Self::Dylib => ExtensionFamily::DynamicLibrary,
        }
    }

    /// Recognizes the extension `name` ends with, if any.
    ///
    /// # Examples
    ///
    /// ```
    /// use checkdist_core::platform::SharedLibraryExtension;
    ///
    /// assert_eq!(
    ///     SharedLibraryExtension::of("pkg/_ext.cpython-312-x86_64-linux-gnu.so"),
    ///     Some(SharedLibraryExtension::So)
    /// );
    /// assert_eq!(SharedLibraryExtension::of("lib.so.1"), None);
    /// ```
    #[must_use]
    pub fn of(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|ext| name.ends_with(ext.suffix()))
    }
}

impl fmt::Display for SharedLibraryExtension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.suffix())
    }
}

/// A file whose shared-library extension belongs to another platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlatformViolation {
    /// Extension found on the file.
    pub found: SharedLibraryExtension,
    /// Extension this platform uses for the same family.
    pub expected: SharedLibraryExtension,
    /// Platform the check ran for.
    pub platform: Platform,
}

impl fmt::Display for PlatformViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "extension '{}' is incorrect for {} (expected '{}')",
            self.found, self.platform, self.expected
        )
    }
}

/// Rewrites the shared-library extension of `pattern` for `platform`.
///
/// Patterns without a recognized extension are returned unchanged.
/// Translation is idempotent.
///
/// # Examples
///
/// ```
/// use checkdist_core::Platform;
/// use checkdist_core::platform::translate;
///
/// assert_eq!(translate("*.so", Platform::Windows), "*.pyd");
/// assert_eq!(translate("mylib.dll", Platform::MacOs), "mylib.dylib");
/// assert_eq!(translate("mylib.dll", Platform::Linux), "mylib.so");
/// assert_eq!(translate("README.md", Platform::Windows), "README.md");
/// ```
#[must_use]
pub fn translate(pattern: &str, platform: Platform) -> String {
    let Some(ext) = SharedLibraryExtension::of(pattern) else {
        return pattern.to_string();
    };

    let canonical = platform.canonical(ext.family());
    let stem = &pattern[..pattern.len() - ext.suffix().len()];
    format!("{stem}{}", canonical.suffix())
}

/// Classifies `filename` as built for another platform.
///
/// Returns `None` for files without a recognized shared-library extension
/// and for files already using this platform's spelling.
///
/// # Examples
///
/// ```
/// use checkdist_core::Platform;
/// use checkdist_core::platform::classify_violation;
///
/// assert!(classify_violation("lib.so", Platform::Windows).is_some());
/// assert!(classify_violation("lib.pyd", Platform::Linux).is_some());
/// assert!(classify_violation("lib.so", Platform::Linux).is_none());
/// ```
#[must_use]
pub fn classify_violation(filename: &str, platform: Platform) -> Option<PlatformViolation> {
    let found = SharedLibraryExtension::of(filename)?;
    let expected = platform.canonical(found.family());

    (found != expected).then_some(PlatformViolation {
        found,
        expected,
        platform,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_no_change_on_native() {
        assert_eq!(translate("foo.so", Platform::Linux), "foo.so");
        assert_eq!(translate("foo.so", Platform::MacOs), "foo.so");
        assert_eq!(translate("foo.pyd", Platform::Windows), "foo.pyd");
        assert_eq!(translate("foo.dll", Platform::Windows), "foo.dll");
        assert_eq!(translate("foo.dylib", Platform::MacOs), "foo.dylib");
    }

    #[test]
    fn test_translate_to_windows() {
        assert_eq!(translate("mylib.so", Platform::Windows), "mylib.pyd");
        assert_eq!(translate("mylib.dylib", Platform::Windows), "mylib.dll");
    }

    #[test]
    fn test_translate_to_linux() {
        assert_eq!(translate("mylib.pyd", Platform::Linux), "mylib.so");
        assert_eq!(translate("mylib.dll", Platform::Linux), "mylib.so");
        assert_eq!(translate("mylib.dylib", Platform::Linux), "mylib.so");
    }

    #[test]
    fn test_translate_to_macos() {
        assert_eq!(translate("mylib.pyd", Platform::MacOs), "mylib.so");
        assert_eq!(translate("mylib.dll", Platform::MacOs), "mylib.dylib");
    }

    #[test]
    fn test_translate_unrecognized() {
        assert_eq!(translate("file.txt", Platform::Windows), "file.txt");
        assert_eq!(translate("Makefile", Platform::Windows), "Makefile");
        assert_eq!(translate("lib.so.1", Platform::Windows), "lib.so.1");
    }

    #[test]
    fn test_translate_glob() {
        assert_eq!(translate("*.so", Platform::Windows), "*.pyd");
        assert_eq!(translate("pkg/*.pyd", Platform::MacOs), "pkg/*.so");
    }

    #[test]
    fn test_translate_idempotent() {
        for platform in Platform::ALL {
            for ext in SharedLibraryExtension::ALL {
                let pattern = format!("*{ext}");
                let once = translate(&pattern, platform);
                assert_eq!(translate(&once, platform), once, "{pattern} on {platform}");
            }
        }
    }

    #[test]
    fn test_classify_windows() {
        let violation = classify_violation("pkg/ext.so", Platform::Windows).unwrap();
        assert_eq!(violation.found, SharedLibraryExtension::So);
        assert_eq!(violation.expected, SharedLibraryExtension::Pyd);
        assert!(classify_violation("pkg/ext.dylib", Platform::Windows).is_some());
        assert!(classify_violation("pkg/ext.pyd", Platform::Windows).is_none());
        assert!(classify_violation("pkg/ext.dll", Platform::Windows).is_none());
    }

    #[test]
    fn test_classify_linux() {
        let violation = classify_violation("pkg/ext.pyd", Platform::Linux).unwrap();
        assert_eq!(violation.expected, SharedLibraryExtension::So);
        assert!(classify_violation("pkg/ext.dll", Platform::Linux).is_some());
        assert!(classify_violation("pkg/libfoo.dylib", Platform::Linux).is_some());
        assert!(classify_violation("pkg/ext.so", Platform::Linux).is_none());
        assert!(classify_violation("pkg/__init__.py", Platform::Linux).is_none());
    }

    #[test]
    fn test_classify_macos() {
        assert!(classify_violation("pkg/ext.so", Platform::MacOs).is_none());
        assert!(classify_violation("pkg/libfoo.dylib", Platform::MacOs).is_none());
        assert!(classify_violation("pkg/ext.pyd", Platform::MacOs).is_some());
        assert!(classify_violation("pkg/foo.dll", Platform::MacOs).is_some());
    }

    #[test]
    fn test_violation_display() {
        let violation = classify_violation("ext.pyd", Platform::Linux).unwrap();
        assert_eq!(
            violation.to_string(),
            "extension '.pyd' is incorrect for linux (expected '.so')"
        );
    }

    #[test]
    fn test_platform_from_str() {
        assert_eq!("linux".parse::<Platform>().unwrap(), Platform::Linux);
        assert_eq!("darwin".parse::<Platform>().unwrap(), Platform::MacOs);
        assert_eq!("Win32".parse::<Platform>().unwrap(), Platform::Windows);
        assert!("beos".parse::<Platform>().is_err());
    }
}
