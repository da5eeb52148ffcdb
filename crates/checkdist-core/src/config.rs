//! Resolution of present/absent rules for each distribution kind.
//!
//! Rules come from the first source that has something to say about a kind:
//!
//! 1. `[tool.check-dist]` in `pyproject.toml` (used verbatim),
//! 2. the build backend's packaging directives (`[tool.hatch.build]`),
//! 3. a project-template answers file (`.copier-answers.yaml`),
//! 4. nothing, in which case only extension checks apply.
//!
//! # Examples
//!
//! ```
//! use checkdist_core::DistKind;
//! use checkdist_core::config::DeclaredConfig;
//! use checkdist_core::config::HatchBuildConfig;
//! use checkdist_core::config::RuleSource;
//! use checkdist_core::config::resolve;
//!
//! let declared: DeclaredConfig = toml::from_str(
//!     r#"
//!     [sdist]
//!     present = ["LICENSE"]
//!     absent = [".github"]
//!     "#,
//! )
//! .unwrap();
//!
//! let rules = resolve(&declared, &HatchBuildConfig::default(), None);
//! assert_eq!(rules.rules(DistKind::Sdist).present, ["LICENSE"]);
//! assert_eq!(rules.source(DistKind::Sdist), RuleSource::Declared);
//! assert_eq!(rules.source(DistKind::Wheel), RuleSource::Empty);
//! ```

use std::fmt;
use std::str::FromStr;

use log::debug;
use serde::Deserialize;
use serde::Serialize;

use crate::DistKind;
use crate::Result;
use crate::pattern::basename;
use crate::pattern::validate_pattern;

/// Present/absent patterns for one distribution kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DistributionRules {
    /// Patterns that must each match at least one file.
    pub present: Vec<String>,
    /// Patterns that must match no file.
    pub absent: Vec<String>,
}

impl DistributionRules {
    /// Returns `true` if there is nothing to check.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.present.is_empty() && self.absent.is_empty()
    }

    fn patterns(&self) -> impl Iterator<Item = &str> {
        self.present.iter().chain(&self.absent).map(String::as_str)
    }
}

/// Where a kind's rules came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RuleSource {
    /// `[tool.check-dist]`.
    Declared,
    /// Build-backend packaging directives.
    BuildBackend,
    /// Project-template answers.
    Template,
    /// No source; only extension checks apply.
    Empty,
}

impl fmt::Display for RuleSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Declared => "[tool.check-dist]",
            Self::BuildBackend => "[tool.hatch.build]",
            Self::Template => ".copier-answers.yaml",
            Self::Empty => "none",
        })
    }
}

/// Effective rules for both distribution kinds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRules {
    sdist: DistributionRules,
    wheel: DistributionRules,
    sdist_source: RuleSource,
    wheel_source: RuleSource,
}

impl ResolvedRules {
    /// Rules that check nothing.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            sdist: DistributionRules::default(),
            wheel: DistributionRules::default(),
            sdist_source: RuleSource::Empty,
            wheel_source: RuleSource::Empty,
        }
    }

    /// Rules given explicitly for both kinds.
    #[must_use]
    pub fn declared(sdist: DistributionRules, wheel: DistributionRules) -> Self {
        Self {
            sdist,
            wheel,
            sdist_source: RuleSource::Declared,
            wheel_source: RuleSource::Declared,
        }
    }

    /// The rules for `kind`.
    #[must_use]
    pub fn rules(&self, kind: DistKind) -> &DistributionRules {
        match kind {
            DistKind::Sdist => &self.sdist,
            DistKind::Wheel => &self.wheel,
        }
    }

    /// Where the rules for `kind` came from.
    #[must_use]
    pub fn source(&self, kind: DistKind) -> RuleSource {
        match kind {
            DistKind::Sdist => self.sdist_source,
            DistKind::Wheel => self.wheel_source,
        }
    }

    /// Rejects any pattern that cannot be compiled.
    ///
    /// # Errors
    ///
    /// Returns [`CheckDistError::InvalidPattern`](crate::CheckDistError::InvalidPattern)
    /// for the first malformed glob.
    pub fn validate(&self) -> Result<()> {
        self.sdist
            .patterns()
            .chain(self.wheel.patterns())
            .try_for_each(validate_pattern)
    }

    fn set(&mut self, kind: DistKind, rules: DistributionRules, source: RuleSource) {
        match kind {
            DistKind::Sdist => {
                self.sdist = rules;
                self.sdist_source = source;
            }
            DistKind::Wheel => {
                self.wheel = rules;
                self.wheel_source = source;
            }
        }
    }
}

impl Default for ResolvedRules {
    fn default() -> Self {
        Self::empty()
    }
}

/// The `[tool.check-dist]` table.
///
/// Top-level `present`/`absent` apply to both kinds and come before the
/// kind-specific lists.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DeclaredConfig {
    /// Patterns required in both distributions.
    pub present: Option<Vec<String>>,
    /// Patterns forbidden in both distributions.
    pub absent: Option<Vec<String>>,
    /// `[tool.check-dist.sdist]`.
    pub sdist: Option<DeclaredRules>,
    /// `[tool.check-dist.wheel]`.
    pub wheel: Option<DeclaredRules>,
}

/// A `[tool.check-dist.<kind>]` table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DeclaredRules {
    /// Required patterns.
    #[serde(default)]
    pub present: Vec<String>,
    /// Forbidden patterns.
    #[serde(default)]
    pub absent: Vec<String>,
}

impl DeclaredConfig {
    /// The declared rules for `kind`, or `None` if nothing applies to it.
    #[must_use]
    pub fn rules_for(&self, kind: DistKind) -> Option<DistributionRules> {
        let specific = match kind {
            DistKind::Sdist => self.sdist.as_ref(),
            DistKind::Wheel => self.wheel.as_ref(),
        };

        if specific.is_none() && self.present.is_none() && self.absent.is_none() {
            return None;
        }

        let base_present = self.present.iter().flatten();
        let base_absent = self.absent.iter().flatten();
        Some(DistributionRules {
            present: base_present
                .chain(specific.map(|s| &s.present).into_iter().flatten())
                .cloned()
                .collect(),
            absent: base_absent
                .chain(specific.map(|s| &s.absent).into_iter().flatten())
                .cloned()
                .collect(),
        })
    }
}

/// The `[tool.hatch.build]` table, reduced to the keys that shape archives.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct HatchBuildConfig {
    /// Per-target settings.
    #[serde(default)]
    pub targets: HatchTargets,
    /// Build-level `packages`, used when a target has none.
    pub packages: Option<Vec<String>>,
    /// Build-level `only-include`.
    pub only_include: Option<Vec<String>>,
    /// Build-level `include`.
    pub include: Option<Vec<String>>,
    /// Build-level `exclude`.
    pub exclude: Option<Vec<String>>,
    /// Untracked build outputs that may legitimately ship.
    #[serde(default)]
    pub artifacts: Vec<String>,
}

/// The `[tool.hatch.build.targets]` table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct HatchTargets {
    /// `[tool.hatch.build.targets.sdist]`.
    pub sdist: Option<HatchTarget>,
    /// `[tool.hatch.build.targets.wheel]`.
    pub wheel: Option<HatchTarget>,
}

/// Settings for one hatch build target.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct HatchTarget {
    /// Package directories to ship.
    pub packages: Option<Vec<String>>,
    /// Exhaustive list of paths to ship.
    pub only_include: Option<Vec<String>>,
    /// Additional paths to ship.
    pub include: Option<Vec<String>>,
    /// Paths to leave out.
    pub exclude: Option<Vec<String>>,
}

const EMPTY_TARGET: HatchTarget = HatchTarget {
    packages: None,
    only_include: None,
    include: None,
    exclude: None,
};

impl HatchBuildConfig {
    /// The sdist target, or an empty one.
    #[must_use]
    pub fn sdist_target(&self) -> &HatchTarget {
        self.targets.sdist.as_ref().unwrap_or(&EMPTY_TARGET)
    }

    /// The wheel target, or an empty one.
    #[must_use]
    pub fn wheel_target(&self) -> &HatchTarget {
        self.targets.wheel.as_ref().unwrap_or(&EMPTY_TARGET)
    }

    /// Rules inferred from packaging directives, if the backend names any
    /// paths for `kind`.
    ///
    /// The sdist must contain its `only-include` paths (or its packages);
    /// the wheel must contain each package under its installed name.
    #[must_use]
    pub fn inferred_rules(&self, kind: DistKind) -> Option<DistributionRules> {
        let present: Vec<String> = match kind {
            DistKind::Sdist => {
                let target = self.sdist_target();
                target
                    .only_include
                    .as_ref()
                    .or(target.packages.as_ref())
                    .or(self.only_include.as_ref())
                    .or(self.packages.as_ref())?
                    .iter()
                    .map(|p| p.trim_matches('/').to_string())
                    .filter(|p| !p.is_empty())
                    .collect()
            }
            DistKind::Wheel => self
                .wheel_target()
                .packages
                .as_ref()
                .or(self.packages.as_ref())?
                .iter()
                .map(|p| basename(p.trim_matches('/')).to_string())
                .filter(|p| !p.is_empty())
                .collect(),
        };

        (!present.is_empty()).then(|| DistributionRules {
            present,
            absent: Vec::new(),
        })
    }
}

/// Answers recorded by the project-scaffolding template.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TemplateAnswers {
    /// Human project name.
    pub project_name: Option<String>,
    /// Extension kind chosen when generating the project.
    pub add_extension: Option<String>,
}

/// Extension kinds offered by the project template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtensionKind {
    /// C++ extension.
    Cpp,
    /// Rust extension.
    Rust,
    /// JavaScript bundle.
    Js,
    /// Jupyter extension.
    Jupyter,
    /// Rust compiled to WebAssembly plus JavaScript.
    RustJsWasm,
    /// C++ compiled to WebAssembly plus JavaScript.
    CppJsWasm,
    /// Pure Python.
    Python,
}

impl FromStr for ExtensionKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "cpp" => Ok(Self::Cpp),
            "rust" => Ok(Self::Rust),
            "js" => Ok(Self::Js),
            "jupyter" => Ok(Self::Jupyter),
            "rustjswasm" => Ok(Self::RustJsWasm),
            "cppjswasm" => Ok(Self::CppJsWasm),
            "python" => Ok(Self::Python),
            other => Err(format!("unknown extension kind '{other}'")),
        }
    }
}

struct ExtensionDefaults {
    sdist_present: &'static [&'static str],
    sdist_absent: &'static [&'static str],
    wheel_absent: &'static [&'static str],
}

const COMMON_SDIST_PRESENT: &[&str] = &["LICENSE", "pyproject.toml", "README.md"];
const COMMON_SDIST_ABSENT: &[&str] = &[
    ".copier-answers.yaml",
    "Makefile",
    ".github",
    "dist",
    "docs",
    "examples",
    "tests",
];
const COMMON_WHEEL_ABSENT: &[&str] = &[
    ".gitignore",
    ".copier-answers.yaml",
    "Makefile",
    "pyproject.toml",
    ".github",
    "dist",
    "docs",
    "examples",
    "tests",
];

impl ExtensionKind {
    const fn defaults(self) -> ExtensionDefaults {
        match self {
            Self::Cpp => ExtensionDefaults {
                sdist_present: &["cpp"],
                sdist_absent: &[".clang-format"],
                wheel_absent: &["cpp"],
            },
            Self::Rust => ExtensionDefaults {
                sdist_present: &["rust", "src", "Cargo.toml", "Cargo.lock"],
                sdist_absent: &[".gitattributes", "target"],
                wheel_absent: &["rust", "src", "Cargo.toml"],
            },
            Self::Js | Self::Jupyter => ExtensionDefaults {
                sdist_present: &["js"],
                sdist_absent: &[".gitattributes", ".vscode"],
                wheel_absent: &["js"],
            },
            Self::RustJsWasm => ExtensionDefaults {
                sdist_present: &["js", "rust", "src", "Cargo.toml", "Cargo.lock"],
                sdist_absent: &[".gitattributes", ".vscode", "target"],
                wheel_absent: &["js", "rust", "src", "Cargo.toml"],
            },
            Self::CppJsWasm => ExtensionDefaults {
                sdist_present: &["cpp", "js"],
                sdist_absent: &[".clang-format", ".vscode"],
                wheel_absent: &["js", "cpp"],
            },
            Self::Python => ExtensionDefaults {
                sdist_present: &[],
                sdist_absent: &[],
                wheel_absent: &[],
            },
        }
    }
}

/// Converts a human project name into a Python package directory name.
///
/// # Examples
///
/// ```
/// use checkdist_core::config::module_name_from_project;
///
/// assert_eq!(module_name_from_project("My Cool-Project"), "my_cool_project");
/// assert_eq!(module_name_from_project(" python  template "), "python_template");
/// ```
#[must_use]
pub fn module_name_from_project(project_name: &str) -> String {
    let mut module = String::with_capacity(project_name.len());
    let mut in_separator = false;

    for c in project_name.chars() {
        if c.is_whitespace() || c == '-' {
            if !in_separator {
                module.push('_');
            }
            in_separator = true;
        } else {
            module.extend(c.to_lowercase());
            in_separator = false;
        }
    }

    module.trim_matches('_').to_string()
}

impl TemplateAnswers {
    /// Default rules for both kinds derived from the template answers.
    ///
    /// Returns `None` when the project name or extension kind is missing or
    /// the extension kind is not one the template offers.
    #[must_use]
    pub fn default_rules(&self) -> Option<(DistributionRules, DistributionRules)> {
        let project_name = self.project_name.as_deref().filter(|s| !s.is_empty())?;
        let extension = self.add_extension.as_deref().filter(|s| !s.is_empty())?;

        let kind = match extension.parse::<ExtensionKind>() {
            Ok(kind) => kind,
            Err(e) => {
                debug!("ignoring template answers: {e}");
                return None;
            }
        };

        let defaults = kind.defaults();
        let module = module_name_from_project(project_name);
        let owned = |items: &[&str]| items.iter().map(|s| (*s).to_string()).collect::<Vec<_>>();

        let mut sdist_present = vec![module.clone()];
        sdist_present.extend(owned(defaults.sdist_present));
        sdist_present.extend(owned(COMMON_SDIST_PRESENT));

        let mut sdist_absent = owned(COMMON_SDIST_ABSENT);
        sdist_absent.extend(owned(defaults.sdist_absent));

        let mut wheel_absent = owned(COMMON_WHEEL_ABSENT);
        wheel_absent.extend(owned(defaults.wheel_absent));

        Some((
            DistributionRules {
                present: sdist_present,
                absent: sdist_absent,
            },
            DistributionRules {
                present: vec![module],
                absent: wheel_absent,
            },
        ))
    }
}

/// Resolves the effective rules for both distribution kinds.
///
/// Each kind takes the first of: declared rules, build-backend inference,
/// template defaults, nothing. Declared rules are never merged with inferred
/// ones.
#[must_use]
pub fn resolve(
    declared: &DeclaredConfig,
    backend: &HatchBuildConfig,
    template: Option<&TemplateAnswers>,
) -> ResolvedRules {
    let template_rules = template.and_then(TemplateAnswers::default_rules);
    let mut resolved = ResolvedRules::empty();

    for kind in DistKind::ALL {
        let (rules, source) = if let Some(rules) = declared.rules_for(kind) {
            (rules, RuleSource::Declared)
        } else if let Some(rules) = backend.inferred_rules(kind) {
            (rules, RuleSource::BuildBackend)
        } else if let Some((sdist, wheel)) = &template_rules {
            let rules = if kind.is_sdist() { sdist } else { wheel };
            (rules.clone(), RuleSource::Template)
        } else {
            (DistributionRules::default(), RuleSource::Empty)
        };

        debug!("{kind} rules resolved from {source}");
        resolved.set(kind, rules, source);
    }

    resolved
}
