//! Human-readable output formatter with colors and styling.

use super::formatter::OutputFormatter;
use anyhow::Result;
use checkdist_core::CheckReport;
use checkdist_core::DistKind;
use checkdist_core::FileListing;
use checkdist_core::Finding;
use console::Term;
use console::style;
use std::path::Path;

pub struct HumanFormatter {
    verbose: bool,
    quiet: bool,
    use_colors: bool,
    term: Term,
}

impl HumanFormatter {
    pub fn new(verbose: bool, quiet: bool) -> Self {
        Self {
            verbose,
            quiet,
            use_colors: console::colors_enabled(),
            term: Term::stdout(),
        }
    }

    fn plural(n: usize, word: &str) -> String {
        if n == 1 {
            format!("{n} {word}")
        } else {
            format!("{n} {word}s")
        }
    }

    fn error_line(&self, finding: &Finding) -> String {
        if self.use_colors {
            format!("  {} {finding}", style("✗").red().bold())
        } else {
            format!("  - {finding}")
        }
    }

    fn warning_line(&self, finding: &Finding) -> String {
        if self.use_colors {
            format!("{} {finding}", style("⚠").yellow().bold())
        } else {
            format!("WARNING: {finding}")
        }
    }

    /// Lines describing a check report, in output order.
    fn report_lines(&self, report: &CheckReport) -> Vec<String> {
        let mut lines = Vec::new();
        let verdict = &report.verdict;

        if self.verbose {
            lines.push(format!("Platform: {}", report.platform));
            lines.push(format!(
                "Rules: sdist from {}, wheel from {}",
                report.sdist_source, report.wheel_source
            ));
            if let Some(dir) = &report.pre_built {
                lines.push(format!("Pre-built distributions: {}", dir.display()));
            }
            for archive in &report.archives {
                lines.push(String::new());
                lines.push(format!(
                    "{} {} ({}):",
                    archive.kind,
                    archive.name,
                    Self::plural(archive.files.len(), "file")
                ));
                lines.extend(archive.files.iter().map(|f| format!("  {f}")));
            }
            lines.push(String::new());
        }

        if !self.quiet {
            lines.extend(verdict.warnings().map(|w| self.warning_line(w)));
        }

        let errors = verdict.error_count();
        if errors > 0 {
            let header = format!("{} found:", Self::plural(errors, "error"));
            lines.push(if self.use_colors {
                style(header).red().bold().to_string()
            } else {
                header
            });
            lines.extend(verdict.errors().map(|e| self.error_line(e)));
        } else if !self.quiet {
            lines.push(if self.use_colors {
                format!("{} All checks passed!", style("✓").green().bold())
            } else {
                "All checks passed!".to_string()
            });
        }

        lines
    }

    fn listing_lines(&self, archive: &Path, kind: DistKind, listing: &FileListing) -> Vec<String> {
        if self.quiet {
            return Vec::new();
        }

        let mut lines: Vec<String> = listing.iter().map(str::to_string).collect();
        if self.verbose {
            lines.push(String::new());
            lines.push(format!(
                "Total: {} in {} {}",
                Self::plural(listing.len(), "file"),
                kind,
                archive.display()
            ));
        }
        lines
    }

    fn write_lines(&self, lines: &[String]) {
        for line in lines {
            let _ = self.term.write_line(line);
        }
    }
}

impl OutputFormatter for HumanFormatter {
    fn format_check_report(&self, report: &CheckReport) -> Result<()> {
        self.write_lines(&self.report_lines(report));
        Ok(())
    }

    fn format_listing(&self, archive: &Path, kind: DistKind, listing: &FileListing) -> Result<()> {
        self.write_lines(&self.listing_lines(archive, kind, listing));
        Ok(())
    }

    fn format_error(&self, _operation: &str, error: &anyhow::Error) {
        // Always show errors, even in quiet mode
        if self.use_colors {
            let _ = self
                .term
                .write_line(&format!("{} {error:?}", style("ERROR:").red().bold()));
        } else {
            let _ = self.term.write_line(&format!("ERROR: {error:?}"));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use checkdist_core::Platform;
    use checkdist_core::Verdict;
    use checkdist_core::check::ArchiveListing;
    use checkdist_core::config::RuleSource;
    use checkdist_core::verify::FindingCategory;

    fn plain(verbose: bool, quiet: bool) -> HumanFormatter {
        HumanFormatter {
            verbose,
            quiet,
            use_colors: false,
            term: Term::stdout(),
        }
    }

    fn report(findings: Vec<Finding>) -> CheckReport {
        CheckReport {
            verdict: Verdict::from_findings(findings),
            sdist_source: RuleSource::Declared,
            wheel_source: RuleSource::Template,
            archives: vec![ArchiveListing {
                kind: DistKind::Wheel,
                name: "pkg-1.0-py3-none-any.whl".to_string(),
                files: FileListing::from_iter(["pkg/__init__.py"]),
            }],
            platform: Platform::Linux,
            pre_built: None,
        }
    }

    fn absent_matched() -> Finding {
        Finding::error(
            Some(DistKind::Wheel),
            FindingCategory::AbsentMatched,
            "unwanted pattern 'tests' matched 'tests/test_a.py'",
        )
    }

    fn vcs_warning() -> Finding {
        Finding::warning(
            Some(DistKind::Sdist),
            FindingCategory::VcsUnavailable,
            "git not found",
        )
    }

    #[test]
    fn test_plural() {
        assert_eq!(HumanFormatter::plural(0, "error"), "0 errors");
        assert_eq!(HumanFormatter::plural(1, "error"), "1 error");
        assert_eq!(HumanFormatter::plural(3, "file"), "3 files");
    }

    #[test]
    fn test_success_report() {
        let lines = plain(false, false).report_lines(&report(vec![]));
        assert_eq!(lines, ["All checks passed!"]);
    }

    #[test]
    fn test_failure_report_lists_errors_after_warnings() {
        let lines = plain(false, false).report_lines(&report(vec![vcs_warning(), absent_matched()]));
        assert_eq!(
            lines,
            [
                "WARNING: sdist: git not found",
                "1 error found:",
                "  - wheel: unwanted pattern 'tests' matched 'tests/test_a.py'",
            ]
        );
    }

    #[test]
    fn test_quiet_report_keeps_only_errors() {
        let formatter = plain(false, true);
        assert!(formatter.report_lines(&report(vec![vcs_warning()])).is_empty());

        let lines = formatter.report_lines(&report(vec![vcs_warning(), absent_matched()]));
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "1 error found:");
    }

    #[test]
    fn test_verbose_report_shows_sources_and_files() {
        let lines = plain(true, false).report_lines(&report(vec![]));
        assert_eq!(lines[0], "Platform: linux");
        assert_eq!(
            lines[1],
            "Rules: sdist from [tool.check-dist], wheel from .copier-answers.yaml"
        );
        assert!(lines.contains(&"wheel pkg-1.0-py3-none-any.whl (1 file):".to_string()));
        assert!(lines.contains(&"  pkg/__init__.py".to_string()));
        assert_eq!(lines.last().map(String::as_str), Some("All checks passed!"));
    }

    #[test]
    fn test_listing_lines() {
        let listing = FileListing::from_iter(["a.py", "b/c.py"]);
        let archive = Path::new("pkg.whl");

        let lines = plain(false, false).listing_lines(archive, DistKind::Wheel, &listing);
        assert_eq!(lines, ["a.py", "b/c.py"]);

        let lines = plain(true, false).listing_lines(archive, DistKind::Wheel, &listing);
        assert_eq!(lines.last().map(String::as_str), Some("Total: 2 files in wheel pkg.whl"));

        assert!(plain(false, true)
            .listing_lines(archive, DistKind::Wheel, &listing)
            .is_empty());
    }
}
