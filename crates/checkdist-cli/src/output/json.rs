//! JSON output formatter for machine-readable results.

use super::formatter::JsonOutput;
use super::formatter::OutputFormatter;
use anyhow::Result;
use checkdist_core::CheckReport;
use checkdist_core::DistKind;
use checkdist_core::FileListing;
use checkdist_core::Finding;
use checkdist_core::config::RuleSource;
use serde::Serialize;
use std::io::Write;
use std::io::{self};
use std::path::Path;

pub struct JsonFormatter;

impl JsonFormatter {
    fn output<T: Serialize>(value: &T) -> Result<()> {
        let json = serde_json::to_string_pretty(value)?;
        writeln!(io::stdout(), "{json}")?;
        Ok(())
    }
}

#[derive(Serialize)]
struct ArchiveOutput<'a> {
    kind: DistKind,
    name: &'a str,
    files: Vec<&'a str>,
}

#[derive(Serialize)]
struct CheckOutput<'a> {
    platform: String,
    sdist_rules: RuleSource,
    wheel_rules: RuleSource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pre_built: Option<String>,
    error_count: usize,
    findings: &'a [Finding],
    archives: Vec<ArchiveOutput<'a>>,
}

impl<'a> CheckOutput<'a> {
    fn from_report(report: &'a CheckReport) -> Self {
        Self {
            platform: report.platform.to_string(),
            sdist_rules: report.sdist_source,
            wheel_rules: report.wheel_source,
            pre_built: report.pre_built.as_ref().map(|p| p.display().to_string()),
            error_count: report.verdict.error_count(),
            findings: report.verdict.findings(),
            archives: report
                .archives
                .iter()
                .map(|a| ArchiveOutput {
                    kind: a.kind,
                    name: &a.name,
                    files: a.files.iter().collect(),
                })
                .collect(),
        }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_check_report(&self, report: &CheckReport) -> Result<()> {
        let data = CheckOutput::from_report(report);
        let output = if report.success() {
            JsonOutput::success("check", data)
        } else {
            JsonOutput::failure("check", data)
        };
        Self::output(&output)
    }

    fn format_listing(&self, archive: &Path, kind: DistKind, listing: &FileListing) -> Result<()> {
        #[derive(Serialize)]
        struct ListOutput<'a> {
            archive: String,
            kind: DistKind,
            files: Vec<&'a str>,
        }

        let data = ListOutput {
            archive: archive.display().to_string(),
            kind,
            files: listing.iter().collect(),
        };

        let output = JsonOutput::success("list", data);
        Self::output(&output)
    }

    fn format_error(&self, operation: &str, error: &anyhow::Error) {
        let output = JsonOutput::<()>::error(operation, format!("{error:?}"));
        let _ = Self::output(&output);
    }
}
