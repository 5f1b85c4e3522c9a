//! Validation report model and rendering.
//!
//! The structured (JSON) form is the contract with downstream automation:
//! field names and result ordering are stable, and rendering the same
//! report twice yields byte-identical text.

use crate::error::{ValidateError, ValidateResult};
use chrono::{DateTime, Utc};
use lsrd_types::{Area, ModuleKind};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Outcome of one evaluated check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckOutcome {
    /// Every compared entity was consistent.
    Pass,
    /// At least one cross-module inconsistency was found.
    Fail,
    /// A required module's state was not fetched; the check could not run.
    Skipped,
    /// The check raised on malformed-but-present data.
    Error,
}

impl CheckOutcome {
    /// Fixed-width label for human output.
    pub const fn label(&self) -> &'static str {
        match self {
            CheckOutcome::Pass => "PASS",
            CheckOutcome::Fail => "FAIL",
            CheckOutcome::Skipped => "SKIP",
            CheckOutcome::Error => "ERROR",
        }
    }
}

impl fmt::Display for CheckOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One check's result within a report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckResult {
    /// Stable check identifier, for suppression and regression tracking.
    pub id: String,
    /// Modules the check depends on.
    pub required_modules: Vec<ModuleKind>,
    /// How the check ended.
    pub outcome: CheckOutcome,
    /// Explanation. Always present for non-Pass outcomes and names the
    /// mismatching entities; an optional summary on Pass.
    pub detail: Option<String>,
}

/// The report produced by one validation run. Immutable once assembled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    /// Area the run was scoped to.
    pub area: Area,
    /// When the report was assembled.
    pub timestamp: DateTime<Utc>,
    /// Results in check registration order, stable across runs.
    pub results: Vec<CheckResult>,
    /// True iff every result is `Pass`.
    pub overall_pass: bool,
}

impl ValidationReport {
    /// Assembles a report, computing `overall_pass` from the results.
    pub fn new(area: Area, results: Vec<CheckResult>) -> Self {
        let overall_pass = results.iter().all(|r| r.outcome == CheckOutcome::Pass);
        Self {
            area,
            timestamp: Utc::now(),
            results,
            overall_pass,
        }
    }

    /// Exit-status policy: lenient counts only `Fail` against the run,
    /// strict counts anything that is not `Pass` (so `Skipped` and
    /// `Error` fail too).
    pub fn passed(&self, strict: bool) -> bool {
        if strict {
            self.overall_pass
        } else {
            self.results.iter().all(|r| r.outcome != CheckOutcome::Fail)
        }
    }

    fn count(&self, outcome: CheckOutcome) -> usize {
        self.results.iter().filter(|r| r.outcome == outcome).count()
    }
}

/// Output formats a report can be rendered to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    /// One aligned line per check, for operators.
    Human,
    /// Stable pretty-printed JSON, for automation.
    Structured,
}

impl FromStr for ReportFormat {
    type Err = ValidateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "human" => Ok(ReportFormat::Human),
            "json" | "structured" => Ok(ReportFormat::Structured),
            other => Err(ValidateError::invalid_options(format!(
                "unknown report format: {}",
                other
            ))),
        }
    }
}

/// Renders a report. Pure projection: same report and format always yield
/// the same text.
pub fn render(report: &ValidationReport, format: ReportFormat) -> ValidateResult<String> {
    match format {
        ReportFormat::Structured => Ok(serde_json::to_string_pretty(report)?),
        ReportFormat::Human => Ok(render_human(report)),
    }
}

fn render_human(report: &ValidationReport) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "Validation report - area {} ({})\n\n",
        report.area,
        report.timestamp.to_rfc3339()
    ));

    for result in &report.results {
        out.push_str(&format!(
            "{:<6} {:<28} {}\n",
            result.outcome.label(),
            result.id,
            result.detail.as_deref().unwrap_or("")
        ));
    }

    let passed = report.count(CheckOutcome::Pass);
    out.push_str(&format!(
        "\n{}/{} checks passed ({} failed, {} skipped, {} errored)\n",
        passed,
        report.results.len(),
        report.count(CheckOutcome::Fail),
        report.count(CheckOutcome::Skipped),
        report.count(CheckOutcome::Error),
    ));
    out
}
