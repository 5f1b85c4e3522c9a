//! Validation orchestrator.
//!
//! Owns the check registry and drives one validation pass: validate inputs,
//! fetch every required module's state once, evaluate every applicable
//! check in registration order, assemble the report. Each run owns its own
//! state set and report; concurrent runs share nothing.

use crate::checks::{default_checks, run_check, Check};
use crate::client::{ClientAdapter, ModuleClient};
use crate::error::ValidateResult;
use crate::fetcher::StateFetcher;
use crate::options::ValidateOptions;
use crate::report::{CheckOutcome, ValidationReport};
use lsrd_types::{Area, ModuleKind};
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{info, instrument};

/// The validation engine: a client seam plus a fixed check battery.
pub struct Validator {
    fetcher: StateFetcher,
    checks: Vec<Box<dyn Check>>,
}

impl Validator {
    /// Creates a validator with the default check battery.
    pub fn new(client: Arc<dyn ModuleClient>) -> Self {
        Self::with_checks(client, default_checks())
    }

    /// Creates a validator with an explicit check battery; registration
    /// order becomes report order.
    pub fn with_checks(client: Arc<dyn ModuleClient>, checks: Vec<Box<dyn Check>>) -> Self {
        Self {
            fetcher: StateFetcher::new(ClientAdapter::new(client)),
            checks,
        }
    }

    /// Runs one validation pass over `area`.
    ///
    /// Invalid input is rejected here, before any fetch. After that the
    /// run always completes with a full report: fetch failures surface as
    /// `Skipped` results, never as errors from this function.
    #[instrument(skip(self, options), fields(area = %area))]
    pub async fn run(&self, area: &str, options: &ValidateOptions) -> ValidateResult<ValidationReport> {
        let area = Area::new(area)?;
        options.validate()?;

        // A check is applicable iff every module it needs is in the filter.
        let applicable: Vec<&dyn Check> = self
            .checks
            .iter()
            .map(|c| c.as_ref())
            .filter(|c| match &options.module_filter {
                Some(filter) => c.required_modules().iter().all(|m| filter.contains(m)),
                None => true,
            })
            .collect();

        let required: BTreeSet<ModuleKind> = applicable
            .iter()
            .flat_map(|c| c.required_modules().iter().copied())
            .collect();

        info!(
            checks = applicable.len(),
            modules = required.len(),
            "starting validation run"
        );

        let states = self
            .fetcher
            .fetch_all(&area, &required, options.fetch_timeout)
            .await;

        let mut results = Vec::with_capacity(applicable.len());
        for check in &applicable {
            let mut result = run_check(*check, &states);
            if options.suppress_detail && result.outcome == CheckOutcome::Pass {
                result.detail = None;
            }
            results.push(result);
        }

        let report = ValidationReport::new(area, results);
        info!(overall_pass = report.overall_pass, "validation run complete");
        Ok(report)
    }
}
