//! Validation run options.
//!
//! Every recognized option lives here with an explicit default, and the
//! whole structure is validated once at the boundary before a run starts.

use crate::error::{ValidateError, ValidateResult};
use lsrd_types::ModuleKind;
use std::collections::BTreeSet;
use std::time::Duration;

/// Default per-module fetch timeout.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_millis(2000);

/// Upper bound on the per-module fetch timeout; anything longer is a
/// configuration mistake, not patience.
pub const MAX_FETCH_TIMEOUT: Duration = Duration::from_secs(60);

/// Options for a single validation run.
#[derive(Debug, Clone)]
pub struct ValidateOptions {
    /// Per-module fetch timeout.
    pub fetch_timeout: Duration,
    /// Drop the summary detail on passing checks to shrink output.
    pub suppress_detail: bool,
    /// If set, only checks whose required modules are all in this set run.
    pub module_filter: Option<BTreeSet<ModuleKind>>,
}

impl Default for ValidateOptions {
    fn default() -> Self {
        Self {
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
            suppress_detail: false,
            module_filter: None,
        }
    }
}

impl ValidateOptions {
    /// Validates the option set; called once before any fetch.
    pub fn validate(&self) -> ValidateResult<()> {
        if self.fetch_timeout.is_zero() {
            return Err(ValidateError::invalid_options("fetch timeout must be non-zero"));
        }
        if self.fetch_timeout > MAX_FETCH_TIMEOUT {
            return Err(ValidateError::invalid_options(format!(
                "fetch timeout {}ms exceeds maximum {}ms",
                self.fetch_timeout.as_millis(),
                MAX_FETCH_TIMEOUT.as_millis()
            )));
        }
        if let Some(filter) = &self.module_filter {
            if filter.is_empty() {
                return Err(ValidateError::invalid_options(
                    "module filter must name at least one module",
                ));
            }
        }
        Ok(())
    }
}
