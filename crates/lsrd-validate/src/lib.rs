//! Cross-module consistency validator for the lsrd link-state routing suite.
//!
//! The lsrd daemons (discovery, link monitor, topology store, decision,
//! fib, prefix manager) each maintain their own view of the network and
//! update asynchronously, so their views can diverge. This crate queries
//! every module's live state in parallel, tolerates partial unavailability,
//! evaluates a fixed battery of cross-module invariants, and emits a
//! deterministic report.
//!
//! One pass flows: [`Validator::run`] → [`StateFetcher`] → parallel
//! [`ModuleClient`] calls → [`checks`] over the collected state →
//! [`ValidationReport`] → [`render`].
//!
//! A failed or slow module never fails the run: its checks come back
//! `Skipped`, which operators read as "couldn't check", distinct from
//! `Fail` ("inconsistent").

pub mod checks;
mod client;
mod error;
mod fetcher;
mod options;
mod orchestrator;
mod report;
mod state;

pub use client::{ClientAdapter, FetchError, ModuleClient, TcpModuleClient, CTRL_PORT_BASE};
pub use error::{ValidateError, ValidateResult};
pub use fetcher::StateFetcher;
pub use options::{ValidateOptions, DEFAULT_FETCH_TIMEOUT, MAX_FETCH_TIMEOUT};
pub use orchestrator::Validator;
pub use report::{render, CheckOutcome, CheckResult, ReportFormat, ValidationReport};
pub use state::{FetchStatus, ModuleState, StateSet};
