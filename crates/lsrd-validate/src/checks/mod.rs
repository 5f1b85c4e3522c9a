//! Cross-module invariant checks.
//!
//! Each check is a pure function over the fetched [`StateSet`]: no network,
//! no clock, deterministic output for identical input. The runner in this
//! module owns the two policies every check shares:
//!
//! - **Skip rule**: a check whose required module state is not `Ok` is
//!   `Skipped`, never `Fail` — absent data cannot be inconsistent.
//! - **Error isolation**: a check raising on malformed-but-present data is
//!   reported as `Error` and never disturbs the other checks.

mod adjacency;
mod advertisement;
mod discovery;
mod reachability;
mod version;

pub use adjacency::AdjacencySymmetry;
pub use advertisement::AdvertisementConsistency;
pub use discovery::DiscoveryLinkAgreement;
pub use reachability::ReachabilityConsistency;
pub use version::VersionCompatibility;

use crate::report::{CheckOutcome, CheckResult};
use crate::state::StateSet;
use itertools::Itertools;
use lsrd_types::{
    DecisionSnapshot, DiscoverySnapshot, FibSnapshot, LinkMonitorSnapshot, ModuleKind,
    ModuleSnapshot, PrefixManagerSnapshot, TopologySnapshot,
};
use thiserror::Error;
use tracing::warn;

/// A check raising on malformed-but-present data.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckError {
    /// A snapshot was present but its content violates the module's own
    /// contract (e.g. conflicting duplicate entries).
    #[error("malformed {module} snapshot: {message}")]
    MalformedSnapshot {
        /// The module whose snapshot is malformed.
        module: ModuleKind,
        /// What the check found.
        message: String,
    },
}

impl CheckError {
    /// Creates a malformed-snapshot error.
    pub fn malformed(module: ModuleKind, message: impl Into<String>) -> Self {
        Self::MalformedSnapshot {
            module,
            message: message.into(),
        }
    }
}

/// What a check concluded when it could run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// Consistent; carries a one-line summary of what was compared.
    Pass {
        /// Summary, dropped under `suppress_detail`.
        summary: String,
    },
    /// Inconsistent; one finding per offending entity, sorted.
    Fail {
        /// Findings naming the mismatching entities.
        findings: Vec<String>,
    },
}

impl Verdict {
    /// Pass with a summary line.
    pub fn pass(summary: impl Into<String>) -> Self {
        Verdict::Pass {
            summary: summary.into(),
        }
    }

    /// Pass if `findings` is empty, otherwise Fail with the findings
    /// sorted for deterministic output.
    pub fn from_findings(findings: Vec<String>, summary: impl Into<String>) -> Self {
        if findings.is_empty() {
            Verdict::pass(summary)
        } else {
            let mut findings = findings;
            findings.sort();
            Verdict::Fail { findings }
        }
    }
}

/// One registered invariant check.
pub trait Check: Send + Sync {
    /// Stable identifier, used in reports and for filtering.
    fn id(&self) -> &'static str;

    /// Modules this check needs `Ok` state from.
    fn required_modules(&self) -> &'static [ModuleKind];

    /// Evaluates the invariant against a complete state set. Only called
    /// when every required module's state is `Ok`.
    fn evaluate(&self, states: &StateSet) -> Result<Verdict, CheckError>;
}

/// Runs one check under the shared skip/error policy.
pub fn run_check(check: &dyn Check, states: &StateSet) -> CheckResult {
    let unavailable: Vec<String> = check
        .required_modules()
        .iter()
        .filter(|&&module| !states.get(module).map(|s| s.is_ok()).unwrap_or(false))
        .map(|&module| match states.get(module) {
            Some(state) => format!("{} ({})", module, state.status),
            None => format!("{} (not fetched)", module),
        })
        .collect();

    let (outcome, detail) = if !unavailable.is_empty() {
        (
            CheckOutcome::Skipped,
            Some(format!(
                "required module state unavailable: {}",
                unavailable.iter().join(", ")
            )),
        )
    } else {
        match check.evaluate(states) {
            Ok(Verdict::Pass { summary }) => (CheckOutcome::Pass, Some(summary)),
            Ok(Verdict::Fail { findings }) => {
                (CheckOutcome::Fail, Some(findings.iter().join("; ")))
            }
            Err(err) => {
                warn!(check = check.id(), error = %err, "check raised on malformed data");
                (CheckOutcome::Error, Some(err.to_string()))
            }
        }
    };

    CheckResult {
        id: check.id().to_string(),
        required_modules: check.required_modules().to_vec(),
        outcome,
        detail,
    }
}

/// The full check battery, in registration order. Report ordering follows
/// this order, so it must stay stable across runs.
pub fn default_checks() -> Vec<Box<dyn Check>> {
    vec![
        Box::new(AdjacencySymmetry),
        Box::new(ReachabilityConsistency),
        Box::new(AdvertisementConsistency),
        Box::new(DiscoveryLinkAgreement),
        Box::new(VersionCompatibility),
    ]
}

macro_rules! snapshot_accessor {
    ($fn_name:ident, $variant:ident, $snapshot:ty) => {
        pub(crate) fn $fn_name(states: &StateSet) -> Result<&$snapshot, CheckError> {
            match states.snapshot(ModuleKind::$variant) {
                Some(ModuleSnapshot::$variant(snap)) => Ok(snap),
                Some(other) => Err(CheckError::malformed(
                    ModuleKind::$variant,
                    format!("snapshot variant is {}", other.kind()),
                )),
                None => Err(CheckError::malformed(
                    ModuleKind::$variant,
                    "snapshot absent despite Ok fetch status",
                )),
            }
        }
    };
}

snapshot_accessor!(discovery_snapshot, Discovery, DiscoverySnapshot);
snapshot_accessor!(link_monitor_snapshot, LinkMonitor, LinkMonitorSnapshot);
snapshot_accessor!(topology_snapshot, TopologyStore, TopologySnapshot);
snapshot_accessor!(decision_snapshot, Decision, DecisionSnapshot);
snapshot_accessor!(fib_snapshot, Fib, FibSnapshot);
snapshot_accessor!(prefix_manager_snapshot, PrefixManager, PrefixManagerSnapshot);


#[cfg(test)]
mod tests {
    use super::testutil::*;
    use super::*;
    use crate::state::FetchStatus;
    use lsrd_types::{FibSnapshot, LinkMonitorSnapshot};
    use pretty_assertions::assert_eq;

    struct AlwaysPass;

    impl Check for AlwaysPass {
        fn id(&self) -> &'static str {
            "always-pass"
        }

        fn required_modules(&self) -> &'static [ModuleKind] {
            &[ModuleKind::Fib]
        }

        fn evaluate(&self, _states: &StateSet) -> Result<Verdict, CheckError> {
            Ok(Verdict::pass("nothing to compare"))
        }
    }

    struct AlwaysRaises;

    impl Check for AlwaysRaises {
        fn id(&self) -> &'static str {
            "always-raises"
        }

        fn required_modules(&self) -> &'static [ModuleKind] {
            &[ModuleKind::Fib]
        }

        fn evaluate(&self, _states: &StateSet) -> Result<Verdict, CheckError> {
            Err(CheckError::malformed(ModuleKind::Fib, "boom"))
        }
    }

    fn fib_ok() -> StateSet {
        states_ok(vec![ModuleSnapshot::Fib(FibSnapshot {
            version: version(),
            routes: vec![],
        })])
    }

    #[test]
    fn test_run_check_pass_with_summary() {
        let result = run_check(&AlwaysPass, &fib_ok());
        assert_eq!(result.outcome, CheckOutcome::Pass);
        assert_eq!(result.detail.as_deref(), Some("nothing to compare"));
        assert_eq!(result.required_modules, vec![ModuleKind::Fib]);
    }

    #[test]
    fn test_run_check_skips_on_failed_module() {
        let states = with_failed(StateSet::new(), ModuleKind::Fib, FetchStatus::Timeout);
        let result = run_check(&AlwaysPass, &states);
        assert_eq!(result.outcome, CheckOutcome::Skipped);
        let detail = result.detail.unwrap();
        assert!(detail.contains("fib"));
        assert!(detail.contains("timeout"));
    }

    #[test]
    fn test_run_check_skips_on_missing_module() {
        let result = run_check(&AlwaysPass, &StateSet::new());
        assert_eq!(result.outcome, CheckOutcome::Skipped);
        assert!(result.detail.unwrap().contains("not fetched"));
    }

    #[test]
    fn test_run_check_isolates_check_errors() {
        let result = run_check(&AlwaysRaises, &fib_ok());
        assert_eq!(result.outcome, CheckOutcome::Error);
        assert!(result.detail.unwrap().contains("malformed fib snapshot"));
    }

    #[test]
    fn test_verdict_from_findings_sorts() {
        let verdict = Verdict::from_findings(
            vec!["zeta".to_string(), "alpha".to_string()],
            "unused",
        );
        assert_eq!(
            verdict,
            Verdict::Fail {
                findings: vec!["alpha".to_string(), "zeta".to_string()]
            }
        );
    }

    #[test]
    fn test_accessor_rejects_wrong_variant() {
        // A link-monitor snapshot filed under fib is a protocol bug the
        // accessor must surface, not silently accept.
        let mut states = StateSet::new();
        states.insert(crate::state::ModuleState {
            module: ModuleKind::Fib,
            area: area(),
            status: FetchStatus::Ok,
            snapshot: Some(ModuleSnapshot::LinkMonitor(LinkMonitorSnapshot {
                version: version(),
                node: "nodeA".to_string(),
                links: vec![],
            })),
            fetched_at: chrono::Utc::now(),
            latency: std::time::Duration::from_millis(1),
        });
        assert!(fib_snapshot(&states).is_err());
    }

    #[test]
    fn test_default_checks_registration_order() {
        let ids: Vec<_> = default_checks().iter().map(|c| c.id()).collect();
        assert_eq!(
            ids,
            vec![
                "adjacency-symmetry",
                "reachability-consistency",
                "advertisement-consistency",
                "discovery-link-agreement",
                "version-compatibility",
            ]
        );
    }
}
