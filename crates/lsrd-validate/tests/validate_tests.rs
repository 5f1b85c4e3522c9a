//! End-to-end validation runs against a programmable mock module suite.

use async_trait::async_trait;
use lsrd_types::{
    Area, DecisionSnapshot, DiscoveredNeighbor, DiscoverySnapshot, FibSnapshot, LinkEntry,
    LinkMonitorSnapshot, ModuleKind, ModuleSnapshot, NextHop, PrefixAdvertisement,
    PrefixManagerSnapshot, RouteEntry, TopologySnapshot, VersionInfo,
};
use lsrd_validate::{
    render, CheckOutcome, FetchError, ModuleClient, ReportFormat, ValidateOptions,
    ValidationReport, Validator,
};
use pretty_assertions::assert_eq;
use std::collections::BTreeMap;
use std::io;
use std::sync::Arc;
use std::time::Duration;

/// How the mock suite answers one module's fetch.
enum Behavior {
    Snapshot(ModuleSnapshot),
    Unreachable,
    Hang,
}

struct MockSuite {
    behaviors: BTreeMap<ModuleKind, Behavior>,
}

impl MockSuite {
    fn healthy() -> Self {
        Self {
            behaviors: healthy_snapshots()
                .into_iter()
                .map(|s| (s.kind(), Behavior::Snapshot(s)))
                .collect(),
        }
    }

    fn with(mut self, behavior_for: ModuleKind, behavior: Behavior) -> Self {
        self.behaviors.insert(behavior_for, behavior);
        self
    }

    fn with_snapshot(self, snapshot: ModuleSnapshot) -> Self {
        let kind = snapshot.kind();
        self.with(kind, Behavior::Snapshot(snapshot))
    }

    fn validator(self) -> Validator {
        Validator::new(Arc::new(self))
    }
}

#[async_trait]
impl ModuleClient for MockSuite {
    async fn fetch(&self, module: ModuleKind, _area: &Area) -> Result<ModuleSnapshot, FetchError> {
        match self.behaviors.get(&module) {
            Some(Behavior::Snapshot(snapshot)) => Ok(snapshot.clone()),
            Some(Behavior::Unreachable) | None => Err(FetchError::Unreachable(io::Error::from(
                io::ErrorKind::ConnectionRefused,
            ))),
            Some(Behavior::Hang) => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                unreachable!("sleep outlives every test timeout")
            }
        }
    }
}

fn version() -> VersionInfo {
    VersionInfo::new(3, 2, "lsrd-test")
}

fn next_hop() -> NextHop {
    NextHop::new("eth1", "10.0.0.1".parse().unwrap())
}

fn route() -> RouteEntry {
    RouteEntry {
        prefix: "10.0.0.0/24".parse().unwrap(),
        next_hops: [next_hop()].into_iter().collect(),
    }
}

fn adjacency(metric: u32) -> LinkEntry {
    LinkEntry {
        neighbor_node: "nodeB".to_string(),
        local_interface: "eth0".to_string(),
        remote_interface: "eth3".to_string(),
        metric,
    }
}

/// A small consistent suite: nodeA adjacent to nodeB, one advertised and
/// programmed prefix, uniform protocol versions.
fn healthy_snapshots() -> Vec<ModuleSnapshot> {
    vec![
        ModuleSnapshot::Discovery(DiscoverySnapshot {
            version: version(),
            node: "nodeA".to_string(),
            neighbors: vec![DiscoveredNeighbor {
                node: "nodeB".to_string(),
                local_interface: "eth0".to_string(),
                established: true,
            }],
        }),
        ModuleSnapshot::LinkMonitor(LinkMonitorSnapshot {
            version: version(),
            node: "nodeA".to_string(),
            links: vec![adjacency(10)],
        }),
        ModuleSnapshot::TopologyStore(TopologySnapshot {
            version: version(),
            adjacencies: [("nodeA".to_string(), vec![adjacency(10)])]
                .into_iter()
                .collect(),
        }),
        ModuleSnapshot::Decision(DecisionSnapshot {
            version: version(),
            routes: vec![route()],
        }),
        ModuleSnapshot::Fib(FibSnapshot {
            version: version(),
            routes: vec![route()],
        }),
        ModuleSnapshot::PrefixManager(PrefixManagerSnapshot {
            version: version(),
            advertisements: vec![PrefixAdvertisement {
                prefix: "10.0.0.0/24".parse().unwrap(),
                originator: "nodeA".to_string(),
                withdrawn: false,
            }],
        }),
    ]
}

fn outcome_of<'a>(report: &'a ValidationReport, id: &str) -> &'a CheckOutcome {
    &report
        .results
        .iter()
        .find(|r| r.id == id)
        .unwrap_or_else(|| panic!("no result for {}", id))
        .outcome
}

fn fast_options() -> ValidateOptions {
    ValidateOptions {
        fetch_timeout: Duration::from_millis(200),
        ..Default::default()
    }
}

#[tokio::test]
async fn healthy_suite_passes_every_check() {
    let report = MockSuite::healthy()
        .validator()
        .run("area0", &ValidateOptions::default())
        .await
        .unwrap();

    assert!(report.overall_pass);
    assert!(report.passed(true));
    let ids: Vec<_> = report.results.iter().map(|r| r.id.as_str()).collect();
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
    for result in &report.results {
        assert_eq!(result.outcome, CheckOutcome::Pass, "{} not Pass", result.id);
    }
}

#[tokio::test]
async fn metric_divergence_fails_adjacency_symmetry_with_named_entities() {
    let suite = MockSuite::healthy().with_snapshot(ModuleSnapshot::TopologyStore(
        TopologySnapshot {
            version: version(),
            adjacencies: [("nodeA".to_string(), vec![adjacency(20)])]
                .into_iter()
                .collect(),
        },
    ));

    let report = suite
        .validator()
        .run("area0", &ValidateOptions::default())
        .await
        .unwrap();

    assert!(!report.overall_pass);
    assert_eq!(*outcome_of(&report, "adjacency-symmetry"), CheckOutcome::Fail);

    let detail = report
        .results
        .iter()
        .find(|r| r.id == "adjacency-symmetry")
        .unwrap()
        .detail
        .clone()
        .unwrap();
    assert!(detail.contains("nodeB"), "detail: {}", detail);
    assert!(detail.contains("eth0"), "detail: {}", detail);
    assert!(
        detail.contains("link-monitor 10 vs topology-store 20"),
        "detail: {}",
        detail
    );

    // Everything else still ran and passed.
    assert_eq!(
        *outcome_of(&report, "reachability-consistency"),
        CheckOutcome::Pass
    );
}

#[tokio::test]
async fn unprogrammed_prefix_fails_reachability_naming_the_prefix() {
    let suite = MockSuite::healthy().with_snapshot(ModuleSnapshot::Fib(FibSnapshot {
        version: version(),
        routes: vec![],
    }));

    let report = suite
        .validator()
        .run("area0", &ValidateOptions::default())
        .await
        .unwrap();

    assert_eq!(
        *outcome_of(&report, "reachability-consistency"),
        CheckOutcome::Fail
    );
    let detail = report
        .results
        .iter()
        .find(|r| r.id == "reachability-consistency")
        .unwrap()
        .detail
        .clone()
        .unwrap();
    assert!(detail.contains("10.0.0.0/24"), "detail: {}", detail);
}

#[tokio::test]
async fn fib_timeout_skips_dependent_checks_and_runs_the_rest() {
    let suite = MockSuite::healthy().with(ModuleKind::Fib, Behavior::Hang);

    let report = suite
        .validator()
        .run("area0", &fast_options())
        .await
        .unwrap();

    // Checks needing fib cannot be evaluated on absent data.
    assert_eq!(
        *outcome_of(&report, "reachability-consistency"),
        CheckOutcome::Skipped
    );
    assert_eq!(
        *outcome_of(&report, "version-compatibility"),
        CheckOutcome::Skipped
    );

    // Checks not needing fib evaluate normally.
    assert_eq!(*outcome_of(&report, "adjacency-symmetry"), CheckOutcome::Pass);
    assert_eq!(
        *outcome_of(&report, "advertisement-consistency"),
        CheckOutcome::Pass
    );
    assert_eq!(
        *outcome_of(&report, "discovery-link-agreement"),
        CheckOutcome::Pass
    );

    // Skipped never counts as pass, but only strict policy fails the run.
    assert!(!report.overall_pass);
    assert!(report.passed(false));
    assert!(!report.passed(true));

    let detail = report
        .results
        .iter()
        .find(|r| r.id == "reachability-consistency")
        .unwrap()
        .detail
        .clone()
        .unwrap();
    assert!(detail.contains("fib"), "detail: {}", detail);
    assert!(detail.contains("timeout"), "detail: {}", detail);
}

#[tokio::test]
async fn unreachable_module_is_reported_distinctly_from_timeout() {
    let suite = MockSuite::healthy().with(ModuleKind::TopologyStore, Behavior::Unreachable);

    let report = suite
        .validator()
        .run("area0", &fast_options())
        .await
        .unwrap();

    assert_eq!(*outcome_of(&report, "adjacency-symmetry"), CheckOutcome::Skipped);
    let detail = report
        .results
        .iter()
        .find(|r| r.id == "adjacency-symmetry")
        .unwrap()
        .detail
        .clone()
        .unwrap();
    assert!(detail.contains("unreachable"), "detail: {}", detail);
}

#[tokio::test]
async fn identical_snapshots_yield_identical_results() {
    let first = MockSuite::healthy()
        .validator()
        .run("area0", &ValidateOptions::default())
        .await
        .unwrap();
    let second = MockSuite::healthy()
        .validator()
        .run("area0", &ValidateOptions::default())
        .await
        .unwrap();

    // Timestamps differ between runs; the evaluated results must not.
    assert_eq!(first.results, second.results);
    assert_eq!(first.overall_pass, second.overall_pass);
}

#[tokio::test]
async fn structured_report_round_trips() {
    let report = MockSuite::healthy()
        .with(ModuleKind::Fib, Behavior::Unreachable)
        .validator()
        .run("area0", &ValidateOptions::default())
        .await
        .unwrap();

    let text = render(&report, ReportFormat::Structured).unwrap();
    let parsed: ValidationReport = serde_json::from_str(&text).unwrap();
    assert_eq!(parsed, report);

    // Rendering is a pure projection.
    assert_eq!(text, render(&report, ReportFormat::Structured).unwrap());
}

#[tokio::test]
async fn human_report_has_one_line_per_check() {
    let report = MockSuite::healthy()
        .validator()
        .run("area0", &ValidateOptions::default())
        .await
        .unwrap();

    let text = render(&report, ReportFormat::Human).unwrap();
    for result in &report.results {
        assert!(text.contains(&result.id), "missing {} in:\n{}", result.id, text);
    }
    assert!(text.contains("5/5 checks passed"));
}

#[tokio::test]
async fn withdrawn_prefix_still_reachable_fails_advertisement_check() {
    let suite = MockSuite::healthy().with_snapshot(ModuleSnapshot::PrefixManager(
        PrefixManagerSnapshot {
            version: version(),
            advertisements: vec![PrefixAdvertisement {
                prefix: "10.0.0.0/24".parse().unwrap(),
                originator: "nodeA".to_string(),
                withdrawn: true,
            }],
        },
    ));

    let report = suite
        .validator()
        .run("area0", &ValidateOptions::default())
        .await
        .unwrap();

    assert_eq!(
        *outcome_of(&report, "advertisement-consistency"),
        CheckOutcome::Fail
    );
    let detail = report
        .results
        .iter()
        .find(|r| r.id == "advertisement-consistency")
        .unwrap()
        .detail
        .clone()
        .unwrap();
    assert!(detail.contains("expected absent"), "detail: {}", detail);
}

#[tokio::test]
async fn version_skew_fails_version_compatibility() {
    let suite = MockSuite::healthy().with_snapshot(ModuleSnapshot::Fib(FibSnapshot {
        version: VersionInfo::new(1, 1, "lsrd-old"),
        routes: vec![route()],
    }));

    let report = suite
        .validator()
        .run("area0", &ValidateOptions::default())
        .await
        .unwrap();

    assert_eq!(
        *outcome_of(&report, "version-compatibility"),
        CheckOutcome::Fail
    );
    let detail = report
        .results
        .iter()
        .find(|r| r.id == "version-compatibility")
        .unwrap()
        .detail
        .clone()
        .unwrap();
    assert!(detail.contains("fib (version 1)"), "detail: {}", detail);
}
