//! Agreement between neighbor discovery and the link monitor.

use super::{discovery_snapshot, link_monitor_snapshot, Check, CheckError, Verdict};
use crate::state::StateSet;
use lsrd_types::ModuleKind;
use std::collections::BTreeSet;

/// Every established discovered neighbor must be held as a link by the
/// link monitor, and every held link must correspond to a neighbor
/// discovery knows about (otherwise the adjacency is stale).
pub struct DiscoveryLinkAgreement;

impl Check for DiscoveryLinkAgreement {
    fn id(&self) -> &'static str {
        "discovery-link-agreement"
    }

    fn required_modules(&self) -> &'static [ModuleKind] {
        &[ModuleKind::Discovery, ModuleKind::LinkMonitor]
    }

    fn evaluate(&self, states: &StateSet) -> Result<Verdict, CheckError> {
        let discovery = discovery_snapshot(states)?;
        let lm = link_monitor_snapshot(states)?;

        let mut findings = Vec::new();
        if discovery.node != lm.node {
            findings.push(format!(
                "local node name disagrees: discovery reports {}, link-monitor reports {}",
                discovery.node, lm.node
            ));
        }

        // Neighbor identity here is (node, local interface); the remote
        // interface is only learned once the adjacency forms.
        let discovered: BTreeSet<(&str, &str)> = discovery
            .neighbors
            .iter()
            .map(|n| (n.node.as_str(), n.local_interface.as_str()))
            .collect();
        let established: BTreeSet<(&str, &str)> = discovery
            .neighbors
            .iter()
            .filter(|n| n.established)
            .map(|n| (n.node.as_str(), n.local_interface.as_str()))
            .collect();
        let held: BTreeSet<(&str, &str)> = lm
            .links
            .iter()
            .map(|l| (l.neighbor_node.as_str(), l.local_interface.as_str()))
            .collect();

        for &(node, interface) in &established {
            if !held.contains(&(node, interface)) {
                findings.push(format!(
                    "neighbor {} on {} established in discovery but not held by link-monitor",
                    node, interface
                ));
            }
        }
        for &(node, interface) in &held {
            if !discovered.contains(&(node, interface)) {
                findings.push(format!(
                    "link to {} on {} held by link-monitor but unknown to discovery (stale adjacency)",
                    node, interface
                ));
            }
        }

        Ok(Verdict::from_findings(
            findings,
            format!(
                "{} established neighbors agree with link-monitor",
                established.len()
            ),
        ))
    }
}
