//! Adjacency symmetry between the link monitor and the topology store.

use super::{link_monitor_snapshot, topology_snapshot, Check, CheckError, Verdict};
use crate::state::StateSet;
use lsrd_types::{LinkEntry, ModuleKind};
use std::collections::BTreeMap;

/// Every adjacency the link monitor holds up must be published, with the
/// same interface pair and metric, in the topology store's database for the
/// local node, and vice versa.
pub struct AdjacencySymmetry;

/// Adjacency identity: neighbor plus interface pair. Metric is the compared
/// payload, not part of the identity.
type AdjKey = (String, String, String);

fn adjacency_map(
    module: ModuleKind,
    links: &[LinkEntry],
) -> Result<BTreeMap<AdjKey, u32>, CheckError> {
    let mut map = BTreeMap::new();
    for link in links {
        let key = (
            link.neighbor_node.clone(),
            link.local_interface.clone(),
            link.remote_interface.clone(),
        );
        if let Some(&previous) = map.get(&key) {
            if previous != link.metric {
                return Err(CheckError::malformed(
                    module,
                    format!(
                        "duplicate adjacency to {} over {}/{} with conflicting metrics {} and {}",
                        link.neighbor_node,
                        link.local_interface,
                        link.remote_interface,
                        previous,
                        link.metric
                    ),
                ));
            }
        }
        map.insert(key, link.metric);
    }
    Ok(map)
}

impl Check for AdjacencySymmetry {
    fn id(&self) -> &'static str {
        "adjacency-symmetry"
    }

    fn required_modules(&self) -> &'static [ModuleKind] {
        &[ModuleKind::LinkMonitor, ModuleKind::TopologyStore]
    }

    fn evaluate(&self, states: &StateSet) -> Result<Verdict, CheckError> {
        let lm = link_monitor_snapshot(states)?;
        let topo = topology_snapshot(states)?;

        let held = adjacency_map(ModuleKind::LinkMonitor, &lm.links)?;
        let published = match topo.adjacencies.get(&lm.node) {
            Some(links) => adjacency_map(ModuleKind::TopologyStore, links)?,
            None if held.is_empty() => BTreeMap::new(),
            None => {
                return Ok(Verdict::from_findings(
                    vec![format!(
                        "topology-store has no adjacency database entry for local node {}",
                        lm.node
                    )],
                    String::new(),
                ))
            }
        };

        let mut findings = Vec::new();
        for ((neighbor, local_if, remote_if), &metric) in &held {
            match published.get(&(neighbor.clone(), local_if.clone(), remote_if.clone())) {
                None => findings.push(format!(
                    "topology-store is missing adjacency to {} over {}/{} held by link-monitor",
                    neighbor, local_if, remote_if
                )),
                Some(&published_metric) if published_metric != metric => findings.push(format!(
                    "adjacency to {} over {}/{}: metric mismatch, link-monitor {} vs topology-store {}",
                    neighbor, local_if, remote_if, metric, published_metric
                )),
                Some(_) => {}
            }
        }
        for (neighbor, local_if, remote_if) in published.keys() {
            if !held.contains_key(&(neighbor.clone(), local_if.clone(), remote_if.clone())) {
                findings.push(format!(
                    "link-monitor is missing adjacency to {} over {}/{} published by topology-store",
                    neighbor, local_if, remote_if
                ));
            }
        }

        Ok(Verdict::from_findings(
            findings,
            format!(
                "{} adjacencies consistent for node {}",
                held.len(),
                lm.node
            ),
        ))
    }
}
