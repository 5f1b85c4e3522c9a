//! Reachability consistency between the computed RIB and the programmed FIB.

use super::{decision_snapshot, fib_snapshot, Check, CheckError, Verdict};
use crate::state::StateSet;
use itertools::Itertools;
use lsrd_types::{ModuleKind, NextHop, RouteEntry, RoutePrefix};
use std::collections::{BTreeMap, BTreeSet};

/// Every destination prefix the decision module computed must be programmed
/// in the FIB with an equivalent next-hop set, and the FIB must not carry
/// prefixes the decision module no longer computes.
pub struct ReachabilityConsistency;

fn route_map(
    module: ModuleKind,
    routes: &[RouteEntry],
) -> Result<BTreeMap<RoutePrefix, &BTreeSet<NextHop>>, CheckError> {
    let mut map: BTreeMap<RoutePrefix, &BTreeSet<NextHop>> = BTreeMap::new();
    for route in routes {
        if let Some(existing) = map.get(&route.prefix) {
            if **existing != route.next_hops {
                return Err(CheckError::malformed(
                    module,
                    format!(
                        "duplicate route entries for prefix {} with conflicting next-hop sets",
                        route.prefix
                    ),
                ));
            }
        }
        map.insert(route.prefix, &route.next_hops);
    }
    Ok(map)
}

fn render_next_hops(next_hops: &BTreeSet<NextHop>) -> String {
    format!("[{}]", next_hops.iter().join(", "))
}

impl Check for ReachabilityConsistency {
    fn id(&self) -> &'static str {
        "reachability-consistency"
    }

    fn required_modules(&self) -> &'static [ModuleKind] {
        &[ModuleKind::Decision, ModuleKind::Fib]
    }

    fn evaluate(&self, states: &StateSet) -> Result<Verdict, CheckError> {
        let decision = decision_snapshot(states)?;
        let fib = fib_snapshot(states)?;

        let computed = route_map(ModuleKind::Decision, &decision.routes)?;
        let programmed = route_map(ModuleKind::Fib, &fib.routes)?;

        let mut findings = Vec::new();
        for (prefix, rib_next_hops) in &computed {
            match programmed.get(prefix) {
                None => findings.push(format!(
                    "prefix {} computed by decision but not programmed in fib",
                    prefix
                )),
                Some(fib_next_hops) if fib_next_hops != rib_next_hops => {
                    findings.push(format!(
                        "prefix {}: next-hop mismatch, decision {} vs fib {}",
                        prefix,
                        render_next_hops(rib_next_hops),
                        render_next_hops(fib_next_hops)
                    ))
                }
                Some(_) => {}
            }
        }
        for prefix in programmed.keys() {
            if !computed.contains_key(prefix) {
                findings.push(format!(
                    "prefix {} programmed in fib but absent from decision",
                    prefix
                ));
            }
        }

        Ok(Verdict::from_findings(
            findings,
            format!(
                "{} prefixes consistent between decision and fib",
                computed.len()
            ),
        ))
    }
}
