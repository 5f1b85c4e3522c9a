//! Advertisement consistency between the prefix manager and the decision
//! module.

use super::{decision_snapshot, prefix_manager_snapshot, Check, CheckError, Verdict};
use crate::state::StateSet;
use lsrd_types::{ModuleKind, RoutePrefix};
use std::collections::{BTreeMap, BTreeSet};

/// Every prefix the prefix manager advertises must be reachable in the
/// decision module's table; a withdrawn prefix must not be.
pub struct AdvertisementConsistency;

impl Check for AdvertisementConsistency {
    fn id(&self) -> &'static str {
        "advertisement-consistency"
    }

    fn required_modules(&self) -> &'static [ModuleKind] {
        &[ModuleKind::PrefixManager, ModuleKind::Decision]
    }

    fn evaluate(&self, states: &StateSet) -> Result<Verdict, CheckError> {
        let prefix_mgr = prefix_manager_snapshot(states)?;
        let decision = decision_snapshot(states)?;

        let reachable: BTreeSet<RoutePrefix> =
            decision.routes.iter().map(|r| r.prefix).collect();

        // One advertisement per (prefix, originator); an entry both
        // advertised and withdrawn cannot be evaluated.
        let mut advertised: BTreeMap<(RoutePrefix, &str), bool> = BTreeMap::new();
        for adv in &prefix_mgr.advertisements {
            let key = (adv.prefix, adv.originator.as_str());
            if let Some(&withdrawn) = advertised.get(&key) {
                if withdrawn != adv.withdrawn {
                    return Err(CheckError::malformed(
                        ModuleKind::PrefixManager,
                        format!(
                            "prefix {} from {} is recorded as both advertised and withdrawn",
                            adv.prefix, adv.originator
                        ),
                    ));
                }
            }
            advertised.insert(key, adv.withdrawn);
        }

        let mut findings = Vec::new();
        for (&(prefix, originator), &withdrawn) in &advertised {
            let is_reachable = reachable.contains(&prefix);
            if withdrawn && is_reachable {
                findings.push(format!(
                    "prefix {} withdrawn by {} but still reachable in decision, expected absent",
                    prefix, originator
                ));
            } else if !withdrawn && !is_reachable {
                findings.push(format!(
                    "prefix {} advertised by {} but not reachable in decision, expected present",
                    prefix, originator
                ));
            }
        }

        Ok(Verdict::from_findings(
            findings,
            format!(
                "{} advertisements consistent with decision",
                advertised.len()
            ),
        ))
    }
}
