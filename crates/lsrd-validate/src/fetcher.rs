//! Concurrent state fetch for one validation run.
//!
//! One task per module, one shared deadline. A module that fails or stalls
//! never fails the whole fetch; that is exactly the situation the invariant
//! checks must reason about, so the fetcher always returns one
//! [`ModuleState`] per requested module.

use crate::client::ClientAdapter;
use crate::state::{FetchStatus, ModuleState, StateSet};
use lsrd_types::{Area, ModuleKind};
use std::collections::BTreeSet;
use std::time::Duration;
use tokio::task::JoinSet;
use tokio::time::Instant;
use tracing::{debug, instrument, warn};

/// Wall-clock allowance beyond the per-call timeout for task scheduling and
/// result collection. Total fetch time is bounded by
/// `per_call_timeout + COLLECTION_GRACE`, not `N x timeout`.
const COLLECTION_GRACE: Duration = Duration::from_millis(250);

/// Issues adapter calls for a set of modules concurrently.
pub struct StateFetcher {
    adapter: ClientAdapter,
}

impl StateFetcher {
    /// Creates a fetcher over a client adapter.
    pub fn new(adapter: ClientAdapter) -> Self {
        Self { adapter }
    }

    /// Fetches every requested module's state in parallel.
    ///
    /// Guarantees exactly `modules.len()` entries in the returned set.
    /// Tasks still pending when the collection deadline expires are
    /// abandoned and recorded as [`FetchStatus::Timeout`]; the underlying
    /// remote call is only ignored, not cancelled at the transport level.
    #[instrument(skip(self, modules), fields(area = %area))]
    pub async fn fetch_all(
        &self,
        area: &Area,
        modules: &BTreeSet<ModuleKind>,
        per_call_timeout: Duration,
    ) -> StateSet {
        let mut tasks = JoinSet::new();
        for &module in modules {
            let adapter = self.adapter.clone();
            let area = area.clone();
            tasks.spawn(async move { adapter.fetch(module, area, per_call_timeout).await });
        }

        let deadline = Instant::now() + per_call_timeout + COLLECTION_GRACE;
        let mut states = StateSet::new();
        loop {
            match tokio::time::timeout_at(deadline, tasks.join_next()).await {
                Ok(Some(Ok(state))) => states.insert(state),
                Ok(Some(Err(join_err))) => {
                    // The fill loop below records the module it covered.
                    warn!(error = %join_err, "module fetch task failed to join");
                }
                Ok(None) => break,
                Err(_) => {
                    debug!("fetch collection deadline expired, abandoning pending tasks");
                    tasks.abort_all();
                    break;
                }
            }
        }

        // Complete the set: anything not collected counts as a timeout.
        for &module in modules {
            if states.get(module).is_none() {
                states.insert(ModuleState::failed(
                    module,
                    area.clone(),
                    FetchStatus::Timeout,
                    per_call_timeout,
                ));
            }
        }

        debug_assert_eq!(states.len(), modules.len());
        states
    }
}
