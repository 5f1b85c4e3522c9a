//! Fetched module state for one validation run.

use chrono::{DateTime, Utc};
use lsrd_types::{Area, ModuleKind, ModuleSnapshot};
use serde::{Deserialize, Serialize};
use std::collections::{btree_map, BTreeMap};
use std::fmt;
use std::time::Duration;

/// How a single module fetch ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchStatus {
    /// Snapshot received and decoded.
    Ok,
    /// No response within the per-call timeout.
    Timeout,
    /// Connection could not be established.
    Unreachable,
    /// A response arrived but could not be decoded, or was for the wrong
    /// module.
    ProtocolError,
}

impl FetchStatus {
    /// Returns true if a snapshot was obtained.
    pub const fn is_ok(&self) -> bool {
        matches!(self, FetchStatus::Ok)
    }
}

impl fmt::Display for FetchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FetchStatus::Ok => "ok",
            FetchStatus::Timeout => "timeout",
            FetchStatus::Unreachable => "unreachable",
            FetchStatus::ProtocolError => "protocol error",
        };
        f.write_str(s)
    }
}

/// One module's fetched state within one run.
///
/// Invariant: `snapshot` is `Some` iff `status` is [`FetchStatus::Ok`].
/// Both constructors uphold it; there is no other way to build one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModuleState {
    /// Which module was queried.
    pub module: ModuleKind,
    /// Area the query was scoped to.
    pub area: Area,
    /// How the fetch ended.
    pub status: FetchStatus,
    /// The snapshot, present only on a successful fetch.
    pub snapshot: Option<ModuleSnapshot>,
    /// When the fetch completed (observability only).
    pub fetched_at: DateTime<Utc>,
    /// How long the fetch took (observability only).
    pub latency: Duration,
}

impl ModuleState {
    /// Builds the state for a successful fetch.
    pub fn ok(
        module: ModuleKind,
        area: Area,
        snapshot: ModuleSnapshot,
        latency: Duration,
    ) -> Self {
        Self {
            module,
            area,
            status: FetchStatus::Ok,
            snapshot: Some(snapshot),
            fetched_at: Utc::now(),
            latency,
        }
    }

    /// Builds the state for a failed fetch. `status` must not be `Ok`;
    /// a failed fetch has no snapshot by definition.
    pub fn failed(module: ModuleKind, area: Area, status: FetchStatus, latency: Duration) -> Self {
        debug_assert!(!status.is_ok());
        Self {
            module,
            area,
            status,
            snapshot: None,
            fetched_at: Utc::now(),
            latency,
        }
    }

    /// Returns true if this fetch produced a snapshot.
    pub fn is_ok(&self) -> bool {
        self.status.is_ok()
    }
}

/// The set of module states collected by one run: exactly one entry per
/// requested module, indexed by module identity.
#[derive(Debug, Clone, Default)]
pub struct StateSet {
    states: BTreeMap<ModuleKind, ModuleState>,
}

impl StateSet {
    /// Creates an empty state set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a module's state. Last write wins; the fetcher only ever
    /// writes each module once.
    pub fn insert(&mut self, state: ModuleState) {
        self.states.insert(state.module, state);
    }

    /// Returns the state for a module, if it was requested this run.
    pub fn get(&self, module: ModuleKind) -> Option<&ModuleState> {
        self.states.get(&module)
    }

    /// Returns a module's snapshot if its fetch succeeded.
    pub fn snapshot(&self, module: ModuleKind) -> Option<&ModuleSnapshot> {
        self.get(module).and_then(|s| s.snapshot.as_ref())
    }

    /// Number of module states collected.
    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// Returns true if no states were collected.
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Iterates states in canonical module order.
    pub fn iter(&self) -> btree_map::Values<'_, ModuleKind, ModuleState> {
        self.states.values()
    }
}
