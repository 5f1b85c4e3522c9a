//! Per-module state snapshots.
//!
//! Each lsrd module exposes one immutable snapshot shape over its control
//! endpoint. The set is closed: [`ModuleSnapshot`] is a tagged enum with one
//! variant per [`ModuleKind`], so consumers pattern-match instead of probing
//! fields.

use crate::{ModuleKind, NextHop, RoutePrefix};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Build and protocol version reported by every module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionInfo {
    /// Protocol version this module is running.
    pub version: u32,
    /// Lowest protocol version this module can interoperate with.
    pub lowest_supported: u32,
    /// Human-readable build/release string.
    pub release: String,
}

impl VersionInfo {
    /// Creates a new version record.
    pub fn new(version: u32, lowest_supported: u32, release: impl Into<String>) -> Self {
        Self {
            version,
            lowest_supported,
            release: release.into(),
        }
    }
}

/// A neighbor as seen by the discovery module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscoveredNeighbor {
    /// Remote node name.
    pub node: String,
    /// Local interface the neighbor was heard on.
    pub local_interface: String,
    /// True once the hello exchange has converged.
    pub established: bool,
}

/// One maintained adjacency: who, over which interface pair, at what cost.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkEntry {
    /// Remote node name.
    pub neighbor_node: String,
    /// Local interface of the adjacency.
    pub local_interface: String,
    /// Remote interface of the adjacency.
    pub remote_interface: String,
    /// Link metric (cost).
    pub metric: u32,
}

/// One computed or programmed route: a prefix and its next-hop set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteEntry {
    /// Destination prefix.
    pub prefix: RoutePrefix,
    /// Next-hops, compared as a set (order never matters).
    pub next_hops: BTreeSet<NextHop>,
}

/// One prefix origination as held by the prefix manager.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrefixAdvertisement {
    /// Advertised prefix.
    pub prefix: RoutePrefix,
    /// Node originating the advertisement.
    pub originator: String,
    /// True if the prefix has been withdrawn (must no longer be reachable).
    pub withdrawn: bool,
}

/// Discovery module state: neighbors heard on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscoverySnapshot {
    pub version: VersionInfo,
    /// Local node name.
    pub node: String,
    pub neighbors: Vec<DiscoveredNeighbor>,
}

/// Link monitor state: adjacencies currently held up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkMonitorSnapshot {
    pub version: VersionInfo,
    /// Local node name.
    pub node: String,
    pub links: Vec<LinkEntry>,
}

/// Topology store state: the published adjacency database, keyed by node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopologySnapshot {
    pub version: VersionInfo,
    pub adjacencies: BTreeMap<String, Vec<LinkEntry>>,
}

/// Decision module state: the computed best-route table (RIB).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionSnapshot {
    pub version: VersionInfo,
    pub routes: Vec<RouteEntry>,
}

/// FIB module state: routes actually programmed into the forwarding plane.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FibSnapshot {
    pub version: VersionInfo,
    pub routes: Vec<RouteEntry>,
}

/// Prefix manager state: advertised and withdrawn prefixes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrefixManagerSnapshot {
    pub version: VersionInfo,
    pub advertisements: Vec<PrefixAdvertisement>,
}

/// One point-in-time capture of a single module's externally-observable
/// state. Tagged by module so the wire form is self-describing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "module", rename_all = "snake_case")]
pub enum ModuleSnapshot {
    Discovery(DiscoverySnapshot),
    LinkMonitor(LinkMonitorSnapshot),
    TopologyStore(TopologySnapshot),
    Decision(DecisionSnapshot),
    Fib(FibSnapshot),
    PrefixManager(PrefixManagerSnapshot),
}

impl ModuleSnapshot {
    /// Returns which module this snapshot belongs to.
    pub const fn kind(&self) -> ModuleKind {
        match self {
            ModuleSnapshot::Discovery(_) => ModuleKind::Discovery,
            ModuleSnapshot::LinkMonitor(_) => ModuleKind::LinkMonitor,
            ModuleSnapshot::TopologyStore(_) => ModuleKind::TopologyStore,
            ModuleSnapshot::Decision(_) => ModuleKind::Decision,
            ModuleSnapshot::Fib(_) => ModuleKind::Fib,
            ModuleSnapshot::PrefixManager(_) => ModuleKind::PrefixManager,
        }
    }

    /// Returns the version record every module carries.
    pub const fn version(&self) -> &VersionInfo {
        match self {
            ModuleSnapshot::Discovery(s) => &s.version,
            ModuleSnapshot::LinkMonitor(s) => &s.version,
            ModuleSnapshot::TopologyStore(s) => &s.version,
            ModuleSnapshot::Decision(s) => &s.version,
            ModuleSnapshot::Fib(s) => &s.version,
            ModuleSnapshot::PrefixManager(s) => &s.version,
        }
    }
}
