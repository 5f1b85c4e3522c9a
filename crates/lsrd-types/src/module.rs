//! Module and area identities.

use crate::ParseError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The closed set of lsrd daemon modules a validator can query.
///
/// Ordering is the canonical module order; sets of modules render
/// deterministically because of it.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum ModuleKind {
    /// Neighbor discovery (hello protocol).
    Discovery,
    /// Link/interface monitoring.
    LinkMonitor,
    /// Distributed topology database.
    TopologyStore,
    /// Shortest-path computation (RIB).
    Decision,
    /// Forwarding table programming (FIB).
    Fib,
    /// Prefix origination and withdrawal.
    PrefixManager,
}

impl ModuleKind {
    /// Every module, in canonical order.
    pub const ALL: [ModuleKind; 6] = [
        ModuleKind::Discovery,
        ModuleKind::LinkMonitor,
        ModuleKind::TopologyStore,
        ModuleKind::Decision,
        ModuleKind::Fib,
        ModuleKind::PrefixManager,
    ];

    /// Stable kebab-case name, used in CLI flags and report output.
    pub const fn name(&self) -> &'static str {
        match self {
            ModuleKind::Discovery => "discovery",
            ModuleKind::LinkMonitor => "link-monitor",
            ModuleKind::TopologyStore => "topology-store",
            ModuleKind::Decision => "decision",
            ModuleKind::Fib => "fib",
            ModuleKind::PrefixManager => "prefix-manager",
        }
    }
}

impl fmt::Display for ModuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ModuleKind {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ModuleKind::ALL
            .iter()
            .find(|m| m.name() == s)
            .copied()
            .ok_or_else(|| ParseError::UnknownModule(s.to_string()))
    }
}

/// A routing area identifier.
///
/// Areas partition the topology; state is never compared across areas.
/// Identifiers are restricted to `[A-Za-z0-9._-]` and must be non-empty,
/// which is checked once at construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Area(String);

impl Area {
    /// Creates an area identifier, validating its syntax.
    pub fn new(id: impl Into<String>) -> Result<Self, ParseError> {
        let id = id.into();
        if id.is_empty() {
            return Err(ParseError::InvalidArea("empty identifier".to_string()));
        }
        if !id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
        {
            return Err(ParseError::InvalidArea(id));
        }
        Ok(Area(id))
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Area {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Area {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Area::new(s)
    }
}

impl TryFrom<String> for Area {
    type Error = ParseError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Area::new(s)
    }
}

impl From<Area> for String {
    fn from(area: Area) -> Self {
        area.0
    }
}
