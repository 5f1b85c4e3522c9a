//! Shared domain types for the lsrd link-state routing suite.
//!
//! This crate provides the vocabulary every lsrd tool speaks:
//!
//! - [`ModuleKind`]: the closed set of daemon modules
//! - [`Area`]: a validated routing area identifier
//! - [`RoutePrefix`] / [`NextHop`]: forwarding primitives
//! - [`ModuleSnapshot`]: one point-in-time state record per module
//! - [`VersionInfo`]: build/protocol version reported by every module

mod module;
mod net;
mod snapshot;

pub use module::{Area, ModuleKind};
pub use net::{NextHop, RoutePrefix};
pub use snapshot::{
    DecisionSnapshot, DiscoveredNeighbor, DiscoverySnapshot, FibSnapshot, LinkEntry,
    LinkMonitorSnapshot, ModuleSnapshot, PrefixAdvertisement, PrefixManagerSnapshot, RouteEntry,
    TopologySnapshot, VersionInfo,
};

/// Common error type for parsing failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("invalid IP address format: {0}")]
    InvalidIpAddress(String),

    #[error("invalid route prefix format: {0}")]
    InvalidRoutePrefix(String),

    #[error("invalid area identifier: {0}")]
    InvalidArea(String),

    #[error("unknown module: {0}")]
    UnknownModule(String),
}
