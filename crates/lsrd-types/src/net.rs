//! Forwarding-plane primitives: route prefixes and next-hops.

use crate::ParseError;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::net::IpAddr;
use std::str::FromStr;

/// An IP route prefix in CIDR notation (e.g. `10.0.0.0/24`, `2001:db8::/32`).
///
/// Serialized as its CIDR string so it is readable in reports and on the
/// wire. Ordering is lexical on the rendered form, which is stable and good
/// enough for deterministic output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RoutePrefix {
    address: IpAddr,
    prefix_len: u8,
}

impl RoutePrefix {
    /// Creates a new route prefix.
    ///
    /// # Errors
    ///
    /// Returns an error if the prefix length is invalid for the address
    /// family (>32 for IPv4, >128 for IPv6).
    pub fn new(address: IpAddr, prefix_len: u8) -> Result<Self, ParseError> {
        let max_len = if address.is_ipv4() { 32 } else { 128 };
        if prefix_len > max_len {
            return Err(ParseError::InvalidRoutePrefix(format!(
                "prefix length {} exceeds maximum {} for address family",
                prefix_len, max_len
            )));
        }
        Ok(RoutePrefix {
            address,
            prefix_len,
        })
    }

    /// Returns the network address of this prefix.
    pub const fn address(&self) -> IpAddr {
        self.address
    }

    /// Returns the prefix length in bits.
    pub const fn prefix_len(&self) -> u8 {
        self.prefix_len
    }

    /// Returns true if this is the default route (`0.0.0.0/0` or `::/0`).
    pub fn is_default(&self) -> bool {
        self.prefix_len == 0
    }
}

impl fmt::Display for RoutePrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.address, self.prefix_len)
    }
}

impl FromStr for RoutePrefix {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (addr_str, len_str) = s
            .rsplit_once('/')
            .ok_or_else(|| ParseError::InvalidRoutePrefix(s.to_string()))?;

        let address: IpAddr = addr_str
            .parse()
            .map_err(|_| ParseError::InvalidIpAddress(addr_str.to_string()))?;
        let prefix_len: u8 = len_str
            .parse()
            .map_err(|_| ParseError::InvalidRoutePrefix(s.to_string()))?;

        RoutePrefix::new(address, prefix_len)
    }
}

impl Ord for RoutePrefix {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        (self.address, self.prefix_len).cmp(&(other.address, other.prefix_len))
    }
}

impl PartialOrd for RoutePrefix {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Serialize for RoutePrefix {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for RoutePrefix {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(D::Error::custom)
    }
}

/// A next-hop as programmed or computed: outgoing interface plus gateway
/// address. Next-hop sets are compared as sets, so ordering must be total
/// and stable.
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct NextHop {
    /// Outgoing interface name (e.g. `eth1`).
    pub interface: String,
    /// Gateway address on that interface.
    pub address: IpAddr,
}

impl NextHop {
    /// Creates a new next-hop.
    pub fn new(interface: impl Into<String>, address: IpAddr) -> Self {
        Self {
            interface: interface.into(),
            address,
        }
    }
}

impl fmt::Display for NextHop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.interface, self.address)
    }
}
