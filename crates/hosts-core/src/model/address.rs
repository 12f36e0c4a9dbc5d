//! Address helpers: family detection, loopback checks and CIDR matching
//!
//! Addresses are stored as text. These helpers parse on demand so that a
//! malformed address read from disk stays a legitimate (if unresolvable)
//! entry instead of being rejected.

use ipnet::IpNet;
use serde::Serialize;
use std::net::IpAddr;

/// IP address family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IpFamily {
    /// IPv4, including IPv4-mapped IPv6 literals such as `::ffff:10.0.0.1`
    V4,
    /// IPv6
    V6,
}

impl IpFamily {
    /// Family of an address literal, `None` when it does not parse
    pub fn of(address: &str) -> Option<Self> {
        parse_ip(address).map(|ip| match ip {
            IpAddr::V4(_) => IpFamily::V4,
            IpAddr::V6(_) => IpFamily::V6,
        })
    }
}

/// Parse an address literal, folding IPv4-mapped IPv6 into IPv4
pub fn parse_ip(address: &str) -> Option<IpAddr> {
    let ip: IpAddr = address.trim().parse().ok()?;
    Some(match ip {
        IpAddr::V6(v6) => match v6.to_ipv4_mapped() {
            Some(v4) => IpAddr::V4(v4),
            None => ip,
        },
        v4 => v4,
    })
}

/// True for addresses in 127.0.0.0/8 or `::1`
pub fn is_loopback(address: &str) -> bool {
    parse_ip(address).is_some_and(|ip| ip.is_loopback())
}

/// Parse a CIDR range such as `10.0.0.0/24`
pub fn parse_cidr(cidr: &str) -> Result<IpNet, ipnet::AddrParseError> {
    cidr.trim().parse::<IpNet>()
}

/// True when `address` parses and lies inside `network`
pub fn cidr_contains(network: &IpNet, address: &str) -> bool {
    parse_ip(address).is_some_and(|ip| network.contains(&ip))
}
