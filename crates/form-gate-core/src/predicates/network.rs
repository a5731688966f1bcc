// crates/form-gate-core/src/predicates/network.rs
// ============================================================================
// Module: Network Resolvability Predicates
// Description: Socket address resolution checks over string field values.
// Purpose: Confirm that an address both has the right literal shape and
//          resolves through the system resolver for the requested family.
// Dependencies: std::net, crate::predicates::format
// ============================================================================

//! ## Overview
//! Resolution is blocking. Every check runs its format test first and returns
//! `false` without touching the resolver when the shape is wrong, so a
//! malformed value never triggers a lookup. Callers that need deadlines apply
//! them around the whole validation call.

use std::net::SocketAddr;
use std::net::ToSocketAddrs;

use super::format;

/// Address family filter for resolution results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Family {
    /// IPv4 results only.
    V4,
    /// IPv6 results only.
    V6,
    /// Either family.
    Any,
}

impl Family {
    /// Returns true when `addr` belongs to this family.
    const fn admits(self, addr: &SocketAddr) -> bool {
        match self {
            Self::V4 => addr.is_ipv4(),
            Self::V6 => addr.is_ipv6(),
            Self::Any => true,
        }
    }
}

/// Resolves a `host:port` string and checks for a result in `family`.
fn resolves_socket(text: &str, family: Family) -> bool {
    text.to_socket_addrs().is_ok_and(|mut addrs| addrs.any(|addr| family.admits(&addr)))
}

/// Resolves a bare host and checks for a result in `family`.
fn resolves_host(text: &str, family: Family) -> bool {
    (text, 0).to_socket_addrs().is_ok_and(|mut addrs| addrs.any(|addr| family.admits(&addr)))
}

/// Returns true when the text passes the IPv4/IPv6 address-with-port format
/// check selected by `family`.
fn socket_format_ok(text: &str, family: Family) -> bool {
    match family {
        Family::V4 => format::is_ip4_addr(text),
        Family::V6 => format::is_ip6_addr(text),
        Family::Any => format::is_ip4_addr(text) || format::is_ip6_addr(text),
    }
}

/// Resolvable TCP endpoint (`host:port`) in the given family.
#[must_use]
pub fn is_tcp_addr_resolvable(text: &str, family: Family) -> bool {
    socket_format_ok(text, family) && resolves_socket(text, family)
}

/// Resolvable UDP endpoint (`host:port`) in the given family.
///
/// Name resolution does not depend on the transport, so this shares the TCP
/// resolution path.
#[must_use]
pub fn is_udp_addr_resolvable(text: &str, family: Family) -> bool {
    socket_format_ok(text, family) && resolves_socket(text, family)
}

/// Resolvable IP address in the given family.
#[must_use]
pub fn is_ip_addr_resolvable(text: &str, family: Family) -> bool {
    let format_ok = match family {
        Family::V4 => format::is_ipv4(text),
        Family::V6 => format::is_ipv6(text),
        Family::Any => format::is_ip(text),
    };
    format_ok && resolves_host(text, family)
}

/// Path usable as a Unix domain socket address.
#[cfg(unix)]
#[must_use]
pub fn is_unix_addr_resolvable(text: &str) -> bool {
    std::os::unix::net::SocketAddr::from_pathname(text).is_ok()
}

/// Unix domain sockets are unavailable on this platform.
#[cfg(not(unix))]
#[must_use]
pub const fn is_unix_addr_resolvable(_text: &str) -> bool {
    false
}
