// crates/form-gate-core/src/predicates/format.rs
// ============================================================================
// Module: Format Predicates
// Description: Shape checks over string field values.
// Purpose: Validate emails, URLs, addresses, identifiers, colors, encodings,
//          and filesystem paths.
// Dependencies: std::net, url, crate::predicates::patterns
// ============================================================================

//! ## Overview
//! Each function answers one yes/no question about a string. Functions that
//! are backed by a [`Pattern`](super::patterns::Pattern) return `Result`
//! because a pattern compile failure is fatal; the rest are infallible.
//!
//! IPv4 versus IPv6 is decided by whether the address has a 4-byte form, so
//! IPv4-mapped IPv6 literals (`::ffff:10.0.0.1`) count as IPv4.

use std::net::IpAddr;
use std::path::Path;

use url::Url;

use super::patterns;
use crate::error::PredicateError;

// ============================================================================
// SECTION: IP Addresses
// ============================================================================

/// Parses an IP literal and reports whether it has a 4-byte form.
pub(crate) fn parse_ip(text: &str) -> Option<(IpAddr, bool)> {
    let addr: IpAddr = text.parse().ok()?;
    let is_v4 = match addr {
        IpAddr::V4(_) => true,
        IpAddr::V6(v6) => v6.to_ipv4_mapped().is_some(),
    };
    Some((addr, is_v4))
}

/// IPv4 or IPv6 literal.
#[must_use]
pub fn is_ip(text: &str) -> bool {
    parse_ip(text).is_some()
}

/// IPv4 literal (including IPv4-mapped IPv6).
#[must_use]
pub fn is_ipv4(text: &str) -> bool {
    parse_ip(text).is_some_and(|(_, v4)| v4)
}

/// IPv6 literal without a 4-byte form.
#[must_use]
pub fn is_ipv6(text: &str) -> bool {
    parse_ip(text).is_some_and(|(_, v4)| !v4)
}

/// Parses `addr/prefix` and reports whether the address has a 4-byte form.
fn parse_cidr(text: &str) -> Option<bool> {
    let (addr, prefix) = text.split_once('/')?;
    let (parsed, is_v4) = parse_ip(addr)?;
    if prefix.is_empty() || !prefix.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let bits: u32 = prefix.parse().ok()?;
    // The prefix limit follows the literal form, not the 4-byte form.
    let max = if parsed.is_ipv4() { 32 } else { 128 };
    (bits <= max).then_some(is_v4)
}

/// CIDR block in either family.
#[must_use]
pub fn is_cidr(text: &str) -> bool {
    parse_cidr(text).is_some()
}

/// IPv4 CIDR block.
#[must_use]
pub fn is_cidr_v4(text: &str) -> bool {
    parse_cidr(text) == Some(true)
}

/// IPv6 CIDR block.
#[must_use]
pub fn is_cidr_v6(text: &str) -> bool {
    parse_cidr(text) == Some(false)
}

/// IPv4 address with an optional `:port` suffix.
#[must_use]
pub fn is_ip4_addr(text: &str) -> bool {
    let host = text.rfind(':').map_or(text, |idx| &text[.. idx]);
    is_ipv4(host)
}

/// IPv6 address, optionally written as `[addr]:port`.
#[must_use]
pub fn is_ip6_addr(text: &str) -> bool {
    let mut host = text;
    if let Some(idx) = text.rfind(':')
        && idx != 0
        && text.as_bytes()[idx - 1] == b']'
    {
        host = text.get(1 .. idx - 1).unwrap_or_default();
    }
    is_ipv6(host)
}

// ============================================================================
// SECTION: Hardware Addresses
// ============================================================================

/// IEEE 802 MAC-48, EUI-48, EUI-64, or 20-octet `InfiniBand` address.
///
/// Accepts `:` or `-` separated octet pairs and `.` separated 4-digit groups.
#[must_use]
pub fn is_mac(text: &str) -> bool {
    let bytes = text.as_bytes();
    if bytes.len() < 14 {
        return false;
    }
    let (separator, group_len, counts): (u8, usize, [usize; 3]) =
        if bytes[2] == b':' || bytes[2] == b'-' {
            (bytes[2], 2, [6, 8, 20])
        } else if bytes[4] == b'.' {
            (b'.', 4, [3, 4, 10])
        } else {
            return false;
        };

    let groups: Vec<&str> = text.split(char::from(separator)).collect();
    counts.contains(&groups.len())
        && groups
            .iter()
            .all(|group| group.len() == group_len && group.bytes().all(|b| b.is_ascii_hexdigit()))
}

// ============================================================================
// SECTION: URLs
// ============================================================================

/// Strips a `#fragment` suffix the way browsers do before validation.
fn strip_fragment(text: &str) -> &str {
    text.find('#').map_or(text, |idx| &text[.. idx])
}

/// Absolute URL with a scheme.
#[must_use]
pub fn is_url(text: &str) -> bool {
    let text = strip_fragment(text);
    !text.is_empty() && Url::parse(text).is_ok()
}

/// Absolute URL or absolute path.
#[must_use]
pub fn is_uri(text: &str) -> bool {
    let text = strip_fragment(text);
    if text.is_empty() {
        return false;
    }
    text.starts_with('/') || Url::parse(text).is_ok()
}

/// `data:<media type>;base64,<payload>`.
///
/// # Errors
///
/// Returns [`PredicateError::Pattern`] when a pattern fails to compile.
pub fn is_data_uri(text: &str) -> Result<bool, PredicateError> {
    let Some((header, payload)) = text.split_once(',') else {
        return Ok(false);
    };
    Ok(patterns::DATA_URI.is_match(header)? && patterns::BASE64.is_match(payload)?)
}

// ============================================================================
// SECTION: Hostnames
// ============================================================================

/// Fully qualified domain name; a single trailing dot is allowed.
///
/// # Errors
///
/// Returns [`PredicateError::Pattern`] when a pattern fails to compile.
pub fn is_fqdn(text: &str) -> Result<bool, PredicateError> {
    if text.is_empty() {
        return Ok(false);
    }
    let name = text.strip_suffix('.').unwrap_or(text);
    Ok(name.contains('.') && is_hostname_rfc952(name)?)
}

/// RFC 952 hostname of at least two characters.
///
/// # Errors
///
/// Returns [`PredicateError::Pattern`] when the hostname pattern fails to
/// compile.
pub fn is_hostname_rfc952(text: &str) -> Result<bool, PredicateError> {
    Ok(text.len() >= 2 && patterns::HOSTNAME_RFC952.is_match(text)?)
}

// ============================================================================
// SECTION: Text Shape
// ============================================================================

/// Contains at least one non-ASCII character; the empty string counts.
///
/// # Errors
///
/// Returns [`PredicateError::Pattern`] when a pattern fails to compile.
pub fn has_multibyte_character(text: &str) -> Result<bool, PredicateError> {
    if text.is_empty() {
        return Ok(true);
    }
    patterns::MULTIBYTE.is_match(text)
}

/// US social security number, exactly eleven bytes long.
///
/// # Errors
///
/// Returns [`PredicateError::Pattern`] when a pattern fails to compile.
pub fn is_ssn(text: &str) -> Result<bool, PredicateError> {
    if text.len() != 11 {
        return Ok(false);
    }
    patterns::SSN.is_match(text)
}

// ============================================================================
// SECTION: Filesystem
// ============================================================================

/// Existing path that is not a directory.
#[must_use]
pub fn is_file(text: &str) -> bool {
    Path::new(text).metadata().is_ok_and(|meta| !meta.is_dir())
}

/// Existing directory.
#[must_use]
pub fn is_dir(text: &str) -> bool {
    Path::new(text).metadata().is_ok_and(|meta| meta.is_dir())
}

// ============================================================================
// SECTION: Tests
// ============================================================================
