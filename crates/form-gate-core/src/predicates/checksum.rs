// crates/form-gate-core/src/predicates/checksum.rs
// ============================================================================
// Module: Checksum Predicates
// Description: Check-digit and checksum validation for structured identifiers.
// Purpose: Bit-exact ISBN, Bitcoin (base58 and bech32), and Ethereum checks.
// Dependencies: sha2, crate::predicates::patterns
// ============================================================================

//! ## Overview
//! Every check first matches a shape pattern and only then runs arithmetic,
//! so the arithmetic can index digits without bounds surprises.
//!
//! - ISBN-13 strips up to four hyphens and four spaces; ISBN-10 strips up to
//!   three of each. Separators beyond those limits make the value invalid.
//! - Legacy Bitcoin addresses are base58-decoded into 25 bytes; the last four
//!   bytes must equal the first four bytes of a double SHA-256 over the first
//!   21.
//! - Bech32 addresses must pass the BCH polymod check for the `bc` prefix and
//!   carry a witness program of 2 to 40 bytes.

use sha2::Digest;
use sha2::Sha256;

use super::patterns;
use crate::error::PredicateError;

// ============================================================================
// SECTION: ISBN
// ============================================================================

/// Returns the numeric value of an ASCII digit byte.
fn digit(byte: u8) -> u32 {
    u32::from(byte.wrapping_sub(b'0'))
}

/// ISBN-13 with a valid check digit.
///
/// # Errors
///
/// Returns [`PredicateError::Pattern`] when the shape pattern fails to compile.
pub fn is_isbn13(text: &str) -> Result<bool, PredicateError> {
    let stripped = text.replacen('-', "", 4).replacen(' ', "", 4);
    if !patterns::ISBN13.is_match(&stripped)? {
        return Ok(false);
    }
    let digits = stripped.as_bytes();
    let checksum: u32 = digits[.. 12]
        .iter()
        .enumerate()
        .map(|(idx, &byte)| if idx % 2 == 0 { digit(byte) } else { 3 * digit(byte) })
        .sum();
    Ok(digit(digits[12]) == (10 - checksum % 10) % 10)
}

/// ISBN-10 with a valid check digit (`X` stands for ten).
///
/// # Errors
///
/// Returns [`PredicateError::Pattern`] when the shape pattern fails to compile.
pub fn is_isbn10(text: &str) -> Result<bool, PredicateError> {
    let stripped = text.replacen('-', "", 3).replacen(' ', "", 3);
    if !patterns::ISBN10.is_match(&stripped)? {
        return Ok(false);
    }
    let digits = stripped.as_bytes();
    let mut checksum: u32 = (1 ..= 9).zip(&digits[.. 9]).map(|(weight, &b)| weight * digit(b)).sum();
    checksum += if digits[9] == b'X' { 100 } else { 10 * digit(digits[9]) };
    Ok(checksum % 11 == 0)
}

/// ISBN-10 or ISBN-13.
///
/// # Errors
///
/// Returns [`PredicateError::Pattern`] when a shape pattern fails to compile.
pub fn is_isbn(text: &str) -> Result<bool, PredicateError> {
    Ok(is_isbn10(text)? || is_isbn13(text)?)
}

// ============================================================================
// SECTION: Bitcoin
// ============================================================================

/// Base58 alphabet used by legacy Bitcoin addresses.
pub const BASE58_ALPHABET: &[u8] = b"123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";

/// Legacy (P2PKH/P2SH) Bitcoin address with a valid checksum.
///
/// # Errors
///
/// Returns [`PredicateError::Pattern`] when the shape pattern fails to compile.
pub fn is_bitcoin_address(text: &str) -> Result<bool, PredicateError> {
    if !patterns::BTC_ADDRESS.is_match(text)? {
        return Ok(false);
    }

    let mut decoded = [0u8; 25];
    for byte in text.bytes() {
        let Some(mut carry) = BASE58_ALPHABET.iter().position(|&c| c == byte) else {
            return Ok(false);
        };
        for slot in decoded.iter_mut().rev() {
            carry += 58 * usize::from(*slot);
            *slot = u8::try_from(carry & 0xff).unwrap_or_default();
            carry /= 256;
        }
    }

    let first = Sha256::digest(&decoded[.. 21]);
    let second = Sha256::digest(first);
    Ok(second[.. 4] == decoded[21 ..])
}

/// Bech32 character set, indexed by 5-bit value.
pub const BECH32_CHARSET: &str = "qpzry9x8gf2tvdw0s3jn54khce6mua7l";
/// BCH generator coefficients for the bech32 checksum.
const BECH32_GENERATOR: [u32; 5] = [0x3b6a_57b2, 0x2650_8e6d, 0x1ea1_19fa, 0x3d42_33dd, 0x2a14_62b3];
/// Expanded human-readable part for `bc`.
pub const BECH32_HRP_BC: [u32; 5] = [3, 3, 0, 2, 3];

/// Computes the bech32 BCH polymod over the given 5-bit values.
///
/// A well-formed address yields `1` over its expanded prefix and data part.
#[must_use]
pub fn bech32_polymod(values: impl IntoIterator<Item = u32>) -> u32 {
    let mut checksum: u32 = 1;
    for value in values {
        let top = checksum >> 25;
        checksum = ((checksum & 0x01ff_ffff) << 5) ^ value;
        for (bit, generator) in BECH32_GENERATOR.iter().enumerate() {
            if (top >> bit) & 1 == 1 {
                checksum ^= generator;
            }
        }
    }
    checksum
}

/// Segwit bech32 Bitcoin address (`bc1...`, single case).
///
/// # Errors
///
/// Returns [`PredicateError::Pattern`] when a shape pattern fails to compile.
pub fn is_bitcoin_bech32_address(text: &str) -> Result<bool, PredicateError> {
    if !patterns::BTC_BECH32_LOWER.is_match(text)? && !patterns::BTC_BECH32_UPPER.is_match(text)? {
        return Ok(false);
    }

    if matches!(text.len() % 8, 0 | 3 | 5) {
        return Ok(false);
    }

    let lowered = text.to_ascii_lowercase();
    let mut data = Vec::with_capacity(lowered.len() - 3);
    for ch in lowered[3 ..].chars() {
        let Some(value) = BECH32_CHARSET.find(ch).and_then(|idx| u32::try_from(idx).ok()) else {
            return Ok(false);
        };
        data.push(value);
    }

    let version = data[0];
    if version > 16 {
        return Ok(false);
    }
    if version == 0 && lowered.len() != 42 && lowered.len() != 62 {
        return Ok(false);
    }

    if bech32_polymod(BECH32_HRP_BC.iter().copied().chain(data.iter().copied())) != 1 {
        return Ok(false);
    }

    // Regrouping 5-bit words into bytes yields floor(5n / 8) full bytes.
    let program_words = data.len() - 7;
    let program_bytes = program_words * 5 / 8;
    Ok((2 ..= 40).contains(&program_bytes))
}

// ============================================================================
// SECTION: Ethereum
// ============================================================================

/// Ethereum address shape (`0x` followed by 40 hex digits).
///
/// Mixed-case checksums are not verified.
///
/// # Errors
///
/// Returns [`PredicateError::Pattern`] when the shape pattern fails to compile.
pub fn is_ethereum_address(text: &str) -> Result<bool, PredicateError> {
    patterns::ETH_ADDRESS.is_match(text)
}
