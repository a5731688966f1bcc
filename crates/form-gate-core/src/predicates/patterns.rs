// crates/form-gate-core/src/predicates/patterns.rs
// ============================================================================
// Module: Format Patterns
// Description: Lazily compiled regular expressions for format predicates.
// Purpose: Compile each pattern once per process and report compile failures
//          as predicate errors instead of panicking.
// Dependencies: regex
// ============================================================================

//! ## Overview
//! Every format predicate that is a pure shape check is backed by one
//! [`Pattern`]. Patterns compile on first use and are shared across threads.
//! Digit classes are spelled `[0-9]` because `\d` is Unicode-aware in the
//! `regex` crate.

use std::sync::OnceLock;

use regex::Regex;

use crate::error::PredicateError;

// ============================================================================
// SECTION: Pattern Cell
// ============================================================================

/// A regular expression compiled on first use.
#[derive(Debug)]
pub struct Pattern {
    /// Pattern source text.
    source: &'static str,
    /// Compiled regex or the compile diagnostic.
    compiled: OnceLock<Result<Regex, String>>,
}

impl Pattern {
    /// Creates an uncompiled pattern.
    #[must_use]
    pub const fn new(source: &'static str) -> Self {
        Self {
            source,
            compiled: OnceLock::new(),
        }
    }

    /// Returns the pattern source text.
    #[must_use]
    pub const fn source(&self) -> &'static str {
        self.source
    }

    /// Tests whether the pattern matches `text`.
    ///
    /// # Errors
    ///
    /// Returns [`PredicateError::Pattern`] when the pattern does not compile.
    pub fn is_match(&self, text: &str) -> Result<bool, PredicateError> {
        let compiled =
            self.compiled.get_or_init(|| Regex::new(self.source).map_err(|err| err.to_string()));
        match compiled {
            Ok(regex) => Ok(regex.is_match(text)),
            Err(reason) => Err(PredicateError::Pattern {
                pattern: self.source,
                reason: reason.clone(),
            }),
        }
    }
}

// ============================================================================
// SECTION: Character Classes
// ============================================================================

/// ASCII letters only.
pub static ALPHA: Pattern = Pattern::new(r"^[a-zA-Z]+$");
/// ASCII letters and digits.
pub static ALPHANUMERIC: Pattern = Pattern::new(r"^[a-zA-Z0-9]+$");
/// Unicode letters.
pub static ALPHA_UNICODE: Pattern = Pattern::new(r"^[\p{L}]+$");
/// Unicode letters and numbers.
pub static ALPHANUMERIC_UNICODE: Pattern = Pattern::new(r"^[\p{L}\p{N}]+$");
/// Optionally signed decimal number.
pub static NUMERIC: Pattern = Pattern::new(r"^[-+]?[0-9]+(?:\.[0-9]+)?$");
/// Unsigned digit run.
pub static NUMBER: Pattern = Pattern::new(r"^[0-9]+$");
/// Hexadecimal digit run.
pub static HEXADECIMAL: Pattern = Pattern::new(r"^[0-9a-fA-F]+$");
/// 7-bit ASCII (empty allowed).
pub static ASCII: Pattern = Pattern::new(r"^[\x00-\x7F]*$");
/// Printable 7-bit ASCII (empty allowed).
pub static PRINTABLE_ASCII: Pattern = Pattern::new(r"^[\x20-\x7E]*$");
/// Any character outside 7-bit ASCII.
pub static MULTIBYTE: Pattern = Pattern::new(r"[^\x00-\x7F]");

// ============================================================================
// SECTION: Colors
// ============================================================================

/// `#rgb` or `#rrggbb`.
pub static HEX_COLOR: Pattern = Pattern::new(r"^#(?:[0-9a-fA-F]{3}|[0-9a-fA-F]{6})$");
/// `rgb(r, g, b)` with absolute or percentage channels.
pub static RGB: Pattern = Pattern::new(
    r"^rgb\(\s*(?:(?:0|[1-9][0-9]?|1[0-9][0-9]?|2[0-4][0-9]|25[0-5])\s*,\s*(?:0|[1-9][0-9]?|1[0-9][0-9]?|2[0-4][0-9]|25[0-5])\s*,\s*(?:0|[1-9][0-9]?|1[0-9][0-9]?|2[0-4][0-9]|25[0-5])|(?:0|[1-9][0-9]?|1[0-9][0-9]?|2[0-4][0-9]|25[0-5])%\s*,\s*(?:0|[1-9][0-9]?|1[0-9][0-9]?|2[0-4][0-9]|25[0-5])%\s*,\s*(?:0|[1-9][0-9]?|1[0-9][0-9]?|2[0-4][0-9]|25[0-5])%)\s*\)$",
);
/// `rgba(r, g, b, a)`.
pub static RGBA: Pattern = Pattern::new(
    r"^rgba\(\s*(?:(?:0|[1-9][0-9]?|1[0-9][0-9]?|2[0-4][0-9]|25[0-5])\s*,\s*(?:0|[1-9][0-9]?|1[0-9][0-9]?|2[0-4][0-9]|25[0-5])\s*,\s*(?:0|[1-9][0-9]?|1[0-9][0-9]?|2[0-4][0-9]|25[0-5])|(?:0|[1-9][0-9]?|1[0-9][0-9]?|2[0-4][0-9]|25[0-5])%\s*,\s*(?:0|[1-9][0-9]?|1[0-9][0-9]?|2[0-4][0-9]|25[0-5])%\s*,\s*(?:0|[1-9][0-9]?|1[0-9][0-9]?|2[0-4][0-9]|25[0-5])%)\s*,\s*(?:(?:0\.[0-9]*)|[01])\s*\)$",
);
/// `hsl(h, s%, l%)`.
pub static HSL: Pattern = Pattern::new(
    r"^hsl\(\s*(?:0|[1-9][0-9]?|[12][0-9][0-9]|3[0-5][0-9]|360)\s*,\s*(?:(?:0|[1-9][0-9]?|100)%)\s*,\s*(?:(?:0|[1-9][0-9]?|100)%)\s*\)$",
);
/// `hsla(h, s%, l%, a)`.
pub static HSLA: Pattern = Pattern::new(
    r"^hsla\(\s*(?:0|[1-9][0-9]?|[12][0-9][0-9]|3[0-5][0-9]|360)\s*,\s*(?:(?:0|[1-9][0-9]?|100)%)\s*,\s*(?:(?:0|[1-9][0-9]?|100)%)\s*,\s*(?:(?:0\.[0-9]*)|[01])\s*\)$",
);

// ============================================================================
// SECTION: Encodings
// ============================================================================

/// Padded standard base64.
pub static BASE64: Pattern = Pattern::new(
    r"^(?:[A-Za-z0-9+/]{4})*(?:[A-Za-z0-9+/]{2}==|[A-Za-z0-9+/]{3}=|[A-Za-z0-9+/]{4})$",
);
/// Padded URL-safe base64.
pub static BASE64_URL: Pattern = Pattern::new(
    r"^(?:[A-Za-z0-9_-]{4})*(?:[A-Za-z0-9_-]{2}==|[A-Za-z0-9_-]{3}=|[A-Za-z0-9_-]{4})$",
);
/// Media type prefix of a base64 data URI.
pub static DATA_URI: Pattern =
    Pattern::new(r"^data:((?:\w+/(?:([^;]|;[^;]).)+)|(?:[^;]+));base64$");
/// Text whose `%` signs are all valid escapes.
pub static URL_ENCODED: Pattern = Pattern::new(r"^(?:[^%]|%[0-9A-Fa-f]{2})*$");
/// HTML character references.
pub static HTML_ENCODED: Pattern =
    Pattern::new(r"&#[x]?([0-9a-fA-F]{2})|(&gt)|(&lt)|(&quot)|(&amp)+[;]?");
/// Something that looks like an HTML tag.
pub static HTML: Pattern = Pattern::new(r"<[/]?([a-zA-Z]+).*?>");

// ============================================================================
// SECTION: Identifiers
// ============================================================================

/// WHATWG-style email address.
pub static EMAIL: Pattern = Pattern::new(
    r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$",
);
/// Lowercase UUID of any version.
pub static UUID: Pattern =
    Pattern::new(r"^[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}$");
/// Lowercase version 3 UUID.
pub static UUID3: Pattern =
    Pattern::new(r"^[0-9a-f]{8}-[0-9a-f]{4}-3[0-9a-f]{3}-[0-9a-f]{4}-[0-9a-f]{12}$");
/// Lowercase version 4 UUID.
pub static UUID4: Pattern =
    Pattern::new(r"^[0-9a-f]{8}-[0-9a-f]{4}-4[0-9a-f]{3}-[89ab][0-9a-f]{3}-[0-9a-f]{12}$");
/// Lowercase version 5 UUID.
pub static UUID5: Pattern =
    Pattern::new(r"^[0-9a-f]{8}-[0-9a-f]{4}-5[0-9a-f]{3}-[89ab][0-9a-f]{3}-[0-9a-f]{12}$");
/// Mixed-case UUID of any version.
pub static UUID_RFC4122: Pattern = Pattern::new(
    r"^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}$",
);
/// Mixed-case version 3 UUID.
pub static UUID3_RFC4122: Pattern = Pattern::new(
    r"^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-3[0-9a-fA-F]{3}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}$",
);
/// Mixed-case version 4 UUID.
pub static UUID4_RFC4122: Pattern = Pattern::new(
    r"^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-4[0-9a-fA-F]{3}-[89abAB][0-9a-fA-F]{3}-[0-9a-fA-F]{12}$",
);
/// Mixed-case version 5 UUID.
pub static UUID5_RFC4122: Pattern = Pattern::new(
    r"^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-5[0-9a-fA-F]{3}-[89abAB][0-9a-fA-F]{3}-[0-9a-fA-F]{12}$",
);
/// US social security number.
pub static SSN: Pattern = Pattern::new(
    r"^[0-9]{3}[ -]?(0[1-9]|[1-9][0-9])[ -]?([1-9][0-9]{3}|[0-9][1-9][0-9]{2}|[0-9]{2}[1-9][0-9]|[0-9]{3}[1-9])$",
);
/// Decimal latitude in `[-90, 90]`.
pub static LATITUDE: Pattern = Pattern::new(r"^[-+]?([1-8]?[0-9](\.[0-9]+)?|90(\.0+)?)$");
/// Decimal longitude in `[-180, 180]`.
pub static LONGITUDE: Pattern =
    Pattern::new(r"^[-+]?(180(\.0+)?|((1[0-7][0-9])|([1-9]?[0-9]))(\.[0-9]+)?)$");

// ============================================================================
// SECTION: Hostnames
// ============================================================================

/// RFC 952 hostname: dot-separated labels that start and end alphanumeric,
/// the first starting with a letter.
pub static HOSTNAME_RFC952: Pattern = Pattern::new(
    r"^[a-zA-Z]([a-zA-Z0-9\-]*[a-zA-Z0-9])?(\.[a-zA-Z0-9]([a-zA-Z0-9\-]*[a-zA-Z0-9])?)*$",
);
/// RFC 1123 hostname.
pub static HOSTNAME_RFC1123: Pattern = Pattern::new(
    r"^([a-zA-Z0-9]{1}[a-zA-Z0-9_-]{0,62}){1}(\.[a-zA-Z0-9_]{1}[a-zA-Z0-9_-]{0,62})*?$",
);

// ============================================================================
// SECTION: Checksummed Identifiers
// ============================================================================

/// ISBN-13 digits after separator stripping.
pub static ISBN13: Pattern = Pattern::new(r"^(?:(?:97(?:8|9))[0-9]{10})$");
/// ISBN-10 digits after separator stripping.
pub static ISBN10: Pattern = Pattern::new(r"^(?:[0-9]{9}X|[0-9]{10})$");
/// Legacy base58 Bitcoin address.
pub static BTC_ADDRESS: Pattern = Pattern::new(r"^[13][a-km-zA-HJ-NP-Z1-9]{25,34}$");
/// Lowercase bech32 Bitcoin address.
pub static BTC_BECH32_LOWER: Pattern = Pattern::new(r"^bc1[02-9ac-hj-np-z]{7,76}$");
/// Uppercase bech32 Bitcoin address.
pub static BTC_BECH32_UPPER: Pattern = Pattern::new(r"^BC1[02-9AC-HJ-NP-Z]{7,76}$");
/// Ethereum address shape.
pub static ETH_ADDRESS: Pattern = Pattern::new(r"^0x[0-9a-fA-F]{40}$");

/// Every built-in pattern, for eager compile checks.
pub static ALL: &[&Pattern] = &[
    &ALPHA,
    &ALPHANUMERIC,
    &ALPHA_UNICODE,
    &ALPHANUMERIC_UNICODE,
    &NUMERIC,
    &NUMBER,
    &HEXADECIMAL,
    &ASCII,
    &PRINTABLE_ASCII,
    &MULTIBYTE,
    &HEX_COLOR,
    &RGB,
    &RGBA,
    &HSL,
    &HSLA,
    &BASE64,
    &BASE64_URL,
    &DATA_URI,
    &URL_ENCODED,
    &HTML_ENCODED,
    &HTML,
    &EMAIL,
    &UUID,
    &UUID3,
    &UUID4,
    &UUID5,
    &UUID_RFC4122,
    &UUID3_RFC4122,
    &UUID4_RFC4122,
    &UUID5_RFC4122,
    &SSN,
    &LATITUDE,
    &LONGITUDE,
    &HOSTNAME_RFC952,
    &HOSTNAME_RFC1123,
    &ISBN13,
    &ISBN10,
    &BTC_ADDRESS,
    &BTC_BECH32_LOWER,
    &BTC_BECH32_UPPER,
    &ETH_ADDRESS,
];

/// Compiles every built-in pattern.
///
/// # Errors
///
/// Returns the first [`PredicateError::Pattern`] encountered.
pub fn precompile() -> Result<(), PredicateError> {
    for pattern in ALL {
        pattern.is_match("")?;
    }
    Ok(())
}
