// crates/form-gate-core/src/environment.rs
// ============================================================================
// Module: Capability Environment
// Description: Operation catalogue, operand checking, and kind dispatch.
// Purpose: Turn rule-text predicate calls into capabilities and evaluate them
//          against one wrapped field value.
// Dependencies: rule-logic, serde, time, crate::{error, predicates, value}
// ============================================================================

//! ## Overview
//! The catalogue is fixed: every callable name in rule text is an
//! [`Operation`] (or one of its aliases). Operand arity and literal shape are
//! checked once, when a rule is compiled, by [`CapabilityResolver`]. At
//! evaluation time a [`Capability`] receives an [`EvaluationContext`] holding a
//! single [`FieldValue`] and dispatches on the value's kind. Applying an
//! operation to a kind it does not define is a [`PredicateError`], never a
//! silent `false`.

use std::fmt;

use rule_logic::Literal;
use rule_logic::PredicateCall;
use rule_logic::PredicateEval;
use rule_logic::PredicateResolver;
use rule_logic::ResolveError;
use serde::Serialize;
use serde::Serializer;
use time::OffsetDateTime;

use crate::error::PredicateError;
use crate::predicates::checksum;
use crate::predicates::format;
use crate::predicates::network;
use crate::predicates::network::Family;
use crate::predicates::patterns;
use crate::predicates::presence;
use crate::predicates::record;
use crate::predicates::size;
use crate::predicates::size::Bound;
use crate::predicates::strings;
use crate::value::FieldValue;
use crate::value::Record;
use crate::value::ValueKind;

// ============================================================================
// SECTION: Operation Catalogue
// ============================================================================

/// Declares the operation enum together with its canonical names.
macro_rules! operations {
    ($( $(#[$meta:meta])* $variant:ident => $name:literal, )+) => {
        /// Every operation callable from rule text.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub enum Operation {
            $( $(#[$meta])* $variant, )+
        }

        impl Operation {
            /// Every operation in catalogue order.
            pub const ALL: &'static [Self] = &[ $( Self::$variant, )+ ];

            /// Returns the canonical rule-text name.
            #[must_use]
            pub const fn name(self) -> &'static str {
                match self {
                    $( Self::$variant => $name, )+
                }
            }
        }
    };
}

operations! {
    /// Size or value is at least the bound.
    IsGte => "IsGte",
    /// Size or value is greater than the bound.
    IsGt => "IsGt",
    /// Size or value is at most the bound.
    IsLte => "IsLte",
    /// Size or value is less than the bound.
    IsLt => "IsLt",
    /// Content, size, or value equals the operand.
    IsEq => "IsEq",
    /// Negation of `IsEq`.
    IsNe => "IsNe",
    /// Size or value equals the bound.
    HasLengthOf => "HasLengthOf",
    /// Same as `IsGte`.
    HasMinOf => "HasMinOf",
    /// Same as `IsLte`.
    HasMaxOf => "HasMaxOf",
    /// Value is not its kind's zero value.
    Required => "Required",
    /// Email address.
    IsEmail => "IsEmail",
    /// Absolute URL with a scheme.
    IsUrl => "IsURL",
    /// Absolute URL or absolute path.
    IsUri => "IsURI",
    /// Hardware address.
    IsMac => "IsMAC",
    /// IPv4 literal.
    IsIpv4 => "IsIPv4",
    /// IPv6 literal.
    IsIpv6 => "IsIPv6",
    /// IP literal of either family.
    IsIp => "IsIP",
    /// IPv4 CIDR block.
    IsCidrV4 => "IsCIDRv4",
    /// IPv6 CIDR block.
    IsCidrV6 => "IsCIDRv6",
    /// CIDR block of either family.
    IsCidr => "IsCIDR",
    /// RFC 952 hostname.
    IsHostnameRfc952 => "IsHostnameRFC952",
    /// RFC 1123 hostname.
    IsHostnameRfc1123 => "IsHostnameRFC1123",
    /// Fully qualified domain name.
    IsFqdn => "IsFQDN",
    /// Lowercase UUID.
    IsUuid => "IsUUID",
    /// Lowercase version 3 UUID.
    IsUuid3 => "IsUUID3",
    /// Lowercase version 4 UUID.
    IsUuid4 => "IsUUID4",
    /// Lowercase version 5 UUID.
    IsUuid5 => "IsUUID5",
    /// Mixed-case UUID.
    IsUuidRfc4122 => "IsUUIDRFC4122",
    /// Mixed-case version 3 UUID.
    IsUuid3Rfc4122 => "IsUUID3RFC4122",
    /// Mixed-case version 4 UUID.
    IsUuid4Rfc4122 => "IsUUID4RFC4122",
    /// Mixed-case version 5 UUID.
    IsUuid5Rfc4122 => "IsUUID5RFC4122",
    /// `#rgb` or `#rrggbb`.
    IsHexColor => "IsHEXColor",
    /// CSS `rgb()`.
    IsRgb => "IsRGB",
    /// CSS `rgba()`.
    IsRgba => "IsRGBA",
    /// CSS `hsl()`.
    IsHsl => "IsHSL",
    /// CSS `hsla()`.
    IsHsla => "IsHSLA",
    /// Padded base64.
    IsBase64 => "IsBase64",
    /// Padded URL-safe base64.
    IsBase64Url => "IsBase64URL",
    /// Hexadecimal digits.
    IsHexadecimal => "IsHexadecimal",
    /// Printable ASCII.
    IsPrintableAscii => "IsPrintableASCII",
    /// 7-bit ASCII.
    IsAscii => "IsASCII",
    /// Contains a non-ASCII character (or is empty).
    HasMultiByteCharacter => "HasMultiByteCharacter",
    /// Base64 data URI.
    IsDataUri => "IsDataURI",
    /// ASCII letters.
    IsAlpha => "IsAlpha",
    /// ASCII letters and digits.
    IsAlphanum => "IsAlphanum",
    /// Unicode letters.
    IsAlphaUnicode => "IsAlphaUnicode",
    /// Unicode letters and numbers.
    IsAlphanumUnicode => "IsAlphanumUnicode",
    /// Digit run, or any numeric value.
    IsNumber => "IsNumber",
    /// Signed decimal text, or any numeric value.
    IsNumeric => "IsNumeric",
    /// Valid percent-encoding.
    IsUrlEncoded => "IsURLEncoded",
    /// Contains HTML character references.
    IsHtmlEncoded => "IsHTMLEncoded",
    /// Contains an HTML tag.
    IsHtml => "IsHTML",
    /// US social security number.
    IsSsn => "IsSSN",
    /// Latitude in degrees.
    IsLatitude => "IsLatitude",
    /// Longitude in degrees.
    IsLongitude => "IsLongitude",
    /// Existing non-directory path.
    IsFile => "IsFile",
    /// Existing directory.
    IsDir => "IsDir",
    /// IPv4 address with optional port.
    IsIp4Addr => "IsIP4Addr",
    /// IPv6 address with optional bracketed port.
    IsIp6Addr => "IsIP6Addr",
    /// Resolvable TCP endpoint over IPv4.
    IsTcp4AddrResolvable => "IsTCP4AddrResolvable",
    /// Resolvable TCP endpoint over IPv6.
    IsTcp6AddrResolvable => "IsTCP6AddrResolvable",
    /// Resolvable TCP endpoint.
    IsTcpAddrResolvable => "IsTCPAddrResolvable",
    /// Resolvable UDP endpoint over IPv4.
    IsUdp4AddrResolvable => "IsUDP4AddrResolvable",
    /// Resolvable UDP endpoint over IPv6.
    IsUdp6AddrResolvable => "IsUDP6AddrResolvable",
    /// Resolvable UDP endpoint.
    IsUdpAddrResolvable => "IsUDPAddrResolvable",
    /// Resolvable IPv4 address.
    IsIp4AddrResolvable => "IsIP4AddrResolvable",
    /// Resolvable IPv6 address.
    IsIp6AddrResolvable => "IsIP6AddrResolvable",
    /// Resolvable IP address.
    IsIpAddrResolvable => "IsIPAddrResolvable",
    /// Usable Unix socket path.
    IsUnixAddrResolvable => "IsUnixAddrResolvable",
    /// ISBN-13.
    IsIsbn13 => "IsISBN13",
    /// ISBN-10.
    IsIsbn10 => "IsISBN10",
    /// ISBN-10 or ISBN-13.
    IsIsbn => "IsISBN",
    /// Legacy Bitcoin address.
    IsBitcoinAddress => "IsBitcoinAddress",
    /// Bech32 Bitcoin address.
    IsBitcoinBech32Address => "IsBitcoinBech32Address",
    /// Ethereum address.
    IsEthereumAddress => "IsEthereumAddress",
    /// Contains a substring.
    Contains => "Contains",
    /// Contains any of the given characters.
    ContainsAny => "ContainsAny",
    /// Contains the given character.
    ContainsRune => "ContainsRune",
    /// Does not contain a substring.
    Excludes => "Excludes",
    /// Contains none of the given characters.
    ExcludesAll => "ExcludesAll",
    /// Does not contain the given character.
    ExcludesRune => "ExcludesRune",
    /// Contains the operand text.
    FieldContains => "FieldContains",
    /// Does not contain the operand text.
    FieldExcludes => "FieldExcludes",
    /// Record has a present, non-zero field.
    HasField => "HasField",
    /// Two record fields are equal.
    EqField => "EqField",
    /// Two record fields differ.
    NeField => "NeField",
    /// First record field orders after the second.
    GtField => "GtField",
    /// First record field orders at or after the second.
    GteField => "GteField",
    /// First record field orders before the second.
    LtField => "LtField",
    /// First record field orders at or before the second.
    LteField => "LteField",
}

/// Short aliases accepted in rule text.
const ALIASES: &[(&str, Operation)] = &[
    ("Gte", Operation::IsGte),
    ("Gt", Operation::IsGt),
    ("Lte", Operation::IsLte),
    ("Lt", Operation::IsLt),
    ("Eq", Operation::IsEq),
    ("Ne", Operation::IsNe),
    ("Len", Operation::HasLengthOf),
    ("Min", Operation::HasMinOf),
    ("Max", Operation::HasMaxOf),
];

impl Operation {
    /// Looks up an operation by canonical name or alias.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|op| op.name() == name).or_else(|| {
            ALIASES.iter().find(|(alias, _)| *alias == name).map(|(_, op)| *op)
        })
    }

    /// Returns the operand shape this operation accepts.
    #[must_use]
    pub const fn operand_shape(self) -> OperandShape {
        match self {
            Self::IsGte | Self::IsGt | Self::IsLte | Self::IsLt | Self::HasMinOf | Self::HasMaxOf => {
                OperandShape::OptionalBound
            }
            Self::HasLengthOf => OperandShape::Bound,
            Self::IsEq | Self::IsNe => OperandShape::Value,
            Self::Contains
            | Self::ContainsAny
            | Self::Excludes
            | Self::ExcludesAll
            | Self::FieldContains
            | Self::FieldExcludes => OperandShape::Text,
            Self::ContainsRune | Self::ExcludesRune => OperandShape::Rune,
            Self::HasField => OperandShape::FieldName,
            Self::EqField
            | Self::NeField
            | Self::GtField
            | Self::GteField
            | Self::LtField
            | Self::LteField => OperandShape::FieldPair,
            _ => OperandShape::None,
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for Operation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

// ============================================================================
// SECTION: Operand Shapes
// ============================================================================

/// Operand arity and literal shapes accepted by an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperandShape {
    /// No operands.
    None,
    /// Zero or one numeric bound (or RFC 3339 instant for timestamps).
    OptionalBound,
    /// Exactly one numeric bound.
    Bound,
    /// Exactly one literal of any shape.
    Value,
    /// Exactly one string.
    Text,
    /// Exactly one single-character string.
    Rune,
    /// Exactly one field name.
    FieldName,
    /// Exactly two field names.
    FieldPair,
}

impl OperandShape {
    /// Checks literal operands against this shape.
    ///
    /// # Errors
    ///
    /// Returns a human-readable reason when the operands do not fit.
    pub fn check(self, operands: &[Literal]) -> Result<(), String> {
        match (self, operands) {
            (Self::None, []) | (Self::OptionalBound, []) | (Self::Value, [_]) => Ok(()),
            (Self::None, _) => Err("takes no operands".to_string()),
            (Self::OptionalBound | Self::Bound, [bound]) if is_bound(bound) => Ok(()),
            (Self::OptionalBound, _) => {
                Err("takes at most one numeric or RFC 3339 bound".to_string())
            }
            (Self::Bound, _) => Err("takes exactly one numeric bound".to_string()),
            (Self::Value, _) => Err("takes exactly one operand".to_string()),
            (Self::Text | Self::FieldName, [Literal::Str(_)]) => Ok(()),
            (Self::Text, _) => Err("takes exactly one string".to_string()),
            (Self::FieldName, _) => Err("takes exactly one field name".to_string()),
            (Self::Rune, [Literal::Str(text)]) if text.chars().count() == 1 => Ok(()),
            (Self::Rune, _) => Err("takes exactly one single-character string".to_string()),
            (Self::FieldPair, [Literal::Str(_), Literal::Str(_)]) => Ok(()),
            (Self::FieldPair, _) => Err("takes exactly two field names".to_string()),
        }
    }
}

/// Returns true when a literal can serve as a size, numeric, or time bound.
fn is_bound(literal: &Literal) -> bool {
    match literal {
        Literal::Int(_) => true,
        Literal::Float(value) => value.is_finite(),
        Literal::Str(text) => size::is_bound_text(text),
        Literal::Bool(_) => false,
    }
}

// ============================================================================
// SECTION: Capabilities
// ============================================================================

/// An operation bound to its compile-time operands; a rule tree leaf.
///
/// # Invariants
/// - `operands` always satisfy `operation.operand_shape()`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Capability {
    /// Operation to apply.
    operation: Operation,
    /// Literal operands written in rule text.
    operands: Vec<Literal>,
}

impl Capability {
    /// Creates a capability after checking the operand shape.
    ///
    /// # Errors
    ///
    /// Returns a reason when the operands do not fit the operation.
    pub fn new(operation: Operation, operands: Vec<Literal>) -> Result<Self, String> {
        operation.operand_shape().check(&operands)?;
        Ok(Self {
            operation,
            operands,
        })
    }

    /// Returns the operation.
    #[must_use]
    pub const fn operation(&self) -> Operation {
        self.operation
    }

    /// Returns the literal operands.
    #[must_use]
    pub fn operands(&self) -> &[Literal] {
        &self.operands
    }

    /// Returns the `idx`-th operand as text (empty when absent).
    fn text_operand(&self, idx: usize) -> &str {
        self.operands.get(idx).and_then(Literal::as_str).unwrap_or_default()
    }

    /// Returns the single-character operand.
    fn rune_operand(&self) -> char {
        self.text_operand(0).chars().next().unwrap_or_default()
    }

    /// Applies the operation to one value.
    ///
    /// # Errors
    ///
    /// Returns [`PredicateError`] when the value's kind is unsupported or a
    /// runtime operand coercion fails.
    pub fn apply(&self, value: &FieldValue, now: OffsetDateTime) -> Result<bool, PredicateError> {
        let op = self.operation.name();
        let bound = self.operands.first();
        let text = || string_value(op, value);
        let fields = || record_value(op, value);

        match self.operation {
            Operation::IsGte | Operation::HasMinOf => size::compare(op, Bound::Gte, value, bound, now),
            Operation::IsGt => size::compare(op, Bound::Gt, value, bound, now),
            Operation::IsLte | Operation::HasMaxOf => size::compare(op, Bound::Lte, value, bound, now),
            Operation::IsLt => size::compare(op, Bound::Lt, value, bound, now),
            Operation::HasLengthOf => size::compare(op, Bound::Eq, value, bound, now),
            Operation::IsEq => size::equals(op, value, bound, now),
            Operation::IsNe => Ok(!size::equals(op, value, bound, now)?),
            Operation::Required => Ok(presence::required(value)),

            Operation::IsEmail => patterns::EMAIL.is_match(text()?),
            Operation::IsUrl => Ok(format::is_url(text()?)),
            Operation::IsUri => Ok(format::is_uri(text()?)),
            Operation::IsMac => Ok(format::is_mac(text()?)),
            Operation::IsIpv4 => Ok(format::is_ipv4(text()?)),
            Operation::IsIpv6 => Ok(format::is_ipv6(text()?)),
            Operation::IsIp => Ok(format::is_ip(text()?)),
            Operation::IsCidrV4 => Ok(format::is_cidr_v4(text()?)),
            Operation::IsCidrV6 => Ok(format::is_cidr_v6(text()?)),
            Operation::IsCidr => Ok(format::is_cidr(text()?)),
            Operation::IsHostnameRfc952 => format::is_hostname_rfc952(text()?),
            Operation::IsHostnameRfc1123 => patterns::HOSTNAME_RFC1123.is_match(text()?),
            Operation::IsFqdn => format::is_fqdn(text()?),
            Operation::IsUuid => patterns::UUID.is_match(text()?),
            Operation::IsUuid3 => patterns::UUID3.is_match(text()?),
            Operation::IsUuid4 => patterns::UUID4.is_match(text()?),
            Operation::IsUuid5 => patterns::UUID5.is_match(text()?),
            Operation::IsUuidRfc4122 => patterns::UUID_RFC4122.is_match(text()?),
            Operation::IsUuid3Rfc4122 => patterns::UUID3_RFC4122.is_match(text()?),
            Operation::IsUuid4Rfc4122 => patterns::UUID4_RFC4122.is_match(text()?),
            Operation::IsUuid5Rfc4122 => patterns::UUID5_RFC4122.is_match(text()?),
            Operation::IsHexColor => patterns::HEX_COLOR.is_match(text()?),
            Operation::IsRgb => patterns::RGB.is_match(text()?),
            Operation::IsRgba => patterns::RGBA.is_match(text()?),
            Operation::IsHsl => patterns::HSL.is_match(text()?),
            Operation::IsHsla => patterns::HSLA.is_match(text()?),
            Operation::IsBase64 => patterns::BASE64.is_match(text()?),
            Operation::IsBase64Url => patterns::BASE64_URL.is_match(text()?),
            Operation::IsHexadecimal => patterns::HEXADECIMAL.is_match(text()?),
            Operation::IsPrintableAscii => patterns::PRINTABLE_ASCII.is_match(text()?),
            Operation::IsAscii => patterns::ASCII.is_match(text()?),
            Operation::HasMultiByteCharacter => format::has_multibyte_character(text()?),
            Operation::IsDataUri => format::is_data_uri(text()?),
            Operation::IsAlpha => patterns::ALPHA.is_match(text()?),
            Operation::IsAlphanum => patterns::ALPHANUMERIC.is_match(text()?),
            Operation::IsAlphaUnicode => patterns::ALPHA_UNICODE.is_match(text()?),
            Operation::IsAlphanumUnicode => patterns::ALPHANUMERIC_UNICODE.is_match(text()?),
            Operation::IsNumber => numeric_or_match(op, value, &patterns::NUMBER),
            Operation::IsNumeric => numeric_or_match(op, value, &patterns::NUMERIC),
            Operation::IsUrlEncoded => patterns::URL_ENCODED.is_match(text()?),
            Operation::IsHtmlEncoded => patterns::HTML_ENCODED.is_match(text()?),
            Operation::IsHtml => patterns::HTML.is_match(text()?),
            Operation::IsSsn => format::is_ssn(text()?),
            Operation::IsLatitude => coordinate_match(op, value, &patterns::LATITUDE),
            Operation::IsLongitude => coordinate_match(op, value, &patterns::LONGITUDE),
            Operation::IsFile => Ok(format::is_file(text()?)),
            Operation::IsDir => Ok(format::is_dir(text()?)),

            Operation::IsIp4Addr => Ok(format::is_ip4_addr(text()?)),
            Operation::IsIp6Addr => Ok(format::is_ip6_addr(text()?)),
            Operation::IsTcp4AddrResolvable => {
                Ok(network::is_tcp_addr_resolvable(text()?, Family::V4))
            }
            Operation::IsTcp6AddrResolvable => {
                Ok(network::is_tcp_addr_resolvable(text()?, Family::V6))
            }
            Operation::IsTcpAddrResolvable => {
                Ok(network::is_tcp_addr_resolvable(text()?, Family::Any))
            }
            Operation::IsUdp4AddrResolvable => {
                Ok(network::is_udp_addr_resolvable(text()?, Family::V4))
            }
            Operation::IsUdp6AddrResolvable => {
                Ok(network::is_udp_addr_resolvable(text()?, Family::V6))
            }
            Operation::IsUdpAddrResolvable => {
                Ok(network::is_udp_addr_resolvable(text()?, Family::Any))
            }
            Operation::IsIp4AddrResolvable => {
                Ok(network::is_ip_addr_resolvable(text()?, Family::V4))
            }
            Operation::IsIp6AddrResolvable => {
                Ok(network::is_ip_addr_resolvable(text()?, Family::V6))
            }
            Operation::IsIpAddrResolvable => {
                Ok(network::is_ip_addr_resolvable(text()?, Family::Any))
            }
            Operation::IsUnixAddrResolvable => Ok(network::is_unix_addr_resolvable(text()?)),

            Operation::IsIsbn13 => checksum::is_isbn13(text()?),
            Operation::IsIsbn10 => checksum::is_isbn10(text()?),
            Operation::IsIsbn => checksum::is_isbn(text()?),
            Operation::IsBitcoinAddress => checksum::is_bitcoin_address(text()?),
            Operation::IsBitcoinBech32Address => checksum::is_bitcoin_bech32_address(text()?),
            Operation::IsEthereumAddress => checksum::is_ethereum_address(text()?),

            Operation::Contains | Operation::FieldContains => {
                Ok(strings::contains(text()?, self.text_operand(0)))
            }
            Operation::ContainsAny => Ok(strings::contains_any(text()?, self.text_operand(0))),
            Operation::ContainsRune => Ok(strings::contains_rune(text()?, self.rune_operand())),
            Operation::Excludes | Operation::FieldExcludes => {
                Ok(strings::excludes(text()?, self.text_operand(0)))
            }
            Operation::ExcludesAll => Ok(strings::excludes_all(text()?, self.text_operand(0))),
            Operation::ExcludesRune => Ok(strings::excludes_rune(text()?, self.rune_operand())),

            Operation::HasField => Ok(record::has_field(fields()?, self.text_operand(0))),
            Operation::EqField => {
                Ok(record::fields_equal(fields()?, self.text_operand(0), self.text_operand(1)))
            }
            Operation::NeField => {
                Ok(!record::fields_equal(fields()?, self.text_operand(0), self.text_operand(1)))
            }
            Operation::GtField => self.order_fields(Bound::Gt, fields()?),
            Operation::GteField => self.order_fields(Bound::Gte, fields()?),
            Operation::LtField => self.order_fields(Bound::Lt, fields()?),
            Operation::LteField => self.order_fields(Bound::Lte, fields()?),
        }
    }

    /// Orders the two named fields of `record`.
    fn order_fields(&self, bound: Bound, record: &Record) -> Result<bool, PredicateError> {
        record::fields_ordered(
            self.operation.name(),
            bound,
            record,
            self.text_operand(0),
            self.text_operand(1),
        )
    }
}

impl fmt::Display for Capability {
    /// Renders the capability as rule text (`HasMinOf(8)`).
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.operation.name())?;
        if self.operands.is_empty() {
            return Ok(());
        }
        f.write_str("(")?;
        for (idx, operand) in self.operands.iter().enumerate() {
            if idx > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{operand}")?;
        }
        f.write_str(")")
    }
}

// ============================================================================
// SECTION: Kind Guards
// ============================================================================

/// Returns the text of a string value or an unsupported-kind error.
fn string_value<'a>(operation: &'static str, value: &'a FieldValue) -> Result<&'a str, PredicateError> {
    value.as_str().ok_or(PredicateError::UnsupportedKind {
        operation,
        kind: value.kind(),
    })
}

/// Returns the fields of a record value or an unsupported-kind error.
fn record_value<'a>(operation: &'static str, value: &'a FieldValue) -> Result<&'a Record, PredicateError> {
    value.as_record().ok_or(PredicateError::UnsupportedKind {
        operation,
        kind: value.kind(),
    })
}

/// Numeric kinds pass outright; strings must match `pattern`.
fn numeric_or_match(
    operation: &'static str,
    value: &FieldValue,
    pattern: &patterns::Pattern,
) -> Result<bool, PredicateError> {
    if value.kind().is_numeric() {
        return Ok(true);
    }
    pattern.is_match(string_value(operation, value)?)
}

/// Matches a coordinate pattern against a string or a rendered number.
fn coordinate_match(
    operation: &'static str,
    value: &FieldValue,
    pattern: &patterns::Pattern,
) -> Result<bool, PredicateError> {
    let rendered = match value {
        FieldValue::String(text) => return pattern.is_match(text),
        FieldValue::Int(number) => number.to_string(),
        FieldValue::Uint(number) => number.to_string(),
        FieldValue::Float(number) => number.to_string(),
        _ => {
            return Err(PredicateError::UnsupportedKind {
                operation,
                kind: value.kind(),
            });
        }
    };
    pattern.is_match(&rendered)
}

// ============================================================================
// SECTION: Resolution
// ============================================================================

/// Resolves rule-text predicate calls against the operation catalogue.
#[derive(Debug, Clone, Copy, Default)]
pub struct CapabilityResolver;

impl PredicateResolver<Capability> for CapabilityResolver {
    fn resolve(&self, call: &PredicateCall<'_>) -> Result<Capability, ResolveError> {
        let operation = Operation::from_name(call.name).ok_or(ResolveError::Unknown)?;
        Capability::new(operation, call.args.to_vec()).map_err(ResolveError::InvalidArguments)
    }
}

// ============================================================================
// SECTION: Evaluation Context
// ============================================================================

/// One wrapped value plus the clock timestamps are compared against.
#[derive(Debug, Clone, Copy)]
pub struct EvaluationContext<'a> {
    /// Field value or whole record under evaluation.
    value: &'a FieldValue,
    /// Instant used for timestamp bounds without an explicit operand.
    now: OffsetDateTime,
}

impl<'a> EvaluationContext<'a> {
    /// Wraps a value using the current UTC time as the clock.
    #[must_use]
    pub fn new(value: &'a FieldValue) -> Self {
        Self::with_clock(value, OffsetDateTime::now_utc())
    }

    /// Wraps a value with an explicit clock.
    #[must_use]
    pub const fn with_clock(value: &'a FieldValue, now: OffsetDateTime) -> Self {
        Self {
            value,
            now,
        }
    }

    /// Returns the wrapped value.
    #[must_use]
    pub const fn value(&self) -> &'a FieldValue {
        self.value
    }

    /// Returns the kind of the wrapped value.
    #[must_use]
    pub const fn kind(&self) -> ValueKind {
        self.value.kind()
    }
}

impl PredicateEval for Capability {
    type Subject<'a> = EvaluationContext<'a>;
    type Error = PredicateError;

    fn eval(&self, subject: &EvaluationContext<'_>) -> Result<bool, PredicateError> {
        self.apply(subject.value, subject.now)
    }
}
