// crates/form-gate-core/src/value.rs
// ============================================================================
// Module: Field Values
// Description: Closed sum type for decoded request field values.
// Purpose: Give predicates a uniform, kind-tagged view of JSON payload data.
// Dependencies: serde_json, time
// ============================================================================

//! ## Overview
//! Request payloads arrive as JSON. Each field is decoded into a
//! [`FieldValue`] whose variant is its runtime kind. Integers keep their
//! signedness (`Int` for anything that fits `i64`, `Uint` above that) so
//! comparisons never lose precision; RFC 3339 strings become timestamps only
//! when the caller opts in through [`DecodeOptions`].

use std::collections::BTreeMap;
use std::fmt;

use serde_json::Value;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

// ============================================================================
// SECTION: Value Model
// ============================================================================

/// Field name to value mapping for a decoded record.
pub type Record = BTreeMap<String, FieldValue>;

/// A decoded field value tagged with its runtime kind.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// JSON `null`.
    Null,
    /// JSON boolean.
    Bool(bool),
    /// JSON string.
    String(String),
    /// Integer that fits in `i64`.
    Int(i64),
    /// Non-negative integer above `i64::MAX`.
    Uint(u64),
    /// Any other JSON number.
    Float(f64),
    /// JSON array.
    List(Vec<Self>),
    /// JSON object.
    Record(Record),
    /// RFC 3339 instant (opt-in).
    Timestamp(OffsetDateTime),
}

/// Runtime kind used for predicate dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    /// `null`.
    Null,
    /// Boolean.
    Bool,
    /// Text.
    String,
    /// Signed integer.
    Int,
    /// Unsigned integer.
    Uint,
    /// Floating point number.
    Float,
    /// List or record.
    Collection,
    /// Point in time.
    Timestamp,
}

impl ValueKind {
    /// Returns the lowercase kind label used in diagnostics.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool => "bool",
            Self::String => "string",
            Self::Int => "int",
            Self::Uint => "uint",
            Self::Float => "float",
            Self::Collection => "collection",
            Self::Timestamp => "timestamp",
        }
    }

    /// Returns true for the three numeric kinds.
    #[must_use]
    pub const fn is_numeric(self) -> bool {
        matches!(self, Self::Int | Self::Uint | Self::Float)
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// SECTION: Decoding
// ============================================================================

/// Options controlling JSON to [`FieldValue`] decoding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Decode RFC 3339 strings as timestamps.
    pub rfc3339_timestamps: bool,
}

impl FieldValue {
    /// Decodes a JSON value, recursing into arrays and objects.
    #[must_use]
    pub fn from_json(value: &Value, options: DecodeOptions) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(flag) => Self::Bool(*flag),
            Value::Number(number) => {
                if let Some(int) = number.as_i64() {
                    Self::Int(int)
                } else if let Some(uint) = number.as_u64() {
                    Self::Uint(uint)
                } else {
                    Self::Float(number.as_f64().unwrap_or(f64::NAN))
                }
            }
            Value::String(text) => {
                if options.rfc3339_timestamps
                    && let Ok(instant) = OffsetDateTime::parse(text, &Rfc3339)
                {
                    Self::Timestamp(instant)
                } else {
                    Self::String(text.clone())
                }
            }
            Value::Array(items) => {
                Self::List(items.iter().map(|item| Self::from_json(item, options)).collect())
            }
            Value::Object(map) => Self::Record(
                map.iter()
                    .map(|(key, item)| (key.clone(), Self::from_json(item, options)))
                    .collect(),
            ),
        }
    }

    /// Returns the runtime kind of this value.
    #[must_use]
    pub const fn kind(&self) -> ValueKind {
        match self {
            Self::Null => ValueKind::Null,
            Self::Bool(_) => ValueKind::Bool,
            Self::String(_) => ValueKind::String,
            Self::Int(_) => ValueKind::Int,
            Self::Uint(_) => ValueKind::Uint,
            Self::Float(_) => ValueKind::Float,
            Self::List(_) | Self::Record(_) => ValueKind::Collection,
            Self::Timestamp(_) => ValueKind::Timestamp,
        }
    }

    /// Returns the text of a string value.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(text) => Some(text),
            _ => None,
        }
    }

    /// Returns the fields of a record value.
    #[must_use]
    pub const fn as_record(&self) -> Option<&Record> {
        match self {
            Self::Record(record) => Some(record),
            _ => None,
        }
    }

    /// Returns the element count of a collection value.
    #[must_use]
    pub fn collection_len(&self) -> Option<usize> {
        match self {
            Self::List(items) => Some(items.len()),
            Self::Record(record) => Some(record.len()),
            _ => None,
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}
