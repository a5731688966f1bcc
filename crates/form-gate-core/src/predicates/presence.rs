// crates/form-gate-core/src/predicates/presence.rs
// ============================================================================
// Module: Presence Predicate
// Description: Zero-value detection for `Required`.
// Purpose: Decide whether a decoded value carries meaningful content.
// Dependencies: time, crate::value
// ============================================================================

//! ## Overview
//! `null` is never present. Lists and records are present whenever they were
//! sent, even empty. Every other kind is present when it differs from its zero
//! value: `""`, `0`, `0.0`, `false`, or the Unix epoch.

use time::OffsetDateTime;

use crate::value::FieldValue;

/// Returns true when `value` is not its kind's zero value.
#[must_use]
pub fn required(value: &FieldValue) -> bool {
    match value {
        FieldValue::Null => false,
        FieldValue::List(_) | FieldValue::Record(_) => true,
        FieldValue::Bool(flag) => *flag,
        FieldValue::String(text) => !text.is_empty(),
        FieldValue::Int(number) => *number != 0,
        FieldValue::Uint(number) => *number != 0,
        FieldValue::Float(number) => *number != 0.0,
        FieldValue::Timestamp(instant) => *instant != OffsetDateTime::UNIX_EPOCH,
    }
}
