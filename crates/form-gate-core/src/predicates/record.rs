// crates/form-gate-core/src/predicates/record.rs
// ============================================================================
// Module: Whole-Record Predicates
// Description: Cross-field checks evaluated against an entire decoded record.
// Purpose: Back HasField and the EqField/GtField family.
// Dependencies: bigdecimal, crate::{error, predicates, value}
// ============================================================================

//! ## Overview
//! Whole-record rules see every field at once. Equality between fields of
//! different kinds is simply unequal. Ordering measures each side the same
//! way the size predicates do (numbers by value, strings by length,
//! collections by count, timestamps chronologically) and refuses to order
//! across incompatible kinds. Numbers of different kinds are ordered through
//! exact decimal conversion.

use std::cmp::Ordering;
use std::str::FromStr;

use bigdecimal::BigDecimal;

use super::presence::required;
use super::size::Bound;
use crate::error::PredicateError;
use crate::value::FieldValue;
use crate::value::Record;

/// `name` is present in the record and carries a non-zero value.
#[must_use]
pub fn has_field(record: &Record, name: &str) -> bool {
    record.get(name).is_some_and(required)
}

/// Both fields are present and equal.
#[must_use]
pub fn fields_equal(record: &Record, left: &str, right: &str) -> bool {
    match (record.get(left), record.get(right)) {
        (Some(left), Some(right)) => left == right,
        _ => false,
    }
}

/// Orders field `left` against field `right`; a missing field yields `false`.
///
/// # Errors
///
/// Returns [`PredicateError::IncomparableKinds`] when the two values have no
/// common ordering.
pub fn fields_ordered(
    operation: &'static str,
    bound: Bound,
    record: &Record,
    left: &str,
    right: &str,
) -> Result<bool, PredicateError> {
    let (Some(left), Some(right)) = (record.get(left), record.get(right)) else {
        return Ok(false);
    };
    let incomparable = || PredicateError::IncomparableKinds {
        operation,
        left: left.kind(),
        right: right.kind(),
    };
    let ordering = match (left, right) {
        (FieldValue::String(a), FieldValue::String(b)) => a.chars().count().cmp(&b.chars().count()),
        (FieldValue::Timestamp(a), FieldValue::Timestamp(b)) => a.cmp(b),
        _ => {
            if let (Some(a), Some(b)) = (left.collection_len(), right.collection_len()) {
                a.cmp(&b)
            } else if left.kind().is_numeric() && right.kind().is_numeric() {
                let Some(ordering) = decimal_cmp(left, right) else {
                    return Ok(false);
                };
                ordering
            } else {
                return Err(incomparable());
            }
        }
    };
    Ok(bound.holds(ordering))
}

/// Orders two numeric values through exact decimal conversion.
fn decimal_cmp(left: &FieldValue, right: &FieldValue) -> Option<Ordering> {
    let left = decimal_from_value(left)?;
    let right = decimal_from_value(right)?;
    Some(left.cmp(&right))
}

/// Converts a numeric value into `BigDecimal` through its rendered form.
fn decimal_from_value(value: &FieldValue) -> Option<BigDecimal> {
    let rendered = match value {
        FieldValue::Int(number) => number.to_string(),
        FieldValue::Uint(number) => number.to_string(),
        FieldValue::Float(number) if number.is_finite() => number.to_string(),
        _ => return None,
    };
    BigDecimal::from_str(&rendered).ok()
}
