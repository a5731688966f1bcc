// crates/form-gate-core/src/predicates/size.rs
// ============================================================================
// Module: Size and Comparison Predicates
// Description: Kind-dispatched bound checks and equality.
// Purpose: Back the IsGte/IsGt/IsLte/IsLt/HasLengthOf/IsEq family.
// Dependencies: rule-logic, time, crate::{error, value}
// ============================================================================

//! ## Overview
//! The same bound means different things per kind:
//! - strings compare their length in Unicode scalar values;
//! - lists and records compare their element count;
//! - numbers compare their value against a coerced operand;
//! - timestamps compare against the evaluation clock, or against an RFC 3339
//!   operand when one is written.
//!
//! Operands are coerced per kind. A coercion that cannot succeed (a fractional
//! bound for an integer, a negative bound for an unsigned value) is a
//! [`PredicateError::InvalidOperand`], not a failed check.

use std::cmp::Ordering;

use rule_logic::Literal;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::error::PredicateError;
use crate::value::FieldValue;
use crate::value::ValueKind;

// ============================================================================
// SECTION: Bounds
// ============================================================================

/// Comparison applied between a measured value and its bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    /// `>=`
    Gte,
    /// `>`
    Gt,
    /// `<=`
    Lte,
    /// `<`
    Lt,
    /// `==`
    Eq,
}

impl Bound {
    /// Returns true when `ordering` (value compared to bound) satisfies this bound.
    #[must_use]
    pub const fn holds(self, ordering: Ordering) -> bool {
        match self {
            Self::Gte => ordering.is_ge(),
            Self::Gt => ordering.is_gt(),
            Self::Lte => ordering.is_le(),
            Self::Lt => ordering.is_lt(),
            Self::Eq => ordering.is_eq(),
        }
    }
}

// ============================================================================
// SECTION: Operand Coercion
// ============================================================================

/// Builds an invalid-operand error.
fn invalid(
    operation: &'static str,
    kind: ValueKind,
    operand: &Literal,
    reason: &'static str,
) -> PredicateError {
    PredicateError::InvalidOperand {
        operation,
        kind,
        operand: operand.to_string(),
        reason,
    }
}

/// Returns the operand or a missing-operand error.
fn require_operand<'a>(
    operation: &'static str,
    kind: ValueKind,
    operand: Option<&'a Literal>,
) -> Result<&'a Literal, PredicateError> {
    operand.ok_or(PredicateError::MissingOperand {
        operation,
        kind,
    })
}

/// Coerces an operand to a signed integer bound.
fn signed_bound(
    operation: &'static str,
    kind: ValueKind,
    operand: Option<&Literal>,
) -> Result<i64, PredicateError> {
    let literal = require_operand(operation, kind, operand)?;
    match literal {
        Literal::Int(bound) => Ok(*bound),
        Literal::Str(text) => {
            text.trim().parse().map_err(|_| invalid(operation, kind, literal, "not an integer"))
        }
        Literal::Float(_) | Literal::Bool(_) => {
            Err(invalid(operation, kind, literal, "not an integer"))
        }
    }
}

/// Coerces an operand to an unsigned integer bound.
fn unsigned_bound(
    operation: &'static str,
    kind: ValueKind,
    operand: Option<&Literal>,
) -> Result<u64, PredicateError> {
    let literal = require_operand(operation, kind, operand)?;
    let negative = || invalid(operation, kind, literal, "negative bound for an unsigned value");
    match literal {
        Literal::Int(bound) => u64::try_from(*bound).map_err(|_| negative()),
        Literal::Str(text) => {
            let text = text.trim();
            if text.starts_with('-') && text.parse::<i64>().is_ok() {
                return Err(negative());
            }
            text.parse().map_err(|_| invalid(operation, kind, literal, "not an unsigned integer"))
        }
        Literal::Float(_) | Literal::Bool(_) => {
            Err(invalid(operation, kind, literal, "not an unsigned integer"))
        }
    }
}

/// Coerces an operand to a floating point bound.
#[allow(clippy::cast_precision_loss, reason = "Integer bounds widen to the float domain.")]
fn float_bound(
    operation: &'static str,
    kind: ValueKind,
    operand: Option<&Literal>,
) -> Result<f64, PredicateError> {
    let literal = require_operand(operation, kind, operand)?;
    let parsed = match literal {
        Literal::Int(bound) => Some(*bound as f64),
        Literal::Float(bound) => Some(*bound),
        Literal::Str(text) => text.trim().parse::<f64>().ok(),
        Literal::Bool(_) => None,
    };
    parsed
        .filter(|bound| bound.is_finite())
        .ok_or_else(|| invalid(operation, kind, literal, "not a number"))
}

/// Resolves the instant a timestamp is compared against.
fn instant_bound(
    operation: &'static str,
    operand: Option<&Literal>,
    now: OffsetDateTime,
) -> Result<OffsetDateTime, PredicateError> {
    let Some(literal) = operand else {
        return Ok(now);
    };
    literal
        .as_str()
        .and_then(|text| OffsetDateTime::parse(text, &Rfc3339).ok())
        .ok_or_else(|| invalid(operation, ValueKind::Timestamp, literal, "not an RFC 3339 instant"))
}

/// Returns true when a string operand is usable as a size or time bound.
#[must_use]
pub fn is_bound_text(text: &str) -> bool {
    let text = text.trim();
    text.parse::<f64>().is_ok() || OffsetDateTime::parse(text, &Rfc3339).is_ok()
}

// ============================================================================
// SECTION: Comparisons
// ============================================================================

/// Compares a count against an integer bound.
fn compare_count(count: usize, bound: i64) -> Ordering {
    i128::try_from(count).unwrap_or(i128::MAX).cmp(&i128::from(bound))
}

/// Applies `bound` to `value` using kind-specific measurement.
///
/// # Errors
///
/// Returns [`PredicateError`] when the kind is unsupported, the operand is
/// missing, or the operand cannot be coerced.
pub fn compare(
    operation: &'static str,
    bound: Bound,
    value: &FieldValue,
    operand: Option<&Literal>,
    now: OffsetDateTime,
) -> Result<bool, PredicateError> {
    let kind = value.kind();
    let ordering = match value {
        FieldValue::String(text) => {
            compare_count(text.chars().count(), signed_bound(operation, kind, operand)?)
        }
        FieldValue::List(items) => compare_count(items.len(), signed_bound(operation, kind, operand)?),
        FieldValue::Record(fields) => {
            compare_count(fields.len(), signed_bound(operation, kind, operand)?)
        }
        FieldValue::Int(number) => number.cmp(&signed_bound(operation, kind, operand)?),
        FieldValue::Uint(number) => number.cmp(&unsigned_bound(operation, kind, operand)?),
        FieldValue::Float(number) => {
            let Some(ordering) = number.partial_cmp(&float_bound(operation, kind, operand)?) else {
                return Ok(false);
            };
            ordering
        }
        FieldValue::Timestamp(instant) if bound != Bound::Eq => {
            instant.cmp(&instant_bound(operation, operand, now)?)
        }
        FieldValue::Timestamp(_) | FieldValue::Null | FieldValue::Bool(_) => {
            return Err(PredicateError::UnsupportedKind {
                operation,
                kind,
            });
        }
    };
    Ok(bound.holds(ordering))
}

/// Renders an operand as plain text for string equality.
fn operand_text(literal: &Literal) -> String {
    match literal {
        Literal::Str(text) => text.clone(),
        Literal::Int(_) | Literal::Float(_) | Literal::Bool(_) => literal.to_string(),
    }
}

/// Equality between a value and an operand.
///
/// Strings compare content; booleans compare against a boolean operand; every
/// other supported kind compares its measured size or value.
///
/// # Errors
///
/// Returns [`PredicateError`] when the kind is unsupported or the operand
/// cannot be coerced.
pub fn equals(
    operation: &'static str,
    value: &FieldValue,
    operand: Option<&Literal>,
    now: OffsetDateTime,
) -> Result<bool, PredicateError> {
    let kind = value.kind();
    match value {
        FieldValue::String(text) => {
            let literal = require_operand(operation, kind, operand)?;
            Ok(*text == operand_text(literal))
        }
        FieldValue::Bool(flag) => {
            let literal = require_operand(operation, kind, operand)?;
            let expected = match literal {
                Literal::Bool(expected) => *expected,
                Literal::Str(text) if text == "true" => true,
                Literal::Str(text) if text == "false" => false,
                _ => return Err(invalid(operation, kind, literal, "not a boolean")),
            };
            Ok(*flag == expected)
        }
        _ => compare(operation, Bound::Eq, value, operand, now),
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    #![allow(
        clippy::panic,
        clippy::unwrap_used,
        clippy::expect_used,
        reason = "Test-only assertions are permitted."
    )]

    use super::*;

    fn now() -> OffsetDateTime {
        OffsetDateTime::parse("2026-01-01T00:00:00Z", &Rfc3339).unwrap()
    }

    #[test]
    fn strings_measure_scalar_values() {
        let value = FieldValue::from("héllo");
        assert!(compare("HasLengthOf", Bound::Eq, &value, Some(&Literal::Int(5)), now()).unwrap());
    }

    #[test]
    fn numeric_string_operands_coerce() {
        let value = FieldValue::Int(18);
        let bound = Literal::Str("18".to_string());
        assert!(compare("IsGte", Bound::Gte, &value, Some(&bound), now()).unwrap());
    }

    #[test]
    fn float_operand_against_int_is_invalid() {
        let err = compare("IsGt", Bound::Gt, &FieldValue::Int(3), Some(&Literal::Float(2.5)), now());
        assert!(matches!(err, Err(PredicateError::InvalidOperand { .. })));
    }

    #[test]
    fn negative_bound_against_uint_is_invalid() {
        let value = FieldValue::Uint(u64::MAX);
        let err = compare("IsGte", Bound::Gte, &value, Some(&Literal::Int(-1)), now());
        assert!(matches!(err, Err(PredicateError::InvalidOperand { .. })));
    }

    #[test]
    fn timestamps_default_to_the_clock() {
        let past = FieldValue::Timestamp(OffsetDateTime::UNIX_EPOCH);
        assert!(compare("IsLt", Bound::Lt, &past, None, now()).unwrap());
        assert!(!compare("IsGte", Bound::Gte, &past, None, now()).unwrap());
        let err = compare("HasLengthOf", Bound::Eq, &past, Some(&Literal::Int(1)), now());
        assert!(matches!(err, Err(PredicateError::UnsupportedKind { .. })));
    }

    #[test]
    fn timestamp_operand_overrides_the_clock() {
        let instant = FieldValue::Timestamp(now());
        let bound = Literal::Str("2030-01-01T00:00:00Z".to_string());
        assert!(compare("IsLt", Bound::Lt, &instant, Some(&bound), now()).unwrap());
    }

    #[test]
    fn missing_operand_for_numbers_is_fatal() {
        let err = compare("IsGt", Bound::Gt, &FieldValue::Float(1.5), None, now());
        assert!(matches!(err, Err(PredicateError::MissingOperand { .. })));
    }

    #[test]
    fn equality_by_kind() {
        let text = FieldValue::from("admin");
        assert!(equals("IsEq", &text, Some(&Literal::Str("admin".to_string())), now()).unwrap());
        assert!(equals("IsEq", &FieldValue::Bool(true), Some(&Literal::Bool(true)), now()).unwrap());
        let list = FieldValue::List(vec![FieldValue::Null, FieldValue::Null]);
        assert!(equals("IsEq", &list, Some(&Literal::Int(2)), now()).unwrap());
        let err = equals("IsEq", &FieldValue::Null, Some(&Literal::Int(0)), now());
        assert!(matches!(err, Err(PredicateError::UnsupportedKind { .. })));
    }
}
