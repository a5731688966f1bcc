// crates/form-gate-core/src/error.rs
// ============================================================================
// Module: Predicate Errors
// Description: Fatal evaluation failures raised by predicate dispatch.
// Purpose: Distinguish "the rule could not be applied" from "the value failed".
// Dependencies: thiserror
// ============================================================================

//! ## Overview
//! A predicate that returns `Ok(false)` rejects the value. A predicate that
//! returns [`PredicateError`] means the rule itself is wrong for the data it
//! met; callers must surface that as a configuration fault rather than a
//! validation message.

use thiserror::Error;

use crate::value::ValueKind;

/// Fatal predicate evaluation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PredicateError {
    /// The operation is not defined for the value's kind.
    #[error("{operation} does not support {kind} values")]
    UnsupportedKind {
        /// Canonical operation name.
        operation: &'static str,
        /// Kind of the value the operation met.
        kind: ValueKind,
    },
    /// The operation needs an operand for this kind but none was written.
    #[error("{operation} needs an operand to compare {kind} values")]
    MissingOperand {
        /// Canonical operation name.
        operation: &'static str,
        /// Kind of the value the operation met.
        kind: ValueKind,
    },
    /// The operand cannot be coerced to the value's kind.
    #[error("{operation} cannot compare {kind} values with {operand}: {reason}")]
    InvalidOperand {
        /// Canonical operation name.
        operation: &'static str,
        /// Kind of the value the operation met.
        kind: ValueKind,
        /// Operand as written in rule text.
        operand: String,
        /// Coercion failure detail.
        reason: &'static str,
    },
    /// Two record fields cannot be ordered against each other.
    #[error("{operation} cannot order {left} against {right}")]
    IncomparableKinds {
        /// Canonical operation name.
        operation: &'static str,
        /// Kind of the first field.
        left: ValueKind,
        /// Kind of the second field.
        right: ValueKind,
    },
    /// A built-in pattern failed to compile.
    #[error("pattern `{pattern}` failed to compile: {reason}")]
    Pattern {
        /// Pattern source text.
        pattern: &'static str,
        /// Regex engine diagnostic.
        reason: String,
    },
}
