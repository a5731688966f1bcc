// crates/form-gate-core/src/lib.rs
// ============================================================================
// Module: Form Gate Core Library
// Description: Public API surface for field values and predicates.
// Purpose: Expose the value model, the predicate library, and the capability
//          environment used as rule tree leaves.
// Dependencies: crate::{environment, error, predicates, value}
// ============================================================================

//! ## Overview
//! Form Gate core turns decoded request fields into [`FieldValue`]s and
//! evaluates named predicate operations against them. Dispatch is by the
//! value's runtime kind; an operation applied to a kind it does not understand
//! is an error, never a silent `false`. The domain-agnostic boolean structure
//! lives in `rule-logic`; this crate supplies the leaves.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod environment;
pub mod error;
pub mod predicates;
pub mod value;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use environment::Capability;
pub use environment::CapabilityResolver;
pub use environment::EvaluationContext;
pub use environment::OperandShape;
pub use environment::Operation;
pub use error::PredicateError;
pub use value::DecodeOptions;
pub use value::FieldValue;
pub use value::Record;
pub use value::ValueKind;
