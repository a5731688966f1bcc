// crates/form-gate-core/src/predicates/mod.rs
// ============================================================================
// Module: Predicate Library
// Description: Pure predicate functions grouped by concern.
// Purpose: Provide the checks the capability environment dispatches to.
// Dependencies: crate::predicates::{checksum, format, network, patterns,
//               presence, record, size, strings}
// ============================================================================

//! ## Overview
//! Predicates here know nothing about rule text or operation names beyond the
//! labels they put in errors. String predicates take `&str`; kind-sensitive
//! predicates take [`FieldValue`](crate::FieldValue).

pub mod checksum;
pub mod format;
pub mod network;
pub mod patterns;
pub mod presence;
pub mod record;
pub mod size;
pub mod strings;
