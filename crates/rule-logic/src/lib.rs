// crates/rule-logic/src/lib.rs
// ============================================================================
// Module: Rule Logic Root
// Description: Public API surface for boolean rule trees.
// Purpose: Wire together the rule tree, evaluation traits, structural checks,
//          literals, and the rule-expression DSL.
// Dependencies: crate::{dsl, literal, requirement, serde_support, traits}
// ============================================================================

//! ## Overview
//! `rule-logic` is the domain-agnostic half of the form validation engine. It
//! knows how to parse a boolean rule expression into a [`Requirement`] tree,
//! how to check the tree's shape, and how to evaluate it with short-circuiting
//! against any predicate type that implements [`PredicateEval`]. What a
//! predicate *means* is left entirely to the caller.

// ============================================================================
// SECTION: Core Modules
// ============================================================================

pub mod dsl;
pub mod literal;
pub mod requirement;
pub mod serde_support;
pub mod traits;

#[cfg(test)]
mod tests;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use dsl::DslError;
pub use dsl::PredicateCall;
pub use dsl::PredicateResolver;
pub use dsl::ResolveError;
pub use dsl::parse_requirement;
pub use literal::Literal;
pub use requirement::Requirement;
pub use serde_support::RequirementValidator;
pub use serde_support::SerdeError;
pub use serde_support::StructureConfig;
pub use traits::FirstFailureTrace;
pub use traits::NoopTrace;
pub use traits::PredicateEval;
pub use traits::RequirementTrace;

// ============================================================================
// SECTION: Convenience DSL
// ============================================================================

/// Convenience functions for creating requirements without the parser
pub mod convenience {
    use super::Requirement;

    /// Creates a requirement requiring all of the given requirements
    #[must_use]
    pub fn all<P>(requirements: Vec<Requirement<P>>) -> Requirement<P> {
        Requirement::and(requirements)
    }

    /// Creates a requirement requiring any of the given requirements
    #[must_use]
    pub fn any<P>(requirements: Vec<Requirement<P>>) -> Requirement<P> {
        Requirement::or(requirements)
    }

    /// Creates a requirement that inverts another requirement
    #[must_use]
    pub fn not<P>(requirement: Requirement<P>) -> Requirement<P> {
        Requirement::negate(requirement)
    }

    /// Creates a requirement requiring at least N of the given requirements
    #[must_use]
    pub fn at_least<P>(min: u8, requirements: Vec<Requirement<P>>) -> Requirement<P> {
        Requirement::require_group(min, requirements)
    }

    /// Creates a requirement from a predicate
    #[must_use]
    pub const fn predicate<P>(predicate: P) -> Requirement<P> {
        Requirement::predicate(predicate)
    }
}

// ============================================================================
// SECTION: Requirement Macro
// ============================================================================

/// Macro for ergonomic requirement construction
///
/// ```ignore
/// let req = requirement! {
///     and [
///         predicate(is_email),
///         or [
///             predicate(has_min),
///             not(predicate(is_blank))
///         ]
///     ]
/// };
/// ```
#[macro_export]
macro_rules! requirement {
    (predicate($pred:expr)) => {
        $crate::requirement::Requirement::predicate($pred)
    };

    (not($req:tt)) => {
        $crate::requirement::Requirement::negate(requirement!($req))
    };

    (and [$($req:tt),* $(,)?]) => {
        $crate::requirement::Requirement::and(vec![$(requirement!($req)),*])
    };

    (or [$($req:tt),* $(,)?]) => {
        $crate::requirement::Requirement::or(vec![$(requirement!($req)),*])
    };

    (require_group($min:expr, [$($req:tt),* $(,)?])) => {
        $crate::requirement::Requirement::require_group($min, vec![$(requirement!($req)),*])
    };
}
