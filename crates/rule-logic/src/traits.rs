// crates/rule-logic/src/traits.rs
// ============================================================================
// Module: Requirement Traits
// Description: Evaluation contracts for rule tree leaves.
// Purpose: Define how predicates evaluate against a subject and how callers
//          observe individual predicate outcomes.
// Dependencies: std
// ============================================================================

//! ## Overview
//! A rule tree is generic over its leaf type. Leaves implement
//! [`PredicateEval`] to say what they evaluate against and how they fail;
//! [`RequirementTrace`] lets callers watch individual leaf results without
//! changing the tree's boolean outcome.

// ============================================================================
// SECTION: Predicate Trait
// ============================================================================

/// Core trait for predicate evaluation
///
/// A predicate answers one yes/no question about a subject. Returning `Err`
/// means the question could not be asked at all (for example, the subject has
/// a shape the predicate does not understand), which is distinct from the
/// subject failing the check.
pub trait PredicateEval {
    /// Domain-specific subject the predicate inspects
    type Subject<'a>;

    /// Error raised when the predicate cannot be applied to the subject
    type Error;

    /// Evaluates the predicate against the subject
    ///
    /// # Errors
    ///
    /// Returns `Self::Error` when the predicate is not applicable to the subject.
    fn eval(&self, subject: &Self::Subject<'_>) -> Result<bool, Self::Error>;
}

// ============================================================================
// SECTION: Trace Hooks
// ============================================================================

/// Trace hook for requirement evaluation
pub trait RequirementTrace<P> {
    /// Called whenever a predicate is evaluated
    fn on_predicate_evaluated(&mut self, predicate: &P, result: bool);

    /// Called before the children of an `Or` or `RequireGroup` are evaluated
    fn on_alternatives_entered(&mut self) {}

    /// Called after an `Or` or `RequireGroup` finishes with its result
    fn on_alternatives_exited(&mut self, _satisfied: bool) {}
}

/// No-op trace hook for fast paths
///
/// # Invariants
/// - Zero-sized marker type; carries no state.
#[derive(Debug, Default)]
pub struct NoopTrace;

impl<P> RequirementTrace<P> for NoopTrace {
    fn on_predicate_evaluated(&mut self, _predicate: &P, _result: bool) {}
}

/// Records the first predicate whose `false` result still stands.
///
/// A failure recorded inside a disjunction that is later satisfied is
/// discarded, so the recorded leaf is one that contributed to a `false` tree.
///
/// # Invariants
/// - A failure recorded before entering a disjunction is never overwritten.
#[derive(Debug)]
pub struct FirstFailureTrace<P> {
    /// The first failing predicate, cloned out of the tree.
    first_failure: Option<P>,
    /// Per open disjunction: whether a failure was already recorded on entry.
    scopes: Vec<bool>,
}

impl<P> FirstFailureTrace<P> {
    /// Creates an empty trace.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            first_failure: None,
            scopes: Vec::new(),
        }
    }

    /// Returns the first failing predicate, if any.
    #[must_use]
    pub const fn first_failure(&self) -> Option<&P> {
        self.first_failure.as_ref()
    }

    /// Consumes the trace and returns the first failing predicate.
    #[must_use]
    pub fn into_first_failure(self) -> Option<P> {
        self.first_failure
    }
}

impl<P> Default for FirstFailureTrace<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: Clone> RequirementTrace<P> for FirstFailureTrace<P> {
    fn on_predicate_evaluated(&mut self, predicate: &P, result: bool) {
        if !result && self.first_failure.is_none() {
            self.first_failure = Some(predicate.clone());
        }
    }

    fn on_alternatives_entered(&mut self) {
        self.scopes.push(self.first_failure.is_some());
    }

    fn on_alternatives_exited(&mut self, satisfied: bool) {
        let recorded_before = self.scopes.pop().unwrap_or(true);
        if satisfied && !recorded_before {
            self.first_failure = None;
        }
    }
}
