// crates/rule-logic/src/requirement.rs
// ============================================================================
// Module: Requirement Core Types
// Description: Boolean algebra over typed predicates.
// Purpose: Define `Requirement` along with evaluation and constructor helpers.
// Dependencies: serde::{Deserialize, Serialize}, smallvec::SmallVec
// ============================================================================

//! ## Overview
//! This module defines the rule tree that every compiled rule expression
//! becomes. Logical operators are universal; the `Predicate` leaf is where the
//! caller's domain semantics are injected. Evaluation short-circuits and
//! propagates the first predicate error unchanged, so a misconfigured rule is
//! never mistaken for a failing one.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;
use smallvec::SmallVec;

use crate::traits::NoopTrace;
use crate::traits::PredicateEval;
use crate::traits::RequirementTrace;

// ============================================================================
// SECTION: Requirement Definition
// ============================================================================

/// Rule tree with domain-specific leaves
///
/// The logical operators (And, Or, Not, `RequireGroup`) are domain-agnostic,
/// while the Predicate variant is the boundary where domain semantics enter.
/// The literal `true` is an empty `And`; the literal `false` is an empty `Or`.
#[derive(Debug, Clone, PartialEq, Hash, Serialize, Deserialize)]
pub enum Requirement<P> {
    /// Logical AND: All sub-requirements must be satisfied
    ///
    /// Evaluation short-circuits on the first failure. Empty And is
    /// trivially satisfied.
    And(SmallVec<[Box<Self>; 4]>),

    /// Logical OR: At least one sub-requirement must be satisfied
    ///
    /// Evaluation short-circuits on the first success. Empty Or is
    /// trivially unsatisfiable.
    Or(SmallVec<[Box<Self>; 4]>),

    /// Logical NOT: Inverts the result of the sub-requirement
    Not(Box<Self>),

    /// Group requirement: At least `min` of the sub-requirements must be satisfied
    RequireGroup {
        /// Minimum number of sub-requirements that must be satisfied
        min: u8,
        /// The sub-requirements to choose from
        reqs: SmallVec<[Box<Self>; 8]>,
    },

    /// Domain-specific atomic predicate
    Predicate(P),
}

// ============================================================================
// SECTION: Execution Helpers
// ============================================================================

impl<P> Requirement<P> {
    /// Evaluates this requirement with short-circuiting.
    ///
    /// # Errors
    ///
    /// Returns the first error raised by a predicate leaf. Evaluation stops at
    /// that point; no partial boolean is reported.
    pub fn eval(&self, subject: &P::Subject<'_>) -> Result<bool, P::Error>
    where
        P: PredicateEval,
    {
        let mut trace = NoopTrace;
        self.eval_with_trace(subject, &mut trace)
    }

    /// Evaluates this requirement, reporting every predicate outcome to `trace`.
    ///
    /// # Errors
    ///
    /// Returns the first error raised by a predicate leaf.
    pub fn eval_with_trace<T>(
        &self,
        subject: &P::Subject<'_>,
        trace: &mut T,
    ) -> Result<bool, P::Error>
    where
        P: PredicateEval,
        T: RequirementTrace<P>,
    {
        match self {
            Self::Predicate(predicate) => {
                let result = predicate.eval(subject)?;
                trace.on_predicate_evaluated(predicate, result);
                Ok(result)
            }

            Self::Not(requirement) => Ok(!requirement.eval_with_trace(subject, trace)?),

            Self::And(requirements) => {
                for req in requirements {
                    if !req.eval_with_trace(subject, trace)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }

            Self::Or(requirements) => {
                trace.on_alternatives_entered();
                let mut satisfied = false;
                for req in requirements {
                    if req.eval_with_trace(subject, trace)? {
                        satisfied = true;
                        break;
                    }
                }
                trace.on_alternatives_exited(satisfied);
                Ok(satisfied)
            }

            Self::RequireGroup {
                min,
                reqs,
            } => {
                trace.on_alternatives_entered();
                let satisfied = Self::eval_group(usize::from(*min), reqs, subject, trace)?;
                trace.on_alternatives_exited(satisfied);
                Ok(satisfied)
            }
        }
    }

    /// Evaluates a `RequireGroup` body, stopping once the outcome is decided.
    fn eval_group<T>(
        needed: usize,
        reqs: &[Box<Self>],
        subject: &P::Subject<'_>,
        trace: &mut T,
    ) -> Result<bool, P::Error>
    where
        P: PredicateEval,
        T: RequirementTrace<P>,
    {
        let mut satisfied = 0usize;
        let mut remaining = reqs.len();

        if satisfied >= needed {
            return Ok(true);
        }

        for req in reqs {
            if req.eval_with_trace(subject, trace)? {
                satisfied += 1;
                if satisfied >= needed {
                    return Ok(true);
                }
            }

            remaining = remaining.saturating_sub(1);
            // Impossible to reach `min` even if everything left passes.
            if satisfied + remaining < needed {
                return Ok(false);
            }
        }

        Ok(satisfied >= needed)
    }

    /// Determines if this requirement is trivially satisfied
    pub fn is_trivially_satisfied(&self) -> bool {
        match self {
            Self::And(reqs) => reqs.iter().all(|r| r.is_trivially_satisfied()),
            Self::Or(reqs) => reqs.iter().any(|r| r.is_trivially_satisfied()),
            Self::Not(req) => req.is_trivially_unsatisfiable(),
            Self::RequireGroup {
                min,
                reqs,
            } => reqs.iter().filter(|r| r.is_trivially_satisfied()).count() >= usize::from(*min),
            Self::Predicate(_) => false,
        }
    }

    /// Determines if this requirement is trivially unsatisfiable
    pub fn is_trivially_unsatisfiable(&self) -> bool {
        match self {
            Self::And(reqs) => reqs.iter().any(|r| r.is_trivially_unsatisfiable()),
            Self::Or(reqs) => reqs.iter().all(|r| r.is_trivially_unsatisfiable()),
            Self::Not(req) => req.is_trivially_satisfied(),
            Self::RequireGroup {
                min,
                reqs,
            } => {
                let unsatisfiable = reqs.iter().filter(|r| r.is_trivially_unsatisfiable()).count();
                reqs.len() - unsatisfiable < usize::from(*min)
            }
            Self::Predicate(_) => false,
        }
    }

    /// Returns the number of nodes in this requirement tree
    pub fn complexity(&self) -> usize {
        match self {
            Self::Predicate(_) => 1,
            Self::Not(req) => 1 + req.complexity(),
            Self::And(reqs) | Self::Or(reqs) => {
                1 + reqs.iter().map(|r| r.complexity()).sum::<usize>()
            }
            Self::RequireGroup {
                reqs, ..
            } => 1 + reqs.iter().map(|r| r.complexity()).sum::<usize>(),
        }
    }

    /// Visits every predicate leaf in left-to-right order.
    pub fn for_each_predicate<F>(&self, visit: &mut F)
    where
        F: FnMut(&P),
    {
        match self {
            Self::Predicate(predicate) => visit(predicate),
            Self::Not(req) => req.for_each_predicate(visit),
            Self::And(reqs) | Self::Or(reqs) => {
                for req in reqs {
                    req.for_each_predicate(visit);
                }
            }
            Self::RequireGroup {
                reqs, ..
            } => {
                for req in reqs {
                    req.for_each_predicate(visit);
                }
            }
        }
    }
}

// ============================================================================
// SECTION: Constructor Helpers
// ============================================================================

impl<P> Requirement<P> {
    /// Creates a logical AND of the given requirements
    pub fn and(requirements: Vec<Self>) -> Self {
        Self::And(requirements.into_iter().map(Box::new).collect())
    }

    /// Creates a logical OR of the given requirements
    pub fn or(requirements: Vec<Self>) -> Self {
        Self::Or(requirements.into_iter().map(Box::new).collect())
    }

    /// Creates a logical NOT of the given requirement
    pub fn negate(requirement: Self) -> Self {
        Self::Not(Box::new(requirement))
    }

    /// Creates a group requirement with minimum satisfaction count
    pub fn require_group(min: u8, requirements: Vec<Self>) -> Self {
        Self::RequireGroup {
            min,
            reqs: requirements.into_iter().map(Box::new).collect(),
        }
    }

    /// Creates a requirement from a predicate
    pub const fn predicate(predicate: P) -> Self {
        Self::Predicate(predicate)
    }

    /// The constant `true` (an empty conjunction).
    #[must_use]
    pub fn always() -> Self {
        Self::And(SmallVec::new())
    }

    /// The constant `false` (an empty disjunction).
    #[must_use]
    pub fn never() -> Self {
        Self::Or(SmallVec::new())
    }
}

impl<P> std::ops::Not for Requirement<P> {
    type Output = Self;

    fn not(self) -> Self::Output {
        Self::Not(Box::new(self))
    }
}

// ============================================================================
// SECTION: Default Implementations
// ============================================================================

impl<P> Default for Requirement<P> {
    /// Creates an empty And requirement (trivially satisfied)
    fn default() -> Self {
        Self::always()
    }
}

// ============================================================================
// SECTION: Rendering
// ============================================================================

impl<P: fmt::Display> fmt::Display for Requirement<P> {
    /// Renders the tree back into DSL text that parses to an equal tree.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Predicate(predicate) => write!(f, "{predicate}"),
            Self::Not(req) => write!(f, "not({req})"),
            Self::And(reqs) if reqs.is_empty() => f.write_str("true"),
            Self::Or(reqs) if reqs.is_empty() => f.write_str("false"),
            Self::And(reqs) => write_call(f, "all", None, reqs),
            Self::Or(reqs) => write_call(f, "any", None, reqs),
            Self::RequireGroup {
                min,
                reqs,
            } => write_call(f, "at_least", Some(*min), reqs),
        }
    }
}

/// Writes `name(min, a, b, ...)` for composite nodes.
fn write_call<P: fmt::Display>(
    f: &mut fmt::Formatter<'_>,
    name: &str,
    min: Option<u8>,
    reqs: &[Box<Requirement<P>>],
) -> fmt::Result {
    write!(f, "{name}(")?;
    let mut first = true;
    if let Some(min) = min {
        write!(f, "{min}")?;
        first = false;
    }
    for req in reqs {
        if !first {
            f.write_str(", ")?;
        }
        write!(f, "{req}")?;
        first = false;
    }
    f.write_str(")")
}
