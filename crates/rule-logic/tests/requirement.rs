// crates/rule-logic/tests/requirement.rs
// ============================================================================
// Module: Core Requirement Tests
// Description: Evaluation, short-circuiting, tracing, and analysis helpers.
// ============================================================================
//! ## Overview
//! Integration tests for requirement evaluation paths.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

mod support;

use proptest::prelude::*;
use rule_logic::FirstFailureTrace;
use rule_logic::Requirement;
use rule_logic::convenience;
use support::Check;
use support::TestResult;
use support::ensure;

// ========================================================================
// SECTION: Evaluation
// ========================================================================

#[test]
fn and_short_circuits_before_broken_predicate() -> TestResult {
    let req = Requirement::and(vec![
        Requirement::predicate(Check::AtLeast(10)),
        Requirement::predicate(Check::Broken("unreachable")),
    ]);
    ensure(req.eval(&3) == Ok(false), "Expected AND to stop at the first false member")?;
    ensure(
        req.eval(&12) == Err("unreachable".to_string()),
        "Expected the broken member to surface once reached",
    )
}

#[test]
fn or_short_circuits_before_broken_predicate() -> TestResult {
    let req = Requirement::or(vec![
        Requirement::predicate(Check::Even),
        Requirement::predicate(Check::Broken("unreachable")),
    ]);
    ensure(req.eval(&4) == Ok(true), "Expected OR to stop at the first true member")?;
    ensure(req.eval(&5).is_err(), "Expected the broken member to surface once reached")
}

#[test]
fn not_propagates_errors_instead_of_inverting_them() -> TestResult {
    let req = Requirement::negate(Requirement::predicate(Check::Broken("boom")));
    ensure(req.eval(&0) == Err("boom".to_string()), "Expected NOT to pass errors through")
}

#[test]
fn group_counts_satisfied_members() -> TestResult {
    let req = convenience::at_least(
        2,
        vec![
            convenience::predicate(Check::Even),
            convenience::predicate(Check::AtLeast(5)),
            convenience::predicate(Check::AtLeast(100)),
        ],
    );
    ensure(req.eval(&6)?, "Expected even and >= 5 to satisfy two members")?;
    ensure(!req.eval(&7)?, "Expected only one member to pass for 7")?;
    ensure(!req.eval(&2)?, "Expected only one member to pass for 2")
}

#[test]
fn group_stops_once_minimum_is_unreachable() -> TestResult {
    let req = Requirement::require_group(
        2,
        vec![
            Requirement::predicate(Check::AtLeast(10)),
            Requirement::predicate(Check::AtLeast(20)),
            Requirement::predicate(Check::Broken("late")),
        ],
    );
    ensure(req.eval(&1) == Ok(false), "Expected early exit when two misses leave one member")
}

#[test]
fn constants_evaluate_without_predicates() -> TestResult {
    ensure(Requirement::<Check>::always().eval(&0)?, "Expected `true` to hold")?;
    ensure(!Requirement::<Check>::never().eval(&0)?, "Expected `false` to fail")
}

#[test]
fn first_failure_trace_records_earliest_false_leaf() -> TestResult {
    let req = Requirement::and(vec![
        Requirement::predicate(Check::AtLeast(0)),
        Requirement::predicate(Check::Even),
        Requirement::predicate(Check::AtLeast(100)),
    ]);
    let mut trace = FirstFailureTrace::new();
    let passed = req.eval_with_trace(&3, &mut trace)?;
    ensure(!passed, "Expected 3 to fail the conjunction")?;
    ensure(
        trace.into_first_failure() == Some(Check::Even),
        "Expected the odd check to be the first failure",
    )
}

#[test]
fn first_failure_trace_drops_failures_inside_satisfied_alternatives() -> TestResult {
    let req = Requirement::and(vec![
        Requirement::or(vec![
            Requirement::predicate(Check::Even),
            Requirement::predicate(Check::AtLeast(3)),
        ]),
        Requirement::predicate(Check::AtLeast(100)),
    ]);
    let mut trace = FirstFailureTrace::new();
    ensure(!req.eval_with_trace(&5, &mut trace)?, "Expected 5 to fail the conjunction")?;
    ensure(
        trace.into_first_failure() == Some(Check::AtLeast(100)),
        "Expected the leaf that sank the rule, not the rescued branch",
    )
}

#[test]
fn first_failure_trace_keeps_failures_of_unsatisfied_alternatives() -> TestResult {
    let req = Requirement::require_group(
        2,
        vec![
            Requirement::predicate(Check::Even),
            Requirement::predicate(Check::AtLeast(3)),
            Requirement::predicate(Check::AtLeast(100)),
        ],
    );
    let mut trace = FirstFailureTrace::new();
    ensure(!req.eval_with_trace(&5, &mut trace)?, "Expected the group to fall short")?;
    ensure(
        trace.into_first_failure() == Some(Check::Even),
        "Expected the earliest failure of a failed group",
    )
}

#[test]
fn first_failure_trace_is_empty_on_success() -> TestResult {
    let req = Requirement::predicate(Check::AtLeast(1));
    let mut trace = FirstFailureTrace::new();
    ensure(req.eval_with_trace(&5, &mut trace)?, "Expected success")?;
    ensure(trace.first_failure().is_none(), "Expected no recorded failure")
}

// ========================================================================
// SECTION: Analysis
// ========================================================================

#[test]
fn trivial_analysis_matches_constants() -> TestResult {
    let always = Requirement::<Check>::always();
    let never = Requirement::<Check>::never();
    ensure(always.is_trivially_satisfied(), "Expected `true` to be trivially satisfied")?;
    ensure(never.is_trivially_unsatisfiable(), "Expected `false` to be trivially unsatisfiable")?;
    ensure(
        (!never).is_trivially_satisfied(),
        "Expected `not false` to be trivially satisfied",
    )?;
    ensure(
        !Requirement::predicate(Check::Even).is_trivially_satisfied(),
        "Expected a predicate to never be trivial",
    )
}

#[test]
fn complexity_and_leaf_visit_order() -> TestResult {
    let req = Requirement::or(vec![
        Requirement::predicate(Check::AtLeast(1)),
        Requirement::negate(Requirement::predicate(Check::Even)),
    ]);
    ensure(req.complexity() == 4, "Expected or + leaf + not + leaf")?;
    let mut seen = Vec::new();
    req.for_each_predicate(&mut |p: &Check| seen.push(p.clone()));
    ensure(seen == vec![Check::AtLeast(1), Check::Even], "Expected left-to-right leaf order")
}

// ========================================================================
// SECTION: Properties
// ========================================================================

proptest! {
    #[test]
    fn double_negation_is_identity(value in any::<i64>(), min in any::<i64>()) {
        let leaf = Requirement::predicate(Check::AtLeast(min));
        let doubled = Requirement::negate(Requirement::negate(leaf.clone()));
        prop_assert_eq!(leaf.eval(&value), doubled.eval(&value));
    }

    #[test]
    fn group_of_one_matches_any(value in any::<i64>(), a in any::<i64>(), b in any::<i64>()) {
        let members = vec![
            Requirement::predicate(Check::AtLeast(a)),
            Requirement::predicate(Check::AtLeast(b)),
        ];
        let group = Requirement::require_group(1, members.clone());
        let any = Requirement::or(members);
        prop_assert_eq!(group.eval(&value), any.eval(&value));
    }
}
