// crates/rule-logic/src/tests.rs
// ============================================================================
// Module: Rule Logic Test Lint Configuration
// Description: Shared test-only lint relaxations for rule-logic unit tests.
// Purpose: Allow panic-based assertions and debug output in tests.
// Dependencies: rule-logic
// ============================================================================

//! ## Overview
//! Provides test-only lint relaxations and a handful of unit tests that need
//! access to crate-private lexer details.

// ============================================================================
// SECTION: Lint Configuration
// ============================================================================

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

use crate::dsl::DslError;
use crate::dsl::parse_requirement;
use crate::literal::Literal;
use crate::requirement::Requirement;

/// Resolver that accepts any call and records it as `(name, args)`.
fn echo(call: &crate::dsl::PredicateCall<'_>) -> Result<(String, Vec<Literal>), crate::ResolveError> {
    Ok((call.name.to_string(), call.args.to_vec()))
}

#[test]
fn negative_and_float_literals_lex_as_operands() {
    let req = parse_requirement("Between(-3, 2.5)", &echo).unwrap();
    assert_eq!(
        req,
        Requirement::predicate((
            "Between".to_string(),
            vec![Literal::Int(-3), Literal::Float(2.5)]
        ))
    );
}

#[test]
fn unterminated_string_reports_start_position() {
    let err = parse_requirement("Contains('abc", &echo).unwrap_err();
    assert_eq!(
        err,
        DslError::UnterminatedString {
            position: 9
        }
    );
}

#[test]
fn escaped_quotes_stay_inside_string_literal() {
    let req = parse_requirement(r#"Contains("a\"b")"#, &echo).unwrap();
    assert_eq!(
        req,
        Requirement::predicate(("Contains".to_string(), vec![Literal::Str("a\"b".to_string())]))
    );
}
