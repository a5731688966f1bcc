// crates/form-gate-core/tests/support/mod.rs
// ============================================================================
// Module: Test Support
// Description: Shared result helpers and rule evaluation shortcuts.
// ============================================================================
//! ## Overview
//! Result-based assertion helpers plus a fixed clock and a one-call way to
//! compile rule text and evaluate it against a single value.

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
    dead_code,
    reason = "Test-only output and panic-based assertions are permitted."
)]

use std::error::Error;
use std::fmt;

use form_gate_core::Capability;
use form_gate_core::CapabilityResolver;
use form_gate_core::EvaluationContext;
use form_gate_core::FieldValue;
use form_gate_core::PredicateError;
use rule_logic::Requirement;
use rule_logic::parse_requirement;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

// ========================================================================
// Test Result Helpers
// ========================================================================

/// Standard result type used across core integration tests.
pub type TestResult<T = ()> = Result<T, Box<dyn Error>>;

/// Lightweight error type for test assertions.
#[derive(Debug)]
struct TestError {
    /// Human-readable failure message.
    message: String,
}

impl fmt::Display for TestError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.message)
    }
}

impl Error for TestError {}

/// Returns an error when a test condition fails.
///
/// # Errors
/// Returns a `TestError` when the condition is false.
pub fn ensure(condition: bool, message: impl Into<String>) -> TestResult {
    if condition {
        Ok(())
    } else {
        Err(Box::new(TestError {
            message: message.into(),
        }))
    }
}

/// Returns a formatted test failure.
///
/// # Errors
/// Always returns a `TestError`.
pub fn fail<T>(message: impl Into<String>) -> TestResult<T> {
    Err(Box::new(TestError {
        message: message.into(),
    }))
}

// ========================================================================
// Rule Helpers
// ========================================================================

/// Fixed evaluation clock: 2026-01-01T00:00:00Z.
pub fn fixed_now() -> OffsetDateTime {
    OffsetDateTime::parse("2026-01-01T00:00:00Z", &Rfc3339).unwrap()
}

/// Compiles rule text against the capability catalogue.
pub fn compile(rule: &str) -> Requirement<Capability> {
    parse_requirement(rule, &CapabilityResolver)
        .unwrap_or_else(|err| panic!("rule `{rule}` failed to compile: {err}"))
}

/// Compiles `rule` and evaluates it against `value` with the fixed clock.
pub fn check(rule: &str, value: &FieldValue) -> Result<bool, PredicateError> {
    compile(rule).eval(&EvaluationContext::with_clock(value, fixed_now()))
}

/// Shorthand for a string field value.
pub fn text(value: &str) -> FieldValue {
    FieldValue::from(value)
}
