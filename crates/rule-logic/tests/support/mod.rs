// crates/rule-logic/tests/support/mod.rs
// ============================================================================
// Module: Test Support
// Description: Shared result helpers and mock predicates for rule tree tests.
// ============================================================================
//! ## Overview
//! Shared test helpers for consistent Result-based assertions, plus a tiny
//! predicate type evaluated against an integer subject.

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

use rule_logic::PredicateEval;

// ========================================================================
// Test Result Helpers
// ========================================================================

/// Standard result type used across rule tree integration tests.
pub type TestResult<T = ()> = Result<T, Box<dyn Error>>;

/// Lightweight error type for test assertions.
#[derive(Debug)]
struct TestError {
    /// Human-readable failure message.
    message: String,
}

impl TestError {
    /// Creates a new test error with the provided message.
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
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
    if condition { Ok(()) } else { Err(Box::new(TestError::new(message))) }
}

/// Returns a formatted test failure.
///
/// # Errors
/// Always returns a `TestError`.
pub fn fail<T>(message: impl Into<String>) -> TestResult<T> {
    Err(Box::new(TestError::new(message)))
}

// ========================================================================
// Mock Predicates
// ========================================================================

/// Predicate over an `i64` subject.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Check {
    /// Subject is at least the threshold.
    AtLeast(i64),
    /// Subject is even.
    Even,
    /// Always errors with the given label.
    Broken(&'static str),
}

impl fmt::Display for Check {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AtLeast(min) => write!(f, "AtLeast({min})"),
            Self::Even => f.write_str("Even"),
            Self::Broken(label) => write!(f, "Broken('{label}')"),
        }
    }
}

impl PredicateEval for Check {
    type Subject<'a> = i64;
    type Error = String;

    fn eval(&self, subject: &i64) -> Result<bool, String> {
        match self {
            Self::AtLeast(min) => Ok(subject >= min),
            Self::Even => Ok(subject % 2 == 0),
            Self::Broken(label) => Err((*label).to_string()),
        }
    }
}
