// crates/form-gate/tests/support/mod.rs
// ============================================================================
// Module: Test Support
// Description: Shared result helpers, fixtures, and a recording audit sink.
// ============================================================================
//! ## Overview
//! Result-based assertion helpers, the shared rule fixture, and an audit sink
//! that keeps every event in memory for inspection.

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
use std::path::PathBuf;
use std::sync::Mutex;

use form_gate::AuditSink;
use form_gate::RuleTable;
use form_gate::RuleTableAuditEvent;
use form_gate::ValidationAuditEvent;

// ========================================================================
// Test Result Helpers
// ========================================================================

/// Standard result type used across form gate integration tests.
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
// Fixtures
// ========================================================================

/// Path to the shared rule fixture.
pub fn fixture_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/rules.toml")
}

/// Loads the shared rule fixture.
pub fn fixture_table() -> RuleTable {
    RuleTable::load(&fixture_path()).unwrap()
}

// ========================================================================
// Recording Audit Sink
// ========================================================================

/// Audit sink that keeps serialized events in memory.
#[derive(Default)]
pub struct RecordingSink {
    /// Serialized events in arrival order.
    events: Mutex<Vec<serde_json::Value>>,
}

impl RecordingSink {
    /// Returns a snapshot of recorded events.
    pub fn events(&self) -> Vec<serde_json::Value> {
        self.events.lock().unwrap().clone()
    }
}

impl AuditSink for RecordingSink {
    fn record_rule_table(&self, event: &RuleTableAuditEvent) {
        self.events.lock().unwrap().push(serde_json::to_value(event).unwrap());
    }

    fn record_validation(&self, event: &ValidationAuditEvent) {
        self.events.lock().unwrap().push(serde_json::to_value(event).unwrap());
    }
}
