// crates/form-gate/src/audit.rs
// ============================================================================
// Module: Form Gate Audit Logging
// Description: Structured audit events for rule publication and validation.
// Purpose: Emit JSON-line audit records without a hard logging dependency.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! Two events exist: one when a rule table is published to a validator and one
//! per validation call. Events carry counts, names, and outcome labels only;
//! payload contents and rendered messages are never logged. Sinks are
//! pluggable so deployments can route events into their own pipeline.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::File;
use std::fs::OpenOptions;
use std::io;
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use serde::Serialize;

// ============================================================================
// SECTION: Events
// ============================================================================

/// Returns milliseconds since the Unix epoch.
fn now_ms() -> u128 {
    SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_millis()
}

/// Rule table publication event.
#[derive(Debug, Clone, Serialize)]
pub struct RuleTableAuditEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// Number of forms in the table.
    pub forms: usize,
    /// Number of compiled rules across all forms.
    pub rules: usize,
}

impl RuleTableAuditEvent {
    /// Creates a publication event with a consistent timestamp.
    #[must_use]
    pub fn new(forms: usize, rules: usize) -> Self {
        Self {
            event: "rule_table_published",
            timestamp_ms: now_ms(),
            forms,
            rules,
        }
    }
}

/// Validation call event.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationAuditEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// Form name requested.
    pub form: String,
    /// Outcome label: `valid`, `invalid`, `unparsable`, or `error`.
    pub outcome: &'static str,
    /// Field whose rule failed or errored.
    pub field: Option<String>,
    /// Normalized error kind label for `error` outcomes.
    pub error_kind: Option<&'static str>,
    /// Request body size in bytes as read.
    pub request_bytes: usize,
}

/// Inputs required to construct a validation audit event.
pub struct ValidationAuditEventParams {
    /// Form name requested.
    pub form: String,
    /// Outcome label.
    pub outcome: &'static str,
    /// Field whose rule failed or errored.
    pub field: Option<String>,
    /// Normalized error kind label.
    pub error_kind: Option<&'static str>,
    /// Request body size in bytes as read.
    pub request_bytes: usize,
}

impl ValidationAuditEvent {
    /// Creates a validation event with a consistent timestamp.
    #[must_use]
    pub fn new(params: ValidationAuditEventParams) -> Self {
        Self {
            event: "form_validation",
            timestamp_ms: now_ms(),
            form: params.form,
            outcome: params.outcome,
            field: params.field,
            error_kind: params.error_kind,
            request_bytes: params.request_bytes,
        }
    }
}

// ============================================================================
// SECTION: Trait
// ============================================================================

/// Audit sink for form gate events.
pub trait AuditSink: Send + Sync {
    /// Record a rule table publication.
    fn record_rule_table(&self, event: &RuleTableAuditEvent);

    /// Record a validation call.
    fn record_validation(&self, event: &ValidationAuditEvent);
}

/// Audit sink that drops every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopAuditSink;

impl AuditSink for NoopAuditSink {
    fn record_rule_table(&self, _event: &RuleTableAuditEvent) {}

    fn record_validation(&self, _event: &ValidationAuditEvent) {}
}

/// Audit sink that logs JSON lines to stderr.
#[derive(Debug, Clone, Copy, Default)]
pub struct StderrAuditSink;

impl StderrAuditSink {
    /// Writes one serialized event line to stderr.
    fn emit<T: Serialize>(event: &T) {
        if let Ok(payload) = serde_json::to_string(event) {
            let _ = writeln!(io::stderr(), "{payload}");
        }
    }
}

impl AuditSink for StderrAuditSink {
    fn record_rule_table(&self, event: &RuleTableAuditEvent) {
        Self::emit(event);
    }

    fn record_validation(&self, event: &ValidationAuditEvent) {
        Self::emit(event);
    }
}

/// Audit sink that appends JSON lines to a file.
#[derive(Debug)]
pub struct FileAuditSink {
    /// File handle used for append-only logging.
    file: Mutex<File>,
}

impl FileAuditSink {
    /// Opens the audit log file in append mode.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened.
    pub fn new(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }

    /// Appends one serialized event line and flushes.
    fn emit<T: Serialize>(&self, event: &T) {
        if let Ok(payload) = serde_json::to_string(event)
            && let Ok(mut file) = self.file.lock()
        {
            let _ = writeln!(file, "{payload}");
            let _ = file.flush();
        }
    }
}

impl AuditSink for FileAuditSink {
    fn record_rule_table(&self, event: &RuleTableAuditEvent) {
        self.emit(event);
    }

    fn record_validation(&self, event: &ValidationAuditEvent) {
        self.emit(event);
    }
}
