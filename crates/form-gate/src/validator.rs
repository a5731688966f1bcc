// crates/form-gate/src/validator.rs
// ============================================================================
// Module: Form Validator
// Description: Per-request evaluation of compiled rules over a JSON payload.
// Purpose: Decode one request body, run the form's rules in declaration order,
//          and report the first failure.
// Dependencies: form-gate-core, rule-logic, serde_json, thiserror,
//               crate::{audit, config, rules}
// ============================================================================

//! ## Overview
//! A [`FormValidator`] owns an immutable [`RuleTable`] and is shared across
//! threads by reference. Each call:
//! 1. reads at most `max_payload_bytes + 1` bytes and decodes a JSON object;
//!    any read, size, syntax, or root-shape failure yields
//!    [`ValidationOutcome::Unparsable`], whatever form was named;
//! 2. looks up the form (an unknown form is an error, not a pass);
//! 3. evaluates each rule in declaration order. Whole-record rules see the
//!    entire payload; field rules see their field and are skipped only when
//!    the field is absent. An explicit `null` is evaluated like any value;
//! 4. stops at the first rule that evaluates to `false`.
//!
//! Predicate errors abort the call as [`EvaluationError`]; they are never
//! reported as a validation failure.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Read;
use std::sync::Arc;

use form_gate_core::Capability;
use form_gate_core::DecodeOptions;
use form_gate_core::EvaluationContext;
use form_gate_core::FieldValue;
use form_gate_core::PredicateError;
use rule_logic::FirstFailureTrace;
use serde_json::Value;
use thiserror::Error;

use crate::audit::AuditSink;
use crate::audit::NoopAuditSink;
use crate::audit::RuleTableAuditEvent;
use crate::audit::ValidationAuditEvent;
use crate::audit::ValidationAuditEventParams;
use crate::config::ConfigError;
use crate::config::DEFAULT_MAX_PAYLOAD_BYTES;
use crate::config::FormGateConfig;
use crate::rules::CompiledRule;
use crate::rules::RuleScope;
use crate::rules::RuleTable;

// ============================================================================
// SECTION: Outcomes and Errors
// ============================================================================

/// Fixed message for request bodies that cannot be decoded.
pub const UNPARSABLE_MESSAGE: &str = "request payload could not be parsed";

/// Result of validating one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationOutcome {
    /// Every applicable rule passed.
    Valid,
    /// A rule evaluated to `false`.
    Invalid {
        /// Field the failing rule is declared under.
        field: String,
        /// Rendered failure message.
        message: String,
    },
    /// The body was not a JSON object within the size limit.
    Unparsable,
}

impl ValidationOutcome {
    /// Returns the message for this outcome; empty on success.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Valid => "",
            Self::Invalid {
                message,
                ..
            } => message,
            Self::Unparsable => UNPARSABLE_MESSAGE,
        }
    }

    /// Returns true when every applicable rule passed.
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }

    /// Returns the audit label for this outcome.
    const fn label(&self) -> &'static str {
        match self {
            Self::Valid => "valid",
            Self::Invalid { .. } => "invalid",
            Self::Unparsable => "unparsable",
        }
    }
}

/// Errors that abort a validation call.
#[derive(Debug, Error)]
pub enum EvaluationError {
    /// No rules are registered under the requested form.
    #[error("unknown form `{0}`")]
    UnknownForm(String),
    /// A predicate could not be applied to the value it was given.
    #[error("rule `{form}.{field}` failed to evaluate: {source}")]
    Predicate {
        /// Form name.
        form: String,
        /// Field name of the rule.
        field: String,
        /// Underlying predicate error.
        source: PredicateError,
    },
}

impl EvaluationError {
    /// Returns a stable label for audit records.
    const fn kind(&self) -> &'static str {
        match self {
            Self::UnknownForm(_) => "unknown_form",
            Self::Predicate {
                source,
                ..
            } => match source {
                PredicateError::UnsupportedKind { .. } => "unsupported_kind",
                PredicateError::MissingOperand { .. } => "missing_operand",
                PredicateError::InvalidOperand { .. } => "invalid_operand",
                PredicateError::IncomparableKinds { .. } => "incomparable_kinds",
                PredicateError::Pattern { .. } => "pattern",
            },
        }
    }

    /// Returns the field the error is attributed to.
    fn field(&self) -> Option<String> {
        match self {
            Self::UnknownForm(_) => None,
            Self::Predicate {
                field,
                ..
            } => Some(field.clone()),
        }
    }
}

// ============================================================================
// SECTION: Validator
// ============================================================================

/// Request decoding options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidatorOptions {
    /// Maximum request body size in bytes.
    pub max_payload_bytes: usize,
    /// JSON to value decoding options.
    pub decode: DecodeOptions,
}

impl Default for ValidatorOptions {
    fn default() -> Self {
        Self {
            max_payload_bytes: DEFAULT_MAX_PAYLOAD_BYTES,
            decode: DecodeOptions::default(),
        }
    }
}

/// Evaluates compiled rule tables against request bodies.
///
/// # Invariants
/// - The rule table is never mutated after construction.
pub struct FormValidator {
    /// Compiled rules per form.
    table: RuleTable,
    /// Decoding limits and options.
    options: ValidatorOptions,
    /// Audit sink for publication and per-call events.
    audit: Arc<dyn AuditSink>,
}

impl FormValidator {
    /// Creates a validator with default options and no audit output.
    #[must_use]
    pub fn new(table: RuleTable) -> Self {
        Self::with_audit(table, ValidatorOptions::default(), Arc::new(NoopAuditSink))
    }

    /// Creates a validator and records the table publication on `audit`.
    #[must_use]
    pub fn with_audit(
        table: RuleTable,
        options: ValidatorOptions,
        audit: Arc<dyn AuditSink>,
    ) -> Self {
        audit.record_rule_table(&RuleTableAuditEvent::new(table.form_count(), table.rule_count()));
        Self {
            table,
            options,
            audit,
        }
    }

    /// Builds a validator from engine configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the rule file fails to load or the audit
    /// sink cannot be opened.
    pub fn from_config(config: &FormGateConfig) -> Result<Self, ConfigError> {
        let table = RuleTable::load(&config.rules_path())?;
        let audit = config.audit_sink()?;
        let options = ValidatorOptions {
            max_payload_bytes: config.payload.max_bytes,
            decode: DecodeOptions {
                rfc3339_timestamps: config.payload.rfc3339_timestamps,
            },
        };
        Ok(Self::with_audit(table, options, audit))
    }

    /// Returns the compiled rule table.
    #[must_use]
    pub const fn table(&self) -> &RuleTable {
        &self.table
    }

    /// Validates one request body against the rules of `form`.
    ///
    /// # Errors
    ///
    /// Returns [`EvaluationError`] for unknown forms and predicate failures.
    pub fn validate<R: Read>(
        &self,
        form: &str,
        reader: R,
    ) -> Result<ValidationOutcome, EvaluationError> {
        let mut request_bytes = 0;
        let result = self.evaluate(form, reader, &mut request_bytes);
        let params = match &result {
            Ok(outcome) => ValidationAuditEventParams {
                form: form.to_string(),
                outcome: outcome.label(),
                field: match outcome {
                    ValidationOutcome::Invalid {
                        field,
                        ..
                    } => Some(field.clone()),
                    ValidationOutcome::Valid | ValidationOutcome::Unparsable => None,
                },
                error_kind: None,
                request_bytes,
            },
            Err(err) => ValidationAuditEventParams {
                form: form.to_string(),
                outcome: "error",
                field: err.field(),
                error_kind: Some(err.kind()),
                request_bytes,
            },
        };
        self.audit.record_validation(&ValidationAuditEvent::new(params));
        result
    }

    /// Validates one request body and returns its message; `""` means success.
    ///
    /// # Errors
    ///
    /// Returns [`EvaluationError`] for unknown forms and predicate failures.
    pub fn validate_message<R: Read>(
        &self,
        form: &str,
        reader: R,
    ) -> Result<String, EvaluationError> {
        self.validate(form, reader).map(|outcome| outcome.message().to_string())
    }

    /// Runs the form's rules without auditing.
    fn evaluate<R: Read>(
        &self,
        form: &str,
        reader: R,
        request_bytes: &mut usize,
    ) -> Result<ValidationOutcome, EvaluationError> {
        let Some(payload) = self.decode(reader, request_bytes) else {
            return Ok(ValidationOutcome::Unparsable);
        };
        let Some(fields) = payload.as_record() else {
            return Ok(ValidationOutcome::Unparsable);
        };
        let rules = self
            .table
            .form(form)
            .ok_or_else(|| EvaluationError::UnknownForm(form.to_string()))?;

        for rule in rules {
            let subject = match rule.scope() {
                RuleScope::Record => &payload,
                RuleScope::Field => match fields.get(rule.field()) {
                    None => continue,
                    Some(value) => value,
                },
            };
            if let Some(detail) = run_rule(form, rule, subject)? {
                return Ok(ValidationOutcome::Invalid {
                    field: rule.field().to_string(),
                    message: rule.message().render(&detail),
                });
            }
        }
        Ok(ValidationOutcome::Valid)
    }

    /// Reads and decodes a JSON object body, or `None` when that fails.
    fn decode<R: Read>(&self, reader: R, request_bytes: &mut usize) -> Option<FieldValue> {
        let limit = u64::try_from(self.options.max_payload_bytes).unwrap_or(u64::MAX);
        let mut body = Vec::new();
        let read = reader.take(limit.saturating_add(1)).read_to_end(&mut body);
        *request_bytes = body.len();
        if read.is_err() || body.len() > self.options.max_payload_bytes {
            return None;
        }
        let value: Value = serde_json::from_slice(&body).ok()?;
        value.is_object().then(|| FieldValue::from_json(&value, self.options.decode))
    }
}

/// Evaluates one rule; returns the failure detail when it does not hold.
fn run_rule(
    form: &str,
    rule: &CompiledRule,
    subject: &FieldValue,
) -> Result<Option<String>, EvaluationError> {
    let context = EvaluationContext::new(subject);
    let mut trace = FirstFailureTrace::<Capability>::new();
    let passed = rule.requirement().eval_with_trace(&context, &mut trace).map_err(|source| {
        EvaluationError::Predicate {
            form: form.to_string(),
            field: rule.field().to_string(),
            source,
        }
    })?;
    if passed {
        return Ok(None);
    }
    Ok(Some(trace.first_failure().map(ToString::to_string).unwrap_or_default()))
}
