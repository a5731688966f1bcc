// crates/form-gate/tests/validator.rs
// ============================================================================
// Module: Form Validator Tests
// Description: End-to-end validation of request bodies against rule files.
// ============================================================================
//! ## Overview
//! Drives the validator with raw JSON bodies and checks messages, outcomes,
//! error classes, and audit output.

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

use std::sync::Arc;
use std::thread;

use form_gate::EvaluationError;
use form_gate::FormValidator;
use form_gate::RuleTable;
use form_gate::UNPARSABLE_MESSAGE;
use form_gate::ValidationOutcome;
use form_gate::ValidatorOptions;
use form_gate_core::DecodeOptions;
use form_gate_core::PredicateError;
use support::RecordingSink;
use support::TestResult;
use support::ensure;
use support::fail;
use support::fixture_table;

/// Validates `body` against `form` with a fresh fixture validator.
fn message(form: &str, body: &str) -> Result<String, EvaluationError> {
    FormValidator::new(fixture_table()).validate_message(form, body.as_bytes())
}

// ========================================================================
// SECTION: Scenarios
// ========================================================================

#[test]
fn short_password_fails_and_long_password_passes() -> TestResult {
    ensure(message("login", r#"{"password":"abc"}"#)? == "password too short", "Expected A fail")?;
    ensure(message("login", r#"{"password":"abcdefgh"}"#)?.is_empty(), "Expected A pass")
}

#[test]
fn email_format_is_enforced() -> TestResult {
    ensure(message("signup", r#"{"email":"not-an-email"}"#)? == "invalid email", "Expected B fail")?;
    ensure(message("signup", r#"{"email":"a@b.com"}"#)?.is_empty(), "Expected B pass")
}

#[test]
fn whole_record_rule_compares_fields() -> TestResult {
    ensure(
        message("signup", r#"{"a":"x","b":"x"}"#)? == "a and b must differ",
        "Expected the cross-field rule to fail",
    )?;
    ensure(message("signup", r#"{"a":"x","b":"y"}"#)?.is_empty(), "Expected distinct fields")
}

#[test]
fn absent_fields_are_skipped() -> TestResult {
    ensure(message("signup", "{}")?.is_empty(), "Expected an empty body to pass")?;
    ensure(message("login", r#"{"other":"abc"}"#)?.is_empty(), "Expected unrelated fields to pass")
}

#[test]
fn null_fields_are_evaluated() -> TestResult {
    let validator = FormValidator::new(RuleTable::from_toml_str(
        r#"
        [contact]
        name = ["Required", "name required"]
        "#,
    )?);
    ensure(
        validator.validate_message("contact", &br#"{"name":null}"#[..])? == "name required",
        "Expected an explicit null to fail Required",
    )?;
    ensure(
        validator.validate_message("contact", &br#"{"name":""}"#[..])? == "name required",
        "Expected an empty string to fail Required",
    )?;
    ensure(
        validator.validate_message("contact", &b"{}"[..])?.is_empty(),
        "Expected an absent field to be skipped",
    )?;

    match message("login", r#"{"password":null}"#) {
        Err(EvaluationError::Predicate {
            field,
            source: PredicateError::UnsupportedKind { .. },
            ..
        }) => ensure(field == "password", "Expected the null field to be named"),
        other => fail(format!("Expected an unsupported kind error, got {other:?}")),
    }
}

#[test]
fn malformed_bodies_are_unparsable() -> TestResult {
    for body in ["{not json", "[1, 2]", "\"text\"", ""] {
        ensure(
            message("login", body)? == UNPARSABLE_MESSAGE,
            format!("Expected `{body}` to be unparsable"),
        )?;
    }
    Ok(())
}

#[test]
fn malformed_body_is_unparsable_even_for_unknown_form() -> TestResult {
    ensure(
        message("checkout", "{not json")? == UNPARSABLE_MESSAGE,
        "Expected the body to be checked before the form name",
    )?;
    ensure(
        matches!(message("checkout", "{}"), Err(EvaluationError::UnknownForm(_))),
        "Expected a well-formed body to reach the form lookup",
    )
}

#[test]
fn oversized_bodies_are_unparsable() -> TestResult {
    let options = ValidatorOptions {
        max_payload_bytes: 16,
        decode: DecodeOptions::default(),
    };
    let validator =
        FormValidator::with_audit(fixture_table(), options, Arc::new(form_gate::NoopAuditSink));
    let outcome = validator.validate("login", &br#"{"password":"abcdefghijkl"}"#[..])?;
    ensure(outcome == ValidationOutcome::Unparsable, "Expected the size limit to apply")
}

// ========================================================================
// SECTION: Ordering and Messages
// ========================================================================

#[test]
fn first_failing_rule_in_declaration_order_wins() -> TestResult {
    let body = r#"{"username":"x","email":"bad","age":3}"#;
    match FormValidator::new(fixture_table()).validate("signup", body.as_bytes())? {
        ValidationOutcome::Invalid {
            field,
            message,
        } => {
            ensure(field == "email", "Expected the first declared rule to win")?;
            ensure(message == "invalid email", "Expected the email message")
        }
        other => fail(format!("Expected an invalid outcome, got {other:?}")),
    }
}

#[test]
fn detail_placeholder_names_the_failing_predicate() -> TestResult {
    let rendered = message("profile", r#"{"bio":"<b>hi</b>"}"#)?;
    ensure(rendered == "bio rejected: ExcludesAll('<>')", format!("Unexpected message {rendered}"))?;
    ensure(message("profile", r#"{"bio":"plain"}"#)?.is_empty(), "Expected a clean bio to pass")
}

#[test]
fn detail_skips_failures_rescued_by_a_disjunction() -> TestResult {
    let validator = FormValidator::new(RuleTable::from_toml_str(
        r#"
        [comment]
        body = ["(Contains('a') || HasMinOf(3)) && Excludes('z')", "rejected: {detail}"]
        "#,
    )?);
    let rendered = validator.validate_message("comment", &br#"{"body":"bbbz"}"#[..])?;
    ensure(rendered == "rejected: Excludes('z')", format!("Unexpected message {rendered}"))
}

#[test]
fn collections_are_measured_by_count() -> TestResult {
    ensure(message("profile", r#"{"tags":["a","b","c","d"]}"#)? == "too many tags", "Expected 4")?;
    ensure(message("profile", r#"{"tags":["a","b"]}"#)?.is_empty(), "Expected 2 tags to pass")
}

#[test]
fn disjunction_allows_empty_optional_value() -> TestResult {
    ensure(message("signup", r#"{"website":""}"#)?.is_empty(), "Expected empty website")?;
    ensure(
        message("signup", r#"{"website":"https://example.com"}"#)?.is_empty(),
        "Expected a URL",
    )?;
    ensure(message("signup", r#"{"website":"nope"}"#)? == "website must be a URL", "Expected fail")
}

#[test]
fn repeated_calls_are_deterministic() -> TestResult {
    let validator = FormValidator::new(fixture_table());
    let body = r#"{"email":"a@b.com","username":"ab"}"#;
    let first = validator.validate_message("signup", body.as_bytes())?;
    let second = validator.validate_message("signup", body.as_bytes())?;
    ensure(first == second, "Expected identical results")?;
    ensure(first == "username must be 3-16 letters or digits", "Expected the username message")
}

// ========================================================================
// SECTION: Errors
// ========================================================================

#[test]
fn unknown_form_fails_closed() -> TestResult {
    match message("checkout", "{}") {
        Err(EvaluationError::UnknownForm(form)) => ensure(form == "checkout", "Expected the name"),
        other => fail(format!("Expected an unknown form error, got {other:?}")),
    }
}

#[test]
fn unsupported_kind_is_an_error_not_a_failure() -> TestResult {
    match message("signup", r#"{"email":42}"#) {
        Err(EvaluationError::Predicate {
            form,
            field,
            source: PredicateError::UnsupportedKind { .. },
        }) => {
            ensure(form == "signup", "Expected the form name")?;
            ensure(field == "email", "Expected the field name")
        }
        other => fail(format!("Expected an unsupported kind error, got {other:?}")),
    }
}

#[test]
fn timestamps_decode_only_when_enabled() -> TestResult {
    let rules = r#"
        [event]
        starts = ["IsGt", "event must start in the future"]
    "#;
    let body = r#"{"starts":"2000-01-01T00:00:00Z"}"#;

    let options = ValidatorOptions {
        decode: DecodeOptions {
            rfc3339_timestamps: true,
        },
        ..ValidatorOptions::default()
    };
    let validator = FormValidator::with_audit(
        RuleTable::from_toml_str(rules)?,
        options,
        Arc::new(form_gate::NoopAuditSink),
    );
    ensure(
        validator.validate_message("event", body.as_bytes())? == "event must start in the future",
        "Expected a past instant to fail",
    )?;

    let plain = FormValidator::new(RuleTable::from_toml_str(rules)?);
    ensure(
        matches!(
            plain.validate("event", body.as_bytes()),
            Err(EvaluationError::Predicate {
                source: PredicateError::MissingOperand { .. },
                ..
            })
        ),
        "Expected a bare bound on a string to be an error",
    )
}

// ========================================================================
// SECTION: Audit and Concurrency
// ========================================================================

#[test]
fn audit_events_cover_publication_and_calls() -> TestResult {
    let sink = Arc::new(RecordingSink::default());
    let validator =
        FormValidator::with_audit(fixture_table(), ValidatorOptions::default(), sink.clone());
    validator.validate("login", &br#"{"password":"abc"}"#[..])?;
    let _ = validator.validate("missing", &b"{}"[..]);

    let events = sink.events();
    ensure(events.len() == 3, format!("Expected three events, got {}", events.len()))?;
    ensure(events[0]["event"] == "rule_table_published", "Expected publication first")?;
    ensure(events[0]["forms"] == 3 && events[0]["rules"] == 8, "Expected table counts")?;
    ensure(events[1]["event"] == "form_validation", "Expected a validation event")?;
    ensure(events[1]["outcome"] == "invalid", "Expected an invalid outcome")?;
    ensure(events[1]["field"] == "password", "Expected the failing field")?;
    ensure(events[1]["request_bytes"] == 18, "Expected the body size")?;
    ensure(events[2]["outcome"] == "error", "Expected an error outcome")?;
    ensure(events[2]["error_kind"] == "unknown_form", "Expected the error kind")
}

#[test]
fn validator_is_shared_across_threads() -> TestResult {
    fn assert_send_sync<T: Send + Sync>(_: &T) {}

    let validator = FormValidator::new(fixture_table());
    assert_send_sync(&validator);
    thread::scope(|scope| {
        let handles: Vec<_> = (0 .. 4)
            .map(|idx| {
                let validator = &validator;
                scope.spawn(move || {
                    let body = if idx % 2 == 0 { r#"{"password":"abc"}"# } else { "{}" };
                    validator.validate_message("login", body.as_bytes())
                })
            })
            .collect();
        for (idx, handle) in handles.into_iter().enumerate() {
            let result = handle.join().unwrap().unwrap();
            let expected = if idx % 2 == 0 { "password too short" } else { "" };
            assert_eq!(result, expected);
        }
    });
    Ok(())
}
