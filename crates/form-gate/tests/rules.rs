// crates/form-gate/tests/rules.rs
// ============================================================================
// Module: Rule Compiler Tests
// Description: Rule file shape checks, compile errors, and determinism.
// ============================================================================
//! ## Overview
//! Compiles rule definitions from text and from disk and checks that every
//! malformed entry aborts the whole load.

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

use std::io::Write;

use form_gate::RuleLoadError;
use form_gate::RuleScope;
use form_gate::RuleTable;
use form_gate_core::Operation;
use proptest::prelude::*;
use rule_logic::DslError;
use support::TestResult;
use support::ensure;
use support::fail;
use support::fixture_table;

// ========================================================================
// SECTION: Loading
// ========================================================================

#[test]
fn fixture_compiles_in_declaration_order() -> TestResult {
    let table = fixture_table();
    ensure(table.form_count() == 3, "Expected three forms")?;
    ensure(table.rule_count() == 8, "Expected eight rules")?;
    let fields: Vec<&str> = table.form("signup").unwrap().iter().map(|rule| rule.field()).collect();
    ensure(
        fields == ["email", "username", "age", "website", "__cross"],
        format!("Expected declaration order, got {fields:?}"),
    )?;
    let names: Vec<&str> = table.form_names().collect();
    ensure(names == ["login", "profile", "signup"], "Expected sorted form names")
}

#[test]
fn double_underscore_marks_record_rules() -> TestResult {
    let table = fixture_table();
    let rules = table.form("signup").unwrap();
    ensure(rules[0].scope() == RuleScope::Field, "Expected a field rule")?;
    ensure(rules[4].scope() == RuleScope::Record, "Expected a whole-record rule")?;
    ensure(rules[4].source() == "NeField('a', 'b')", "Expected the source text")
}

#[test]
fn load_reads_from_disk() -> TestResult {
    let mut file = tempfile::NamedTempFile::new()?;
    writeln!(file, "[contact]\nphone = [\"IsNumber && Len(10)\", \"bad phone\"]")?;
    let table = RuleTable::load(file.path())?;
    let rule = &table.form("contact").unwrap()[0];
    ensure(rule.message().as_str() == "bad phone", "Expected the message template")?;
    let mut ops = Vec::new();
    rule.requirement().for_each_predicate(&mut |capability| ops.push(capability.operation()));
    ensure(ops == [Operation::IsNumber, Operation::HasLengthOf], "Expected resolved operations")
}

#[test]
fn missing_file_is_an_io_error() -> TestResult {
    let dir = tempfile::tempdir()?;
    match RuleTable::load(&dir.path().join("absent.toml")) {
        Err(RuleLoadError::Io(_)) => Ok(()),
        other => fail(format!("Expected an io error, got {other:?}")),
    }
}

// ========================================================================
// SECTION: Compile Errors
// ========================================================================

#[test]
fn unknown_operation_aborts_with_position() -> TestResult {
    let err = RuleTable::from_toml_str("[f]\nname = [\"Required && IsPhone\", \"m\"]").unwrap_err();
    match &err {
        RuleLoadError::Expression {
            form,
            field,
            source: DslError::UnknownPredicate { .. },
        } => {
            ensure(form == "f" && field == "name", "Expected the rule location")?;
            ensure(err.position() == Some(12), "Expected the byte position")
        }
        other => fail(format!("Expected an expression error, got {other:?}")),
    }
}

#[test]
fn bad_operands_abort_the_load() -> TestResult {
    let err = RuleTable::from_toml_str("[f]\nname = [\"HasMinOf('x')\", \"m\"]").unwrap_err();
    ensure(
        matches!(
            err,
            RuleLoadError::Expression {
                source: DslError::InvalidArguments { .. },
                ..
            }
        ),
        format!("Expected invalid operands, got {err:?}"),
    )
}

#[test]
fn malformed_entries_abort_the_load() -> TestResult {
    let cases = [
        ("top = 1", "form"),
        ("[f]\nname = \"Required\"", "rule"),
        ("[f]\nname = [\"Required\"]", "rule"),
        ("[f]\nname = [\"Required\", \"m\", \"extra\"]", "rule"),
        ("[f]\nname = [\"Required\", 3]", "rule"),
        ("[f\nname = 1", "parse"),
    ];
    for (text, expected) in cases {
        let err = RuleTable::from_toml_str(text).unwrap_err();
        let kind = match err {
            RuleLoadError::InvalidForm { .. } => "form",
            RuleLoadError::InvalidRule { .. } => "rule",
            RuleLoadError::Parse(_) => "parse",
            _ => "other",
        };
        ensure(kind == expected, format!("Expected a {expected} error for `{text}`, got {kind}"))?;
    }
    Ok(())
}

#[test]
fn one_bad_rule_publishes_nothing() -> TestResult {
    let text = "[a]\nok = [\"Required\", \"m\"]\n[b]\nbad = [\"Required &&\", \"m\"]";
    ensure(RuleTable::from_toml_str(text).is_err(), "Expected the whole load to fail")
}

#[test]
fn compiled_table_exports_as_json() -> TestResult {
    let table = RuleTable::from_toml_str("[f]\nname = [\"HasMinOf(2)\", \"m\"]")?;
    let json: serde_json::Value = serde_json::from_str(&table.to_json()?)?;
    let rule = &json["forms"]["f"][0];
    ensure(rule["scope"] == "field", "Expected the scope label")?;
    ensure(rule["message"] == "m", "Expected the message template")?;
    ensure(
        rule["requirement"]["Predicate"]["operation"] == "HasMinOf",
        format!("Expected the canonical operation name, got {rule}"),
    )
}

// ========================================================================
// SECTION: Properties
// ========================================================================

proptest! {
    #[test]
    fn compilation_is_deterministic(min in 0i64 .. 100, max in 0i64 .. 100, needle in "[a-z]{1,8}") {
        let text = format!(
            "[f]\nname = [\"HasMinOf({min}) && (HasMaxOf({max}) || Contains('{needle}'))\", \"m\"]"
        );
        let first = RuleTable::from_toml_str(&text).unwrap().to_json().unwrap();
        let second = RuleTable::from_toml_str(&text).unwrap().to_json().unwrap();
        prop_assert_eq!(first, second);
    }
}
