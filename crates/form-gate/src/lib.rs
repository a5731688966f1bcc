// crates/form-gate/src/lib.rs
// ============================================================================
// Module: Form Gate Library
// Description: Public API surface for the form validation engine.
// Purpose: Expose the rule compiler, the form validator, engine configuration,
//          and audit sinks.
// Dependencies: crate::{audit, config, rules, validator}
// ============================================================================

//! ## Overview
//! Form Gate validates HTTP request payloads against declarative rules. A rule
//! file is compiled once into a [`RuleTable`]; a [`FormValidator`] then
//! evaluates each incoming JSON body against the rules of one form and returns
//! the first failure message, or an empty string when every rule passes.
//!
//! ```no_run
//! use form_gate::FormValidator;
//! use form_gate::RuleTable;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let table = RuleTable::from_toml_str(
//!     r#"
//!     [login]
//!     password = ["HasMinOf(8)", "password too short"]
//!     "#,
//! )?;
//! let validator = FormValidator::new(table);
//! let message = validator.validate_message("login", &br#"{"password":"abc"}"#[..])?;
//! assert_eq!(message, "password too short");
//! # Ok(())
//! # }
//! ```

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod audit;
pub mod config;
pub mod rules;
pub mod validator;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use audit::AuditSink;
pub use audit::FileAuditSink;
pub use audit::NoopAuditSink;
pub use audit::RuleTableAuditEvent;
pub use audit::StderrAuditSink;
pub use audit::ValidationAuditEvent;
pub use config::ConfigError;
pub use config::FormGateConfig;
pub use rules::CompiledRule;
pub use rules::MessageTemplate;
pub use rules::RuleLoadError;
pub use rules::RuleScope;
pub use rules::RuleTable;
pub use validator::EvaluationError;
pub use validator::FormValidator;
pub use validator::UNPARSABLE_MESSAGE;
pub use validator::ValidationOutcome;
pub use validator::ValidatorOptions;
