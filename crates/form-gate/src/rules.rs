// crates/form-gate/src/rules.rs
// ============================================================================
// Module: Rule Compiler
// Description: Compiles a rule-definition file into an immutable rule table.
// Purpose: Parse `form -> field -> [expression, message]` once at startup and
//          fail the whole load on the first bad entry.
// Dependencies: form-gate-core, rule-logic, serde, toml
// ============================================================================

//! ## Overview
//! A rule file is a three-level TOML table:
//!
//! ```toml
//! [login]
//! password = ["HasMinOf(8) && HasMaxOf(64)", "password must be 8-64 characters"]
//! __confirm = ["EqField('password', 'confirm')", "passwords differ"]
//! ```
//!
//! Fields whose names start with `__` hold whole-record rules. Field order
//! inside a form is kept exactly as declared and is the evaluation order.
//! Compilation is all-or-nothing: any unreadable file, malformed entry, parse
//! error, unknown operation, or bad operand aborts the load and no table is
//! produced.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use form_gate_core::Capability;
use form_gate_core::CapabilityResolver;
use rule_logic::DslError;
use rule_logic::Requirement;
use rule_logic::parse_requirement;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Maximum rule file size in bytes.
pub const MAX_RULE_FILE_BYTES: usize = 1024 * 1024;
/// Field-name prefix marking a whole-record rule.
pub const RECORD_RULE_PREFIX: &str = "__";
/// Placeholder in message templates replaced by the failing predicate.
pub const DETAIL_PLACEHOLDER: &str = "{detail}";

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Rule file loading and compilation errors.
#[derive(Debug, Error)]
pub enum RuleLoadError {
    /// The rule file could not be read.
    #[error("rule file io error: {0}")]
    Io(String),
    /// The rule file exceeds the size limit.
    #[error("rule file exceeds size limit: {actual_bytes} bytes (max {max_bytes})")]
    TooLarge {
        /// Maximum allowed bytes.
        max_bytes: usize,
        /// Actual file size in bytes.
        actual_bytes: usize,
    },
    /// The rule file is not UTF-8.
    #[error("rule file must be utf-8")]
    NotUtf8,
    /// The rule file is not valid TOML.
    #[error("rule file parse error: {0}")]
    Parse(String),
    /// A form entry is not a table.
    #[error("form `{form}` must be a table of field rules")]
    InvalidForm {
        /// Form name.
        form: String,
    },
    /// A rule entry is not `[expression, message]`.
    #[error("rule `{form}.{field}` must be an array of [expression, message] strings")]
    InvalidRule {
        /// Form name.
        form: String,
        /// Field name.
        field: String,
    },
    /// A rule expression failed to compile.
    #[error("rule `{form}.{field}` failed to compile: {source}")]
    Expression {
        /// Form name.
        form: String,
        /// Field name.
        field: String,
        /// Parser diagnostic with the byte position inside the expression.
        source: DslError,
    },
}

impl RuleLoadError {
    /// Returns the byte offset within the failing expression, when known.
    #[must_use]
    pub const fn position(&self) -> Option<usize> {
        match self {
            Self::Expression {
                source,
                ..
            } => source.position(),
            _ => None,
        }
    }
}

// ============================================================================
// SECTION: Compiled Rules
// ============================================================================

/// What a rule is evaluated against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleScope {
    /// The value of the named field, skipped when the field is absent.
    Field,
    /// The whole decoded record.
    Record,
}

impl RuleScope {
    /// Derives the scope from a field name.
    #[must_use]
    pub fn for_field(name: &str) -> Self {
        if name.starts_with(RECORD_RULE_PREFIX) { Self::Record } else { Self::Field }
    }
}

/// Failure message with an optional `{detail}` placeholder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct MessageTemplate(String);

impl MessageTemplate {
    /// Wraps template text.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    /// Returns the raw template text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Substitutes `detail` for every placeholder.
    #[must_use]
    pub fn render(&self, detail: &str) -> String {
        self.0.replace(DETAIL_PLACEHOLDER, detail)
    }
}

/// One compiled `(field, expression, message)` entry.
#[derive(Debug, Clone, Serialize)]
pub struct CompiledRule {
    /// Field name as declared.
    field: String,
    /// Field or whole-record evaluation.
    scope: RuleScope,
    /// Compiled expression tree.
    requirement: Requirement<Capability>,
    /// Message returned on failure.
    message: MessageTemplate,
    /// Expression text as written.
    source: String,
}

impl CompiledRule {
    /// Compiles one rule entry.
    ///
    /// # Errors
    ///
    /// Returns [`DslError`] when the expression does not parse or names an
    /// unknown operation or bad operands.
    pub fn compile(field: &str, expression: &str, message: &str) -> Result<Self, DslError> {
        let requirement = parse_requirement(expression, &CapabilityResolver)?;
        Ok(Self {
            field: field.to_string(),
            scope: RuleScope::for_field(field),
            requirement,
            message: MessageTemplate::new(message),
            source: expression.to_string(),
        })
    }

    /// Returns the field name.
    #[must_use]
    pub fn field(&self) -> &str {
        &self.field
    }

    /// Returns the evaluation scope.
    #[must_use]
    pub const fn scope(&self) -> RuleScope {
        self.scope
    }

    /// Returns the compiled expression tree.
    #[must_use]
    pub const fn requirement(&self) -> &Requirement<Capability> {
        &self.requirement
    }

    /// Returns the failure message template.
    #[must_use]
    pub const fn message(&self) -> &MessageTemplate {
        &self.message
    }

    /// Returns the expression text as written.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }
}

// ============================================================================
// SECTION: Rule Table
// ============================================================================

/// Immutable mapping from form name to its ordered compiled rules.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RuleTable {
    /// Rules per form, in declaration order.
    forms: BTreeMap<String, Vec<CompiledRule>>,
}

impl RuleTable {
    /// Loads and compiles a rule file.
    ///
    /// # Errors
    ///
    /// Returns [`RuleLoadError`] when the file cannot be read or any entry
    /// fails to compile.
    pub fn load(path: &Path) -> Result<Self, RuleLoadError> {
        let bytes = fs::read(path)
            .map_err(|err| RuleLoadError::Io(format!("{}: {err}", path.display())))?;
        if bytes.len() > MAX_RULE_FILE_BYTES {
            return Err(RuleLoadError::TooLarge {
                max_bytes: MAX_RULE_FILE_BYTES,
                actual_bytes: bytes.len(),
            });
        }
        let content = std::str::from_utf8(&bytes).map_err(|_| RuleLoadError::NotUtf8)?;
        Self::from_toml_str(content)
    }

    /// Compiles rule definitions from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`RuleLoadError`] when the text is malformed or any entry fails
    /// to compile.
    pub fn from_toml_str(content: &str) -> Result<Self, RuleLoadError> {
        if content.len() > MAX_RULE_FILE_BYTES {
            return Err(RuleLoadError::TooLarge {
                max_bytes: MAX_RULE_FILE_BYTES,
                actual_bytes: content.len(),
            });
        }
        let document: toml::Table =
            toml::from_str(content).map_err(|err| RuleLoadError::Parse(err.to_string()))?;

        let mut forms = BTreeMap::new();
        for (form, entry) in &document {
            let toml::Value::Table(fields) = entry else {
                return Err(RuleLoadError::InvalidForm {
                    form: form.clone(),
                });
            };
            let mut rules = Vec::with_capacity(fields.len());
            for (field, rule) in fields {
                rules.push(compile_entry(form, field, rule)?);
            }
            forms.insert(form.clone(), rules);
        }
        Ok(Self {
            forms,
        })
    }

    /// Returns the ordered rules of `form`.
    #[must_use]
    pub fn form(&self, form: &str) -> Option<&[CompiledRule]> {
        self.forms.get(form).map(Vec::as_slice)
    }

    /// Iterates form names in sorted order.
    pub fn form_names(&self) -> impl Iterator<Item = &str> {
        self.forms.keys().map(String::as_str)
    }

    /// Returns the number of forms.
    #[must_use]
    pub fn form_count(&self) -> usize {
        self.forms.len()
    }

    /// Returns the total number of compiled rules.
    #[must_use]
    pub fn rule_count(&self) -> usize {
        self.forms.values().map(Vec::len).sum()
    }

    /// Renders the compiled table as JSON for inspection.
    ///
    /// # Errors
    ///
    /// Returns [`serde_json::Error`] when serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Compiles a single `[expression, message]` entry.
fn compile_entry(
    form: &str,
    field: &str,
    rule: &toml::Value,
) -> Result<CompiledRule, RuleLoadError> {
    let invalid = || RuleLoadError::InvalidRule {
        form: form.to_string(),
        field: field.to_string(),
    };
    let toml::Value::Array(items) = rule else {
        return Err(invalid());
    };
    let [toml::Value::String(expression), toml::Value::String(message)] = items.as_slice() else {
        return Err(invalid());
    };
    CompiledRule::compile(field, expression, message).map_err(|source| RuleLoadError::Expression {
        form: form.to_string(),
        field: field.to_string(),
        source,
    })
}
