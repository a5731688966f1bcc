// crates/rule-logic/src/literal.rs
// ============================================================================
// Module: Rule Literals
// Description: Literal operands written inside rule expressions.
// Purpose: Carry typed call arguments from the DSL to predicate resolvers.
// Dependencies: serde::{Deserialize, Serialize}
// ============================================================================

//! ## Overview
//! Predicate calls such as `HasMinOf(8)` or `Contains('@')` carry literal
//! operands. The parser produces them untyped beyond their lexical shape; the
//! resolver decides which shapes a given predicate accepts.

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

/// A literal operand written in rule text.
///
/// # Invariants
/// - `Str` holds the unescaped text without surrounding quotes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Literal {
    /// Signed integer literal (`8`, `-3`).
    Int(i64),
    /// Floating point literal (`2.5`, `-0.75`).
    Float(f64),
    /// Quoted text literal (`'abc'`, `"abc"`).
    Str(String),
    /// Boolean literal (`true`, `false`).
    Bool(bool),
}

impl Literal {
    /// Returns a short label for the literal's shape, used in diagnostics.
    #[must_use]
    pub const fn shape(&self) -> &'static str {
        match self {
            Self::Int(_) => "integer",
            Self::Float(_) => "float",
            Self::Str(_) => "string",
            Self::Bool(_) => "boolean",
        }
    }

    /// Returns the text of a string literal.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(text) => Some(text),
            _ => None,
        }
    }

    /// Returns true when the literal is numeric.
    #[must_use]
    pub const fn is_number(&self) -> bool {
        matches!(self, Self::Int(_) | Self::Float(_))
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(value) => write!(f, "{value}"),
            Self::Float(value) if value.is_finite() && value.fract() == 0.0 => {
                write!(f, "{value:.1}")
            }
            Self::Float(value) => write!(f, "{value}"),
            Self::Str(text) => {
                f.write_str("'")?;
                for ch in text.chars() {
                    match ch {
                        '\'' => f.write_str("\\'")?,
                        '\\' => f.write_str("\\\\")?,
                        '\n' => f.write_str("\\n")?,
                        '\t' => f.write_str("\\t")?,
                        other => write!(f, "{other}")?,
                    }
                }
                f.write_str("'")
            }
            Self::Bool(value) => write!(f, "{value}"),
        }
    }
}
