// crates/rule-logic/src/serde_support.rs
// ============================================================================
// Module: Requirement Serde Support
// Description: Structural validation and JSON export for rule trees.
// Purpose: Provide error models, limits, and tree validation helpers.
// Dependencies: serde::{Deserialize, Serialize}, serde_json, std::fmt
// ============================================================================

//! ## Overview
//! Rule trees arrive from untrusted configuration text. This module enforces
//! the structural limits every tree must satisfy (depth, group arity) and
//! gives deterministic JSON export/import that re-validates on the way in.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

use crate::requirement::Requirement;

// ============================================================================
// SECTION: Serde Errors
// ============================================================================

/// Error types raised by structural validation and JSON conversion
///
/// # Invariants
/// - None. Variants capture structured validation failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SerdeError {
    /// Invalid requirement structure
    InvalidStructure(String),

    /// Requirement tree too deep
    TooDeep {
        /// Maximum supported tree depth
        max_depth: usize,
        /// Depth encountered during validation
        actual_depth: usize,
    },

    /// Invalid group configuration
    InvalidGroup {
        /// Minimum required items in the group
        min: u8,
        /// Total items provided
        total: usize,
    },

    /// JSON encoding or decoding failed
    Json(String),
}

impl fmt::Display for SerdeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidStructure(msg) => write!(f, "invalid rule structure: {msg}"),
            Self::TooDeep {
                max_depth,
                actual_depth,
            } => write!(f, "rule tree too deep: {actual_depth} levels (max {max_depth})"),
            Self::InvalidGroup {
                min,
                total,
            } => write!(f, "at_least({min}, ...) has only {total} members"),
            Self::Json(msg) => write!(f, "rule json error: {msg}"),
        }
    }
}

impl std::error::Error for SerdeError {}

// ============================================================================
// SECTION: Structure Configuration
// ============================================================================

/// Structural limits applied to every rule tree
///
/// # Invariants
/// - No invariants are enforced; callers should choose safe bounds.
#[derive(Debug, Clone)]
pub struct StructureConfig {
    /// Maximum allowed depth for requirement trees
    pub max_depth: usize,

    /// Whether to allow empty And/Or requirements (the `true`/`false` literals)
    pub allow_empty_logical: bool,
}

impl Default for StructureConfig {
    fn default() -> Self {
        Self {
            max_depth: 32,
            allow_empty_logical: true,
        }
    }
}

// ============================================================================
// SECTION: Requirement Validator
// ============================================================================

/// Validator for requirement trees
///
/// # Invariants
/// - Uses the stored [`StructureConfig`] for all validation decisions.
#[derive(Debug)]
pub struct RequirementValidator {
    /// Validation configuration for structure limits.
    config: StructureConfig,
}

impl RequirementValidator {
    /// Creates a new validator with the given configuration
    #[must_use]
    pub const fn new(config: StructureConfig) -> Self {
        Self {
            config,
        }
    }

    /// Creates a validator with default configuration
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(StructureConfig::default())
    }

    /// Validates a requirement tree
    ///
    /// Structural validation only; predicate operands are checked by the
    /// resolver that built the leaves.
    ///
    /// # Errors
    /// Returns [`SerdeError`] when the requirement violates structural limits.
    pub fn validate<P>(&self, requirement: &Requirement<P>) -> Result<(), SerdeError> {
        self.validate_node(requirement, 0)
    }

    /// Validates one node and its children.
    fn validate_node<P>(
        &self,
        requirement: &Requirement<P>,
        depth: usize,
    ) -> Result<(), SerdeError> {
        if depth > self.config.max_depth {
            return Err(SerdeError::TooDeep {
                max_depth: self.config.max_depth,
                actual_depth: depth,
            });
        }

        match requirement {
            Requirement::And(reqs) | Requirement::Or(reqs) => {
                if !self.config.allow_empty_logical && reqs.is_empty() {
                    return Err(SerdeError::InvalidStructure(
                        "empty all/any is not allowed".to_string(),
                    ));
                }
                for req in reqs {
                    self.validate_node(req, depth + 1)?;
                }
            }
            Requirement::RequireGroup {
                min,
                reqs,
            } => {
                if usize::from(*min) > reqs.len() {
                    return Err(SerdeError::InvalidGroup {
                        min: *min,
                        total: reqs.len(),
                    });
                }
                if *min == 0 && !reqs.is_empty() {
                    return Err(SerdeError::InvalidStructure(
                        "at_least(0, ...) always passes; use `true`".to_string(),
                    ));
                }
                for req in reqs {
                    self.validate_node(req, depth + 1)?;
                }
            }
            Requirement::Not(req) => self.validate_node(req, depth + 1)?,
            Requirement::Predicate(_) => {}
        }

        Ok(())
    }
}

// ============================================================================
// SECTION: JSON Helpers
// ============================================================================

/// Serializes a validated requirement tree to pretty JSON.
///
/// # Errors
/// Returns [`SerdeError`] when validation or encoding fails.
pub fn to_json<P: Serialize>(requirement: &Requirement<P>) -> Result<String, SerdeError> {
    RequirementValidator::with_defaults().validate(requirement)?;
    serde_json::to_string_pretty(requirement).map_err(|err| SerdeError::Json(err.to_string()))
}

/// Deserializes a requirement tree from JSON and validates its structure.
///
/// # Errors
/// Returns [`SerdeError`] when decoding or validation fails.
pub fn from_json<P>(json: &str) -> Result<Requirement<P>, SerdeError>
where
    P: for<'de> Deserialize<'de>,
{
    let requirement: Requirement<P> =
        serde_json::from_str(json).map_err(|err| SerdeError::Json(err.to_string()))?;
    RequirementValidator::with_defaults().validate(&requirement)?;
    Ok(requirement)
}
