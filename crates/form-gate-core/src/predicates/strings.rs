// crates/form-gate-core/src/predicates/strings.rs
// ============================================================================
// Module: Containment Predicates
// Description: Substring and character membership checks.
// Purpose: Back the Contains/Excludes family of operations.
// Dependencies: std
// ============================================================================

//! ## Overview
//! Containment checks compare Unicode scalar values, never bytes, so a
//! multibyte character in the needle only matches the same character.

/// `text` contains `needle` as a substring.
#[must_use]
pub fn contains(text: &str, needle: &str) -> bool {
    text.contains(needle)
}

/// `text` contains at least one character from `chars`.
#[must_use]
pub fn contains_any(text: &str, chars: &str) -> bool {
    text.chars().any(|ch| chars.contains(ch))
}

/// `text` contains the character `rune`.
#[must_use]
pub fn contains_rune(text: &str, rune: char) -> bool {
    text.contains(rune)
}

/// `text` does not contain `needle`.
#[must_use]
pub fn excludes(text: &str, needle: &str) -> bool {
    !contains(text, needle)
}

/// `text` contains none of the characters in `chars`.
#[must_use]
pub fn excludes_all(text: &str, chars: &str) -> bool {
    !contains_any(text, chars)
}

/// `text` does not contain the character `rune`.
#[must_use]
pub fn excludes_rune(text: &str, rune: char) -> bool {
    !contains_rune(text, rune)
}
