// crates/rule-logic/src/dsl.rs
// ============================================================================
// Module: Rule Expression DSL Parser
// Description: Author-facing boolean expression syntax for rule trees.
// Purpose: Turn rule text into `Requirement<P>` with operand literals,
//          structural validation, and predicate resolution.
// Dependencies: crate::{literal, requirement, serde_support}
// ============================================================================

//! ## Overview
//!
//! Rule expressions are small boolean formulas over named predicates. Each
//! predicate call may carry literal operands; the parser hands the name and
//! operands to a user-supplied [`PredicateResolver`], which either produces the
//! domain predicate value or rejects the call. Rule text comes from
//! configuration files and is treated as untrusted input: size and nesting are
//! bounded and every failure carries a byte position.
//!
//! ### Grammar (informal)
//! - **Predicates**: `IsEmail`, `IsEmail()`, `HasMinOf(8)`, `Contains('@')`
//! - **Literals**: integers (`8`, `-3`), floats (`2.5`), strings (`'a'`, `"a"`),
//!   booleans (`true`, `false`)
//! - **Boolean operators**:
//!   - Infix: `a && b`, `a and b`, `a || b`, `a or b`, `!a`, `not a`
//!   - Functions: `all(a, b, c)` or `and(a, b)`, `any(a, b)` or `or(a, b)`, `not(a)`
//! - **Groups**: `at_least(2, a, b, c)` or `require_group(2, a, b, c)`
//! - **Constants**: `true`, `false`
//! - **Parentheses**: `( ... )` for explicit grouping
//!
//! ### Example
//!
//! ```
//! use rule_logic::Literal;
//! use rule_logic::PredicateCall;
//! use rule_logic::Requirement;
//! use rule_logic::ResolveError;
//! use rule_logic::parse_requirement;
//!
//! let resolver = |call: &PredicateCall<'_>| -> Result<(String, Vec<Literal>), ResolveError> {
//!     Ok((call.name.to_string(), call.args.to_vec()))
//! };
//!
//! let req = parse_requirement("IsEmail && HasMinOf(8)", &resolver).unwrap();
//! assert_eq!(req.complexity(), 3);
//! ```

use std::collections::BTreeMap;
use std::collections::HashMap;
use std::fmt;
use std::hash::BuildHasher;

use crate::literal::Literal;
use crate::requirement::Requirement;
use crate::serde_support::RequirementValidator;

// ============================================================================
// SECTION: Limits
// ============================================================================

/// Maximum allowed DSL input size in bytes.
const MAX_DSL_INPUT_BYTES: usize = 1024 * 1024;
/// Maximum supported nesting depth for DSL expressions.
const MAX_DSL_NESTING: usize = 32;

// ============================================================================
// SECTION: Public API
// ============================================================================

/// Errors that can occur while parsing or validating a DSL expression.
///
/// # Invariants
/// - None. Variants capture structured parse and validation failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DslError {
    /// Input was empty or contained only whitespace.
    EmptyInput,
    /// Input exceeded the configured size limit.
    InputTooLarge {
        /// Maximum allowed bytes.
        max_bytes: usize,
        /// Actual input length in bytes.
        actual_bytes: usize,
    },
    /// Input exceeded the configured nesting depth.
    NestingTooDeep {
        /// Maximum allowed nesting depth.
        max_depth: usize,
        /// Actual nesting depth when the error occurred.
        actual_depth: usize,
        /// Byte offset in the original input.
        position: usize,
    },
    /// Unexpected token encountered during parsing.
    UnexpectedToken {
        /// Human-friendly expectation summary.
        expected: &'static str,
        /// The token that was actually seen.
        found: String,
        /// Byte offset in the original input.
        position: usize,
    },
    /// A quoted string literal was not closed.
    UnterminatedString {
        /// Byte offset of the opening quote.
        position: usize,
    },
    /// Predicate name was not recognized by the resolver.
    UnknownPredicate {
        /// The unresolved name.
        name: String,
        /// Byte offset in the original input.
        position: usize,
    },
    /// The resolver rejected the operands supplied to a predicate.
    InvalidArguments {
        /// Predicate name.
        name: String,
        /// Resolver-supplied reason.
        reason: String,
        /// Byte offset in the original input.
        position: usize,
    },
    /// Numeric literal failed to parse or overflowed.
    InvalidNumber {
        /// The raw numeric text.
        raw: String,
        /// Byte offset in the original input.
        position: usize,
    },
    /// Structural validation failed after parsing.
    Validation(String),
    /// Unexpected trailing input after a complete expression.
    TrailingInput {
        /// Byte offset where unexpected input begins.
        position: usize,
    },
}

impl fmt::Display for DslError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyInput => write!(f, "input is empty"),
            Self::InputTooLarge {
                max_bytes,
                actual_bytes,
            } => {
                write!(f, "input exceeds size limit: {actual_bytes} bytes (max {max_bytes})")
            }
            Self::NestingTooDeep {
                max_depth,
                actual_depth,
                position,
            } => write!(
                f,
                "input nesting exceeds limit: depth {actual_depth} (max {max_depth}) at {position}"
            ),
            Self::UnexpectedToken {
                expected,
                found,
                position,
            } => {
                write!(f, "unexpected token `{found}` at {position}, expected {expected}")
            }
            Self::UnterminatedString {
                position,
            } => write!(f, "unterminated string literal starting at {position}"),
            Self::UnknownPredicate {
                name,
                position,
            } => {
                write!(f, "unknown predicate `{name}` at {position}")
            }
            Self::InvalidArguments {
                name,
                reason,
                position,
            } => {
                write!(f, "invalid operands for `{name}` at {position}: {reason}")
            }
            Self::InvalidNumber {
                raw,
                position,
            } => {
                write!(f, "invalid number `{raw}` at {position}")
            }
            Self::Validation(msg) => write!(f, "{msg}"),
            Self::TrailingInput {
                position,
            } => {
                write!(f, "unexpected trailing input at {position}")
            }
        }
    }
}

impl std::error::Error for DslError {}

impl DslError {
    /// Returns the byte offset the error points at, when it has one.
    #[must_use]
    pub const fn position(&self) -> Option<usize> {
        match self {
            Self::NestingTooDeep {
                position,
                ..
            }
            | Self::UnexpectedToken {
                position,
                ..
            }
            | Self::UnterminatedString {
                position,
            }
            | Self::UnknownPredicate {
                position,
                ..
            }
            | Self::InvalidArguments {
                position,
                ..
            }
            | Self::InvalidNumber {
                position,
                ..
            }
            | Self::TrailingInput {
                position,
            } => Some(*position),
            Self::EmptyInput | Self::InputTooLarge { .. } | Self::Validation(_) => None,
        }
    }
}

/// A predicate invocation as written in rule text.
#[derive(Debug, Clone, Copy)]
pub struct PredicateCall<'a> {
    /// Predicate name (`HasMinOf`).
    pub name: &'a str,
    /// Literal operands in call order.
    pub args: &'a [Literal],
    /// Byte offset of the name in the original input.
    pub position: usize,
}

/// Reasons a resolver may reject a predicate call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// No predicate by that name exists.
    Unknown,
    /// The predicate exists but the operands do not fit it.
    InvalidArguments(String),
}

/// Resolves predicate calls to the domain-specific predicate type `P`.
///
/// Implement this for your operation catalogue so the DSL can turn names and
/// literal operands into the leaf values used by your domain.
pub trait PredicateResolver<P> {
    /// Returns a predicate value for the given call.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError`] when the name is unknown or the operands are
    /// not accepted.
    fn resolve(&self, call: &PredicateCall<'_>) -> Result<P, ResolveError>;
}

/// Resolves a zero-operand symbol table entry.
fn resolve_symbol<P: Clone>(value: Option<&P>, call: &PredicateCall<'_>) -> Result<P, ResolveError> {
    let value = value.ok_or(ResolveError::Unknown)?;
    if call.args.is_empty() {
        Ok(value.clone())
    } else {
        Err(ResolveError::InvalidArguments("symbol takes no operands".to_string()))
    }
}

impl<P: Clone, S: BuildHasher> PredicateResolver<P> for HashMap<String, P, S> {
    fn resolve(&self, call: &PredicateCall<'_>) -> Result<P, ResolveError> {
        resolve_symbol(self.get(call.name), call)
    }
}

impl<P: Clone> PredicateResolver<P> for BTreeMap<String, P> {
    fn resolve(&self, call: &PredicateCall<'_>) -> Result<P, ResolveError> {
        resolve_symbol(self.get(call.name), call)
    }
}

impl<P, F> PredicateResolver<P> for F
where
    F: Fn(&PredicateCall<'_>) -> Result<P, ResolveError>,
{
    fn resolve(&self, call: &PredicateCall<'_>) -> Result<P, ResolveError> {
        (self)(call)
    }
}

/// Parses a DSL expression into a validated [`Requirement`] tree.
///
/// # Arguments
/// * `input` - DSL string (e.g., `"all(IsEmail, not Contains('+'))"`).
/// * `resolver` - Resolver that maps predicate calls to predicate values.
///
/// # Errors
/// Returns [`DslError`] for syntax issues, unknown predicates, rejected
/// operands, invalid numbers, trailing input, or post-parse validation failures.
pub fn parse_requirement<P, R>(input: &str, resolver: &R) -> Result<Requirement<P>, DslError>
where
    R: PredicateResolver<P>,
{
    if input.len() > MAX_DSL_INPUT_BYTES {
        return Err(DslError::InputTooLarge {
            max_bytes: MAX_DSL_INPUT_BYTES,
            actual_bytes: input.len(),
        });
    }
    let mut lexer = Lexer::new(input);
    let tokens = lexer.lex()?;

    let mut parser = Parser::new(tokens, resolver);
    let requirement = parser.parse_expression()?;
    parser.expect_eof()?;

    RequirementValidator::with_defaults()
        .validate(&requirement)
        .map_err(|err| DslError::Validation(err.to_string()))?;

    Ok(requirement)
}

// ============================================================================
// SECTION: Lexer
// ============================================================================

/// Lexer token produced from the DSL input.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Token<'a> {
    /// Identifier token.
    Ident(&'a str),
    /// Numeric literal token.
    Number(&'a str),
    /// Unescaped string literal token.
    Str(String),
    /// Boolean literal `true`.
    True,
    /// Boolean literal `false`.
    False,
    /// Logical AND operator.
    And,
    /// Logical OR operator.
    Or,
    /// Logical NOT operator.
    Not,
    /// Left parenthesis.
    LParen,
    /// Right parenthesis.
    RParen,
    /// Comma separator.
    Comma,
    /// End-of-input marker.
    Eof,
}

/// Token paired with its byte offset.
#[derive(Debug, Clone)]
struct SpannedToken<'a> {
    /// Token value.
    token: Token<'a>,
    /// Byte offset into the input.
    position: usize,
}

/// Lexer for the rule DSL.
struct Lexer<'a> {
    /// Source input being tokenized.
    input: &'a str,
    /// Current byte offset into the input.
    offset: usize,
}

impl<'a> Lexer<'a> {
    /// Creates a new lexer for the given input.
    const fn new(input: &'a str) -> Self {
        Self {
            input,
            offset: 0,
        }
    }

    /// Lexes the input into a sequence of tokens.
    fn lex(&mut self) -> Result<Vec<SpannedToken<'a>>, DslError> {
        let mut tokens = Vec::new();
        let bytes = self.input.as_bytes();

        while self.offset < bytes.len() {
            let ch = bytes[self.offset];
            match ch {
                b' ' | b'\t' | b'\n' | b'\r' => {
                    self.offset += 1;
                }
                b'(' => {
                    tokens.push(self.simple(Token::LParen));
                    self.offset += 1;
                }
                b')' => {
                    tokens.push(self.simple(Token::RParen));
                    self.offset += 1;
                }
                b',' => {
                    tokens.push(self.simple(Token::Comma));
                    self.offset += 1;
                }
                b'!' => {
                    tokens.push(self.simple(Token::Not));
                    self.offset += 1;
                }
                b'&' => {
                    if self.peek_char(bytes) == Some(b'&') {
                        tokens.push(self.simple(Token::And));
                        self.offset += 2;
                    } else {
                        return Err(DslError::UnexpectedToken {
                            expected: "&&",
                            found: "&".to_string(),
                            position: self.offset,
                        });
                    }
                }
                b'|' => {
                    if self.peek_char(bytes) == Some(b'|') {
                        tokens.push(self.simple(Token::Or));
                        self.offset += 2;
                    } else {
                        return Err(DslError::UnexpectedToken {
                            expected: "||",
                            found: "|".to_string(),
                            position: self.offset,
                        });
                    }
                }
                b'\'' | b'"' => {
                    let start = self.offset;
                    let text = self.lex_string(ch)?;
                    tokens.push(SpannedToken {
                        token: Token::Str(text),
                        position: start,
                    });
                }
                b'-' if self.peek_char(bytes).is_some_and(|b| b.is_ascii_digit()) => {
                    tokens.push(self.lex_number(bytes));
                }
                b'0' ..= b'9' => {
                    tokens.push(self.lex_number(bytes));
                }
                b'a' ..= b'z' | b'A' ..= b'Z' | b'_' => {
                    let start = self.offset;
                    self.consume_while(bytes, |b| b.is_ascii_alphanumeric() || b == b'_');
                    let slice = &self.input[start .. self.offset];
                    tokens.push(SpannedToken {
                        token: Self::keyword_or_ident(slice),
                        position: start,
                    });
                }
                _ => {
                    let found = self.input[self.offset ..]
                        .chars()
                        .next()
                        .map_or_else(String::new, |c| c.to_string());
                    return Err(DslError::UnexpectedToken {
                        expected: "identifier, literal, or operator",
                        found,
                        position: self.offset,
                    });
                }
            }
        }

        if tokens.is_empty() {
            return Err(DslError::EmptyInput);
        }

        tokens.push(SpannedToken {
            token: Token::Eof,
            position: self.offset,
        });
        Ok(tokens)
    }

    /// Builds a token at the current offset.
    const fn simple(&self, token: Token<'a>) -> SpannedToken<'a> {
        SpannedToken {
            token,
            position: self.offset,
        }
    }

    /// Returns the next byte without advancing.
    fn peek_char(&self, bytes: &[u8]) -> Option<u8> {
        bytes.get(self.offset + 1).copied()
    }

    /// Advances while the condition matches the current byte.
    fn consume_while<F>(&mut self, bytes: &[u8], condition: F)
    where
        F: Fn(u8) -> bool,
    {
        while let Some(&b) = bytes.get(self.offset) {
            if condition(b) {
                self.offset += 1;
            } else {
                break;
            }
        }
    }

    /// Lexes `-?digits(.digits)?` starting at the current offset.
    fn lex_number(&mut self, bytes: &[u8]) -> SpannedToken<'a> {
        let start = self.offset;
        if bytes.get(self.offset) == Some(&b'-') {
            self.offset += 1;
        }
        self.consume_while(bytes, |b| b.is_ascii_digit());
        if bytes.get(self.offset) == Some(&b'.')
            && bytes.get(self.offset + 1).is_some_and(u8::is_ascii_digit)
        {
            self.offset += 1;
            self.consume_while(bytes, |b| b.is_ascii_digit());
        }
        SpannedToken {
            token: Token::Number(&self.input[start .. self.offset]),
            position: start,
        }
    }

    /// Lexes a quoted string, resolving backslash escapes.
    fn lex_string(&mut self, quote: u8) -> Result<String, DslError> {
        let start = self.offset;
        let mut text = String::new();
        let mut chars = self.input[start + 1 ..].char_indices();

        while let Some((idx, ch)) = chars.next() {
            if ch == char::from(quote) {
                self.offset = start + 1 + idx + ch.len_utf8();
                return Ok(text);
            }
            if ch == '\\' {
                match chars.next() {
                    Some((_, 'n')) => text.push('\n'),
                    Some((_, 't')) => text.push('\t'),
                    Some((_, escaped @ ('\\' | '\'' | '"'))) => text.push(escaped),
                    Some((_, other)) => {
                        text.push('\\');
                        text.push(other);
                    }
                    None => break,
                }
            } else {
                text.push(ch);
            }
        }

        Err(DslError::UnterminatedString {
            position: start,
        })
    }

    /// Maps a slice to a keyword token or identifier token.
    fn keyword_or_ident(slice: &'a str) -> Token<'a> {
        match slice {
            "and" => Token::And,
            "or" => Token::Or,
            "not" => Token::Not,
            "true" => Token::True,
            "false" => Token::False,
            _ => Token::Ident(slice),
        }
    }
}

// ============================================================================
// SECTION: Parser
// ============================================================================

/// Recursive-descent parser for the rule DSL.
struct Parser<'input, 'resolver, P, R> {
    /// Token stream with source positions.
    tokens: Vec<SpannedToken<'input>>,
    /// Current token index.
    index: usize,
    /// Resolver for predicate calls.
    resolver: &'resolver R,
    /// Current nesting depth for bracketed or function expressions.
    nesting: usize,
    /// Marker for the predicate type.
    _marker: std::marker::PhantomData<P>,
}

impl<'input, 'resolver, P, R> Parser<'input, 'resolver, P, R>
where
    R: PredicateResolver<P>,
{
    /// Creates a parser over the token stream.
    const fn new(tokens: Vec<SpannedToken<'input>>, resolver: &'resolver R) -> Self {
        Self {
            tokens,
            index: 0,
            resolver,
            nesting: 0,
            _marker: std::marker::PhantomData,
        }
    }

    /// Parses a full expression.
    fn parse_expression(&mut self) -> Result<Requirement<P>, DslError> {
        self.parse_or()
    }

    /// Parses OR expressions.
    fn parse_or(&mut self) -> Result<Requirement<P>, DslError> {
        let mut parts = Vec::new();
        parts.push(self.parse_and()?);

        while self.matches(&Token::Or) {
            parts.push(self.parse_and()?);
        }

        if parts.len() == 1 { Ok(parts.remove(0)) } else { Ok(Requirement::or(parts)) }
    }

    /// Parses AND expressions.
    fn parse_and(&mut self) -> Result<Requirement<P>, DslError> {
        let mut parts = Vec::new();
        parts.push(self.parse_unary()?);

        while self.matches(&Token::And) {
            parts.push(self.parse_unary()?);
        }

        if parts.len() == 1 { Ok(parts.remove(0)) } else { Ok(Requirement::and(parts)) }
    }

    /// Parses unary expressions, including NOT.
    fn parse_unary(&mut self) -> Result<Requirement<P>, DslError> {
        if self.matches(&Token::Not) {
            let pos = self.current().position;
            return self.with_nesting(pos, |parser| {
                let requirement = parser.parse_unary()?;
                Ok(Requirement::negate(requirement))
            });
        }
        self.parse_primary()
    }

    /// Parses a primary expression.
    fn parse_primary(&mut self) -> Result<Requirement<P>, DslError> {
        let SpannedToken {
            token,
            position,
        } = self.current().clone();
        match token {
            Token::Ident(name) => {
                self.advance();
                if self.matches(&Token::LParen) {
                    self.parse_function(name, position)
                } else {
                    self.resolve_call(name, &[], position)
                }
            }
            Token::True => {
                self.advance();
                Ok(Requirement::always())
            }
            Token::False => {
                self.advance();
                Ok(Requirement::never())
            }
            Token::LParen => {
                self.advance();
                self.with_nesting(position, |parser| {
                    let expr = parser.parse_expression()?;
                    parser.expect(&Token::RParen, "`)`")?;
                    Ok(expr)
                })
            }
            Token::And | Token::Or if self.peek_is(&Token::LParen) => {
                self.advance();
                self.advance();
                self.with_nesting(position, |parser| {
                    let args = parser.parse_argument_list()?;
                    if token == Token::And {
                        Ok(Requirement::and(args))
                    } else {
                        Ok(Requirement::or(args))
                    }
                })
            }
            Token::Number(_)
            | Token::Str(_)
            | Token::RParen
            | Token::Comma
            | Token::And
            | Token::Or
            | Token::Not
            | Token::Eof => Err(DslError::UnexpectedToken {
                expected: "predicate or expression",
                found: self.describe_current(),
                position,
            }),
        }
    }

    /// Parses a function-style expression after its opening parenthesis.
    fn parse_function(
        &mut self,
        name: &'input str,
        name_pos: usize,
    ) -> Result<Requirement<P>, DslError> {
        self.with_nesting(name_pos, |parser| match name {
            "at_least" | "require_group" => parser.parse_group(),
            "all" => {
                let args = parser.parse_argument_list()?;
                Ok(Requirement::and(args))
            }
            "any" => {
                let args = parser.parse_argument_list()?;
                Ok(Requirement::or(args))
            }
            _ => {
                let literals = parser.parse_literal_list()?;
                parser.resolve_call(name, &literals, name_pos)
            }
        })
    }

    /// Parses a require-group expression with minimum count.
    fn parse_group(&mut self) -> Result<Requirement<P>, DslError> {
        let (min, min_pos) = self.parse_count_literal()?;
        self.expect(&Token::Comma, "`,` after the group count")?;

        if matches!(self.current().token, Token::RParen) {
            return Err(DslError::UnexpectedToken {
                expected: "at least one expression after the count",
                found: ")".to_string(),
                position: min_pos,
            });
        }

        let members = self.parse_argument_list()?;
        Ok(Requirement::require_group(min, members))
    }

    /// Parses the numeric count of an `at_least(...)` group.
    fn parse_count_literal(&mut self) -> Result<(u8, usize), DslError> {
        let SpannedToken {
            token,
            position,
        } = self.current().clone();

        match token {
            Token::Number(raw) => {
                self.advance();
                let value: u8 = raw.parse().map_err(|_| DslError::InvalidNumber {
                    raw: raw.to_string(),
                    position,
                })?;
                Ok((value, position))
            }
            _ => Err(DslError::UnexpectedToken {
                expected: "numeric literal",
                found: self.describe_current(),
                position,
            }),
        }
    }

    /// Parses a comma-separated list of sub-expressions up to `)`.
    fn parse_argument_list(&mut self) -> Result<Vec<Requirement<P>>, DslError> {
        let mut args = Vec::new();
        if self.matches(&Token::RParen) {
            return Ok(args);
        }

        loop {
            args.push(self.parse_expression()?);
            if self.matches(&Token::Comma) {
                continue;
            }
            self.expect(&Token::RParen, "`)` after arguments")?;
            break;
        }
        Ok(args)
    }

    /// Parses a comma-separated list of literal operands up to `)`.
    fn parse_literal_list(&mut self) -> Result<Vec<Literal>, DslError> {
        let mut literals = Vec::new();
        if self.matches(&Token::RParen) {
            return Ok(literals);
        }

        loop {
            literals.push(self.parse_literal()?);
            if self.matches(&Token::Comma) {
                continue;
            }
            self.expect(&Token::RParen, "`)` after operands")?;
            break;
        }
        Ok(literals)
    }

    /// Parses a single literal operand.
    fn parse_literal(&mut self) -> Result<Literal, DslError> {
        let SpannedToken {
            token,
            position,
        } = self.current().clone();

        let literal = match token {
            Token::Number(raw) => parse_number(raw, position)?,
            Token::Str(text) => Literal::Str(text),
            Token::True => Literal::Bool(true),
            Token::False => Literal::Bool(false),
            _ => {
                return Err(DslError::UnexpectedToken {
                    expected: "literal operand",
                    found: self.describe_current(),
                    position,
                });
            }
        };
        self.advance();
        Ok(literal)
    }

    /// Runs a parser step while enforcing the nesting limit.
    fn with_nesting<T>(
        &mut self,
        position: usize,
        f: impl FnOnce(&mut Self) -> Result<T, DslError>,
    ) -> Result<T, DslError> {
        let next_depth = self.nesting + 1;
        if next_depth > MAX_DSL_NESTING {
            return Err(DslError::NestingTooDeep {
                max_depth: MAX_DSL_NESTING,
                actual_depth: next_depth,
                position,
            });
        }
        self.nesting = next_depth;
        let result = f(self);
        self.nesting = self.nesting.saturating_sub(1);
        result
    }

    /// Resolves a predicate call using the resolver.
    fn resolve_call(
        &self,
        name: &'input str,
        args: &[Literal],
        position: usize,
    ) -> Result<Requirement<P>, DslError> {
        let call = PredicateCall {
            name,
            args,
            position,
        };
        match self.resolver.resolve(&call) {
            Ok(predicate) => Ok(Requirement::predicate(predicate)),
            Err(ResolveError::Unknown) => Err(DslError::UnknownPredicate {
                name: name.to_string(),
                position,
            }),
            Err(ResolveError::InvalidArguments(reason)) => Err(DslError::InvalidArguments {
                name: name.to_string(),
                reason,
                position,
            }),
        }
    }

    /// Consumes the expected token or returns an error.
    fn expect(&mut self, token: &Token<'_>, expected: &'static str) -> Result<(), DslError> {
        if self.matches(token) {
            Ok(())
        } else {
            Err(DslError::UnexpectedToken {
                expected,
                found: self.describe_current(),
                position: self.current().position,
            })
        }
    }

    /// Ensures the parser is at end-of-input.
    fn expect_eof(&self) -> Result<(), DslError> {
        if matches!(self.current().token, Token::Eof) {
            Ok(())
        } else {
            Err(DslError::TrailingInput {
                position: self.current().position,
            })
        }
    }

    /// Consumes the token if it matches the expected kind.
    fn matches(&mut self, kind: &Token<'_>) -> bool {
        if std::mem::discriminant(&self.current().token) == std::mem::discriminant(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Returns the current token.
    fn current(&self) -> &SpannedToken<'input> {
        let last = self.tokens.len().saturating_sub(1);
        &self.tokens[self.index.min(last)]
    }

    /// Returns true when the token after the current one has the given kind.
    fn peek_is(&self, kind: &Token<'_>) -> bool {
        self.tokens.get(self.index + 1).is_some_and(|next| {
            std::mem::discriminant(&next.token) == std::mem::discriminant(kind)
        })
    }

    /// Advances to the next token.
    const fn advance(&mut self) {
        if self.index + 1 < self.tokens.len() {
            self.index += 1;
        }
    }

    /// Formats the current token for diagnostics.
    fn describe_current(&self) -> String {
        match &self.current().token {
            Token::Ident(name) => (*name).to_string(),
            Token::Number(raw) => (*raw).to_string(),
            Token::Str(text) => Literal::Str(text.clone()).to_string(),
            Token::True => "true".to_string(),
            Token::False => "false".to_string(),
            Token::And => "&&".to_string(),
            Token::Or => "||".to_string(),
            Token::Not => "!".to_string(),
            Token::LParen => "(".to_string(),
            Token::RParen => ")".to_string(),
            Token::Comma => ",".to_string(),
            Token::Eof => "end of input".to_string(),
        }
    }
}

/// Parses a numeric token into an integer or float literal.
fn parse_number(raw: &str, position: usize) -> Result<Literal, DslError> {
    let invalid = || DslError::InvalidNumber {
        raw: raw.to_string(),
        position,
    };
    if raw.contains('.') {
        let value: f64 = raw.parse().map_err(|_| invalid())?;
        if value.is_finite() { Ok(Literal::Float(value)) } else { Err(invalid()) }
    } else {
        raw.parse::<i64>().map(Literal::Int).map_err(|_| invalid())
    }
}
