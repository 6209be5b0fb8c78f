//! # Filter - event filter expressions
//!
//! Parser for the event filter language used to gate settings blocks, e.g.
//! `protocol=imap AND (local_name="mail.example.com" OR NOT remote=10.0.0.*)`.
//!
//! ## Grammar
//!
//! ```text
//! expr   := and ( "OR" and )*
//! and    := unary ( "AND" unary )*
//! unary  := "NOT" unary | "(" expr ")" | key op value
//! op     := "=" | "<" | ">" | "<=" | ">="
//! key    := word
//! value  := word | "quoted string"
//! ```
//!
//! Keywords are case-insensitive. Words may contain `*` and `?` wildcards.
//! This crate only parses; matching a filter against events happens
//! elsewhere. [`EventFilterSyntax`] plugs the parser into the settings
//! decoder as its filter validator.

mod lexer;
mod parser;

use std::fmt;

use thiserror::Error;

pub use parser::{parse, MAX_NESTING};

/// Comparison operator between a key and a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CmpOp {
    Eq,
    Lt,
    Le,
    Gt,
    Ge,
}

impl fmt::Display for CmpOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CmpOp::Eq => "=",
            CmpOp::Lt => "<",
            CmpOp::Le => "<=",
            CmpOp::Gt => ">",
            CmpOp::Ge => ">=",
        })
    }
}

/// Parsed filter expression.
///
/// A chain like `a AND b AND c` is one `And` node with three terms, so tree
/// depth only grows with `NOT` and parentheses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    And(Vec<Expr>),
    Or(Vec<Expr>),
    Not(Box<Expr>),
    Cmp { key: String, op: CmpOp, value: String },
}

impl Expr {
    /// Number of comparisons in the expression.
    #[must_use]
    pub fn comparisons(&self) -> usize {
        match self {
            Expr::And(terms) | Expr::Or(terms) => terms.iter().map(Expr::comparisons).sum(),
            Expr::Not(e) => e.comparisons(),
            Expr::Cmp { .. } => 1,
        }
    }
}

/// Renders the expression fully parenthesized, with values quoted when
/// they aren't plain words. The output parses back to the same tree.
impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::And(terms) => write_joined(f, terms, " AND "),
            Expr::Or(terms) => write_joined(f, terms, " OR "),
            Expr::Not(e) => write!(f, "NOT {}", e),
            Expr::Cmp { key, op, value } => {
                write!(f, "{}{}", key, op)?;
                if !value.is_empty() && value.chars().all(lexer::is_word_char) {
                    f.write_str(value)
                } else {
                    f.write_str("\"")?;
                    for c in value.chars() {
                        if c == '"' || c == '\\' {
                            f.write_str("\\")?;
                        }
                        write!(f, "{}", c)?;
                    }
                    f.write_str("\"")
                }
            }
        }
    }
}

fn write_joined(f: &mut fmt::Formatter<'_>, terms: &[Expr], sep: &str) -> fmt::Result {
    f.write_str("(")?;
    for (i, term) in terms.iter().enumerate() {
        if i > 0 {
            f.write_str(sep)?;
        }
        write!(f, "{}", term)?;
    }
    f.write_str(")")
}

/// Why a filter failed to parse.
///
/// Every message starts with `event filter: syntax error`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilterError {
    #[error("event filter: syntax error, unexpected end of input, expecting {expected}")]
    UnexpectedEnd { expected: &'static str },

    #[error("event filter: syntax error, unexpected {found} at offset {offset}, expecting {expected}")]
    UnexpectedToken {
        found: String,
        offset: usize,
        expected: &'static str,
    },

    #[error("event filter: syntax error, unexpected character '{ch}' at offset {offset}")]
    UnexpectedChar { ch: char, offset: usize },

    #[error("event filter: syntax error, unterminated string starting at offset {offset}")]
    Unterminated { offset: usize },

    #[error("event filter: syntax error, nesting deeper than {limit} levels at offset {offset}")]
    TooDeep { offset: usize, limit: usize },
}

/// Validates filters by parsing them.
#[derive(Debug, Clone, Copy, Default)]
pub struct EventFilterSyntax;

impl settings::FilterValidator for EventFilterSyntax {
    fn validate(&self, filter: &str) -> Result<(), String> {
        parse(filter).map(|_| ()).map_err(|e| e.to_string())
    }
}
