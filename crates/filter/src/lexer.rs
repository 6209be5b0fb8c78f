//! Tokenizer for event filter expressions.

use crate::{CmpOp, FilterError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Token {
    LParen,
    RParen,
    Op(CmpOp),
    /// Bare word: key, unquoted value, or one of the `AND`/`OR`/`NOT`
    /// keywords (told apart by the parser).
    Word(String),
    /// Double-quoted string with escapes resolved.
    Quoted(String),
}

impl Token {
    pub(crate) fn describe(&self) -> String {
        match self {
            Token::LParen => "'('".to_string(),
            Token::RParen => "')'".to_string(),
            Token::Op(op) => format!("'{}'", op),
            Token::Word(w) => format!("'{}'", w),
            Token::Quoted(s) => format!("string \"{}\"", s),
        }
    }

    pub(crate) fn is_keyword(&self, keyword: &str) -> bool {
        matches!(self, Token::Word(w) if w.eq_ignore_ascii_case(keyword))
    }
}

/// Characters allowed in a bare word.
pub(crate) fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | ':' | '/' | '@' | '*' | '?' | '-')
}

/// Splits `input` into tokens, each paired with its byte offset.
pub(crate) fn tokenize(input: &str) -> Result<Vec<(usize, Token)>, FilterError> {
    let mut tokens = Vec::new();
    let mut chars = input.char_indices().peekable();

    while let Some(&(pos, c)) = chars.peek() {
        match c {
            c if c.is_whitespace() => {
                chars.next();
            }
            '(' => {
                chars.next();
                tokens.push((pos, Token::LParen));
            }
            ')' => {
                chars.next();
                tokens.push((pos, Token::RParen));
            }
            '=' => {
                chars.next();
                tokens.push((pos, Token::Op(CmpOp::Eq)));
            }
            '<' | '>' => {
                chars.next();
                let or_equal = chars.next_if(|&(_, c)| c == '=').is_some();
                let op = match (c, or_equal) {
                    ('<', false) => CmpOp::Lt,
                    ('<', true) => CmpOp::Le,
                    ('>', false) => CmpOp::Gt,
                    _ => CmpOp::Ge,
                };
                tokens.push((pos, Token::Op(op)));
            }
            '"' => {
                chars.next();
                let mut value = String::new();
                loop {
                    match chars.next() {
                        Some((_, '"')) => break,
                        Some((_, '\\')) => match chars.next() {
                            Some((_, escaped)) => value.push(escaped),
                            None => return Err(FilterError::Unterminated { offset: pos }),
                        },
                        Some((_, c)) => value.push(c),
                        None => return Err(FilterError::Unterminated { offset: pos }),
                    }
                }
                tokens.push((pos, Token::Quoted(value)));
            }
            c if is_word_char(c) => {
                let mut word = String::new();
                while let Some((_, c)) = chars.next_if(|&(_, c)| is_word_char(c)) {
                    word.push(c);
                }
                tokens.push((pos, Token::Word(word)));
            }
            other => {
                return Err(FilterError::UnexpectedChar { ch: other, offset: pos });
            }
        }
    }
    Ok(tokens)
}
