use crate::lexer::{tokenize, Token};
use crate::{Expr, FilterError};

/// Deepest allowed nesting of `NOT` and parentheses.
pub const MAX_NESTING: usize = 64;

/// Parses a complete filter expression.
///
/// # Errors
///
/// Returns a [`FilterError`] for empty input, stray tokens, unbalanced
/// parentheses, missing operators or values, unterminated strings, and
/// nesting deeper than [`MAX_NESTING`].
pub fn parse(input: &str) -> Result<Expr, FilterError> {
    let mut parser = Parser {
        tokens: tokenize(input)?,
        pos: 0,
        depth: 0,
    };
    let expr = parser.or_expr()?;
    if let Some((offset, token)) = parser.peek() {
        return Err(FilterError::UnexpectedToken {
            found: token.describe(),
            offset: *offset,
            expected: "AND, OR or end of input",
        });
    }
    Ok(expr)
}

struct Parser {
    tokens: Vec<(usize, Token)>,
    pos: usize,
    depth: usize,
}

impl Parser {
    fn peek(&self) -> Option<&(usize, Token)> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self, expected: &'static str) -> Result<(usize, Token), FilterError> {
        let token = self
            .tokens
            .get(self.pos)
            .cloned()
            .ok_or(FilterError::UnexpectedEnd { expected })?;
        self.pos += 1;
        Ok(token)
    }

    fn eat_keyword(&mut self, keyword: &str) -> bool {
        match self.peek() {
            Some((_, token)) if token.is_keyword(keyword) => {
                self.pos += 1;
                true
            }
            _ => false,
        }
    }

    /// Runs `parse` one nesting level deeper.
    fn nested(
        &mut self,
        offset: usize,
        parse: fn(&mut Self) -> Result<Expr, FilterError>,
    ) -> Result<Expr, FilterError> {
        if self.depth >= MAX_NESTING {
            return Err(FilterError::TooDeep {
                offset,
                limit: MAX_NESTING,
            });
        }
        self.depth += 1;
        let expr = parse(self);
        self.depth -= 1;
        expr
    }

    fn or_expr(&mut self) -> Result<Expr, FilterError> {
        let mut terms = vec![self.and_expr()?];
        while self.eat_keyword("OR") {
            terms.push(self.and_expr()?);
        }
        Ok(collapse(terms, Expr::Or))
    }

    fn and_expr(&mut self) -> Result<Expr, FilterError> {
        let mut terms = vec![self.unary()?];
        while self.eat_keyword("AND") {
            terms.push(self.unary()?);
        }
        Ok(collapse(terms, Expr::And))
    }

    fn unary(&mut self) -> Result<Expr, FilterError> {
        let offset = self.peek().map_or(0, |(offset, _)| *offset);
        if self.eat_keyword("NOT") {
            let inner = self.nested(offset, Self::unary)?;
            return Ok(Expr::Not(Box::new(inner)));
        }
        match self.next("expression")? {
            (offset, Token::LParen) => {
                let expr = self.nested(offset, Self::or_expr)?;
                match self.next("')'")? {
                    (_, Token::RParen) => Ok(expr),
                    (offset, token) => Err(unexpected(offset, &token, "')'")),
                }
            }
            (_, Token::Word(key)) if !is_connective(&key) => self.comparison(key),
            (offset, token) => Err(unexpected(offset, &token, "expression")),
        }
    }

    fn comparison(&mut self, key: String) -> Result<Expr, FilterError> {
        let op = match self.next("operator")? {
            (_, Token::Op(op)) => op,
            (offset, token) => return Err(unexpected(offset, &token, "operator")),
        };
        let value = match self.next("value")? {
            (_, Token::Word(value)) | (_, Token::Quoted(value)) => value,
            (offset, token) => return Err(unexpected(offset, &token, "value")),
        };
        Ok(Expr::Cmp { key, op, value })
    }
}

/// A single term stays as it is; more become one flat `AND`/`OR` node.
fn collapse(mut terms: Vec<Expr>, join: fn(Vec<Expr>) -> Expr) -> Expr {
    if terms.len() == 1 {
        if let Some(term) = terms.pop() {
            return term;
        }
    }
    join(terms)
}

fn is_connective(word: &str) -> bool {
    word.eq_ignore_ascii_case("AND") || word.eq_ignore_ascii_case("OR")
}

fn unexpected(offset: usize, token: &Token, expected: &'static str) -> FilterError {
    FilterError::UnexpectedToken {
        found: token.describe(),
        offset,
        expected,
    }
}
