//! Recursive-descent parser for template formulas
//!
//! ```text
//! expr    := term (('+' | '-') term)*
//! term    := unary (('*' | '/') unary)*
//! unary   := ('-' | '+') unary | primary
//! primary := NUMBER | IDENT | IDENT '(' args ')' | '(' expr ')'
//! args    := attr ',' STRING ',' STRING ',' STRING
//! ```
//!
//! `lookup` is the only callable name. Its first argument may be a bare
//! identifier or a quoted string.

use super::ast::{Attribute, BinaryOp, Expr, LookupRef};
use super::lexer::{tokenize, Token};
use super::FormulaError;

/// Name of the cross-reference call
pub const LOOKUP_FN: &str = "lookup";

/// Parse a formula string into an expression tree
pub fn parse(source: &str) -> Result<Expr, FormulaError> {
    let tokens = tokenize(source)?;
    if tokens.is_empty() {
        return Err(FormulaError::Empty);
    }

    let mut parser = Parser { tokens, pos: 0 };
    let expr = parser.expr()?;

    match parser.peek() {
        None => Ok(expr),
        Some(tok) => Err(FormulaError::UnexpectedToken {
            found: tok.to_string(),
            expected: "end of formula",
        }),
    }
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) -> Option<Token> {
        let tok = self.tokens.get(self.pos).cloned();
        if tok.is_some() {
            self.pos += 1;
        }
        tok
    }

    fn expect(&mut self, expected: Token, what: &'static str) -> Result<(), FormulaError> {
        match self.advance() {
            Some(tok) if tok == expected => Ok(()),
            Some(tok) => Err(FormulaError::UnexpectedToken {
                found: tok.to_string(),
                expected: what,
            }),
            None => Err(FormulaError::UnexpectedEnd { expected: what }),
        }
    }

    fn expr(&mut self) -> Result<Expr, FormulaError> {
        let mut lhs = self.term()?;
        loop {
            let op = match self.peek() {
                Some(Token::Plus) => BinaryOp::Add,
                Some(Token::Minus) => BinaryOp::Sub,
                _ => break,
            };
            self.pos += 1;
            let rhs = self.term()?;
            lhs = Expr::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            };
        }
        Ok(lhs)
    }

    fn term(&mut self) -> Result<Expr, FormulaError> {
        let mut lhs = self.unary()?;
        loop {
            let op = match self.peek() {
                Some(Token::Star) => BinaryOp::Mul,
                Some(Token::Slash) => BinaryOp::Div,
                _ => break,
            };
            self.pos += 1;
            let rhs = self.unary()?;
            lhs = Expr::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            };
        }
        Ok(lhs)
    }

    fn unary(&mut self) -> Result<Expr, FormulaError> {
        match self.peek() {
            Some(Token::Minus) => {
                self.pos += 1;
                Ok(Expr::Neg(Box::new(self.unary()?)))
            }
            Some(Token::Plus) => {
                self.pos += 1;
                self.unary()
            }
            _ => self.primary(),
        }
    }

    fn primary(&mut self) -> Result<Expr, FormulaError> {
        match self.advance() {
            Some(Token::Number(n)) => Ok(Expr::Number(n)),
            Some(Token::Ident(name)) => {
                if self.peek() == Some(&Token::LParen) {
                    self.pos += 1;
                    self.call(name)
                } else {
                    Ok(Expr::Variable(name))
                }
            }
            Some(Token::LParen) => {
                let inner = self.expr()?;
                self.expect(Token::RParen, "')'")?;
                Ok(inner)
            }
            Some(tok) => Err(FormulaError::UnexpectedToken {
                found: tok.to_string(),
                expected: "number, variable, lookup or '('",
            }),
            None => Err(FormulaError::UnexpectedEnd {
                expected: "number, variable, lookup or '('",
            }),
        }
    }

    fn call(&mut self, name: String) -> Result<Expr, FormulaError> {
        if name != LOOKUP_FN {
            return Err(FormulaError::UnknownFunction { name });
        }

        let attribute = match self.advance() {
            Some(Token::Ident(s)) | Some(Token::Str(s)) => s
                .parse::<Attribute>()
                .map_err(|_| FormulaError::UnknownAttribute { name: s })?,
            Some(tok) => {
                return Err(FormulaError::UnexpectedToken {
                    found: tok.to_string(),
                    expected: "attribute name",
                })
            }
            None => {
                return Err(FormulaError::UnexpectedEnd {
                    expected: "attribute name",
                })
            }
        };

        self.expect(Token::Comma, "','")?;
        let title = self.string_arg("title")?;
        self.expect(Token::Comma, "','")?;
        let description = self.string_arg("description")?;
        self.expect(Token::Comma, "','")?;
        let material = self.string_arg("material")?;
        self.expect(Token::RParen, "')'")?;

        Ok(Expr::Lookup(LookupRef {
            attribute,
            title,
            description,
            material,
        }))
    }

    fn string_arg(&mut self, what: &'static str) -> Result<String, FormulaError> {
        match self.advance() {
            Some(Token::Str(s)) => Ok(s.trim().to_string()),
            Some(tok) => Err(FormulaError::UnexpectedToken {
                found: tok.to_string(),
                expected: what,
            }),
            None => Err(FormulaError::UnexpectedEnd { expected: what }),
        }
    }
}
