//! Template formulas
//!
//! Line-item widths, lengths and quantities may be written as arithmetic
//! over the crate dimensions and other line items:
//!
//! ```text
//! olength / lookup(width, 'Crate2', 'Floorboard', 'LBR, 2X10')
//! ```
//!
//! Formulas are tokenized, parsed into an [`Expr`] tree and evaluated
//! against a [`Variables`] binding plus a [`LookupSource`]. Nothing outside
//! this closed grammar is ever executed.

pub mod ast;
pub mod eval;
pub mod lexer;
pub mod parser;

use miette::Diagnostic;
use thiserror::Error;

pub use ast::{Attribute, BinaryOp, Expr, LookupRef};
pub use eval::{evaluate, LookupSource, NoLookups, Variables, VARIABLE_NAMES};
pub use parser::parse;

/// Errors raised while parsing or evaluating a formula
#[derive(Debug, Clone, PartialEq, Error, Diagnostic)]
pub enum FormulaError {
    #[error("formula is empty")]
    #[diagnostic(code(shipquote::formula::empty))]
    Empty,

    #[error("unexpected character '{ch}' at position {position}")]
    #[diagnostic(
        code(shipquote::formula::syntax),
        help("Formulas may only contain numbers, variables, + - * / ( ) and lookup(...)")
    )]
    UnexpectedChar { ch: char, position: usize },

    #[error("unterminated string starting at position {position}")]
    #[diagnostic(code(shipquote::formula::syntax))]
    UnterminatedString { position: usize },

    #[error("invalid number '{text}'")]
    #[diagnostic(code(shipquote::formula::syntax))]
    InvalidNumber { text: String },

    #[error("unexpected '{found}', expected {expected}")]
    #[diagnostic(code(shipquote::formula::syntax))]
    UnexpectedToken {
        found: String,
        expected: &'static str,
    },

    #[error("formula ended early, expected {expected}")]
    #[diagnostic(code(shipquote::formula::syntax))]
    UnexpectedEnd { expected: &'static str },

    #[error("unknown function '{name}'")]
    #[diagnostic(
        code(shipquote::formula::function),
        help("The only supported call is lookup(attribute, 'title', 'description', 'material')")
    )]
    UnknownFunction { name: String },

    #[error("unknown line-item attribute '{name}'")]
    #[diagnostic(code(shipquote::formula::attribute))]
    UnknownAttribute { name: String },

    #[error("unknown variable '{name}'")]
    #[diagnostic(
        code(shipquote::formula::variable),
        help("Known variables: ilength, iwidth, iheight, ift3, olength, owidth, oheight, oft3")
    )]
    UnknownVariable { name: String },

    #[error("division by zero")]
    #[diagnostic(code(shipquote::formula::arithmetic))]
    DivisionByZero,

    #[error("result is not a finite number")]
    #[diagnostic(code(shipquote::formula::arithmetic))]
    NonFinite,
}

/// A parsed formula together with its source text
#[derive(Debug, Clone, PartialEq)]
pub struct Formula {
    source: String,
    expr: Expr,
}

impl Formula {
    /// Parse a formula string
    pub fn parse(source: &str) -> Result<Self, FormulaError> {
        let expr = parser::parse(source)?;
        Ok(Self {
            source: source.to_string(),
            expr,
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn expr(&self) -> &Expr {
        &self.expr
    }

    /// Evaluate the formula
    pub fn evaluate(&self, vars: &Variables, lookups: &dyn LookupSource) -> Result<f64, FormulaError> {
        evaluate(&self.expr, vars, lookups)
    }
}

impl std::fmt::Display for Formula {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.source)
    }
}
