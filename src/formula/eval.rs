//! Formula evaluation against dimension variables and line-item lookups

use super::ast::{BinaryOp, Expr, LookupRef};
use super::FormulaError;
use crate::entities::dimensions::{InputDimensions, OutputDimensions};

/// Source of values for `lookup(...)` references
pub trait LookupSource {
    /// Resolve a reference to a number. Missing items resolve to 0.
    fn lookup(&self, reference: &LookupRef) -> f64;
}

impl<F> LookupSource for F
where
    F: Fn(&LookupRef) -> f64,
{
    fn lookup(&self, reference: &LookupRef) -> f64 {
        self(reference)
    }
}

/// Lookup source with no line items; every reference is 0
pub struct NoLookups;

impl LookupSource for NoLookups {
    fn lookup(&self, _reference: &LookupRef) -> f64 {
        0.0
    }
}

/// The fixed variable set formulas can reference
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Variables {
    pub inner_length: f64,
    pub inner_width: f64,
    pub inner_height: f64,
    pub inner_volume: f64,
    pub outer_length: f64,
    pub outer_width: f64,
    pub outer_height: f64,
    pub outer_volume: f64,
}

impl Variables {
    pub fn new(input: &InputDimensions, output: &OutputDimensions) -> Self {
        Self {
            inner_length: input.length,
            inner_width: input.width,
            inner_height: input.height,
            inner_volume: input.volume,
            outer_length: output.length,
            outer_width: output.width,
            outer_height: output.height,
            outer_volume: output.volume,
        }
    }

    /// Value of a variable by name (short or long form)
    pub fn get(&self, name: &str) -> Option<f64> {
        match name {
            "ilength" | "inner_length" => Some(self.inner_length),
            "iwidth" | "inner_width" => Some(self.inner_width),
            "iheight" | "inner_height" => Some(self.inner_height),
            "ift3" | "inner_volume" => Some(self.inner_volume),
            "olength" | "outer_length" => Some(self.outer_length),
            "owidth" | "outer_width" => Some(self.outer_width),
            "oheight" | "outer_height" => Some(self.outer_height),
            "oft3" | "outer_volume" => Some(self.outer_volume),
            _ => None,
        }
    }

    /// True if `name` is a bound variable
    pub fn is_known(name: &str) -> bool {
        VARIABLE_NAMES.contains(&name)
    }
}

/// Every accepted variable spelling
pub const VARIABLE_NAMES: &[&str] = &[
    "ilength",
    "iwidth",
    "iheight",
    "ift3",
    "olength",
    "owidth",
    "oheight",
    "oft3",
    "inner_length",
    "inner_width",
    "inner_height",
    "inner_volume",
    "outer_length",
    "outer_width",
    "outer_height",
    "outer_volume",
];

/// Evaluate an expression. Fails on unknown variables, division by zero,
/// and any non-finite intermediate result.
pub fn evaluate(
    expr: &Expr,
    vars: &Variables,
    lookups: &dyn LookupSource,
) -> Result<f64, FormulaError> {
    let value = match expr {
        Expr::Number(n) => *n,
        Expr::Variable(name) => vars
            .get(name)
            .ok_or_else(|| FormulaError::UnknownVariable { name: name.clone() })?,
        Expr::Lookup(reference) => lookups.lookup(reference),
        Expr::Neg(inner) => -evaluate(inner, vars, lookups)?,
        Expr::Binary { op, lhs, rhs } => {
            let a = evaluate(lhs, vars, lookups)?;
            let b = evaluate(rhs, vars, lookups)?;
            match op {
                BinaryOp::Add => a + b,
                BinaryOp::Sub => a - b,
                BinaryOp::Mul => a * b,
                BinaryOp::Div => {
                    if b == 0.0 {
                        return Err(FormulaError::DivisionByZero);
                    }
                    a / b
                }
            }
        }
    };

    if value.is_finite() {
        Ok(value)
    } else {
        Err(FormulaError::NonFinite)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formula::ast::Attribute;
    use crate::formula::parser::parse;

    fn vars() -> Variables {
        Variables {
            inner_length: 48.0,
            inner_width: 24.0,
            inner_height: 36.0,
            inner_volume: 24.0,
            outer_length: 50.25,
            outer_width: 26.25,
            outer_height: 42.125,
            outer_volume: 32.16,
        }
    }

    fn eval_str(source: &str) -> Result<f64, FormulaError> {
        evaluate(&parse(source).unwrap(), &vars(), &NoLookups)
    }

    #[test]
    fn test_arithmetic() {
        assert_eq!(eval_str("1 + 2 * 3").unwrap(), 7.0);
        assert_eq!(eval_str("(1 + 2) * 3").unwrap(), 9.0);
        assert_eq!(eval_str("8 / 4 / 2").unwrap(), 1.0);
        assert_eq!(eval_str("-2 * -3").unwrap(), 6.0);
        assert_eq!(eval_str("10 - 4 - 3").unwrap(), 3.0);
    }

    #[test]
    fn test_variables_short_and_long_names() {
        assert_eq!(eval_str("ilength + iwidth").unwrap(), 72.0);
        assert_eq!(eval_str("inner_length + inner_width").unwrap(), 72.0);
        assert_eq!(eval_str("olength").unwrap(), 50.25);
        assert_eq!(eval_str("oft3").unwrap(), 32.16);
    }

    #[test]
    fn test_unknown_variable() {
        assert!(matches!(
            eval_str("ilength + depth"),
            Err(FormulaError::UnknownVariable { .. })
        ));
    }

    #[test]
    fn test_division_by_zero() {
        assert!(matches!(eval_str("ilength / 0"), Err(FormulaError::DivisionByZero)));
    }

    #[test]
    fn test_lookup_closure() {
        let expr = parse("lookup(thickness, 'Crate7', 'End Panels', 'PLY, 3/8') * 2").unwrap();
        let source = |r: &LookupRef| {
            if r.attribute == Attribute::Thickness && r.title == "Crate7" {
                0.375
            } else {
                0.0
            }
        };
        assert_eq!(evaluate(&expr, &vars(), &source).unwrap(), 0.75);
    }

    #[test]
    fn test_missing_lookup_is_zero() {
        assert_eq!(
            eval_str("ilength + lookup(length, 'Nope', 'Nothing', 'NONE')").unwrap(),
            48.0
        );
    }

    #[test]
    fn test_variable_names_known() {
        for name in VARIABLE_NAMES {
            assert!(Variables::is_known(name));
            assert!(vars().get(name).is_some());
        }
        assert!(!Variables::is_known("length"));
    }
}
