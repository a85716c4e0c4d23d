//! Expression tree produced by the formula parser

use serde::{Deserialize, Serialize};

/// Binary arithmetic operator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
}

impl std::fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BinaryOp::Add => write!(f, "+"),
            BinaryOp::Sub => write!(f, "-"),
            BinaryOp::Mul => write!(f, "*"),
            BinaryOp::Div => write!(f, "/"),
        }
    }
}

/// Line-item attribute readable through `lookup(...)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Attribute {
    Thickness,
    Width,
    Length,
    Quantity,
    ActualWidth,
    NominalWidth,
    NominalThickness,
    Scrap,
    UnitPrice,
    QuantityInUnits,
    TotalCost,
}

impl std::fmt::Display for Attribute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Attribute::Thickness => write!(f, "thickness"),
            Attribute::Width => write!(f, "width"),
            Attribute::Length => write!(f, "length"),
            Attribute::Quantity => write!(f, "quantity"),
            Attribute::ActualWidth => write!(f, "actual_width"),
            Attribute::NominalWidth => write!(f, "nominal_width"),
            Attribute::NominalThickness => write!(f, "nominal_thickness"),
            Attribute::Scrap => write!(f, "scrap"),
            Attribute::UnitPrice => write!(f, "unit_price"),
            Attribute::QuantityInUnits => write!(f, "quantity_in_units"),
            Attribute::TotalCost => write!(f, "total_cost"),
        }
    }
}

impl std::str::FromStr for Attribute {
    type Err = String;

    /// Case-insensitive; underscores are optional and the short catalog
    /// column names (`ActW`, `NomW`, `NomT`) are accepted.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| *c != '_')
            .collect::<String>()
            .to_lowercase();
        match key.as_str() {
            "thickness" | "actt" => Ok(Attribute::Thickness),
            "width" => Ok(Attribute::Width),
            "length" => Ok(Attribute::Length),
            "quantity" | "qty" => Ok(Attribute::Quantity),
            "actualwidth" | "actw" => Ok(Attribute::ActualWidth),
            "nominalwidth" | "nomw" => Ok(Attribute::NominalWidth),
            "nominalthickness" | "nomt" => Ok(Attribute::NominalThickness),
            "scrap" => Ok(Attribute::Scrap),
            "unitprice" => Ok(Attribute::UnitPrice),
            "quantityinunits" | "qtyuom" => Ok(Attribute::QuantityInUnits),
            "totalcost" => Ok(Attribute::TotalCost),
            _ => Err(format!("Unknown line-item attribute: {}", s)),
        }
    }
}

/// Reference to another line item's attribute, matched on the exact
/// title + description + material triple
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LookupRef {
    pub attribute: Attribute,
    pub title: String,
    pub description: String,
    pub material: String,
}

impl std::fmt::Display for LookupRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "lookup({}, '{}', '{}', '{}')",
            self.attribute, self.title, self.description, self.material
        )
    }
}

/// Formula expression
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Number(f64),
    Variable(String),
    Lookup(LookupRef),
    Neg(Box<Expr>),
    Binary {
        op: BinaryOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
}

impl Expr {
    /// Collect every lookup reference in the expression, in source order
    pub fn lookups(&self) -> Vec<&LookupRef> {
        let mut refs = Vec::new();
        self.collect_lookups(&mut refs);
        refs
    }

    fn collect_lookups<'a>(&'a self, refs: &mut Vec<&'a LookupRef>) {
        match self {
            Expr::Lookup(r) => refs.push(r),
            Expr::Neg(inner) => inner.collect_lookups(refs),
            Expr::Binary { lhs, rhs, .. } => {
                lhs.collect_lookups(refs);
                rhs.collect_lookups(refs);
            }
            Expr::Number(_) | Expr::Variable(_) => {}
        }
    }

    /// Collect every variable name in the expression
    pub fn variables(&self) -> Vec<&str> {
        match self {
            Expr::Variable(name) => vec![name.as_str()],
            Expr::Neg(inner) => inner.variables(),
            Expr::Binary { lhs, rhs, .. } => {
                let mut vars = lhs.variables();
                vars.extend(rhs.variables());
                vars
            }
            Expr::Number(_) | Expr::Lookup(_) => Vec::new(),
        }
    }
}
