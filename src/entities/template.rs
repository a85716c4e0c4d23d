//! Component templates - per-family bill-of-materials line items

use serde::{Deserialize, Serialize};

/// Sentinel for "use the material's actual width"
pub const MATERIAL_WIDTH: &str = "MatList";

/// Unit of measure governing how a line item is priced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Uom {
    /// Board feet
    #[serde(rename = "BF")]
    BoardFeet,
    /// Square feet
    #[serde(rename = "SF")]
    SquareFeet,
    /// Each (count)
    #[serde(rename = "EA")]
    Each,
}

impl std::fmt::Display for Uom {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Uom::BoardFeet => write!(f, "BF"),
            Uom::SquareFeet => write!(f, "SF"),
            Uom::Each => write!(f, "EA"),
        }
    }
}

impl std::str::FromStr for Uom {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "BF" => Ok(Uom::BoardFeet),
            "SF" => Ok(Uom::SquareFeet),
            "EA" => Ok(Uom::Each),
            _ => Err(format!("Invalid unit of measure: {}. Use BF, SF or EA", s)),
        }
    }
}

/// A template attribute: a literal number, a formula, or the material width
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawValue", into = "RawValue")]
pub enum TemplateValue {
    Literal(f64),
    MaterialWidth,
    Formula(String),
}

impl Default for TemplateValue {
    fn default() -> Self {
        TemplateValue::Literal(0.0)
    }
}

impl TemplateValue {
    pub fn is_formula(&self) -> bool {
        matches!(self, TemplateValue::Formula(_))
    }
}

impl std::fmt::Display for TemplateValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TemplateValue::Literal(n) => write!(f, "{}", n),
            TemplateValue::MaterialWidth => write!(f, "{}", MATERIAL_WIDTH),
            TemplateValue::Formula(s) => write!(f, "{}", s),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum RawValue {
    Number(f64),
    Text(String),
}

impl From<RawValue> for TemplateValue {
    fn from(raw: RawValue) -> Self {
        match raw {
            RawValue::Number(n) => TemplateValue::Literal(n),
            RawValue::Text(s) => {
                let trimmed = s.trim();
                if trimmed == MATERIAL_WIDTH {
                    TemplateValue::MaterialWidth
                } else {
                    TemplateValue::Formula(trimmed.to_string())
                }
            }
        }
    }
}

impl From<TemplateValue> for RawValue {
    fn from(value: TemplateValue) -> Self {
        match value {
            TemplateValue::Literal(n) => RawValue::Number(n),
            TemplateValue::MaterialWidth => RawValue::Text(MATERIAL_WIDTH.to_string()),
            TemplateValue::Formula(s) => RawValue::Text(s),
        }
    }
}

/// One bill-of-materials entry in a component family
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItemTemplate {
    pub title: String,

    #[serde(default)]
    pub description: String,

    /// Key into the material catalog
    pub material: String,

    pub uom: Uom,

    #[serde(default)]
    pub width: TemplateValue,

    #[serde(default)]
    pub length: TemplateValue,

    #[serde(default)]
    pub quantity: TemplateValue,
}

impl LineItemTemplate {
    /// Does this template match the given title/description/material triple?
    pub fn matches(&self, title: &str, description: &str, material: &str) -> bool {
        self.title == title && self.description == description && self.material == material
    }

    /// Human-readable label, e.g. "Crate4 / Cleat, Thru-Edge / LBR, 1X4"
    pub fn label(&self) -> String {
        format!("{} / {} / {}", self.title, self.description, self.material)
    }
}

/// A named group of line items for one subsystem of the crate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentFamily {
    pub name: String,
    pub items: Vec<LineItemTemplate>,
}

/// All component families in canonical processing order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TemplateStore {
    families: Vec<ComponentFamily>,
}

impl TemplateStore {
    pub fn new(families: Vec<ComponentFamily>) -> Self {
        Self { families }
    }

    /// Find a family by name (case-insensitive)
    pub fn get(&self, name: &str) -> Option<&ComponentFamily> {
        let name = name.trim();
        self.families
            .iter()
            .find(|f| f.name.eq_ignore_ascii_case(name))
    }

    /// Families in processing order
    pub fn families(&self) -> &[ComponentFamily] {
        &self.families
    }

    pub fn names(&self) -> Vec<&str> {
        self.families.iter().map(|f| f.name.as_str()).collect()
    }

    /// Every template in every family
    pub fn all_items(&self) -> impl Iterator<Item = (&ComponentFamily, &LineItemTemplate)> {
        self.families
            .iter()
            .flat_map(|f| f.items.iter().map(move |item| (f, item)))
    }
}
