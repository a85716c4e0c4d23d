//! Resolved line items and the line-item pricer

use serde::{Deserialize, Serialize};

use crate::entities::material::MaterialSpec;
use crate::entities::template::{LineItemTemplate, TemplateValue, Uom};
use crate::formula::Attribute;

/// Square inches per square foot; also board-foot inches (1 BF = 144 in³ / 1 in)
pub const SQUARE_INCHES_PER_FOOT: f64 = 144.0;

/// A line item joined with its material and resolved for one quote
///
/// `width`, `length` and `quantity` start as `None` when the template holds
/// a formula and are filled in by the width, length and quantity passes.
/// A formula that fails to resolve leaves its attribute at `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedLineItem {
    pub title: String,
    pub description: String,
    pub material: String,
    pub uom: Uom,

    pub thickness: f64,
    pub scrap: f64,
    pub unit_price: f64,
    pub nominal_width: f64,
    pub nominal_thickness: f64,
    pub actual_width: f64,

    pub width: Option<f64>,
    pub length: Option<f64>,
    pub quantity: Option<f64>,

    pub quantity_in_units: f64,
    pub total_cost: f64,
}

impl ResolvedLineItem {
    /// Join a template with its catalog entry. Literal and material-width
    /// attributes are resolved immediately; formulas are left pending.
    pub fn from_template(template: &LineItemTemplate, material: &MaterialSpec) -> Self {
        let initial = |value: &TemplateValue| match value {
            TemplateValue::Literal(n) => Some(*n),
            TemplateValue::MaterialWidth => Some(material.actual_width),
            TemplateValue::Formula(_) => None,
        };

        Self {
            title: template.title.clone(),
            description: template.description.clone(),
            material: template.material.clone(),
            uom: template.uom,
            thickness: material.actual_thickness,
            scrap: material.scrap,
            unit_price: material.unit_price,
            nominal_width: material.nominal_width,
            nominal_thickness: material.nominal_thickness,
            actual_width: material.actual_width,
            width: initial(&template.width),
            length: initial(&template.length),
            quantity: initial(&template.quantity),
            quantity_in_units: 0.0,
            total_cost: 0.0,
        }
    }

    /// Does this item match the given title/description/material triple?
    pub fn matches(&self, title: &str, description: &str, material: &str) -> bool {
        self.title == title && self.description == description && self.material == material
    }

    /// Read an attribute; `None` if it is not resolved
    pub fn attribute(&self, attribute: Attribute) -> Option<f64> {
        match attribute {
            Attribute::Thickness => Some(self.thickness),
            Attribute::Width => self.width,
            Attribute::Length => self.length,
            Attribute::Quantity => self.quantity,
            Attribute::ActualWidth => Some(self.actual_width),
            Attribute::NominalWidth => Some(self.nominal_width),
            Attribute::NominalThickness => Some(self.nominal_thickness),
            Attribute::Scrap => Some(self.scrap),
            Attribute::UnitPrice => Some(self.unit_price),
            Attribute::QuantityInUnits => Some(self.quantity_in_units),
            Attribute::TotalCost => Some(self.total_cost),
        }
    }

    /// Quantity expressed in the item's unit of measure, scrap included.
    /// Unresolved attributes count as 0.
    pub fn units(&self) -> f64 {
        let quantity = self.quantity.unwrap_or(0.0);
        let length = self.length.unwrap_or(0.0);
        let width = self.width.unwrap_or(0.0);

        match self.uom {
            Uom::BoardFeet => {
                quantity * length * self.nominal_width * self.nominal_thickness
                    / SQUARE_INCHES_PER_FOOT
                    * (1.0 + self.scrap)
            }
            Uom::SquareFeet => {
                quantity * length * width / SQUARE_INCHES_PER_FOOT * (1.0 + self.scrap)
            }
            Uom::Each => quantity,
        }
    }

    /// Compute quantity-in-units and total cost. No rounding.
    pub fn price(&mut self) {
        self.quantity_in_units = self.units();
        self.total_cost = self.quantity_in_units * self.unit_price;
    }

    pub fn label(&self) -> String {
        format!("{} / {} / {}", self.title, self.description, self.material)
    }
}

/// Find the first item matching the exact title/description/material triple
pub fn find_item<'a>(
    items: &'a [ResolvedLineItem],
    title: &str,
    description: &str,
    material: &str,
) -> Option<&'a ResolvedLineItem> {
    items
        .iter()
        .find(|item| item.matches(title, description, material))
}
