//! Crate dimensions - caller-supplied inner size and derived outer size
//!
//! All lengths are in inches; volumes are in cubic feet.

use serde::{Deserialize, Serialize};

use crate::entities::line_item::{find_item, ResolvedLineItem};
use crate::formula::Attribute;
use crate::pricing::QuoteError;

/// Cubic inches per cubic foot
pub const CUBIC_INCHES_PER_FOOT: f64 = 1728.0;

/// Volume in cubic feet of an L×W×H box measured in inches
pub fn cubic_feet(length: f64, width: f64, height: f64) -> f64 {
    length * width * height / CUBIC_INCHES_PER_FOOT
}

/// A line item identified by its title/description/material triple
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemKey {
    pub title: &'static str,
    pub description: &'static str,
    pub material: &'static str,
}

const fn key(title: &'static str, description: &'static str, material: &'static str) -> ItemKey {
    ItemKey {
        title,
        description,
        material,
    }
}

/// Wall layers added to both ends of the inner length
pub const LENGTH_LAYERS: [ItemKey; 2] = [
    key("Crate7", "End Panels", "PLY, 3/8"),
    key("Crate8", "Cleat, Thru-Edge", "LBR, 1X4"),
];

/// Wall layers added to both sides of the inner width
pub const WIDTH_LAYERS: [ItemKey; 2] = [
    key("Crate3", "Side Panels", "PLY, 3/8"),
    key("Crate4", "Cleat, Thru-Edge", "LBR, 1X4"),
];

/// Base and top layers stacked once onto the inner height
pub const HEIGHT_LAYERS: [ItemKey; 4] = [
    key("Crate1", "Skid", "LBR, 4X4"),
    key("Crate2", "Floorboard", "LBR, 2X10"),
    key("Crate11", "Top Panel", "PLY, 3/8"),
    key("Crate12", "Cleat, Thru-Edge", "LBR, 1X4"),
];

/// Caller-supplied inner dimensions
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InputDimensions {
    pub length: f64,
    pub width: f64,
    pub height: f64,
    /// Inner volume in cubic feet
    pub volume: f64,
}

impl InputDimensions {
    /// Validate and build inner dimensions. Each side must be a positive,
    /// finite number.
    pub fn new(length: f64, width: f64, height: f64) -> Result<Self, QuoteError> {
        for (name, value) in [("length", length), ("width", width), ("height", height)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(QuoteError::InvalidInput {
                    reason: format!("{} must be a positive number, got {}", name, value),
                });
            }
        }

        Ok(Self {
            length,
            width,
            height,
            volume: cubic_feet(length, width, height),
        })
    }
}

/// Derived outer dimensions
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OutputDimensions {
    pub length: f64,
    pub width: f64,
    pub height: f64,
    /// Outer volume in cubic feet
    pub volume: f64,
}

impl OutputDimensions {
    /// Add wall, base and top thicknesses taken from `items` to the inner
    /// dimensions. Items that are not present contribute nothing.
    pub fn resolve(input: &InputDimensions, items: &[ResolvedLineItem]) -> Self {
        let thickness = |k: &ItemKey| {
            find_item(items, k.title, k.description, k.material)
                .and_then(|item| item.attribute(Attribute::Thickness))
                .unwrap_or(0.0)
        };

        let length = input.length + 2.0 * LENGTH_LAYERS.iter().map(thickness).sum::<f64>();
        let width = input.width + 2.0 * WIDTH_LAYERS.iter().map(thickness).sum::<f64>();
        let height = input.height + HEIGHT_LAYERS.iter().map(thickness).sum::<f64>();

        Self {
            length,
            width,
            height,
            volume: cubic_feet(length, width, height),
        }
    }
}
