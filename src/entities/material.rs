//! Material catalog - physical and cost attributes keyed by material name

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Physical and cost attributes of one material
///
/// Dimensions are in inches. Any attribute missing from the dataset is 0.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaterialSpec {
    /// Finished thickness
    pub actual_thickness: f64,

    /// Finished width
    pub actual_width: f64,

    /// Trade (nominal) width used for board-foot pricing
    pub nominal_width: f64,

    /// Trade (nominal) thickness used for board-foot pricing
    pub nominal_thickness: f64,

    /// Waste allowance as a fraction of the net quantity
    pub scrap: f64,

    /// Price per unit of measure
    pub unit_price: f64,
}

/// Read-only catalog of materials
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MaterialCatalog {
    materials: BTreeMap<String, MaterialSpec>,
}

impl MaterialCatalog {
    pub fn new(materials: BTreeMap<String, MaterialSpec>) -> Self {
        Self { materials }
    }

    /// Look up a material by exact key
    pub fn get(&self, key: &str) -> Option<&MaterialSpec> {
        self.materials.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.materials.contains_key(key)
    }

    /// Iterate materials in key order
    pub fn iter(&self) -> impl Iterator<Item = (&String, &MaterialSpec)> {
        self.materials.iter()
    }

    pub fn len(&self) -> usize {
        self.materials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }
}

impl FromIterator<(String, MaterialSpec)> for MaterialCatalog {
    fn from_iter<I: IntoIterator<Item = (String, MaterialSpec)>>(iter: I) -> Self {
        Self {
            materials: iter.into_iter().collect(),
        }
    }
}
