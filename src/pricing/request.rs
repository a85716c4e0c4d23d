//! Quote request/response contract
//!
//! ```json
//! {
//!   "dimensions": { "length": 48, "width": 24, "height": 36 },
//!   "complexity": [ { "title": "simple", "isActive": 1 } ],
//!   "components": { "structure": [ { "title": "crate", "isActive": 1 } ] }
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::entities::InputDimensions;
use crate::pricing::pipeline::ComplexityTier;
use crate::pricing::QuoteError;

/// Message used in the failure envelope
pub const FAILURE_MESSAGE: &str = "An error occurred while fetching Total Cost.";

/// Category used when a request is built from command-line flags
pub const DEFAULT_CATEGORY: &str = "components";

/// One dimension as sent by the caller. Anything that is not a JSON
/// number is kept so validation can reject it as invalid input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DimensionValue {
    Number(f64),
    Other(serde_json::Value),
}

impl DimensionValue {
    fn as_number(&self, name: &str) -> Result<f64, QuoteError> {
        match self {
            DimensionValue::Number(n) => Ok(*n),
            DimensionValue::Other(value) => Err(QuoteError::InvalidInput {
                reason: format!("{} must be a number, got {}", name, value),
            }),
        }
    }
}

impl From<f64> for DimensionValue {
    fn from(value: f64) -> Self {
        DimensionValue::Number(value)
    }
}

/// Inner dimensions as sent by the caller
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RequestDimensions {
    pub length: Option<DimensionValue>,
    pub width: Option<DimensionValue>,
    pub height: Option<DimensionValue>,
}

/// Activation flag: `1` (or `true`) means active
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ActiveFlag {
    Number(f64),
    Bool(bool),
}

impl Default for ActiveFlag {
    fn default() -> Self {
        ActiveFlag::Number(0.0)
    }
}

impl ActiveFlag {
    pub fn is_active(&self) -> bool {
        match self {
            ActiveFlag::Number(n) => *n == 1.0,
            ActiveFlag::Bool(b) => *b,
        }
    }
}

impl From<bool> for ActiveFlag {
    fn from(active: bool) -> Self {
        ActiveFlag::Number(if active { 1.0 } else { 0.0 })
    }
}

/// A titled on/off selection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Toggle {
    pub title: String,

    #[serde(rename = "isActive", default)]
    pub is_active: ActiveFlag,
}

impl Toggle {
    pub fn new(title: impl Into<String>, active: bool) -> Self {
        Self {
            title: title.into(),
            is_active: active.into(),
        }
    }
}

/// Body of a quote request
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuoteRequest {
    #[serde(default)]
    pub dimensions: RequestDimensions,

    #[serde(default)]
    pub complexity: Vec<Toggle>,

    /// Component toggles grouped by UI category. Required: a body without
    /// it is malformed.
    pub components: BTreeMap<String, Vec<Toggle>>,
}

/// Normalized title → active map; later duplicates override earlier ones
pub type Selection = BTreeMap<String, bool>;

fn normalize(title: &str) -> String {
    title.trim().to_lowercase()
}

fn selection<'a>(toggles: impl IntoIterator<Item = &'a Toggle>) -> Selection {
    let mut map = Selection::new();
    for toggle in toggles {
        map.insert(normalize(&toggle.title), toggle.is_active.is_active());
    }
    map
}

impl QuoteRequest {
    /// Start a request for the given inner dimensions
    pub fn new(length: f64, width: f64, height: f64) -> Self {
        Self {
            dimensions: RequestDimensions {
                length: Some(length.into()),
                width: Some(width.into()),
                height: Some(height.into()),
            },
            ..Default::default()
        }
    }

    /// Parse a JSON request body
    pub fn from_json(body: &str) -> Result<Self, QuoteError> {
        Ok(serde_json::from_str(body)?)
    }

    /// Add one toggle per tier, with only `tier` active
    pub fn with_complexity(mut self, tier: Option<ComplexityTier>) -> Self {
        for candidate in [
            ComplexityTier::Simple,
            ComplexityTier::Medium,
            ComplexityTier::Complex,
        ] {
            self.complexity
                .push(Toggle::new(candidate.to_string(), Some(candidate) == tier));
        }
        self
    }

    /// Add a component toggle under the default category
    pub fn with_component(mut self, family: impl Into<String>, active: bool) -> Self {
        self.components
            .entry(DEFAULT_CATEGORY.to_string())
            .or_default()
            .push(Toggle::new(family, active));
        self
    }

    /// Validate the inner dimensions
    pub fn input_dimensions(&self) -> Result<InputDimensions, QuoteError> {
        let dims = &self.dimensions;
        match (&dims.length, &dims.width, &dims.height) {
            (Some(length), Some(width), Some(height)) => InputDimensions::new(
                length.as_number("length")?,
                width.as_number("width")?,
                height.as_number("height")?,
            ),
            _ => Err(QuoteError::InvalidInput {
                reason: "length, width and height are all required".to_string(),
            }),
        }
    }

    /// Component families named by the caller, flattened across categories
    pub fn component_selection(&self) -> Selection {
        selection(self.components.values().flatten())
    }

    pub fn complexity_selection(&self) -> Selection {
        selection(&self.complexity)
    }

    /// Highest-priority active complexity tier, if any
    pub fn complexity_tier(&self) -> Option<ComplexityTier> {
        let selected = self.complexity_selection();
        ComplexityTier::select(|tier| selected.get(&tier.to_string()).copied().unwrap_or(false))
    }
}

/// Successful response body
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteResponse {
    pub sell_price: f64,
}

/// Failure response body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub status_code: u16,
    pub message: String,
    pub error: String,
}

impl ErrorResponse {
    pub fn from_error(error: &dyn std::fmt::Display) -> Self {
        Self {
            status_code: 500,
            message: FAILURE_MESSAGE.to_string(),
            error: error.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BODY: &str = r#"{
        "dimensions": { "length": 48, "width": 24, "height": 36 },
        "complexity": [
            { "title": "simple", "isActive": 1 },
            { "title": "medium", "isActive": 0 },
            { "title": "complex", "isActive": 0 }
        ],
        "components": {
            "structure": [
                { "title": "crate", "isActive": 1 },
                { "title": "floater", "isActive": 0 }
            ],
            "protection": [
                { "title": "Barrier", "isActive": 1 }
            ]
        }
    }"#;

    #[test]
    fn test_parse_request() {
        let request = QuoteRequest::from_json(BODY).unwrap();
        let dims = request.input_dimensions().unwrap();
        assert_eq!(dims.length, 48.0);
        assert_eq!(dims.volume, 24.0);

        let components = request.component_selection();
        assert_eq!(components.get("crate"), Some(&true));
        assert_eq!(components.get("floater"), Some(&false));
        assert_eq!(components.get("barrier"), Some(&true));
        assert_eq!(request.complexity_tier(), Some(ComplexityTier::Simple));
    }

    #[test]
    fn test_missing_dimension_is_invalid() {
        let request = QuoteRequest::from_json(
            r#"{ "dimensions": { "length": 10, "width": 10 }, "components": {} }"#,
        )
        .unwrap();
        assert!(matches!(
            request.input_dimensions(),
            Err(QuoteError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_non_numeric_dimension_is_invalid() {
        let request = QuoteRequest::from_json(
            r#"{ "dimensions": { "length": "ten", "width": 10, "height": 10 }, "components": {} }"#,
        )
        .unwrap();
        match request.input_dimensions() {
            Err(QuoteError::InvalidInput { reason }) => assert!(reason.contains("length")),
            other => panic!("expected invalid input, got {:?}", other),
        }
    }

    #[test]
    fn test_null_dimension_is_invalid() {
        let request = QuoteRequest::from_json(
            r#"{ "dimensions": { "length": null, "width": 10, "height": 10 }, "components": {} }"#,
        )
        .unwrap();
        assert!(matches!(
            request.input_dimensions(),
            Err(QuoteError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_missing_components_is_malformed() {
        let result = QuoteRequest::from_json(
            r#"{ "dimensions": { "length": 1, "width": 2, "height": 3 }, "complexity": [ { "title": "simple", "isActive": 1 } ] }"#,
        );
        assert!(matches!(result, Err(QuoteError::MalformedRequest { .. })));
    }

    #[test]
    fn test_empty_sections_default() {
        let request = QuoteRequest::from_json(
            r#"{ "dimensions": { "length": 1, "width": 2, "height": 3 }, "components": {} }"#,
        )
        .unwrap();
        assert!(request.component_selection().is_empty());
        assert_eq!(request.complexity_tier(), None);
    }

    #[test]
    fn test_complexity_priority_from_request() {
        let request = QuoteRequest::new(10.0, 10.0, 10.0);
        let mut request = request.with_complexity(Some(ComplexityTier::Simple));
        request.complexity.push(Toggle::new("COMPLEX", true));
        assert_eq!(request.complexity_tier(), Some(ComplexityTier::Complex));
    }

    #[test]
    fn test_only_one_counts_as_active() {
        let request = QuoteRequest::from_json(
            r#"{ "complexity": [ { "title": "medium", "isActive": 2 }, { "title": "simple", "isActive": true } ], "components": {} }"#,
        )
        .unwrap();
        assert_eq!(request.complexity_tier(), Some(ComplexityTier::Simple));
    }

    #[test]
    fn test_later_duplicate_wins() {
        let request = QuoteRequest::new(10.0, 10.0, 10.0)
            .with_component("crate", true)
            .with_component("crate", false);
        assert_eq!(request.component_selection().get("crate"), Some(&false));
    }

    #[test]
    fn test_builder_roundtrip() {
        let request = QuoteRequest::new(48.0, 24.0, 36.0)
            .with_complexity(Some(ComplexityTier::Medium))
            .with_component("crate", true);
        let json = serde_json::to_string(&request).unwrap();
        assert!(json.contains("\"isActive\":1.0"));

        let parsed = QuoteRequest::from_json(&json).unwrap();
        assert_eq!(parsed.complexity_tier(), Some(ComplexityTier::Medium));
        assert_eq!(parsed.component_selection().get("crate"), Some(&true));
    }

    #[test]
    fn test_response_shapes() {
        let ok = serde_json::to_string(&QuoteResponse { sell_price: 336.54 }).unwrap();
        assert_eq!(ok, r#"{"sellPrice":336.54}"#);

        let err = ErrorResponse::from_error(&"boom");
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["statusCode"], 500);
        assert_eq!(json["message"], FAILURE_MESSAGE);
        assert_eq!(json["error"], "boom");
    }
}
