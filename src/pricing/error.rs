//! Quote errors

use miette::Diagnostic;
use thiserror::Error;

use crate::formula::{Attribute, FormulaError};

/// Errors raised while pricing a quote
///
/// Only [`QuoteError::InvalidInput`] and [`QuoteError::MalformedRequest`]
/// abort a quote. The other variants describe per-family or per-item
/// problems that are logged while the quote carries on.
#[derive(Debug, Error, Diagnostic)]
pub enum QuoteError {
    #[error("Invalid dimensions provided: {reason}")]
    #[diagnostic(
        code(shipquote::quote::invalid_input),
        help("Provide positive numeric length, width and height in inches")
    )]
    InvalidInput { reason: String },

    #[error("Malformed quote request: {reason}")]
    #[diagnostic(code(shipquote::quote::malformed_request))]
    MalformedRequest { reason: String },

    #[error("No template data found for component: {name}")]
    #[diagnostic(code(shipquote::quote::unknown_component))]
    UnknownComponent { name: String },

    #[error("Could not resolve {attribute} of {item} from '{formula}': {source}")]
    #[diagnostic(code(shipquote::quote::formula))]
    FormulaResolution {
        item: String,
        attribute: Attribute,
        formula: String,
        #[source]
        source: FormulaError,
    },

    #[error("Material '{material}' for {item} is not in the catalog")]
    #[diagnostic(code(shipquote::quote::catalog_miss))]
    CatalogMiss { item: String, material: String },
}

impl QuoteError {
    /// Does this error abort the whole quote?
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            QuoteError::InvalidInput { .. } | QuoteError::MalformedRequest { .. }
        )
    }
}

impl From<serde_json::Error> for QuoteError {
    fn from(err: serde_json::Error) -> Self {
        QuoteError::MalformedRequest {
            reason: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fatal_classification() {
        assert!(QuoteError::InvalidInput {
            reason: "length".to_string()
        }
        .is_fatal());
        assert!(!QuoteError::UnknownComponent {
            name: "pallet".to_string()
        }
        .is_fatal());
        assert!(!QuoteError::CatalogMiss {
            item: "Crate1".to_string(),
            material: "LBR, 8X8".to_string()
        }
        .is_fatal());
    }

    #[test]
    fn test_formula_error_message() {
        let err = QuoteError::FormulaResolution {
            item: "Crate2 / Floorboard / LBR, 2X10".to_string(),
            attribute: Attribute::Quantity,
            formula: "olength / 0".to_string(),
            source: FormulaError::DivisionByZero,
        };
        assert_eq!(
            err.to_string(),
            "Could not resolve quantity of Crate2 / Floorboard / LBR, 2X10 from 'olength / 0': division by zero"
        );
    }
}
