//! Pricing - from a quote request to a sell price

pub mod engine;
pub mod error;
pub mod pipeline;
pub mod request;

pub use engine::{ComponentCost, ItemLookup, Quote, QuoteEngine};
pub use error::QuoteError;
pub use pipeline::{ComplexityTier, CostSummary, CONTRIBUTION_MARGIN};
pub use request::{ErrorResponse, QuoteRequest, QuoteResponse, Toggle};
