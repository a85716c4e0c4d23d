//! shipquote: shipping crate sell-price calculator
//!
//! Resolves formula-driven bills of materials for custom shipping crates
//! against a material catalog and turns the material cost into a sell price.
//!
//! ```no_run
//! use shipquote::core::Dataset;
//! use shipquote::pricing::{ComplexityTier, QuoteEngine, QuoteRequest};
//!
//! let dataset = Dataset::embedded()?;
//! let request = QuoteRequest::new(48.0, 24.0, 36.0)
//!     .with_complexity(Some(ComplexityTier::Simple))
//!     .with_component("crate", true);
//! let price = QuoteEngine::new(&dataset).sell_price(&request)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod cli;
pub mod core;
pub mod entities;
pub mod formula;
pub mod pricing;
pub mod yaml;
