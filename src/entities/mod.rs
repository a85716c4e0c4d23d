//! Pricing data types
//!
//! **Reference data** (loaded once, shared read-only):
//! - [`MaterialCatalog`] - material attributes keyed by material name
//! - [`TemplateStore`] - bill-of-materials templates per component family
//!
//! **Per-quote data:**
//! - [`InputDimensions`] / [`OutputDimensions`] - inner and derived outer size
//! - [`ResolvedLineItem`] - a template resolved and priced for one quote

pub mod dimensions;
pub mod line_item;
pub mod material;
pub mod template;

pub use dimensions::{InputDimensions, OutputDimensions};
pub use line_item::ResolvedLineItem;
pub use material::{MaterialCatalog, MaterialSpec};
pub use template::{ComponentFamily, LineItemTemplate, TemplateStore, TemplateValue, Uom};
