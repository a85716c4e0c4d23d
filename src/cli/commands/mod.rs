//! CLI command implementations

pub mod utils;

pub mod breakdown;
pub mod check;
pub mod completions;
pub mod components;
pub mod materials;
pub mod quote;
