//! Core module - dataset loading, configuration and logging

pub mod check;
pub mod config;
pub mod loader;
pub mod logging;

pub use check::{check_dataset, DatasetIssue, IssueKind};
pub use config::Config;
pub use loader::{DataError, Dataset};
