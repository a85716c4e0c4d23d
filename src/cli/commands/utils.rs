//! Shared utilities for CLI commands

use miette::{IntoDiagnostic, Result};
use std::io::Read;
use std::path::PathBuf;
use tracing::debug;

use crate::cli::GlobalOpts;
use crate::core::Dataset;
use crate::pricing::request::{DimensionValue, RequestDimensions};
use crate::pricing::{ComplexityTier, QuoteError, QuoteRequest};

/// Quote inputs shared by `quote` and `breakdown`
#[derive(clap::Args, Debug, Clone, Default)]
pub struct QuoteInputArgs {
    /// Inner length in inches
    #[arg(long, conflicts_with = "request")]
    pub length: Option<f64>,

    /// Inner width in inches
    #[arg(long, conflicts_with = "request")]
    pub width: Option<f64>,

    /// Inner height in inches
    #[arg(long, conflicts_with = "request")]
    pub height: Option<f64>,

    /// Labour complexity tier (simple, medium, complex)
    #[arg(long, short = 'c', conflicts_with = "request")]
    pub complexity: Option<ComplexityTier>,

    /// Component family to include (repeatable; default: every family)
    #[arg(long = "component", short = 'C', conflicts_with = "request")]
    pub components: Vec<String>,

    /// Read a JSON quote request from a file ('-' for stdin)
    #[arg(long, short = 'r')]
    pub request: Option<PathBuf>,
}

/// Load the dataset named by `--data-dir` (or the embedded one)
pub fn load_dataset(global: &GlobalOpts) -> Result<Dataset> {
    Ok(Dataset::load(global.data_dir.as_deref())?)
}

/// Read the raw request body from a file or stdin
pub fn read_request_body(path: &PathBuf) -> Result<String> {
    if path.as_os_str() == "-" {
        let mut body = String::new();
        std::io::stdin()
            .read_to_string(&mut body)
            .into_diagnostic()?;
        Ok(body)
    } else {
        std::fs::read_to_string(path)
            .into_diagnostic()
            .map_err(|e| e.wrap_err(format!("Failed to read request {}", path.display())))
    }
}

/// Build a request from flags. Without `--component`, every family in the
/// dataset is active.
pub fn request_from_flags(args: &QuoteInputArgs, dataset: &Dataset) -> QuoteRequest {
    let mut request = QuoteRequest {
        dimensions: RequestDimensions {
            length: args.length.map(DimensionValue::from),
            width: args.width.map(DimensionValue::from),
            height: args.height.map(DimensionValue::from),
        },
        ..Default::default()
    }
    .with_complexity(args.complexity);

    if args.components.is_empty() {
        for name in dataset.templates.names() {
            request = request.with_component(name, true);
        }
    } else {
        for name in &args.components {
            request = request.with_component(name.as_str(), true);
        }
    }

    request
}

/// Build the quote request from `--request` or the individual flags
///
/// The outer error is for I/O; the inner one is a request the pricing
/// contract rejects.
pub fn build_request(
    args: &QuoteInputArgs,
    dataset: &Dataset,
) -> Result<std::result::Result<QuoteRequest, QuoteError>> {
    match &args.request {
        Some(path) => {
            let body = read_request_body(path)?;
            debug!(bytes = body.len(), "read quote request");
            Ok(QuoteRequest::from_json(&body))
        }
        None => Ok(Ok(request_from_flags(args, dataset))),
    }
}
