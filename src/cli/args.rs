//! CLI argument definitions using clap derive

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::cli::commands::{
    breakdown::BreakdownArgs, check::CheckArgs, completions::CompletionsArgs,
    components::ComponentsArgs, materials::MaterialsArgs, quote::QuoteArgs,
};
use crate::core::Config;

#[derive(Parser)]
#[command(name = "shipquote")]
#[command(author, version, about = "Shipping crate sell-price calculator")]
#[command(long_about = "Shipping crate sell-price calculator.\n\nPrices custom shipping crates from inner dimensions, selected component families and a labour complexity tier, using formula-driven bills of materials.")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalOpts,
}

#[derive(clap::Args, Clone, Debug)]
pub struct GlobalOpts {
    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "auto")]
    pub format: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Enable verbose output (debug logging)
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Dataset directory (default: the dataset built into the binary)
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,
}

impl GlobalOpts {
    /// Fill unset options from the loaded configuration. Flags win.
    pub fn with_config(mut self, config: &Config) -> Self {
        if self.data_dir.is_none() {
            self.data_dir = config.data_dir.clone();
        }
        if self.format == OutputFormat::Auto {
            if let Some(format) = config
                .default_format
                .as_deref()
                .and_then(|f| OutputFormat::from_str(f, true).ok())
            {
                self.format = format;
            }
        }
        self
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Price a crate and print the sell price
    Quote(QuoteArgs),

    /// Show the full cost breakdown behind a quote
    Breakdown(BreakdownArgs),

    /// List the material catalog
    Materials(MaterialsArgs),

    /// List component families or one family's line-item templates
    Components(ComponentsArgs),

    /// Check the dataset for broken formulas and references
    Check(CheckArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable text and tables
    #[default]
    Auto,
    /// JSON format (for programming)
    Json,
    /// YAML format (full fidelity)
    Yaml,
    /// CSV format (for spreadsheets)
    Csv,
    /// Markdown tables
    Md,
}
