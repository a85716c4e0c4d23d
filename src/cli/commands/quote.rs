//! `shipquote quote` command - Price a crate
//!
//! In JSON mode the output follows the pricing contract: `{"sellPrice": n}`
//! on success and the `statusCode`/`message`/`error` envelope on failure.

use console::style;
use miette::{IntoDiagnostic, Result};
use tracing::error;

use crate::cli::commands::utils::{build_request, load_dataset, QuoteInputArgs};
use crate::cli::helpers::format_money;
use crate::cli::{GlobalOpts, OutputFormat};
use crate::pricing::{ErrorResponse, QuoteEngine, QuoteError, QuoteResponse};

#[derive(clap::Args, Debug)]
pub struct QuoteArgs {
    #[command(flatten)]
    pub input: QuoteInputArgs,
}

pub fn run(args: QuoteArgs, global: &GlobalOpts) -> Result<()> {
    let dataset = load_dataset(global)?;
    let engine = QuoteEngine::new(&dataset);

    let priced = build_request(&args.input, &dataset)?
        .and_then(|request| engine.sell_price(&request));

    match priced {
        Ok(sell_price) => print_price(sell_price, global),
        Err(e) => fail(e, global),
    }
}

fn print_price(sell_price: f64, global: &GlobalOpts) -> Result<()> {
    let response = QuoteResponse { sell_price };
    match global.format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string(&response).into_diagnostic()?);
        }
        OutputFormat::Yaml => {
            print!("{}", serde_yml::to_string(&response).into_diagnostic()?);
        }
        OutputFormat::Csv => {
            println!("sellPrice");
            println!("{:.2}", sell_price);
        }
        OutputFormat::Md => {
            println!("**Sell price:** {}", format_money(sell_price));
        }
        OutputFormat::Auto => {
            if global.quiet {
                println!("{:.2}", sell_price);
            } else {
                println!(
                    "{} Sell price: {}",
                    style("✓").green(),
                    style(format_money(sell_price)).bold()
                );
            }
        }
    }
    Ok(())
}

fn fail(e: QuoteError, global: &GlobalOpts) -> Result<()> {
    match global.format {
        OutputFormat::Json => {
            error!("{}", e);
            let envelope = ErrorResponse::from_error(&e);
            println!("{}", serde_json::to_string(&envelope).into_diagnostic()?);
            std::process::exit(1);
        }
        _ => Err(e.into()),
    }
}
