//! `shipquote breakdown` command - Cost breakdown behind a quote

use console::style;
use miette::{IntoDiagnostic, Result};
use std::path::PathBuf;
use tabled::{builder::Builder, settings::Style};

use crate::cli::commands::utils::{build_request, load_dataset, QuoteInputArgs};
use crate::cli::helpers::{format_money, format_number, format_optional, write_output};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::entities::ResolvedLineItem;
use crate::pricing::{ComponentCost, Quote, QuoteEngine};

#[derive(clap::Args, Debug)]
pub struct BreakdownArgs {
    #[command(flatten)]
    pub input: QuoteInputArgs,

    /// Only show families that count toward the price
    #[arg(long)]
    pub active_only: bool,

    /// Write the report to a file instead of stdout
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
}

const ITEM_HEADER: [&str; 11] = [
    "Title",
    "Description",
    "Material",
    "UOM",
    "Width",
    "Length",
    "Qty",
    "Units",
    "Scrap",
    "Unit Price",
    "Total",
];

pub fn run(args: BreakdownArgs, global: &GlobalOpts) -> Result<()> {
    let dataset = load_dataset(global)?;
    let request = build_request(&args.input, &dataset)??;
    let mut quote = QuoteEngine::new(&dataset).quote(&request)?;

    if args.active_only {
        quote.components.retain(|c| c.active);
    }

    let content = match global.format {
        OutputFormat::Json => {
            let mut json = serde_json::to_string_pretty(&quote).into_diagnostic()?;
            json.push('\n');
            json
        }
        OutputFormat::Yaml => serde_yml::to_string(&quote).into_diagnostic()?,
        OutputFormat::Csv => render_csv(&quote)?,
        OutputFormat::Md => render_tables(&quote, true),
        OutputFormat::Auto => render_tables(&quote, false),
    };

    write_output(&content, args.output)
}

fn item_row(item: &ResolvedLineItem) -> Vec<String> {
    vec![
        item.title.clone(),
        item.description.clone(),
        item.material.clone(),
        item.uom.to_string(),
        format_optional(item.width),
        format_optional(item.length),
        format_optional(item.quantity),
        format_number(item.quantity_in_units, 3),
        format_number(item.scrap, 3),
        format!("{:.2}", item.unit_price),
        format!("{:.2}", item.total_cost),
    ]
}

fn family_heading(component: &ComponentCost, styled: bool) -> String {
    let status = if component.active { "active" } else { "inactive" };
    let cost = format_money(component.material_cost);
    if styled {
        let name = if component.active {
            style(component.family.as_str()).cyan().bold()
        } else {
            style(component.family.as_str()).dim()
        };
        format!("{} ({}) material {}\n", name, status, cost)
    } else {
        format!("## {} ({}) material {}\n\n", component.family, status, cost)
    }
}

/// Text or markdown report: dimensions, one table per family, summary
fn render_tables(quote: &Quote, markdown: bool) -> String {
    let styled = !markdown;
    let mut output = String::new();

    let input = &quote.input;
    output.push_str(&format!(
        "Inner: {} x {} x {} in ({} ft³)\n",
        format_number(input.length, 3),
        format_number(input.width, 3),
        format_number(input.height, 3),
        format_number(input.volume, 3)
    ));
    match &quote.output {
        Some(outer) => output.push_str(&format!(
            "Outer: {} x {} x {} in ({} ft³)\n",
            format_number(outer.length, 3),
            format_number(outer.width, 3),
            format_number(outer.height, 3),
            format_number(outer.volume, 3)
        )),
        None => output.push_str("Outer: - (no component families processed)\n"),
    }
    output.push('\n');

    for component in &quote.components {
        output.push_str(&family_heading(component, styled));

        let mut builder = Builder::default();
        builder.push_record(ITEM_HEADER);
        for item in &component.items {
            builder.push_record(item_row(item));
        }
        output.push_str(&finish(builder, markdown));
        output.push_str("\n\n");
    }

    let summary = &quote.summary;
    let tier = quote
        .tier
        .map(|t| t.to_string())
        .unwrap_or_else(|| "none".to_string());

    let mut builder = Builder::default();
    builder.push_record(["Step", "Amount"]);
    builder.push_record([
        "Estimated material".to_string(),
        format_money(summary.estimated_material_cost),
    ]);
    builder.push_record([
        format!("Material ({})", tier),
        format_money(summary.material_cost),
    ]);
    builder.push_record(["Labour".to_string(), format_money(summary.labour_cost)]);
    builder.push_record(["Final cost".to_string(), format_money(summary.final_cost)]);
    builder.push_record(["Sell price".to_string(), format_money(summary.sell_price)]);
    output.push_str(&finish(builder, markdown));
    output.push('\n');

    output
}

fn finish(builder: Builder, markdown: bool) -> String {
    let mut table = builder.build();
    if markdown {
        table.with(Style::markdown());
    } else {
        table.with(Style::rounded());
    }
    table.to_string()
}

/// One CSV row per line item, family columns first
fn render_csv(quote: &Quote) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    let mut header = vec!["Family", "Active"];
    header.extend(ITEM_HEADER);
    writer.write_record(&header).into_diagnostic()?;

    for component in &quote.components {
        for item in &component.items {
            let mut row = vec![component.family.clone(), component.active.to_string()];
            row.extend(item_row(item).into_iter().map(|cell| {
                if cell == "-" {
                    String::new()
                } else {
                    cell
                }
            }));
            writer.write_record(&row).into_diagnostic()?;
        }
    }

    let bytes = writer.into_inner().into_diagnostic()?;
    String::from_utf8(bytes).into_diagnostic()
}
