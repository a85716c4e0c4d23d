//! `shipquote components` command - List component families and templates

use console::style;
use miette::{IntoDiagnostic, Result};
use serde::Serialize;
use tabled::{builder::Builder, settings::Style};

use crate::cli::commands::utils::load_dataset;
use crate::cli::helpers::truncate_str;
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::Dataset;
use crate::entities::ComponentFamily;

#[derive(clap::Args, Debug)]
pub struct ComponentsArgs {
    /// Family to show (default: list every family)
    pub family: Option<String>,
}

#[derive(Serialize)]
struct FamilySummary<'a> {
    name: &'a str,
    items: usize,
}

pub fn run(args: ComponentsArgs, global: &GlobalOpts) -> Result<()> {
    let dataset = load_dataset(global)?;

    match args.family {
        Some(name) => show_family(&dataset, &name, global),
        None => list_families(&dataset, global),
    }
}

fn list_families(dataset: &Dataset, global: &GlobalOpts) -> Result<()> {
    let summaries: Vec<FamilySummary> = dataset
        .templates
        .families()
        .iter()
        .map(|f| FamilySummary {
            name: &f.name,
            items: f.items.len(),
        })
        .collect();

    match global.format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&summaries).into_diagnostic()?);
        }
        OutputFormat::Yaml => {
            print!("{}", serde_yml::to_string(&summaries).into_diagnostic()?);
        }
        OutputFormat::Csv => {
            let mut writer = csv::Writer::from_writer(std::io::stdout());
            writer.write_record(["Family", "Items"]).into_diagnostic()?;
            for s in &summaries {
                writer
                    .write_record([s.name.to_string(), s.items.to_string()])
                    .into_diagnostic()?;
            }
            writer.flush().into_diagnostic()?;
        }
        OutputFormat::Md | OutputFormat::Auto => {
            let mut builder = Builder::default();
            builder.push_record(["#", "Family", "Items"]);
            for (i, s) in summaries.iter().enumerate() {
                builder.push_record([(i + 1).to_string(), s.name.to_string(), s.items.to_string()]);
            }
            print_table(builder, global.format);

            if !global.quiet && global.format == OutputFormat::Auto {
                println!(
                    "Families are processed in this order; the first supplies the outer dimensions."
                );
            }
        }
    }

    Ok(())
}

fn show_family(dataset: &Dataset, name: &str, global: &GlobalOpts) -> Result<()> {
    let family: &ComponentFamily = dataset.templates.get(name).ok_or_else(|| {
        miette::miette!(
            "No component family named '{}'. Known families: {}",
            name,
            dataset.templates.names().join(", ")
        )
    })?;

    match global.format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(family).into_diagnostic()?);
        }
        OutputFormat::Yaml => {
            print!("{}", serde_yml::to_string(family).into_diagnostic()?);
        }
        OutputFormat::Csv => {
            let mut writer = csv::Writer::from_writer(std::io::stdout());
            writer
                .write_record(["Title", "Description", "Material", "UOM", "Width", "Length", "Quantity"])
                .into_diagnostic()?;
            for item in &family.items {
                writer
                    .write_record([
                        item.title.clone(),
                        item.description.clone(),
                        item.material.clone(),
                        item.uom.to_string(),
                        item.width.to_string(),
                        item.length.to_string(),
                        item.quantity.to_string(),
                    ])
                    .into_diagnostic()?;
            }
            writer.flush().into_diagnostic()?;
        }
        OutputFormat::Md | OutputFormat::Auto => {
            let width = if global.format == OutputFormat::Md { usize::MAX } else { 48 };

            let mut builder = Builder::default();
            builder.push_record(["Title", "Description", "Material", "UOM", "Width", "Length", "Quantity"]);
            for item in &family.items {
                builder.push_record([
                    item.title.clone(),
                    item.description.clone(),
                    item.material.clone(),
                    item.uom.to_string(),
                    truncate_str(&item.width.to_string(), width),
                    truncate_str(&item.length.to_string(), width),
                    truncate_str(&item.quantity.to_string(), width),
                ]);
            }
            if global.format == OutputFormat::Auto && !global.quiet {
                println!("{}", style(&family.name).cyan().bold());
            }
            print_table(builder, global.format);
        }
    }

    Ok(())
}

fn print_table(builder: Builder, format: OutputFormat) {
    let mut table = builder.build();
    if format == OutputFormat::Md {
        table.with(Style::markdown());
    } else {
        table.with(Style::rounded());
    }
    println!("{}", table);
}
