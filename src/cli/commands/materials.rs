//! `shipquote materials` command - List the material catalog

use console::style;
use miette::{IntoDiagnostic, Result};
use tabled::{builder::Builder, settings::Style};

use crate::cli::commands::utils::load_dataset;
use crate::cli::helpers::format_number;
use crate::cli::{GlobalOpts, OutputFormat};
use crate::entities::MaterialSpec;

#[derive(clap::Args, Debug)]
pub struct MaterialsArgs {
    /// Only list materials whose key contains this text (case-insensitive)
    #[arg(long)]
    pub search: Option<String>,
}

const HEADER: [&str; 7] = [
    "Material",
    "Thickness",
    "Width",
    "Nominal W",
    "Nominal T",
    "Scrap",
    "Unit Price",
];

pub fn run(args: MaterialsArgs, global: &GlobalOpts) -> Result<()> {
    let dataset = load_dataset(global)?;

    let needle = args.search.as_deref().map(str::to_lowercase);
    let materials: Vec<(&String, &MaterialSpec)> = dataset
        .materials
        .iter()
        .filter(|(key, _)| {
            needle
                .as_deref()
                .map_or(true, |n| key.to_lowercase().contains(n))
        })
        .collect();

    match global.format {
        OutputFormat::Json => {
            let map: std::collections::BTreeMap<_, _> = materials.into_iter().collect();
            println!("{}", serde_json::to_string_pretty(&map).into_diagnostic()?);
        }
        OutputFormat::Yaml => {
            let map: std::collections::BTreeMap<_, _> = materials.into_iter().collect();
            print!("{}", serde_yml::to_string(&map).into_diagnostic()?);
        }
        OutputFormat::Csv => {
            let mut writer = csv::Writer::from_writer(std::io::stdout());
            writer.write_record(HEADER).into_diagnostic()?;
            for (key, spec) in &materials {
                writer.write_record(row(key, spec)).into_diagnostic()?;
            }
            writer.flush().into_diagnostic()?;
        }
        OutputFormat::Md | OutputFormat::Auto => {
            let mut builder = Builder::default();
            builder.push_record(HEADER);
            for (key, spec) in &materials {
                builder.push_record(row(key, spec));
            }
            let mut table = builder.build();
            if global.format == OutputFormat::Md {
                table.with(Style::markdown());
            } else {
                table.with(Style::rounded());
            }
            println!("{}", table);

            if !global.quiet && global.format == OutputFormat::Auto {
                println!(
                    "{} material(s) found",
                    style(materials.len()).cyan()
                );
            }
        }
    }

    Ok(())
}

fn row(key: &str, spec: &MaterialSpec) -> Vec<String> {
    vec![
        key.to_string(),
        format_number(spec.actual_thickness, 3),
        format_number(spec.actual_width, 3),
        format_number(spec.nominal_width, 3),
        format_number(spec.nominal_thickness, 3),
        format_number(spec.scrap, 3),
        format!("{:.2}", spec.unit_price),
    ]
}
