//! `shipquote check` command - Static checks over the dataset

use console::style;
use miette::{IntoDiagnostic, Result};

use crate::cli::commands::utils::load_dataset;
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::check::{check_dataset, Severity};

#[derive(clap::Args, Debug)]
pub struct CheckArgs {
    /// Strict mode - warnings become errors
    #[arg(long)]
    pub strict: bool,
}

pub fn run(args: CheckArgs, global: &GlobalOpts) -> Result<()> {
    let dataset = load_dataset(global)?;
    let issues = check_dataset(&dataset);

    let errors = issues
        .iter()
        .filter(|i| i.severity() == Severity::Error)
        .count();
    let warnings = issues.len() - errors;

    match global.format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&issues).into_diagnostic()?);
        }
        OutputFormat::Yaml => {
            print!("{}", serde_yml::to_string(&issues).into_diagnostic()?);
        }
        OutputFormat::Csv => {
            let mut writer = csv::Writer::from_writer(std::io::stdout());
            writer
                .write_record(["Severity", "Family", "Item", "Attribute", "Message"])
                .into_diagnostic()?;
            for issue in &issues {
                writer
                    .write_record([
                        issue.severity().to_string(),
                        issue.family.clone(),
                        issue.item.clone(),
                        issue.attribute.map(|a| a.to_string()).unwrap_or_default(),
                        issue.message.clone(),
                    ])
                    .into_diagnostic()?;
            }
            writer.flush().into_diagnostic()?;
        }
        OutputFormat::Md | OutputFormat::Auto => {
            for issue in &issues {
                let marker = match issue.severity() {
                    Severity::Error => style("✗").red(),
                    Severity::Warning => style("!").yellow(),
                };
                let attribute = issue
                    .attribute
                    .map(|a| format!(" [{}]", a))
                    .unwrap_or_default();
                println!(
                    "{} {}: {}{} - {}",
                    marker,
                    issue.family,
                    issue.item,
                    attribute,
                    issue.message
                );
            }

            if !global.quiet {
                let families = dataset.templates.families().len();
                let items: usize = dataset
                    .templates
                    .families()
                    .iter()
                    .map(|f| f.items.len())
                    .sum();
                if issues.is_empty() {
                    println!(
                        "{} Checked {} families, {} line items, {} materials: no issues",
                        style("✓").green(),
                        families,
                        items,
                        dataset.materials.len()
                    );
                } else {
                    println!(
                        "\n{} error(s), {} warning(s) in {} families",
                        style(errors).red(),
                        style(warnings).yellow(),
                        families
                    );
                }
            }
        }
    }

    if errors > 0 || (args.strict && warnings > 0) {
        return Err(miette::miette!(
            "Dataset check failed: {} error(s), {} warning(s)",
            errors,
            warnings
        ));
    }

    Ok(())
}
