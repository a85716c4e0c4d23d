//! Shared helper functions for CLI commands
//!
//! Formatting helpers used by more than one command module.

use miette::{IntoDiagnostic, Result};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

/// Format a number with up to `places` decimals, trimming trailing zeros
///
/// `12.500` becomes `12.5`, `3.000` becomes `3`.
pub fn format_number(value: f64, places: usize) -> String {
    let s = format!("{:.*}", places, value);
    if s.contains('.') {
        let trimmed = s.trim_end_matches('0').trim_end_matches('.');
        if trimmed == "-0" {
            "0".to_string()
        } else {
            trimmed.to_string()
        }
    } else {
        s
    }
}

/// Format an attribute that may have failed to resolve
pub fn format_optional(value: Option<f64>) -> String {
    value.map(|v| format_number(v, 3)).unwrap_or_else(|| "-".to_string())
}

/// Format a dollar amount
pub fn format_money(value: f64) -> String {
    format!("${:.2}", value)
}

/// Truncate a string to max_len characters, adding "..." if truncated
pub fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Write to a file when a path is given, otherwise to stdout
pub fn write_output(content: &str, output_path: Option<PathBuf>) -> Result<()> {
    match output_path {
        Some(path) => {
            let file = File::create(&path).into_diagnostic()?;
            let mut writer = BufWriter::new(file);
            writer.write_all(content.as_bytes()).into_diagnostic()?;
            writer.flush().into_diagnostic()?;
            eprintln!("Report written to: {}", path.display());
        }
        None => {
            print!("{}", content);
        }
    }
    Ok(())
}
