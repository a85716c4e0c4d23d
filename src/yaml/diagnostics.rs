//! YAML error diagnostics for dataset files

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// YAML error with source location
#[derive(Debug, Error, Diagnostic)]
#[error("YAML error in {filename}: {message}")]
#[diagnostic(code(shipquote::yaml::syntax))]
pub struct YamlSyntaxError {
    #[source_code]
    src: NamedSource<String>,

    #[label("error here")]
    span: SourceSpan,

    #[help]
    help: Option<String>,

    filename: String,

    /// The underlying error message
    message: String,
}

impl YamlSyntaxError {
    /// Create a syntax error from a serde_yml error
    pub fn from_serde_error(err: &serde_yml::Error, source: &str, filename: &str) -> Self {
        let (line, column) = err
            .location()
            .map(|loc| (loc.line(), loc.column()))
            .unwrap_or((1, 1));

        let offset = line_col_to_offset(source, line, column);
        let message = err.to_string();
        let help = generate_help(&message);

        Self {
            src: NamedSource::new(filename, source.to_string()),
            span: SourceSpan::from(offset..offset.saturating_add(1)),
            help,
            filename: filename.to_string(),
            message,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Byte offset of the error in the source
    pub fn offset(&self) -> usize {
        self.span.offset()
    }
}

/// Byte offset of a 1-based line/column, clamped to the source
fn line_col_to_offset(source: &str, line: usize, column: usize) -> usize {
    let line_start: usize = source
        .split_inclusive('\n')
        .take(line.saturating_sub(1))
        .map(str::len)
        .sum();
    let rest = &source[line_start.min(source.len())..];
    let line_len = rest.find('\n').unwrap_or(rest.len());
    let within = rest[..line_len]
        .char_indices()
        .nth(column.saturating_sub(1))
        .map(|(i, _)| i)
        .unwrap_or(line_len);

    (line_start + within).min(source.len())
}

/// Hints for mistakes seen in dataset files. Every needle must appear in
/// the lower-cased error message.
const HINTS: &[(&[&str], &str)] = &[
    (&["tab"], "Indent with spaces; YAML rejects tabs."),
    (&["duplicate"], "A material or key is listed twice in the same file."),
    (&["unknown variant"], "Units of measure are BF, SF or EA"),
    (
        &["invalid type", "f64"],
        "Numeric attributes must be plain numbers, e.g. unit_price: 1.25",
    ),
    (
        &["invalid type", "sequence"],
        "A component file is a list of line items, each starting with '- title:'",
    ),
    (
        &["missing field"],
        "Every line item needs at least title, material and uom",
    ),
];

fn generate_help(message: &str) -> Option<String> {
    let lower = message.to_lowercase();
    HINTS
        .iter()
        .find(|(needles, _)| needles.iter().all(|n| lower.contains(n)))
        .map(|(_, hint)| hint.to_string())
}
