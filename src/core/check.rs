//! Static dataset checks
//!
//! Quotes are fail-soft: a broken formula or a dangling lookup quietly prices
//! as 0. These checks surface such problems before a quote is ever run.

use serde::Serialize;

use crate::core::Dataset;
use crate::entities::{LineItemTemplate, TemplateValue};
use crate::formula::{Attribute, Formula, Variables};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    /// Template names a material missing from the catalog
    UnknownMaterial,
    /// Formula does not parse
    FormulaSyntax,
    /// Formula names a variable outside the fixed set
    UnknownVariable,
    /// Lookup names an item no family defines
    UnknownLookupTarget,
    /// Lookup names an item only defined in a later family
    LaterFamilyLookup,
}

impl IssueKind {
    pub fn severity(&self) -> Severity {
        match self {
            IssueKind::UnknownMaterial | IssueKind::FormulaSyntax | IssueKind::UnknownVariable => {
                Severity::Error
            }
            IssueKind::UnknownLookupTarget | IssueKind::LaterFamilyLookup => Severity::Warning,
        }
    }
}

/// One problem found in a dataset
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetIssue {
    pub family: String,
    /// Label of the offending line item
    pub item: String,
    pub attribute: Option<Attribute>,
    pub kind: IssueKind,
    pub message: String,
}

impl DatasetIssue {
    pub fn severity(&self) -> Severity {
        self.kind.severity()
    }
}

/// Check every template in the dataset
pub fn check_dataset(dataset: &Dataset) -> Vec<DatasetIssue> {
    let families = dataset.templates.families();
    let mut issues = Vec::new();

    for (family_index, family) in families.iter().enumerate() {
        for template in &family.items {
            let issue = |attribute: Option<Attribute>, kind: IssueKind, message: String| {
                DatasetIssue {
                    family: family.name.clone(),
                    item: template.label(),
                    attribute,
                    kind,
                    message,
                }
            };

            if !dataset.materials.contains(&template.material) {
                issues.push(issue(
                    None,
                    IssueKind::UnknownMaterial,
                    format!("material '{}' is not in the catalog", template.material),
                ));
            }

            for (attribute, source) in formulas(template) {
                let formula = match Formula::parse(source) {
                    Ok(formula) => formula,
                    Err(e) => {
                        issues.push(issue(
                            Some(attribute),
                            IssueKind::FormulaSyntax,
                            format!("'{}': {}", source, e),
                        ));
                        continue;
                    }
                };

                for name in formula.expr().variables() {
                    if !Variables::is_known(name) {
                        issues.push(issue(
                            Some(attribute),
                            IssueKind::UnknownVariable,
                            format!("unknown variable '{}'", name),
                        ));
                    }
                }

                for lookup in formula.expr().lookups() {
                    let defined_in = families.iter().position(|f| {
                        f.items
                            .iter()
                            .any(|t| t.matches(&lookup.title, &lookup.description, &lookup.material))
                    });
                    match defined_in {
                        None => issues.push(issue(
                            Some(attribute),
                            IssueKind::UnknownLookupTarget,
                            format!("{} matches no line item and reads as 0", lookup),
                        )),
                        Some(index) if index > family_index => issues.push(issue(
                            Some(attribute),
                            IssueKind::LaterFamilyLookup,
                            format!(
                                "{} is defined in '{}', which is processed after '{}'",
                                lookup, families[index].name, family.name
                            ),
                        )),
                        Some(_) => {}
                    }
                }
            }
        }
    }

    issues
}

fn formulas(template: &LineItemTemplate) -> Vec<(Attribute, &str)> {
    [
        (Attribute::Width, &template.width),
        (Attribute::Length, &template.length),
        (Attribute::Quantity, &template.quantity),
    ]
    .into_iter()
    .filter_map(|(attribute, value)| match value {
        TemplateValue::Formula(source) => Some((attribute, source.as_str())),
        TemplateValue::Literal(_) | TemplateValue::MaterialWidth => None,
    })
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{ComponentFamily, MaterialCatalog, MaterialSpec, TemplateStore, Uom};

    fn template(title: &str, material: &str, quantity: &str) -> LineItemTemplate {
        LineItemTemplate {
            title: title.to_string(),
            description: "Part".to_string(),
            material: material.to_string(),
            uom: Uom::Each,
            width: TemplateValue::Literal(0.0),
            length: TemplateValue::Literal(0.0),
            quantity: TemplateValue::Formula(quantity.to_string()),
        }
    }

    fn dataset(first: Vec<LineItemTemplate>, second: Vec<LineItemTemplate>) -> Dataset {
        Dataset {
            materials: [("EACH".to_string(), MaterialSpec::default())]
                .into_iter()
                .collect::<MaterialCatalog>(),
            templates: TemplateStore::new(vec![
                ComponentFamily {
                    name: "first".to_string(),
                    items: first,
                },
                ComponentFamily {
                    name: "second".to_string(),
                    items: second,
                },
            ]),
        }
    }

    #[test]
    fn test_embedded_dataset_is_clean() {
        let dataset = Dataset::embedded().unwrap();
        let issues = check_dataset(&dataset);
        assert!(issues.is_empty(), "unexpected issues: {issues:#?}");
    }

    #[test]
    fn test_reports_each_problem() {
        let dataset = dataset(
            vec![
                template("A1", "EACH", "lookup(quantity, 'B1', 'Part', 'EACH')"),
                template("A2", "GOLD", "2"),
                template("A3", "EACH", "ilength +"),
                template("A4", "EACH", "depth * 2"),
                template("A5", "EACH", "lookup(width, 'Z9', 'Part', 'EACH')"),
            ],
            vec![template("B1", "EACH", "lookup(quantity, 'A1', 'Part', 'EACH') * 2")],
        );

        let kinds: Vec<IssueKind> = check_dataset(&dataset).iter().map(|i| i.kind).collect();
        assert_eq!(
            kinds,
            vec![
                IssueKind::LaterFamilyLookup,
                IssueKind::UnknownMaterial,
                IssueKind::FormulaSyntax,
                IssueKind::UnknownVariable,
                IssueKind::UnknownLookupTarget,
            ]
        );
    }

    #[test]
    fn test_severity() {
        assert_eq!(IssueKind::FormulaSyntax.severity(), Severity::Error);
        assert_eq!(IssueKind::UnknownLookupTarget.severity(), Severity::Warning);
        assert!(Severity::Error > Severity::Warning);
    }
}
