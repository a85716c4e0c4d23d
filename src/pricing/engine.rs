//! Quote engine - resolves component templates into priced line items
//!
//! For each selected family, in the store's order:
//!
//! 1. Join templates with the catalog (items with unknown materials drop out)
//! 2. Derive outer dimensions (first family only; reused afterwards)
//! 3. Resolve every width, then every length, then every quantity
//! 4. Price each item and sum the family's material cost
//! 5. Keep the resolved items as a lookup source for later families

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::core::Dataset;
use crate::entities::line_item::find_item;
use crate::entities::{
    ComponentFamily, InputDimensions, LineItemTemplate, OutputDimensions, ResolvedLineItem,
    TemplateValue,
};
use crate::formula::{Attribute, Formula, LookupRef, LookupSource, Variables};
use crate::pricing::pipeline::{estimated_material_cost, ComplexityTier, CostSummary};
use crate::pricing::request::{QuoteRequest, Selection};
use crate::pricing::QuoteError;

/// Attributes resolved from formulas, in pass order
pub const RESOLUTION_PASSES: [Attribute; 3] =
    [Attribute::Width, Attribute::Length, Attribute::Quantity];

/// Priced line items and material cost of one component family
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentCost {
    pub family: String,
    /// Selected by the caller; only active families count toward the price
    pub active: bool,
    pub material_cost: f64,
    pub items: Vec<ResolvedLineItem>,
}

/// A fully worked quote
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub input: InputDimensions,
    /// `None` when no family was processed
    pub output: Option<OutputDimensions>,
    pub tier: Option<ComplexityTier>,
    pub components: Vec<ComponentCost>,
    pub summary: CostSummary,
}

impl Quote {
    pub fn sell_price(&self) -> f64 {
        self.summary.sell_price
    }
}

/// Lookup over the current family's items, then earlier families in order
///
/// A local hit that is zero or unresolved falls through to earlier
/// families. Nothing found anywhere reads as 0.
pub struct ItemLookup<'a> {
    pub current: &'a [ResolvedLineItem],
    pub history: &'a [ComponentCost],
}

impl LookupSource for ItemLookup<'_> {
    fn lookup(&self, r: &LookupRef) -> f64 {
        let local = find_item(self.current, &r.title, &r.description, &r.material)
            .and_then(|item| item.attribute(r.attribute))
            .unwrap_or(0.0);
        if local != 0.0 {
            return local;
        }

        self.history
            .iter()
            .find_map(|component| {
                find_item(&component.items, &r.title, &r.description, &r.material)
            })
            .and_then(|item| item.attribute(r.attribute))
            .unwrap_or(0.0)
    }
}

/// Prices quotes against a shared, read-only dataset
#[derive(Debug, Clone, Copy)]
pub struct QuoteEngine<'a> {
    dataset: &'a Dataset,
}

impl<'a> QuoteEngine<'a> {
    pub fn new(dataset: &'a Dataset) -> Self {
        Self { dataset }
    }

    /// Price a request
    pub fn quote(&self, request: &QuoteRequest) -> Result<Quote, QuoteError> {
        let input = request.input_dimensions()?;
        let selection = request.component_selection();
        let tier = request.complexity_tier();

        let (components, output) = self.process_components(&input, &selection);
        let summary = CostSummary::compute(estimated_material_cost(&components), tier);

        debug!(
            estimated_material_cost = summary.estimated_material_cost,
            sell_price = summary.sell_price,
            tier = ?tier,
            "quote priced"
        );

        Ok(Quote {
            input,
            output,
            tier,
            components,
            summary,
        })
    }

    /// Price a request and return only the sell price
    pub fn sell_price(&self, request: &QuoteRequest) -> Result<f64, QuoteError> {
        Ok(self.quote(request)?.sell_price())
    }

    /// Resolve and price every family named in `selection`, active or not,
    /// in the store's order
    pub fn process_components(
        &self,
        input: &InputDimensions,
        selection: &Selection,
    ) -> (Vec<ComponentCost>, Option<OutputDimensions>) {
        let store = &self.dataset.templates;

        for name in selection.keys() {
            if store.get(name).is_none() {
                let err = QuoteError::UnknownComponent { name: name.clone() };
                warn!("{}", err);
            }
        }

        let mut components: Vec<ComponentCost> = Vec::new();
        let mut output: Option<OutputDimensions> = None;

        for family in store.families() {
            let Some(&active) = selection.get(&family.name.to_lowercase()) else {
                continue;
            };

            let (templates, mut items) = self.structured_list(family);

            let outer = *output.get_or_insert_with(|| OutputDimensions::resolve(input, &items));
            let vars = Variables::new(input, &outer);

            for attribute in RESOLUTION_PASSES {
                resolve_pass(attribute, &templates, &mut items, &vars, &components);
            }

            for item in &mut items {
                item.price();
            }
            let material_cost = material_cost(&items);

            debug!(
                family = %family.name,
                active,
                items = items.len(),
                material_cost,
                "component priced"
            );

            components.push(ComponentCost {
                family: family.name.clone(),
                active,
                material_cost,
                items,
            });
        }

        (components, output)
    }

    /// Join a family's templates with the catalog
    fn structured_list<'f>(
        &self,
        family: &'f ComponentFamily,
    ) -> (Vec<&'f LineItemTemplate>, Vec<ResolvedLineItem>) {
        let mut templates = Vec::with_capacity(family.items.len());
        let mut items = Vec::with_capacity(family.items.len());

        for template in &family.items {
            match self.dataset.materials.get(&template.material) {
                Some(material) => {
                    templates.push(template);
                    items.push(ResolvedLineItem::from_template(template, material));
                }
                None => {
                    let err = QuoteError::CatalogMiss {
                        item: template.label(),
                        material: template.material.clone(),
                    };
                    debug!("{}", err);
                }
            }
        }

        (templates, items)
    }
}

/// Sum item costs, skipping anything that is not a finite number
pub fn material_cost(items: &[ResolvedLineItem]) -> f64 {
    items
        .iter()
        .map(|item| item.total_cost)
        .filter(|cost| cost.is_finite())
        .fold(0.0, |total, cost| total + cost)
}

fn template_value(template: &LineItemTemplate, attribute: Attribute) -> Option<&TemplateValue> {
    match attribute {
        Attribute::Width => Some(&template.width),
        Attribute::Length => Some(&template.length),
        Attribute::Quantity => Some(&template.quantity),
        _ => None,
    }
}

fn slot(item: &mut ResolvedLineItem, attribute: Attribute) -> Option<&mut Option<f64>> {
    match attribute {
        Attribute::Width => Some(&mut item.width),
        Attribute::Length => Some(&mut item.length),
        Attribute::Quantity => Some(&mut item.quantity),
        _ => None,
    }
}

/// Resolve one attribute of every item whose template holds a formula.
/// Items are visited in list order, so later items can read values
/// resolved earlier in the same pass.
fn resolve_pass(
    attribute: Attribute,
    templates: &[&LineItemTemplate],
    items: &mut [ResolvedLineItem],
    vars: &Variables,
    history: &[ComponentCost],
) {
    for (index, template) in templates.iter().enumerate() {
        let Some(TemplateValue::Formula(source)) = template_value(template, attribute) else {
            continue;
        };

        let lookups = ItemLookup {
            current: &*items,
            history,
        };
        let value = match Formula::parse(source).and_then(|f| f.evaluate(vars, &lookups)) {
            Ok(value) => Some(value),
            Err(source_err) => {
                let err = QuoteError::FormulaResolution {
                    item: template.label(),
                    attribute,
                    formula: source.clone(),
                    source: source_err,
                };
                warn!("{}", err);
                None
            }
        };

        if let Some(field) = slot(&mut items[index], attribute) {
            *field = value;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{MaterialCatalog, MaterialSpec, TemplateStore, Uom};

    fn spec(thickness: f64, width: f64, nom_w: f64, nom_t: f64, price: f64) -> MaterialSpec {
        MaterialSpec {
            actual_thickness: thickness,
            actual_width: width,
            nominal_width: nom_w,
            nominal_thickness: nom_t,
            scrap: 0.0,
            unit_price: price,
        }
    }

    fn item(
        title: &str,
        description: &str,
        material: &str,
        uom: Uom,
        width: TemplateValue,
        length: TemplateValue,
        quantity: TemplateValue,
    ) -> LineItemTemplate {
        LineItemTemplate {
            title: title.to_string(),
            description: description.to_string(),
            material: material.to_string(),
            uom,
            width,
            length,
            quantity,
        }
    }

    fn lit(n: f64) -> TemplateValue {
        TemplateValue::Literal(n)
    }

    fn formula(s: &str) -> TemplateValue {
        TemplateValue::Formula(s.to_string())
    }

    /// A small dataset with hand-checkable numbers
    fn dataset() -> Dataset {
        let materials: MaterialCatalog = [
            ("PLY, 3/8".to_string(), spec(0.375, 48.0, 48.0, 0.375, 1.0)),
            ("LBR, 1X4".to_string(), spec(0.75, 3.5, 4.0, 1.0, 1.0)),
            ("EACH".to_string(), spec(0.0, 0.0, 0.0, 0.0, 2.0)),
        ]
        .into_iter()
        .collect();

        let crate_family = ComponentFamily {
            name: "crate".to_string(),
            items: vec![
                // 12 × 12 panel → 1 SF × $1
                item("Crate3", "Side Panels", "PLY, 3/8", Uom::SquareFeet, lit(12.0), lit(12.0), lit(1.0)),
                // quantity reads the panel's width resolved in the width pass
                item(
                    "Crate4",
                    "Cleat, Thru-Edge",
                    "LBR, 1X4",
                    Uom::BoardFeet,
                    TemplateValue::MaterialWidth,
                    formula("ilength"),
                    formula("lookup(width, 'Crate3', 'Side Panels', 'PLY, 3/8') / 6"),
                ),
                item("Crate99", "Ghost", "UNOBTAINIUM", Uom::Each, lit(0.0), lit(0.0), lit(100.0)),
            ],
        };

        let blocking = ComponentFamily {
            name: "blocking".to_string(),
            items: vec![
                // reads the crate's cleat length from an earlier family
                item(
                    "Blocking1",
                    "Block",
                    "EACH",
                    Uom::Each,
                    lit(0.0),
                    lit(0.0),
                    formula("lookup(length, 'Crate4', 'Cleat, Thru-Edge', 'LBR, 1X4') / 36"),
                ),
                item(
                    "Blocking2",
                    "Missing Ref",
                    "EACH",
                    Uom::Each,
                    lit(0.0),
                    lit(0.0),
                    formula("1 + lookup(length, 'Nowhere', 'Nothing', 'NONE')"),
                ),
                item(
                    "Blocking3",
                    "Broken",
                    "EACH",
                    Uom::Each,
                    lit(0.0),
                    lit(0.0),
                    formula("ilength +* 2"),
                ),
            ],
        };

        Dataset {
            materials,
            templates: TemplateStore::new(vec![crate_family, blocking]),
        }
    }

    fn request() -> QuoteRequest {
        QuoteRequest::new(72.0, 24.0, 36.0)
            .with_complexity(Some(ComplexityTier::Simple))
            .with_component("crate", true)
            .with_component("blocking", true)
    }

    #[test]
    fn test_crate_costs() {
        let data = dataset();
        let quote = QuoteEngine::new(&data).quote(&request()).unwrap();

        let crate_cost = &quote.components[0];
        assert_eq!(crate_cost.family, "crate");
        // catalog miss drops the ghost item
        assert_eq!(crate_cost.items.len(), 2);

        let cleat = &crate_cost.items[1];
        assert_eq!(cleat.width, Some(3.5));
        assert_eq!(cleat.length, Some(72.0));
        assert_eq!(cleat.quantity, Some(2.0));
        // 2 × 72 × 4 × 1 / 144 = 4 BF
        assert!((cleat.total_cost - 4.0).abs() < 1e-10);

        // panel $1 + cleat $4
        assert!((crate_cost.material_cost - 5.0).abs() < 1e-10);
    }

    #[test]
    fn test_cross_component_and_fail_soft() {
        let data = dataset();
        let quote = QuoteEngine::new(&data).quote(&request()).unwrap();

        let blocking = &quote.components[1];
        assert_eq!(blocking.family, "blocking");
        // 72 / 36 = 2 blocks
        assert_eq!(blocking.items[0].quantity, Some(2.0));
        // missing reference reads as 0
        assert_eq!(blocking.items[1].quantity, Some(1.0));
        // broken formula resolves to nothing and costs nothing
        assert_eq!(blocking.items[2].quantity, None);
        assert_eq!(blocking.items[2].total_cost, 0.0);
        // (2 + 1) × $2
        assert!((blocking.material_cost - 6.0).abs() < 1e-10);

        // 11 × 1.75 / 0.52
        assert!((quote.summary.estimated_material_cost - 11.0).abs() < 1e-10);
        assert_eq!(quote.sell_price(), 37.02);
    }

    #[test]
    fn test_output_dimensions_from_first_family() {
        let data = dataset();
        let quote = QuoteEngine::new(&data).quote(&request()).unwrap();
        let output = quote.output.unwrap();
        // only the side panel and its cleat are present: width grows by 2 × (0.375 + 0.75)
        assert_eq!(output.length, 72.0);
        assert_eq!(output.width, 24.0 + 2.0 * 1.125);
        assert_eq!(output.height, 36.0);
    }

    #[test]
    fn test_inactive_family_still_feeds_lookups() {
        let data = dataset();
        let request = QuoteRequest::new(72.0, 24.0, 36.0)
            .with_complexity(Some(ComplexityTier::Simple))
            .with_component("crate", false)
            .with_component("blocking", true);
        let quote = QuoteEngine::new(&data).quote(&request).unwrap();

        assert!(!quote.components[0].active);
        assert_eq!(quote.components[1].items[0].quantity, Some(2.0));
        assert!((quote.summary.estimated_material_cost - 6.0).abs() < 1e-10);
    }

    #[test]
    fn test_all_inactive_prices_zero() {
        let data = dataset();
        let request = QuoteRequest::new(72.0, 24.0, 36.0)
            .with_complexity(Some(ComplexityTier::Complex))
            .with_component("crate", false)
            .with_component("blocking", false);
        let quote = QuoteEngine::new(&data).quote(&request).unwrap();
        assert_eq!(quote.summary.estimated_material_cost, 0.0);
        assert_eq!(quote.sell_price(), 0.0);
        assert!(quote.sell_price().is_sign_positive());
    }

    #[test]
    fn test_no_complexity_prices_zero() {
        let data = dataset();
        let request = QuoteRequest::new(72.0, 24.0, 36.0).with_component("crate", true);
        let quote = QuoteEngine::new(&data).quote(&request).unwrap();
        assert!(quote.summary.estimated_material_cost > 0.0);
        assert_eq!(quote.sell_price(), 0.0);
    }

    #[test]
    fn test_unknown_component_is_skipped() {
        let data = dataset();
        let request = request().with_component("pallet", true);
        let quote = QuoteEngine::new(&data).quote(&request).unwrap();
        assert_eq!(quote.components.len(), 2);
        assert_eq!(quote.sell_price(), 37.02);
    }

    #[test]
    fn test_processing_follows_store_order() {
        let data = dataset();
        let request = QuoteRequest::new(72.0, 24.0, 36.0)
            .with_complexity(Some(ComplexityTier::Simple))
            .with_component("blocking", true)
            .with_component("crate", true);
        let quote = QuoteEngine::new(&data).quote(&request).unwrap();
        let families: Vec<&str> = quote.components.iter().map(|c| c.family.as_str()).collect();
        assert_eq!(families, vec!["crate", "blocking"]);
    }

    #[test]
    fn test_idempotent() {
        let data = dataset();
        let engine = QuoteEngine::new(&data);
        let first = engine.sell_price(&request()).unwrap();
        let second = engine.sell_price(&request()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_invalid_dimensions_abort() {
        let data = dataset();
        let request = QuoteRequest::new(0.0, 24.0, 36.0).with_component("crate", true);
        assert!(matches!(
            QuoteEngine::new(&data).quote(&request),
            Err(QuoteError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_local_zero_falls_back_to_history() {
        let history = vec![ComponentCost {
            family: "crate".to_string(),
            active: true,
            material_cost: 0.0,
            items: vec![ResolvedLineItem {
                length: Some(40.0),
                ..crate::entities::line_item::tests::resolved(
                    "Crate8",
                    "Cleat, Thru-Edge",
                    "LBR, 1X4",
                    Uom::BoardFeet,
                    0.75,
                )
            }],
        }];
        let current = vec![crate::entities::line_item::tests::resolved(
            "Crate8",
            "Cleat, Thru-Edge",
            "LBR, 1X4",
            Uom::BoardFeet,
            0.75,
        )];
        let lookups = ItemLookup {
            current: &current,
            history: &history,
        };
        let r = LookupRef {
            attribute: Attribute::Length,
            title: "Crate8".to_string(),
            description: "Cleat, Thru-Edge".to_string(),
            material: "LBR, 1X4".to_string(),
        };
        assert_eq!(lookups.lookup(&r), 40.0);

        let thickness = LookupRef {
            attribute: Attribute::Thickness,
            ..r
        };
        assert_eq!(lookups.lookup(&thickness), 0.75);
    }

    #[test]
    fn test_quantity_pass_sees_later_items_widths_and_lengths() {
        let panels = ComponentFamily {
            name: "panels".to_string(),
            items: vec![
                item(
                    "Panel1",
                    "Early",
                    "EACH",
                    Uom::Each,
                    // same pass, later item: not resolved yet
                    formula("lookup(width, 'Panel2', 'Late', 'EACH')"),
                    lit(0.0),
                    formula(
                        "lookup(width, 'Panel2', 'Late', 'EACH') / 12 + lookup(length, 'Panel2', 'Late', 'EACH') / 36",
                    ),
                ),
                item(
                    "Panel2",
                    "Late",
                    "EACH",
                    Uom::Each,
                    formula("iwidth"),
                    formula("ilength / 2"),
                    lit(1.0),
                ),
            ],
        };
        let data = Dataset {
            materials: dataset().materials,
            templates: TemplateStore::new(vec![panels]),
        };
        let request = QuoteRequest::new(72.0, 24.0, 36.0)
            .with_complexity(Some(ComplexityTier::Simple))
            .with_component("panels", true);

        let quote = QuoteEngine::new(&data).quote(&request).unwrap();
        let items = &quote.components[0].items;

        assert_eq!(items[1].width, Some(24.0));
        assert_eq!(items[1].length, Some(36.0));
        assert_eq!(items[0].width, Some(0.0));
        // 24 / 12 + 36 / 36
        assert_eq!(items[0].quantity, Some(3.0));
        assert!((items[0].total_cost - 6.0).abs() < 1e-10);
    }

    #[test]
    fn test_material_cost_skips_non_finite() {
        let mut a = crate::entities::line_item::tests::resolved("A", "", "X", Uom::Each, 0.0);
        a.total_cost = 3.0;
        let mut b = a.clone();
        b.total_cost = f64::NAN;
        let mut c = a.clone();
        c.total_cost = f64::INFINITY;
        assert_eq!(material_cost(&[a, b, c]), 3.0);
        assert!(material_cost(&[]).is_sign_positive());
    }
}
