//! Cost pipeline - complexity tiers and contribution margin

use serde::{Deserialize, Serialize};

use crate::pricing::engine::ComponentCost;

/// Fixed markup fraction applied to convert cost into sell price
pub const CONTRIBUTION_MARGIN: f64 = 0.48;

/// Labour bracket chosen by the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComplexityTier {
    Simple,
    Medium,
    Complex,
}

impl ComplexityTier {
    /// Highest priority first
    pub const PRIORITY: [ComplexityTier; 3] = [
        ComplexityTier::Complex,
        ComplexityTier::Medium,
        ComplexityTier::Simple,
    ];

    /// Multiplier applied to the estimated material cost
    pub fn material_factor(&self) -> f64 {
        match self {
            ComplexityTier::Simple | ComplexityTier::Medium => 1.0,
            ComplexityTier::Complex => 1.2,
        }
    }

    /// Labour cost as a multiple of the (adjusted) material cost
    pub fn labour_factor(&self) -> f64 {
        match self {
            ComplexityTier::Simple => 0.75,
            ComplexityTier::Medium => 1.0,
            ComplexityTier::Complex => 1.2,
        }
    }

    /// Pick the highest-priority active tier
    pub fn select(is_active: impl Fn(ComplexityTier) -> bool) -> Option<ComplexityTier> {
        Self::PRIORITY.into_iter().find(|tier| is_active(*tier))
    }
}

impl std::fmt::Display for ComplexityTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ComplexityTier::Simple => write!(f, "simple"),
            ComplexityTier::Medium => write!(f, "medium"),
            ComplexityTier::Complex => write!(f, "complex"),
        }
    }
}

impl std::str::FromStr for ComplexityTier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "simple" => Ok(ComplexityTier::Simple),
            "medium" => Ok(ComplexityTier::Medium),
            "complex" => Ok(ComplexityTier::Complex),
            _ => Err(format!(
                "Invalid complexity: {}. Use 'simple', 'medium' or 'complex'",
                s
            )),
        }
    }
}

/// Result of the cost pipeline
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CostSummary {
    /// Sum of the active families' material costs
    pub estimated_material_cost: f64,
    /// Material cost after the complexity adjustment
    pub material_cost: f64,
    pub labour_cost: f64,
    pub final_cost: f64,
    /// Rounded to cents
    pub sell_price: f64,
}

impl CostSummary {
    /// Run the tier rule, sum, and margin steps. Without a tier every
    /// figure after the estimate is 0.
    pub fn compute(estimated_material_cost: f64, tier: Option<ComplexityTier>) -> Self {
        let (material_cost, labour_cost) = match tier {
            Some(tier) => {
                let material = estimated_material_cost * tier.material_factor();
                (material, material * tier.labour_factor())
            }
            None => (0.0, 0.0),
        };
        let final_cost = material_cost + labour_cost;

        Self {
            estimated_material_cost,
            material_cost,
            labour_cost,
            final_cost,
            sell_price: sell_price(final_cost, CONTRIBUTION_MARGIN),
        }
    }
}

/// Sum material costs of the active families
pub fn estimated_material_cost(components: &[ComponentCost]) -> f64 {
    components
        .iter()
        .filter(|c| c.active)
        .fold(0.0, |total, c| total + c.material_cost)
}

/// Mark cost up to a sell price and round to cents
pub fn sell_price(final_cost: f64, margin: f64) -> f64 {
    round_currency(final_cost / (1.0 - margin))
}

/// Round to cents on the exact decimal value of `value`, with exact
/// half-cent ties going away from zero. Never returns `-0.0`.
pub fn round_currency(value: f64) -> f64 {
    if !value.is_finite() {
        return value;
    }

    // Only multiples of 1/8 land exactly on a half cent; scaling those by
    // 100 is exact.
    let eighths = value * 8.0;
    let rounded = if eighths.fract() == 0.0 && eighths % 2.0 != 0.0 {
        (value * 100.0).round() / 100.0
    } else {
        format!("{:.2}", value).parse().unwrap_or(value)
    };
    rounded + 0.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn component(family: &str, active: bool, cost: f64) -> ComponentCost {
        ComponentCost {
            family: family.to_string(),
            active,
            material_cost: cost,
            items: Vec::new(),
        }
    }

    #[test]
    fn test_simple_tier() {
        let summary = CostSummary::compute(100.0, Some(ComplexityTier::Simple));
        assert_eq!(summary.material_cost, 100.0);
        assert_eq!(summary.labour_cost, 75.0);
        assert_eq!(summary.final_cost, 175.0);
        assert_eq!(summary.sell_price, 336.54);
    }

    #[test]
    fn test_medium_tier() {
        let summary = CostSummary::compute(100.0, Some(ComplexityTier::Medium));
        assert_eq!(summary.material_cost, 100.0);
        assert_eq!(summary.labour_cost, 100.0);
        assert_eq!(summary.final_cost, 200.0);
        assert_eq!(summary.sell_price, 384.62);
    }

    #[test]
    fn test_complex_tier() {
        let summary = CostSummary::compute(100.0, Some(ComplexityTier::Complex));
        assert!((summary.material_cost - 120.0).abs() < 1e-10);
        assert!((summary.labour_cost - 144.0).abs() < 1e-10);
        assert!((summary.final_cost - 264.0).abs() < 1e-10);
        assert_eq!(summary.sell_price, 507.69);
    }

    #[test]
    fn test_no_tier_is_free() {
        let summary = CostSummary::compute(100.0, None);
        assert_eq!(summary.estimated_material_cost, 100.0);
        assert_eq!(summary.material_cost, 0.0);
        assert_eq!(summary.labour_cost, 0.0);
        assert_eq!(summary.sell_price, 0.0);
    }

    #[test]
    fn test_tier_priority() {
        let all = ComplexityTier::select(|_| true);
        assert_eq!(all, Some(ComplexityTier::Complex));

        let medium_and_simple = ComplexityTier::select(|t| t != ComplexityTier::Complex);
        assert_eq!(medium_and_simple, Some(ComplexityTier::Medium));

        let simple_only = ComplexityTier::select(|t| t == ComplexityTier::Simple);
        assert_eq!(simple_only, Some(ComplexityTier::Simple));

        assert_eq!(ComplexityTier::select(|_| false), None);
    }

    #[test]
    fn test_estimate_counts_active_only() {
        let components = vec![
            component("crate", true, 80.0),
            component("floater", false, 15.0),
            component("barrier", true, 20.0),
        ];
        assert_eq!(estimated_material_cost(&components), 100.0);
    }

    #[test]
    fn test_all_inactive_is_zero() {
        let components = vec![component("crate", false, 80.0), component("floater", false, 15.0)];
        let estimate = estimated_material_cost(&components);
        assert_eq!(estimate, 0.0);
        assert!(estimate.is_sign_positive());

        for tier in ComplexityTier::PRIORITY {
            let price = CostSummary::compute(estimate, Some(tier)).sell_price;
            assert_eq!(price, 0.0);
            assert!(price.is_sign_positive());
        }
    }

    #[test]
    fn test_empty_selection_is_positive_zero() {
        let estimate = estimated_material_cost(&[]);
        assert!(estimate.is_sign_positive());
        let summary = CostSummary::compute(estimate, Some(ComplexityTier::Simple));
        assert_eq!(serde_json::to_string(&summary.sell_price).unwrap(), "0.0");
    }

    #[test]
    fn test_round_currency_never_negative_zero() {
        assert!(round_currency(-0.0).is_sign_positive());
        assert!(round_currency(-0.001).is_sign_positive());
    }

    #[test]
    fn test_round_currency_uses_decimal_value() {
        // 0.015 is stored just below the half cent
        assert_eq!(round_currency(0.015), 0.01);
        assert_eq!(round_currency(1.005), 1.0);
        assert_eq!(round_currency(336.538), 336.54);
        // exact half cents round away from zero
        assert_eq!(round_currency(0.125), 0.13);
        assert_eq!(round_currency(0.375), 0.38);
        assert_eq!(round_currency(-0.125), -0.13);
    }

    #[test]
    fn test_round_currency() {
        assert_eq!(round_currency(336.538461), 336.54);
        assert_eq!(round_currency(507.692307), 507.69);
        assert_eq!(round_currency(0.0), 0.0);
    }

    #[test]
    fn test_complexity_parse() {
        assert_eq!("Complex".parse::<ComplexityTier>().unwrap(), ComplexityTier::Complex);
        assert_eq!(" simple ".parse::<ComplexityTier>().unwrap(), ComplexityTier::Simple);
        assert!("hard".parse::<ComplexityTier>().is_err());
    }
}
