use serde::Serialize;

use super::tier::Tier;

/// Per-employee figures derived from one row and the outlet tier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct RowResult {
    pub achievement: f64,
    pub rate: f64,
    pub commission: f64,
}

/// Personal achievement ratio. A non-positive target yields 0 instead of dividing.
pub fn personal_achievement(sales: f64, target: f64) -> f64 {
    if target > 0.0 {
        sales / target
    } else {
        0.0
    }
}

pub fn calc_row(sales: f64, target: f64, outlet_tier: Tier) -> RowResult {
    let achievement = personal_achievement(sales, target);
    let rate = if outlet_tier.scales_with_personal_achievement() {
        achievement * outlet_tier.rate()
    } else {
        outlet_tier.rate()
    };
    RowResult {
        achievement,
        rate,
        commission: sales * rate,
    }
}
