use serde::Serialize;

use super::row::{calc_row, RowResult};
use super::tier::Tier;
use crate::data::roster::EmployeeRow;

/// Whole-list figures. `rows[i]` is the result for input row `i`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Totals {
    pub total_sales: f64,
    pub total_targets: f64,
    pub total_commission: f64,
    pub avg_achievement: f64,
    pub avg_rate: f64,
    pub rows: Vec<RowResult>,
}

pub fn aggregate(outlet_tier: Tier, rows: &[EmployeeRow]) -> Totals {
    let per_row: Vec<RowResult> = rows
        .iter()
        .map(|row| calc_row(row.sales, row.target, outlet_tier))
        .collect();

    let total_sales = rows.iter().map(|row| row.sales).sum();
    let total_targets = rows.iter().map(|row| row.target).sum();
    let total_commission = per_row.iter().map(|r| r.commission).sum();
    let avg_achievement = mean(per_row.iter().map(|r| r.achievement), per_row.len());
    let avg_rate = mean(per_row.iter().map(|r| r.rate), per_row.len());

    Totals {
        total_sales,
        total_targets,
        total_commission,
        avg_achievement,
        avg_rate,
        rows: per_row,
    }
}

fn mean(values: impl Iterator<Item = f64>, count: usize) -> f64 {
    if count == 0 {
        return 0.0;
    }
    values.sum::<f64>() / count as f64
}
