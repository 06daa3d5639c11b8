//! Calculator session: outlet inputs, the employee-count field and the row list, with the
//! edits the form exposes. Every derived figure comes from [`Session::summary`].

use serde::{Deserialize, Serialize};

use crate::calc::{
    aggregate, distribute_equally, equal_share, resize_rows, suggested_share, DistributeError,
    Tier, Totals,
};
use crate::data::input::{deserialize_amount, deserialize_count, sanitize_amount};
use crate::data::roster::{rows_from_inputs, EmployeeRow, OutletState, RowInput};

pub const DEFAULT_OUTLET_TARGET: f64 = 1_000_000.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub outlet_target: f64,
    pub outlet_achievement_percent: f64,
    pub suggest_count: usize,
    pub rows: Vec<EmployeeRow>,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            outlet_target: DEFAULT_OUTLET_TARGET,
            outlet_achievement_percent: 0.0,
            suggest_count: 0,
            rows: Vec::new(),
        }
    }
}

/// One field edit on a row.
#[derive(Debug, Clone, PartialEq)]
pub enum RowEdit {
    Name(String),
    Sales(f64),
    Target(f64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetBalance {
    Balanced,
    Over,
    Under,
}

impl TargetBalance {
    pub fn from_diff(diff: f64) -> Self {
        if diff > 0.0 {
            Self::Over
        } else if diff < 0.0 {
            Self::Under
        } else {
            Self::Balanced
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub outlet_target: f64,
    pub outlet_achievement_percent: f64,
    pub outlet_tier: Tier,
    pub outlet_rate: f64,
    pub suggest_count: usize,
    pub suggested_per_employee: f64,
    /// Sum of employee targets minus the outlet target.
    pub outlet_diff: f64,
    pub balance: TargetBalance,
    #[serde(flatten)]
    pub totals: Totals,
}

impl Session {
    pub fn outlet(&self) -> OutletState {
        OutletState::from_percent(self.outlet_target, self.outlet_achievement_percent)
    }

    pub fn tier(&self) -> Tier {
        self.outlet().tier()
    }

    pub fn set_outlet_target(&mut self, target: f64) {
        self.outlet_target = sanitize_amount(target);
    }

    pub fn set_achievement_percent(&mut self, percent: f64) {
        self.outlet_achievement_percent = sanitize_amount(percent);
    }

    /// Sets the employee-count field and resizes the row list to match.
    pub fn set_employee_count(&mut self, count: usize) {
        self.suggest_count = count;
        self.rows = resize_rows(&self.rows, count);
    }

    /// Appends a default row, pre-filled with the suggested equal target.
    pub fn add_employee(&mut self) -> &EmployeeRow {
        let mut row = EmployeeRow::placeholder(self.rows.len() + 1);
        row.target = suggested_share(self.outlet_target, self.suggest_count);
        self.rows.push(row);
        &self.rows[self.rows.len() - 1]
    }

    /// Returns false when no row has that id.
    pub fn remove_employee(&mut self, id: &str) -> bool {
        let before = self.rows.len();
        self.rows.retain(|row| row.id != id);
        self.rows.len() != before
    }

    pub fn update_row(&mut self, id: &str, edit: RowEdit) -> bool {
        let Some(row) = self.rows.iter_mut().find(|row| row.id == id) else {
            return false;
        };
        match edit {
            RowEdit::Name(name) => row.name = name,
            RowEdit::Sales(sales) => row.sales = sanitize_amount(sales),
            RowEdit::Target(target) => row.target = sanitize_amount(target),
        }
        true
    }

    /// Gives every row the floored equal share of the outlet target.
    pub fn distribute_equally(&mut self) -> Result<f64, DistributeError> {
        distribute_equally(&mut self.rows, self.outlet_target, self.suggest_count)
    }

    /// Resizes the rows to the employee count, then distributes, so the divisor always
    /// matches the row count. A zero count fails before any row is touched.
    pub fn distribute_to_count(&mut self) -> Result<f64, DistributeError> {
        equal_share(self.outlet_target, self.suggest_count)?;
        self.rows = resize_rows(&self.rows, self.suggest_count);
        self.distribute_equally()
    }

    pub fn summary(&self) -> Summary {
        let tier = self.tier();
        let totals = aggregate(tier, &self.rows);
        let outlet_diff = totals.total_targets - self.outlet_target;
        Summary {
            outlet_target: self.outlet_target,
            outlet_achievement_percent: self.outlet_achievement_percent,
            outlet_tier: tier,
            outlet_rate: tier.rate(),
            suggest_count: self.suggest_count,
            suggested_per_employee: suggested_share(self.outlet_target, self.suggest_count),
            outlet_diff,
            balance: TargetBalance::from_diff(outlet_diff),
            totals,
        }
    }
}

/// Session as a client submits it: raw numbers, optional fields.
/// Numeric fields go through boundary coercion, so a bad value becomes 0 instead of failing.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionInput {
    #[serde(default = "default_outlet_target", deserialize_with = "deserialize_amount")]
    pub outlet_target: f64,
    #[serde(default, deserialize_with = "deserialize_amount")]
    pub outlet_achievement_percent: f64,
    #[serde(default, deserialize_with = "deserialize_count")]
    pub suggest_count: usize,
    #[serde(default)]
    pub rows: Vec<RowInput>,
}

fn default_outlet_target() -> f64 {
    DEFAULT_OUTLET_TARGET
}

impl SessionInput {
    /// Rows are taken as given; resizing to the count happens in `distribute_to_count`.
    pub fn into_session(self) -> Session {
        Session {
            outlet_target: sanitize_amount(self.outlet_target),
            outlet_achievement_percent: sanitize_amount(self.outlet_achievement_percent),
            suggest_count: self.suggest_count,
            rows: rows_from_inputs(self.rows),
        }
    }
}

