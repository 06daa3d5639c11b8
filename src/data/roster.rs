//! Employee rows and outlet inputs: the plain records the calculator works over.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::input::{deserialize_amount, sanitize_amount};
use crate::calc::Tier;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmployeeRow {
    pub id: String,
    pub name: String,
    pub sales: f64,
    pub target: f64,
}

impl EmployeeRow {
    pub fn new(name: impl Into<String>, sales: f64, target: f64) -> Self {
        Self {
            id: new_row_id(),
            name: name.into(),
            sales: sanitize_amount(sales),
            target: sanitize_amount(target),
        }
    }

    /// Default row for 1-based display position `position`.
    pub fn placeholder(position: usize) -> Self {
        Self::new(default_name(position), 0.0, 0.0)
    }
}

pub fn default_name(position: usize) -> String {
    format!("Employee {position}")
}

pub fn new_row_id() -> String {
    Uuid::new_v4().to_string()
}

/// Row as it arrives from a client: every field optional, numbers unchecked.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RowInput {
    pub id: Option<String>,
    pub name: Option<String>,
    #[serde(deserialize_with = "deserialize_amount")]
    pub sales: f64,
    #[serde(deserialize_with = "deserialize_amount")]
    pub target: f64,
}

impl RowInput {
    /// `position` is 1-based and only names rows that arrive without one.
    pub fn into_row(self, position: usize) -> EmployeeRow {
        EmployeeRow {
            id: self
                .id
                .filter(|id| !id.trim().is_empty())
                .unwrap_or_else(new_row_id),
            name: self.name.unwrap_or_else(|| default_name(position)),
            sales: sanitize_amount(self.sales),
            target: sanitize_amount(self.target),
        }
    }
}

pub fn rows_from_inputs(inputs: Vec<RowInput>) -> Vec<EmployeeRow> {
    inputs
        .into_iter()
        .enumerate()
        .map(|(index, input)| input.into_row(index + 1))
        .collect()
}

/// Outlet target in currency units and achievement as a ratio (0.88 = 88%).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct OutletState {
    pub target: f64,
    pub achievement: f64,
}

impl OutletState {
    pub fn from_percent(target: f64, achievement_percent: f64) -> Self {
        Self {
            target: sanitize_amount(target),
            achievement: sanitize_amount(achievement_percent) / 100.0,
        }
    }

    pub fn tier(&self) -> Tier {
        Tier::for_achievement(self.achievement)
    }

    pub fn commission_rate(&self) -> f64 {
        self.tier().rate()
    }
}
