use thiserror::Error;

use crate::data::roster::EmployeeRow;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DistributeError {
    #[error("enter the number of employees first (employee count must be greater than zero)")]
    NoEmployees,
}

/// Equal per-employee target, floored to a whole currency unit.
pub fn equal_share(outlet_target: f64, count: usize) -> Result<f64, DistributeError> {
    if count == 0 {
        return Err(DistributeError::NoEmployees);
    }
    Ok((outlet_target / count as f64).floor())
}

/// Suggested share for display: the floored share, or 0 when there are no employees.
pub fn suggested_share(outlet_target: f64, count: usize) -> f64 {
    equal_share(outlet_target, count).unwrap_or(0.0)
}

/// Sets every row's target to the equal share. Sales and names are untouched.
pub fn distribute_equally(
    rows: &mut [EmployeeRow],
    outlet_target: f64,
    count: usize,
) -> Result<f64, DistributeError> {
    let share = equal_share(outlet_target, count)?;
    for row in rows.iter_mut() {
        row.target = share;
    }
    Ok(share)
}

/// Returns a list of exactly `new_count` rows. Existing rows keep their position and id;
/// growth appends default rows named after their 1-based position.
pub fn resize_rows(rows: &[EmployeeRow], new_count: usize) -> Vec<EmployeeRow> {
    (0..new_count)
        .map(|index| {
            rows.get(index)
                .cloned()
                .unwrap_or_else(|| EmployeeRow::placeholder(index + 1))
        })
        .collect()
}
