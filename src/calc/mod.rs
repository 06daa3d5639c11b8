//! Commission rules: outlet tiering, per-row calculation, aggregation and target distribution.
//! No I/O here; input coercion happens in [`crate::data::input`].

pub mod aggregate;
pub mod distribute;
pub mod row;
pub mod tier;

pub use aggregate::{aggregate, Totals};
pub use distribute::{distribute_equally, equal_share, resize_rows, suggested_share, DistributeError};
pub use row::{calc_row, personal_achievement, RowResult};
pub use tier::{
    tier_rate, Tier, HALF_PERCENT_THRESHOLD, ONE_PERCENT_THRESHOLD, TWO_PERCENT_THRESHOLD,
};
