use serde::{Deserialize, Serialize};

/// Outlet commission band, keyed by outlet achievement ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    Zero,
    HalfPercent,
    OnePercent,
    TwoPercent,
}

pub const TWO_PERCENT_THRESHOLD: f64 = 1.0;
pub const ONE_PERCENT_THRESHOLD: f64 = 0.9;
pub const HALF_PERCENT_THRESHOLD: f64 = 0.8;

impl Tier {
    /// Boundaries are inclusive. Negative and NaN ratios land in [`Tier::Zero`].
    pub fn for_achievement(ratio: f64) -> Self {
        if ratio >= TWO_PERCENT_THRESHOLD {
            Self::TwoPercent
        } else if ratio >= ONE_PERCENT_THRESHOLD {
            Self::OnePercent
        } else if ratio >= HALF_PERCENT_THRESHOLD {
            Self::HalfPercent
        } else {
            Self::Zero
        }
    }

    pub fn rate(self) -> f64 {
        match self {
            Self::TwoPercent => 0.02,
            Self::OnePercent => 0.01,
            Self::HalfPercent => 0.005,
            Self::Zero => 0.0,
        }
    }

    /// 2% and 0.5% outlets scale each employee's rate by personal achievement;
    /// 1% and 0% outlets pay the flat outlet rate.
    pub fn scales_with_personal_achievement(self) -> bool {
        matches!(self, Self::TwoPercent | Self::HalfPercent)
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::TwoPercent => "2%",
            Self::OnePercent => "1%",
            Self::HalfPercent => "0.5%",
            Self::Zero => "0%",
        }
    }
}

/// Rate for an achievement ratio, without the tier tag.
pub fn tier_rate(ratio: f64) -> f64 {
    Tier::for_achievement(ratio).rate()
}
