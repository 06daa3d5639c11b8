//! Display formatting for currency figures and percentages.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    /// Arabic-Indic digits with the Arabic thousands separator.
    Ar,
}

impl Locale {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "en" | "en-us" | "en-gb" => Some(Self::En),
            "ar" | "ar-eg" | "ar-sa" => Some(Self::Ar),
            _ => None,
        }
    }

    fn group_separator(self) -> char {
        match self {
            Self::En => ',',
            Self::Ar => '\u{066C}',
        }
    }

    fn digit(self, ascii: char) -> char {
        match self {
            Self::En => ascii,
            Self::Ar => ascii
                .to_digit(10)
                .and_then(|d| char::from_u32(0x0660 + d))
                .unwrap_or(ascii),
        }
    }
}

/// Rounds to a whole unit and groups thousands. Non-finite values print as 0.
pub fn format_amount(value: f64, locale: Locale) -> String {
    let rounded = if value.is_finite() { value.round() } else { 0.0 };
    let negative = rounded < 0.0;
    let digits = format!("{:.0}", rounded.abs());

    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if negative {
        out.push('-');
    }
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            out.push(locale.group_separator());
        }
        out.push(locale.digit(ch));
    }
    out
}

/// `ratio` is a fraction (0.881 = 88.1%).
pub fn format_percent(ratio: f64, decimals: usize) -> String {
    let ratio = if ratio.is_finite() { ratio } else { 0.0 };
    format!("{:.*}%", decimals, ratio * 100.0)
}

pub fn format_achievement(ratio: f64) -> String {
    format_percent(ratio, 1)
}

pub fn format_rate(ratio: f64) -> String {
    format_percent(ratio, 2)
}
