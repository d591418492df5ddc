//! Lookback windows for price series

use serde::{Deserialize, Serialize};
use std::fmt;

/// Requested lookback window for a price series.
///
/// Parsing is lenient: any token that is not one of the known labels resolves
/// to [`Timeframe::Day1`], so the mapping from caller input to an upstream
/// request is total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Timeframe {
    #[serde(rename = "1h")]
    Hour1,
    #[default]
    #[serde(rename = "1d")]
    Day1,
    #[serde(rename = "7d")]
    Week1,
    #[serde(rename = "30d")]
    Month1,
    #[serde(rename = "90d")]
    Quarter1,
    #[serde(rename = "1y")]
    Year1,
}

impl Timeframe {
    /// Returns all timeframes in ascending order.
    pub fn all() -> &'static [Timeframe] {
        &[
            Timeframe::Hour1,
            Timeframe::Day1,
            Timeframe::Week1,
            Timeframe::Month1,
            Timeframe::Quarter1,
            Timeframe::Year1,
        ]
    }

    /// Short label, also used in cache keys.
    pub fn label(&self) -> &'static str {
        match self {
            Timeframe::Hour1 => "1h",
            Timeframe::Day1 => "1d",
            Timeframe::Week1 => "7d",
            Timeframe::Month1 => "30d",
            Timeframe::Quarter1 => "90d",
            Timeframe::Year1 => "1y",
        }
    }

    /// Value of the provider's `days` query parameter.
    ///
    /// One hour is expressed as a fraction of a day (`0.04` ≈ 58 minutes).
    pub fn days_param(&self) -> &'static str {
        match self {
            Timeframe::Hour1 => "0.04",
            Timeframe::Day1 => "1",
            Timeframe::Week1 => "7",
            Timeframe::Month1 => "30",
            Timeframe::Quarter1 => "90",
            Timeframe::Year1 => "365",
        }
    }

    /// Strict lookup of a label. Case-insensitive.
    pub fn from_label(token: &str) -> Option<Self> {
        let token = token.trim();
        Self::all()
            .iter()
            .copied()
            .find(|tf| tf.label().eq_ignore_ascii_case(token))
    }

    /// Lenient parse: unknown tokens fall back to [`Timeframe::Day1`].
    pub fn parse_or_default(token: &str) -> Self {
        Self::from_label(token).unwrap_or_default()
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
