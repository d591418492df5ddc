//! Coin statistics snapshot

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Percentage price change over several windows
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PriceChangePercent {
    /// Change over the last 24 hours
    pub day: f64,
    /// Change over the last 7 days
    pub week: f64,
    /// Change over the last 30 days
    pub month: f64,
    /// Change over the last year
    pub year: f64,
}

/// Market statistics for one coin, in USD where applicable
///
/// Every numeric field defaults to `0.0` and the date to an empty string when
/// the provider omits them; a partially filled payload is still a valid
/// snapshot.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CoinStatistics {
    pub market_cap: f64,
    pub volume_24h: f64,
    pub circulating_supply: f64,
    pub total_supply: f64,
    #[serde(rename = "ath")]
    pub all_time_high: f64,
    /// Provider timestamp of the all-time high (RFC 3339), or empty
    #[serde(rename = "ath_date")]
    pub all_time_high_date: String,
    pub price_change_percent: PriceChangePercent,
}

impl CoinStatistics {
    /// Parsed all-time-high timestamp, if the provider supplied a valid one
    pub fn all_time_high_at(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.all_time_high_date)
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }
}
