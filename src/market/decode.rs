//! Response schemas for the provider API
//!
//! Price charts must be a JSON object whose `prices` member, if present and
//! not null, is a list of pairs. A pair element that is null or missing
//! reads as zero so every pair keeps its index.
//!
//! Coin details decode permissively. The `market_data` section must exist
//! and be an object, but every field inside it independently falls back to
//! its zero value when absent or of an unexpected type.

use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::warn;

use crate::errors::MarketDataError;
use crate::types::{
    series::PriceSeries,
    stats::{CoinStatistics, PriceChangePercent},
    symbol::Symbol,
    timeframe::Timeframe,
};

/// `GET /coins/{id}/market_chart`
#[derive(Debug, Deserialize)]
struct MarketChartResponse {
    #[serde(default)]
    prices: Option<Vec<Vec<Option<f64>>>>,
}

/// `GET /coins/{id}`, only the part we read
#[derive(Debug, Deserialize)]
struct CoinDetailResponse {
    #[serde(default)]
    market_data: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct MarketDataSection {
    #[serde(deserialize_with = "lenient::usd_f64")]
    market_cap: f64,
    #[serde(deserialize_with = "lenient::usd_f64")]
    total_volume: f64,
    #[serde(deserialize_with = "lenient::f64")]
    circulating_supply: f64,
    #[serde(deserialize_with = "lenient::f64")]
    total_supply: f64,
    #[serde(deserialize_with = "lenient::usd_f64")]
    ath: f64,
    #[serde(deserialize_with = "lenient::usd_string")]
    ath_date: String,
    #[serde(deserialize_with = "lenient::f64")]
    price_change_percentage_24h: f64,
    #[serde(deserialize_with = "lenient::f64")]
    price_change_percentage_7d: f64,
    #[serde(deserialize_with = "lenient::f64")]
    price_change_percentage_30d: f64,
    #[serde(deserialize_with = "lenient::f64")]
    price_change_percentage_1y: f64,
}

impl From<MarketDataSection> for CoinStatistics {
    fn from(section: MarketDataSection) -> Self {
        CoinStatistics {
            market_cap: section.market_cap,
            volume_24h: section.total_volume,
            circulating_supply: section.circulating_supply,
            total_supply: section.total_supply,
            all_time_high: section.ath,
            all_time_high_date: section.ath_date,
            price_change_percent: PriceChangePercent {
                day: section.price_change_percentage_24h,
                week: section.price_change_percentage_7d,
                month: section.price_change_percentage_30d,
                year: section.price_change_percentage_1y,
            },
        }
    }
}

/// Field deserializers that never fail
mod lenient {
    use super::*;

    pub(super) fn f64<'de, D: Deserializer<'de>>(d: D) -> Result<f64, D::Error> {
        let value = Value::deserialize(d)?;
        Ok(value.as_f64().unwrap_or_default())
    }

    pub(super) fn usd_f64<'de, D: Deserializer<'de>>(d: D) -> Result<f64, D::Error> {
        let value = Value::deserialize(d)?;
        Ok(value
            .get("usd")
            .and_then(Value::as_f64)
            .unwrap_or_default())
    }

    pub(super) fn usd_string<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
        let value = Value::deserialize(d)?;
        Ok(value
            .get("usd")
            .and_then(Value::as_str)
            .map(str::to_owned)
            .unwrap_or_default())
    }
}

/// Decode a market-chart body into a non-empty price series
///
/// Keeps the second element of every `[timestamp, price]` pair, in order.
/// A pair without a usable price contributes `0.0` at its position.
pub(crate) fn price_series(
    body: &[u8],
    symbol: &Symbol,
    timeframe: Timeframe,
    operation: &str,
) -> Result<PriceSeries, MarketDataError> {
    let response: MarketChartResponse =
        serde_json::from_slice(body).map_err(|e| MarketDataError::malformed(operation, e))?;

    let pairs = response.prices.unwrap_or_default();
    if pairs.is_empty() {
        return Err(MarketDataError::no_data(symbol.as_str(), timeframe.label()));
    }

    let mut zeroed = 0;
    let samples: Vec<f64> = pairs
        .iter()
        .map(|pair| {
            pair.get(1).copied().flatten().unwrap_or_else(|| {
                zeroed += 1;
                0.0
            })
        })
        .collect();

    if zeroed > 0 {
        warn!(
            symbol = %symbol,
            zeroed,
            "Price pairs without a price read as zero"
        );
    }

    Ok(PriceSeries::from(samples))
}

/// Decode a coin-detail body into a statistics snapshot
pub(crate) fn statistics(body: &[u8], operation: &str) -> Result<CoinStatistics, MarketDataError> {
    let response: CoinDetailResponse =
        serde_json::from_slice(body).map_err(|e| MarketDataError::malformed(operation, e))?;

    let section = match response.market_data {
        Some(value @ Value::Object(_)) => value,
        _ => return Err(MarketDataError::missing_section(operation, "market_data")),
    };

    let section: MarketDataSection =
        serde_json::from_value(section).map_err(|e| MarketDataError::malformed(operation, e))?;

    Ok(section.into())
}
