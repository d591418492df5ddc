// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! CoinGecko v3 implementation of [`MarketDataSource`]

use std::time::Instant;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, Instrument};
use url::Url;

use super::{decode, MarketDataSource};
use crate::config::{constants, ConfigError, CoinchartConfig};
use crate::errors::MarketDataError;
use crate::spans;
use crate::types::{
    series::PriceSeries, stats::CoinStatistics, symbol::Symbol, timeframe::Timeframe,
};

const STATISTICS_QUERY: [(&str, &str); 5] = [
    ("localization", "false"),
    ("tickers", "false"),
    ("market_data", "true"),
    ("community_data", "false"),
    ("developer_data", "false"),
];

/// HTTP client for the CoinGecko public API
///
/// One request per call, no retries and no caching. Cheap to clone; clones
/// share the connection pool.
#[derive(Debug, Clone)]
pub struct CoinGeckoClient {
    http: Client,
    base_url: Url,
    api_key: Option<String>,
}

impl CoinGeckoClient {
    /// Build a client from configuration
    ///
    /// # Errors
    ///
    /// [`ConfigError::InvalidBaseUrl`] if `base_url` is not an absolute
    /// hierarchical URL, [`ConfigError::HttpClient`] if the TLS backend fails
    /// to initialize.
    pub fn new(config: &CoinchartConfig) -> Result<Self, ConfigError> {
        let base_url = Url::parse(&config.base_url).map_err(|e| ConfigError::InvalidBaseUrl {
            url: config.base_url.clone(),
            source: Some(e),
        })?;
        if base_url.cannot_be_a_base() {
            return Err(ConfigError::InvalidBaseUrl {
                url: config.base_url.clone(),
                source: None,
            });
        }

        let http = Client::builder()
            .timeout(config.request_timeout)
            .user_agent(&config.user_agent)
            .build()?;

        Ok(Self {
            http,
            base_url,
            api_key: config.api_key.clone(),
        })
    }

    /// Client against the public endpoint with default settings
    pub fn public() -> Result<Self, ConfigError> {
        Self::new(&CoinchartConfig::default())
    }

    /// API root requests are issued against
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// `{base}/coins/{id}/market_chart?vs_currency=usd&days={days}`
    pub(crate) fn market_chart_url(&self, symbol: &Symbol, timeframe: Timeframe) -> Url {
        let mut url = self.endpoint(&["coins", symbol.as_str(), "market_chart"]);
        url.query_pairs_mut()
            .append_pair("vs_currency", constants::VS_CURRENCY)
            .append_pair("days", timeframe.days_param());
        url
    }

    /// `{base}/coins/{id}?localization=false&...&market_data=true&...`
    pub(crate) fn coin_detail_url(&self, symbol: &Symbol) -> Url {
        let mut url = self.endpoint(&["coins", symbol.as_str()]);
        url.query_pairs_mut().extend_pairs(STATISTICS_QUERY);
        url
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // cannot_be_a_base was rejected in new(), so this always succeeds
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// Issue a GET and return the body of a successful response
    async fn get_body(&self, url: Url, operation: &str) -> Result<Vec<u8>, MarketDataError> {
        let started = Instant::now();

        let mut request = self.http.get(url);
        if let Some(key) = &self.api_key {
            request = request.header(constants::COINGECKO_API_KEY_HEADER, key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| MarketDataError::unavailable(operation, e))?;

        let status = response.status();
        if !status.is_success() {
            debug!(
                operation,
                status = status.as_u16(),
                elapsed_ms = started.elapsed().as_millis() as u64,
                "Upstream returned error status"
            );
            return Err(MarketDataError::bad_status(
                operation,
                status.as_u16(),
                status.canonical_reason().unwrap_or("Unknown Status"),
            ));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| MarketDataError::unavailable(operation, e))?;

        debug!(
            operation,
            bytes = body.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Upstream request completed"
        );

        Ok(body.to_vec())
    }
}

#[async_trait]
impl MarketDataSource for CoinGeckoClient {
    async fn fetch_price_series(
        &self,
        symbol: &Symbol,
        timeframe: Timeframe,
    ) -> Result<PriceSeries, MarketDataError> {
        let span = spans::fetch_price_series(symbol, timeframe);

        async move {
            let operation = format!("market_chart {symbol} {timeframe}");
            let body = self
                .get_body(self.market_chart_url(symbol, timeframe), &operation)
                .await?;
            let series = decode::price_series(&body, symbol, timeframe, &operation)?;
            debug!(samples = series.len(), "Decoded price series");
            Ok(series)
        }
        .instrument(span)
        .await
    }

    async fn fetch_statistics(&self, symbol: &Symbol) -> Result<CoinStatistics, MarketDataError> {
        let span = spans::fetch_statistics(symbol);

        async move {
            let operation = format!("coin {symbol}");
            let body = self
                .get_body(self.coin_detail_url(symbol), &operation)
                .await?;
            decode::statistics(&body, &operation)
        }
        .instrument(span)
        .await
    }

    fn name(&self) -> &'static str {
        "CoinGecko"
    }
}
