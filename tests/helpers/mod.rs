// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Test helpers for coinchart integration tests
//!
//! Provides a scripted [`MarketDataSource`] so the caching service can be
//! exercised without network access.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use coinchart::{
    CoinStatistics, ExpiringCache, MarketDataError, MarketDataService, MarketDataSource,
    PriceChangePercent, PriceSeries, Symbol, Timeframe,
};

/// Failure a mock call should report
#[derive(Debug, Clone, PartialEq)]
pub enum MockFailure {
    /// HTTP status from the provider
    Status(u16),
    /// Transport error
    Unavailable,
    /// Empty series
    NoData,
    /// Detail payload without `market_data`
    MissingSection,
}

impl MockFailure {
    fn into_error(self, operation: &str, symbol: &Symbol, timeframe: &str) -> MarketDataError {
        match self {
            MockFailure::Status(404) => MarketDataError::bad_status(operation, 404, "Not Found"),
            MockFailure::Status(429) => {
                MarketDataError::bad_status(operation, 429, "Too Many Requests")
            }
            MockFailure::Status(code) => MarketDataError::bad_status(operation, code, "Error"),
            MockFailure::Unavailable => MarketDataError::unavailable(
                operation,
                std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "mock refused"),
            ),
            MockFailure::NoData => MarketDataError::no_data(symbol.as_str(), timeframe),
            MockFailure::MissingSection => MarketDataError::missing_section(operation, "market_data"),
        }
    }
}

type Scripted<T> = Mutex<HashMap<String, Result<T, MockFailure>>>;

/// Mock MarketDataSource with scripted responses and call counters
///
/// Symbols without a scripted response answer with a 404.
///
/// # Example
///
/// ```rust,ignore
/// let mock = Arc::new(
///     MockMarketSource::new()
///         .with_prices("bitcoin", vec![100.0, 105.5, 98.2])
///         .with_stats_failure("ghost", MockFailure::Status(404)),
/// );
/// let service = service_over(mock.clone(), Duration::from_secs(300));
/// ```
#[derive(Default)]
pub struct MockMarketSource {
    prices: Scripted<Vec<f64>>,
    stats: Scripted<CoinStatistics>,
    price_calls: AtomicUsize,
    stats_calls: AtomicUsize,
    requested: Mutex<Vec<(Symbol, Timeframe)>>,
    delay: Option<Duration>,
}

impl MockMarketSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script a successful price series for `symbol` (any timeframe)
    pub fn with_prices(self, symbol: &str, prices: Vec<f64>) -> Self {
        self.set_prices(symbol, Ok(prices));
        self
    }

    /// Script a price failure for `symbol`
    pub fn with_price_failure(self, symbol: &str, failure: MockFailure) -> Self {
        self.set_prices(symbol, Err(failure));
        self
    }

    /// Script a successful statistics snapshot for `symbol`
    pub fn with_statistics(self, symbol: &str, stats: CoinStatistics) -> Self {
        self.set_statistics(symbol, Ok(stats));
        self
    }

    /// Script a statistics failure for `symbol`
    pub fn with_stats_failure(self, symbol: &str, failure: MockFailure) -> Self {
        self.set_statistics(symbol, Err(failure));
        self
    }

    /// Sleep this long inside every call
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Replace the scripted price response after construction
    pub fn set_prices(&self, symbol: &str, response: Result<Vec<f64>, MockFailure>) {
        self.prices
            .lock()
            .unwrap()
            .insert(symbol.to_string(), response);
    }

    /// Replace the scripted statistics response after construction
    pub fn set_statistics(&self, symbol: &str, response: Result<CoinStatistics, MockFailure>) {
        self.stats
            .lock()
            .unwrap()
            .insert(symbol.to_string(), response);
    }

    pub fn price_calls(&self) -> usize {
        self.price_calls.load(Ordering::SeqCst)
    }

    pub fn stats_calls(&self) -> usize {
        self.stats_calls.load(Ordering::SeqCst)
    }

    /// Every (symbol, timeframe) passed to `fetch_price_series`, in order
    pub fn requested(&self) -> Vec<(Symbol, Timeframe)> {
        self.requested.lock().unwrap().clone()
    }

    async fn pause(&self) {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
    }
}

#[async_trait]
impl MarketDataSource for MockMarketSource {
    async fn fetch_price_series(
        &self,
        symbol: &Symbol,
        timeframe: Timeframe,
    ) -> Result<PriceSeries, MarketDataError> {
        self.price_calls.fetch_add(1, Ordering::SeqCst);
        self.requested
            .lock()
            .unwrap()
            .push((symbol.clone(), timeframe));
        self.pause().await;

        let scripted = self.prices.lock().unwrap().get(symbol.as_str()).cloned();
        let operation = format!("market_chart {symbol} {timeframe}");
        match scripted.unwrap_or(Err(MockFailure::Status(404))) {
            Ok(prices) => Ok(PriceSeries::from(prices)),
            Err(failure) => Err(failure.into_error(&operation, symbol, timeframe.label())),
        }
    }

    async fn fetch_statistics(&self, symbol: &Symbol) -> Result<CoinStatistics, MarketDataError> {
        self.stats_calls.fetch_add(1, Ordering::SeqCst);
        self.pause().await;

        let scripted = self.stats.lock().unwrap().get(symbol.as_str()).cloned();
        let operation = format!("coin {symbol}");
        match scripted.unwrap_or(Err(MockFailure::Status(404))) {
            Ok(stats) => Ok(stats),
            Err(failure) => Err(failure.into_error(&operation, symbol, "")),
        }
    }

    fn name(&self) -> &'static str {
        "MockMarketSource"
    }
}

/// Service over `source` with a fresh cache and no sweeper
pub fn service_over(source: Arc<MockMarketSource>, ttl: Duration) -> MarketDataService {
    MarketDataService::new(source, Arc::new(ExpiringCache::new()), ttl)
}

/// A plausible statistics snapshot
pub fn sample_statistics() -> CoinStatistics {
    CoinStatistics {
        market_cap: 1.3e12,
        volume_24h: 2.5e10,
        circulating_supply: 19_500_000.0,
        total_supply: 21_000_000.0,
        all_time_high: 69_045.0,
        all_time_high_date: "2021-11-10T14:24:11.849Z".to_string(),
        price_change_percent: PriceChangePercent {
            day: 1.5,
            week: -3.25,
            month: 10.0,
            year: 120.5,
        },
    }
}
