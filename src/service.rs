// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Cache-fill orchestration
//!
//! [`MarketDataService`] sits between callers and a [`MarketDataSource`]. Every
//! lookup checks the shared [`ExpiringCache`] first and only goes upstream on a
//! miss. Successful results are stored with the configured TTL; failures pass
//! through unchanged and are never stored.
//!
//! # Cache keys
//!
//! | Lookup | Key |
//! |--------|-----|
//! | prices | `prices:{symbol}:{timeframe}` |
//! | statistics | `stats:{symbol}` |
//!
//! Symbols are normalized before the key is built, so `"BTC"` and `"btc"`
//! share an entry.
//!
//! Concurrent misses for the same key each go upstream; the last writer wins.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn, Instrument};

use crate::cache::{CacheStats, ExpiringCache, SweeperHandle};
use crate::config::{CoinchartConfig, ConfigError};
use crate::errors::{CoinchartError, MarketDataError, RenderError};
use crate::market::{CoinGeckoClient, MarketDataSource};
use crate::render::ChartRenderer;
use crate::spans;
use crate::types::{
    coins::{default_coins, CoinInfo},
    series::PriceSeries,
    stats::CoinStatistics,
    symbol::Symbol,
    timeframe::Timeframe,
};

/// Value stored in the shared cache
///
/// Prices and statistics share one cache and are told apart by key prefix.
#[derive(Debug, Clone)]
pub enum CachedMarketData {
    /// A price series
    Prices(PriceSeries),
    /// A statistics snapshot
    Statistics(CoinStatistics),
}

/// Caching front for a [`MarketDataSource`]
pub struct MarketDataService {
    source: Arc<dyn MarketDataSource>,
    cache: Arc<ExpiringCache<CachedMarketData>>,
    ttl: Duration,
    renderer: ChartRenderer,
    _sweeper: Option<SweeperHandle>,
}

impl std::fmt::Debug for MarketDataService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MarketDataService")
            .field("source", &self.source.name())
            .field("ttl", &self.ttl)
            .field("sweeper", &self._sweeper.is_some())
            .finish()
    }
}

impl MarketDataService {
    /// Create a service over an existing source and cache
    ///
    /// No sweeper is started; expired entries are dropped lazily on read or
    /// by whoever owns the cache.
    pub fn new(
        source: Arc<dyn MarketDataSource>,
        cache: Arc<ExpiringCache<CachedMarketData>>,
        ttl: Duration,
    ) -> Self {
        Self {
            source,
            cache,
            ttl,
            renderer: ChartRenderer::default(),
            _sweeper: None,
        }
    }

    /// Replace the chart renderer
    pub fn with_renderer(mut self, renderer: ChartRenderer) -> Self {
        self.renderer = renderer;
        self
    }

    /// Build the production stack: CoinGecko client, fresh cache, and a
    /// background sweeper if `config.sweep_interval` is set
    ///
    /// Must be called from within a Tokio runtime when the sweeper is enabled.
    pub fn from_config(config: &CoinchartConfig) -> Result<Self, ConfigError> {
        let client = CoinGeckoClient::new(config)?;
        let cache = Arc::new(ExpiringCache::new());
        let sweeper = config
            .sweep_interval
            .map(|interval| cache.spawn_sweeper(interval));

        Ok(Self {
            _sweeper: sweeper,
            ..Self::new(Arc::new(client), cache, config.cache_ttl)
        })
    }

    /// Price series for `symbol` over `timeframe`, from cache when fresh
    pub async fn get_prices(
        &self,
        symbol: impl Into<Symbol>,
        timeframe: Timeframe,
    ) -> Result<PriceSeries, MarketDataError> {
        let symbol = symbol.into();
        let span = spans::get_prices(&symbol, timeframe);

        async move {
            let key = prices_key(&symbol, timeframe);

            if let Some(CachedMarketData::Prices(series)) = self.cache.get(&key).await {
                debug!(key = %key, "Price cache hit");
                return Ok(series);
            }

            debug!(key = %key, source = self.source.name(), "Price cache miss, fetching");
            let series = self
                .source
                .fetch_price_series(&symbol, timeframe)
                .await
                .inspect_err(|e| warn!(error = %e, kind = %e.kind(), "Price fetch failed"))?;

            self.cache
                .set(key, CachedMarketData::Prices(series.clone()), self.ttl)
                .await;
            Ok(series)
        }
        .instrument(span)
        .await
    }

    /// Statistics snapshot for `symbol`, from cache when fresh
    pub async fn get_statistics(
        &self,
        symbol: impl Into<Symbol>,
    ) -> Result<CoinStatistics, MarketDataError> {
        let symbol = symbol.into();
        let span = spans::get_statistics(&symbol);

        async move {
            let key = stats_key(&symbol);

            if let Some(CachedMarketData::Statistics(stats)) = self.cache.get(&key).await {
                debug!(key = %key, "Statistics cache hit");
                return Ok(stats);
            }

            debug!(key = %key, source = self.source.name(), "Statistics cache miss, fetching");
            let stats = self
                .source
                .fetch_statistics(&symbol)
                .await
                .inspect_err(|e| warn!(error = %e, kind = %e.kind(), "Statistics fetch failed"))?;

            self.cache
                .set(key, CachedMarketData::Statistics(stats.clone()), self.ttl)
                .await;
            Ok(stats)
        }
        .instrument(span)
        .await
    }

    /// PNG chart of the last day of prices for `symbol`
    ///
    /// Uses the cached 1d series when available. Rasterization runs on the
    /// blocking pool.
    pub async fn get_chart(&self, symbol: impl Into<Symbol>) -> Result<Vec<u8>, CoinchartError> {
        let symbol = symbol.into();
        let span = spans::get_chart(&symbol);

        async move {
            let series = self.get_prices(symbol.clone(), Timeframe::Day1).await?;

            let renderer = self.renderer.clone();
            let png = tokio::task::spawn_blocking(move || renderer.render(&symbol, &series))
                .await
                .map_err(|e| RenderError::failed(format!("render task failed: {e}")))??;

            debug!(bytes = png.len(), "Chart rendered");
            Ok(png)
        }
        .instrument(span)
        .await
    }

    /// Coins offered by default; static, never fetched
    pub fn list_default_coins(&self) -> Vec<CoinInfo> {
        default_coins()
    }

    /// Shared cache handle
    pub fn cache(&self) -> &Arc<ExpiringCache<CachedMarketData>> {
        &self.cache
    }

    /// Cache counters
    pub async fn cache_stats(&self) -> CacheStats {
        self.cache.stats().await
    }

    /// TTL applied to every stored entry
    pub fn ttl(&self) -> Duration {
        self.ttl
    }
}

fn prices_key(symbol: &Symbol, timeframe: Timeframe) -> String {
    format!("prices:{symbol}:{timeframe}")
}

fn stats_key(symbol: &Symbol) -> String {
    format!("stats:{symbol}")
}
