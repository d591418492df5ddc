// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Market data retrieval
//!
//! This module defines the [`MarketDataSource`] trait, the seam between the
//! caching service and whatever actually answers market-data queries.
//! [`CoinGeckoClient`] is the production implementation; tests plug in mocks.
//!
//! # Responsibilities of an implementation
//!
//! 1. Issue exactly one upstream request per call
//! 2. Decode the response into [`PriceSeries`] or [`CoinStatistics`]
//! 3. Classify every failure as a [`MarketDataError`]
//!
//! Implementations never cache; [`MarketDataService`](crate::MarketDataService)
//! does that.
//!
//! # Example: a fixed-price source
//!
//! ```rust,ignore
//! use async_trait::async_trait;
//! use coinchart::{CoinStatistics, MarketDataError, MarketDataSource, PriceSeries, Symbol, Timeframe};
//!
//! struct Flat(f64);
//!
//! #[async_trait]
//! impl MarketDataSource for Flat {
//!     async fn fetch_price_series(&self, _: &Symbol, _: Timeframe) -> Result<PriceSeries, MarketDataError> {
//!         Ok(PriceSeries::from(vec![self.0; 24]))
//!     }
//!
//!     async fn fetch_statistics(&self, _: &Symbol) -> Result<CoinStatistics, MarketDataError> {
//!         Ok(CoinStatistics::default())
//!     }
//! }
//! ```

use async_trait::async_trait;

use crate::errors::MarketDataError;
use crate::types::{
    series::PriceSeries, stats::CoinStatistics, symbol::Symbol, timeframe::Timeframe,
};

mod coingecko;
pub(crate) mod decode;

pub use coingecko::CoinGeckoClient;

/// Source of market data for the caching service
///
/// Object-safe, so the service holds it as `Arc<dyn MarketDataSource>`.
#[async_trait]
pub trait MarketDataSource: Send + Sync {
    /// Fetch the price series for `symbol` over `timeframe`
    ///
    /// # Errors
    ///
    /// - [`MarketDataError::UpstreamUnavailable`] on transport failure
    /// - [`MarketDataError::UpstreamBadStatus`] on a non-success status
    /// - [`MarketDataError::MalformedResponse`] if the body does not parse
    /// - [`MarketDataError::NoData`] if the series is empty
    async fn fetch_price_series(
        &self,
        symbol: &Symbol,
        timeframe: Timeframe,
    ) -> Result<PriceSeries, MarketDataError>;

    /// Fetch the statistics snapshot for `symbol`
    ///
    /// # Errors
    ///
    /// Same taxonomy as [`fetch_price_series`](Self::fetch_price_series), plus
    /// [`MarketDataError::MissingSection`] when the payload has no market-data
    /// section.
    async fn fetch_statistics(&self, symbol: &Symbol) -> Result<CoinStatistics, MarketDataError>;

    /// Short name for logs
    fn name(&self) -> &'static str {
        "MarketDataSource"
    }
}
