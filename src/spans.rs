//! Span creation helpers for coinchart operations.
//!
//! Telemetry stays out of business logic: instead of `#[instrument]`
//! attributes, each instrumented operation has a matching helper here.
//!
//! Usage pattern:
//! ```rust,ignore
//! pub async fn my_operation(&self, symbol: &Symbol) -> Result<T, E> {
//!     let span = spans::my_operation(symbol);
//!     async move {
//!         // Business logic here
//!     }
//!     .instrument(span)
//!     .await
//! }
//! ```

use tracing::{Level, Span};

use crate::types::{symbol::Symbol, timeframe::Timeframe};

/// Span for a cached price-series lookup.
///
/// Parent: get_chart span or None
/// Children: fetch_price_series span on a cache miss
#[inline]
pub(crate) fn get_prices(symbol: &Symbol, timeframe: Timeframe) -> Span {
    tracing::span!(
        Level::INFO,
        "coinchart.get_prices",
        symbol = %symbol,
        timeframe = %timeframe,
    )
}

/// Span for a cached statistics lookup.
///
/// Parent: None (root span for this operation)
/// Children: fetch_statistics span on a cache miss
#[inline]
pub(crate) fn get_statistics(symbol: &Symbol) -> Span {
    tracing::span!(Level::INFO, "coinchart.get_statistics", symbol = %symbol)
}

/// Span for producing a chart image.
///
/// Parent: None (root span for this operation)
/// Children: get_prices span
#[inline]
pub(crate) fn get_chart(symbol: &Symbol) -> Span {
    tracing::span!(Level::INFO, "coinchart.get_chart", symbol = %symbol)
}

/// Span for one upstream price-series request.
#[inline]
pub(crate) fn fetch_price_series(symbol: &Symbol, timeframe: Timeframe) -> Span {
    tracing::debug_span!(
        "coinchart.fetch_price_series",
        symbol = %symbol,
        days = timeframe.days_param(),
    )
}

/// Span for one upstream coin-detail request.
#[inline]
pub(crate) fn fetch_statistics(symbol: &Symbol) -> Span {
    tracing::debug_span!("coinchart.fetch_statistics", symbol = %symbol)
}

/// Span for rasterizing and encoding one chart.
#[inline]
pub(crate) fn render_chart(symbol: &Symbol, samples: usize) -> Span {
    tracing::debug_span!("coinchart.render_chart", symbol = %symbol, samples = samples)
}
