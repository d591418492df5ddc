// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Error types for the coinchart library.
//!
//! Errors follow the same split as the rest of the crate:
//!
//! - [`MarketDataError`] - failures talking to the market-data provider or
//!   decoding its responses. Returned by the client and passed through the
//!   service unchanged.
//! - [`RenderError`] - failures producing a chart image.
//! - [`CoinchartError`] - unified error for operations that touch both
//!   (currently only [`MarketDataService::get_chart`](crate::MarketDataService::get_chart)).
//!
//! The cache never fails and has no error type.
//!
//! Every error reports a stable [`ErrorKind`] so callers (the HTTP layer in
//! particular) can surface a machine-readable kind next to the message.
//!
//! # Example
//!
//! ```rust,ignore
//! use coinchart::{MarketDataError, Timeframe};
//!
//! match service.get_prices("bitcoin", Timeframe::Day1).await {
//!     Ok(series) => println!("{} samples", series.len()),
//!     Err(e) if e.is_retryable() => eprintln!("try again later: {e}"),
//!     Err(MarketDataError::NoData { symbol, .. }) => eprintln!("nothing for {symbol}"),
//!     Err(e) => eprintln!("{}: {e}", e.kind()),
//! }
//! ```

mod market;
mod render;

pub use market::MarketDataError;
pub use render::RenderError;

use std::fmt;

/// Machine-readable classification of every error the crate produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Network or transport failure reaching the provider.
    UpstreamUnavailable,
    /// Provider answered with a non-success HTTP status.
    UpstreamBadStatus,
    /// Provider body was not the JSON we expected.
    MalformedResponse,
    /// Provider payload lacks a required section.
    MissingSection,
    /// Provider returned a valid but empty price series.
    NoData,
    /// Renderer was handed an empty series.
    EmptySeries,
    /// Renderer failed to rasterize or encode the image.
    RenderFailed,
}

impl ErrorKind {
    /// Stable identifier, used in HTTP error bodies and logs.
    pub const fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::UpstreamUnavailable => "upstream_unavailable",
            ErrorKind::UpstreamBadStatus => "upstream_bad_status",
            ErrorKind::MalformedResponse => "malformed_response",
            ErrorKind::MissingSection => "missing_section",
            ErrorKind::NoData => "no_data",
            ErrorKind::EmptySeries => "empty_series",
            ErrorKind::RenderFailed => "render_failed",
        }
    }

    /// Whether a caller may reasonably retry the same request later.
    ///
    /// Only provider availability problems qualify. Schema mismatches need a
    /// provider-side fix and empty data will stay empty.
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            ErrorKind::UpstreamUnavailable | ErrorKind::UpstreamBadStatus
        )
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unified error type for coinchart operations.
///
/// Both module-specific errors convert into it via `From`, so `?` works in
/// functions that fetch and render.
#[derive(Debug, thiserror::Error)]
pub enum CoinchartError {
    /// Error from the market-data client.
    #[error("Market data error: {0}")]
    MarketData(#[from] MarketDataError),

    /// Error from the chart renderer.
    #[error("Render error: {0}")]
    Render(#[from] RenderError),
}

impl CoinchartError {
    /// Classification of the underlying error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            CoinchartError::MarketData(e) => e.kind(),
            CoinchartError::Render(e) => e.kind(),
        }
    }

    /// Whether the failed operation may succeed if retried later.
    pub fn is_retryable(&self) -> bool {
        self.kind().is_retryable()
    }
}
