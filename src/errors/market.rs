//! Error types for market-data retrieval.
//!
//! These are raised by [`MarketDataSource`](crate::MarketDataSource)
//! implementations and propagated unchanged by
//! [`MarketDataService`](crate::MarketDataService). Failures are never cached.

use super::ErrorKind;

/// Errors that can occur while fetching or decoding provider data.
#[derive(Debug, thiserror::Error)]
pub enum MarketDataError {
    /// The provider could not be reached.
    ///
    /// Covers connection failures, timeouts and errors while reading the
    /// response body. Retryable by the caller.
    #[error("Upstream unavailable during {operation}")]
    UpstreamUnavailable {
        /// What was being requested (e.g. "market_chart bitcoin 7d")
        operation: String,
        /// The underlying transport error
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The provider answered with a non-success HTTP status.
    #[error("Upstream error during {operation}: {status} {reason}")]
    UpstreamBadStatus {
        /// What was being requested
        operation: String,
        /// HTTP status code
        status: u16,
        /// Status text reported for the code (e.g. "Not Found")
        reason: String,
    },

    /// The response body was not valid JSON of the expected shape.
    #[error("Malformed response during {operation}")]
    MalformedResponse {
        /// What was being requested
        operation: String,
        /// The decode error
        #[source]
        source: serde_json::Error,
    },

    /// The payload parsed but lacks a section the operation depends on.
    #[error("Response for {operation} is missing the `{section}` section")]
    MissingSection {
        /// What was being requested
        operation: String,
        /// Name of the absent section
        section: &'static str,
    },

    /// The provider returned an empty price series.
    #[error("No price data available for {symbol} ({timeframe})")]
    NoData {
        /// Normalized symbol
        symbol: String,
        /// Timeframe label
        timeframe: String,
    },
}

impl MarketDataError {
    /// Create an `UpstreamUnavailable` error from any transport error.
    pub fn unavailable(
        operation: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        MarketDataError::UpstreamUnavailable {
            operation: operation.into(),
            source: Box::new(source),
        }
    }

    /// Create an `UpstreamBadStatus` error.
    pub fn bad_status(operation: impl Into<String>, status: u16, reason: impl Into<String>) -> Self {
        MarketDataError::UpstreamBadStatus {
            operation: operation.into(),
            status,
            reason: reason.into(),
        }
    }

    /// Create a `MalformedResponse` error.
    pub fn malformed(operation: impl Into<String>, source: serde_json::Error) -> Self {
        MarketDataError::MalformedResponse {
            operation: operation.into(),
            source,
        }
    }

    /// Create a `MissingSection` error.
    pub fn missing_section(operation: impl Into<String>, section: &'static str) -> Self {
        MarketDataError::MissingSection {
            operation: operation.into(),
            section,
        }
    }

    /// Create a `NoData` error.
    pub fn no_data(symbol: impl Into<String>, timeframe: impl Into<String>) -> Self {
        MarketDataError::NoData {
            symbol: symbol.into(),
            timeframe: timeframe.into(),
        }
    }

    /// Classification of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            MarketDataError::UpstreamUnavailable { .. } => ErrorKind::UpstreamUnavailable,
            MarketDataError::UpstreamBadStatus { .. } => ErrorKind::UpstreamBadStatus,
            MarketDataError::MalformedResponse { .. } => ErrorKind::MalformedResponse,
            MarketDataError::MissingSection { .. } => ErrorKind::MissingSection,
            MarketDataError::NoData { .. } => ErrorKind::NoData,
        }
    }

    /// Whether the request may succeed if retried later.
    pub fn is_retryable(&self) -> bool {
        self.kind().is_retryable()
    }
}
