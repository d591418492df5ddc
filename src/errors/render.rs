//! Error types for chart rendering.

use super::ErrorKind;

/// Errors that can occur while rendering a price chart.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// The series had no samples to draw.
    #[error("Cannot render chart for {symbol}: price series is empty")]
    EmptySeries {
        /// Symbol the chart was requested for
        symbol: String,
    },

    /// The canvas could not be allocated or the image could not be encoded.
    #[error("Failed to render chart: {details}")]
    Failed {
        /// Details about the failure
        details: String,
    },
}

impl RenderError {
    /// Create a `Failed` error with details.
    pub fn failed(details: impl Into<String>) -> Self {
        RenderError::Failed {
            details: details.into(),
        }
    }

    /// Classification of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            RenderError::EmptySeries { .. } => ErrorKind::EmptySeries,
            RenderError::Failed { .. } => ErrorKind::RenderFailed,
        }
    }
}
