//! Defaults and well-known values
//!
//! Centralizes the magic constants used across the crate.

use std::time::Duration;

/// Public CoinGecko v3 API root
pub const COINGECKO_BASE_URL: &str = "https://api.coingecko.com/api/v3";

/// Header carrying a CoinGecko demo API key
pub const COINGECKO_API_KEY_HEADER: &str = "x-cg-demo-api-key";

/// Quote currency for every upstream request
pub const VS_CURRENCY: &str = "usd";

/// How long fetched prices and statistics are served from cache
pub const CACHE_TTL: Duration = Duration::from_secs(5 * 60);

/// Upper bound on a single upstream request
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Period of the background purge of expired cache entries
pub const SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// Port the HTTP binary listens on when `COINCHART_PORT` is unset
pub const DEFAULT_PORT: u16 = 8080;

/// Environment variable names read by [`CoinchartConfig::from_env`](super::CoinchartConfig::from_env)
pub mod env {
    pub const BASE_URL: &str = "COINGECKO_BASE_URL";
    pub const API_KEY: &str = "COINGECKO_API_KEY";
    pub const CACHE_TTL_SECS: &str = "COINCHART_CACHE_TTL_SECS";
    pub const REQUEST_TIMEOUT_SECS: &str = "COINCHART_REQUEST_TIMEOUT_SECS";
    /// `0` disables the sweeper
    pub const SWEEP_INTERVAL_SECS: &str = "COINCHART_SWEEP_INTERVAL_SECS";
    pub const PORT: &str = "COINCHART_PORT";
}
