//! Configuration for coinchart
//!
//! Controls where upstream requests go, how long they may take, and how long
//! their results stay cached.
//!
//! # Example: Using defaults
//!
//! ```rust
//! use coinchart::CoinchartConfig;
//! use std::time::Duration;
//!
//! let config = CoinchartConfig::default();
//! assert_eq!(config.cache_ttl, Duration::from_secs(300));
//! assert_eq!(config.request_timeout, Duration::from_secs(10));
//! ```
//!
//! # Example: Custom configuration
//!
//! ```rust
//! use coinchart::CoinchartConfigBuilder;
//! use std::time::Duration;
//!
//! let config = CoinchartConfigBuilder::with_defaults()
//!     .base_url("http://127.0.0.1:9000/api/v3")
//!     .cache_ttl(Duration::from_secs(30))
//!     .no_sweeper()
//!     .build();
//!
//! assert!(config.sweep_interval.is_none());
//! ```

use std::time::Duration;

pub mod constants;

use constants::env;

/// Errors from reading configuration out of the environment
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A variable was set to something that does not parse
    #[error("Invalid value for {name}: {value:?} ({reason})")]
    InvalidValue {
        /// Variable name
        name: &'static str,
        /// Raw value found
        value: String,
        /// Why it was rejected
        reason: String,
    },

    /// The provider base URL does not parse or cannot carry a path
    #[error("Invalid base URL {url:?}")]
    InvalidBaseUrl {
        /// URL as configured
        url: String,
        /// Parse failure, if the URL did not parse at all
        #[source]
        source: Option<url::ParseError>,
    },

    /// The HTTP client could not be constructed
    #[error("Failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

/// Configuration for the market-data client and cache
#[derive(Debug, Clone)]
pub struct CoinchartConfig {
    /// Root of the provider API, without trailing slash
    /// Default: `https://api.coingecko.com/api/v3`
    pub base_url: String,

    /// Optional provider API key, sent as `x-cg-demo-api-key`
    pub api_key: Option<String>,

    /// Timeout for a single upstream request
    /// Default: 10 seconds
    pub request_timeout: Duration,

    /// How long fetched prices and statistics are cached
    /// Default: 5 minutes
    pub cache_ttl: Duration,

    /// Period of the background sweep of expired entries, `None` disables it
    /// Default: 60 seconds
    pub sweep_interval: Option<Duration>,

    /// User agent sent upstream
    pub user_agent: String,
}

impl Default for CoinchartConfig {
    fn default() -> Self {
        Self {
            base_url: constants::COINGECKO_BASE_URL.to_string(),
            api_key: None,
            request_timeout: constants::REQUEST_TIMEOUT,
            cache_ttl: constants::CACHE_TTL,
            sweep_interval: Some(constants::SWEEP_INTERVAL),
            user_agent: format!("coinchart/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl CoinchartConfig {
    /// Build a configuration from process environment variables
    ///
    /// Loads `.env` first if present. Unset variables keep their defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| dotenvy::var(name).ok())
    }

    /// Build a configuration from an arbitrary variable lookup
    ///
    /// # Example
    ///
    /// ```rust
    /// use coinchart::CoinchartConfig;
    /// use std::time::Duration;
    ///
    /// let config = CoinchartConfig::from_lookup(|name| match name {
    ///     "COINCHART_CACHE_TTL_SECS" => Some("60".to_string()),
    ///     "COINCHART_SWEEP_INTERVAL_SECS" => Some("0".to_string()),
    ///     _ => None,
    /// })
    /// .unwrap();
    ///
    /// assert_eq!(config.cache_ttl, Duration::from_secs(60));
    /// assert!(config.sweep_interval.is_none());
    /// ```
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut builder = CoinchartConfigBuilder::with_defaults();

        if let Some(url) = lookup(env::BASE_URL).filter(|v| !v.trim().is_empty()) {
            builder = builder.base_url(url.trim());
        }
        if let Some(key) = lookup(env::API_KEY).filter(|v| !v.trim().is_empty()) {
            builder = builder.api_key(key.trim());
        }
        if let Some(secs) = parse_secs(&lookup, env::CACHE_TTL_SECS)? {
            builder = builder.cache_ttl(Duration::from_secs(secs));
        }
        if let Some(secs) = parse_secs(&lookup, env::REQUEST_TIMEOUT_SECS)? {
            if secs == 0 {
                return Err(ConfigError::InvalidValue {
                    name: env::REQUEST_TIMEOUT_SECS,
                    value: secs.to_string(),
                    reason: "timeout must be positive".to_string(),
                });
            }
            builder = builder.request_timeout(Duration::from_secs(secs));
        }
        match parse_secs(&lookup, env::SWEEP_INTERVAL_SECS)? {
            Some(0) => builder = builder.no_sweeper(),
            Some(secs) => builder = builder.sweep_interval(Duration::from_secs(secs)),
            None => {}
        }

        Ok(builder.build())
    }
}

fn parse_secs<F>(lookup: &F, name: &'static str) -> Result<Option<u64>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(name) else {
        return Ok(None);
    };
    raw.trim()
        .parse::<u64>()
        .map(Some)
        .map_err(|e| ConfigError::InvalidValue {
            name,
            value: raw,
            reason: e.to_string(),
        })
}

/// Builder for [`CoinchartConfig`]
#[derive(Debug, Clone)]
pub struct CoinchartConfigBuilder {
    config: CoinchartConfig,
}

impl CoinchartConfigBuilder {
    /// Start from the defaults
    pub fn with_defaults() -> Self {
        Self {
            config: CoinchartConfig::default(),
        }
    }

    /// Set the provider API root; a trailing slash is dropped
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        let url: String = url.into();
        self.config.base_url = url.trim_end_matches('/').to_string();
        self
    }

    /// Set the provider API key
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.config.api_key = Some(key.into());
        self
    }

    /// Set the upstream request timeout
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.config.request_timeout = timeout;
        self
    }

    /// Set how long fetched data stays cached
    pub fn cache_ttl(mut self, ttl: Duration) -> Self {
        self.config.cache_ttl = ttl;
        self
    }

    /// Set the sweep period
    pub fn sweep_interval(mut self, interval: Duration) -> Self {
        self.config.sweep_interval = Some(interval);
        self
    }

    /// Disable the background sweep; expired entries go on the next read
    pub fn no_sweeper(mut self) -> Self {
        self.config.sweep_interval = None;
        self
    }

    /// Set the user agent
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = user_agent.into();
        self
    }

    /// Finish building
    pub fn build(self) -> CoinchartConfig {
        self.config
    }
}

impl Default for CoinchartConfigBuilder {
    fn default() -> Self {
        Self::with_defaults()
    }
}
