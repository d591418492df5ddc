//! Cached cryptocurrency market data and price charts
//!
//! `coinchart` fetches price series and market statistics from CoinGecko,
//! keeps them in a TTL cache, and renders price charts as PNG.
//!
//! - [`MarketDataService`] is the entry point: cached lookups plus charting
//! - [`MarketDataSource`] abstracts the provider; [`CoinGeckoClient`] is the
//!   production implementation
//! - [`ExpiringCache`] is the in-memory TTL store the service fills
//! - [`ChartRenderer`] turns a series into PNG bytes
//!
//! ```rust,no_run
//! use coinchart::{CoinchartConfig, MarketDataService, Timeframe};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let service = MarketDataService::from_config(&CoinchartConfig::default())?;
//! let prices = service.get_prices("bitcoin", Timeframe::Week1).await?;
//! let png = service.get_chart("bitcoin").await?;
//! println!("{} samples, {} byte chart", prices.len(), png.len());
//! # Ok(())
//! # }
//! ```

pub mod bootstrap;
pub mod cache;
pub mod config;
pub mod errors;
pub mod market;
pub mod render;
pub mod service;
mod spans;
pub mod types;

pub use cache::{CacheStats, ExpiringCache, SweeperHandle};
pub use config::{CoinchartConfig, CoinchartConfigBuilder, ConfigError};
pub use errors::{CoinchartError, ErrorKind, MarketDataError, RenderError};
pub use market::{CoinGeckoClient, MarketDataSource};
pub use render::{ChartRenderer, ChartStyle};
pub use service::{CachedMarketData, MarketDataService};
pub use types::{
    coins::{default_coins, CoinInfo, DEFAULT_COIN_IDS},
    series::PriceSeries,
    stats::{CoinStatistics, PriceChangePercent},
    symbol::Symbol,
    timeframe::Timeframe,
};
