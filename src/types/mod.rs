// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Strong types for market data
//!
//! - [`Symbol`](symbol::Symbol): normalized provider coin id
//! - [`Timeframe`](timeframe::Timeframe): lookback window for a price series
//! - [`PriceSeries`](series::PriceSeries): ordered price samples
//! - [`CoinStatistics`](stats::CoinStatistics): statistics snapshot for one coin
//! - [`CoinInfo`](coins::CoinInfo): entry of the static default-coin table

pub mod coins;
pub mod series;
pub mod stats;
pub mod symbol;
pub mod timeframe;
