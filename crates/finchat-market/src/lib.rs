//! Market-data layer for finchat
//!
//! Wraps Yahoo Finance (the `yahoo_finance_api` crate for quotes and
//! history, the public web endpoints for search, company profiles, key
//! statistics and news) behind the [`finchat_tools::Tool`] trait. Every tool
//! is a straight-line fetch-and-shape; the orchestration complexity lives in
//! `finchat-runtime`.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod tools;

pub use cache::{CacheKey, MarketCache};
pub use config::MarketConfig;
pub use error::{MarketError, Result};
pub use tools::register_market_tools;
