//! API clients for market data sources

pub mod web;
pub mod yahoo;

pub use web::{NewsArticle, SearchHit, YahooWebClient};
pub use yahoo::{HistoryRange, Quote, YahooFinanceClient};
