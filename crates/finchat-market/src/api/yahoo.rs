//! Yahoo Finance quote and history client

use crate::error::{MarketError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use time::OffsetDateTime;
use yahoo_finance_api as yahoo;

/// A single OHLCV bar
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Quote {
    pub symbol: String,
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
    pub adjclose: f64,
}

/// Supported lookback ranges for history requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HistoryRange {
    Day,
    Week,
    Month,
    ThreeMonths,
    SixMonths,
    Year,
    TwoYears,
    FiveYears,
}

impl HistoryRange {
    /// Number of calendar days covered by the range
    pub fn days(self) -> i64 {
        match self {
            Self::Day => 1,
            Self::Week => 5,
            Self::Month => 30,
            Self::ThreeMonths => 90,
            Self::SixMonths => 180,
            Self::Year => 365,
            Self::TwoYears => 730,
            Self::FiveYears => 1825,
        }
    }

    /// The Yahoo range token (e.g., "1mo")
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Day => "1d",
            Self::Week => "5d",
            Self::Month => "1mo",
            Self::ThreeMonths => "3mo",
            Self::SixMonths => "6mo",
            Self::Year => "1y",
            Self::TwoYears => "2y",
            Self::FiveYears => "5y",
        }
    }
}

impl FromStr for HistoryRange {
    type Err = MarketError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "1d" => Ok(Self::Day),
            "5d" => Ok(Self::Week),
            "1mo" => Ok(Self::Month),
            "3mo" => Ok(Self::ThreeMonths),
            "6mo" => Ok(Self::SixMonths),
            "1y" => Ok(Self::Year),
            "2y" => Ok(Self::TwoYears),
            "5y" => Ok(Self::FiveYears),
            other => Err(MarketError::ConfigError(format!(
                "Unsupported history range: {other}"
            ))),
        }
    }
}

/// Client for quote and history lookups via the `yahoo_finance_api` crate
pub struct YahooFinanceClient {}

impl YahooFinanceClient {
    /// Create a new client
    pub fn new() -> Self {
        Self {}
    }

    fn connector() -> Result<yahoo::YahooConnector> {
        yahoo::YahooConnector::new().map_err(|e| MarketError::YahooError(e.to_string()))
    }

    fn convert(symbol: &str, q: &yahoo::Quote) -> Quote {
        Quote {
            symbol: symbol.to_string(),
            timestamp: DateTime::from_timestamp(q.timestamp as i64, 0).unwrap_or_else(Utc::now),
            open: q.open,
            high: q.high,
            low: q.low,
            close: q.close,
            volume: q.volume,
            adjclose: q.adjclose,
        }
    }

    /// Get the latest quote for a symbol
    pub async fn latest_quote(&self, symbol: &str) -> Result<Quote> {
        let provider = Self::connector()?;

        let response = provider
            .get_latest_quotes(symbol, "1d")
            .await
            .map_err(|e| MarketError::YahooError(e.to_string()))?;

        let quote = response
            .last_quote()
            .map_err(|e| MarketError::YahooError(e.to_string()))?;

        Ok(Self::convert(symbol, &quote))
    }

    /// Get historical daily bars over the given range, oldest first
    pub async fn history(&self, symbol: &str, range: HistoryRange) -> Result<Vec<Quote>> {
        let provider = Self::connector()?;

        let end = Utc::now();
        let start = end - chrono::Duration::days(range.days());

        let start_odt = OffsetDateTime::from_unix_timestamp(start.timestamp())
            .map_err(|e| MarketError::YahooError(format!("Invalid start timestamp: {e}")))?;
        let end_odt = OffsetDateTime::from_unix_timestamp(end.timestamp())
            .map_err(|e| MarketError::YahooError(format!("Invalid end timestamp: {e}")))?;

        let response = provider
            .get_quote_history(symbol, start_odt, end_odt)
            .await
            .map_err(|e| MarketError::YahooError(e.to_string()))?;

        let quotes = response
            .quotes()
            .map_err(|e| MarketError::YahooError(e.to_string()))?;

        if quotes.is_empty() {
            return Err(MarketError::DataUnavailable {
                symbol: symbol.to_string(),
                reason: format!("no bars returned for range {}", range.as_str()),
            });
        }

        Ok(quotes.iter().map(|q| Self::convert(symbol, q)).collect())
    }
}

impl Default for YahooFinanceClient {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for YahooFinanceClient {
    fn clone(&self) -> Self {
        Self::new()
    }
}
