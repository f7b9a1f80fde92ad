//! Client for Yahoo's public web endpoints
//!
//! The `yahoo_finance_api` crate covers quotes and history but not symbol
//! search, company profiles, key statistics or news. Those come from the
//! query2 web endpoints, rate-limited and retried with exponential backoff
//! because Yahoo throttles unauthenticated callers aggressively.

use crate::config::MarketConfig;
use crate::error::{MarketError, Result};
use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::num::NonZeroU32;
use std::sync::Arc;
use tracing::{debug, warn};

type SharedRateLimiter = Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>;

const SEARCH_URL: &str = "https://query2.finance.yahoo.com/v1/finance/search";
const QUOTE_SUMMARY_URL: &str = "https://query2.finance.yahoo.com/v10/finance/quoteSummary";
const USER_AGENT: &str = "Mozilla/5.0 (compatible; finchat/0.1)";

/// A symbol candidate returned by search
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchHit {
    /// Ticker symbol
    pub symbol: String,
    /// Short display name
    #[serde(rename = "shortname", default)]
    pub short_name: Option<String>,
    /// Long display name
    #[serde(rename = "longname", default)]
    pub long_name: Option<String>,
    /// Exchange code
    #[serde(rename = "exchange", default)]
    pub exchange: Option<String>,
    /// Quote type (EQUITY, ETF, ...)
    #[serde(rename = "quoteType", default)]
    pub quote_type: Option<String>,
}

/// A news article returned by search
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsArticle {
    /// Headline
    pub title: String,
    /// Publishing outlet
    #[serde(default)]
    pub publisher: Option<String>,
    /// Publish time (UNIX timestamp)
    #[serde(rename = "providerPublishTime", default)]
    pub publish_time: Option<i64>,
    /// Article URL
    #[serde(default)]
    pub link: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    quotes: Vec<SearchHit>,
    #[serde(default)]
    news: Vec<NewsArticle>,
}

/// Rate-limited client for the Yahoo web endpoints
pub struct YahooWebClient {
    client: Client,
    config: Arc<MarketConfig>,
    rate_limiter: SharedRateLimiter,
}

impl YahooWebClient {
    /// Create a new client with the given configuration
    pub fn new(config: Arc<MarketConfig>) -> Self {
        let per_minute = NonZeroU32::new(config.web_rate_limit_per_minute)
            .unwrap_or_else(|| NonZeroU32::new(30).expect("30 is non-zero"));
        let rate_limiter = Arc::new(RateLimiter::direct(Quota::per_minute(per_minute)));

        Self {
            client: Client::new(),
            config,
            rate_limiter,
        }
    }

    /// Search for symbols and news matching a free-text query
    pub async fn search(&self, query: &str) -> Result<(Vec<SearchHit>, Vec<NewsArticle>)> {
        let body = self
            .get_with_backoff(SEARCH_URL, &[("q", query), ("lang", "en")])
            .await?;

        let response: SearchResponse = serde_json::from_value(body)?;
        debug!(
            query,
            hits = response.quotes.len(),
            news = response.news.len(),
            "Yahoo search completed"
        );

        Ok((response.quotes, response.news))
    }

    /// Fetch quoteSummary modules for a symbol
    ///
    /// Returns the first result object with one key per requested module
    /// (e.g., "defaultKeyStatistics", "financialData", "assetProfile").
    pub async fn quote_summary(&self, symbol: &str, modules: &[&str]) -> Result<Value> {
        let url = format!("{QUOTE_SUMMARY_URL}/{symbol}");
        let modules_param = modules.join(",");
        let body = self
            .get_with_backoff(&url, &[("modules", modules_param.as_str())])
            .await?;

        body.pointer("/quoteSummary/result/0")
            .cloned()
            .ok_or_else(|| MarketError::DataUnavailable {
                symbol: symbol.to_string(),
                reason: format!("quoteSummary returned no result for modules {modules_param}"),
            })
    }

    /// GET a JSON document, retrying with exponential backoff on HTTP 429
    async fn get_with_backoff(&self, url: &str, query: &[(&str, &str)]) -> Result<Value> {
        for attempt in 0..self.config.max_retries {
            self.rate_limiter.until_ready().await;

            let response = self
                .client
                .get(url)
                .query(query)
                .header("User-Agent", USER_AGENT)
                .timeout(self.config.request_timeout)
                .send()
                .await?;

            let status = response.status();
            if status.is_success() {
                return Ok(response.json::<Value>().await?);
            }

            if status.as_u16() == 429 {
                let backoff = self.config.retry_backoff(attempt);
                warn!(url, attempt, ?backoff, "Rate-limited by Yahoo, backing off");
                tokio::time::sleep(backoff).await;
                continue;
            }

            let message = response.text().await.unwrap_or_default();
            return Err(MarketError::ApiError(format!("HTTP {status}: {message}")));
        }

        Err(MarketError::RateLimited {
            endpoint: url.to_string(),
        })
    }
}

impl Clone for YahooWebClient {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            config: Arc::clone(&self.config),
            rate_limiter: Arc::clone(&self.rate_limiter),
        }
    }
}

/// Read a numeric field that Yahoo wraps as `{"raw": 1.23, "fmt": "1.23"}`
///
/// Falls back to a bare number when the wrapper is absent.
pub fn raw_num(obj: &Value, key: &str) -> Option<f64> {
    let field = obj.get(key)?;
    field
        .get("raw")
        .and_then(Value::as_f64)
        .or_else(|| field.as_f64())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_search_response_parsing() {
        let body = json!({
            "quotes": [
                {"symbol": "AAPL", "shortname": "Apple Inc.", "exchange": "NMS", "quoteType": "EQUITY"}
            ],
            "news": [
                {"title": "Apple ships", "publisher": "Newswire", "providerPublishTime": 1700000000}
            ]
        });

        let parsed: SearchResponse = serde_json::from_value(body).unwrap();
        assert_eq!(parsed.quotes[0].symbol, "AAPL");
        assert_eq!(parsed.quotes[0].short_name.as_deref(), Some("Apple Inc."));
        assert_eq!(parsed.news[0].title, "Apple ships");
    }

    #[test]
    fn test_search_response_missing_sections() {
        let parsed: SearchResponse = serde_json::from_value(json!({})).unwrap();
        assert!(parsed.quotes.is_empty());
        assert!(parsed.news.is_empty());
    }

    #[test]
    fn test_raw_num() {
        let obj = json!({
            "trailingPE": {"raw": 28.4, "fmt": "28.40"},
            "beta": 1.2,
            "missing": {"fmt": "n/a"}
        });

        assert_eq!(raw_num(&obj, "trailingPE"), Some(28.4));
        assert_eq!(raw_num(&obj, "beta"), Some(1.2));
        assert_eq!(raw_num(&obj, "missing"), None);
        assert_eq!(raw_num(&obj, "absent"), None);
    }

    #[tokio::test]
    #[ignore] // Requires network access
    async fn test_search_live() {
        let client = YahooWebClient::new(Arc::new(MarketConfig::default()));
        let (hits, _news) = client.search("Apple Inc").await.unwrap();
        assert!(hits.iter().any(|h| h.symbol == "AAPL"));
    }
}
