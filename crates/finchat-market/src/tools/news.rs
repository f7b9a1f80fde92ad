//! Tool for fetching recent stock news

use async_trait::async_trait;
use chrono::DateTime;
use finchat_tools::{Tool, ToolContent};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::api::YahooWebClient;
use crate::cache::{CacheKey, MarketCache};
use crate::error::{MarketError, Result};
use crate::tools::json_content;

/// Hard cap on returned articles regardless of the requested count
const MAX_ARTICLES: usize = 20;

/// Tool for fetching recent news headlines for a ticker
pub struct StockNewsTool {
    web: YahooWebClient,
    cache: MarketCache,
}

#[derive(Debug, Deserialize)]
struct StockNewsParams {
    ticker: String,
    #[serde(default)]
    count: Option<usize>,
}

impl StockNewsTool {
    /// Create a new stock news tool
    pub fn new(web: YahooWebClient, cache: MarketCache) -> Self {
        Self { web, cache }
    }

    async fn fetch(&self, params: StockNewsParams) -> Result<Value> {
        let ticker = params.ticker.trim().to_uppercase();
        let count = params.count.unwrap_or(MAX_ARTICLES).min(MAX_ARTICLES);
        let cache_key = CacheKey::new(&ticker, "news", json!({ "count": count }));

        self.cache
            .get_or_fetch(cache_key, || async {
                let (_hits, news) = self.web.search(&ticker).await?;

                if news.is_empty() {
                    return Err(MarketError::DataUnavailable {
                        symbol: ticker.clone(),
                        reason: "no recent news found".to_string(),
                    });
                }

                let articles: Vec<Value> = news
                    .iter()
                    .take(count)
                    .map(|article| {
                        let published = article
                            .publish_time
                            .and_then(|ts| DateTime::from_timestamp(ts, 0))
                            .map(|dt| dt.to_rfc3339());
                        json!({
                            "title": article.title,
                            "publisher": article.publisher,
                            "published": published,
                            "link": article.link,
                        })
                    })
                    .collect();

                Ok(json!({
                    "ticker": ticker,
                    "article_count": articles.len(),
                    "articles": articles,
                }))
            })
            .await
    }
}

#[async_trait]
impl Tool for StockNewsTool {
    async fn execute(&self, params: Value) -> finchat_tools::Result<Vec<ToolContent>> {
        let params: StockNewsParams = serde_json::from_value(params).map_err(|e| {
            finchat_tools::ToolError::ExecutionFailed(format!("Invalid parameters: {e}"))
        })?;

        let result = self.fetch(params).await?;
        Ok(json_content(&result))
    }

    fn name(&self) -> &'static str {
        "get_stock_news"
    }

    fn description(&self) -> &'static str {
        "Get recent news headlines for a stock. Useful for gauging market sentiment \
         around a ticker."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "ticker": {
                    "type": "string",
                    "description": "Stock ticker symbol (e.g., 'AAPL')"
                },
                "count": {
                    "type": "number",
                    "description": "Maximum number of articles (default 20)"
                }
            },
            "required": ["ticker"]
        })
    }
}
