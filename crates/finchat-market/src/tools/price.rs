//! Tool for fetching stock price data

use async_trait::async_trait;
use finchat_tools::{Tool, ToolContent};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::api::web::raw_num;
use crate::api::{HistoryRange, YahooFinanceClient, YahooWebClient};
use crate::cache::{CacheKey, MarketCache};
use crate::error::Result;
use crate::tools::json_content;

/// Number of trailing closes included alongside the current quote
const RECENT_CLOSES: usize = 10;

/// Tool for fetching the current quote, recent closes and analyst targets
pub struct StockPriceTool {
    yahoo: YahooFinanceClient,
    web: YahooWebClient,
    cache: MarketCache,
}

#[derive(Debug, Deserialize)]
struct StockPriceParams {
    ticker: String,
}

impl StockPriceTool {
    /// Create a new stock price tool
    pub fn new(yahoo: YahooFinanceClient, web: YahooWebClient, cache: MarketCache) -> Self {
        Self { yahoo, web, cache }
    }

    async fn fetch(&self, params: StockPriceParams) -> Result<Value> {
        let ticker = params.ticker.trim().to_uppercase();
        let cache_key = CacheKey::new(&ticker, "price", json!({}));

        self.cache
            .get_or_fetch(cache_key, || async {
                let quote = self.yahoo.latest_quote(&ticker).await?;

                let recent_closes: Vec<Value> = self
                    .yahoo
                    .history(&ticker, HistoryRange::Month)
                    .await
                    .map(|bars| {
                        bars.iter()
                            .rev()
                            .take(RECENT_CLOSES)
                            .rev()
                            .map(|bar| {
                                json!({
                                    "date": bar.timestamp.date_naive().to_string(),
                                    "close": bar.close,
                                })
                            })
                            .collect()
                    })
                    .unwrap_or_default();

                // Analyst targets are best-effort; the quote is the answer.
                let targets = self
                    .web
                    .quote_summary(&ticker, &["financialData"])
                    .await
                    .ok()
                    .and_then(|summary| summary.get("financialData").cloned())
                    .map(|data| {
                        json!({
                            "current_price": raw_num(&data, "currentPrice"),
                            "target_mean_price": raw_num(&data, "targetMeanPrice"),
                            "target_high_price": raw_num(&data, "targetHighPrice"),
                            "target_low_price": raw_num(&data, "targetLowPrice"),
                            "recommendation": data.get("recommendationKey").cloned().unwrap_or(Value::Null),
                        })
                    })
                    .unwrap_or(Value::Null);

                Ok(json!({
                    "ticker": ticker,
                    "current_quote": {
                        "timestamp": quote.timestamp.to_rfc3339(),
                        "open": quote.open,
                        "high": quote.high,
                        "low": quote.low,
                        "close": quote.close,
                        "volume": quote.volume,
                        "adjusted_close": quote.adjclose,
                    },
                    "recent_closes": recent_closes,
                    "analyst_targets": targets,
                }))
            })
            .await
    }
}

#[async_trait]
impl Tool for StockPriceTool {
    async fn execute(&self, params: Value) -> finchat_tools::Result<Vec<ToolContent>> {
        let params: StockPriceParams = serde_json::from_value(params).map_err(|e| {
            finchat_tools::ToolError::ExecutionFailed(format!("Invalid parameters: {e}"))
        })?;

        let result = self.fetch(params).await?;
        Ok(json_content(&result))
    }

    fn name(&self) -> &'static str {
        "get_stock_price"
    }

    fn description(&self) -> &'static str {
        "Get the price of a stock: current OHLCV quote, recent closing prices and \
         analyst price targets for a ticker symbol."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "ticker": {
                    "type": "string",
                    "description": "Stock ticker symbol (e.g., 'AAPL')"
                }
            },
            "required": ["ticker"]
        })
    }
}
