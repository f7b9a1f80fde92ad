//! Tool for fetching fundamental valuation metrics

use async_trait::async_trait;
use finchat_tools::{Tool, ToolContent};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::api::YahooWebClient;
use crate::api::web::raw_num;
use crate::cache::{CacheKey, MarketCache};
use crate::error::Result;
use crate::tools::json_content;

/// Tool for fetching PE, EPS, ROE, ROA, P/B and P/S of a stock
pub struct FundamentalsTool {
    web: YahooWebClient,
    cache: MarketCache,
}

#[derive(Debug, Deserialize)]
struct FundamentalsParams {
    ticker: String,
}

impl FundamentalsTool {
    /// Create a new fundamentals tool
    pub fn new(web: YahooWebClient, cache: MarketCache) -> Self {
        Self { web, cache }
    }

    async fn fetch(&self, params: FundamentalsParams) -> Result<Value> {
        let ticker = params.ticker.trim().to_uppercase();
        let cache_key = CacheKey::new(&ticker, "fundamentals", json!({}));

        self.cache
            .get_or_fetch(cache_key, || async {
                let summary = self
                    .web
                    .quote_summary(
                        &ticker,
                        &["defaultKeyStatistics", "financialData", "summaryDetail"],
                    )
                    .await?;

                let stats = summary.get("defaultKeyStatistics").cloned().unwrap_or(Value::Null);
                let financial = summary.get("financialData").cloned().unwrap_or(Value::Null);
                let detail = summary.get("summaryDetail").cloned().unwrap_or(Value::Null);

                // Missing fields stay null rather than failing the call;
                // small caps routinely lack several of these.
                Ok(json!({
                    "ticker": ticker,
                    "pe": raw_num(&detail, "trailingPE"),
                    "eps": raw_num(&stats, "trailingEps"),
                    "roe": raw_num(&financial, "returnOnEquity"),
                    "roa": raw_num(&financial, "returnOnAssets"),
                    "pb": raw_num(&stats, "priceToBook"),
                    "ps": raw_num(&detail, "priceToSalesTrailing12Months"),
                }))
            })
            .await
    }
}

#[async_trait]
impl Tool for FundamentalsTool {
    async fn execute(&self, params: Value) -> finchat_tools::Result<Vec<ToolContent>> {
        let params: FundamentalsParams = serde_json::from_value(params).map_err(|e| {
            finchat_tools::ToolError::ExecutionFailed(format!("Invalid parameters: {e}"))
        })?;

        let result = self.fetch(params).await?;
        Ok(json_content(&result))
    }

    fn name(&self) -> &'static str {
        "get_stock_fundamental_details"
    }

    fn description(&self) -> &'static str {
        "Get the fundamental details of a stock: trailing P/E, EPS, return on equity, \
         return on assets, price-to-book and price-to-sales ratios."
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
