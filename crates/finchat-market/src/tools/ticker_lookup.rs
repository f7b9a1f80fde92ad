//! Tool for resolving a company name to a ticker symbol

use async_trait::async_trait;
use finchat_tools::{Tool, ToolContent};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::debug;

use crate::api::YahooWebClient;
use crate::cache::{CacheKey, MarketCache};
use crate::error::{MarketError, Result};
use crate::tools::json_content;

/// Tool that resolves a free-text company name to a ticker and profile
///
/// The planner is instructed to call this first whenever a question names a
/// company instead of a symbol; the resolved ticker then feeds the
/// ticker-keyed tools in later rounds.
pub struct TickerLookupTool {
    web: YahooWebClient,
    cache: MarketCache,
}

#[derive(Debug, Deserialize)]
struct TickerLookupParams {
    name: String,
}

impl TickerLookupTool {
    /// Create a new ticker lookup tool
    pub fn new(web: YahooWebClient, cache: MarketCache) -> Self {
        Self { web, cache }
    }

    async fn lookup(&self, params: TickerLookupParams) -> Result<Value> {
        let name = params.name.trim().to_string();
        if name.is_empty() {
            return Err(MarketError::InvalidSymbol(
                "company name must not be empty".to_string(),
            ));
        }

        let cache_key = CacheKey::new(&name, "ticker_lookup", json!({}));

        self.cache
            .get_or_fetch(cache_key, || async {
                let (hits, _news) = self.web.search(&name).await?;
                let top = hits.first().ok_or_else(|| MarketError::DataUnavailable {
                    symbol: name.clone(),
                    reason: "no tickers found".to_string(),
                })?;

                debug!(name = %name, symbol = %top.symbol, "Resolved company name");

                // Profile enrichment is best-effort; the symbol alone already
                // answers the lookup.
                let profile = self
                    .web
                    .quote_summary(&top.symbol, &["assetProfile"])
                    .await
                    .ok()
                    .and_then(|summary| summary.get("assetProfile").cloned())
                    .unwrap_or(Value::Null);

                Ok(json!({
                    "symbol": top.symbol,
                    "short_name": top.short_name,
                    "long_name": top.long_name,
                    "exchange": top.exchange,
                    "sector": profile.get("sector").cloned().unwrap_or(Value::Null),
                    "industry": profile.get("industry").cloned().unwrap_or(Value::Null),
                    "website": profile.get("website").cloned().unwrap_or(Value::Null),
                }))
            })
            .await
    }
}

#[async_trait]
impl Tool for TickerLookupTool {
    async fn execute(&self, params: Value) -> finchat_tools::Result<Vec<ToolContent>> {
        let params: TickerLookupParams = serde_json::from_value(params).map_err(|e| {
            finchat_tools::ToolError::ExecutionFailed(format!("Invalid parameters: {e}"))
        })?;

        let result = self.lookup(params).await?;
        Ok(json_content(&result))
    }

    fn name(&self) -> &'static str {
        "get_ticker_from_name"
    }

    fn description(&self) -> &'static str {
        "Get the ticker symbol from the name of a stock. Use this first when the user \
         mentions a company by name and no ticker is known yet."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "name": {
                    "type": "string",
                    "description": "Company name (e.g., 'Apple Inc')"
                }
            },
            "required": ["name"]
        })
    }
}
