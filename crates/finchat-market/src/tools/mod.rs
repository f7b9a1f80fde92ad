//! Market-data tool implementations
//!
//! Each tool is a thin fetch-and-shape over the API clients; results are
//! serialized to pretty JSON inside a single text content part, which is the
//! shape the executor folds into the planning context.

mod fundamentals;
mod indicators;
mod news;
mod price;
mod sector;
mod statements;
mod technical;
mod ticker_lookup;

pub use fundamentals::FundamentalsTool;
pub use indicators::IndicatorDataTool;
pub use news::StockNewsTool;
pub use price::StockPriceTool;
pub use sector::SectorMetricsTool;
pub use statements::FinancialSheetsTool;
pub use technical::TechnicalAnalysisTool;
pub use ticker_lookup::TickerLookupTool;

use crate::api::{YahooFinanceClient, YahooWebClient};
use crate::cache::MarketCache;
use crate::config::MarketConfig;
use finchat_tools::{ToolContent, ToolRegistry};
use serde_json::Value;
use std::sync::Arc;

/// Wrap a JSON result in the single text part tools emit
fn json_content(value: &Value) -> Vec<ToolContent> {
    let text = serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string());
    vec![ToolContent::text(text)]
}

/// Register the full market tool set on a registry
///
/// Clients and caches are shared across tools: one quote/history client, one
/// rate-limited web client, and one cache per data family (realtime,
/// fundamental, news).
pub fn register_market_tools(registry: &ToolRegistry, config: Arc<MarketConfig>) {
    let yahoo = YahooFinanceClient::new();
    let web = YahooWebClient::new(Arc::clone(&config));

    let realtime_cache = MarketCache::new(config.cache_ttl_realtime);
    let fundamental_cache = MarketCache::new(config.cache_ttl_fundamental);
    let news_cache = MarketCache::new(config.cache_ttl_news);

    registry.register(Arc::new(TickerLookupTool::new(
        web.clone(),
        fundamental_cache.clone(),
    )));
    registry.register(Arc::new(StockPriceTool::new(
        yahoo.clone(),
        web.clone(),
        realtime_cache.clone(),
    )));
    registry.register(Arc::new(FundamentalsTool::new(
        web.clone(),
        fundamental_cache.clone(),
    )));
    registry.register(Arc::new(FinancialSheetsTool::new(
        web.clone(),
        fundamental_cache.clone(),
    )));
    registry.register(Arc::new(StockNewsTool::new(web.clone(), news_cache)));
    registry.register(Arc::new(IndicatorDataTool::new(
        yahoo.clone(),
        realtime_cache.clone(),
    )));
    registry.register(Arc::new(TechnicalAnalysisTool::new(
        yahoo.clone(),
        realtime_cache,
    )));
    registry.register(Arc::new(SectorMetricsTool::new(yahoo, web, fundamental_cache)));
}
