//! Tool for sector-level metrics via ETF proxies

use async_trait::async_trait;
use finchat_tools::{Tool, ToolContent};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::api::web::raw_num;
use crate::api::{HistoryRange, YahooFinanceClient, YahooWebClient};
use crate::cache::{CacheKey, MarketCache};
use crate::error::{MarketError, Result};
use crate::tools::json_content;

/// Human-readable sector names and the ETFs that proxy them
const SECTOR_ETF_MAP: &[(&str, &str)] = &[
    ("Information Technology", "XLK"),
    ("Health Care", "XLV"),
    ("Financials", "XLF"),
    ("Consumer Discretionary", "XLY"),
    ("Communication Services", "XLC"),
    ("Industrials", "XLI"),
    ("Consumer Staples", "XLP"),
    ("Utilities", "XLU"),
    ("Energy", "XLE"),
    ("Real Estate", "XLRE"),
    ("Materials", "XLB"),
];

/// Resolve a sector name to its proxy ETF, case-insensitively
fn sector_etf(sector_name: &str) -> Option<&'static str> {
    SECTOR_ETF_MAP
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(sector_name.trim()))
        .map(|(_, etf)| *etf)
}

fn available_sectors() -> String {
    SECTOR_ETF_MAP
        .iter()
        .map(|(name, _)| *name)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Tool reporting growth and valuation metrics for a market sector
pub struct SectorMetricsTool {
    yahoo: YahooFinanceClient,
    web: YahooWebClient,
    cache: MarketCache,
}

#[derive(Debug, Deserialize)]
struct SectorMetricsParams {
    sector_name: String,
    #[serde(default)]
    time_period: Option<String>,
}

impl SectorMetricsTool {
    /// Create a new sector metrics tool
    pub fn new(yahoo: YahooFinanceClient, web: YahooWebClient, cache: MarketCache) -> Self {
        Self { yahoo, web, cache }
    }

    async fn fetch(&self, params: SectorMetricsParams) -> Result<Value> {
        let sector = params.sector_name.trim().to_string();
        let etf = sector_etf(&sector).ok_or_else(|| {
            MarketError::InvalidSymbol(format!(
                "Unknown sector '{sector}'. Available sectors: {}",
                available_sectors()
            ))
        })?;

        let period: HistoryRange = params
            .time_period
            .as_deref()
            .unwrap_or("1mo")
            .parse()?;

        let cache_key = CacheKey::new(&sector, "sector_metrics", json!({ "period": period.as_str() }));

        self.cache
            .get_or_fetch(cache_key, || async {
                let bars = self.yahoo.history(etf, period).await?;
                let (first, last) = match (bars.first(), bars.last()) {
                    (Some(first), Some(last)) => (first.close, last.close),
                    _ => {
                        return Err(MarketError::DataUnavailable {
                            symbol: etf.to_string(),
                            reason: "no price history for sector proxy".to_string(),
                        });
                    }
                };
                let growth_pct = if first.abs() > f64::EPSILON {
                    (last - first) / first * 100.0
                } else {
                    0.0
                };

                // Valuation fields are best-effort; growth alone still
                // answers the sector question.
                let detail = self
                    .web
                    .quote_summary(etf, &["summaryDetail"])
                    .await
                    .ok()
                    .and_then(|summary| summary.get("summaryDetail").cloned())
                    .unwrap_or(Value::Null);

                Ok(json!({
                    "sector": sector,
                    "etf": etf,
                    "period": period.as_str(),
                    "growth_pct": growth_pct,
                    "trailing_pe": raw_num(&detail, "trailingPE"),
                    "forward_pe": raw_num(&detail, "forwardPE"),
                    "dividend_yield": raw_num(&detail, "dividendYield"),
                }))
            })
            .await
    }
}

#[async_trait]
impl Tool for SectorMetricsTool {
    async fn execute(&self, params: Value) -> finchat_tools::Result<Vec<ToolContent>> {
        let params: SectorMetricsParams = serde_json::from_value(params).map_err(|e| {
            finchat_tools::ToolError::ExecutionFailed(format!("Invalid parameters: {e}"))
        })?;

        let result = self.fetch(params).await?;
        Ok(json_content(&result))
    }

    fn name(&self) -> &'static str {
        "get_stock_sector_metrics"
    }

    fn description(&self) -> &'static str {
        "Get sector metrics via the sector's proxy ETF: price growth over a period plus \
         trailing/forward P/E and dividend yield. Available sectors: 'Information \
         Technology', 'Health Care', 'Financials', 'Consumer Discretionary', \
         'Communication Services', 'Industrials', 'Consumer Staples', 'Utilities', \
         'Energy', 'Real Estate', 'Materials'. Use exact sector names as listed. \
         Time periods available: '1mo', '3mo', '6mo', '1y', '5y'."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "sector_name": {
                    "type": "string",
                    "description": "Sector name exactly as listed in the tool description"
                },
                "time_period": {
                    "type": "string",
                    "description": "Lookback period for growth",
                    "enum": ["1mo", "3mo", "6mo", "1y", "5y"],
                    "default": "1mo"
                }
            },
            "required": ["sector_name"]
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MarketConfig;
    use std::sync::Arc;
    use std::time::Duration;

    fn make_tool() -> SectorMetricsTool {
        SectorMetricsTool::new(
            YahooFinanceClient::new(),
            YahooWebClient::new(Arc::new(MarketConfig::default())),
            MarketCache::new(Duration::from_secs(60)),
        )
    }

    #[test]
    fn test_sector_etf_resolution() {
        assert_eq!(sector_etf("Information Technology"), Some("XLK"));
        assert_eq!(sector_etf("health care"), Some("XLV"));
        assert_eq!(sector_etf("  Energy  "), Some("XLE"));
        assert_eq!(sector_etf("Cryptocurrency"), None);
    }

    #[test]
    fn test_map_covers_eleven_sectors() {
        assert_eq!(SECTOR_ETF_MAP.len(), 11);
    }

    #[tokio::test]
    async fn test_unknown_sector_lists_alternatives() {
        let tool = make_tool();
        let err = tool
            .execute(json!({"sector_name": "Aerospace"}))
            .await
            .unwrap_err();
        let message = err.to_string();
        assert!(message.contains("Unknown sector"));
        assert!(message.contains("Information Technology"));
    }

    #[tokio::test]
    async fn test_bad_period_rejected() {
        let tool = make_tool();
        let err = tool
            .execute(json!({"sector_name": "Energy", "time_period": "2w"}))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Unsupported history range"));
    }

    #[test]
    fn test_tool_metadata() {
        let tool = make_tool();
        assert_eq!(tool.name(), "get_stock_sector_metrics");
        assert!(tool.description().contains("Materials"));

        let schema = tool.input_schema();
        assert_eq!(schema["required"][0], "sector_name");
        assert_eq!(schema["properties"]["time_period"]["default"], "1mo");
    }
}
