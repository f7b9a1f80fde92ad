//! Tool for fetching financial statement summaries

use async_trait::async_trait;
use finchat_tools::{Tool, ToolContent};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::api::YahooWebClient;
use crate::api::web::raw_num;
use crate::cache::{CacheKey, MarketCache};
use crate::error::Result;
use crate::tools::json_content;

/// Tool for fetching balance sheet, income statement and cash flow summaries
pub struct FinancialSheetsTool {
    web: YahooWebClient,
    cache: MarketCache,
}

#[derive(Debug, Deserialize)]
struct FinancialSheetsParams {
    ticker: String,
}

/// Reduce a statement array to rows of the named line items
///
/// Each statement keeps its end date plus the requested fields; absent
/// fields stay null so older filings with fewer line items still render.
fn summarize_statements(statements: Option<&Value>, fields: &[&str]) -> Vec<Value> {
    let Some(items) = statements.and_then(Value::as_array) else {
        return Vec::new();
    };

    items
        .iter()
        .map(|statement| {
            let mut row = serde_json::Map::new();
            row.insert(
                "end_date".to_string(),
                statement
                    .get("endDate")
                    .and_then(|d| d.get("fmt"))
                    .cloned()
                    .unwrap_or(Value::Null),
            );
            for field in fields {
                row.insert(
                    (*field).to_string(),
                    raw_num(statement, field).map_or(Value::Null, Value::from),
                );
            }
            Value::Object(row)
        })
        .collect()
}

impl FinancialSheetsTool {
    /// Create a new financial sheets tool
    pub fn new(web: YahooWebClient, cache: MarketCache) -> Self {
        Self { web, cache }
    }

    async fn fetch(&self, params: FinancialSheetsParams) -> Result<Value> {
        let ticker = params.ticker.trim().to_uppercase();
        let cache_key = CacheKey::new(&ticker, "financial_sheets", json!({}));

        self.cache
            .get_or_fetch(cache_key, || async {
                let summary = self
                    .web
                    .quote_summary(
                        &ticker,
                        &[
                            "balanceSheetHistory",
                            "incomeStatementHistory",
                            "cashflowStatementHistory",
                        ],
                    )
                    .await?;

                let balance_sheet = summarize_statements(
                    summary.pointer("/balanceSheetHistory/balanceSheetStatements"),
                    &["totalAssets", "totalLiab", "totalStockholderEquity", "cash"],
                );
                let income_statement = summarize_statements(
                    summary.pointer("/incomeStatementHistory/incomeStatementHistory"),
                    &["totalRevenue", "grossProfit", "operatingIncome", "netIncome"],
                );
                let cash_flow = summarize_statements(
                    summary.pointer("/cashflowStatementHistory/cashflowStatements"),
                    &[
                        "totalCashFromOperatingActivities",
                        "capitalExpenditures",
                        "dividendsPaid",
                    ],
                );

                Ok(json!({
                    "ticker": ticker,
                    "balance_sheet": balance_sheet,
                    "income_statement": income_statement,
                    "cash_flow_statement": cash_flow,
                }))
            })
            .await
    }
}

#[async_trait]
impl Tool for FinancialSheetsTool {
    async fn execute(&self, params: Value) -> finchat_tools::Result<Vec<ToolContent>> {
        let params: FinancialSheetsParams = serde_json::from_value(params).map_err(|e| {
            finchat_tools::ToolError::ExecutionFailed(format!("Invalid parameters: {e}"))
        })?;

        let result = self.fetch(params).await?;
        Ok(json_content(&result))
    }

    fn name(&self) -> &'static str {
        "get_stock_financial_sheets"
    }

    fn description(&self) -> &'static str {
        "Get the financial sheets of a stock: annual balance sheet, income statement \
         and cash flow statement summaries."
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summarize_statements() {
        let statements = json!([
            {
                "endDate": {"raw": 1695859200, "fmt": "2023-09-30"},
                "totalAssets": {"raw": 352583000000.0, "fmt": "352.58B"},
                "totalLiab": {"raw": 290437000000.0, "fmt": "290.44B"}
            },
            {
                "endDate": {"fmt": "2022-09-30"},
                "totalAssets": {"raw": 352755000000.0}
            }
        ]);

        let rows = summarize_statements(Some(&statements), &["totalAssets", "totalLiab"]);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["end_date"], "2023-09-30");
        assert_eq!(rows[0]["totalAssets"], 352583000000.0);
        assert_eq!(rows[1]["totalLiab"], Value::Null);
    }

    #[test]
    fn test_summarize_statements_missing() {
        assert!(summarize_statements(None, &["totalAssets"]).is_empty());
        assert!(summarize_statements(Some(&json!({})), &["totalAssets"]).is_empty());
    }

    #[test]
    fn test_tool_metadata() {
        let tool = FinancialSheetsTool::new(
            YahooWebClient::new(std::sync::Arc::new(crate::config::MarketConfig::default())),
            MarketCache::new(std::time::Duration::from_secs(60)),
        );
        assert_eq!(tool.name(), "get_stock_financial_sheets");
        assert!(tool.input_schema()["properties"]["ticker"].is_object());
    }
}
