//! Tool for computing technical indicator series

use async_trait::async_trait;
use finchat_tools::{Tool, ToolContent};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use ta::Next;
use ta::indicators::{
    BollingerBands, ExponentialMovingAverage, MovingAverageConvergenceDivergence,
    RelativeStrengthIndex, SimpleMovingAverage,
};

use crate::api::{HistoryRange, Quote, YahooFinanceClient};
use crate::cache::{CacheKey, MarketCache};
use crate::error::{MarketError, Result};
use crate::tools::json_content;

/// Rows skipped while the longest short-window indicator warms up
const WARMUP_ROWS: usize = 20;

/// Keep every k-th row when downsampling for model ingestion
const SAMPLE_INTERVAL: usize = 10;

/// One bar of computed indicator features
#[derive(Debug, Clone, Serialize)]
pub struct FeatureRow {
    pub date: String,
    pub close: f64,
    pub sma_14: f64,
    pub ema_14: f64,
    pub rsi_14: f64,
    pub macd: f64,
    pub macd_signal: f64,
    pub macd_hist: f64,
    pub bb_upper: f64,
    pub bb_middle: f64,
    pub bb_lower: f64,
    pub trend: &'static str,
}

/// Compute indicator features over a daily bar series
///
/// The trend label compares EMA50 against EMA200 per bar; everything else is
/// the standard 14/20-period set the planner's prompt examples reference.
pub fn compute_feature_rows(quotes: &[Quote]) -> Result<Vec<FeatureRow>> {
    let mut sma14 = SimpleMovingAverage::new(14)
        .map_err(|e| MarketError::IndicatorError(e.to_string()))?;
    let mut ema14 = ExponentialMovingAverage::new(14)
        .map_err(|e| MarketError::IndicatorError(e.to_string()))?;
    let mut rsi14 = RelativeStrengthIndex::new(14)
        .map_err(|e| MarketError::IndicatorError(e.to_string()))?;
    let mut macd = MovingAverageConvergenceDivergence::new(12, 26, 9)
        .map_err(|e| MarketError::IndicatorError(e.to_string()))?;
    let mut bb = BollingerBands::new(20, 2.0)
        .map_err(|e| MarketError::IndicatorError(e.to_string()))?;
    let mut ema50 = ExponentialMovingAverage::new(50)
        .map_err(|e| MarketError::IndicatorError(e.to_string()))?;
    let mut ema200 = ExponentialMovingAverage::new(200)
        .map_err(|e| MarketError::IndicatorError(e.to_string()))?;

    let mut rows = Vec::with_capacity(quotes.len());
    for bar in quotes {
        let close = bar.close;
        let macd_out = macd.next(close);
        let bb_out = bb.next(close);
        let fast = ema50.next(close);
        let slow = ema200.next(close);

        rows.push(FeatureRow {
            date: bar.timestamp.date_naive().to_string(),
            close,
            sma_14: sma14.next(close),
            ema_14: ema14.next(close),
            rsi_14: rsi14.next(close),
            macd: macd_out.macd,
            macd_signal: macd_out.signal,
            macd_hist: macd_out.histogram,
            bb_upper: bb_out.upper,
            bb_middle: bb_out.average,
            bb_lower: bb_out.lower,
            trend: if fast > slow { "uptrend" } else { "downtrend" },
        });
    }

    Ok(rows)
}

/// Tool producing a downsampled indicator feature table for a ticker
pub struct IndicatorDataTool {
    yahoo: YahooFinanceClient,
    cache: MarketCache,
}

#[derive(Debug, Deserialize)]
struct IndicatorDataParams {
    ticker: String,
}

impl IndicatorDataTool {
    /// Create a new indicator data tool
    pub fn new(yahoo: YahooFinanceClient, cache: MarketCache) -> Self {
        Self { yahoo, cache }
    }

    async fn fetch(&self, params: IndicatorDataParams) -> Result<Value> {
        let ticker = params.ticker.trim().to_uppercase();
        let cache_key = CacheKey::new(&ticker, "indicators", json!({}));

        self.cache
            .get_or_fetch(cache_key, || async {
                let quotes = self.yahoo.history(&ticker, HistoryRange::Year).await?;
                let rows = compute_feature_rows(&quotes)?;

                let latest = rows.last().ok_or_else(|| MarketError::DataUnavailable {
                    symbol: ticker.clone(),
                    reason: "no bars to compute indicators over".to_string(),
                })?;

                let sampled: Vec<&FeatureRow> = rows
                    .iter()
                    .skip(WARMUP_ROWS)
                    .step_by(SAMPLE_INTERVAL)
                    .collect();

                Ok(json!({
                    "ticker": ticker,
                    "trend": latest.trend,
                    "latest": latest,
                    "sampled_rows": sampled,
                }))
            })
            .await
    }
}

#[async_trait]
impl Tool for IndicatorDataTool {
    async fn execute(&self, params: Value) -> finchat_tools::Result<Vec<ToolContent>> {
        let params: IndicatorDataParams = serde_json::from_value(params).map_err(|e| {
            finchat_tools::ToolError::ExecutionFailed(format!("Invalid parameters: {e}"))
        })?;

        let result = self.fetch(params).await?;
        Ok(json_content(&result))
    }

    fn name(&self) -> &'static str {
        "get_stock_indicator_data"
    }

    fn description(&self) -> &'static str {
        "Get the indicator data of a stock: SMA, EMA, RSI, MACD and Bollinger Bands \
         over the past year plus an EMA50/EMA200 trend label."
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
