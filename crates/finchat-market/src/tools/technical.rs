//! Tool for support/resistance extraction and pattern context

use async_trait::async_trait;
use finchat_tools::{Tool, ToolContent};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::api::{HistoryRange, Quote, YahooFinanceClient};
use crate::cache::{CacheKey, MarketCache};
use crate::error::{MarketError, Result};
use crate::tools::json_content;

/// Centered rolling window used for extrema detection (~2 trading weeks)
const EXTREMA_WINDOW: usize = 10;

/// Number of most recent levels reported per side
const REPORTED_LEVELS: usize = 10;

/// Number of trailing levels the direction call looks at
const TREND_LOOKBACK: usize = 5;

/// A detected support or resistance level
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PriceLevel {
    /// Bar date (YYYY-MM-DD)
    pub date: String,
    /// Closing price at the extremum
    pub price: f64,
    /// Recency weight in [0, 1]; newer levels score higher
    pub score: f64,
}

/// Detected support and resistance levels for a series
#[derive(Debug, Clone, Serialize)]
pub struct ExtremaLevels {
    pub support: Vec<PriceLevel>,
    pub resistance: Vec<PriceLevel>,
}

/// Find support and resistance levels with a centered rolling window
///
/// A bar whose close equals the maximum of the window centered on it is a
/// resistance point; the window minimum marks support. Bars too close to
/// either edge for a full window are skipped, matching a centered rolling
/// max/min that yields no value there.
pub fn find_extrema(quotes: &[Quote], window: usize) -> ExtremaLevels {
    let half = window / 2;
    let mut support = Vec::new();
    let mut resistance = Vec::new();

    if quotes.len() >= window && window >= 2 {
        for i in half..quotes.len() - half {
            let slice = &quotes[i - half..=i + half];
            let close = quotes[i].close;
            let max = slice.iter().map(|q| q.close).fold(f64::MIN, f64::max);
            let min = slice.iter().map(|q| q.close).fold(f64::MAX, f64::min);
            let date = quotes[i].timestamp.date_naive().to_string();

            if (close - max).abs() < f64::EPSILON {
                resistance.push(PriceLevel { date, price: close, score: 0.0 });
            } else if (close - min).abs() < f64::EPSILON {
                support.push(PriceLevel { date, price: close, score: 0.0 });
            }
        }
    }

    score_by_recency(&mut support, quotes);
    score_by_recency(&mut resistance, quotes);

    ExtremaLevels { support, resistance }
}

/// Assign each level a time-weighted score over the series span
fn score_by_recency(levels: &mut [PriceLevel], quotes: &[Quote]) {
    let (Some(first), Some(last)) = (quotes.first(), quotes.last()) else {
        return;
    };

    let span = (last.timestamp - first.timestamp).num_seconds();
    if span <= 0 {
        return;
    }

    for level in levels.iter_mut() {
        // Levels carry only dates; recompute position from the matching bar.
        if let Some(bar) = quotes
            .iter()
            .find(|q| q.timestamp.date_naive().to_string() == level.date)
        {
            let offset = (bar.timestamp - first.timestamp).num_seconds();
            level.score = offset as f64 / span as f64;
        }
    }
}

/// Direction of the last few levels on one side
///
/// Compares the newest level against the oldest of the trailing window:
/// "rising" when price levels are stepping up, "falling" when stepping down,
/// "flat" with fewer than two levels to compare.
pub fn level_trend(levels: &[PriceLevel], lookback: usize) -> &'static str {
    let tail: Vec<&PriceLevel> = levels.iter().rev().take(lookback).collect();
    match (tail.last(), tail.first()) {
        (Some(oldest), Some(newest)) if tail.len() >= 2 => {
            if newest.price > oldest.price {
                "rising"
            } else if newest.price < oldest.price {
                "falling"
            } else {
                "flat"
            }
        }
        _ => "flat",
    }
}

/// Tool producing support/resistance levels and their recent direction
pub struct TechnicalAnalysisTool {
    yahoo: YahooFinanceClient,
    cache: MarketCache,
}

#[derive(Debug, Deserialize)]
struct TechnicalAnalysisParams {
    ticker: String,
}

impl TechnicalAnalysisTool {
    /// Create a new technical analysis tool
    pub fn new(yahoo: YahooFinanceClient, cache: MarketCache) -> Self {
        Self { yahoo, cache }
    }

    async fn fetch(&self, params: TechnicalAnalysisParams) -> Result<Value> {
        let ticker = params.ticker.trim().to_uppercase();
        let cache_key = CacheKey::new(&ticker, "technical", json!({}));

        self.cache
            .get_or_fetch(cache_key, || async {
                let quotes = self.yahoo.history(&ticker, HistoryRange::Year).await?;
                let current = quotes.last().ok_or_else(|| MarketError::DataUnavailable {
                    symbol: ticker.clone(),
                    reason: "no bars returned".to_string(),
                })?;

                let levels = find_extrema(&quotes, EXTREMA_WINDOW);
                let support_trend = level_trend(&levels.support, TREND_LOOKBACK);
                let resistance_trend = level_trend(&levels.resistance, TREND_LOOKBACK);

                let recent = |side: &[PriceLevel]| -> Vec<PriceLevel> {
                    side.iter()
                        .rev()
                        .take(REPORTED_LEVELS)
                        .rev()
                        .cloned()
                        .collect()
                };

                Ok(json!({
                    "ticker": ticker,
                    "current_close": current.close,
                    "support_levels": recent(&levels.support),
                    "resistance_levels": recent(&levels.resistance),
                    "support_trend": support_trend,
                    "resistance_trend": resistance_trend,
                    "window_bars": EXTREMA_WINDOW,
                }))
            })
            .await
    }
}

#[async_trait]
impl Tool for TechnicalAnalysisTool {
    async fn execute(&self, params: Value) -> finchat_tools::Result<Vec<ToolContent>> {
        let params: TechnicalAnalysisParams = serde_json::from_value(params).map_err(|e| {
            finchat_tools::ToolError::ExecutionFailed(format!("Invalid parameters: {e}"))
        })?;

        let result = self.fetch(params).await?;
        Ok(json_content(&result))
    }

    fn name(&self) -> &'static str {
        "get_stock_technical_analysis"
    }

    fn description(&self) -> &'static str {
        "Get the technical analysis of a stock: support and resistance levels over the \
         past year with recency scores and the direction of recent levels. Useful for \
         forecasting price behavior."
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
    use chrono::{TimeZone, Utc};

    fn synthetic_quotes(closes: &[f64]) -> Vec<Quote> {
        closes
            .iter()
            .enumerate()
            .map(|(i, &close)| Quote {
                symbol: "TEST".to_string(),
                timestamp: Utc.timestamp_opt(1_700_000_000 + i as i64 * 86_400, 0).unwrap(),
                open: close,
                high: close,
                low: close,
                close,
                volume: 1_000,
                adjclose: close,
            })
            .collect()
    }

    /// Triangle wave: peaks are resistance, troughs support.
    fn zigzag(cycles: usize) -> Vec<f64> {
        let mut closes = Vec::new();
        for _ in 0..cycles {
            closes.extend((0..10).map(|i| 100.0 + i as f64)); // climb to 109
            closes.extend((0..10).map(|i| 109.0 - i as f64)); // fall back to 100
        }
        closes
    }

    #[test]
    fn test_finds_peaks_and_troughs() {
        let quotes = synthetic_quotes(&zigzag(3));
        let levels = find_extrema(&quotes, EXTREMA_WINDOW);

        assert!(!levels.resistance.is_empty());
        assert!(!levels.support.is_empty());
        assert!(levels.resistance.iter().all(|l| l.price >= 108.0));
        assert!(levels.support.iter().all(|l| l.price <= 101.0));
    }

    #[test]
    fn test_scores_increase_with_recency() {
        let quotes = synthetic_quotes(&zigzag(4));
        let levels = find_extrema(&quotes, EXTREMA_WINDOW);

        let scores: Vec<f64> = levels.resistance.iter().map(|l| l.score).collect();
        assert!(scores.windows(2).all(|w| w[0] <= w[1]));
        assert!(scores.iter().all(|s| (0.0..=1.0).contains(s)));
    }

    #[test]
    fn test_too_short_series_yields_nothing() {
        let quotes = synthetic_quotes(&[1.0, 2.0, 3.0]);
        let levels = find_extrema(&quotes, EXTREMA_WINDOW);
        assert!(levels.support.is_empty());
        assert!(levels.resistance.is_empty());
    }

    #[test]
    fn test_level_trend_direction() {
        let rising = vec![
            PriceLevel { date: "2024-01-01".into(), price: 100.0, score: 0.1 },
            PriceLevel { date: "2024-02-01".into(), price: 105.0, score: 0.5 },
            PriceLevel { date: "2024-03-01".into(), price: 110.0, score: 0.9 },
        ];
        assert_eq!(level_trend(&rising, TREND_LOOKBACK), "rising");

        let falling: Vec<PriceLevel> = rising.iter().rev().cloned().collect();
        assert_eq!(level_trend(&falling, TREND_LOOKBACK), "falling");

        assert_eq!(level_trend(&rising[..1], TREND_LOOKBACK), "flat");
        assert_eq!(level_trend(&[], TREND_LOOKBACK), "flat");
    }

    #[test]
    fn test_tool_metadata() {
        let tool = TechnicalAnalysisTool::new(
            YahooFinanceClient::new(),
            MarketCache::new(std::time::Duration::from_secs(60)),
        );
        assert_eq!(tool.name(), "get_stock_technical_analysis");
        assert!(!tool.description().is_empty());
    }
}
