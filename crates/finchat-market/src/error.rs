//! Error types for market-data operations

use thiserror::Error;

/// Market-data specific errors
#[derive(Debug, Error)]
pub enum MarketError {
    /// API request failed
    #[error("API error: {0}")]
    ApiError(String),

    /// Invalid stock symbol or sector name provided
    #[error("Invalid symbol: {0}")]
    InvalidSymbol(String),

    /// Data not available for the requested symbol
    #[error("Data not available for {symbol}: {reason}")]
    DataUnavailable {
        symbol: String,
        reason: String,
    },

    /// Rate limit exceeded after retries
    #[error("Rate limit exceeded for {endpoint}")]
    RateLimited {
        endpoint: String,
    },

    /// Network or HTTP error
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Yahoo Finance API error
    #[error("Yahoo Finance error: {0}")]
    YahooError(String),

    /// Technical indicator calculation error
    #[error("Technical indicator error: {0}")]
    IndicatorError(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type alias for market operations
pub type Result<T> = std::result::Result<T, MarketError>;

/// Convert MarketError into the tool error channel
///
/// Every market failure surfaces to the executor as an execution failure;
/// the executor records it in the trace and keeps the turn alive.
impl From<MarketError> for finchat_tools::ToolError {
    fn from(err: MarketError) -> Self {
        finchat_tools::ToolError::ExecutionFailed(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = MarketError::InvalidSymbol("INVALID".to_string());
        assert_eq!(err.to_string(), "Invalid symbol: INVALID");

        let err = MarketError::DataUnavailable {
            symbol: "AAPL".to_string(),
            reason: "No data found".to_string(),
        };
        assert_eq!(err.to_string(), "Data not available for AAPL: No data found");
    }

    #[test]
    fn test_error_conversion() {
        let market_err = MarketError::ApiError("boom".to_string());
        let tool_err: finchat_tools::ToolError = market_err.into();

        match tool_err {
            finchat_tools::ToolError::ExecutionFailed(msg) => {
                assert!(msg.contains("API error"));
            }
            _ => panic!("Expected ExecutionFailed variant"),
        }
    }
}
