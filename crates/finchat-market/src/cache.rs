//! Caching layer for market data to reduce API calls

use cached::{Cached, TimedCache};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

/// Cache key for market-data requests
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    /// Stock symbol or sector name
    pub symbol: String,
    /// Operation (e.g., "price", "fundamentals")
    pub endpoint: String,
    /// Additional parameters as a JSON string
    pub params: String,
}

impl CacheKey {
    /// Create a new cache key
    pub fn new(
        symbol: impl Into<String>,
        endpoint: impl Into<String>,
        params: impl Serialize,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            endpoint: endpoint.into(),
            params: serde_json::to_string(&params).unwrap_or_default(),
        }
    }
}

/// Thread-safe TTL cache for market data
pub struct MarketCache {
    cache: Arc<RwLock<TimedCache<CacheKey, serde_json::Value>>>,
}

impl MarketCache {
    /// Create a new cache with the specified TTL
    pub fn new(ttl: Duration) -> Self {
        Self {
            cache: Arc::new(RwLock::new(TimedCache::with_lifespan(ttl))),
        }
    }

    /// Get a value from the cache
    pub async fn get(&self, key: &CacheKey) -> Option<serde_json::Value> {
        let mut cache = self.cache.write().await;
        cache.cache_get(key).cloned()
    }

    /// Insert a value into the cache
    pub async fn insert(&self, key: CacheKey, value: serde_json::Value) {
        let mut cache = self.cache.write().await;
        let _ = cache.cache_set(key, value);
    }

    /// Get or fetch a value using the provided fetcher function
    ///
    /// A cached value is returned immediately; otherwise the fetcher runs
    /// and its result is cached for subsequent callers.
    pub async fn get_or_fetch<F, Fut, E>(
        &self,
        key: CacheKey,
        fetcher: F,
    ) -> std::result::Result<serde_json::Value, E>
    where
        F: FnOnce() -> Fut,
        Fut: std::future::Future<Output = std::result::Result<serde_json::Value, E>>,
    {
        if let Some(value) = self.get(&key).await {
            tracing::debug!(?key, "Cache hit");
            return Ok(value);
        }

        tracing::debug!(?key, "Cache miss");

        let value = fetcher().await?;
        self.insert(key, value.clone()).await;

        Ok(value)
    }

    /// Get the number of cached entries
    pub async fn len(&self) -> usize {
        let cache = self.cache.read().await;
        cache.cache_size()
    }

    /// Check if the cache is empty
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl Clone for MarketCache {
    fn clone(&self) -> Self {
        Self {
            cache: Arc::clone(&self.cache),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_insert_and_get() {
        let cache = MarketCache::new(Duration::from_secs(60));
        let key = CacheKey::new("AAPL", "price", json!({}));

        assert!(cache.get(&key).await.is_none());

        cache.insert(key.clone(), json!({"close": 190.5})).await;
        assert_eq!(cache.get(&key).await.unwrap()["close"], 190.5);
    }

    #[tokio::test]
    async fn test_get_or_fetch_caches() {
        let cache = MarketCache::new(Duration::from_secs(60));
        let key = CacheKey::new("AAPL", "price", json!({"range": "1d"}));

        let value = cache
            .get_or_fetch(key.clone(), || async { Ok::<_, crate::MarketError>(json!(1)) })
            .await
            .unwrap();
        assert_eq!(value, json!(1));

        // Second fetcher must not run; the cached value wins.
        let value = cache
            .get_or_fetch(key, || async { Ok::<_, crate::MarketError>(json!(2)) })
            .await
            .unwrap();
        assert_eq!(value, json!(1));
    }

    #[tokio::test]
    async fn test_distinct_params_distinct_entries() {
        let cache = MarketCache::new(Duration::from_secs(60));
        let key_a = CacheKey::new("AAPL", "price", json!({"range": "1d"}));
        let key_b = CacheKey::new("AAPL", "price", json!({"range": "1mo"}));

        cache.insert(key_a.clone(), json!("a")).await;
        assert!(cache.get(&key_b).await.is_none());
        assert_eq!(cache.len().await, 1);
    }
}
