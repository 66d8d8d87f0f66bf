use serde::{de::DeserializeOwned, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::error::ApiError;

/// Cache backend trait for pluggable caching strategies.
#[async_trait::async_trait]
pub trait CacheBackend: Send + Sync {
    /// Get a raw value from the cache.
    async fn get(&self, key: &str) -> Result<Option<String>, ApiError>;

    /// Set a raw value in the cache with optional TTL.
    async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> Result<(), ApiError>;

    /// Delete a key from the cache.
    async fn del(&self, key: &str) -> Result<bool, ApiError>;

    /// Delete all keys starting with the given prefix.
    async fn del_prefix(&self, prefix: &str) -> Result<(), ApiError>;

    /// Check if a key exists.
    async fn exists(&self, key: &str) -> Result<bool, ApiError>;

    /// Flush all keys (use with caution).
    async fn flush(&self) -> Result<(), ApiError>;
}

/// The main cache service used by the application.
///
/// The `*_lossy` methods degrade to a cache miss (or a no-op) on backend
/// failure, logging a warning instead of failing the request. Handlers
/// that treat the cache as an optimization should use those.
#[derive(Clone)]
pub struct CacheService {
    backend: Arc<dyn CacheBackend>,
}

impl CacheService {
    /// Create a new cache service with the given backend.
    pub fn new(backend: impl CacheBackend + 'static) -> Self {
        CacheService {
            backend: Arc::new(backend),
        }
    }

    /// Create an in-memory cache (good for development and testing).
    pub fn in_memory() -> Self {
        CacheService::new(InMemoryCache::new())
    }

    /// Get a JSON-deserialized value from the cache.
    pub async fn get_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, ApiError> {
        match self.backend.get(key).await? {
            Some(raw) => {
                let value: T = serde_json::from_str(&raw)
                    .map_err(|e| ApiError::Internal(format!("Cache deserialize error: {}", e)))?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    /// Set a JSON-serialized value in the cache.
    pub async fn set_json<T: Serialize>(
        &self,
        key: &str,
        value: &T,
        ttl: Option<Duration>,
    ) -> Result<(), ApiError> {
        let raw = serde_json::to_string(value)
            .map_err(|e| ApiError::Internal(format!("Cache serialize error: {}", e)))?;
        self.backend.set(key, &raw, ttl).await
    }

    /// Get a JSON value, treating any backend or decode failure as a miss.
    pub async fn get_json_lossy<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        match self.get_json(key).await {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(key, error = %e, "cache read failed");
                None
            }
        }
    }

    /// Set a JSON value, logging instead of failing on backend errors.
    pub async fn set_json_lossy<T: Serialize>(&self, key: &str, value: &T, ttl: Duration) {
        if let Err(e) = self.set_json(key, value, Some(ttl)).await {
            tracing::warn!(key, error = %e, "cache write failed");
        }
    }

    /// Get a raw string from the cache.
    pub async fn get(&self, key: &str) -> Result<Option<String>, ApiError> {
        self.backend.get(key).await
    }

    /// Set a raw string in the cache.
    pub async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> Result<(), ApiError> {
        self.backend.set(key, value, ttl).await
    }

    /// Delete a key from the cache.
    pub async fn del(&self, key: &str) -> Result<bool, ApiError> {
        self.backend.del(key).await
    }

    /// Delete all keys matching a prefix.
    pub async fn del_prefix(&self, prefix: &str) -> Result<(), ApiError> {
        self.backend.del_prefix(prefix).await
    }

    /// Delete all keys matching a prefix, logging instead of failing.
    pub async fn del_prefix_lossy(&self, prefix: &str) {
        if let Err(e) = self.backend.del_prefix(prefix).await {
            tracing::warn!(prefix, error = %e, "cache invalidation failed");
        }
    }

    /// Check if a key exists in the cache.
    pub async fn exists(&self, key: &str) -> Result<bool, ApiError> {
        self.backend.exists(key).await
    }

    /// Flush the entire cache.
    pub async fn flush(&self) -> Result<(), ApiError> {
        self.backend.flush().await
    }
}

// ── In-Memory Cache Backend ──

/// Simple in-memory cache using a HashMap. Good for development and testing.
/// For production, use `RedisCache`.
#[derive(Clone)]
pub struct InMemoryCache {
    store: Arc<RwLock<std::collections::HashMap<String, CacheEntry>>>,
}

#[derive(Clone)]
struct CacheEntry {
    value: String,
    expires_at: Option<std::time::Instant>,
}

impl InMemoryCache {
    pub fn new() -> Self {
        InMemoryCache {
            store: Arc::new(RwLock::new(std::collections::HashMap::new())),
        }
    }
}

impl Default for InMemoryCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl CacheBackend for InMemoryCache {
    async fn get(&self, key: &str) -> Result<Option<String>, ApiError> {
        let store = self.store.read().await;
        match store.get(key) {
            Some(entry) => {
                if let Some(expires_at) = entry.expires_at {
                    if std::time::Instant::now() > expires_at {
                        drop(store);
                        self.store.write().await.remove(key);
                        return Ok(None);
                    }
                }
                Ok(Some(entry.value.clone()))
            }
            None => Ok(None),
        }
    }

    async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> Result<(), ApiError> {
        let expires_at = ttl.map(|d| std::time::Instant::now() + d);
        self.store.write().await.insert(
            key.to_string(),
            CacheEntry {
                value: value.to_string(),
                expires_at,
            },
        );
        Ok(())
    }

    async fn del(&self, key: &str) -> Result<bool, ApiError> {
        Ok(self.store.write().await.remove(key).is_some())
    }

    async fn del_prefix(&self, prefix: &str) -> Result<(), ApiError> {
        self.store
            .write()
            .await
            .retain(|key, _| !key.starts_with(prefix));
        Ok(())
    }

    async fn exists(&self, key: &str) -> Result<bool, ApiError> {
        let store = self.store.read().await;
        match store.get(key) {
            Some(entry) => {
                if let Some(expires_at) = entry.expires_at {
                    Ok(std::time::Instant::now() <= expires_at)
                } else {
                    Ok(true)
                }
            }
            None => Ok(false),
        }
    }

    async fn flush(&self) -> Result<(), ApiError> {
        self.store.write().await.clear();
        Ok(())
    }
}

// ── Redis Cache Backend ──

/// Redis-backed cache for production use.
///
/// Requires a Redis connection URL (e.g., `redis://127.0.0.1:6379`).
///
/// ```rust,ignore
/// let cache = RedisCache::new("redis://127.0.0.1:6379").await?;
/// let service = CacheService::new(cache);
/// ```
#[cfg(feature = "redis")]
pub struct RedisCache {
    #[allow(dead_code)]
    client: redis::Client,
    pool: Arc<RwLock<redis::aio::MultiplexedConnection>>,
}

#[cfg(feature = "redis")]
impl RedisCache {
    /// Create a new Redis cache from a connection URL.
    pub async fn new(url: &str) -> Result<Self, ApiError> {
        let client = redis::Client::open(url)
            .map_err(|e| ApiError::Internal(format!("Redis connection error: {}", e)))?;
        let conn = client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| ApiError::Internal(format!("Redis connection error: {}", e)))?;
        Ok(RedisCache {
            client,
            pool: Arc::new(RwLock::new(conn)),
        })
    }
}

#[cfg(feature = "redis")]
#[async_trait::async_trait]
impl CacheBackend for RedisCache {
    async fn get(&self, key: &str) -> Result<Option<String>, ApiError> {
        use redis::AsyncCommands;
        let mut conn = self.pool.write().await;
        let result: Option<String> = conn
            .get(key)
            .await
            .map_err(|e| ApiError::Internal(format!("Redis GET error: {}", e)))?;
        Ok(result)
    }

    async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> Result<(), ApiError> {
        use redis::AsyncCommands;
        let mut conn = self.pool.write().await;
        if let Some(ttl) = ttl {
            let _: () = conn
                .set_ex(key, value, ttl.as_secs())
                .await
                .map_err(|e| ApiError::Internal(format!("Redis SETEX error: {}", e)))?;
        } else {
            let _: () = conn
                .set(key, value)
                .await
                .map_err(|e| ApiError::Internal(format!("Redis SET error: {}", e)))?;
        }
        Ok(())
    }

    async fn del(&self, key: &str) -> Result<bool, ApiError> {
        use redis::AsyncCommands;
        let mut conn = self.pool.write().await;
        let count: i64 = conn
            .del(key)
            .await
            .map_err(|e| ApiError::Internal(format!("Redis DEL error: {}", e)))?;
        Ok(count > 0)
    }

    async fn del_prefix(&self, prefix: &str) -> Result<(), ApiError> {
        use redis::AsyncCommands;
        let pattern = format!("{}*", prefix);
        let mut conn = self.pool.write().await;
        let mut cursor: u64 = 0;
        loop {
            let (next, keys): (u64, Vec<String>) = redis::cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg(&pattern)
                .arg("COUNT")
                .arg(100)
                .query_async(&mut *conn)
                .await
                .map_err(|e| ApiError::Internal(format!("Redis SCAN error: {}", e)))?;
            if !keys.is_empty() {
                let _: i64 = conn
                    .del(keys)
                    .await
                    .map_err(|e| ApiError::Internal(format!("Redis DEL error: {}", e)))?;
            }
            if next == 0 {
                break;
            }
            cursor = next;
        }
        Ok(())
    }

    async fn exists(&self, key: &str) -> Result<bool, ApiError> {
        use redis::AsyncCommands;
        let mut conn = self.pool.write().await;
        let exists: bool = conn
            .exists(key)
            .await
            .map_err(|e| ApiError::Internal(format!("Redis EXISTS error: {}", e)))?;
        Ok(exists)
    }

    async fn flush(&self) -> Result<(), ApiError> {
        let mut conn = self.pool.write().await;
        let _: () = redis::cmd("FLUSHDB")
            .query_async(&mut *conn)
            .await
            .map_err(|e| ApiError::Internal(format!("Redis FLUSHDB error: {}", e)))?;
        Ok(())
    }
}
