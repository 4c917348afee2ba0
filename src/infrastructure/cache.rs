use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use async_trait::async_trait;
use dashmap::DashMap;
use redis::AsyncCommands;

use crate::errors::StartupError;
use crate::settings::{CacheBackend, CacheSettings};

/// Entry cap for the in-process cache.
const LOCAL_MAX_ENTRIES: usize = 300;

/// Response cache shared by all workers. Backend failures are logged and
/// treated as misses so a broken cache never fails a request.
#[async_trait]
pub trait CacheStore: Send + Sync {
    async fn get(&self, key: &str) -> Option<Vec<u8>>;
    async fn set(&self, key: &str, value: Vec<u8>, ttl: Duration);
    async fn clear(&self);
    async fn ping(&self) -> Result<(), String>;
    fn backend(&self) -> CacheBackend;
}

pub type SharedCache = Arc<dyn CacheStore>;

/// Never stores anything.
pub struct DummyCache;

#[async_trait]
impl CacheStore for DummyCache {
    async fn get(&self, _key: &str) -> Option<Vec<u8>> {
        None
    }

    async fn set(&self, _key: &str, _value: Vec<u8>, _ttl: Duration) {}

    async fn clear(&self) {}

    async fn ping(&self) -> Result<(), String> {
        Ok(())
    }

    fn backend(&self) -> CacheBackend {
        CacheBackend::Dummy
    }
}

#[derive(Debug)]
struct LocalEntry {
    expires_at: Instant,
    value: Vec<u8>,
}

/// Per-process cache. Each worker process has its own copy.
pub struct LocalMemoryCache {
    entries: DashMap<String, LocalEntry>,
    max_entries: usize,
}

impl LocalMemoryCache {
    pub fn new(max_entries: usize) -> Self {
        LocalMemoryCache {
            entries: DashMap::new(),
            max_entries: max_entries.max(1),
        }
    }

    fn make_room(&self) {
        let now = Instant::now();
        self.entries.retain(|_, entry| entry.expires_at > now);

        while self.entries.len() >= self.max_entries {
            let victim = self.entries.iter().next().map(|entry| entry.key().clone());
            match victim {
                Some(key) => {
                    self.entries.remove(&key);
                }
                None => break,
            }
        }
    }
}

#[async_trait]
impl CacheStore for LocalMemoryCache {
    async fn get(&self, key: &str) -> Option<Vec<u8>> {
        {
            let entry = self.entries.get(key)?;
            if entry.expires_at > Instant::now() {
                return Some(entry.value.clone());
            }
        }
        self.entries.remove(key);
        None
    }

    async fn set(&self, key: &str, value: Vec<u8>, ttl: Duration) {
        if !self.entries.contains_key(key) && self.entries.len() >= self.max_entries {
            self.make_room();
        }
        self.entries.insert(
            key.to_string(),
            LocalEntry { expires_at: Instant::now() + ttl, value },
        );
    }

    async fn clear(&self) {
        self.entries.clear();
    }

    async fn ping(&self) -> Result<(), String> {
        Ok(())
    }

    fn backend(&self) -> CacheBackend {
        CacheBackend::Locmem
    }
}

pub struct RedisCache {
    pool: deadpool_redis::Pool,
    key_prefix: String,
}

impl RedisCache {
    pub fn new(url: &str, key_prefix: &str) -> Result<Self, StartupError> {
        let cfg = deadpool_redis::Config::from_url(url);
        let pool = cfg
            .create_pool(Some(deadpool_redis::Runtime::Tokio1))
            .map_err(|e| StartupError::Cache(format!("Redis pool creation error: {e}")))?;

        Ok(RedisCache { pool, key_prefix: key_prefix.to_string() })
    }

    fn key(&self, key: &str) -> String {
        format!("{}:{}", self.key_prefix, key)
    }
}

#[async_trait]
impl CacheStore for RedisCache {
    async fn get(&self, key: &str) -> Option<Vec<u8>> {
        let mut conn = match self.pool.get().await {
            Ok(conn) => conn,
            Err(e) => {
                tracing::warn!("Redis connection failed: {}", e);
                return None;
            }
        };

        conn.get::<_, Option<Vec<u8>>>(self.key(key))
            .await
            .map_err(|e| tracing::warn!("Redis GET failed: {}", e))
            .ok()
            .flatten()
    }

    async fn set(&self, key: &str, value: Vec<u8>, ttl: Duration) {
        let mut conn = match self.pool.get().await {
            Ok(conn) => conn,
            Err(e) => {
                tracing::warn!("Redis connection failed: {}", e);
                return;
            }
        };

        let seconds = ttl.as_secs().max(1);
        if let Err(e) = conn.set_ex::<_, _, ()>(self.key(key), value, seconds).await {
            tracing::warn!("Redis SETEX failed: {}", e);
        }
    }

    async fn clear(&self) {
        let Ok(mut conn) = self.pool.get().await else {
            return;
        };
        let pattern = format!("{}:*", self.key_prefix);
        let keys: Vec<String> = match conn.keys::<_, Vec<String>>(pattern).await {
            Ok(keys) => keys,
            Err(e) => {
                tracing::warn!("Redis KEYS failed: {}", e);
                return;
            }
        };
        if !keys.is_empty() {
            if let Err(e) = conn.del::<_, ()>(keys).await {
                tracing::warn!("Redis DEL failed: {}", e);
            }
        }
    }

    async fn ping(&self) -> Result<(), String> {
        let mut conn = self.pool.get().await.map_err(|e| e.to_string())?;
        redis::cmd("PING")
            .query_async::<String>(&mut conn)
            .await
            .map(|_| ())
            .map_err(|e| e.to_string())
    }

    fn backend(&self) -> CacheBackend {
        CacheBackend::Redis
    }
}

pub fn build_cache(settings: &CacheSettings) -> Result<SharedCache, StartupError> {
    let cache: SharedCache = match settings.backend {
        CacheBackend::Dummy => Arc::new(DummyCache),
        CacheBackend::Locmem => Arc::new(LocalMemoryCache::new(LOCAL_MAX_ENTRIES)),
        CacheBackend::Redis => Arc::new(RedisCache::new(&settings.url, &settings.key_prefix)?),
    };
    tracing::debug!(backend = ?settings.backend, "Cache backend ready");
    Ok(cache)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn dummy_cache_never_hits() {
        let cache = DummyCache;
        cache.set("home", b"page".to_vec(), Duration::from_secs(60)).await;
        assert!(cache.get("home").await.is_none());
    }

    #[tokio::test]
    async fn local_cache_returns_fresh_entries() {
        let cache = LocalMemoryCache::new(10);
        cache.set("home", b"page".to_vec(), Duration::from_secs(60)).await;
        assert_eq!(cache.get("home").await.as_deref(), Some(&b"page"[..]));
    }

    #[tokio::test]
    async fn local_cache_expires_entries() {
        let cache = LocalMemoryCache::new(10);
        cache.set("home", b"page".to_vec(), Duration::from_millis(10)).await;
        tokio::time::sleep(Duration::from_millis(30)).await;
        assert!(cache.get("home").await.is_none());
    }

    #[tokio::test]
    async fn local_cache_respects_capacity() {
        let cache = LocalMemoryCache::new(2);
        for key in ["a", "b", "c"] {
            cache.set(key, key.as_bytes().to_vec(), Duration::from_secs(60)).await;
        }
        assert_eq!(cache.entries.len(), 2);
        assert!(cache.get("c").await.is_some());
    }

    #[tokio::test]
    async fn clear_empties_local_cache() {
        let cache = LocalMemoryCache::new(10);
        cache.set("about", b"page".to_vec(), Duration::from_secs(60)).await;
        cache.clear().await;
        assert!(cache.get("about").await.is_none());
    }
}
