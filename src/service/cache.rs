use std::{
    hash::{DefaultHasher, Hash, Hasher},
    sync::Arc,
    time::{SystemTime, UNIX_EPOCH},
};

use dashmap::DashMap;
use tokio::{task::JoinHandle, time};
use tracing::error;

use crate::models::error::ServerError;

fn generate_hash<T>(value: &T) -> u64
where
    T: Hash,
{
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

#[derive(Debug, Clone)]
struct CacheEntry<T: Clone + Sync + 'static> {
    timestamp: u64,
    value: T,
}

impl<T: Clone + Sync + 'static> CacheEntry<T> {
    fn new(value: T) -> Result<Self, ServerError> {
        Ok(Self {
            timestamp: SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs(),
            value,
        })
    }
}

/// Small read-through ttl cache, used for per-session question lists which
/// are immutable for the lifetime of a session.
#[derive(Debug)]
pub struct TtlCache<T: Clone + Send + Sync + 'static> {
    cache: Arc<DashMap<u64, CacheEntry<T>>>,
    ttl: u64,
    cleanup_task: Option<JoinHandle<()>>,
}

impl<T: Clone + Send + Sync> TtlCache<T> {
    pub fn from_ttl(ttl_secs: u64) -> Self {
        let mut cache = Self {
            cache: Arc::new(DashMap::new()),
            ttl: ttl_secs,
            cleanup_task: None,
        };

        cache.spawn_cleanup();
        cache
    }

    pub async fn get_or<K, F>(&self, key: &K, on_miss: F) -> Result<T, ServerError>
    where
        F: AsyncFnOnce() -> Result<T, sqlx::Error>,
        K: Hash,
    {
        let key = generate_hash(key);

        if let Some(mut entry) = self.cache.get_mut(&key) {
            let now = SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs();

            if entry.timestamp + self.ttl > now {
                entry.timestamp = now;
                return Ok(entry.value.clone());
            }
        };

        let data = on_miss().await?;
        let cache_entry = CacheEntry::new(data.clone())?;
        self.cache.insert(key, cache_entry);

        Ok(data)
    }

    pub fn invalidate<K: Hash>(&self, key: &K) {
        self.cache.remove(&generate_hash(key));
    }

    fn spawn_cleanup(&mut self) {
        let interval_seconds = (self.ttl / 2) + 1;
        let interval = time::Duration::from_secs(interval_seconds);

        let cache_pointer = self.cache.clone();
        let offset = self.ttl;

        let mut ticker = tokio::time::interval(interval);
        self.cleanup_task = Some(tokio::spawn(async move {
            loop {
                ticker.tick().await;
                let Ok(duration) = SystemTime::now().duration_since(UNIX_EPOCH) else {
                    error!("Failed to get secs from UNIX EPOCH");
                    continue;
                };

                let now = duration.as_secs();
                cache_pointer.retain(|_, value| now < value.timestamp + offset);
            }
        }));
    }
}
