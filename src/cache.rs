//! Persistent TTL cache for slow-changing upstream payloads
//!
//! Entries are postcard-encoded together with their expiry and stored in a
//! fjall keyspace. The cache is opened once by the caller and handed to the
//! clients that need it.

use fjall::Keyspace;
use rand::RngExt;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use std::fmt::Debug;
use std::path::Path;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tokio::task;

use crate::{MediSnowError, Result};

#[derive(Serialize, Deserialize)]
struct StoredEntry<T> {
    value: T,
    expires_at: u64, // Unix timestamp (seconds)
}

#[derive(Clone)]
pub struct PersistentCache {
    store: Keyspace,
}

fn unix_now() -> Result<u64> {
    Ok(SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| MediSnowError::cache(format!("System clock before epoch: {e}")))?
        .as_secs())
}

fn join_error(e: task::JoinError) -> MediSnowError {
    MediSnowError::cache(format!("Cache task failed: {e}"))
}

/// Scale `ttl` by a random factor in [0.9, 1.1) so entries written together
/// do not all expire together
#[must_use]
pub fn jittered(ttl: Duration) -> Duration {
    ttl.mul_f64(rand::rng().random_range(0.9..1.1))
}

impl PersistentCache {
    /// Open (or create) the cache database under `path`
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let db = fjall::Database::builder(&path).open()?;
        let items = db.keyspace("cache", fjall::KeyspaceCreateOptions::default)?;
        Ok(PersistentCache { store: items })
    }

    /// Stores a serializable value with a time-to-live (TTL).
    #[tracing::instrument(name = "put_cache", level = "debug", skip(self, value))]
    pub async fn put<T: Serialize + Send + Debug + 'static>(
        &self,
        key: &str,
        value: T,
        ttl: Duration,
    ) -> Result<()> {
        let store = self.store.clone();
        let key = key.as_bytes().to_vec();
        let expires_at = unix_now()?
            .checked_add(ttl.as_secs())
            .ok_or_else(|| MediSnowError::cache("TTL overflow"))?;
        let entry = StoredEntry { value, expires_at };
        let bytes = postcard::to_stdvec(&entry)?;

        task::spawn_blocking(move || store.insert(key, bytes))
            .await
            .map_err(join_error)??;
        Ok(())
    }

    /// Retrieves a value if it exists and has not expired.
    /// Expired entries are removed and reported as misses.
    #[tracing::instrument(name = "query_cache", level = "debug", skip(self))]
    pub async fn get<T: DeserializeOwned + Send + 'static>(&self, key: &str) -> Result<Option<T>> {
        let store = self.store.clone();
        let key_bytes = key.as_bytes().to_vec();

        let maybe_bytes = task::spawn_blocking(move || {
            store.get(key_bytes).map(|v| v.map(|bytes| bytes.to_vec()))
        })
        .await
        .map_err(join_error)??;

        let Some(bytes) = maybe_bytes else {
            tracing::debug!("Key not found");
            return Ok(None);
        };

        let entry: StoredEntry<T> = postcard::from_bytes(&bytes)?;
        if unix_now()? < entry.expires_at {
            tracing::debug!("Key found and still fresh");
            Ok(Some(entry.value))
        } else {
            tracing::debug!("Key found but expired");
            self.remove(key).await?;
            Ok(None)
        }
    }

    /// Manually removes a key from the cache.
    pub async fn remove(&self, key: &str) -> Result<()> {
        let key = key.as_bytes().to_vec();
        let store = self.store.clone();
        task::spawn_blocking(move || store.remove(key))
            .await
            .map_err(join_error)??;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_put_then_get() {
        let dir = tempfile::tempdir().unwrap();
        let cache = PersistentCache::open(dir.path()).unwrap();

        cache
            .put("map-layer", "{\"features\":[]}".to_string(), Duration::from_secs(3600))
            .await
            .unwrap();

        let value: Option<String> = cache.get("map-layer").await.unwrap();
        assert_eq!(value.as_deref(), Some("{\"features\":[]}"));
    }

    #[tokio::test]
    async fn test_missing_key_is_a_miss() {
        let dir = tempfile::tempdir().unwrap();
        let cache = PersistentCache::open(dir.path()).unwrap();
        let value: Option<String> = cache.get("absent").await.unwrap();
        assert!(value.is_none());
    }

    #[tokio::test]
    async fn test_expired_entry_is_removed() {
        let dir = tempfile::tempdir().unwrap();
        let cache = PersistentCache::open(dir.path()).unwrap();

        cache.put("stale", 42u32, Duration::ZERO).await.unwrap();

        let value: Option<u32> = cache.get("stale").await.unwrap();
        assert!(value.is_none());
    }

    #[tokio::test]
    async fn test_remove() {
        let dir = tempfile::tempdir().unwrap();
        let cache = PersistentCache::open(dir.path()).unwrap();

        cache.put("key", 1u8, Duration::from_secs(60)).await.unwrap();
        cache.remove("key").await.unwrap();

        let value: Option<u8> = cache.get("key").await.unwrap();
        assert!(value.is_none());
    }

    #[test]
    fn test_jitter_stays_within_ten_percent() {
        let ttl = Duration::from_secs(86_400);
        for _ in 0..100 {
            let jittered = jittered(ttl);
            assert!(jittered >= ttl.mul_f64(0.9));
            assert!(jittered <= ttl.mul_f64(1.1));
        }
    }
}
