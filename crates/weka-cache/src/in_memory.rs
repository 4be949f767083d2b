use crate::{CacheBackend, CacheResult};
use moka::future::Cache;
use std::{fmt::Display, marker::PhantomData, time::Duration};

/// Bounded in-process cache with per-entry time-to-live
pub struct InMemory<K, V>
where
    K: ?Sized,
{
    inner: Cache<String, V>,
    _key_type: PhantomData<K>,
}

impl<K, V> InMemory<K, V>
where
    K: Display + ?Sized,
    V: Clone + Send + Sync + 'static,
{
    #[must_use]
    pub fn new(size: u64, ttl: Duration) -> Self {
        Self {
            inner: Cache::builder()
                .time_to_live(ttl)
                .max_capacity(size)
                .build(),
            _key_type: PhantomData,
        }
    }
}

impl<K, V> CacheBackend<K, V> for InMemory<K, V>
where
    K: Display + Send + Sync + ?Sized,
    V: Clone + Send + Sync + 'static,
{
    async fn delete(&self, key: &K) -> CacheResult<()> {
        self.inner.remove(&key.to_string()).await;
        Ok(())
    }

    async fn get(&self, key: &K) -> CacheResult<Option<V>> {
        Ok(self.inner.get(&key.to_string()).await)
    }

    async fn set(&self, key: &K, value: &V) -> CacheResult<()> {
        self.inner.insert(key.to_string(), value.clone()).await;
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use crate::{CacheBackend, InMemoryCache};
    use std::time::Duration;

    #[tokio::test]
    async fn entries_expire() {
        let cache = InMemoryCache::new(10, Duration::from_millis(10));
        cache
            .set(&"https://example.com/users/test", &"key material")
            .await
            .unwrap();
        assert!(cache
            .get(&"https://example.com/users/test")
            .await
            .unwrap()
            .is_some());

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(cache
            .get(&"https://example.com/users/test")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn capacity_is_bounded() {
        let cache = InMemoryCache::new(1, Duration::from_secs(60));
        cache.set(&"first", &"entry").await.unwrap();
        cache.set(&"second", &"entry").await.unwrap();

        cache.inner.run_pending_tasks().await;

        assert_eq!(cache.inner.entry_count(), 1);
    }

    #[tokio::test]
    async fn delete_removes_entry() {
        let cache = InMemoryCache::new(10, Duration::from_secs(60));
        cache.set(&"ephemeral", &"entry").await.unwrap();
        cache.delete(&"ephemeral").await.unwrap();

        assert!(cache.get(&"ephemeral").await.unwrap().is_none());
    }
}
