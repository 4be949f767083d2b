use enum_dispatch::enum_dispatch;
use std::fmt::Display;
use triomphe::Arc;

pub use self::in_memory::InMemory as InMemoryCache;

mod in_memory;

pub type ArcCache<K, V> = Arc<AnyCache<K, V>>;
pub type CacheResult<T, E = Error> = Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Backend(Box<dyn std::error::Error + Send + Sync>),
}

#[enum_dispatch(CacheBackend<K, V>)]
pub enum AnyCache<K, V>
where
    K: Display + Send + Sync + ?Sized,
    V: Clone + Send + Sync + 'static,
{
    InMemory(InMemoryCache<K, V>),
    Noop(NoopCache),
}

#[enum_dispatch]
#[allow(async_fn_in_trait)] // Because of `enum_dispatch`
pub trait CacheBackend<K, V>: Send + Sync
where
    K: ?Sized,
{
    async fn delete(&self, key: &K) -> CacheResult<()>;
    async fn get(&self, key: &K) -> CacheResult<Option<V>>;
    async fn set(&self, key: &K, value: &V) -> CacheResult<()>;
}

#[derive(Clone)]
pub struct NoopCache;

impl<K, V> CacheBackend<K, V> for NoopCache
where
    K: Send + Sync + ?Sized,
    V: Send + Sync,
{
    async fn delete(&self, _key: &K) -> CacheResult<()> {
        Ok(())
    }

    async fn get(&self, _key: &K) -> CacheResult<Option<V>> {
        Ok(None)
    }

    async fn set(&self, _key: &K, _value: &V) -> CacheResult<()> {
        Ok(())
    }
}
