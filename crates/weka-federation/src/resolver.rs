//!
//! Resolution of actor URIs to their published key material
//!

use http::StatusCode;
use miette::Diagnostic;
use std::{
    collections::HashMap,
    sync::{Arc, Mutex, Weak},
    time::Duration,
};
use thiserror::Error;
use tokio::sync::Semaphore;
use typed_builder::TypedBuilder;
use url::Url;
use weka_cache::{ArcCache, CacheBackend};
use weka_http_client::Client;
use weka_type::ap::Actor;

/// Public key material belonging to an actor
#[derive(Clone, Debug)]
pub struct ActorKey {
    pub actor_id: String,
    pub key_id: String,
    pub public_key_pem: String,
}

/// Resolution error
#[derive(Debug, Diagnostic, Error)]
pub enum ResolveError {
    /// Cache backend failed
    #[error(transparent)]
    Cache(#[from] weka_cache::Error),

    /// Remote fetch failed
    #[error(transparent)]
    Fetch(weka_http_client::Error),

    /// Remote answered with an unexpected status
    #[error("Unexpected status code: {0}")]
    BadStatus(StatusCode),

    /// Actor is unknown to this server and to its origin
    #[error("Unknown actor")]
    NotFound,

    /// Resolution didn't finish within its deadline
    #[error("Resolution timed out")]
    Timeout,
}

impl ResolveError {
    /// Whether retrying the resolution could change the result
    #[must_use]
    fn is_transient(&self) -> bool {
        !matches!(self, Self::NotFound)
    }
}

/// Maps actor URIs to their key material
#[allow(async_fn_in_trait)]
pub trait ResolveActor {
    /// Resolve an actor URI
    async fn resolve(&self, actor_id: &str) -> Result<ActorKey, ResolveError>;
}

/// Resolver that fetches actor documents over HTTP
///
/// Successful resolutions are cached. Fetches run under a per-host
/// concurrency cap and a per-attempt deadline, with a bounded number of
/// retries for transient failures.
#[derive(TypedBuilder)]
pub struct HttpActorResolver {
    client: Client,
    cache: ArcCache<str, ActorKey>,
    #[builder(default = Duration::from_secs(10))]
    fetch_timeout: Duration,
    #[builder(default = 3)]
    max_attempts: u32,
    #[builder(default = 4)]
    per_host_concurrency: usize,
    #[builder(default, setter(skip))]
    host_limits: Mutex<HashMap<String, Weak<Semaphore>>>,
}

impl HttpActorResolver {
    /// Entries whose semaphore is no longer held anywhere are pruned on
    /// every lookup, so the map only holds hosts with in-flight fetches.
    fn host_permit(&self, actor_id: &str) -> Arc<Semaphore> {
        let host = Url::parse(actor_id)
            .ok()
            .and_then(|url| url.host_str().map(str::to_string))
            .unwrap_or_default();

        let mut guard = self
            .host_limits
            .lock()
            .expect("[Bug] Host limit mutex poisoned");

        guard.retain(|_, semaphore| semaphore.strong_count() > 0);

        if let Some(semaphore) = guard.get(&host).and_then(Weak::upgrade) {
            return semaphore;
        }

        let semaphore = Arc::new(Semaphore::new(self.per_host_concurrency));
        guard.insert(host, Arc::downgrade(&semaphore));

        semaphore
    }

    async fn fetch(&self, actor_id: &str) -> Result<ActorKey, ResolveError> {
        let response = self
            .client
            .get(actor_id)
            .await
            .map_err(ResolveError::Fetch)?;

        match response.status() {
            StatusCode::NOT_FOUND | StatusCode::GONE => return Err(ResolveError::NotFound),
            status if !status.is_success() => return Err(ResolveError::BadStatus(status)),
            _ => (),
        }

        let Ok(actor) = response.json::<Actor>().await else {
            return Err(ResolveError::NotFound);
        };

        // The document has to actually describe the actor we asked for
        if actor.id != actor_id {
            debug!(requested = actor_id, returned = %actor.id, "actor id mismatch");
            return Err(ResolveError::NotFound);
        }

        Ok(ActorKey {
            actor_id: actor.id,
            key_id: actor.public_key.id,
            public_key_pem: actor.public_key.public_key_pem,
        })
    }

    fn backoff(attempt: u32) -> Duration {
        let base = Duration::from_millis(250 * 2_u64.pow(attempt));
        let jitter = Duration::from_millis(rand::random::<u64>() % 100);
        base + jitter
    }
}

impl ResolveActor for HttpActorResolver {
    async fn resolve(&self, actor_id: &str) -> Result<ActorKey, ResolveError> {
        if let Some(cached) = self.cache.get(actor_id).await? {
            return Ok(cached);
        }

        let semaphore = self.host_permit(actor_id);
        let _permit = semaphore
            .acquire()
            .await
            .expect("[Bug] Host semaphore closed");

        let mut attempt = 0;
        let actor_key = loop {
            let outcome = tokio::time::timeout(self.fetch_timeout, self.fetch(actor_id))
                .await
                .map_or(Err(ResolveError::Timeout), |outcome| outcome);

            match outcome {
                Ok(actor_key) => break actor_key,
                Err(error) => {
                    attempt += 1;
                    if !error.is_transient() || attempt >= self.max_attempts {
                        return Err(error);
                    }

                    debug!(actor_id, attempt, %error, "retrying actor resolution");
                    tokio::time::sleep(Self::backoff(attempt)).await;
                }
            }
        };

        self.cache.set(actor_id, &actor_key).await?;

        Ok(actor_key)
    }
}
