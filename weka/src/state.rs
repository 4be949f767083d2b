use crate::config::Configuration;
use std::{sync::Arc, time::Duration};
use weka_cache::{AnyCache, InMemoryCache};
use weka_federation::{AuthPipeline, HttpActorResolver, JsonCanonicalizer};
use weka_http_client::Client;

pub type InboxPipeline = AuthPipeline<JsonCanonicalizer, HttpActorResolver>;

#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<InboxPipeline>,
}

pub fn initialise(config: &Configuration) -> eyre::Result<AppState> {
    let client = Client::builder()
        .default_header("Accept", "application/activity+json")?
        .timeout(Duration::from_secs(config.federation.resolver_timeout_secs))
        .build();

    Ok(initialise_with_client(config, client))
}

/// Wire up the application state around an existing HTTP client
///
/// Lets tests substitute the outbound transport.
#[must_use]
pub fn initialise_with_client(config: &Configuration, client: Client) -> AppState {
    let federation = &config.federation;

    let cache = triomphe::Arc::new(AnyCache::from(InMemoryCache::new(
        federation.key_cache_size,
        Duration::from_secs(federation.key_cache_ttl_secs),
    )));

    let resolver = HttpActorResolver::builder()
        .client(client)
        .cache(cache)
        .fetch_timeout(Duration::from_secs(federation.resolver_timeout_secs))
        .max_attempts(federation.resolver_attempts)
        .per_host_concurrency(federation.per_host_concurrency)
        .build();

    let pipeline = AuthPipeline::builder()
        .canonicalizer(JsonCanonicalizer)
        .resolver(resolver)
        .required_covered_headers(federation.required_covered_headers.clone())
        .build();

    AppState {
        pipeline: Arc::new(pipeline),
    }
}
