use serde::{Deserialize, Serialize};
use std::path::Path;
use tokio::fs;

#[derive(Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct Configuration {
    pub server: ServerConfiguration,
    #[serde(default)]
    pub federation: FederationConfiguration,
}

#[derive(Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct ServerConfiguration {
    pub port: u16,
    #[serde(default = "default_max_body_size")]
    pub max_body_size: usize,
}

#[derive(Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct FederationConfiguration {
    pub resolver_timeout_secs: u64,
    pub resolver_attempts: u32,
    pub per_host_concurrency: usize,
    pub key_cache_size: u64,
    pub key_cache_ttl_secs: u64,
    /// Header names every signature has to cover, on top of whatever
    /// the peer chose to sign
    pub required_covered_headers: Vec<String>,
}

impl Default for FederationConfiguration {
    fn default() -> Self {
        Self {
            resolver_timeout_secs: 10,
            resolver_attempts: 3,
            per_host_concurrency: 4,
            key_cache_size: 1000,
            key_cache_ttl_secs: 300,
            required_covered_headers: Vec::new(),
        }
    }
}

fn default_max_body_size() -> usize {
    1024 * 1024
}

impl Configuration {
    pub async fn load<P>(path: P) -> eyre::Result<Self>
    where
        P: AsRef<Path>,
    {
        let content = fs::read_to_string(path).await?;
        toml::from_str(&content).map_err(eyre::Report::from)
    }
}
