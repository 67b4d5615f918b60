//! Adapter configuration loaded from environment variables.
//!
//! | Variable | Meaning |
//! |---|---|
//! | `<CHAIN>_RPC_URL` | JSON-RPC endpoint per chain, e.g. `ETHEREUM_RPC_URL` |
//! | `DEFI_ADAPTERS_CACHE` | `file`, `memory` (default) or `none` |
//! | `DEFI_ADAPTERS_CACHE_DIR` | root of the file cache, default `./metadata` |

use std::collections::HashMap;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use crate::cache::{FileMetadataCache, InMemoryMetadataCache, MetadataCache, NoopMetadataCache};
use crate::chain::Chain;
use crate::error::AdapterError;

pub const CACHE_BACKEND_VAR: &str = "DEFI_ADAPTERS_CACHE";
pub const CACHE_DIR_VAR: &str = "DEFI_ADAPTERS_CACHE_DIR";
const DEFAULT_CACHE_DIR: &str = "./metadata";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CacheBackend {
    File,
    #[default]
    Memory,
    None,
}

impl FromStr for CacheBackend {
    type Err = AdapterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "file" => Ok(CacheBackend::File),
            "memory" => Ok(CacheBackend::Memory),
            "none" | "off" => Ok(CacheBackend::None),
            other => Err(AdapterError::ConfigError(format!(
                "Unknown cache backend '{other}' (expected file, memory or none)"
            ))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AdapterConfig {
    pub rpc_urls: HashMap<Chain, String>,
    pub cache_backend: CacheBackend,
    pub cache_dir: PathBuf,
}

impl Default for AdapterConfig {
    fn default() -> Self {
        Self {
            rpc_urls: HashMap::new(),
            cache_backend: CacheBackend::default(),
            cache_dir: PathBuf::from(DEFAULT_CACHE_DIR),
        }
    }
}

impl AdapterConfig {
    /// Load from the process environment.
    pub fn from_env() -> Result<Self, AdapterError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AdapterError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut rpc_urls = HashMap::new();
        for chain in Chain::ALL {
            let var = rpc_url_var(chain);
            if let Some(url) = lookup(&var).filter(|v| !v.trim().is_empty()) {
                url::Url::parse(url.trim()).map_err(|e| {
                    AdapterError::ConfigError(format!("{var} is not a valid URL: {e}"))
                })?;
                rpc_urls.insert(chain, url.trim().to_string());
            }
        }

        let cache_backend = match lookup(CACHE_BACKEND_VAR) {
            Some(v) if !v.trim().is_empty() => v.parse::<CacheBackend>()?,
            _ => CacheBackend::default(),
        };

        let cache_dir = lookup(CACHE_DIR_VAR)
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CACHE_DIR));

        tracing::debug!(
            "Adapter config: {} RPC endpoints, cache={:?} at {}",
            rpc_urls.len(),
            cache_backend,
            cache_dir.display(),
        );

        Ok(Self {
            rpc_urls,
            cache_backend,
            cache_dir,
        })
    }

    pub fn with_rpc_url(mut self, chain: Chain, url: impl Into<String>) -> Self {
        self.rpc_urls.insert(chain, url.into());
        self
    }

    pub fn rpc_url(&self, chain: Chain) -> Result<&str, AdapterError> {
        self.rpc_urls
            .get(&chain)
            .map(String::as_str)
            .ok_or_else(|| AdapterError::ConfigError(format!("{} is not set", rpc_url_var(chain))))
    }

    /// Build the configured metadata cache.
    pub fn cache(&self) -> Arc<dyn MetadataCache> {
        match self.cache_backend {
            CacheBackend::File => Arc::new(FileMetadataCache::new(self.cache_dir.clone())),
            CacheBackend::Memory => Arc::new(InMemoryMetadataCache::new()),
            CacheBackend::None => Arc::new(NoopMetadataCache),
        }
    }
}

/// `ETHEREUM_RPC_URL`, `ARBITRUM_RPC_URL`, ...
pub fn rpc_url_var(chain: Chain) -> String {
    format!("{}_RPC_URL", chain.name().to_ascii_uppercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = AdapterConfig::from_lookup(|_| None).unwrap();
        assert!(config.rpc_urls.is_empty());
        assert_eq!(config.cache_backend, CacheBackend::Memory);
        assert_eq!(config.cache_dir, PathBuf::from("./metadata"));
    }

    #[test]
    fn test_reads_rpc_urls_and_cache() {
        let config = AdapterConfig::from_lookup(lookup_from(&[
            ("ETHEREUM_RPC_URL", "https://eth.example.com"),
            ("ARBITRUM_RPC_URL", "http://localhost:8545"),
            ("DEFI_ADAPTERS_CACHE", "file"),
            ("DEFI_ADAPTERS_CACHE_DIR", "/tmp/adapters"),
        ]))
        .unwrap();

        assert_eq!(config.rpc_url(Chain::Ethereum).unwrap(), "https://eth.example.com");
        assert_eq!(config.rpc_url(Chain::Arbitrum).unwrap(), "http://localhost:8545");
        assert_eq!(config.cache_backend, CacheBackend::File);
        assert_eq!(config.cache_dir, PathBuf::from("/tmp/adapters"));
    }

    #[test]
    fn test_missing_rpc_url() {
        let config = AdapterConfig::default();
        let err = config.rpc_url(Chain::Polygon).unwrap_err();
        assert!(err.to_string().contains("POLYGON_RPC_URL"));
    }

    #[test]
    fn test_invalid_rpc_url() {
        let result = AdapterConfig::from_lookup(lookup_from(&[("BASE_RPC_URL", "not a url")]));
        assert!(matches!(result, Err(AdapterError::ConfigError(_))));
    }

    #[test]
    fn test_invalid_cache_backend() {
        let result = AdapterConfig::from_lookup(lookup_from(&[("DEFI_ADAPTERS_CACHE", "redis")]));
        assert!(result.is_err());
    }
}
