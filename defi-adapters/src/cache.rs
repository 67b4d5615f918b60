//! Metadata cache collaborator.
//!
//! Adapters never memoize their own metadata. They hand a [`CacheKey`] and a
//! compute future to [`get_or_compute`], and whichever [`MetadataCache`] the
//! caller injected decides whether the future runs.

use std::collections::HashMap;
use std::future::Future;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::chain::Chain;
use crate::error::AdapterError;
use crate::types::MetadataMap;

/// Identifies one cached metadata document.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub protocol_id: String,
    pub product_id: String,
    pub chain: Chain,
    pub file_key: String,
}

impl CacheKey {
    pub fn new(
        protocol_id: impl Into<String>,
        product_id: impl Into<String>,
        chain: Chain,
        file_key: impl Into<String>,
    ) -> Self {
        Self {
            protocol_id: protocol_id.into(),
            product_id: product_id.into(),
            chain,
            file_key: file_key.into(),
        }
    }

    /// Path relative to a cache root: `<protocol>/<product>/<chain>.<file_key>.json`.
    pub fn relative_path(&self) -> PathBuf {
        Path::new(&self.protocol_id)
            .join(&self.product_id)
            .join(format!("{}.{}.json", self.chain, self.file_key))
    }
}

#[async_trait]
pub trait MetadataCache: Send + Sync {
    async fn load(&self, key: &CacheKey) -> Result<Option<MetadataMap>, AdapterError>;

    async fn store(&self, key: &CacheKey, metadata: &MetadataMap) -> Result<(), AdapterError>;
}

/// Return the cached metadata for `key`, or run `compute` and cache its result.
///
/// Errors from `compute` propagate and nothing is stored.
pub async fn get_or_compute<F, Fut>(
    cache: &dyn MetadataCache,
    key: &CacheKey,
    compute: F,
) -> Result<MetadataMap, AdapterError>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<MetadataMap, AdapterError>>,
{
    if let Some(cached) = cache.load(key).await? {
        tracing::debug!("Metadata cache hit: {}", key.relative_path().display());
        return Ok(cached);
    }

    tracing::debug!("Metadata cache miss: {}", key.relative_path().display());
    let metadata = compute().await?;
    cache.store(key, &metadata).await?;
    Ok(metadata)
}

/// JSON files under a root directory.
#[derive(Debug, Clone)]
pub struct FileMetadataCache {
    root: PathBuf,
}

impl FileMetadataCache {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn path_for(&self, key: &CacheKey) -> PathBuf {
        self.root.join(key.relative_path())
    }
}

#[async_trait]
impl MetadataCache for FileMetadataCache {
    async fn load(&self, key: &CacheKey) -> Result<Option<MetadataMap>, AdapterError> {
        let path = self.path_for(key);
        let contents = match tokio::fs::read_to_string(&path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        match serde_json::from_str(&contents) {
            Ok(metadata) => Ok(Some(metadata)),
            Err(e) => {
                tracing::warn!("Ignoring unreadable cache file {}: {e}", path.display());
                Ok(None)
            }
        }
    }

    async fn store(&self, key: &CacheKey, metadata: &MetadataMap) -> Result<(), AdapterError> {
        let path = self.path_for(key);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let json = serde_json::to_string_pretty(metadata)?;
        // readers only ever see a complete file
        let tmp = path.with_extension(format!("json.{}.tmp", std::process::id()));
        tokio::fs::write(&tmp, json).await?;
        if let Err(e) = tokio::fs::rename(&tmp, &path).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(e.into());
        }
        tracing::debug!("Wrote metadata cache file {}", path.display());
        Ok(())
    }
}

/// Process-lifetime cache.
#[derive(Debug, Default)]
pub struct InMemoryMetadataCache {
    entries: RwLock<HashMap<CacheKey, MetadataMap>>,
}

impl InMemoryMetadataCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn entry_count(&self) -> usize {
        self.entries.read().await.len()
    }
}

#[async_trait]
impl MetadataCache for InMemoryMetadataCache {
    async fn load(&self, key: &CacheKey) -> Result<Option<MetadataMap>, AdapterError> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn store(&self, key: &CacheKey, metadata: &MetadataMap) -> Result<(), AdapterError> {
        self.entries
            .write()
            .await
            .insert(key.clone(), metadata.clone());
        Ok(())
    }
}

/// Never caches; every call recomputes.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopMetadataCache;

#[async_trait]
impl MetadataCache for NoopMetadataCache {
    async fn load(&self, _key: &CacheKey) -> Result<Option<MetadataMap>, AdapterError> {
        Ok(None)
    }

    async fn store(&self, _key: &CacheKey, _metadata: &MetadataMap) -> Result<(), AdapterError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Erc20Metadata, ProtocolTokenMetadata};
    use alloy::primitives::Address;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn key() -> CacheKey {
        CacheKey::new("angle-protocol", "transmuter", Chain::Ethereum, "transmuter")
    }

    fn sample() -> MetadataMap {
        let token = Erc20Metadata {
            address: Address::repeat_byte(0x11),
            name: "Token".into(),
            symbol: "TKN".into(),
            decimals: 18,
        };
        let mut map = MetadataMap::new();
        map.insert(
            token.address,
            ProtocolTokenMetadata {
                protocol_token: token.clone(),
                underlying_tokens: vec![token],
            },
        );
        map
    }

    #[test]
    fn test_relative_path() {
        assert_eq!(
            key().relative_path(),
            PathBuf::from("angle-protocol/transmuter/ethereum.transmuter.json")
        );
    }

    #[tokio::test]
    async fn test_in_memory_computes_once() {
        let cache = InMemoryMetadataCache::new();
        let calls = &AtomicUsize::new(0);

        for _ in 0..3 {
            let result = get_or_compute(&cache, &key(), move || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok::<_, AdapterError>(sample())
            })
            .await
            .unwrap();
            assert_eq!(result, sample());
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(cache.entry_count().await, 1);
    }

    #[tokio::test]
    async fn test_compute_error_is_not_cached() {
        let cache = InMemoryMetadataCache::new();
        let result = get_or_compute(&cache, &key(), || async {
            Err::<MetadataMap, _>(AdapterError::ProviderError("rpc down".into()))
        })
        .await;
        assert!(matches!(result, Err(AdapterError::ProviderError(_))));
        assert_eq!(cache.entry_count().await, 0);
    }

    #[tokio::test]
    async fn test_noop_always_recomputes() {
        let cache = NoopMetadataCache;
        let calls = &AtomicUsize::new(0);
        for _ in 0..2 {
            get_or_compute(&cache, &key(), move || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok::<_, AdapterError>(sample())
            })
            .await
            .unwrap();
        }
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_file_cache_persists_across_instances() {
        let dir = tempfile::tempdir().unwrap();

        let first = FileMetadataCache::new(dir.path());
        assert!(first.load(&key()).await.unwrap().is_none());
        first.store(&key(), &sample()).await.unwrap();
        assert!(first.path_for(&key()).exists());

        let second = FileMetadataCache::new(dir.path());
        let loaded = get_or_compute(&second, &key(), || async {
            Err::<MetadataMap, _>(AdapterError::CacheError("expected a disk hit".into()))
        })
        .await
        .unwrap();
        assert_eq!(loaded, sample());
    }

    #[tokio::test]
    async fn test_file_cache_treats_unreadable_file_as_miss() {
        let dir = tempfile::tempdir().unwrap();
        let cache = FileMetadataCache::new(dir.path());
        let path = cache.path_for(&key());
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();

        for contents in ["", "not json", "{\"0x"] {
            std::fs::write(&path, contents).unwrap();
            assert_eq!(cache.load(&key()).await.unwrap(), None);
        }
    }

    #[tokio::test]
    async fn test_file_cache_store_replaces_file() {
        let dir = tempfile::tempdir().unwrap();
        let cache = FileMetadataCache::new(dir.path());
        let path = cache.path_for(&key());
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "").unwrap();

        cache.store(&key(), &MetadataMap::new()).await.unwrap();
        assert_eq!(cache.load(&key()).await.unwrap(), Some(MetadataMap::new()));

        let leftovers: Vec<_> = std::fs::read_dir(path.parent().unwrap())
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert_eq!(leftovers.len(), 1);
    }
}
