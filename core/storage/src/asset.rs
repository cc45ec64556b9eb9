//! Asset provider contract and the read-only storage adapter.

use async_trait::async_trait;

use tagrove_common::{Asset, Error, Result, StorageType};

use crate::provider::{Provider, StorageProvider};

/// Asset provider contract.
///
/// A narrower interface than [`StorageProvider`], specialized for
/// discovering taggable assets from a named source. A backend may
/// implement both contracts (local filesystem, blob storage) or only this
/// one (an image-search API with no writable container concept).
#[async_trait]
pub trait AssetProvider: Provider {
    /// Discover assets, optionally scoped to a container or search term.
    ///
    /// `container` of `None` uses the source configured at initialization.
    async fn get_assets(&self, container: Option<&str>) -> Result<Vec<Asset>>;
}

/// Adapts an asset-only provider to the storage contract.
///
/// Lets asset-only backends sit behind the storage registry so callers
/// can enumerate every provider type uniformly. All write, delete, and
/// container operations fail with `Unsupported`.
pub struct ReadOnlyAssetStorage<A> {
    inner: A,
    storage_type: StorageType,
}

impl<A: AssetProvider> ReadOnlyAssetStorage<A> {
    /// Wrap an asset provider, tagging it with a backend classification.
    pub fn new(inner: A, storage_type: StorageType) -> Self {
        Self {
            inner,
            storage_type,
        }
    }

    fn unsupported(&self, operation: &str) -> Error {
        Error::Unsupported(format!(
            "{} is not available on an asset-only provider",
            operation
        ))
    }
}

#[async_trait]
impl<A: AssetProvider> Provider for ReadOnlyAssetStorage<A> {
    async fn initialize(&mut self, options: &serde_json::Value) -> Result<()> {
        self.inner.initialize(options).await
    }
}

#[async_trait]
impl<A: AssetProvider> StorageProvider for ReadOnlyAssetStorage<A> {
    fn storage_type(&self) -> StorageType {
        self.storage_type
    }

    async fn read_text(&self, _path: &str) -> Result<String> {
        Err(self.unsupported("read_text"))
    }

    async fn read_binary(&self, _path: &str) -> Result<Vec<u8>> {
        Err(self.unsupported("read_binary"))
    }

    async fn write_text(&self, _path: &str, _contents: &str) -> Result<()> {
        Err(self.unsupported("write_text"))
    }

    async fn write_binary(&self, _path: &str, _contents: &[u8]) -> Result<()> {
        Err(self.unsupported("write_binary"))
    }

    async fn delete_file(&self, _path: &str) -> Result<()> {
        Err(self.unsupported("delete_file"))
    }

    async fn list_files(&self, _container: &str) -> Result<Vec<String>> {
        Err(self.unsupported("list_files"))
    }

    async fn list_containers(&self) -> Result<Vec<String>> {
        Err(self.unsupported("list_containers"))
    }

    async fn create_container(&self, _name: &str) -> Result<()> {
        Err(self.unsupported("create_container"))
    }

    async fn delete_container(&self, _name: &str) -> Result<()> {
        Err(self.unsupported("delete_container"))
    }

    async fn get_assets(&self, container: &str) -> Result<Vec<Asset>> {
        let scope = if container.is_empty() {
            None
        } else {
            Some(container)
        };
        self.inner.get_assets(scope).await
    }
}
