//! In-memory storage provider for testing and development.

use async_trait::async_trait;
use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, RwLock};

use tagrove_common::{Asset, Error, Result, StorageType};

use crate::asset::AssetProvider;
use crate::provider::{assets_from_paths, normalize_path, Provider, StorageProvider};

#[derive(Debug, Default)]
struct Inner {
    files: HashMap<String, Vec<u8>>,
    containers: BTreeSet<String>,
}

/// In-memory storage provider.
///
/// All data lives in process memory and is lost when the last clone is
/// dropped; clones share the same underlying store. Unlike other
/// backends, an instance is internally locked and safe to share across
/// concurrent operations.
#[derive(Clone)]
pub struct MemoryStorage {
    inner: Arc<RwLock<Inner>>,
}

impl MemoryStorage {
    /// Create a new empty memory provider.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(Inner::default())),
        }
    }
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Provider for MemoryStorage {
    async fn initialize(&mut self, _options: &serde_json::Value) -> Result<()> {
        // Nothing to configure.
        Ok(())
    }
}

#[async_trait]
impl StorageProvider for MemoryStorage {
    fn storage_type(&self) -> StorageType {
        StorageType::Other
    }

    async fn read_text(&self, path: &str) -> Result<String> {
        let bytes = self.read_binary(path).await?;
        String::from_utf8(bytes)
            .map_err(|e| Error::Serialization(format!("File is not valid UTF-8: {}", e)))
    }

    async fn read_binary(&self, path: &str) -> Result<Vec<u8>> {
        let key = normalize_path(path)?;
        let inner = self.inner.read().unwrap();
        inner
            .files
            .get(&key)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("File not found: {}", path)))
    }

    async fn write_text(&self, path: &str, contents: &str) -> Result<()> {
        self.write_binary(path, contents.as_bytes()).await
    }

    async fn write_binary(&self, path: &str, contents: &[u8]) -> Result<()> {
        let key = normalize_path(path)?;
        self.inner
            .write()
            .unwrap()
            .files
            .insert(key, contents.to_vec());
        Ok(())
    }

    async fn delete_file(&self, path: &str) -> Result<()> {
        let key = normalize_path(path)?;
        let mut inner = self.inner.write().unwrap();
        inner
            .files
            .remove(&key)
            .map(|_| ())
            .ok_or_else(|| Error::NotFound(format!("File not found: {}", path)))
    }

    async fn list_files(&self, container: &str) -> Result<Vec<String>> {
        let container = normalize_path(container)?;
        let prefix = if container.is_empty() {
            String::new()
        } else {
            format!("{}/", container)
        };

        let inner = self.inner.read().unwrap();
        Ok(inner
            .files
            .keys()
            .filter(|key| {
                key.strip_prefix(&prefix)
                    .is_some_and(|rest| !rest.contains('/'))
            })
            .cloned()
            .collect())
    }

    async fn list_containers(&self) -> Result<Vec<String>> {
        let inner = self.inner.read().unwrap();
        Ok(inner.containers.iter().cloned().collect())
    }

    async fn create_container(&self, name: &str) -> Result<()> {
        let name = normalize_path(name)?;
        let mut inner = self.inner.write().unwrap();
        if inner.files.contains_key(&name) {
            return Err(Error::Conflict(format!(
                "'{}' already exists and is not a container",
                name
            )));
        }
        // Re-creating an existing container is a no-op.
        inner.containers.insert(name);
        Ok(())
    }

    async fn delete_container(&self, name: &str) -> Result<()> {
        let name = normalize_path(name)?;
        let mut inner = self.inner.write().unwrap();
        if !inner.containers.remove(&name) {
            return Err(Error::NotFound(format!("Container not found: {}", name)));
        }
        let prefix = format!("{}/", name);
        inner.files.retain(|key, _| !key.starts_with(&prefix));
        Ok(())
    }

    async fn get_assets(&self, container: &str) -> Result<Vec<Asset>> {
        let files = self.list_files(container).await?;
        Ok(assets_from_paths(files))
    }
}

#[async_trait]
impl AssetProvider for MemoryStorage {
    async fn get_assets(&self, container: Option<&str>) -> Result<Vec<Asset>> {
        StorageProvider::get_assets(self, container.unwrap_or("")).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_write_read_round_trip() {
        let provider = MemoryStorage::new();
        provider.write_text("a.txt", "x").await.unwrap();
        assert_eq!(provider.read_text("a.txt").await.unwrap(), "x");
    }

    #[tokio::test]
    async fn test_read_missing_fails() {
        let provider = MemoryStorage::new();
        let result = provider.read_binary("missing.bin").await;
        assert!(matches!(result, Err(Error::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_missing_fails() {
        let provider = MemoryStorage::new();
        let result = provider.delete_file("missing.txt").await;
        assert!(matches!(result, Err(Error::NotFound(_))));
    }

    #[tokio::test]
    async fn test_list_files_is_non_recursive() {
        let provider = MemoryStorage::new();
        provider.write_binary("c/a.jpg", &[1]).await.unwrap();
        provider.write_binary("c/nested/b.jpg", &[2]).await.unwrap();
        provider.write_binary("top.jpg", &[3]).await.unwrap();

        let files = provider.list_files("c").await.unwrap();
        assert_eq!(files, vec!["c/a.jpg".to_string()]);

        let root_files = provider.list_files("").await.unwrap();
        assert_eq!(root_files, vec!["top.jpg".to_string()]);
    }

    #[tokio::test]
    async fn test_container_lifecycle() {
        let provider = MemoryStorage::new();
        provider.create_container("images").await.unwrap();
        provider.create_container("images").await.unwrap();
        provider.write_binary("images/a.jpg", &[1]).await.unwrap();

        assert_eq!(
            provider.list_containers().await.unwrap(),
            vec!["images".to_string()]
        );

        provider.delete_container("images").await.unwrap();
        assert!(provider.list_containers().await.unwrap().is_empty());
        assert!(matches!(
            provider.read_binary("images/a.jpg").await,
            Err(Error::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_delete_missing_container_fails() {
        let provider = MemoryStorage::new();
        let result = provider.delete_container("nope").await;
        assert!(matches!(result, Err(Error::NotFound(_))));
    }
}
