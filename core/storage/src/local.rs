//! Local filesystem storage provider.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tokio::fs;
use tracing::debug;

use tagrove_common::{Asset, Error, Result, StorageType};

use crate::asset::AssetProvider;
use crate::provider::{assets_from_paths, normalize_path, Provider, StorageProvider};

/// Options for the local filesystem provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalFileSystemOptions {
    /// Root directory for all file and container operations.
    pub folder_path: String,
}

/// Local filesystem storage provider.
///
/// Containers are immediate subdirectories of the configured root. All
/// paths are resolved beneath the root; traversal outside it is rejected.
pub struct LocalFileSystem {
    root: Option<PathBuf>,
}

impl LocalFileSystem {
    /// Create an unconfigured provider. Call `initialize` before use.
    pub fn new() -> Self {
        Self { root: None }
    }

    fn root(&self) -> Result<&PathBuf> {
        self.root.as_ref().ok_or_else(|| {
            Error::InvalidInput("Local file system provider is not initialized".to_string())
        })
    }

    /// Resolve a provider-relative path to a filesystem path.
    fn resolve(&self, path: &str) -> Result<PathBuf> {
        let normalized = normalize_path(path)?;
        Ok(self.root()?.join(normalized))
    }
}

impl Default for LocalFileSystem {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Provider for LocalFileSystem {
    async fn initialize(&mut self, options: &serde_json::Value) -> Result<()> {
        let options: LocalFileSystemOptions = serde_json::from_value(options.clone())
            .map_err(|e| Error::InvalidInput(format!("Invalid local file system options: {}", e)))?;

        let root = PathBuf::from(options.folder_path);
        if !root.exists() {
            fs::create_dir_all(&root).await?;
        }
        debug!(root = %root.display(), "local file system initialized");
        self.root = Some(root);
        Ok(())
    }
}

#[async_trait]
impl StorageProvider for LocalFileSystem {
    fn storage_type(&self) -> StorageType {
        StorageType::Local
    }

    async fn read_text(&self, path: &str) -> Result<String> {
        let bytes = self.read_binary(path).await?;
        String::from_utf8(bytes)
            .map_err(|e| Error::Serialization(format!("File is not valid UTF-8: {}", e)))
    }

    async fn read_binary(&self, path: &str) -> Result<Vec<u8>> {
        let fs_path = self.resolve(path)?;
        if !fs_path.is_file() {
            return Err(Error::NotFound(format!("File not found: {}", path)));
        }
        Ok(fs::read(&fs_path).await?)
    }

    async fn write_text(&self, path: &str, contents: &str) -> Result<()> {
        self.write_binary(path, contents.as_bytes()).await
    }

    async fn write_binary(&self, path: &str, contents: &[u8]) -> Result<()> {
        let fs_path = self.resolve(path)?;
        if let Some(parent) = fs_path.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::write(&fs_path, contents).await?;
        Ok(())
    }

    async fn delete_file(&self, path: &str) -> Result<()> {
        let fs_path = self.resolve(path)?;
        if fs_path.is_dir() {
            return Err(Error::InvalidInput(
                "Use delete_container for directories".to_string(),
            ));
        }
        if !fs_path.exists() {
            return Err(Error::NotFound(format!("File not found: {}", path)));
        }
        fs::remove_file(&fs_path).await?;
        Ok(())
    }

    async fn list_files(&self, container: &str) -> Result<Vec<String>> {
        let container = normalize_path(container)?;
        let dir = self.root()?.join(&container);
        if !dir.is_dir() {
            return Err(Error::NotFound(format!(
                "Container not found: {}",
                container
            )));
        }

        let mut results = Vec::new();
        let mut entries = fs::read_dir(&dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            if entry.file_type().await?.is_file() {
                let name = entry.file_name().to_string_lossy().to_string();
                if container.is_empty() {
                    results.push(name);
                } else {
                    results.push(format!("{}/{}", container, name));
                }
            }
        }
        Ok(results)
    }

    async fn list_containers(&self) -> Result<Vec<String>> {
        let mut results = Vec::new();
        let mut entries = fs::read_dir(self.root()?).await?;
        while let Some(entry) = entries.next_entry().await? {
            if entry.file_type().await?.is_dir() {
                results.push(entry.file_name().to_string_lossy().to_string());
            }
        }
        Ok(results)
    }

    async fn create_container(&self, name: &str) -> Result<()> {
        let fs_path = self.resolve(name)?;
        if fs_path.is_file() {
            return Err(Error::Conflict(format!(
                "'{}' already exists and is not a container",
                name
            )));
        }
        fs::create_dir_all(&fs_path).await?;
        Ok(())
    }

    async fn delete_container(&self, name: &str) -> Result<()> {
        let fs_path = self.resolve(name)?;
        if !fs_path.exists() {
            return Err(Error::NotFound(format!("Container not found: {}", name)));
        }
        if !fs_path.is_dir() {
            return Err(Error::InvalidInput(format!("'{}' is not a container", name)));
        }
        fs::remove_dir_all(&fs_path).await?;
        Ok(())
    }

    async fn get_assets(&self, container: &str) -> Result<Vec<Asset>> {
        let root = self.root()?.clone();
        let files = self.list_files(container).await?;
        Ok(assets_from_paths(
            files
                .iter()
                .map(|f| root.join(f).to_string_lossy().to_string()),
        ))
    }
}

#[async_trait]
impl AssetProvider for LocalFileSystem {
    async fn get_assets(&self, container: Option<&str>) -> Result<Vec<Asset>> {
        StorageProvider::get_assets(self, container.unwrap_or("")).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    async fn provider(temp: &TempDir) -> LocalFileSystem {
        let mut provider = LocalFileSystem::new();
        provider
            .initialize(&serde_json::json!({
                "folderPath": temp.path().to_string_lossy(),
            }))
            .await
            .unwrap();
        provider
    }

    #[tokio::test]
    async fn test_write_read_round_trip() {
        let temp = TempDir::new().unwrap();
        let provider = provider(&temp).await;

        provider.write_text("a.txt", "hello").await.unwrap();
        assert_eq!(provider.read_text("a.txt").await.unwrap(), "hello");

        let files = provider.list_files("").await.unwrap();
        assert!(files.contains(&"a.txt".to_string()));
    }

    #[tokio::test]
    async fn test_write_overwrites() {
        let temp = TempDir::new().unwrap();
        let provider = provider(&temp).await;

        provider.write_text("a.txt", "first").await.unwrap();
        provider.write_text("a.txt", "second").await.unwrap();
        assert_eq!(provider.read_text("a.txt").await.unwrap(), "second");
    }

    #[tokio::test]
    async fn test_initialize_creates_missing_root() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("nested").join("root");

        let mut provider = LocalFileSystem::new();
        provider
            .initialize(&serde_json::json!({
                "folderPath": root.to_string_lossy(),
            }))
            .await
            .unwrap();

        provider.write_text("a.txt", "x").await.unwrap();
        assert!(root.join("a.txt").is_file());
    }

    #[tokio::test]
    async fn test_read_missing_fails() {
        let temp = TempDir::new().unwrap();
        let provider = provider(&temp).await;

        let result = provider.read_text("missing.txt").await;
        assert!(matches!(result, Err(Error::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_missing_fails() {
        let temp = TempDir::new().unwrap();
        let provider = provider(&temp).await;

        let result = provider.delete_file("never-written.txt").await;
        assert!(matches!(result, Err(Error::NotFound(_))));
    }

    #[tokio::test]
    async fn test_create_container_is_idempotent() {
        let temp = TempDir::new().unwrap();
        let provider = provider(&temp).await;

        provider.create_container("images").await.unwrap();
        provider.create_container("images").await.unwrap();

        let containers = provider.list_containers().await.unwrap();
        assert_eq!(containers, vec!["images".to_string()]);
    }

    #[tokio::test]
    async fn test_create_container_over_file_conflicts() {
        let temp = TempDir::new().unwrap();
        let provider = provider(&temp).await;

        provider.write_text("images", "not a dir").await.unwrap();
        let result = provider.create_container("images").await;
        assert!(matches!(result, Err(Error::Conflict(_))));
    }

    #[tokio::test]
    async fn test_delete_container_removes_contents() {
        let temp = TempDir::new().unwrap();
        let provider = provider(&temp).await;

        provider.write_text("images/a.jpg", "x").await.unwrap();
        provider.delete_container("images").await.unwrap();

        let result = provider.list_files("images").await;
        assert!(matches!(result, Err(Error::NotFound(_))));
    }

    #[tokio::test]
    async fn test_get_assets_filters_images() {
        let temp = TempDir::new().unwrap();
        let provider = provider(&temp).await;

        provider.write_binary("images/a.jpg", &[1]).await.unwrap();
        provider.write_binary("images/b.PNG", &[2]).await.unwrap();
        provider.write_text("images/notes.txt", "x").await.unwrap();

        let assets = StorageProvider::get_assets(&provider, "images").await.unwrap();
        assert_eq!(assets.len(), 2);
        assert!(assets.iter().all(|a| a.asset_type == tagrove_common::AssetType::Image));
    }

    #[tokio::test]
    async fn test_path_traversal_rejected() {
        let temp = TempDir::new().unwrap();
        let provider = provider(&temp).await;

        let result = provider.read_text("../outside.txt").await;
        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_uninitialized_provider_fails() {
        let provider = LocalFileSystem::new();
        let result = provider.read_text("a.txt").await;
        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }
}
