//! Cloud blob storage provider implementation.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use tagrove_common::{Asset, Error, Result, StorageType};

use crate::asset::AssetProvider;
use crate::provider::{assets_from_paths, Provider, StorageProvider};

use super::client::BlobClient;

/// Cloud blob storage options.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlobStorageOptions {
    /// Storage account name.
    pub account_name: String,
    /// Default container for file operations.
    pub container_name: String,
    /// Shared access signature query string.
    pub sas: String,
    /// Create the default container during initialization if absent.
    #[serde(default)]
    pub create_container: bool,
}

/// Cloud blob storage provider.
///
/// File paths are blob names within the configured default container;
/// container operations address the account level.
pub struct BlobStorage {
    options: Option<BlobStorageOptions>,
    client: Option<BlobClient>,
}

impl BlobStorage {
    /// Create an unconfigured provider. Call `initialize` before use.
    pub fn new() -> Self {
        Self {
            options: None,
            client: None,
        }
    }

    fn client(&self) -> Result<&BlobClient> {
        self.client.as_ref().ok_or_else(|| {
            Error::InvalidInput("Blob storage provider is not initialized".to_string())
        })
    }

    fn options(&self) -> Result<&BlobStorageOptions> {
        self.options.as_ref().ok_or_else(|| {
            Error::InvalidInput("Blob storage provider is not initialized".to_string())
        })
    }

    fn container_or_default<'a>(&'a self, container: &'a str) -> Result<&'a str> {
        if container.is_empty() {
            Ok(self.options()?.container_name.as_str())
        } else {
            Ok(container)
        }
    }
}

impl Default for BlobStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Provider for BlobStorage {
    async fn initialize(&mut self, options: &serde_json::Value) -> Result<()> {
        let options: BlobStorageOptions = serde_json::from_value(options.clone())
            .map_err(|e| Error::InvalidInput(format!("Invalid blob storage options: {}", e)))?;

        let client = BlobClient::new(&options.account_name, &options.sas);
        if options.create_container {
            let created = client.create_container(&options.container_name).await?;
            if created {
                info!(container = %options.container_name, "created blob container");
            }
        }

        debug!(account = %options.account_name, "blob storage initialized");
        self.client = Some(client);
        self.options = Some(options);
        Ok(())
    }
}

#[async_trait]
impl StorageProvider for BlobStorage {
    fn storage_type(&self) -> StorageType {
        StorageType::Cloud
    }

    async fn read_text(&self, path: &str) -> Result<String> {
        let bytes = self.read_binary(path).await?;
        String::from_utf8(bytes)
            .map_err(|e| Error::Serialization(format!("Blob is not valid UTF-8: {}", e)))
    }

    async fn read_binary(&self, path: &str) -> Result<Vec<u8>> {
        let container = &self.options()?.container_name;
        let bytes = self.client()?.get_blob(container, path).await?;
        Ok(bytes.to_vec())
    }

    async fn write_text(&self, path: &str, contents: &str) -> Result<()> {
        self.write_binary(path, contents.as_bytes()).await
    }

    async fn write_binary(&self, path: &str, contents: &[u8]) -> Result<()> {
        let container = &self.options()?.container_name;
        self.client()?
            .put_blob(container, path, contents.to_vec())
            .await
    }

    async fn delete_file(&self, path: &str) -> Result<()> {
        let container = &self.options()?.container_name;
        self.client()?.delete_blob(container, path).await
    }

    async fn list_files(&self, container: &str) -> Result<Vec<String>> {
        let container = self.container_or_default(container)?;
        self.client()?.list_blobs(container).await
    }

    async fn list_containers(&self) -> Result<Vec<String>> {
        self.client()?.list_containers().await
    }

    async fn create_container(&self, name: &str) -> Result<()> {
        // Existing containers are tolerated; the client reports them as
        // not-created rather than an error.
        self.client()?.create_container(name).await?;
        Ok(())
    }

    async fn delete_container(&self, name: &str) -> Result<()> {
        self.client()?.delete_container(name).await
    }

    async fn get_assets(&self, container: &str) -> Result<Vec<Asset>> {
        let container = self.container_or_default(container)?;
        let client = self.client()?;
        let blobs = client.list_blobs(container).await?;
        Ok(assets_from_paths(
            blobs.iter().map(|blob| client.blob_url(container, blob)),
        ))
    }
}

#[async_trait]
impl AssetProvider for BlobStorage {
    async fn get_assets(&self, container: Option<&str>) -> Result<Vec<Asset>> {
        StorageProvider::get_assets(self, container.unwrap_or("")).await
    }
}
