//! Native JSON export provider.

use async_trait::async_trait;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::info;

use tagrove_common::{AssetMetadata, Error, Project, Result, Tag};
use tagrove_storage::{Provider, StorageProvider, StorageRegistry};

use crate::provider::{
    assets_for_export, export_file_stem, load_asset_metadata, target_storage, ExportOptions,
    ExportProvider,
};

/// Top-level document written by the JSON exporter.
///
/// A project snapshot without its connections (which may hold
/// credentials), plus the metadata of every exported asset keyed by id.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ExportDocument<'a> {
    id: &'a str,
    name: &'a str,
    tags: &'a [Tag],
    assets: BTreeMap<&'a str, AssetMetadata>,
}

/// Exports a project and its tagged regions as a single JSON file on the
/// target connection. Re-running overwrites the previous export.
pub struct JsonExport {
    storage: Arc<StorageRegistry>,
    options: ExportOptions,
}

impl JsonExport {
    /// Create an exporter resolving target connections through `storage`.
    pub fn new(storage: Arc<StorageRegistry>) -> Self {
        Self {
            storage,
            options: ExportOptions::default(),
        }
    }
}

#[async_trait]
impl Provider for JsonExport {
    async fn initialize(&mut self, options: &serde_json::Value) -> Result<()> {
        self.options = ExportOptions::from_value(options)?;
        Ok(())
    }
}

#[async_trait]
impl ExportProvider for JsonExport {
    async fn export(&self, project: &Project) -> Result<()> {
        let target = target_storage(&self.storage, project).await?;

        let mut assets = BTreeMap::new();
        for asset in assets_for_export(project, self.options.asset_state) {
            let metadata = load_asset_metadata(target.as_ref(), asset)
                .await
                .map_err(|e| Error::export(format!("Failed to load metadata for '{}'", asset.name), e))?;
            assets.insert(asset.id.as_str(), metadata);
        }

        let exported = assets.len();
        let document = ExportDocument {
            id: &project.id,
            name: &project.name,
            tags: &project.tags,
            assets,
        };

        let json = serde_json::to_string_pretty(&document)
            .map_err(|e| Error::Serialization(format!("Failed to serialize export: {}", e)))?;
        let file_name = format!("{}-export.json", export_file_stem(&project.name));
        target
            .write_text(&file_name, &json)
            .await
            .map_err(|e| Error::export(format!("Failed to write '{}'", file_name), e))?;

        info!(project = %project.name, file = %file_name, assets = exported, "JSON export complete");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{seeded_project, storage_registry_with};
    use tagrove_common::AssetState;
    use tagrove_storage::MemoryStorage;

    #[tokio::test]
    async fn test_export_includes_only_tagged_assets() {
        let store = MemoryStorage::new();
        let registry = storage_registry_with(store.clone());

        // 3 assets, exactly one tagged.
        let project = seeded_project(
            &store,
            &[
                ("one.jpg", AssetState::NotVisited),
                ("two.jpg", AssetState::Visited),
                ("three.jpg", AssetState::Tagged),
            ],
        )
        .await;

        let mut provider = JsonExport::new(registry);
        provider
            .initialize(&serde_json::json!({"assetState": "tagged"}))
            .await
            .unwrap();
        provider.export(&project).await.unwrap();

        let output = store
            .read_text("Test-Project-export.json")
            .await
            .unwrap();
        let document: serde_json::Value = serde_json::from_str(&output).unwrap();

        let assets = document["assets"].as_object().unwrap();
        assert_eq!(assets.len(), 1);
        let (_, metadata) = assets.iter().next().unwrap();
        assert_eq!(metadata["asset"]["name"], "three.jpg");
        assert_eq!(metadata["regions"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_export_all_includes_untagged_with_empty_regions() {
        let store = MemoryStorage::new();
        let registry = storage_registry_with(store.clone());

        let project = seeded_project(
            &store,
            &[
                ("one.jpg", AssetState::NotVisited),
                ("two.jpg", AssetState::Tagged),
            ],
        )
        .await;

        let mut provider = JsonExport::new(registry);
        provider
            .initialize(&serde_json::json!({"assetState": "all"}))
            .await
            .unwrap();
        provider.export(&project).await.unwrap();

        let output = store
            .read_text("Test-Project-export.json")
            .await
            .unwrap();
        let document: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(document["assets"].as_object().unwrap().len(), 2);
        assert_eq!(document["name"], "Test Project");
    }

    #[tokio::test]
    async fn test_rerunning_export_overwrites() {
        let store = MemoryStorage::new();
        let registry = storage_registry_with(store.clone());
        let project = seeded_project(&store, &[("one.jpg", AssetState::Tagged)]).await;

        let mut provider = JsonExport::new(registry);
        provider.initialize(&serde_json::Value::Null).await.unwrap();
        provider.export(&project).await.unwrap();
        provider.export(&project).await.unwrap();

        assert!(store.read_text("Test-Project-export.json").await.is_ok());
    }

    #[tokio::test]
    async fn test_unknown_target_provider_is_export_error() {
        let store = MemoryStorage::new();
        let registry = storage_registry_with(store.clone());
        let mut project = seeded_project(&store, &[("one.jpg", AssetState::Tagged)]).await;
        project.target_connection.provider_type = "unregistered".to_string();

        let provider = JsonExport::new(registry);
        let result = provider.export(&project).await;
        assert!(matches!(result, Err(Error::Export { .. })));
    }

    #[tokio::test]
    async fn test_corrupt_metadata_is_an_error() {
        let store = MemoryStorage::new();
        let registry = storage_registry_with(store.clone());
        let project = seeded_project(&store, &[("one.jpg", AssetState::Tagged)]).await;

        let asset = project.assets.values().next().unwrap();
        store
            .write_text(&format!("{}-asset.json", asset.id), "{not json")
            .await
            .unwrap();

        let provider = JsonExport::new(storage_registry_with(store.clone()));
        let result = provider.export(&project).await;
        assert!(matches!(result, Err(Error::Export { .. })));
    }
}
