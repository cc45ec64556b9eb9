//! Export provider contract and shared export plumbing.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use tagrove_common::{Asset, AssetMetadata, AssetState, Error, Project, Result};
use tagrove_storage::{Provider, StorageProvider, StorageRegistry};

/// File suffix for per-asset metadata documents on target storage.
pub const ASSET_METADATA_SUFFIX: &str = "-asset.json";

/// Which asset states an export includes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportAssetState {
    All,
    Visited,
    Tagged,
}

impl Default for ExportAssetState {
    fn default() -> Self {
        ExportAssetState::Tagged
    }
}

impl ExportAssetState {
    /// Whether an asset in `state` is included by this filter.
    ///
    /// `Visited` includes tagged assets: tagging implies the asset was
    /// visited.
    pub fn matches(&self, state: AssetState) -> bool {
        match self {
            ExportAssetState::All => true,
            ExportAssetState::Visited => {
                state == AssetState::Visited || state == AssetState::Tagged
            }
            ExportAssetState::Tagged => state == AssetState::Tagged,
        }
    }
}

/// Options shared by export providers.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportOptions {
    /// Asset-state filter; defaults to exporting tagged assets only.
    #[serde(default)]
    pub asset_state: ExportAssetState,
}

impl ExportOptions {
    /// Parse options from a configuration blob; `null` means defaults.
    pub fn from_value(options: &serde_json::Value) -> Result<Self> {
        if options.is_null() {
            return Ok(Self::default());
        }
        serde_json::from_value(options.clone())
            .map_err(|e| Error::InvalidInput(format!("Invalid export options: {}", e)))
    }
}

/// Export provider contract.
///
/// Consumes a project and writes its tagged assets to the project's
/// target connection in a format-specific layout. Exports have no
/// rollback: a failure may leave partial output behind, and re-running
/// overwrites it.
#[async_trait]
pub trait ExportProvider: Provider {
    /// Export the project to its target connection.
    ///
    /// # Errors
    /// - `Export` wrapping any underlying storage failure
    async fn export(&self, project: &Project) -> Result<()>;
}

/// Resolve the project's target connection to a live storage provider.
pub(crate) async fn target_storage(
    registry: &StorageRegistry,
    project: &Project,
) -> Result<Box<dyn StorageProvider>> {
    registry
        .create(
            &project.target_connection.provider_type,
            project.target_connection.provider_options.clone(),
        )
        .await
        .map_err(|e| Error::export("Failed to open target connection", e))
}

/// Project assets matching the filter, ordered by name for stable output.
pub(crate) fn assets_for_export(project: &Project, filter: ExportAssetState) -> Vec<&Asset> {
    let mut assets: Vec<&Asset> = project
        .assets
        .values()
        .filter(|asset| filter.matches(asset.state))
        .collect();
    assets.sort_by(|a, b| a.name.cmp(&b.name));
    assets
}

/// Load an asset's tagging metadata from target storage.
///
/// Assets that were never tagged have no metadata document; they export
/// with empty regions rather than failing.
pub(crate) async fn load_asset_metadata(
    storage: &dyn StorageProvider,
    asset: &Asset,
) -> Result<AssetMetadata> {
    let path = format!("{}{}", asset.id, ASSET_METADATA_SUFFIX);
    match storage.read_text(&path).await {
        Ok(json) => serde_json::from_str(&json)
            .map_err(|e| Error::Serialization(format!("Invalid asset metadata '{}': {}", path, e))),
        Err(Error::NotFound(_)) => Ok(AssetMetadata::new(asset.clone())),
        Err(e) => Err(e),
    }
}

/// File-name-safe stem derived from a project name.
pub(crate) fn export_file_stem(project_name: &str) -> String {
    project_name.replace(' ', "-")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_asset_state_filter() {
        assert!(ExportAssetState::All.matches(AssetState::NotVisited));
        assert!(ExportAssetState::Visited.matches(AssetState::Tagged));
        assert!(ExportAssetState::Visited.matches(AssetState::Visited));
        assert!(!ExportAssetState::Visited.matches(AssetState::NotVisited));
        assert!(ExportAssetState::Tagged.matches(AssetState::Tagged));
        assert!(!ExportAssetState::Tagged.matches(AssetState::Visited));
    }

    #[test]
    fn test_options_default_to_tagged() {
        let options = ExportOptions::from_value(&serde_json::Value::Null).unwrap();
        assert_eq!(options.asset_state, ExportAssetState::Tagged);

        let options =
            ExportOptions::from_value(&serde_json::json!({"assetState": "all"})).unwrap();
        assert_eq!(options.asset_state, ExportAssetState::All);
    }

    #[test]
    fn test_export_file_stem() {
        assert_eq!(export_file_stem("My Test Project"), "My-Test-Project");
    }
}
