//! Pascal VOC export provider.
//!
//! Writes the Pascal VOC directory layout to the target connection:
//! per-asset annotation XML under `Annotations/`, per-tag image set
//! lists under `ImageSets/Main/`, and a `pascal_label_map.pbtxt`
//! mapping tag names to numeric class ids.

use async_trait::async_trait;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::info;

use tagrove_common::{AssetMetadata, Error, Project, Result};
use tagrove_storage::{Provider, StorageProvider, StorageRegistry};

use crate::provider::{
    assets_for_export, export_file_stem, load_asset_metadata, target_storage, ExportOptions,
    ExportProvider,
};

/// Annotation document for a single asset.
#[derive(Debug, Serialize)]
#[serde(rename = "annotation")]
struct Annotation {
    folder: String,
    filename: String,
    path: String,
    source: Source,
    size: Size,
    segmented: u8,
    #[serde(rename = "object")]
    objects: Vec<VocObject>,
}

#[derive(Debug, Serialize)]
struct Source {
    database: String,
}

#[derive(Debug, Serialize)]
struct Size {
    width: u32,
    height: u32,
    depth: u32,
}

#[derive(Debug, Serialize)]
struct VocObject {
    name: String,
    pose: String,
    truncated: u8,
    difficult: u8,
    bndbox: BndBox,
}

// Pascal VOC uses integer pixel coordinates.
#[derive(Debug, Serialize)]
struct BndBox {
    xmin: i64,
    ymin: i64,
    xmax: i64,
    ymax: i64,
}

/// Exports a project's tagged regions in the Pascal VOC layout.
///
/// Annotation and list files only; the image payloads stay on their
/// source connection. Re-running overwrites previous output.
pub struct PascalVocExport {
    storage: Arc<StorageRegistry>,
    options: ExportOptions,
}

impl PascalVocExport {
    /// Create an exporter resolving target connections through `storage`.
    pub fn new(storage: Arc<StorageRegistry>) -> Self {
        Self {
            storage,
            options: ExportOptions::default(),
        }
    }

    fn annotation(metadata: &AssetMetadata) -> Annotation {
        let asset = &metadata.asset;
        let (width, height) = asset
            .size
            .map(|s| (s.width, s.height))
            .unwrap_or((0, 0));

        let objects = metadata
            .regions
            .iter()
            .flat_map(|region| {
                let bounding_box = region.bounding_box;
                region.tags.iter().map(move |tag| VocObject {
                    name: tag.clone(),
                    pose: "Unspecified".to_string(),
                    truncated: 0,
                    difficult: 0,
                    bndbox: BndBox {
                        xmin: bounding_box.left.round() as i64,
                        ymin: bounding_box.top.round() as i64,
                        xmax: (bounding_box.left + bounding_box.width).round() as i64,
                        ymax: (bounding_box.top + bounding_box.height).round() as i64,
                    },
                })
            })
            .collect();

        Annotation {
            folder: "Annotations".to_string(),
            filename: asset.name.clone(),
            path: asset.path.clone(),
            source: Source {
                database: "Unknown".to_string(),
            },
            size: Size {
                width,
                height,
                depth: 3,
            },
            segmented: 0,
            objects,
        }
    }
}

/// File name stem of an asset (name without extension).
fn asset_stem(name: &str) -> &str {
    name.rsplit_once('.').map(|(stem, _)| stem).unwrap_or(name)
}

#[async_trait]
impl Provider for PascalVocExport {
    async fn initialize(&mut self, options: &serde_json::Value) -> Result<()> {
        self.options = ExportOptions::from_value(options)?;
        Ok(())
    }
}

#[async_trait]
impl ExportProvider for PascalVocExport {
    async fn export(&self, project: &Project) -> Result<()> {
        let target = target_storage(&self.storage, project).await?;
        let root = format!("{}-PascalVOC-export", export_file_stem(&project.name));

        for container in [
            root.clone(),
            format!("{}/Annotations", root),
            format!("{}/ImageSets", root),
            format!("{}/ImageSets/Main", root),
        ] {
            target
                .create_container(&container)
                .await
                .map_err(|e| Error::export(format!("Failed to create '{}'", container), e))?;
        }

        // tag name -> (asset stem -> included)
        let mut image_sets: BTreeMap<&str, BTreeMap<String, bool>> = project
            .tags
            .iter()
            .map(|tag| (tag.name.as_str(), BTreeMap::new()))
            .collect();

        let assets = assets_for_export(project, self.options.asset_state);
        for asset in &assets {
            let metadata = load_asset_metadata(target.as_ref(), asset)
                .await
                .map_err(|e| Error::export(format!("Failed to load metadata for '{}'", asset.name), e))?;

            let annotation = Self::annotation(&metadata);
            let xml = quick_xml::se::to_string(&annotation)
                .map_err(|e| Error::Serialization(format!("Failed to serialize annotation: {}", e)))?;

            let stem = asset_stem(&asset.name);
            let path = format!("{}/Annotations/{}.xml", root, stem);
            target
                .write_text(&path, &xml)
                .await
                .map_err(|e| Error::export(format!("Failed to write '{}'", path), e))?;

            let tagged: Vec<&String> = metadata.regions.iter().flat_map(|r| &r.tags).collect();
            for (tag, members) in image_sets.iter_mut() {
                let included = tagged.iter().any(|t| t.as_str() == *tag);
                members.insert(stem.to_string(), included);
            }
        }

        for (tag, members) in &image_sets {
            let lines: Vec<String> = members
                .iter()
                .map(|(stem, included)| {
                    format!("{} {}", stem, if *included { 1 } else { -1 })
                })
                .collect();
            let path = format!("{}/ImageSets/Main/{}.txt", root, tag);
            target
                .write_text(&path, &lines.join("\n"))
                .await
                .map_err(|e| Error::export(format!("Failed to write '{}'", path), e))?;
        }

        let label_map: String = project
            .tags
            .iter()
            .enumerate()
            .map(|(i, tag)| {
                format!("item {{\n    id: {}\n    display_name: '{}'\n}}\n", i + 1, tag.name)
            })
            .collect();
        let label_map_path = format!("{}/pascal_label_map.pbtxt", root);
        target
            .write_text(&label_map_path, &label_map)
            .await
            .map_err(|e| Error::export(format!("Failed to write '{}'", label_map_path), e))?;

        info!(project = %project.name, assets = assets.len(), "Pascal VOC export complete");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{seeded_project, storage_registry_with};
    use tagrove_common::AssetState;
    use tagrove_storage::MemoryStorage;

    #[test]
    fn test_asset_stem() {
        assert_eq!(asset_stem("photo.jpg"), "photo");
        assert_eq!(asset_stem("archive.tar.gz"), "archive.tar");
        assert_eq!(asset_stem("noext"), "noext");
    }

    #[tokio::test]
    async fn test_export_writes_voc_layout() {
        let store = MemoryStorage::new();
        let registry = storage_registry_with(store.clone());
        let project = seeded_project(
            &store,
            &[
                ("one.jpg", AssetState::Tagged),
                ("two.jpg", AssetState::NotVisited),
            ],
        )
        .await;

        let mut provider = PascalVocExport::new(registry);
        provider.initialize(&serde_json::Value::Null).await.unwrap();
        provider.export(&project).await.unwrap();

        let root = "Test-Project-PascalVOC-export";

        let annotation = store
            .read_text(&format!("{}/Annotations/one.xml", root))
            .await
            .unwrap();
        assert!(annotation.starts_with("<annotation>"));
        assert!(annotation.contains("<filename>one.jpg</filename>"));
        assert!(annotation.contains("<name>cat</name>"));
        assert!(annotation.contains("<xmin>10</xmin>"));
        assert!(annotation.contains("<xmax>110</xmax>"));

        let image_set = store
            .read_text(&format!("{}/ImageSets/Main/cat.txt", root))
            .await
            .unwrap();
        assert!(image_set.contains("one 1"));

        let label_map = store
            .read_text(&format!("{}/pascal_label_map.pbtxt", root))
            .await
            .unwrap();
        assert!(label_map.contains("id: 1"));
        assert!(label_map.contains("display_name: 'cat'"));
    }

    #[tokio::test]
    async fn test_untagged_assets_excluded_by_default() {
        let store = MemoryStorage::new();
        let registry = storage_registry_with(store.clone());
        let project = seeded_project(&store, &[("one.jpg", AssetState::Visited)]).await;

        let mut provider = PascalVocExport::new(registry);
        provider.initialize(&serde_json::Value::Null).await.unwrap();
        provider.export(&project).await.unwrap();

        let root = "Test-Project-PascalVOC-export";
        let result = store
            .read_text(&format!("{}/Annotations/one.xml", root))
            .await;
        assert!(result.is_err());

        // Label map still lists the project's tags.
        assert!(store
            .read_text(&format!("{}/pascal_label_map.pbtxt", root))
            .await
            .is_ok());
    }
}
