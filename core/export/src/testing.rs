//! Shared fixtures for export provider tests.

use std::collections::HashMap;
use std::sync::Arc;

use tagrove_common::{
    Asset, AssetMetadata, AssetState, BoundingBox, Connection, ExportFormat, Project, Region,
    RegionType, Tag,
};
use tagrove_storage::{MemoryStorage, Registration, StorageProvider, StorageRegistry};

use crate::provider::ASSET_METADATA_SUFFIX;

/// Registry whose "memory" provider hands out clones sharing `store`.
pub(crate) fn storage_registry_with(store: MemoryStorage) -> Arc<StorageRegistry> {
    let mut registry = StorageRegistry::new();
    registry
        .register(Registration::new(
            "memory",
            "In Memory",
            "Volatile storage for testing",
            Arc::new(move || Box::new(store.clone()) as Box<dyn StorageProvider>),
        ))
        .unwrap();
    Arc::new(registry)
}

/// Metadata with a single rectangular "cat" region.
pub(crate) fn tagged_metadata(asset: &Asset) -> AssetMetadata {
    AssetMetadata {
        asset: asset.clone(),
        regions: vec![Region {
            id: "region-1".to_string(),
            region_type: RegionType::Rectangle,
            tags: vec!["cat".to_string()],
            points: Vec::new(),
            bounding_box: BoundingBox {
                left: 10.0,
                top: 20.0,
                width: 100.0,
                height: 50.0,
            },
        }],
        timestamp: None,
    }
}

/// Build a project targeting the memory store, seeding a metadata
/// document for every asset in the Tagged state.
pub(crate) async fn seeded_project(
    store: &MemoryStorage,
    files: &[(&str, AssetState)],
) -> Project {
    let mut assets = HashMap::new();
    for (name, state) in files {
        let mut asset = Asset::from_file_path(format!("/data/{}", name));
        asset.state = *state;
        if *state == AssetState::Tagged {
            let metadata = tagged_metadata(&asset);
            let json = serde_json::to_string(&metadata).unwrap();
            store
                .write_text(&format!("{}{}", asset.id, ASSET_METADATA_SUFFIX), &json)
                .await
                .unwrap();
        }
        assets.insert(asset.id.clone(), asset);
    }

    let connection = Connection {
        id: "connection-1".to_string(),
        name: "Target".to_string(),
        description: String::new(),
        provider_type: "memory".to_string(),
        provider_options: serde_json::Value::Null,
    };

    Project {
        id: "project-1".to_string(),
        name: "Test Project".to_string(),
        assets,
        export_format: ExportFormat {
            provider_type: "tagroveJson".to_string(),
            provider_options: serde_json::Value::Null,
        },
        source_connection: connection.clone(),
        target_connection: connection,
        tags: vec![
            Tag {
                name: "cat".to_string(),
                color: "#e81123".to_string(),
            },
            Tag {
                name: "dog".to_string(),
                color: "#0078d7".to_string(),
            },
        ],
        auto_save: true,
    }
}
