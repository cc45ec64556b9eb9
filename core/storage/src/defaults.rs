//! Default provider registrations for application bootstrap.
//!
//! Registration happens once here, before any lookups; afterwards the
//! registries are read-only and can be shared behind an `Arc`.

use std::sync::Arc;

use tagrove_common::StorageType;

use crate::asset::{AssetProvider, ReadOnlyAssetStorage};
use crate::blob::BlobStorage;
use crate::image_search::ImageSearch;
use crate::local::LocalFileSystem;
use crate::memory::MemoryStorage;
use crate::provider::StorageProvider;
use crate::registry::Registration;
use crate::{AssetRegistry, StorageRegistry};

/// Create the storage registry with all known backends.
pub fn default_storage_registry() -> StorageRegistry {
    let mut registry = StorageRegistry::new();

    registry
        .register(Registration::new(
            "localFileSystem",
            "Local File System",
            "Store assets in a folder on this computer",
            Arc::new(|| Box::new(LocalFileSystem::new()) as Box<dyn StorageProvider>),
        ))
        .expect("Failed to register local file system provider");

    // In-memory backend, for tests and development.
    registry
        .register(Registration::new(
            "memory",
            "In Memory",
            "Volatile storage for testing",
            Arc::new(|| Box::new(MemoryStorage::new()) as Box<dyn StorageProvider>),
        ))
        .expect("Failed to register memory provider");

    registry
        .register(Registration::new(
            "azureBlobStorage",
            "Azure Blob Storage",
            "Store assets in a cloud blob container",
            Arc::new(|| Box::new(BlobStorage::new()) as Box<dyn StorageProvider>),
        ))
        .expect("Failed to register blob storage provider");

    // Asset-only backend behind the read-only adapter so the UI can list
    // every provider type uniformly.
    registry
        .register(Registration::new(
            "bingImageSearch",
            "Bing Image Search",
            "Discover assets through image search",
            Arc::new(|| {
                Box::new(ReadOnlyAssetStorage::new(
                    ImageSearch::new(),
                    StorageType::Cloud,
                )) as Box<dyn StorageProvider>
            }),
        ))
        .expect("Failed to register image search provider");

    registry
}

/// Create the asset registry with all known backends.
pub fn default_asset_registry() -> AssetRegistry {
    let mut registry = AssetRegistry::new();

    registry
        .register(Registration::new(
            "localFileSystem",
            "Local File System",
            "Discover assets from a folder on this computer",
            Arc::new(|| Box::new(LocalFileSystem::new()) as Box<dyn AssetProvider>),
        ))
        .expect("Failed to register local file system provider");

    registry
        .register(Registration::new(
            "memory",
            "In Memory",
            "Volatile storage for testing",
            Arc::new(|| Box::new(MemoryStorage::new()) as Box<dyn AssetProvider>),
        ))
        .expect("Failed to register memory provider");

    registry
        .register(Registration::new(
            "azureBlobStorage",
            "Azure Blob Storage",
            "Discover assets from a cloud blob container",
            Arc::new(|| Box::new(BlobStorage::new()) as Box<dyn AssetProvider>),
        ))
        .expect("Failed to register blob storage provider");

    registry
        .register(Registration::new(
            "bingImageSearch",
            "Bing Image Search",
            "Discover assets through image search",
            Arc::new(|| Box::new(ImageSearch::new()) as Box<dyn AssetProvider>),
        ))
        .expect("Failed to register image search provider");

    registry
}
