//! Provider abstraction for Tagrove.
//!
//! This module provides trait-based contracts for storage backends and
//! asset discovery, a generic provider registry for dynamic resolution by
//! name, and the concrete backends (local filesystem, in-memory, cloud
//! blob storage, image search).
//!
//! # Design Principles
//! - Uniform contracts: callers never branch on concrete backend type
//! - Two-phase construction: zero-argument factories plus `initialize(options)`
//! - Bootstrap lifecycle: registries are populated once, then read-only
//! - Unified error semantics: consistent error types across providers

pub mod asset;
pub mod blob;
pub mod defaults;
pub mod image_search;
pub mod local;
pub mod memory;
pub mod provider;
pub mod registry;

pub use asset::{AssetProvider, ReadOnlyAssetStorage};
pub use blob::{BlobStorage, BlobStorageOptions};
pub use defaults::{default_asset_registry, default_storage_registry};
pub use image_search::{AspectRatio, ImageSearch, ImageSearchOptions};
pub use local::{LocalFileSystem, LocalFileSystemOptions};
pub use memory::MemoryStorage;
pub use provider::{Provider, StorageProvider};
pub use registry::{ProviderFactory, ProviderRegistry, Registration};

/// Registry of storage provider factories.
pub type StorageRegistry = ProviderRegistry<dyn StorageProvider>;

/// Registry of asset provider factories.
pub type AssetRegistry = ProviderRegistry<dyn AssetProvider>;
