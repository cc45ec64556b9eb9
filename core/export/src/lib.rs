//! Export provider abstraction for Tagrove.
//!
//! The outbound counterpart of the storage layer: export providers
//! consume a project with its tagged assets and produce output in a
//! target format on the project's target connection. Formats register in
//! an [`ExportRegistry`] during bootstrap and are resolved by name from
//! persisted project configuration.

pub mod defaults;
pub mod json;
pub mod pascal_voc;
pub mod provider;

#[cfg(test)]
pub(crate) mod testing;

pub use defaults::default_export_registry;
pub use json::JsonExport;
pub use pascal_voc::PascalVocExport;
pub use provider::{ExportAssetState, ExportOptions, ExportProvider, ASSET_METADATA_SUFFIX};

use tagrove_storage::ProviderRegistry;

/// Registry of export provider factories.
pub type ExportRegistry = ProviderRegistry<dyn ExportProvider>;
