//! Common utilities and types shared across Tagrove modules.
//!
//! This module provides the domain model (assets, projects, connections)
//! and the error taxonomy used throughout the codebase.

pub mod error;
pub mod types;

pub use error::{Error, Result};
pub use types::{
    Asset, AssetMetadata, AssetSize, AssetState, AssetType, BoundingBox, Connection, ExportFormat,
    Point, Project, Region, RegionType, StorageType, Tag,
};
