//! Domain model shared across Tagrove modules.

use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// File extensions recognized as images.
pub const IMAGE_EXTENSIONS: &[&str] = &["gif", "jpg", "jpeg", "tif", "tiff", "png", "bmp"];

/// File extensions recognized as videos.
pub const VIDEO_EXTENSIONS: &[&str] = &["mp4", "mov", "avi", "m4v", "mpg", "mpeg", "wmv"];

/// Media type of an asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AssetType {
    Image,
    Video,
    Unknown,
}

impl AssetType {
    /// Classify an asset type from its file format (lowercase extension).
    pub fn from_format(format: &str) -> Self {
        if IMAGE_EXTENSIONS.contains(&format) {
            AssetType::Image
        } else if VIDEO_EXTENSIONS.contains(&format) {
            AssetType::Video
        } else {
            AssetType::Unknown
        }
    }
}

/// Tagging workflow state of an asset.
///
/// States only move forward under the normal workflow:
/// NotVisited -> Visited -> Tagged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AssetState {
    NotVisited,
    Visited,
    Tagged,
}

/// Pixel dimensions of an asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetSize {
    pub width: u32,
    pub height: u32,
}

/// A taggable media item discovered from a container.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    /// Unique identifier for the asset.
    pub id: String,
    /// Display name (file name including extension).
    pub name: String,
    /// Full path or URL of the asset within its source.
    pub path: String,
    /// File format (lowercase extension, e.g. "jpg").
    pub format: String,
    /// Media type classified from the format.
    #[serde(rename = "type")]
    pub asset_type: AssetType,
    /// Tagging workflow state.
    pub state: AssetState,
    /// Pixel dimensions, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<AssetSize>,
}

impl Asset {
    /// Create an asset from a file path or URL.
    ///
    /// The name is the final path segment, the format is the lowercased
    /// extension, and the type is classified from the format. New assets
    /// start in the NotVisited state with a fresh id.
    pub fn from_file_path(path: impl Into<String>) -> Self {
        let path = path.into();
        // Query strings and fragments (e.g. SAS tokens on signed blob
        // URLs) are not part of the file name.
        let trimmed = match path.find(['?', '#']) {
            Some(i) => &path[..i],
            None => path.as_str(),
        };
        let name = Path::new(trimmed)
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(trimmed)
            .to_string();
        let format = Path::new(&name)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        Self {
            id: Uuid::new_v4().to_string(),
            name,
            asset_type: AssetType::from_format(&format),
            format,
            path,
            state: AssetState::NotVisited,
            size: None,
        }
    }
}

/// Shape of a tagged region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RegionType {
    Rectangle,
    Polygon,
    Point,
}

/// A 2D point in asset pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// Axis-aligned bounding box of a region.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

/// A tagged region within an asset.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Region {
    pub id: String,
    #[serde(rename = "type")]
    pub region_type: RegionType,
    /// Tag names applied to this region.
    pub tags: Vec<String>,
    pub points: Vec<Point>,
    pub bounding_box: BoundingBox,
}

/// Tagging metadata persisted alongside an asset.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetMetadata {
    pub asset: Asset,
    pub regions: Vec<Region>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

impl AssetMetadata {
    /// Empty metadata for an asset that has never been tagged.
    pub fn new(asset: Asset) -> Self {
        Self {
            asset,
            regions: Vec::new(),
            timestamp: None,
        }
    }
}

/// A tag definition with its display color.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub name: String,
    /// Hex color string, e.g. "#e81123".
    pub color: String,
}

/// Classifies a provider instance's backend nature.
///
/// Used by callers for read-only behavioral branching (e.g. enabling a
/// folder picker only for Local) without exposing the concrete backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StorageType {
    Local,
    Cloud,
    Other,
}

impl fmt::Display for StorageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageType::Local => write!(f, "local"),
            StorageType::Cloud => write!(f, "cloud"),
            StorageType::Other => write!(f, "other"),
        }
    }
}

/// A named, persisted binding of a provider type to its options.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Key into the storage/asset provider registry.
    pub provider_type: String,
    /// Backend-specific configuration blob.
    #[serde(default)]
    pub provider_options: serde_json::Value,
}

/// Export target format selection persisted with a project.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportFormat {
    /// Key into the export provider registry.
    pub provider_type: String,
    /// Format-specific configuration blob.
    #[serde(default)]
    pub provider_options: serde_json::Value,
}

/// A tagging project.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub name: String,
    /// Known assets keyed by asset id.
    #[serde(default)]
    pub assets: HashMap<String, Asset>,
    pub export_format: ExportFormat,
    pub source_connection: Connection,
    pub target_connection: Connection,
    #[serde(default)]
    pub tags: Vec<Tag>,
    #[serde(default)]
    pub auto_save: bool,
}
