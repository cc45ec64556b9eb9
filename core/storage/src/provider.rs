//! Provider base trait and the storage provider contract.

use async_trait::async_trait;

use tagrove_common::{Asset, Result, StorageType};

/// Base trait for every pluggable provider.
///
/// Construction is two-phase: registries create providers through
/// zero-argument factories, then apply configuration with `initialize`.
/// This keeps the registry unaware of each backend's option shape.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Apply backend-specific options (credentials, paths, query terms).
    ///
    /// # Preconditions
    /// - `options` must match the backend's expected shape
    ///
    /// # Postconditions
    /// - Provider is ready for use; calling again with the same options
    ///   is a no-op (idempotent)
    ///
    /// # Errors
    /// - Options missing or malformed
    async fn initialize(&mut self, options: &serde_json::Value) -> Result<()>;
}

/// Storage provider contract for different backends.
///
/// All operations are async I/O-bound calls. A single instance is not
/// guaranteed safe for concurrent operations unless the backend documents
/// otherwise; errors always propagate to the caller.
///
/// Fixed policies across backends:
/// - writes overwrite existing content
/// - `delete_file` of a missing path is an error (`NotFound`)
/// - `create_container` of an existing container succeeds
#[async_trait]
pub trait StorageProvider: Provider {
    /// Backend classification, set at construction.
    ///
    /// Callers use this for read-only behavioral branching (e.g. showing
    /// a folder picker only for `Local`) without knowing the concrete type.
    fn storage_type(&self) -> StorageType;

    /// Read a file as UTF-8 text.
    ///
    /// # Errors
    /// - `NotFound` if the path is absent
    async fn read_text(&self, path: &str) -> Result<String>;

    /// Read a file as raw bytes.
    ///
    /// # Errors
    /// - `NotFound` if the path is absent
    async fn read_binary(&self, path: &str) -> Result<Vec<u8>>;

    /// Write text to a file, overwriting any existing content.
    async fn write_text(&self, path: &str, contents: &str) -> Result<()>;

    /// Write bytes to a file, overwriting any existing content.
    async fn write_binary(&self, path: &str, contents: &[u8]) -> Result<()>;

    /// Delete a file.
    ///
    /// # Errors
    /// - `NotFound` if the path is absent (delete is not idempotent)
    async fn delete_file(&self, path: &str) -> Result<()>;

    /// List files in a container, non-recursively.
    ///
    /// Returned paths are relative to the provider root and include the
    /// container prefix. Ordering is backend-native and not guaranteed
    /// stable across calls.
    async fn list_files(&self, container: &str) -> Result<Vec<String>>;

    /// List container names.
    async fn list_containers(&self) -> Result<Vec<String>>;

    /// Create a container.
    ///
    /// Succeeds if the container already exists.
    ///
    /// # Errors
    /// - `Conflict` if the name exists but is not a container
    async fn create_container(&self, name: &str) -> Result<()>;

    /// Delete a container and its contents.
    ///
    /// # Errors
    /// - `NotFound` if the container is absent
    async fn delete_container(&self, name: &str) -> Result<()>;

    /// Discover taggable assets in a container.
    ///
    /// Backends filter by known image extensions; non-image files are
    /// skipped rather than reported.
    async fn get_assets(&self, container: &str) -> Result<Vec<Asset>>;
}

/// Filter a file listing down to assets with recognized image formats.
pub(crate) fn assets_from_paths<I, S>(paths: I) -> Vec<Asset>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    paths
        .into_iter()
        .map(|p| Asset::from_file_path(p.into()))
        .filter(|a| a.asset_type == tagrove_common::AssetType::Image)
        .collect()
}

/// Normalize a provider-relative path.
///
/// Strips any leading separator and rejects parent-directory traversal so
/// backends never address files outside their root.
pub(crate) fn normalize_path(path: &str) -> Result<String> {
    let trimmed = path.trim_start_matches('/');
    if trimmed
        .split('/')
        .any(|component| component == ".." || component == ".")
    {
        return Err(tagrove_common::Error::InvalidInput(format!(
            "Path may not contain relative components: {}",
            path
        )));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_path_strips_leading_separator() {
        assert_eq!(normalize_path("/a/b.txt").unwrap(), "a/b.txt");
        assert_eq!(normalize_path("a.txt").unwrap(), "a.txt");
    }

    #[test]
    fn test_normalize_path_rejects_traversal() {
        assert!(normalize_path("../escape.txt").is_err());
        assert!(normalize_path("a/../../b").is_err());
        assert!(normalize_path("./a").is_err());
    }

    #[test]
    fn test_assets_from_paths_filters_non_images() {
        let assets = assets_from_paths(vec!["a.jpg", "b.txt", "c.png", "d.json"]);
        assert_eq!(assets.len(), 2);
        assert!(assets.iter().all(|a| a.format == "jpg" || a.format == "png"));
    }
}
