//! Image-search asset provider.
//!
//! Discovers assets through a Bing-style image search REST API. This is
//! an asset-only backend: it has no writable container concept, so it
//! enters the storage registry through the read-only adapter.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use tagrove_common::{Asset, Error, Result};

use crate::asset::AssetProvider;
use crate::provider::Provider;

/// Image search API endpoint.
const SEARCH_API_BASE: &str = "https://api.cognitive.microsoft.com/bing/v7.0/images/search";

/// Maximum results per search.
const RESULT_COUNT: u32 = 50;

/// Aspect ratio filter for search results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AspectRatio {
    All,
    Square,
    Wide,
    Tall,
}

impl Default for AspectRatio {
    fn default() -> Self {
        AspectRatio::All
    }
}

impl AspectRatio {
    fn as_param(&self) -> &'static str {
        match self {
            AspectRatio::All => "All",
            AspectRatio::Square => "Square",
            AspectRatio::Wide => "Wide",
            AspectRatio::Tall => "Tall",
        }
    }
}

/// Image search provider options.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageSearchOptions {
    /// API subscription key.
    pub api_key: String,
    /// Default search query.
    pub query: String,
    /// Aspect ratio filter.
    #[serde(default)]
    pub aspect_ratio: AspectRatio,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchResponse {
    #[serde(default)]
    value: Vec<SearchImage>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchImage {
    content_url: String,
}

/// Image-search asset provider.
pub struct ImageSearch {
    options: Option<ImageSearchOptions>,
    http: Client,
}

impl ImageSearch {
    /// Create an unconfigured provider. Call `initialize` before use.
    pub fn new() -> Self {
        let http = Client::builder()
            .user_agent("Tagrove/0.1")
            .build()
            .expect("Failed to create HTTP client");

        Self {
            options: None,
            http,
        }
    }

    fn options(&self) -> Result<&ImageSearchOptions> {
        self.options.as_ref().ok_or_else(|| {
            Error::InvalidInput("Image search provider is not initialized".to_string())
        })
    }
}

impl Default for ImageSearch {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Provider for ImageSearch {
    async fn initialize(&mut self, options: &serde_json::Value) -> Result<()> {
        let options: ImageSearchOptions = serde_json::from_value(options.clone())
            .map_err(|e| Error::InvalidInput(format!("Invalid image search options: {}", e)))?;
        self.options = Some(options);
        Ok(())
    }
}

#[async_trait]
impl AssetProvider for ImageSearch {
    async fn get_assets(&self, container: Option<&str>) -> Result<Vec<Asset>> {
        let options = self.options()?;
        let query = container.unwrap_or(&options.query);
        debug!(%query, "searching for images");

        let mut params = vec![
            ("q", query.to_string()),
            ("count", RESULT_COUNT.to_string()),
        ];
        if options.aspect_ratio != AspectRatio::All {
            params.push(("aspect", options.aspect_ratio.as_param().to_string()));
        }

        let response = self
            .http
            .get(SEARCH_API_BASE)
            .header("Ocp-Apim-Subscription-Key", &options.api_key)
            .query(&params)
            .send()
            .await
            .map_err(|e| Error::Network(format!("Image search failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Network(format!("Image search: HTTP {}", status)));
        }

        let results: SearchResponse = response
            .json()
            .await
            .map_err(|e| Error::Serialization(format!("Invalid search response: {}", e)))?;

        Ok(results
            .value
            .into_iter()
            .map(|image| Asset::from_file_path(image.content_url))
            .collect())
    }
}
