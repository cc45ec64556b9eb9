//! Blob service REST client.

use bytes::Bytes;
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use reqwest::{header, Client, Response, StatusCode};
use serde::Deserialize;

use tagrove_common::{Error, Result};

/// Characters escaped in blob name path segments.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'%')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Container listing response body.
#[derive(Debug, Deserialize)]
struct ContainerEnumeration {
    #[serde(rename = "Containers", default)]
    containers: ContainerItems,
}

#[derive(Debug, Default, Deserialize)]
struct ContainerItems {
    #[serde(rename = "Container", default)]
    items: Vec<NamedEntry>,
}

/// Blob listing response body.
#[derive(Debug, Deserialize)]
struct BlobEnumeration {
    #[serde(rename = "Blobs", default)]
    blobs: BlobItems,
}

#[derive(Debug, Default, Deserialize)]
struct BlobItems {
    #[serde(rename = "Blob", default)]
    items: Vec<NamedEntry>,
}

#[derive(Debug, Deserialize)]
struct NamedEntry {
    #[serde(rename = "Name")]
    name: String,
}

/// Minimal client for the blob service REST API.
///
/// Authentication is a pre-signed SAS query string appended to every
/// request; the client never holds account keys.
pub struct BlobClient {
    http: Client,
    base_url: String,
    sas: String,
}

impl BlobClient {
    /// Create a client for the given storage account.
    pub fn new(account_name: &str, sas: &str) -> Self {
        let http = Client::builder()
            .user_agent("Tagrove/0.1")
            .build()
            .expect("Failed to create HTTP client");

        Self {
            http,
            base_url: format!("https://{}.blob.core.windows.net", account_name),
            sas: sas.trim_start_matches('?').to_string(),
        }
    }

    /// Public URL of a blob, including the SAS token.
    pub fn blob_url(&self, container: &str, blob: &str) -> String {
        self.request_url(&self.blob_path(container, blob), "")
    }

    fn blob_path(&self, container: &str, blob: &str) -> String {
        let encoded: String = blob
            .split('/')
            .map(|segment| utf8_percent_encode(segment, PATH_SEGMENT).to_string())
            .collect::<Vec<_>>()
            .join("/");
        format!("{}/{}", container, encoded)
    }

    fn request_url(&self, path: &str, query: &str) -> String {
        let mut url = format!("{}/{}", self.base_url, path);
        let mut separator = '?';
        if !query.is_empty() {
            url.push(separator);
            url.push_str(query);
            separator = '&';
        }
        if !self.sas.is_empty() {
            url.push(separator);
            url.push_str(&self.sas);
        }
        url
    }

    /// List container names in the account.
    pub async fn list_containers(&self) -> Result<Vec<String>> {
        let url = self.request_url("", "comp=list");
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| Error::Network(format!("Failed to list containers: {}", e)))?;
        let body = Self::check(response, "list containers").await?.text().await
            .map_err(|e| Error::Network(format!("Failed to read container listing: {}", e)))?;
        parse_container_list(&body)
    }

    /// List blob names in a container.
    pub async fn list_blobs(&self, container: &str) -> Result<Vec<String>> {
        let url = self.request_url(container, "restype=container&comp=list");
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| Error::Network(format!("Failed to list blobs: {}", e)))?;
        let body = Self::check(response, "list blobs").await?.text().await
            .map_err(|e| Error::Network(format!("Failed to read blob listing: {}", e)))?;
        parse_blob_list(&body)
    }

    /// Download a blob's content.
    pub async fn get_blob(&self, container: &str, blob: &str) -> Result<Bytes> {
        let url = self.request_url(&self.blob_path(container, blob), "");
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| Error::Network(format!("Failed to get blob '{}': {}", blob, e)))?;
        Self::check(response, blob)
            .await?
            .bytes()
            .await
            .map_err(|e| Error::Network(format!("Failed to read blob '{}': {}", blob, e)))
    }

    /// Upload a blob, overwriting any existing content.
    pub async fn put_blob(&self, container: &str, blob: &str, data: Vec<u8>) -> Result<()> {
        let url = self.request_url(&self.blob_path(container, blob), "");
        let response = self
            .http
            .put(&url)
            .header("x-ms-blob-type", "BlockBlob")
            .header(header::CONTENT_LENGTH, data.len())
            .body(data)
            .send()
            .await
            .map_err(|e| Error::Network(format!("Failed to put blob '{}': {}", blob, e)))?;
        Self::check(response, blob).await?;
        Ok(())
    }

    /// Delete a blob.
    pub async fn delete_blob(&self, container: &str, blob: &str) -> Result<()> {
        let url = self.request_url(&self.blob_path(container, blob), "");
        let response = self
            .http
            .delete(&url)
            .send()
            .await
            .map_err(|e| Error::Network(format!("Failed to delete blob '{}': {}", blob, e)))?;
        Self::check(response, blob).await?;
        Ok(())
    }

    /// Create a container.
    ///
    /// Returns `false` when the container already existed.
    pub async fn create_container(&self, container: &str) -> Result<bool> {
        let url = self.request_url(container, "restype=container");
        let response = self
            .http
            .put(&url)
            .send()
            .await
            .map_err(|e| Error::Network(format!("Failed to create container '{}': {}", container, e)))?;

        if response.status() == StatusCode::CONFLICT {
            let error_code = response
                .headers()
                .get("x-ms-error-code")
                .and_then(|v| v.to_str().ok())
                .unwrap_or("")
                .to_string();
            if error_code == "ContainerAlreadyExists" {
                return Ok(false);
            }
            return Err(Error::Conflict(format!(
                "Container '{}': {}",
                container, error_code
            )));
        }

        Self::check(response, container).await?;
        Ok(true)
    }

    /// Delete a container and its contents.
    pub async fn delete_container(&self, container: &str) -> Result<()> {
        let url = self.request_url(container, "restype=container");
        let response = self
            .http
            .delete(&url)
            .send()
            .await
            .map_err(|e| Error::Network(format!("Failed to delete container '{}': {}", container, e)))?;
        Self::check(response, container).await?;
        Ok(())
    }

    /// Map service status codes onto the common error taxonomy.
    async fn check(response: Response, context: &str) -> Result<Response> {
        let status = response.status();
        match status {
            StatusCode::NOT_FOUND => Err(Error::NotFound(format!("Not found: {}", context))),
            StatusCode::CONFLICT => Err(Error::Conflict(format!("Conflict: {}", context))),
            s if s.is_success() => Ok(response),
            s => Err(Error::Network(format!("{}: HTTP {}", context, s))),
        }
    }
}

fn parse_container_list(body: &str) -> Result<Vec<String>> {
    let listing: ContainerEnumeration = quick_xml::de::from_str(body)
        .map_err(|e| Error::Serialization(format!("Invalid container listing: {}", e)))?;
    Ok(listing.containers.items.into_iter().map(|c| c.name).collect())
}

fn parse_blob_list(body: &str) -> Result<Vec<String>> {
    let listing: BlobEnumeration = quick_xml::de::from_str(body)
        .map_err(|e| Error::Serialization(format!("Invalid blob listing: {}", e)))?;
    Ok(listing.blobs.items.into_iter().map(|b| b.name).collect())
}
