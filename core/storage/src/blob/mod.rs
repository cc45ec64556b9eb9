//! Cloud blob storage provider.
//!
//! Talks to an Azure-style blob REST API using shared-access-signature
//! (SAS) authentication. The module is split into a thin HTTP client and
//! the provider implementing the storage and asset contracts on top of it.

pub mod client;
pub mod provider;

pub use client::BlobClient;
pub use provider::{BlobStorage, BlobStorageOptions};
