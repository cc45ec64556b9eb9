//! Generic provider registry for dynamic provider resolution.
//!
//! One registry type serves the storage, asset, and export contracts:
//! each is a catalog of named zero-argument factories plus descriptive
//! metadata for UI enumeration. Registries are populated once during a
//! bootstrap phase, then shared immutably (typically behind an `Arc`);
//! no locking is needed after that phase boundary.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use tagrove_common::{Error, Result};

use crate::provider::Provider;

/// Factory function type for creating providers.
pub type ProviderFactory<P> = Arc<dyn Fn() -> Box<P> + Send + Sync>;

/// A named provider registration with display metadata.
pub struct Registration<P: ?Sized> {
    /// Unique key within the registry (e.g. "localFileSystem").
    pub name: String,
    /// Human-readable name for connection dropdowns.
    pub display_name: String,
    /// Short description shown alongside the display name.
    pub description: String,
    /// Zero-argument factory producing an unconfigured instance.
    pub factory: ProviderFactory<P>,
}

impl<P: ?Sized> Registration<P> {
    /// Create a registration.
    pub fn new(
        name: impl Into<String>,
        display_name: impl Into<String>,
        description: impl Into<String>,
        factory: ProviderFactory<P>,
    ) -> Self {
        Self {
            name: name.into(),
            display_name: display_name.into(),
            description: description.into(),
            factory,
        }
    }
}

impl<P: ?Sized> Clone for Registration<P> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            display_name: self.display_name.clone(),
            description: self.description.clone(),
            factory: Arc::clone(&self.factory),
        }
    }
}

/// Registry of provider factories, keyed by name.
///
/// Preserves registration order for enumeration.
pub struct ProviderRegistry<P: Provider + ?Sized> {
    entries: Vec<Registration<P>>,
    index: HashMap<String, usize>,
}

impl<P: Provider + ?Sized> ProviderRegistry<P> {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Register a provider factory.
    ///
    /// # Preconditions
    /// - `registration.name` must be unique within the registry
    ///
    /// # Postconditions
    /// - Factory is registered and can be resolved by name
    ///
    /// # Errors
    /// - `AlreadyExists` if the name is already registered; the original
    ///   registration is left untouched. Collisions indicate a bootstrap
    ///   bug, so overwriting is rejected rather than silent.
    pub fn register(&mut self, registration: Registration<P>) -> Result<()> {
        if self.index.contains_key(&registration.name) {
            return Err(Error::AlreadyExists(format!(
                "Provider '{}' is already registered",
                registration.name
            )));
        }
        debug!(name = %registration.name, "registering provider");
        self.index
            .insert(registration.name.clone(), self.entries.len());
        self.entries.push(registration);
        Ok(())
    }

    /// Look up a registration by name.
    ///
    /// # Errors
    /// - `NotFound` if the name was never registered
    pub fn get(&self, name: &str) -> Result<&Registration<P>> {
        self.index
            .get(name)
            .map(|&i| &self.entries[i])
            .ok_or_else(|| Error::NotFound(format!("Provider '{}' is not registered", name)))
    }

    /// All registrations, in registration order.
    pub fn list(&self) -> &[Registration<P>] {
        &self.entries
    }

    /// Registered names, in registration order.
    pub fn names(&self) -> Vec<String> {
        self.entries.iter().map(|r| r.name.clone()).collect()
    }

    /// Check if a provider is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Create and configure a provider instance.
    ///
    /// Two-phase construction: the factory produces the structural
    /// instance, then `initialize(options)` applies configuration.
    ///
    /// # Errors
    /// - `NotFound` if the name was never registered
    /// - Any error from the provider's `initialize`
    pub async fn create(&self, name: &str, options: serde_json::Value) -> Result<Box<P>> {
        let registration = self.get(name)?;
        let mut provider = (registration.factory)();
        provider.initialize(&options).await?;
        Ok(provider)
    }
}

impl<P: Provider + ?Sized> Default for ProviderRegistry<P> {
    fn default() -> Self {
        Self::new()
    }
}
