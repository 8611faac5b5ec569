//! Store configuration.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::search::SearchOptions;

/// Configuration for an [`EmbeddingStore`](crate::EmbeddingStore).
///
/// # Example
///
/// ```
/// use simstore_core::{SearchOptions, StoreConfig};
///
/// let config = StoreConfig::new()
///     .with_dimension(384)
///     .with_search(SearchOptions::new().with_maximum_results(5));
/// assert!(config.validate().is_ok());
///
/// let parsed = StoreConfig::from_json(r#"{"dimension": 384, "search": {"maximum_results": 5}}"#).unwrap();
/// assert_eq!(parsed, config);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Pinned dimensionality. When unset, the first append or load decides.
    pub dimension: Option<usize>,
    /// Options used by [`search_default`](crate::EmbeddingStore::search_default).
    pub search: SearchOptions,
}

impl StoreConfig {
    /// Creates a config with no pinned dimension and default search options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Pins the dimensionality. Chainable.
    pub fn with_dimension(mut self, dimension: usize) -> Self {
        self.dimension = Some(dimension);
        self
    }

    /// Sets the default search options. Chainable.
    pub fn with_search(mut self, search: SearchOptions) -> Self {
        self.search = search;
        self
    }

    /// Parses a config from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| Error::InvalidConfig(format!("parse config failed: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the config for out-of-range values.
    pub fn validate(&self) -> Result<()> {
        if self.dimension == Some(0) {
            return Err(Error::InvalidConfig("dimension must be non-zero".into()));
        }
        self.search
            .validate()
            .map_err(|e| Error::InvalidConfig(e.to_string()))
    }
}
