//! Version catalog loading
//!
//! The catalog is an optional JSON document describing the released versions
//! of the core packages. Only its `splits` object is interpreted (as an alias
//! seed); the rest is carried verbatim into the generated index.

use serde_json::Value;
use std::path::Path;

use crate::error::{CoreError, Result};

/// Preloaded version catalog, kept as raw JSON for re-emission.
#[derive(Debug, Clone)]
pub struct VersionCatalog {
    raw: Value,
}

impl VersionCatalog {
    /// Load a catalog from a JSON file. Unreadable or invalid JSON is fatal.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| CoreError::CatalogRead {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        let raw: Value = serde_json::from_str(&contents).map_err(|e| CoreError::CatalogRead {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        Ok(Self { raw })
    }

    /// Build a catalog from an already-parsed JSON document.
    pub fn from_value(raw: Value) -> Self {
        Self { raw }
    }

    /// Package names listed under the `splits` object.
    pub fn split_packages(&self) -> impl Iterator<Item = &str> {
        self.raw
            .get("splits")
            .and_then(Value::as_object)
            .into_iter()
            .flat_map(|splits| splits.keys().map(String::as_str))
    }

    /// The raw catalog document.
    pub fn raw(&self) -> &Value {
        &self.raw
    }
}
