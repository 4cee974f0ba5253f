//! Recipe manifest handling
//!
//! A manifest is the `manifest.json` at the root of a recipe version
//! directory. Its keys are defined by the recipe format and carried through
//! untouched, except for `aliases` (consumed during packaging) and
//! `conflict` (copied into the index's conflict table). Key order is
//! preserved end to end.

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::{Map, Value};
use std::path::Path;

use crate::error::{CoreError, Result};
use crate::natsort;

/// File name of the manifest inside a recipe version directory.
pub const MANIFEST_FILE: &str = "manifest.json";

/// A recipe's manifest, kept as an ordered JSON object.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct Manifest {
    fields: Map<String, Value>,
}

impl Manifest {
    /// Load a manifest from a JSON file. Unreadable or invalid JSON is fatal.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| CoreError::ManifestRead {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        let value: Value = serde_json::from_str(&contents).map_err(|e| CoreError::ManifestRead {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        match value {
            Value::Object(fields) => Ok(Self { fields }),
            _ => Err(CoreError::ManifestRead {
                path: path.display().to_string(),
                message: "expected a JSON object".to_string(),
            }),
        }
    }

    /// Build a manifest from an already-parsed JSON object.
    pub fn from_object(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    /// The declared aliases, left in place.
    pub fn aliases(&self) -> Vec<String> {
        match self.fields.get("aliases") {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(|item| item.as_str().map(str::to_string))
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Remove and return the `aliases` declaration.
    pub fn take_aliases(&mut self) -> Vec<String> {
        match self.fields.remove("aliases") {
            Some(Value::Array(items)) => items
                .into_iter()
                .filter_map(|item| match item {
                    Value::String(alias) => Some(alias),
                    _ => None,
                })
                .collect(),
            _ => Vec::new(),
        }
    }

    /// The declared `conflict` map with its keys naturally sorted. The
    /// manifest's own value is left untouched.
    pub fn conflicts(&self) -> Option<IndexMap<String, Value>> {
        let conflict = self.fields.get("conflict")?.as_object()?;
        let mut sorted: IndexMap<String, Value> = conflict
            .iter()
            .map(|(name, constraint)| (name.clone(), constraint.clone()))
            .collect();
        natsort::sort_keys(&mut sorted);
        Some(sorted)
    }

    /// Store a line-split text payload under `key`.
    pub fn set_lines(&mut self, key: &str, lines: Vec<String>) {
        self.fields.insert(
            key.to_string(),
            Value::Array(lines.into_iter().map(Value::String).collect()),
        );
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn manifest_from(value: Value) -> Manifest {
        match value {
            Value::Object(fields) => Manifest::from_object(fields),
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn test_load_from_file() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join(MANIFEST_FILE);
        std::fs::write(&path, r#"{"bundles": {"Acme\\Bundle": ["all"]}}"#).unwrap();

        let manifest = Manifest::load(&path).unwrap();
        assert!(manifest.get("bundles").is_some());
        assert!(!manifest.is_empty());
    }

    #[test]
    fn test_load_rejects_non_object() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join(MANIFEST_FILE);
        std::fs::write(&path, "[1, 2]").unwrap();

        let err = Manifest::load(&path).unwrap_err();
        assert!(err.to_string().contains("expected a JSON object"));
    }

    #[test]
    fn test_aliases_read_then_taken() {
        let mut manifest = manifest_from(json!({
            "aliases": ["mailer", "mail"],
            "bin": ["bin/console"],
        }));

        assert_eq!(manifest.aliases(), vec!["mailer", "mail"]);
        assert_eq!(manifest.take_aliases(), vec!["mailer", "mail"]);
        assert!(manifest.get("aliases").is_none());
        assert!(!manifest.is_empty());
    }

    #[test]
    fn test_aliases_only_manifest_empties_out() {
        let mut manifest = manifest_from(json!({"aliases": ["log"]}));
        manifest.take_aliases();
        assert!(manifest.is_empty());
    }

    #[test]
    fn test_conflicts_sorted_naturally_without_mutation() {
        let manifest = manifest_from(json!({
            "conflict": {
                "vendor/pkg-10": "<2.0",
                "vendor/pkg-2": "<1.5",
            },
            "copy-from-recipe": {},
        }));

        let conflicts = manifest.conflicts().unwrap();
        let names: Vec<_> = conflicts.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["vendor/pkg-2", "vendor/pkg-10"]);
        assert_eq!(conflicts["vendor/pkg-2"], json!("<1.5"));

        // Original manifest value stays in declaration order.
        let raw = manifest.get("conflict").unwrap().as_object().unwrap();
        assert_eq!(raw.keys().next().unwrap(), "vendor/pkg-10");
    }

    #[test]
    fn test_set_lines() {
        let mut manifest = manifest_from(json!({}));
        manifest.set_lines("makefile", vec!["all:".to_string(), "\techo ok".to_string()]);
        assert_eq!(manifest.get("makefile"), Some(&json!(["all:", "\techo ok"])));
    }
}
