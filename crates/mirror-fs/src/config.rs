//! Format-agnostic settings file loading

use std::path::Path;

use serde::de::DeserializeOwned;

use crate::{Error, Result};

/// Format-agnostic configuration store.
///
/// Detects the format from the file extension and deserializes
/// transparently.
#[derive(Debug, Default)]
pub struct ConfigStore;

impl ConfigStore {
    pub fn new() -> Self {
        Self
    }

    /// Load configuration from a file.
    ///
    /// Format is detected from file extension:
    /// - `.toml` -> TOML
    /// - `.json` -> JSON
    /// - `.yaml`, `.yml` -> YAML
    pub fn load<T: DeserializeOwned>(&self, path: &Path) -> Result<T> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        // Reject unknown formats before touching the file.
        if !matches!(extension.as_str(), "toml" | "json" | "yaml" | "yml") {
            return Err(Error::UnsupportedFormat { extension });
        }

        let content = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;

        match extension.as_str() {
            "toml" => toml::from_str(&content).map_err(|e| Error::ConfigParse {
                path: path.to_path_buf(),
                format: "TOML".into(),
                message: e.to_string(),
            }),
            "json" => serde_json::from_str(&content).map_err(|e| Error::ConfigParse {
                path: path.to_path_buf(),
                format: "JSON".into(),
                message: e.to_string(),
            }),
            _ => serde_yaml::from_str(&content).map_err(|e| Error::ConfigParse {
                path: path.to_path_buf(),
                format: "YAML".into(),
                message: e.to_string(),
            }),
        }
    }
}
