//! Format-agnostic settings file loading and saving

use crate::{Error, NormalizedPath, Result, io};
use serde::{Serialize, de::DeserializeOwned};

/// Supported settings file formats, chosen by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Toml,
    Json,
    Yaml,
}

impl Format {
    fn detect(path: &NormalizedPath) -> Result<Self> {
        let extension = path.extension().unwrap_or("");
        match extension.to_lowercase().as_str() {
            "toml" => Ok(Self::Toml),
            "json" => Ok(Self::Json),
            "yaml" | "yml" => Ok(Self::Yaml),
            _ => Err(Error::UnsupportedFormat {
                extension: extension.to_string(),
            }),
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Self::Toml => "TOML",
            Self::Json => "JSON",
            Self::Yaml => "YAML",
        }
    }
}

/// Loads and saves serde types as TOML, JSON or YAML depending on the file
/// extension. Saving goes through [`io::write_atomic`].
#[derive(Debug, Default, Clone, Copy)]
pub struct ConfigStore;

impl ConfigStore {
    pub fn new() -> Self {
        Self
    }

    /// Load a settings file.
    pub fn load<T: DeserializeOwned>(&self, path: &NormalizedPath) -> Result<T> {
        let format = Format::detect(path)?;
        let content = io::read_text(path)?;

        let parse_error = |message: String| Error::ConfigParse {
            path: path.to_native(),
            format: format.name().into(),
            message,
        };

        match format {
            Format::Toml => toml::from_str(&content).map_err(|e| parse_error(e.to_string())),
            Format::Json => serde_json::from_str(&content).map_err(|e| parse_error(e.to_string())),
            Format::Yaml => serde_yaml::from_str(&content).map_err(|e| parse_error(e.to_string())),
        }
    }

    /// Load a settings file, falling back to `T::default()` when it does not exist.
    pub fn load_or_default<T: DeserializeOwned + Default>(&self, path: &NormalizedPath) -> Result<T> {
        if !path.exists() {
            tracing::debug!(path = %path, "Settings file not found, using defaults");
            return Ok(T::default());
        }
        self.load(path)
    }

    /// Save a settings file atomically.
    pub fn save<T: Serialize>(&self, path: &NormalizedPath, value: &T) -> Result<()> {
        let format = Format::detect(path)?;

        let serialize_error = |message: String| Error::ConfigSerialize {
            path: path.to_native(),
            format: format.name().into(),
            message,
        };

        let content = match format {
            Format::Toml => {
                toml::to_string_pretty(value).map_err(|e| serialize_error(e.to_string()))?
            }
            Format::Json => {
                serde_json::to_string_pretty(value).map_err(|e| serialize_error(e.to_string()))?
            }
            Format::Yaml => serde_yaml::to_string(value).map_err(|e| serialize_error(e.to_string()))?,
        };

        io::write_atomic(path, content.as_bytes())
    }
}
