//! Docs configuration: the `apispec_tools` section of the app config file.

use std::path::PathBuf;

use apispec_spec::{Encoding, Info};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Name of the config file section holding docs settings.
pub const SECTION: &str = "apispec_tools";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid config. docs_type must be either 'json' or 'yaml'")]
    InvalidDocsType,

    #[error("malformed {SECTION} section: {0}")]
    Malformed(String),

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

fn default_title() -> String {
    "API".to_string()
}

fn default_version() -> String {
    "0.0.0".to_string()
}

fn default_docs_dir() -> PathBuf {
    PathBuf::from("docs")
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocsConfig {
    #[serde(default = "default_title", deserialize_with = "scalar_string")]
    pub title: String,

    /// `version: 2` and `version: 1.0` are read as their YAML text.
    #[serde(default = "default_version", deserialize_with = "scalar_string")]
    pub version: String,

    #[serde(default, deserialize_with = "scalar_string")]
    pub description: String,

    /// Directory the docs file is written to.
    #[serde(default = "default_docs_dir")]
    pub docs_dir: PathBuf,

    /// `json` or `yaml`. Kept raw so that a bad value is reported by
    /// [`DocsConfig::validate`] rather than at load time.
    #[serde(
        default,
        deserialize_with = "optional_scalar_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub docs_type: Option<String>,

    /// Names of the spec plugins to enable.
    #[serde(default)]
    pub plugins: Vec<String>,
}

fn scalar_text(value: Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        _ => None,
    }
}

fn scalar_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    let value = Value::deserialize(deserializer)?;
    let found = value.to_string();
    scalar_text(value)
        .ok_or_else(|| serde::de::Error::custom(format!("expected a scalar, found {found}")))
}

fn optional_scalar_string<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<String>, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(None),
        value => {
            let found = value.to_string();
            scalar_text(value)
                .map(Some)
                .ok_or_else(|| serde::de::Error::custom(format!("expected a scalar, found {found}")))
        }
    }
}

impl Default for DocsConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            version: default_version(),
            description: String::new(),
            docs_dir: default_docs_dir(),
            docs_type: None,
            plugins: Vec::new(),
        }
    }
}

impl DocsConfig {
    /// Build from a raw config section with `overrides` merged on top.
    ///
    /// A missing section is treated as empty. Override keys replace section
    /// keys wholesale.
    pub fn from_section(
        section: Option<&Value>,
        overrides: &Map<String, Value>,
    ) -> Result<Self, ConfigError> {
        let mut merged = match section {
            None | Some(Value::Null) => Map::new(),
            Some(Value::Object(map)) => map.clone(),
            Some(other) => {
                return Err(ConfigError::Malformed(format!(
                    "expected a mapping, found {other}"
                )))
            }
        };
        for (key, value) in overrides {
            merged.insert(key.clone(), value.clone());
        }

        serde_json::from_value(Value::Object(merged))
            .map_err(|e| ConfigError::Malformed(e.to_string()))
    }

    /// Copy of this config with `overrides` applied.
    pub fn with_overrides(&self, overrides: &Map<String, Value>) -> Result<Self, ConfigError> {
        if overrides.is_empty() {
            return Ok(self.clone());
        }
        let current = serde_json::to_value(self)
            .map_err(|e| ConfigError::Malformed(e.to_string()))?;
        Self::from_section(Some(&current), overrides)
    }

    /// The docs encoding. Only the exact strings `json` and `yaml` are
    /// accepted.
    pub fn validate(&self) -> Result<Encoding, ConfigError> {
        self.docs_type
            .as_deref()
            .and_then(Encoding::parse)
            .ok_or(ConfigError::InvalidDocsType)
    }

    /// `{title with spaces as '_'}_{version}.{ext}`.
    pub fn filename(&self, encoding: Encoding) -> String {
        format!(
            "{}_{}.{}",
            self.title.replace(' ', "_"),
            self.version,
            encoding.extension()
        )
    }

    /// Full path of the docs file.
    pub fn target(&self, encoding: Encoding) -> PathBuf {
        self.docs_dir.join(self.filename(encoding))
    }

    pub fn info(&self) -> Info {
        Info {
            title: self.title.clone(),
            version: self.version.clone(),
            description: self.description.clone(),
        }
    }
}
