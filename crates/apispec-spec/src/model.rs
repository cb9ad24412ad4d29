use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// The OpenAPI version written into every built spec.
pub const OPENAPI_VERSION: &str = "3.0.3";

/// A path item: lowercase HTTP method -> operation object.
///
/// Operations stay untyped; only their structure is navigated.
pub type PathItem = Map<String, Value>;

/// A built OpenAPI document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Specification {
    /// The `openapi` version field.
    pub openapi: String,
    pub info: Info,
    /// Path template -> path item.
    #[serde(default)]
    pub paths: BTreeMap<String, PathItem>,
    /// Any other top-level keys (e.g. `components` added by plugins).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The `info` object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Info {
    pub title: String,
    pub version: String,
    #[serde(default)]
    pub description: String,
}

impl Specification {
    /// An empty document carrying only `openapi` and `info`.
    pub fn new(info: Info) -> Self {
        Self {
            openapi: OPENAPI_VERSION.to_string(),
            info,
            paths: BTreeMap::new(),
            extra: Map::new(),
        }
    }

    /// Whether `path` is a key of `paths`.
    pub fn contains_path(&self, path: &str) -> bool {
        self.paths.contains_key(path)
    }
}
