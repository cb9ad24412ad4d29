use serde::{Deserialize, Serialize};

use crate::error::SpecError;
use crate::model::Specification;

/// The two interchangeable text encodings a spec is written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Encoding {
    Json,
    Yaml,
}

impl Encoding {
    /// Parse a `docs_type` value. Only the exact lowercase names are accepted.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "json" => Some(Self::Json),
            "yaml" => Some(Self::Yaml),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Yaml => "yaml",
        }
    }

    /// File extension, without the dot.
    pub fn extension(&self) -> &'static str {
        self.as_str()
    }

    /// Encode a spec. JSON is pretty-printed; both end with a newline.
    pub fn encode(&self, spec: &Specification) -> Result<String, SpecError> {
        match self {
            Self::Json => serde_json::to_string_pretty(spec)
                .map(|mut out| {
                    out.push('\n');
                    out
                })
                .map_err(|e| SpecError::Serialize(e.to_string())),
            Self::Yaml => {
                serde_yaml::to_string(spec).map_err(|e| SpecError::Serialize(e.to_string()))
            }
        }
    }

    /// Decode a spec previously written with [`Encoding::encode`].
    pub fn decode(&self, input: &str) -> Result<Specification, SpecError> {
        match self {
            Self::Json => {
                serde_json::from_str(input).map_err(|e| SpecError::Parse(e.to_string()))
            }
            Self::Yaml => {
                serde_yaml::from_str(input).map_err(|e| SpecError::Parse(e.to_string()))
            }
        }
    }
}

impl std::fmt::Display for Encoding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
