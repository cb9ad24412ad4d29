//! Application config file.
//!
//! ```yaml
//! apispec_tools:
//!   title: Some Title
//!   version: 1.2.3
//!   docs_type: json
//! endpoints:
//!   - name: list_items
//!     path: /items
//!     docs:
//!       get:
//!         responses:
//!           "200":
//!             content:
//!               application/json: {}
//!     mock:
//!       status: 200
//!       body: []
//! ```
//!
//! Sections other than `apispec_tools` and `endpoints` are ignored.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use apispec_spec::{Endpoint, EndpointRegistry, SpecError};
use axum::{
    http::{header, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{MethodFilter, MethodRouter},
    Router,
};
use serde::Deserialize;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::config::{ConfigError, DocsConfig};

#[derive(Debug, Error)]
pub enum AppFileError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse app config: {0}")]
    Parse(String),

    #[error(transparent)]
    Spec(#[from] SpecError),

    #[error("unsupported method '{method}' on {path}")]
    Method { method: String, path: String },

    #[error("invalid mock status {status} on {path}")]
    Status { status: u16, path: String },
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppFile {
    #[serde(default)]
    pub apispec_tools: Option<Value>,

    #[serde(default)]
    pub endpoints: Vec<EndpointDef>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EndpointDef {
    /// Defaults to the path.
    #[serde(default)]
    pub name: Option<String>,

    pub path: String,

    /// Methods accepted without docs.
    #[serde(default)]
    pub methods: Vec<String>,

    /// Operation docs keyed by method.
    #[serde(default)]
    pub docs: BTreeMap<String, Value>,

    #[serde(default)]
    pub exclude_from_spec: bool,

    #[serde(default)]
    pub mock: Option<MockResponse>,
}

/// Canned response served by `serve` for an endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct MockResponse {
    #[serde(default = "default_status")]
    pub status: u16,

    /// Defaults to `text/plain` for string bodies and `application/json`
    /// otherwise.
    #[serde(default)]
    pub content_type: Option<String>,

    #[serde(default)]
    pub body: Option<Value>,
}

fn default_status() -> u16 {
    200
}

impl Default for MockResponse {
    fn default() -> Self {
        Self {
            status: default_status(),
            content_type: None,
            body: None,
        }
    }
}

impl AppFile {
    pub fn load(path: &Path) -> Result<Self, AppFileError> {
        let contents = std::fs::read_to_string(path).map_err(|source| AppFileError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&contents)
    }

    pub fn parse(contents: &str) -> Result<Self, AppFileError> {
        // An empty document is an empty config.
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(contents).map_err(|e| AppFileError::Parse(e.to_string()))
    }

    pub fn docs_config(&self) -> Result<DocsConfig, ConfigError> {
        DocsConfig::from_section(self.apispec_tools.as_ref(), &Map::new())
    }

    pub fn registry(&self) -> Result<EndpointRegistry, AppFileError> {
        let mut registry = EndpointRegistry::new();
        for def in &self.endpoints {
            registry.register(def.endpoint()?);
        }
        Ok(registry)
    }

    /// Routes answering every declared method with the endpoint's mock.
    ///
    /// When several endpoints declare the same path and method, the later
    /// one answers, as in [`AppFile::registry`].
    pub fn mock_router(&self) -> Result<Router, AppFileError> {
        let mut by_path: BTreeMap<&str, BTreeMap<String, MockResponse>> = BTreeMap::new();
        for def in &self.endpoints {
            let mock = def.mock.clone().unwrap_or_default();
            mock.status_code(&def.path)?;

            let methods = by_path.entry(def.path.as_str()).or_default();
            for method in def.all_methods() {
                methods.insert(method, mock.clone());
            }
        }

        let mut router = Router::new();
        for (path, methods) in by_path {
            let mut route = MethodRouter::new();
            for (method, mock) in methods {
                let filter = method_filter(&method, path)?;
                route = route.on(filter, move || {
                    let mock = mock.clone();
                    async move { mock.into_response() }
                });
            }
            router = router.route(path, route);
        }
        Ok(router)
    }
}

impl EndpointDef {
    fn all_methods(&self) -> Vec<String> {
        let mut methods: Vec<String> = self
            .methods
            .iter()
            .chain(self.docs.keys())
            .map(|m| m.to_ascii_uppercase())
            .collect();
        methods.sort();
        methods.dedup();
        methods
    }

    pub fn endpoint(&self) -> Result<Endpoint, SpecError> {
        let name = self.name.clone().unwrap_or_else(|| self.path.clone());
        let mut endpoint = Endpoint::new(name, self.path.as_str());
        for method in &self.methods {
            endpoint = endpoint.method(method);
        }
        for (method, docs) in &self.docs {
            match docs {
                Value::Object(operation) => endpoint = endpoint.doc(method, operation.clone()),
                // `get:` with nothing under it declares the method only.
                Value::Null => endpoint = endpoint.method(method),
                _ => {
                    return Err(SpecError::DocsNotAnObject {
                        method: method.to_ascii_uppercase(),
                        path: self.path.clone(),
                    })
                }
            }
        }
        if self.exclude_from_spec {
            endpoint = endpoint.exclude_from_spec();
        }
        Ok(endpoint)
    }
}

impl MockResponse {
    fn status_code(&self, path: &str) -> Result<StatusCode, AppFileError> {
        StatusCode::from_u16(self.status).map_err(|_| AppFileError::Status {
            status: self.status,
            path: path.to_string(),
        })
    }

    fn content_type(&self) -> Option<String> {
        match (&self.content_type, &self.body) {
            (Some(ct), _) => Some(ct.clone()),
            (None, Some(Value::String(_))) => Some("text/plain".to_string()),
            (None, Some(_)) => Some("application/json".to_string()),
            (None, None) => None,
        }
    }

    fn body(&self) -> String {
        match &self.body {
            None => String::new(),
            Some(Value::String(text)) => text.clone(),
            Some(other) => other.to_string(),
        }
    }
}

impl IntoResponse for MockResponse {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::OK);
        let mut response = (status, self.body()).into_response();
        // Drop the default text/plain header so an empty mock has none.
        response.headers_mut().remove(header::CONTENT_TYPE);
        if let Some(value) = self
            .content_type()
            .and_then(|ct| HeaderValue::from_str(&ct).ok())
        {
            response.headers_mut().insert(header::CONTENT_TYPE, value);
        }
        response
    }
}

fn method_filter(method: &str, path: &str) -> Result<MethodFilter, AppFileError> {
    let unsupported = || AppFileError::Method {
        method: method.to_string(),
        path: path.to_string(),
    };
    let method = Method::from_bytes(method.as_bytes()).map_err(|_| unsupported())?;
    MethodFilter::try_from(method).map_err(|_| unsupported())
}
