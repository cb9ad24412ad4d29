//! Application context: docs config, registered endpoints, enabled plugins
//! and the cached specs built from them.

use std::sync::Arc;

use apispec_spec::{
    Encoding, Endpoint, EndpointRegistry, SpecBuilder, SpecError, SpecPlugin, SpecSnapshots,
    Specification,
};
use apispec_telemetry::log_spec_built;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::config::{ConfigError, DocsConfig};
use crate::writer::DocsWriter;

/// Endpoint name of the docs viewer.
pub const DOCS_ENDPOINT: &str = "apispec_tools_docs";
/// Endpoint name of the JSON spec.
pub const DOCS_JSON_ENDPOINT: &str = "apispec_tools_docs_json";
/// Endpoint name of the version probe.
pub const VERSION_ENDPOINT: &str = "apispec_tools_version";

const DOCS_OPERATION: &str = r#"
summary: Interactive API documentation.
responses:
  "200":
    description: Documentation viewer page.
    content:
      text/html: {}
"#;

const DOCS_JSON_OPERATION: &str = r#"
summary: The API specification.
responses:
  "200":
    description: OpenAPI document.
    content:
      application/json:
        schema:
          type: object
"#;

const VERSION_OPERATION: &str = r#"
summary: The API version.
responses:
  "200":
    description: Current version.
    content:
      application/json:
        schema:
          type: object
          properties:
            version:
              type: string
"#;

#[derive(Debug, Error)]
pub enum InitError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("docs_json_endpoint can not be None when docs_endpoint is not None")]
    DocsJsonRequired,

    #[error("path {0} is already served by another endpoint")]
    PathInUse(String),

    #[error("unknown spec plugin '{0}'")]
    UnknownPlugin(String),

    #[error(transparent)]
    Spec(#[from] SpecError),
}

/// Paths of the built-in endpoints. `None` disables one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocsEndpoints {
    pub docs: Option<String>,
    pub docs_json: Option<String>,
    pub version: Option<String>,
}

impl Default for DocsEndpoints {
    fn default() -> Self {
        Self {
            docs: Some("/docs".to_string()),
            docs_json: Some("/docs/json".to_string()),
            version: Some("/version".to_string()),
        }
    }
}

/// Options for [`ApiDocs::init`].
#[derive(Clone, Default)]
pub struct InitOptions {
    pub endpoints: DocsEndpoints,
    /// Merged over the config file section.
    pub config_values: Map<String, Value>,
    /// Plugins available to the spec builder.
    pub plugins: Vec<Arc<dyn SpecPlugin>>,
}

impl InitOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn docs_endpoint(mut self, path: Option<&str>) -> Self {
        self.endpoints.docs = path.map(str::to_string);
        self
    }

    pub fn docs_json_endpoint(mut self, path: Option<&str>) -> Self {
        self.endpoints.docs_json = path.map(str::to_string);
        self
    }

    pub fn version_endpoint(mut self, path: Option<&str>) -> Self {
        self.endpoints.version = path.map(str::to_string);
        self
    }

    pub fn config_value(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.config_values.insert(key.into(), value.into());
        self
    }

    pub fn plugin(mut self, plugin: Arc<dyn SpecPlugin>) -> Self {
        self.plugins.push(plugin);
        self
    }
}

impl std::fmt::Debug for InitOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InitOptions")
            .field("endpoints", &self.endpoints)
            .field("config_values", &self.config_values)
            .field(
                "plugins",
                &self.plugins.iter().map(|p| p.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

/// Everything needed to build, serve and validate against the API docs.
pub struct ApiDocs {
    config: DocsConfig,
    encoding: Encoding,
    registry: EndpointRegistry,
    plugins: Vec<Arc<dyn SpecPlugin>>,
    snapshots: SpecSnapshots,
    endpoints: DocsEndpoints,
}

impl ApiDocs {
    /// Validate the config and register the built-in endpoints.
    pub fn init(
        config: DocsConfig,
        mut registry: EndpointRegistry,
        options: InitOptions,
    ) -> Result<Self, InitError> {
        let mut config = config.with_overrides(&options.config_values)?;
        let encoding = config.validate()?;

        let endpoints = options.endpoints;
        if endpoints.docs.is_some() && endpoints.docs_json.is_none() {
            return Err(InitError::DocsJsonRequired);
        }

        let plugins = select_plugins(&config.plugins, options.plugins)?;
        config.plugins = plugins.iter().map(|p| p.name().to_string()).collect();

        if let Some(path) = &endpoints.docs {
            claim_path(&registry, path)?;
            registry.register(
                Endpoint::new(DOCS_ENDPOINT, path.as_str())
                    .doc_yaml("get", DOCS_OPERATION)?
                    .exclude_from_spec(),
            );
        }
        if let Some(path) = &endpoints.docs_json {
            claim_path(&registry, path)?;
            registry.register(
                Endpoint::new(DOCS_JSON_ENDPOINT, path.as_str())
                    .doc_yaml("get", DOCS_JSON_OPERATION)?
                    .exclude_from_spec(),
            );
        }
        // Part of the public spec, unlike the docs pages.
        if let Some(path) = &endpoints.version {
            claim_path(&registry, path)?;
            registry.register(
                Endpoint::new(VERSION_ENDPOINT, path.as_str()).doc_yaml("get", VERSION_OPERATION)?,
            );
        }

        Ok(Self {
            config,
            encoding,
            registry,
            plugins,
            snapshots: SpecSnapshots::new(),
            endpoints,
        })
    }

    pub fn config(&self) -> &DocsConfig {
        &self.config
    }

    pub fn encoding(&self) -> Encoding {
        self.encoding
    }

    pub fn registry(&self) -> &EndpointRegistry {
        &self.registry
    }

    pub fn endpoints(&self) -> &DocsEndpoints {
        &self.endpoints
    }

    /// Names of the enabled plugins.
    pub fn plugin_names(&self) -> &[String] {
        &self.config.plugins
    }

    /// Register another endpoint; cached specs are dropped.
    pub fn register(&mut self, endpoint: Endpoint) -> usize {
        let index = self.registry.register(endpoint);
        self.rebuild();
        index
    }

    /// The spec, built on first use. `include_excluded` adds endpoints
    /// marked `exclude_from_spec`.
    pub fn spec(&self, include_excluded: bool) -> Arc<Specification> {
        self.snapshots.get_or_build(include_excluded, || {
            let spec = SpecBuilder::new(self.config.info(), &self.plugins)
                .build(&self.registry, include_excluded);
            log_spec_built!(
                include_excluded,
                paths = spec.paths.len(),
                "spec built"
            );
            spec
        })
    }

    /// Forget cached specs.
    pub fn rebuild(&self) {
        self.snapshots.invalidate();
    }

    pub fn writer(&self) -> Result<DocsWriter, ConfigError> {
        DocsWriter::new(&self.config)
    }
}

impl std::fmt::Debug for ApiDocs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiDocs")
            .field("config", &self.config)
            .field("encoding", &self.encoding)
            .field("endpoints", &self.endpoints)
            .finish_non_exhaustive()
    }
}

/// Plugins named in config, in config order. With no names configured,
/// every supplied plugin is enabled.
/// Built-in endpoints need a path no other endpoint is registered on.
fn claim_path(registry: &EndpointRegistry, path: &str) -> Result<(), InitError> {
    if registry.endpoints().iter().any(|e| e.path == path) {
        return Err(InitError::PathInUse(path.to_string()));
    }
    Ok(())
}

fn select_plugins(
    names: &[String],
    available: Vec<Arc<dyn SpecPlugin>>,
) -> Result<Vec<Arc<dyn SpecPlugin>>, InitError> {
    if names.is_empty() {
        return Ok(available);
    }
    names
        .iter()
        .map(|name| {
            available
                .iter()
                .find(|p| p.name() == name)
                .cloned()
                .ok_or_else(|| InitError::UnknownPlugin(name.clone()))
        })
        .collect()
}
