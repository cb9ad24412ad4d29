//! Endpoint registry and spec builder.
//!
//! Every registered method of every included endpoint is written under
//! `paths`, whether or not it carries docs. An undocumented method becomes
//! an empty operation object, so a spec built here always documents every
//! routable method.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use apispec_router::{RouteEntry, RouteMatch, Router};
use serde_json::{Map, Value};

use crate::error::SpecError;
use crate::model::{Info, Specification};

/// A routable target: a path template plus the methods it accepts.
#[derive(Debug, Clone, PartialEq)]
pub struct Endpoint {
    /// Unique endpoint name (e.g. `apispec_tools_docs`).
    pub name: String,
    /// Path template, e.g. `/users/{id}`.
    pub path: String,
    /// Accepted methods, uppercase.
    pub methods: BTreeSet<String>,
    /// Operation docs, keyed by lowercase method.
    pub docs: BTreeMap<String, Map<String, Value>>,
    /// Left out of the public spec unless explicitly included.
    pub exclude_from_spec: bool,
}

impl Endpoint {
    pub fn new(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            methods: BTreeSet::new(),
            docs: BTreeMap::new(),
            exclude_from_spec: false,
        }
    }

    /// Accept `method` without documenting it.
    pub fn method(mut self, method: &str) -> Self {
        self.methods.insert(method.to_ascii_uppercase());
        self
    }

    /// Accept `method` and attach its operation object.
    pub fn doc(mut self, method: &str, operation: Map<String, Value>) -> Self {
        self.methods.insert(method.to_ascii_uppercase());
        self.docs.insert(method.to_ascii_lowercase(), operation);
        self
    }

    /// Accept `method` and attach an operation object written as YAML.
    pub fn doc_yaml(self, method: &str, yaml: &str) -> Result<Self, SpecError> {
        let invalid = |reason: String| SpecError::InvalidDocs {
            method: method.to_ascii_uppercase(),
            path: self.path.clone(),
            reason,
        };
        let value: Value = serde_yaml::from_str(yaml).map_err(|e| invalid(e.to_string()))?;
        match value {
            Value::Object(operation) => Ok(self.doc(method, operation)),
            _ => Err(SpecError::DocsNotAnObject {
                method: method.to_ascii_uppercase(),
                path: self.path.clone(),
            }),
        }
    }

    pub fn exclude_from_spec(mut self) -> Self {
        self.exclude_from_spec = true;
        self
    }
}

/// Registered endpoints plus the router that resolves requests to them.
#[derive(Debug, Default)]
pub struct EndpointRegistry {
    endpoints: Vec<Endpoint>,
    router: Router,
}

impl EndpointRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an endpoint and return its index.
    ///
    /// Several endpoints may share a path template with different methods.
    /// For a repeated (template, method) pair the later endpoint wins.
    pub fn register(&mut self, endpoint: Endpoint) -> usize {
        let index = self.endpoints.len();
        for method in &endpoint.methods {
            self.router.insert(
                &endpoint.path,
                method,
                RouteEntry {
                    endpoint_index: index,
                    template: endpoint.path.clone(),
                },
            );
        }
        self.endpoints.push(endpoint);
        index
    }

    pub fn endpoints(&self) -> &[Endpoint] {
        &self.endpoints
    }

    pub fn get(&self, index: usize) -> Option<&Endpoint> {
        self.endpoints.get(index)
    }

    pub fn by_name(&self, name: &str) -> Option<&Endpoint> {
        self.endpoints.iter().find(|e| e.name == name)
    }

    /// Resolve a concrete request to an endpoint.
    pub fn resolve(&self, path: &str, method: &str) -> RouteMatch {
        self.router.lookup(path, method)
    }
}

/// Hook for extending the built spec.
pub trait SpecPlugin: Send + Sync {
    /// Name used to select the plugin from configuration.
    fn name(&self) -> &str;

    /// Called once on the fresh spec, before any path is added.
    fn init_spec(&self, _spec: &mut Specification) {}

    /// Called for each operation as it is added under `paths`.
    fn operation(&self, _path: &str, _method: &str, _operation: &mut Map<String, Value>) {}
}

/// Assembles a [`Specification`] from a registry.
pub struct SpecBuilder<'a> {
    info: Info,
    plugins: &'a [Arc<dyn SpecPlugin>],
}

impl<'a> SpecBuilder<'a> {
    pub fn new(info: Info, plugins: &'a [Arc<dyn SpecPlugin>]) -> Self {
        Self { info, plugins }
    }

    /// Build the spec. `include_excluded` adds endpoints flagged
    /// `exclude_from_spec`.
    pub fn build(&self, registry: &EndpointRegistry, include_excluded: bool) -> Specification {
        let mut spec = Specification::new(self.info.clone());
        for plugin in self.plugins {
            plugin.init_spec(&mut spec);
        }

        let included = registry
            .endpoints()
            .iter()
            .filter(|e| include_excluded || !e.exclude_from_spec);

        for endpoint in included {
            let path_item = spec.paths.entry(endpoint.path.clone()).or_default();
            for method in &endpoint.methods {
                let key = method.to_ascii_lowercase();
                let mut operation = endpoint.docs.get(&key).cloned().unwrap_or_default();
                for plugin in self.plugins {
                    plugin.operation(&endpoint.path, &key, &mut operation);
                }
                path_item.insert(key, Value::Object(operation));
            }
        }

        spec
    }
}
