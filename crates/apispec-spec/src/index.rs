//! Borrowed, read-only views over a [`Specification`].
//!
//! Each view narrows one level of `path -> method -> responses -> status
//! code -> content -> media type`. Nothing here can mutate the spec.

use serde_json::{Map, Value};

use crate::model::Specification;

/// Structural lookup over a built spec.
#[derive(Debug, Clone, Copy)]
pub struct SpecIndex<'a> {
    spec: &'a Specification,
}

/// The operation object documented for one (path, method).
#[derive(Debug, Clone, Copy)]
pub struct MethodSpec<'a>(&'a Map<String, Value>);

/// The `responses` section of an operation.
#[derive(Debug, Clone, Copy)]
pub struct Responses<'a>(&'a Map<String, Value>);

/// The entry documented for one status code.
///
/// A null or non-object entry (`400:` in YAML) counts as an entry that
/// declares nothing.
#[derive(Debug, Clone, Copy)]
pub struct StatusSpec<'a>(Option<&'a Map<String, Value>>);

/// The `content` section of a status code entry.
#[derive(Debug, Clone, Copy)]
pub struct Content<'a>(&'a Map<String, Value>);

impl<'a> SpecIndex<'a> {
    pub fn new(spec: &'a Specification) -> Self {
        Self { spec }
    }

    pub fn contains_path(&self, path: &str) -> bool {
        self.spec.contains_path(path)
    }

    /// The operation for `path` and `method`. Methods match case-insensitively.
    pub fn lookup(&self, path: &str, method: &str) -> Option<MethodSpec<'a>> {
        self.spec
            .paths
            .get(path)?
            .get(&method.to_ascii_lowercase())?
            .as_object()
            .map(MethodSpec)
    }
}

impl<'a> MethodSpec<'a> {
    pub fn responses(&self) -> Option<Responses<'a>> {
        self.0.get("responses")?.as_object().map(Responses)
    }
}

impl<'a> Responses<'a> {
    /// The entry for `code`, e.g. `"200"`.
    pub fn status(&self, code: &str) -> Option<StatusSpec<'a>> {
        self.0.get(code).map(|entry| StatusSpec(entry.as_object()))
    }

    pub fn codes(&self) -> impl Iterator<Item = &'a str> {
        self.0.keys().map(String::as_str)
    }
}

impl<'a> StatusSpec<'a> {
    pub fn content(&self) -> Option<Content<'a>> {
        self.0?.get("content")?.as_object().map(Content)
    }
}

impl<'a> Content<'a> {
    pub fn contains(&self, media_type: &str) -> bool {
        self.0.contains_key(media_type)
    }

    pub fn media_types(&self) -> impl Iterator<Item = &'a str> {
        self.0.keys().map(String::as_str)
    }
}
