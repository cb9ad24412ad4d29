//! Response conformance validation.
//!
//! Confirms that a served response's status code, content presence and
//! media type are documented in the built OpenAPI spec. Checks run in a
//! fixed order and stop at the first gap. Response bodies are never
//! validated against schemas.

use std::collections::HashMap;

use serde_json::Value;
use thiserror::Error;

use apispec_router::RouteMatch;
use apispec_spec::SpecIndex;

/// Media type assumed for a response that carries no `Content-Type`.
pub const DEFAULT_MEDIA_TYPE: &str = "application/octet-stream";

/// The single documentation gap found for a response.
///
/// The display string is the short description used as the error message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UndocumentedKind {
    /// The method is not under the path. A spec built from the registry
    /// always documents every routable method, so reaching this means the
    /// spec and the routes disagree.
    #[error("{method} missing")]
    MethodUndocumented { method: String },

    #[error("responses missing")]
    ResponsesUndocumented,

    #[error("{status_code} missing")]
    StatusCodeUndocumented { status_code: String },

    #[error("content missing")]
    ContentUndocumented,

    #[error("{media_type} missing")]
    MediaTypeUndocumented { media_type: String },
}

/// A served response that does not match the spec.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{method} {path} -> {status_code}: {kind}")]
pub struct ResponseValidationError {
    /// Uppercase HTTP method.
    pub method: String,
    pub path: String,
    pub status_code: u16,
    pub kind: UndocumentedKind,
}

impl ResponseValidationError {
    /// The short description of the failed check, e.g. `"204 missing"`.
    pub fn message(&self) -> String {
        self.kind.to_string()
    }
}

/// Everything the checks need from one served response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationTarget {
    /// Path template the request matched.
    pub path: String,
    pub method: String,
    pub status_code: u16,
    /// Media type without parameters, lowercase.
    pub media_type: String,
    pub body_length: usize,
}

/// The parts of a response that do not depend on routing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServedResponse {
    pub method: String,
    pub status_code: u16,
    pub media_type: String,
    pub body_length: usize,
}

/// How a response passed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Nothing to validate against.
    Skipped(SkipReason),
    /// Documented status with no content, and the body is empty.
    Bodyless,
    /// Status code and media type are documented.
    Conforms,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The request matched no registered endpoint.
    NoEndpoint,
    /// The endpoint does not accept the request's method.
    MethodNotAllowed,
}

/// Runs the ordered checks against one spec.
#[derive(Debug, Clone, Copy)]
pub struct ResponseValidator<'a> {
    index: SpecIndex<'a>,
}

impl<'a> ResponseValidator<'a> {
    pub fn new(index: SpecIndex<'a>) -> Self {
        Self { index }
    }

    /// Validate a response given how its request was routed.
    ///
    /// Unrouted requests and disallowed methods are skipped; otherwise the
    /// matched path template is checked.
    pub fn validate(
        &self,
        route: &RouteMatch,
        response: ServedResponse,
    ) -> Result<Outcome, ResponseValidationError> {
        let template = match route {
            RouteMatch::NotFound => return Ok(Outcome::Skipped(SkipReason::NoEndpoint)),
            RouteMatch::MethodNotAllowed { .. } => {
                return Ok(Outcome::Skipped(SkipReason::MethodNotAllowed))
            }
            RouteMatch::Found { entry, .. } => &entry.template,
        };

        self.check(&ValidationTarget {
            path: template.clone(),
            method: response.method,
            status_code: response.status_code,
            media_type: response.media_type,
            body_length: response.body_length,
        })
    }

    /// Run the documentation checks on a routed response.
    pub fn check(&self, target: &ValidationTarget) -> Result<Outcome, ResponseValidationError> {
        self.run_checks(target)
            .map_err(|kind| ResponseValidationError {
                method: target.method.to_ascii_uppercase(),
                path: target.path.clone(),
                status_code: target.status_code,
                kind,
            })
    }

    fn run_checks(&self, target: &ValidationTarget) -> Result<Outcome, UndocumentedKind> {
        let operation = self
            .index
            .lookup(&target.path, &target.method)
            .ok_or_else(|| UndocumentedKind::MethodUndocumented {
                method: target.method.to_ascii_lowercase(),
            })?;

        let responses = operation
            .responses()
            .ok_or(UndocumentedKind::ResponsesUndocumented)?;

        let status_code = target.status_code.to_string();
        let status = responses
            .status(&status_code)
            .ok_or(UndocumentedKind::StatusCodeUndocumented { status_code })?;

        let content = status.content();
        if content.is_none() && target.body_length == 0 {
            return Ok(Outcome::Bodyless);
        }

        let content = content.ok_or(UndocumentedKind::ContentUndocumented)?;
        if !content.contains(&target.media_type) {
            return Err(UndocumentedKind::MediaTypeUndocumented {
                media_type: target.media_type.clone(),
            });
        }

        Ok(Outcome::Conforms)
    }
}

/// Media type of a `Content-Type` value: parameters dropped, lowercased.
pub fn media_type_of(content_type: Option<&str>) -> String {
    content_type
        .and_then(|ct| ct.split(';').next())
        .map(|mt| mt.trim().to_ascii_lowercase())
        .filter(|mt| !mt.is_empty())
        .unwrap_or_else(|| DEFAULT_MEDIA_TYPE.to_string())
}

/// RFC 9457 problem details for an undocumented response.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ProblemDetails {
    #[serde(rename = "type")]
    pub error_type: String,
    pub title: String,
    pub status: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance: Option<String>,
    #[serde(flatten)]
    pub extensions: HashMap<String, Value>,
}

impl ProblemDetails {
    pub fn response_undocumented(error: &ResponseValidationError) -> Self {
        let mut extensions = HashMap::new();
        extensions.insert("method".into(), Value::String(error.method.clone()));
        extensions.insert("path".into(), Value::String(error.path.clone()));
        extensions.insert("status_code".into(), Value::from(error.status_code));
        extensions.insert("message".into(), Value::String(error.message()));

        ProblemDetails {
            error_type: "urn:apispec-tools:error:response-undocumented".into(),
            title: "Response does not match the API documentation".into(),
            status: 500,
            detail: Some(error.to_string()),
            instance: Some(error.path.clone()),
            extensions,
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| {
            r#"{"type":"urn:apispec-tools:error:internal","title":"Serialization error","status":500}"#.into()
        })
    }
}
