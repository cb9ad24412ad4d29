//! TestApp: in-process application harness.

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    body::Body,
    extract::Query,
    http::{header, HeaderValue, Method, Request, StatusCode},
    response::{IntoResponse, Response},
    Router,
};
use bytes::Bytes;
use http_body_util::BodyExt;
use thiserror::Error;
use tower::ServiceExt;

use apispec_tools::server::create_router;
use apispec_tools::{ApiDocs, AppFile, AppFileError, ConfigError, InitError, InitOptions};

/// Errors from TestApp operations.
#[derive(Debug, Error)]
pub enum TestError {
    #[error("app config error: {0}")]
    AppFile(#[from] AppFileError),

    #[error("docs config error: {0}")]
    Config(#[from] ConfigError),

    #[error("init failed: {0}")]
    Init(#[from] InitError),

    #[error("request failed: {0}")]
    Http(String),

    #[error("invalid JSON body: {0}")]
    Json(#[from] serde_json::Error),
}

/// An application built from an app config file, driven without a socket.
///
/// Requests go through the same router `serve` uses, so docs endpoints,
/// mocks and the validation middleware all apply.
pub struct TestApp {
    router: Router,
    docs: Arc<ApiDocs>,
}

impl TestApp {
    /// Serve the endpoints' mock responses.
    pub fn from_app_file(yaml: &str, validate: bool) -> Result<Self, TestError> {
        let file = AppFile::parse(yaml)?;
        let routes = file.mock_router()?;
        Self::build(&file, routes, validate)
    }

    /// Serve `routes` in place of the mocks. The endpoints in `yaml` still
    /// define what is documented and routable.
    pub fn with_routes(yaml: &str, routes: Router, validate: bool) -> Result<Self, TestError> {
        let file = AppFile::parse(yaml)?;
        Self::build(&file, routes, validate)
    }

    fn build(file: &AppFile, routes: Router, validate: bool) -> Result<Self, TestError> {
        let docs = Arc::new(ApiDocs::init(
            file.docs_config()?,
            file.registry()?,
            InitOptions::new(),
        )?);
        Ok(Self {
            router: create_router(Arc::clone(&docs), routes, validate),
            docs,
        })
    }

    pub fn docs(&self) -> &ApiDocs {
        &self.docs
    }

    pub async fn get(&self, uri: &str) -> Result<TestResponse, TestError> {
        self.request(Method::GET, uri).await
    }

    pub async fn request(&self, method: Method, uri: &str) -> Result<TestResponse, TestError> {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .map_err(|e| TestError::Http(e.to_string()))?;

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .map_err(|e| TestError::Http(e.to_string()))?;

        let status = response.status();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response
            .into_body()
            .collect()
            .await
            .map_err(|e| TestError::Http(e.to_string()))?
            .to_bytes();

        Ok(TestResponse {
            status,
            content_type,
            body,
        })
    }
}

/// A buffered response.
#[derive(Debug, Clone)]
pub struct TestResponse {
    pub status: StatusCode,
    pub content_type: Option<String>,
    pub body: Bytes,
}

impl TestResponse {
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn json(&self) -> Result<serde_json::Value, TestError> {
        Ok(serde_json::from_slice(&self.body)?)
    }

    /// The `detail` of a validation problem response, if this is one.
    pub fn validation_error(&self) -> Option<String> {
        if self.content_type.as_deref() != Some("application/problem+json") {
            return None;
        }
        self.json()
            .ok()?
            .get("detail")?
            .as_str()
            .map(str::to_string)
    }
}

/// Handler answering with whatever the query asks for:
/// `return_status` (default 200), `return_mime_type` (default `text/plain`)
/// and `return_content`.
pub async fn scripted_response(Query(params): Query<HashMap<String, String>>) -> Response {
    let status = params
        .get("return_status")
        .and_then(|s| s.parse::<u16>().ok())
        .and_then(|code| StatusCode::from_u16(code).ok())
        .unwrap_or(StatusCode::OK);
    let mime_type = params
        .get("return_mime_type")
        .map(String::as_str)
        .unwrap_or("text/plain");
    let content = params.get("return_content").cloned().unwrap_or_default();

    let mut response = (status, content).into_response();
    if let Ok(value) = HeaderValue::from_str(mime_type) {
        response.headers_mut().insert(header::CONTENT_TYPE, value);
    }
    response
}
