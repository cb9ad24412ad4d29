//! Built-in documentation endpoints.

use std::sync::Arc;

use apispec_spec::Specification;
use axum::{extract::State, response::Html, routing::get, Json, Router};
use serde::Serialize;

use crate::app::ApiDocs;

#[derive(Serialize)]
pub struct VersionResponse {
    pub version: String,
}

/// GET /docs
///
/// Standalone Swagger UI page loading the spec from the JSON endpoint.
async fn docs_page(State(docs): State<Arc<ApiDocs>>) -> Html<String> {
    let spec_url = docs.endpoints().docs_json.as_deref().unwrap_or("/docs/json");
    Html(render_docs_page(&docs.config().title, spec_url))
}

/// GET /docs/json
async fn docs_json(State(docs): State<Arc<ApiDocs>>) -> Json<Specification> {
    Json(docs.spec(false).as_ref().clone())
}

/// GET /version
async fn version(State(docs): State<Arc<ApiDocs>>) -> Json<VersionResponse> {
    Json(VersionResponse {
        version: docs.config().version.clone(),
    })
}

/// Routes for whichever built-in endpoints are enabled.
pub fn router(docs: Arc<ApiDocs>) -> Router {
    let endpoints = docs.endpoints().clone();
    let mut router = Router::new();
    if let Some(path) = &endpoints.docs {
        router = router.route(path, get(docs_page));
    }
    if let Some(path) = &endpoints.docs_json {
        router = router.route(path, get(docs_json));
    }
    if let Some(path) = &endpoints.version {
        router = router.route(path, get(version));
    }
    router.with_state(docs)
}

fn render_docs_page(title: &str, spec_url: &str) -> String {
    DOCS_PAGE
        .replace("{title}", &escape_html(title))
        .replace("{spec_url}", &escape_html(spec_url))
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

const DOCS_PAGE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <link rel="stylesheet" href="https://unpkg.com/swagger-ui-dist@5/swagger-ui.css">
    <style>
        body { margin: 0; padding: 0; }
    </style>
</head>
<body>
    <div id="swagger-ui"></div>
    <script src="https://unpkg.com/swagger-ui-dist@5/swagger-ui-bundle.js" crossorigin></script>
    <script>
        window.onload = () => {
            window.ui = SwaggerUIBundle({
                url: "{spec_url}",
                dom_id: '#swagger-ui',
                deepLinking: true,
                presets: [SwaggerUIBundle.presets.apis],
                layout: "BaseLayout"
            });
        };
    </script>
</body>
</html>
"#;
