//! Response validation through the full application stack.
//!
//! Each case asks `/test_endpoint` for a particular status, media type and
//! body, then checks whether the validation middleware let the response
//! through or replaced it with a problem naming the first missing element.

use axum::{http::Method, routing::get, Router};

use crate::app::{scripted_response, TestApp};

const APP: &str = r#"
apispec_tools:
  title: Some Title
  version: 1.2.3
  description: Some description.
  docs_type: json
another_section:
  option: foobar
endpoints:
  - name: test_endpoint
    path: /test_endpoint
    methods: [DELETE]
    docs:
      get:
        summary: Echoes what the query asks for.
        responses:
          "200":
            description: Plain text.
            content:
              text/plain:
                schema:
                  type: string
          "204":
            description: Nothing.
          "400":
            description: Bad request, without a documented body.
      post:
        summary: Documented, but without responses.
"#;

const FISH: &str = "There%20was%20a%20fish%20in%20the%20percolator%21";

fn app() -> TestApp {
    let routes = Router::new().route(
        "/test_endpoint",
        get(scripted_response)
            .post(scripted_response)
            .delete(scripted_response),
    );
    TestApp::with_routes(APP, routes, true).unwrap()
}

/// Request `path` and return the validation failure detail, if any.
async fn validate(
    method: Method,
    path: &str,
    status: Option<u16>,
    mime_type: Option<&str>,
    content: Option<&str>,
) -> Option<String> {
    let uri = format!(
        "{}?return_status={}&return_mime_type={}&return_content={}",
        path,
        status.unwrap_or(200),
        mime_type.unwrap_or("text/plain"),
        content.unwrap_or(FISH),
    );
    app().request(method, &uri).await.unwrap().validation_error()
}

#[tokio::test]
async fn endpoint_does_not_exist() {
    let response = app().get("/path-not-found").await.unwrap();
    assert_eq!(response.status, 404);
    assert!(response.validation_error().is_none());
}

#[tokio::test]
async fn method_not_allowed() {
    assert_eq!(validate(Method::PUT, "/test_endpoint", None, None, None).await, None);
    let response = app().request(Method::PUT, "/test_endpoint").await.unwrap();
    assert_eq!(response.status, 405);
}

#[tokio::test]
async fn docs_without_responses() {
    assert_eq!(
        validate(Method::POST, "/test_endpoint", None, None, None).await.as_deref(),
        Some("POST /test_endpoint -> 200: responses missing")
    );
}

#[tokio::test]
async fn no_docs() {
    assert_eq!(
        validate(Method::DELETE, "/test_endpoint", None, None, None).await.as_deref(),
        Some("DELETE /test_endpoint -> 200: responses missing")
    );
}

#[tokio::test]
async fn no_status_code() {
    assert_eq!(
        validate(Method::GET, "/test_endpoint", Some(202), None, None).await.as_deref(),
        Some("GET /test_endpoint -> 202: 202 missing")
    );
}

#[tokio::test]
async fn no_content_with_response_body() {
    assert_eq!(
        validate(Method::GET, "/test_endpoint", Some(400), None, None).await.as_deref(),
        Some("GET /test_endpoint -> 400: content missing")
    );
}

#[tokio::test]
async fn no_content_without_response_body() {
    assert_eq!(
        validate(Method::GET, "/test_endpoint", Some(204), None, Some("")).await,
        None
    );
}

#[tokio::test]
async fn no_mime_type() {
    assert_eq!(
        validate(Method::GET, "/test_endpoint", None, Some("text/html"), None).await.as_deref(),
        Some("GET /test_endpoint -> 200: text/html missing")
    );
}

#[tokio::test]
async fn pass() {
    let response = app()
        .get(&format!("/test_endpoint?return_content={FISH}"))
        .await
        .unwrap();
    assert_eq!(response.status, 200);
    assert_eq!(response.text(), "There was a fish in the percolator!");
    assert!(response.validation_error().is_none());
}

#[tokio::test]
async fn validation_off_lets_everything_through() {
    let routes = Router::new().route("/test_endpoint", get(scripted_response));
    let app = TestApp::with_routes(APP, routes, false).unwrap();
    let response = app
        .get("/test_endpoint?return_status=202&return_content=x")
        .await
        .unwrap();
    assert_eq!(response.status, 202);
}

#[tokio::test]
async fn docs_endpoints_serve_spec_and_version() {
    let app = app();

    let version = app.get("/version").await.unwrap();
    assert_eq!(version.json().unwrap(), serde_json::json!({"version": "1.2.3"}));

    let spec = app.get("/docs/json").await.unwrap().json().unwrap();
    assert_eq!(spec["openapi"], "3.0.3");
    assert_eq!(spec["info"]["title"], "Some Title");
    assert_eq!(spec["paths"]["/test_endpoint"]["delete"], serde_json::json!({}));
    assert!(spec["paths"].get("/docs").is_none());

    let page = app.get("/docs").await.unwrap();
    assert_eq!(page.status, 200);
    assert!(page.text().contains("/docs/json"));
}

#[tokio::test]
async fn mock_app_conforms() {
    let app = TestApp::from_app_file(
        r#"
apispec_tools:
  docs_type: yaml
endpoints:
  - path: /items/{id}
    docs:
      get:
        responses:
          "200":
            content:
              application/json: {}
    mock:
      body: {"id": 1}
"#,
        true,
    )
    .unwrap();

    let response = app.get("/items/5").await.unwrap();
    assert_eq!(response.status, 200);
    assert_eq!(response.json().unwrap(), serde_json::json!({"id": 1}));
    assert_eq!(app.docs().encoding().as_str(), "yaml");
}
