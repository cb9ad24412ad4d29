//! Response validation middleware.
//!
//! Every response to a routed request is checked against the full spec
//! (excluded endpoints included). A response the spec does not describe is
//! replaced by a 500 problem document naming the first missing element.

use std::sync::Arc;

use apispec_router::RouteMatch;
use apispec_spec::SpecIndex;
use apispec_telemetry::log_validation_failure;
use apispec_validator::{
    media_type_of, ProblemDetails, ResponseValidationError, ResponseValidator, ServedResponse,
};
use axum::{
    body::Body,
    extract::{MatchedPath, Request, State},
    http::{header, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use http_body_util::BodyExt;

use crate::app::ApiDocs;

pub async fn validate_responses(
    State(docs): State<Arc<ApiDocs>>,
    request: Request,
    next: Next,
) -> Response {
    // The registry forgives trailing and doubled slashes; axum does not.
    // Only requests axum routed are checked.
    if request.extensions().get::<MatchedPath>().is_none() {
        return next.run(request).await;
    }

    let method = request.method().as_str().to_string();
    let route = docs.registry().resolve(request.uri().path(), &method);
    if !matches!(route, RouteMatch::Found { .. }) {
        return next.run(request).await;
    }

    let response = next.run(request).await;
    let (parts, body) = response.into_parts();
    let bytes = match body.collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(e) => {
            tracing::error!(error = %e, "failed to buffer response body");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    let served = ServedResponse {
        method,
        status_code: parts.status.as_u16(),
        media_type: media_type_of(
            parts
                .headers
                .get(header::CONTENT_TYPE)
                .and_then(|v| v.to_str().ok()),
        ),
        body_length: bytes.len(),
    };

    let spec = docs.spec(true);
    match ResponseValidator::new(SpecIndex::new(&spec)).validate(&route, served) {
        Ok(_) => Response::from_parts(parts, Body::from(bytes)),
        Err(err) => {
            log_validation_failure!(
                method = %err.method,
                path = %err.path,
                status_code = err.status_code,
                error = %err.kind,
                "response not documented"
            );
            problem_response(&err)
        }
    }
}

fn problem_response(err: &ResponseValidationError) -> Response {
    let problem = ProblemDetails::response_undocumented(err);
    let mut response = (StatusCode::INTERNAL_SERVER_ERROR, problem.to_json()).into_response();
    response.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/problem+json"),
    );
    response
}
