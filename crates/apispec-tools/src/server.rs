//! HTTP server for `serve`.

use std::net::SocketAddr;
use std::sync::Arc;

use apispec_telemetry::log_listening;
use axum::{middleware::from_fn_with_state, Router};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::app::ApiDocs;
use crate::endpoints;
use crate::middleware::validate_responses;

/// Server configuration.
pub struct ServerConfig {
    pub listen_addr: SocketAddr,
    pub docs: Arc<ApiDocs>,
    /// Application routes served next to the docs endpoints.
    pub app: Router,
    /// Check every routed response against the spec.
    pub validate: bool,
}

/// Application routes, docs endpoints and, optionally, response validation.
pub fn create_router(docs: Arc<ApiDocs>, app: Router, validate: bool) -> Router {
    let mut router = app.merge(endpoints::router(Arc::clone(&docs)));
    if validate {
        router = router.layer(from_fn_with_state(docs, validate_responses));
    }
    router.layer(TraceLayer::new_for_http())
}

pub async fn run(config: ServerConfig) -> anyhow::Result<()> {
    let app = create_router(config.docs, config.app, config.validate);

    let listener = TcpListener::bind(config.listen_addr).await?;
    log_listening!(
        addr = %config.listen_addr,
        validate = config.validate,
        "listening"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
