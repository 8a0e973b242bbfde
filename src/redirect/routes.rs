use axum::{middleware, routing::get, Router};
use std::path::Path;
use std::sync::Arc;

use crate::analytics::AnalyticsReporter;
use crate::config::RedirectMode;

use super::handlers::{redirect_request, RedirectState};
use super::middleware::record_request_timing;
use super::resolver::RedirectResolver;
use super::static_files::{favicon, static_dir_service, STATIC_PREFIX};

pub fn create_redirect_router(
    resolver: RedirectResolver,
    reporter: AnalyticsReporter,
    redirect_mode: RedirectMode,
    static_dir: &Path,
) -> Router {
    let state = Arc::new(RedirectState {
        resolver,
        reporter,
        redirect_mode,
    });

    Router::new()
        .route("/", get(redirect_request).post(redirect_request))
        .route("/favicon.ico", get(favicon))
        .route("/{*group}", get(redirect_request).post(redirect_request))
        .nest_service(STATIC_PREFIX, static_dir_service(static_dir))
        .layer(middleware::from_fn(record_request_timing))
        .with_state(state)
}
