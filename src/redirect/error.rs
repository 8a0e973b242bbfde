use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

/// Problems with the redirect table that make a request unanswerable
#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("Redirect configuration file '{}' not found.", path.display())]
    NotFound { path: PathBuf },

    #[error("Could not read redirect configuration file '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not decode JSON from '{}': {source}", path.display())]
    Invalid {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Redirect group '{group}' is not a mapping of device to URL: {source}")]
    InvalidGroup {
        group: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Fallback redirect group 'root' not found.")]
    MissingRoot,

    #[error("No redirect URL configured for group '{group}'")]
    NoDestination { group: String },
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub detail: String,
}

impl IntoResponse for ConfigurationError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self, "redirect configuration error");

        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                detail: self.to_string(),
            }),
        )
            .into_response()
    }
}
