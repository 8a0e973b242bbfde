use axum::response::Redirect;
use std::path::Path;
use tower_http::services::ServeDir;

/// Prefix under which the static directory is mounted
pub const STATIC_PREFIX: &str = "/static";
pub const FAVICON_PATH: &str = "/static/favicon.ico";

/// Serve files from `dir` on disk
pub fn static_dir_service(dir: &Path) -> ServeDir {
    if !dir.is_dir() {
        tracing::warn!(
            static_dir = %dir.display(),
            "static directory does not exist, {STATIC_PREFIX} will answer 404"
        );
    }

    ServeDir::new(dir).append_index_html_on_directories(false)
}

/// Browsers ask for `/favicon.ico`; point them at the static copy
pub async fn favicon() -> Redirect {
    Redirect::temporary(FAVICON_PATH)
}
