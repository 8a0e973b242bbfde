use axum::{
    extract::{ConnectInfo, State},
    http::{
        header::{self, HeaderMap},
        Uri,
    },
    response::{IntoResponse, Response},
};
use percent_encoding::percent_decode_str;
use std::net::SocketAddr;
use std::sync::Arc;

use super::error::ConfigurationError;
use super::resolver::RedirectResolver;
use crate::analytics::{extract_client_ip, AnalyticsEvent, AnalyticsReporter, VisitContext};
use crate::config::RedirectMode;

pub struct RedirectState {
    pub resolver: RedirectResolver,
    pub reporter: AnalyticsReporter,
    pub redirect_mode: RedirectMode,
}

/// Redirect for any path; the whole path after `/` names the group and
/// `/` itself is served by the root group
pub async fn redirect_request(
    State(state): State<Arc<RedirectState>>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    uri: Uri,
    headers: HeaderMap,
) -> Result<Response, ConfigurationError> {
    let group = group_from_path(uri.path());
    redirect(&state, &group, addr, &uri, &headers).await
}

/// Percent-decoded path without its leading slash. Invalid UTF-8 is replaced
/// rather than rejected, so such paths fall back to the root group.
fn group_from_path(path: &str) -> String {
    let raw = path.strip_prefix('/').unwrap_or(path);
    percent_decode_str(raw).decode_utf8_lossy().into_owned()
}

async fn redirect(
    state: &RedirectState,
    group: &str,
    addr: SocketAddr,
    uri: &Uri,
    headers: &HeaderMap,
) -> Result<Response, ConfigurationError> {
    let user_agent = headers
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();

    let resolution = state.resolver.resolve(group, user_agent).await?;

    tracing::debug!(
        redirect_group = %resolution.group,
        device = %resolution.device,
        destination = %resolution.destination,
        fallback = resolution.fallback_used(),
        "resolved redirect"
    );

    if state.reporter.is_enabled() {
        let visit = VisitContext {
            client_ip: extract_client_ip(headers, addr.ip()),
            user_agent: user_agent.to_string(),
            page_location: request_url(uri, headers),
            page_path: uri.path().to_string(),
        };
        // Detached: the response must not wait on delivery
        let _detached = state
            .reporter
            .report(AnalyticsEvent::for_redirect(&resolution, &visit));
    }

    Ok((
        state.redirect_mode.status_code(),
        [(header::LOCATION, resolution.destination)],
    )
        .into_response())
}

/// Absolute URL of the request as the client addressed it.
fn request_url(uri: &Uri, headers: &HeaderMap) -> String {
    if uri.scheme().is_some() {
        return uri.to_string();
    }

    let path_and_query = uri.path_and_query().map(|pq| pq.as_str()).unwrap_or("/");
    let header_str = |name: header::HeaderName| headers.get(name).and_then(|v| v.to_str().ok());

    match header_str(header::HOST) {
        Some(host) => {
            let scheme = header_str(header::HeaderName::from_static("x-forwarded-proto"))
                .unwrap_or("http");
            format!("{scheme}://{host}{path_and_query}")
        }
        None => path_and_query.to_string(),
    }
}
