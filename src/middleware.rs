use axum::{
    extract::{Request, State},
    http::{header, uri::PathAndQuery, StatusCode, Uri},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::config::LegacyPaths;

const LEGACY_PREFIX: &str = "/tasks/";
const CURRENT_PREFIX: &str = "/todos/";

/// Logs every request on the way in and its status on the way out.
pub async fn log_requests(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_owned();
    tracing::info!(%method, %path, "request");

    let response = next.run(request).await;

    tracing::info!(%method, %path, status = response.status().as_u16(), "response");
    response
}

/// Sends `/tasks/{rest}` to `/todos/{rest}`, either by rewriting the request
/// or by redirecting the client.
pub async fn legacy_paths(
    State(mode): State<LegacyPaths>,
    mut request: Request,
    next: Next,
) -> Response {
    let Some(target) = legacy_target(request.uri()) else {
        return next.run(request).await;
    };
    match mode {
        LegacyPaths::Redirect => {
            (StatusCode::FOUND, [(header::LOCATION, target.as_str())]).into_response()
        }
        LegacyPaths::Rewrite => {
            let mut parts = request.uri().clone().into_parts();
            parts.path_and_query = Some(target);
            match Uri::from_parts(parts) {
                Ok(uri) => {
                    tracing::debug!(from = %request.uri(), to = %uri, "rewrote legacy path");
                    *request.uri_mut() = uri;
                }
                Err(err) => tracing::warn!(%err, "could not rewrite legacy path"),
            }
            next.run(request).await
        }
    }
}

// `/tasks/x?y` -> `/todos/x?y`, anything else -> None
fn legacy_target(uri: &Uri) -> Option<PathAndQuery> {
    let rest = uri.path().strip_prefix(LEGACY_PREFIX)?;
    let target = match uri.query() {
        Some(query) => format!("{CURRENT_PREFIX}{rest}?{query}"),
        None => format!("{CURRENT_PREFIX}{rest}"),
    };
    target.parse().ok()
}
