//! Plaintext listener that sends every request to the HTTPS equivalent URL.
//!
//! Each request makes one transition, received → redirected, and carries no
//! state between requests. The target is `https://<host>[:<port>]<path>?<query>`
//! where `<host>` comes from the request and `<port>` is the bound HTTPS port.

use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, uri::Authority, HeaderMap, StatusCode, Uri},
    response::{IntoResponse, Response},
    Router,
};
use common::ServiceError;
use tower_http::trace::TraceLayer;
use tracing::debug;

use super::handlers::ApiError;

/// Where plaintext requests are redirected to.
#[derive(Debug, Clone)]
pub struct RedirectTarget {
    https_port: u16,
    fallback_host: Option<Arc<str>>,
}

impl RedirectTarget {
    /// `fallback_host` is used only when a request names no host of its own.
    pub fn new(https_port: u16, fallback_host: Option<String>) -> Self {
        Self {
            https_port,
            fallback_host: fallback_host.map(Into::into),
        }
    }

    /// Build the `Location` value for a request.
    ///
    /// `authority` is the request's `Host` header or URI authority; any port
    /// in it is replaced by the HTTPS port, which is omitted when it is 443.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::BadRequest`] if the request's host cannot be
    /// parsed, or if neither the request nor the configuration provides one.
    pub fn location(
        &self,
        authority: Option<&str>,
        path_and_query: &str,
    ) -> Result<String, ServiceError> {
        let host = match authority.map(str::trim).filter(|a| !a.is_empty()) {
            Some(authority) => host_of(authority).ok_or_else(|| {
                ServiceError::BadRequest(format!("invalid Host header: {authority:?}"))
            })?,
            None => self
                .fallback_host
                .as_deref()
                .map(str::to_owned)
                .ok_or_else(|| ServiceError::BadRequest("no host to redirect to".into()))?,
        };

        let path = if path_and_query.is_empty() {
            "/"
        } else {
            path_and_query
        };

        Ok(match self.https_port {
            443 => format!("https://{host}{path}"),
            port => format!("https://{host}:{port}{path}"),
        })
    }
}

/// Host portion of an authority, without userinfo or port.
/// IPv6 literals keep their brackets.
fn host_of(authority: &str) -> Option<String> {
    let authority: Authority = authority.parse().ok()?;
    let host = authority.host();
    (!host.is_empty()).then(|| host.to_owned())
}

/// Build the plaintext [`Router`]: every method and path is redirected.
pub fn router(target: RedirectTarget) -> Router {
    Router::new()
        .fallback(redirect)
        .layer(TraceLayer::new_for_http())
        .with_state(target)
}

async fn redirect(State(target): State<RedirectTarget>, headers: HeaderMap, uri: Uri) -> Response {
    let authority = headers
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .or_else(|| uri.authority().map(Authority::as_str));
    let path_and_query = uri.path_and_query().map_or("/", |pq| pq.as_str());

    match target.location(authority, path_and_query) {
        Ok(location) => {
            debug!(%location, "redirecting to https");
            (StatusCode::MOVED_PERMANENTLY, [(header::LOCATION, location)]).into_response()
        }
        Err(e) => ApiError(e).into_response(),
    }
}
