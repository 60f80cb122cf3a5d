//! CORS filter middleware.
//!
//! Responsibilities:
//! - Extract a `CorsRequest` from the inbound request head (body untouched)
//! - Ask the engine for a `Decision`
//! - Translate it: forward, answer a preflight, or reject with a bare status
//!
//! Install with `axum::middleware::from_fn_with_state(state, cors_filter)`.

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, HeaderName, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};

use corsgate_core::{AllowHeaders, CorsRequest, Decision, RequestKind};

use crate::app_state::AppState;

pub const X_REQUESTED_WITH: HeaderName = HeaderName::from_static("x-requested-with");

pub async fn cors_filter(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let Some(descriptor) = describe(&req) else {
        // an Origin we cannot echo byte-exact is never trusted
        state.metrics().record(&Decision::Forbidden);
        tracing::debug!(
            method = %req.method(),
            path = %req.uri().path(),
            "cors reject: unreadable cors header"
        );
        return StatusCode::FORBIDDEN.into_response();
    };
    let decision = state.engine().evaluate(&descriptor);
    state.metrics().record(&decision);

    match decision {
        Decision::PassThrough => next.run(req).await,
        Decision::Allow(allow) => {
            tracing::trace!(
                method = %descriptor.method,
                path = %descriptor.path,
                tier = allow.tier.as_str(),
                kind = allow.kind.as_str(),
                "cors allow"
            );
            let mut resp = match allow.kind {
                RequestKind::Preflight => StatusCode::OK.into_response(),
                RequestKind::Actual => next.run(req).await,
            };
            apply_allow_headers(resp.headers_mut(), &allow);
            resp
        }
        rejected => {
            tracing::debug!(
                method = %descriptor.method,
                path = %descriptor.path,
                origin = descriptor.origin.as_deref().unwrap_or_default(),
                outcome = rejected.outcome(),
                "cors reject"
            );
            rejected
                .status()
                .and_then(|s| StatusCode::from_u16(s).ok())
                .unwrap_or(StatusCode::FORBIDDEN)
                .into_response()
        }
    }
}

/// Build the engine's view of a request from its head.
///
/// Returns `None` when `Origin` or an `Access-Control-Request-*` header is not
/// visible ASCII; those values are echoed back and must round-trip exactly.
pub fn describe(req: &Request) -> Option<CorsRequest> {
    let headers = req.headers();

    let origin = match headers.get(header::ORIGIN) {
        Some(v) => Some(v.to_str().ok()?.to_string()),
        None => None,
    };
    let request_method = match headers.get(header::ACCESS_CONTROL_REQUEST_METHOD) {
        Some(v) => Some(v.to_str().ok()?.trim().to_string()),
        None => None,
    };

    Some(CorsRequest {
        method: req.method().as_str().to_string(),
        path: req.uri().path().to_string(),
        origin,
        x_requested_with: headers.contains_key(X_REQUESTED_WITH),
        request_method,
        request_headers: joined(headers, header::ACCESS_CONTROL_REQUEST_HEADERS)?,
    })
}

/// Repeated header lines are folded into one comma-separated value.
/// Outer `None` means a line was not visible ASCII.
fn joined(headers: &HeaderMap, name: HeaderName) -> Option<Option<String>> {
    let values = headers
        .get_all(name)
        .iter()
        .map(|v| v.to_str().ok())
        .collect::<Option<Vec<&str>>>()?;
    if values.is_empty() {
        return Some(None);
    }
    Some(Some(values.join(", ")))
}

/// Actual requests get origin + methods; preflights also get headers and
/// max-age.
fn apply_allow_headers(headers: &mut HeaderMap, allow: &AllowHeaders) {
    insert(headers, header::ACCESS_CONTROL_ALLOW_ORIGIN, &allow.origin);
    insert(headers, header::ACCESS_CONTROL_ALLOW_METHODS, &allow.methods);

    if allow.kind == RequestKind::Preflight {
        if let Some(h) = allow.headers.as_deref().filter(|h| !h.is_empty()) {
            insert(headers, header::ACCESS_CONTROL_ALLOW_HEADERS, h);
        }
        insert(headers, header::ACCESS_CONTROL_MAX_AGE, &allow.max_age);
    }
}

fn insert(headers: &mut HeaderMap, name: HeaderName, value: &str) {
    match HeaderValue::from_str(value) {
        Ok(v) => {
            headers.insert(name, v);
        }
        Err(_) => tracing::warn!(header = %name, "unrepresentable cors header value dropped"),
    }
}
