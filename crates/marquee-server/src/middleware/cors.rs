// SPDX-License-Identifier: Apache-2.0

use crate::AppState;
use axum::body::Body;
use axum::extract::State;
use axum::http::{HeaderMap, HeaderValue, Method, Request, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

const ALLOW_METHODS: &str = "GET,POST,PUT,DELETE,OPTIONS";
const ALLOW_HEADERS: &str = "content-type,x-request-id";

fn normalized_origin(headers: &HeaderMap) -> Option<String> {
    let raw = headers.get("origin")?.to_str().ok()?.trim();
    if raw.is_empty() || raw.len() > 256 {
        return None;
    }
    Some(raw.to_string())
}

fn allow_origin_value(state: &AppState, origin: Option<&str>) -> Option<HeaderValue> {
    if state.api.allows_any_origin() {
        return Some(HeaderValue::from_static("*"));
    }
    let origin = origin?;
    if state.api.allows_origin(origin) {
        HeaderValue::from_str(origin).ok()
    } else {
        None
    }
}

pub(crate) async fn cors_middleware(
    State(state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let origin = normalized_origin(req.headers());
    let allow = allow_origin_value(&state, origin.as_deref());

    if req.method() == Method::OPTIONS {
        let mut resp = StatusCode::NO_CONTENT.into_response();
        if let Some(value) = allow {
            let headers = resp.headers_mut();
            headers.insert("access-control-allow-origin", value);
            headers.insert(
                "access-control-allow-methods",
                HeaderValue::from_static(ALLOW_METHODS),
            );
            headers.insert(
                "access-control-allow-headers",
                HeaderValue::from_static(ALLOW_HEADERS),
            );
            headers.insert("access-control-max-age", HeaderValue::from_static("600"));
        }
        return resp;
    }

    let mut resp = next.run(req).await;
    if let Some(value) = allow {
        resp.headers_mut().insert("access-control-allow-origin", value);
        if !state.api.allows_any_origin() {
            resp.headers_mut()
                .insert("vary", HeaderValue::from_static("Origin"));
        }
    }
    resp
}
