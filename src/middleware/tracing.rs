// ABOUTME: Request tracing helpers for correlation and structured logging
// ABOUTME: Creates one span per HTTP request carrying method, path, and request id
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 MindMate Contributors

use crate::routes::require_user_id;
use axum::http::Request;
use tracing::{info_span, Span};
use uuid::Uuid;

/// Header carrying a caller-supplied correlation id
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Caller-supplied request id, or a freshly generated one
#[must_use]
pub fn request_id<B>(request: &Request<B>) -> String {
    request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.is_empty())
        .map_or_else(|| format!("req_{}", Uuid::new_v4().simple()), str::to_owned)
}

/// User id the handlers will resolve for this request, if any
#[must_use]
pub fn span_user_id<B>(request: &Request<B>) -> Option<Uuid> {
    require_user_id(request.headers()).ok()
}

/// Span for one HTTP request, used with `TraceLayer::make_span_with`
///
/// `user_id` is recorded only when the request carries a usable identity.
pub fn make_request_span<B>(request: &Request<B>) -> Span {
    info_span!(
        "http_request",
        method = %request.method(),
        path = %request.uri().path(),
        request_id = %request_id(request),
        user_id = span_user_id(request).map(|id| id.to_string()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::USER_ID_HEADER;

    #[test]
    fn test_request_id_prefers_header() {
        let request = Request::builder()
            .header(REQUEST_ID_HEADER, "abc-123")
            .body(())
            .unwrap();
        assert_eq!(request_id(&request), "abc-123");

        let request = Request::builder().body(()).unwrap();
        assert!(request_id(&request).starts_with("req_"));
    }

    #[test]
    fn test_span_user_id_matches_handler_identity() {
        let user = Uuid::new_v4();
        let request = Request::builder()
            .header(USER_ID_HEADER, format!(" {user} "))
            .body(())
            .unwrap();
        assert_eq!(span_user_id(&request), Some(user));
        assert_eq!(require_user_id(request.headers()).ok(), Some(user));

        let request = Request::builder()
            .header(USER_ID_HEADER, "not-a-uuid")
            .body(())
            .unwrap();
        assert_eq!(span_user_id(&request), None);

        let request = Request::builder()
            .header("x-user", user.to_string())
            .body(())
            .unwrap();
        assert_eq!(span_user_id(&request), None);
    }
}
