// ABOUTME: HTTP middleware for cross-origin access and request tracing
// ABOUTME: CORS policy from configuration and per-request span construction
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 MindMate Contributors

/// Cross-origin policy
pub mod cors;
/// Request span construction
pub mod tracing;

pub use cors::setup_cors;
pub use tracing::{make_request_span, request_id, span_user_id, REQUEST_ID_HEADER};
