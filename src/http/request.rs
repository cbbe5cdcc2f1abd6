//! Request handling helpers.
//!
//! # Responsibilities
//! - Generate a unique request ID (UUID v4) and echo it on the response
//! - Read the caller's address from the trusted proxy header
//! - Extract raw pagination parameters from the query string
//!
//! # Design Decisions
//! - Request ID added as early as possible for tracing
//! - The client IP is taken only from the configured header; without it the
//!   flag is stored with no IP

use axum::extract::Query;
use axum::http::{HeaderMap, HeaderName, Uri};
use tower_http::request_id::{
    MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer,
};

use crate::flags::PageParams;

pub const X_REQUEST_ID: &str = "x-request-id";

/// Layer that stamps `x-request-id` on requests lacking one.
pub fn set_request_id_layer() -> SetRequestIdLayer<MakeRequestUuid> {
    SetRequestIdLayer::x_request_id(MakeRequestUuid)
}

/// Layer that copies the request's `x-request-id` onto the response.
pub fn propagate_request_id_layer() -> PropagateRequestIdLayer {
    PropagateRequestIdLayer::x_request_id()
}

/// The request ID, or `"unknown"` before the layer has run.
pub fn request_id(headers: &HeaderMap) -> String {
    headers
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
        .to_string()
}

/// Value of the trusted client-IP header, stored exactly as sent.
///
/// `None` when the header is absent or not visible ASCII.
pub fn client_ip(headers: &HeaderMap, header: &HeaderName) -> Option<String> {
    headers
        .get(header)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

/// `offset` and `limit` from the query string. The first occurrence of each
/// key wins; missing keys take their defaults.
pub fn page_params(uri: &Uri) -> PageParams {
    let pairs = Query::<Vec<(String, String)>>::try_from_uri(uri)
        .map(|Query(pairs)| pairs)
        .unwrap_or_default();

    let mut params = PageParams::default();
    if let Some((_, offset)) = pairs.iter().find(|(k, _)| k == "offset") {
        params.offset = offset.clone();
    }
    if let Some((_, limit)) = pairs.iter().find(|(k, _)| k == "limit") {
        params.limit = limit.clone();
    }
    params
}
