//! Response bodies and headers shared by every endpoint.
//!
//! # Responsibilities
//! - Fixed response texts
//! - Permissive cross-origin headers on every response, errors included
//!
//! # Design Decisions
//! - CORS headers are set unconditionally by an outer layer, so responses
//!   produced by middleware (timeouts, body limits) carry them too

use axum::http::{header, HeaderName, HeaderValue};
use tower_http::set_header::SetResponseHeaderLayer;

pub const EVENT_LOGGED: &str = "Event logged";
pub const PREFLIGHT_OK: &str = "ok";

pub const ALLOW_ORIGIN: &str = "*";
pub const ALLOW_METHODS: &str = "GET, OPTIONS, POST";
pub const ALLOW_HEADERS: &str = "*";

/// Body of `GET /`.
pub fn count_message(count: i64) -> String {
    format!("There are {} flags in the D1 database!", count)
}

/// The cross-origin headers, as `(name, value)` pairs.
pub fn cors_headers() -> [(HeaderName, HeaderValue); 3] {
    [
        (
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static(ALLOW_ORIGIN),
        ),
        (
            header::ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static(ALLOW_METHODS),
        ),
        (
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static(ALLOW_HEADERS),
        ),
    ]
}

/// One overriding layer per cross-origin header.
pub fn cors_layers() -> [SetResponseHeaderLayer<HeaderValue>; 3] {
    cors_headers().map(|(name, value)| SetResponseHeaderLayer::overriding(name, value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_message() {
        assert_eq!(count_message(0), "There are 0 flags in the D1 database!");
        assert_eq!(count_message(12), "There are 12 flags in the D1 database!");
    }
}
