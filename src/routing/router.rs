//! Route lookup and dispatch.
//!
//! # Responsibilities
//! - Store the fixed route table
//! - Look up the endpoint for a request
//! - Return an explicit `MethodNotAllowed` rather than a silent default
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - First match wins, in table order; preflight is checked first

use std::fmt;

use axum::body::Body;
use axum::http::{Method, Request};

use crate::routing::matcher::{AndMatcher, Matcher, MethodMatcher, PathMatcher};

/// The operations the service exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    /// `OPTIONS` on any path.
    Preflight,
    /// `GET /`.
    CountFlags,
    /// `GET /flags`.
    ListFlags,
    /// `POST /flags`.
    SubmitFlag,
    /// Everything else.
    MethodNotAllowed,
}

impl Endpoint {
    /// Stable label for logs and metrics.
    pub fn name(&self) -> &'static str {
        match self {
            Endpoint::Preflight => "preflight",
            Endpoint::CountFlags => "count_flags",
            Endpoint::ListFlags => "list_flags",
            Endpoint::SubmitFlag => "submit_flag",
            Endpoint::MethodNotAllowed => "method_not_allowed",
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A compiled route.
#[derive(Debug)]
pub struct Route {
    pub endpoint: Endpoint,
    matcher: Box<dyn Matcher>,
}

impl Route {
    pub fn new(endpoint: Endpoint, matcher: Box<dyn Matcher>) -> Self {
        Self { endpoint, matcher }
    }

    fn method_and_path(endpoint: Endpoint, method: Method, path: &str) -> Self {
        Self::new(
            endpoint,
            Box::new(AndMatcher::new(vec![
                Box::new(MethodMatcher::new(method)),
                Box::new(PathMatcher::new(path)),
            ])),
        )
    }
}

/// Immutable route table.
#[derive(Debug)]
pub struct Router {
    routes: Vec<Route>,
}

impl Router {
    pub fn new(routes: Vec<Route>) -> Self {
        Self { routes }
    }

    /// The flag service's route table.
    pub fn flag_routes() -> Self {
        Self::new(vec![
            Route::new(
                Endpoint::Preflight,
                Box::new(MethodMatcher::new(Method::OPTIONS)),
            ),
            Route::method_and_path(Endpoint::CountFlags, Method::GET, "/"),
            Route::method_and_path(Endpoint::ListFlags, Method::GET, "/flags"),
            Route::method_and_path(Endpoint::SubmitFlag, Method::POST, "/flags"),
        ])
    }

    /// Find the endpoint for a request.
    pub fn match_request(&self, req: &Request<Body>) -> Endpoint {
        self.routes
            .iter()
            .find(|route| route.matcher.matches(req))
            .map(|route| route.endpoint)
            .unwrap_or(Endpoint::MethodNotAllowed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn endpoint(method: &str, uri: &str) -> Endpoint {
        let req = Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::default())
            .unwrap();
        Router::flag_routes().match_request(&req)
    }

    #[test]
    fn test_fixed_routes() {
        assert_eq!(endpoint("GET", "/"), Endpoint::CountFlags);
        assert_eq!(endpoint("GET", "/flags"), Endpoint::ListFlags);
        assert_eq!(endpoint("GET", "/flags/?offset=3"), Endpoint::ListFlags);
        assert_eq!(endpoint("POST", "/flags"), Endpoint::SubmitFlag);
        assert_eq!(endpoint("POST", "/flags/"), Endpoint::SubmitFlag);
    }

    #[test]
    fn test_options_matches_any_path() {
        assert_eq!(endpoint("OPTIONS", "/"), Endpoint::Preflight);
        assert_eq!(endpoint("OPTIONS", "/flags"), Endpoint::Preflight);
        assert_eq!(endpoint("OPTIONS", "/anything/else"), Endpoint::Preflight);
    }

    #[test]
    fn test_everything_else_is_not_allowed() {
        assert_eq!(endpoint("POST", "/"), Endpoint::MethodNotAllowed);
        assert_eq!(endpoint("PUT", "/flags"), Endpoint::MethodNotAllowed);
        assert_eq!(endpoint("DELETE", "/flags"), Endpoint::MethodNotAllowed);
        assert_eq!(endpoint("GET", "/colors"), Endpoint::MethodNotAllowed);
        assert_eq!(endpoint("HEAD", "/"), Endpoint::MethodNotAllowed);
    }
}
