//! Route matching logic.
//!
//! # Responsibilities
//! - Match request method (case-insensitive, as browsers normalize it)
//! - Match the normalized path exactly
//! - Combine conditions with AND semantics
//!
//! # Design Decisions
//! - Trailing slashes are stripped before comparison; `/` becomes ""
//! - Path matching is case-sensitive
//! - No regex in the matching path

use axum::body::Body;
use axum::http::{Method, Request};

/// Strip every trailing `/` from a request path.
pub fn normalize_path(path: &str) -> &str {
    path.trim_end_matches('/')
}

/// Trait for matching requests against conditions.
pub trait Matcher: Send + Sync + std::fmt::Debug {
    /// Returns true if the request matches this condition.
    fn matches(&self, req: &Request<Body>) -> bool;
}

/// Matches the request method.
#[derive(Debug, Clone)]
pub struct MethodMatcher {
    method: Method,
}

impl MethodMatcher {
    pub fn new(method: Method) -> Self {
        Self { method }
    }
}

impl Matcher for MethodMatcher {
    fn matches(&self, req: &Request<Body>) -> bool {
        req.method()
            .as_str()
            .eq_ignore_ascii_case(self.method.as_str())
    }
}

/// Matches one normalized path exactly.
#[derive(Debug, Clone)]
pub struct PathMatcher {
    path: String,
}

impl PathMatcher {
    /// Create a new path matcher. The expected path is normalized the same
    /// way request paths are.
    pub fn new(path: impl Into<String>) -> Self {
        let path = path.into();
        Self {
            path: normalize_path(&path).to_string(),
        }
    }
}

impl Matcher for PathMatcher {
    fn matches(&self, req: &Request<Body>) -> bool {
        normalize_path(req.uri().path()) == self.path
    }
}

/// Combines multiple matchers with AND semantics.
#[derive(Debug)]
pub struct AndMatcher {
    matchers: Vec<Box<dyn Matcher>>,
}

impl AndMatcher {
    pub fn new(matchers: Vec<Box<dyn Matcher>>) -> Self {
        Self { matchers }
    }
}

impl Matcher for AndMatcher {
    fn matches(&self, req: &Request<Body>) -> bool {
        self.matchers.iter().all(|m| m.matches(req))
    }
}
