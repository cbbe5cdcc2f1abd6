//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request (method, path)
//!     → matcher.rs (normalize path, evaluate match conditions)
//!     → router.rs (first matching route in table order)
//!     → Return: Endpoint (MethodNotAllowed when nothing matches)
//! ```
//!
//! # Design Decisions
//! - Route table is fixed at startup, immutable at runtime
//! - Deterministic: same input always matches same endpoint

pub mod matcher;
pub mod router;

pub use router::{Endpoint, Router};
