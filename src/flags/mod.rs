//! Flag domain: records, submission rules, and the store.
//!
//! # Data Flow
//! ```text
//! POST body bytes
//!     → submission.rs (shape check, hex-color gate)
//!     → model.rs (NewFlag: id, ip, timestamp, colors)
//!     → store.rs (one transaction: Flags row + Colors rows)
//!
//! GET /flags
//!     → store.rs (page of joined color rows)
//!     → model.rs (group rows by flag id → FlagPage)
//! ```

pub mod model;
pub mod store;
pub mod submission;

pub use model::{ColorEntry, Flag, FlagPage, FlagSummary, NewFlag, PageParams};
pub use store::{FlagStore, SqliteFlagStore, StoreError};
pub use submission::{ColorSubmission, SubmissionError};
