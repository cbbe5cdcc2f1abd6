//! Client for the flag service HTTP API.

pub mod client;

pub use client::{ClientError, FlagClient, FlagPage, FlagSummary, SubmitOutcome};
