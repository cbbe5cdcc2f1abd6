//! Validation of `POST /flags` bodies.
//!
//! A submission is accepted when at least one element *contains* six hex
//! digits. The match is a substring search, so `"zff0000z"` counts, and a
//! single match admits every other element as-is.

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

static HEX_COLOR: Lazy<Regex> =
    Lazy::new(|| Regex::new("[0-9A-Fa-f]{6}").expect("static pattern compiles"));

/// Why a submission was refused.
#[derive(Debug, Error)]
pub enum SubmissionError {
    /// The body is not a JSON array of strings.
    #[error("malformed flag submission: {0}")]
    Malformed(#[from] serde_json::Error),

    /// No element contains a six-digit hex run.
    #[error("no hex color in submission")]
    NoHexColor,
}

/// An accepted flag body: the submitted colors in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorSubmission(Vec<String>);

impl ColorSubmission {
    /// Decode and validate a raw request body.
    pub fn from_json(body: &[u8]) -> Result<Self, SubmissionError> {
        let colors: Vec<String> = serde_json::from_slice(body)?;
        Self::new(colors)
    }

    pub fn new(colors: Vec<String>) -> Result<Self, SubmissionError> {
        if colors.iter().any(|c| is_hex_like(c)) {
            Ok(Self(colors))
        } else {
            Err(SubmissionError::NoHexColor)
        }
    }

    pub fn colors(&self) -> &[String] {
        &self.0
    }

    pub fn into_colors(self) -> Vec<String> {
        self.0
    }
}

/// True when `value` contains six consecutive hex digits anywhere.
pub fn is_hex_like(value: &str) -> bool {
    HEX_COLOR.is_match(value)
}
