//! Turns a raw completion into a validated `CandidateInsight`.
//!
//! Providers wrap JSON in markdown fences despite being told not to, so the
//! fences are stripped before parsing. Everything else is strict.

use serde_json::Value;
use thiserror::Error;

use crate::insights::schema::{validate_candidate, CandidateInsight, SchemaViolation};

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ExtractError {
    /// The text was not a single JSON value. `raw` is kept for diagnostics.
    #[error("completion is not valid JSON: {reason}")]
    Malformed { raw: String, reason: String },

    #[error("completion violates the insight schema at {0}")]
    SchemaViolation(#[from] SchemaViolation),
}

impl ExtractError {
    /// Offending field for schema violations.
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::SchemaViolation(v) => Some(&v.field),
            Self::Malformed { .. } => None,
        }
    }
}

pub fn extract_insight(raw: &str) -> Result<CandidateInsight, ExtractError> {
    let payload = strip_code_fences(raw);

    let value: Value = serde_json::from_str(payload).map_err(|e| ExtractError::Malformed {
        raw: raw.to_string(),
        reason: e.to_string(),
    })?;

    Ok(validate_candidate(&value)?)
}

/// Strips a leading ```` ``` ```` / ```` ```json ```` marker and any trailing
/// ```` ``` ```` markers, then trims. Either marker may appear without the other.
pub fn strip_code_fences(text: &str) -> &str {
    let mut text = text.trim();

    if let Some(rest) = text.strip_prefix("```") {
        // Optional language tag, e.g. `json`, directly after the backticks.
        let tag_len = rest
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '-' || c == '_'))
            .unwrap_or(rest.len());
        text = rest[tag_len..].trim_start();
    }

    // Models occasionally close the block twice.
    while let Some(rest) = text.strip_suffix("```") {
        text = rest.trim_end();
    }

    text
}
