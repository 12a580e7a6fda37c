//! # Construction-Time Validation Errors
//!
//! Structured errors for domain-primitive construction, built with
//! `thiserror`. Each variant carries the rejected input and the expected
//! format so misconfiguration can be diagnosed without guesswork.

use thiserror::Error;

/// Validation errors for domain primitive newtypes.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// Campaign label does not match the academic-year format.
    #[error("invalid campaign label: \"{0}\" (expected consecutive years as YYYY-YYYY, e.g. 2025-2026)")]
    InvalidCampaignId(String),

    /// A free-text field that must be non-blank was empty or whitespace.
    #[error("field \"{field}\" must be non-blank")]
    BlankField {
        /// The name of the offending field.
        field: &'static str,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_campaign_id_display() {
        let err = ValidationError::InvalidCampaignId("2025-2027".to_string());
        let msg = format!("{err}");
        assert!(msg.contains("2025-2027"));
        assert!(msg.contains("YYYY-YYYY"));
    }

    #[test]
    fn blank_field_display() {
        let err = ValidationError::BlankField { field: "venue" };
        assert!(format!("{err}").contains("venue"));
    }

    #[test]
    fn all_variants_are_debug() {
        let err = ValidationError::InvalidCampaignId("x".to_string());
        assert!(!format!("{err:?}").is_empty());
    }
}
