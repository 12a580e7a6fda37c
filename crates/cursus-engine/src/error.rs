//! # Engine Error Hierarchy
//!
//! Top-level error type for workflow commands, built with `thiserror`.
//! Machine errors are wrapped, not flattened, so the caller can match on
//! the subsystem; engine-owned rules (enrollment uniqueness, dérogation
//! reason presence, the director seat on a jury) have their own variants.
//! Every variant carries enough structured detail for the UI to render an
//! actionable message — no error is a bare boolean.

use thiserror::Error;

use cursus_core::{InscriptionId, PersonId, ValidationError};
use cursus_state::{DerogationError, InscriptionError, SoutenanceError};

use crate::ports::StorageError;

/// Errors surfaced by workflow commands.
#[derive(Error, Debug)]
pub enum EngineError {
    /// Enrollment state machine rejection.
    #[error(transparent)]
    Inscription(#[from] InscriptionError),

    /// Dérogation sub-workflow rejection.
    #[error(transparent)]
    Derogation(#[from] DerogationError),

    /// Defense state machine rejection.
    #[error(transparent)]
    Soutenance(#[from] SoutenanceError),

    /// Persistence failure — [`StorageError::StaleState`] means reload and
    /// retry; the engine itself never retries.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Domain primitive validation failure.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The candidate already holds an active inscription in this campaign.
    #[error("candidate {candidate_id} already has an active inscription for campaign {campaign_id}")]
    DuplicateActiveInscription {
        /// The enrolling candidate.
        candidate_id: PersonId,
        /// The campaign label.
        campaign_id: String,
    },

    /// The computed duration requires a dérogation but no justification was
    /// supplied with the submission.
    #[error("inscription {inscription_id} requires a dérogation at {duration_months} months; a justification must accompany the submission")]
    DerogationReasonRequired {
        /// The inscription being submitted.
        inscription_id: InscriptionId,
        /// The duration computed at submit time.
        duration_months: u32,
    },

    /// The jury's director seat does not match the registered thesis
    /// director.
    #[error("jury director seat must be held by the registered thesis director {expected}: {detail}")]
    DirectorMemberMismatch {
        /// The soutenance's registered director.
        expected: PersonId,
        /// What was wrong with the proposed seat.
        detail: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_active_inscription_display() {
        let err = EngineError::DuplicateActiveInscription {
            candidate_id: PersonId::new(),
            campaign_id: "2025-2026".to_string(),
        };
        let msg = format!("{err}");
        assert!(msg.contains("2025-2026"));
        assert!(msg.contains("already has an active inscription"));
    }

    #[test]
    fn derogation_reason_required_display() {
        let err = EngineError::DerogationReasonRequired {
            inscription_id: InscriptionId::new(),
            duration_months: 40,
        };
        let msg = format!("{err}");
        assert!(msg.contains("40 months"));
        assert!(msg.contains("justification"));
    }

    #[test]
    fn machine_errors_pass_through_transparently() {
        let inner = InscriptionError::MissingComment {
            action: "refuse an enrollment",
        };
        let err = EngineError::from(inner);
        assert_eq!(
            format!("{err}"),
            "a comment is required to refuse an enrollment"
        );
    }

    #[test]
    fn all_variants_are_debug() {
        let err = EngineError::DirectorMemberMismatch {
            expected: PersonId::new(),
            detail: "found 0 director members".to_string(),
        };
        assert!(!format!("{err:?}").is_empty());
    }
}
