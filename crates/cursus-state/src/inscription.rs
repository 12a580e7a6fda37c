//! # Enrollment (Inscription) State Machine
//!
//! One enrollment cycle for a doctoral candidate in one campaign: created
//! as a draft by the candidate, submitted, validated first by the thesis
//! director and then by the administrative service.
//!
//! ## Transitions
//!
//! ```text
//! DRAFT ─submit──▶ SUBMITTED ──▶ PENDING_DIRECTOR ─approve──▶ DIRECTOR_APPROVED ──▶ PENDING_ADMIN ─approve──▶ VALIDATED
//!                  (auto-advance)        │                       (auto-advance)           │
//!                                      reject                                           reject
//!                                        ▼                                                ▼
//!                                 DIRECTOR_REJECTED                                    REJECTED
//! ```
//!
//! Doctorate duration is computed once, at submit time, and recorded on the
//! inscription; it is never re-evaluated afterwards, so whether a
//! dérogation is required is deterministic for a given submission instant.
//! When one is required, the final administrative step additionally demands
//! that the attached dérogation is `APPROVED`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use cursus_core::{CampaignId, DerogationId, InscriptionId, PersonId};

use crate::derogation::{Derogation, DerogationStatus, DEROGATION_THRESHOLD_MONTHS};
use crate::transition::{Actor, TransitionRecord};

// ── Status ───────────────────────────────────────────────────────────

/// The lifecycle state of an inscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InscriptionStatus {
    /// Draft being edited by the candidate.
    Draft,
    /// Submitted by the candidate; recorded before the auto-advance to the
    /// director step.
    Submitted,
    /// Awaiting the thesis director's validation.
    PendingDirector,
    /// Director approved; recorded before the auto-advance to the
    /// administrative step.
    DirectorApproved,
    /// Director refused. Terminal state.
    DirectorRejected,
    /// Awaiting administrative validation.
    PendingAdmin,
    /// Enrollment accepted. Terminal state.
    Validated,
    /// Enrollment refused by the administrative service. Terminal state.
    Rejected,
}

impl InscriptionStatus {
    /// The canonical string name of this status.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "DRAFT",
            Self::Submitted => "SUBMITTED",
            Self::PendingDirector => "PENDING_DIRECTOR",
            Self::DirectorApproved => "DIRECTOR_APPROVED",
            Self::DirectorRejected => "DIRECTOR_REJECTED",
            Self::PendingAdmin => "PENDING_ADMIN",
            Self::Validated => "VALIDATED",
            Self::Rejected => "REJECTED",
        }
    }

    /// Whether this is a terminal status (no further transitions).
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::DirectorRejected | Self::Validated | Self::Rejected
        )
    }
}

impl std::fmt::Display for InscriptionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ── Error Types ──────────────────────────────────────────────────────

/// Errors during inscription operations.
#[derive(Error, Debug)]
pub enum InscriptionError {
    /// The attempted transition is not valid from the current status.
    #[error("invalid inscription transition from {from} to {to}: {reason}")]
    InvalidTransition {
        /// The current status.
        from: InscriptionStatus,
        /// The attempted target status.
        to: InscriptionStatus,
        /// Human-readable reason for the rejection.
        reason: String,
    },

    /// A refusal requires a justification comment.
    #[error("a comment is required to {action}")]
    MissingComment {
        /// The decision that was attempted without a comment.
        action: &'static str,
    },

    /// Final validation attempted while the attached dérogation is
    /// unresolved or refused.
    #[error("inscription {inscription_id} cannot be validated while its dérogation is {status}")]
    DerogationPending {
        /// The inscription identifier.
        inscription_id: InscriptionId,
        /// The dérogation's current status.
        status: DerogationStatus,
    },

    /// A dérogation is already attached to this inscription.
    #[error("inscription {inscription_id} already has an attached dérogation")]
    DerogationAlreadyAttached {
        /// The inscription identifier.
        inscription_id: InscriptionId,
    },
}

// ── Submission Outcome ───────────────────────────────────────────────

/// What a successful submission determined about the enrollment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmissionOutcome {
    /// Doctorate duration, in whole months, computed at submit time.
    pub duration_months: u32,
    /// Whether the duration exceeds the ceiling and a dérogation must be
    /// opened before the enrollment can complete.
    pub requires_derogation: bool,
}

// ── The Inscription ──────────────────────────────────────────────────

/// One enrollment record for one candidate in one campaign.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Inscription {
    /// Unique inscription identifier.
    pub id: InscriptionId,
    /// The enrolling candidate.
    pub candidate_id: PersonId,
    /// The thesis director.
    pub director_id: PersonId,
    /// The academic campaign this enrollment belongs to.
    pub campaign_id: CampaignId,
    /// Current status.
    pub status: InscriptionStatus,
    /// Doctorate duration snapshot taken at submit time. `None` until
    /// submitted; never re-evaluated afterwards.
    pub duration_months_at_submission: Option<u32>,
    /// The dérogation opened for this enrollment, when one was required.
    pub derogation_id: Option<DerogationId>,
    /// When the inscription was created.
    pub created_at: DateTime<Utc>,
    /// When the inscription was last updated.
    pub updated_at: DateTime<Utc>,
    /// Transition history.
    pub transition_log: Vec<TransitionRecord>,
}

impl Inscription {
    /// Create a new inscription in `Draft`.
    pub fn new(
        id: InscriptionId,
        candidate_id: PersonId,
        director_id: PersonId,
        campaign_id: CampaignId,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            candidate_id,
            director_id,
            campaign_id,
            status: InscriptionStatus::Draft,
            duration_months_at_submission: None,
            derogation_id: None,
            created_at: now,
            updated_at: now,
            transition_log: Vec::new(),
        }
    }

    fn record(&mut self, to: InscriptionStatus, actor: Actor, comment: Option<String>, now: DateTime<Utc>) {
        self.transition_log.push(TransitionRecord::new(
            self.status.as_str(),
            to.as_str(),
            actor,
            comment,
            now,
        ));
        self.status = to;
        self.updated_at = now;
    }

    /// Whether this inscription still occupies the candidate's slot in its
    /// campaign (any non-terminal status).
    pub fn is_active(&self) -> bool {
        !self.status.is_terminal()
    }

    /// Submit the draft. Records the duration snapshot and advances through
    /// `Submitted` to `PendingDirector`; the returned outcome tells the
    /// caller whether a dérogation must be opened.
    pub fn submit(
        &mut self,
        duration_months: u32,
        now: DateTime<Utc>,
    ) -> Result<SubmissionOutcome, InscriptionError> {
        if self.status != InscriptionStatus::Draft {
            return Err(InscriptionError::InvalidTransition {
                from: self.status,
                to: InscriptionStatus::Submitted,
                reason: "submission only allowed from DRAFT".to_string(),
            });
        }

        self.duration_months_at_submission = Some(duration_months);
        self.record(InscriptionStatus::Submitted, Actor::Candidate, None, now);
        self.record(InscriptionStatus::PendingDirector, Actor::System, None, now);

        Ok(SubmissionOutcome {
            duration_months,
            requires_derogation: duration_months > DEROGATION_THRESHOLD_MONTHS,
        })
    }

    /// Wire the dérogation opened for this enrollment back onto the record.
    pub fn attach_derogation(&mut self, derogation_id: DerogationId) -> Result<(), InscriptionError> {
        if self.derogation_id.is_some() {
            return Err(InscriptionError::DerogationAlreadyAttached {
                inscription_id: self.id,
            });
        }
        self.derogation_id = Some(derogation_id);
        Ok(())
    }

    /// The thesis director's validation. Only valid from `PendingDirector`;
    /// a refusal requires a comment and is terminal; an approval
    /// auto-advances to `PendingAdmin`.
    pub fn validate_by_director(
        &mut self,
        approved: bool,
        comment: &str,
        now: DateTime<Utc>,
    ) -> Result<InscriptionStatus, InscriptionError> {
        if self.status != InscriptionStatus::PendingDirector {
            return Err(InscriptionError::InvalidTransition {
                from: self.status,
                to: if approved {
                    InscriptionStatus::DirectorApproved
                } else {
                    InscriptionStatus::DirectorRejected
                },
                reason: "director validation only allowed from PENDING_DIRECTOR".to_string(),
            });
        }
        if !approved && comment.trim().is_empty() {
            return Err(InscriptionError::MissingComment {
                action: "refuse an enrollment",
            });
        }

        let comment = non_blank(comment);
        if approved {
            self.record(InscriptionStatus::DirectorApproved, Actor::Director, comment, now);
            self.record(InscriptionStatus::PendingAdmin, Actor::System, None, now);
        } else {
            self.record(InscriptionStatus::DirectorRejected, Actor::Director, comment, now);
        }
        Ok(self.status)
    }

    /// The administrative service's final validation. Only valid from
    /// `PendingAdmin`, and — when a dérogation is attached — only once that
    /// dérogation is `Approved`. A refusal requires a comment. Both
    /// outcomes are terminal.
    pub fn validate_by_admin(
        &mut self,
        approved: bool,
        comment: &str,
        derogation: Option<&Derogation>,
        now: DateTime<Utc>,
    ) -> Result<InscriptionStatus, InscriptionError> {
        if self.status != InscriptionStatus::PendingAdmin {
            return Err(InscriptionError::InvalidTransition {
                from: self.status,
                to: if approved {
                    InscriptionStatus::Validated
                } else {
                    InscriptionStatus::Rejected
                },
                reason: "administrative validation only allowed from PENDING_ADMIN".to_string(),
            });
        }
        if let Some(derogation) = derogation {
            if derogation.status != DerogationStatus::Approved {
                return Err(InscriptionError::DerogationPending {
                    inscription_id: self.id,
                    status: derogation.status,
                });
            }
        }
        if !approved && comment.trim().is_empty() {
            return Err(InscriptionError::MissingComment {
                action: "refuse an enrollment",
            });
        }

        let comment = non_blank(comment);
        let to = if approved {
            InscriptionStatus::Validated
        } else {
            InscriptionStatus::Rejected
        };
        self.record(to, Actor::AdministrativeService, comment, now);
        Ok(self.status)
    }

    /// Reject the enrollment because its dérogation was refused. This is
    /// the propagation entry point the engine calls; it is equivalent to an
    /// administrative refusal and valid from any non-terminal status.
    pub fn reject_for_derogation(
        &mut self,
        comment: &str,
        now: DateTime<Utc>,
    ) -> Result<InscriptionStatus, InscriptionError> {
        if self.status.is_terminal() {
            return Err(InscriptionError::InvalidTransition {
                from: self.status,
                to: InscriptionStatus::Rejected,
                reason: "inscription is already in a terminal status".to_string(),
            });
        }
        self.record(InscriptionStatus::Rejected, Actor::System, non_blank(comment), now);
        Ok(self.status)
    }
}

fn non_blank(comment: &str) -> Option<String> {
    let trimmed = comment.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
