//! # Dérogation Sub-workflow
//!
//! The exception request opened when a doctorate exceeds the normal
//! 36-month ceiling. Two sequential human decisions: the thesis director
//! first, the institutional authority second. A rejection at either step is
//! terminal; approval requires both decisions favorable, in that order.
//!
//! ## Transitions
//!
//! ```text
//! PENDING_DIRECTOR ─approve──▶ DIRECTOR_APPROVED ──▶ PENDING_AUTHORITY ─approve──▶ APPROVED
//!        │                        (auto-advance)            │
//!      reject                                             reject
//!        ▼                                                  ▼
//! DIRECTOR_REJECTED                                      REJECTED
//! ```
//!
//! Propagation of a refusal onto the parent inscription is the workflow
//! engine's responsibility, not this machine's.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use cursus_core::{DerogationId, InscriptionId};

use crate::transition::{Actor, TransitionRecord};

/// Doctorate duration, in whole months, beyond which enrollment requires a
/// dérogation. Exactly 36 months does not; 37 does.
pub const DEROGATION_THRESHOLD_MONTHS: u32 = 36;

/// Minimum length of a dérogation justification, in characters.
pub const MIN_REASON_CHARS: usize = 50;

// ── Status ───────────────────────────────────────────────────────────

/// The lifecycle state of a dérogation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DerogationStatus {
    /// Awaiting the thesis director's decision.
    PendingDirector,
    /// Director approved; recorded before the auto-advance to the
    /// authority step.
    DirectorApproved,
    /// Director refused. Terminal state.
    DirectorRejected,
    /// Awaiting the institutional authority's decision.
    PendingAuthority,
    /// Authority approved. Terminal state.
    Approved,
    /// Authority refused. Terminal state.
    Rejected,
}

impl DerogationStatus {
    /// The canonical string name of this status.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PendingDirector => "PENDING_DIRECTOR",
            Self::DirectorApproved => "DIRECTOR_APPROVED",
            Self::DirectorRejected => "DIRECTOR_REJECTED",
            Self::PendingAuthority => "PENDING_AUTHORITY",
            Self::Approved => "APPROVED",
            Self::Rejected => "REJECTED",
        }
    }

    /// Whether this is a terminal status (no further transitions).
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::DirectorRejected | Self::Approved | Self::Rejected)
    }
}

impl std::fmt::Display for DerogationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ── Error Types ──────────────────────────────────────────────────────

/// Errors during dérogation operations.
#[derive(Error, Debug)]
pub enum DerogationError {
    /// The attempted transition is not valid from the current status.
    #[error("invalid dérogation transition from {from} to {to}: {reason}")]
    InvalidTransition {
        /// The current status.
        from: DerogationStatus,
        /// The attempted target status.
        to: DerogationStatus,
        /// Human-readable reason for the rejection.
        reason: String,
    },

    /// A refusal requires a justification comment.
    #[error("a comment is required to {action}")]
    MissingComment {
        /// The decision that was attempted without a comment.
        action: &'static str,
    },

    /// The justification text is shorter than the required minimum.
    #[error("dérogation reason of {length} characters is below the required minimum of {minimum}")]
    ReasonTooShort {
        /// Number of characters supplied.
        length: usize,
        /// Required minimum.
        minimum: usize,
    },
}

// ── Decision Record ──────────────────────────────────────────────────

/// One recorded human decision on a dérogation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    /// Whether the decision was favorable.
    pub approved: bool,
    /// The decision comment, when one was given.
    pub comment: Option<String>,
    /// When the decision was made.
    pub decided_at: DateTime<Utc>,
}

// ── The Dérogation ───────────────────────────────────────────────────

/// An exception request attached to one inscription.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Derogation {
    /// Unique dérogation identifier.
    pub id: DerogationId,
    /// The inscription this dérogation gates.
    pub inscription_id: InscriptionId,
    /// The candidate's justification (at least [`MIN_REASON_CHARS`] chars).
    pub reason: String,
    /// Current status.
    pub status: DerogationStatus,
    /// The director's decision, once made.
    pub director_decision: Option<Decision>,
    /// The authority's decision, once made.
    pub authority_decision: Option<Decision>,
    /// When the dérogation was created.
    pub created_at: DateTime<Utc>,
    /// When the dérogation was last updated.
    pub updated_at: DateTime<Utc>,
    /// Transition history.
    pub transition_log: Vec<TransitionRecord>,
}

impl Derogation {
    /// Create a dérogation in `PendingDirector`, validating the
    /// justification length.
    pub fn new(
        id: DerogationId,
        inscription_id: InscriptionId,
        reason: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Result<Self, DerogationError> {
        let reason = reason.into();
        let length = reason.trim().chars().count();
        if length < MIN_REASON_CHARS {
            return Err(DerogationError::ReasonTooShort {
                length,
                minimum: MIN_REASON_CHARS,
            });
        }
        Ok(Self {
            id,
            inscription_id,
            reason,
            status: DerogationStatus::PendingDirector,
            director_decision: None,
            authority_decision: None,
            created_at: now,
            updated_at: now,
            transition_log: Vec::new(),
        })
    }

    fn record(&mut self, to: DerogationStatus, actor: Actor, comment: Option<String>, now: DateTime<Utc>) {
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

    /// The thesis director's decision. Only valid from `PendingDirector`;
    /// a refusal requires a comment and is terminal; an approval
    /// auto-advances to `PendingAuthority`.
    pub fn decide_by_director(
        &mut self,
        approved: bool,
        comment: &str,
        now: DateTime<Utc>,
    ) -> Result<DerogationStatus, DerogationError> {
        if self.status != DerogationStatus::PendingDirector {
            return Err(DerogationError::InvalidTransition {
                from: self.status,
                to: if approved {
                    DerogationStatus::DirectorApproved
                } else {
                    DerogationStatus::DirectorRejected
                },
                reason: "director decision only allowed from PENDING_DIRECTOR".to_string(),
            });
        }
        if !approved && comment.trim().is_empty() {
            return Err(DerogationError::MissingComment {
                action: "refuse a dérogation",
            });
        }

        let comment = non_blank(comment);
        self.director_decision = Some(Decision {
            approved,
            comment: comment.clone(),
            decided_at: now,
        });

        if approved {
            self.record(DerogationStatus::DirectorApproved, Actor::Director, comment, now);
            self.record(DerogationStatus::PendingAuthority, Actor::System, None, now);
        } else {
            self.record(DerogationStatus::DirectorRejected, Actor::Director, comment, now);
        }
        Ok(self.status)
    }

    /// The institutional authority's decision. Only valid from
    /// `PendingAuthority`; a refusal requires a comment; the result is
    /// terminal either way.
    pub fn decide_by_authority(
        &mut self,
        approved: bool,
        comment: &str,
        now: DateTime<Utc>,
    ) -> Result<DerogationStatus, DerogationError> {
        if self.status != DerogationStatus::PendingAuthority {
            return Err(DerogationError::InvalidTransition {
                from: self.status,
                to: if approved {
                    DerogationStatus::Approved
                } else {
                    DerogationStatus::Rejected
                },
                reason: "authority decision only allowed from PENDING_AUTHORITY".to_string(),
            });
        }
        if !approved && comment.trim().is_empty() {
            return Err(DerogationError::MissingComment {
                action: "refuse a dérogation",
            });
        }

        let comment = non_blank(comment);
        self.authority_decision = Some(Decision {
            approved,
            comment: comment.clone(),
            decided_at: now,
        });

        let to = if approved {
            DerogationStatus::Approved
        } else {
            DerogationStatus::Rejected
        };
        self.record(to, Actor::InstitutionalAuthority, comment, now);
        Ok(self.status)
    }

    /// Whether the dérogation has been refused at either step.
    pub fn is_refused(&self) -> bool {
        matches!(
            self.status,
            DerogationStatus::DirectorRejected | DerogationStatus::Rejected
        )
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
