//! # Defense Request (Soutenance) State Machine
//!
//! A thesis-defense request, owned by a candidate and referencing exactly
//! one director. The request is campaign-independent: it progresses from
//! draft through eligibility and jury checks to administrative
//! authorization, scheduling, and the recorded defense outcome.
//!
//! ## Transitions
//!
//! ```text
//! DRAFT ─submit──▶ SUBMITTED ──▶ UNDER_VALIDATION ─authorize──▶ AUTHORIZED ─record──▶ DEFENDED
//!   ▲              (auto-advance         │                          outcome
//!   │               once a jury is      reject
//!   │               proposed)            ▼
//!   └────edit───────────────────────  REJECTED
//! ```
//!
//! Eligibility is checked twice: at submission and again at authorization
//! time — the second check runs against fresh inputs, never a cached
//! snapshot. The jury has its own review track ([`JuryStatus`]): proposed
//! compositions are validated structurally on entry, then accepted or
//! refused by the administrative service; a refused jury blocks
//! authorization until a new composition is proposed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use cursus_compliance::eligibility::PrerequisiteStatus;
use cursus_compliance::jury::{self, JuryMember, JuryViolation};
use cursus_core::{DocumentKind, PersonId, SoutenanceId};

use crate::transition::{Actor, TransitionRecord};

// ── Status ───────────────────────────────────────────────────────────

/// The lifecycle state of a defense request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SoutenanceStatus {
    /// Draft being edited by the candidate.
    Draft,
    /// Submitted; awaiting a jury proposal before review can begin.
    Submitted,
    /// Under administrative review.
    UnderValidation,
    /// Defense authorized, scheduled, and awaiting the defense itself.
    Authorized,
    /// Request refused. Final for the decided request; editing the draft
    /// reopens it as a new `Draft` cycle.
    Rejected,
    /// Defense held and outcome recorded. Terminal state.
    Defended,
}

impl SoutenanceStatus {
    /// The canonical string name of this status.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "DRAFT",
            Self::Submitted => "SUBMITTED",
            Self::UnderValidation => "UNDER_VALIDATION",
            Self::Authorized => "AUTHORIZED",
            Self::Rejected => "REJECTED",
            Self::Defended => "DEFENDED",
        }
    }

    /// Whether this is a terminal status. `Rejected` is not listed: a
    /// refused request can be reopened through draft editing.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Defended)
    }
}

impl std::fmt::Display for SoutenanceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The review state of a proposed jury.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JuryStatus {
    /// Composition proposed, awaiting administrative review.
    Proposed,
    /// Composition accepted. Immutable except through re-proposal.
    Validated,
    /// Composition refused; blocks authorization until re-proposed.
    Rejected,
}

impl JuryStatus {
    /// The canonical string name of this status.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Proposed => "PROPOSED",
            Self::Validated => "VALIDATED",
            Self::Rejected => "REJECTED",
        }
    }
}

impl std::fmt::Display for JuryStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ── Outcome Types ────────────────────────────────────────────────────

/// The verdict pronounced by the jury after the defense.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Verdict {
    /// The candidate is admitted to the doctorate.
    Admitted,
    /// The candidate is not admitted.
    Rejected,
}

/// The classical distinction grades.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Mention {
    /// Honorable.
    Honorable,
    /// Très honorable.
    HighlyHonorable,
    /// Très honorable avec félicitations du jury.
    HighlyHonorableWithPraise,
}

/// The recorded result of a held defense.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefenseResult {
    /// The jury's verdict.
    pub verdict: Verdict,
    /// The distinction grade, where the institution still awards one.
    pub mention: Option<Mention>,
}

/// The free-form fields the candidate edits while drafting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SoutenanceDraft {
    /// Thesis title.
    pub thesis_title: String,
    /// Thesis abstract.
    pub abstract_text: String,
}

// ── Error Types ──────────────────────────────────────────────────────

/// Errors during defense-request operations.
#[derive(Error, Debug)]
pub enum SoutenanceError {
    /// The attempted transition is not valid from the current status.
    #[error("invalid soutenance transition from {from} to {to}: {reason}")]
    InvalidTransition {
        /// The current status.
        from: SoutenanceStatus,
        /// The attempted target status.
        to: SoutenanceStatus,
        /// Human-readable reason for the rejection.
        reason: String,
    },

    /// A refusal requires a justification comment.
    #[error("a comment is required to {action}")]
    MissingComment {
        /// The decision that was attempted without a comment.
        action: &'static str,
    },

    /// The defense prerequisites are not satisfied. The carried status
    /// details every criterion with required-versus-actual values.
    #[error("defense prerequisites not met ({} of 4 criteria unsatisfied)", .status.unmet().len())]
    PrerequisitesNotMet {
        /// The full prerequisite evaluation.
        status: PrerequisiteStatus,
    },

    /// Required supporting documents are missing.
    #[error("missing supporting documents: {}", format_kinds(.missing))]
    DocumentsIncomplete {
        /// The missing document kinds.
        missing: Vec<DocumentKind>,
    },

    /// The proposed jury violates composition rules. The carried list
    /// holds every violation, not just the first.
    #[error("invalid jury composition ({} rule violations)", .violations.len())]
    InvalidJuryComposition {
        /// All composition-rule violations.
        violations: Vec<JuryViolation>,
    },

    /// Authorization requires a validated jury.
    #[error("jury must be validated before authorization (current: {status})")]
    JuryNotValidated {
        /// The jury's current review status.
        status: JuryStatus,
    },

    /// The current jury was refused; a new composition must be proposed.
    #[error("the proposed jury was refused; propose a new composition")]
    JuryRejected,

    /// No jury has been proposed yet.
    #[error("no jury has been proposed")]
    NoJuryProposed,

    /// The jury decision was already made.
    #[error("jury is not awaiting review (current: {status})")]
    JuryAlreadyDecided {
        /// The jury's current review status.
        status: JuryStatus,
    },

    /// Outcome recording attempted before the scheduled defense date.
    #[error("defense scheduled for {scheduled} has not been held yet")]
    DefenseNotYetHeld {
        /// The scheduled defense date.
        scheduled: DateTime<Utc>,
    },

    /// Outcome recording attempted with no scheduled date on record.
    #[error("no defense date is scheduled")]
    DefenseNotScheduled,
}

fn format_kinds(kinds: &[DocumentKind]) -> String {
    kinds
        .iter()
        .map(|k| k.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

// ── The Soutenance ───────────────────────────────────────────────────

/// One thesis-defense request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Soutenance {
    /// Unique soutenance identifier.
    pub id: SoutenanceId,
    /// The defending candidate.
    pub candidate_id: PersonId,
    /// The thesis director.
    pub director_id: PersonId,
    /// Thesis title.
    pub thesis_title: String,
    /// Thesis abstract.
    pub abstract_text: String,
    /// Scheduled defense date, set at authorization.
    pub scheduled_date: Option<DateTime<Utc>>,
    /// Defense venue, set at authorization.
    pub venue: Option<String>,
    /// Current status.
    pub status: SoutenanceStatus,
    /// The proposed jury, in proposal order. Empty until proposed.
    pub jury: Vec<JuryMember>,
    /// Review state of the jury. `None` until a composition is proposed.
    pub jury_status: Option<JuryStatus>,
    /// The recorded defense result, once defended.
    pub outcome: Option<DefenseResult>,
    /// When the request was created.
    pub created_at: DateTime<Utc>,
    /// When the request was last updated.
    pub updated_at: DateTime<Utc>,
    /// Transition history.
    pub transition_log: Vec<TransitionRecord>,
}

impl Soutenance {
    /// Create a new defense request in `Draft`.
    pub fn new(
        id: SoutenanceId,
        candidate_id: PersonId,
        director_id: PersonId,
        draft: SoutenanceDraft,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            candidate_id,
            director_id,
            thesis_title: draft.thesis_title,
            abstract_text: draft.abstract_text,
            scheduled_date: None,
            venue: None,
            status: SoutenanceStatus::Draft,
            jury: Vec::new(),
            jury_status: None,
            outcome: None,
            created_at: now,
            updated_at: now,
            transition_log: Vec::new(),
        }
    }

    fn record(&mut self, to: SoutenanceStatus, actor: Actor, comment: Option<String>, now: DateTime<Utc>) {
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

    /// Update the draft fields. Allowed while drafting; editing a refused
    /// request reopens it as a draft.
    pub fn update_draft(
        &mut self,
        draft: SoutenanceDraft,
        now: DateTime<Utc>,
    ) -> Result<(), SoutenanceError> {
        match self.status {
            SoutenanceStatus::Draft => {}
            SoutenanceStatus::Rejected => {
                self.record(SoutenanceStatus::Draft, Actor::Candidate, None, now);
            }
            _ => {
                return Err(SoutenanceError::InvalidTransition {
                    from: self.status,
                    to: SoutenanceStatus::Draft,
                    reason: "draft editing only allowed from DRAFT or REJECTED".to_string(),
                });
            }
        }
        self.thesis_title = draft.thesis_title;
        self.abstract_text = draft.abstract_text;
        self.updated_at = now;
        Ok(())
    }

    /// Submit the request for review. Requires every prerequisite
    /// satisfied and every required document present; a refused jury
    /// blocks submission until a new composition is proposed. Advances to
    /// `UnderValidation` immediately when a jury is already proposed.
    pub fn submit(
        &mut self,
        prerequisites: &PrerequisiteStatus,
        missing_documents: &[DocumentKind],
        now: DateTime<Utc>,
    ) -> Result<SoutenanceStatus, SoutenanceError> {
        if self.status != SoutenanceStatus::Draft {
            return Err(SoutenanceError::InvalidTransition {
                from: self.status,
                to: SoutenanceStatus::Submitted,
                reason: "submission only allowed from DRAFT".to_string(),
            });
        }
        if self.jury_status == Some(JuryStatus::Rejected) {
            return Err(SoutenanceError::JuryRejected);
        }
        if !missing_documents.is_empty() {
            return Err(SoutenanceError::DocumentsIncomplete {
                missing: missing_documents.to_vec(),
            });
        }
        if !prerequisites.all_satisfied {
            return Err(SoutenanceError::PrerequisitesNotMet {
                status: prerequisites.clone(),
            });
        }

        self.record(SoutenanceStatus::Submitted, Actor::Candidate, None, now);
        if matches!(
            self.jury_status,
            Some(JuryStatus::Proposed) | Some(JuryStatus::Validated)
        ) {
            self.record(SoutenanceStatus::UnderValidation, Actor::System, None, now);
        }
        Ok(self.status)
    }

    /// Propose a jury composition. Structural rules are validated here;
    /// re-proposing replaces the previous composition and resets its review
    /// state to `Proposed` — including over a previously validated jury.
    pub fn propose_jury(
        &mut self,
        members: Vec<JuryMember>,
        now: DateTime<Utc>,
    ) -> Result<(), SoutenanceError> {
        if !matches!(
            self.status,
            SoutenanceStatus::Draft | SoutenanceStatus::Submitted | SoutenanceStatus::UnderValidation
        ) {
            return Err(SoutenanceError::InvalidTransition {
                from: self.status,
                to: self.status,
                reason: "jury proposal only allowed before authorization".to_string(),
            });
        }

        let assessment = jury::validate(&members);
        if !assessment.valid {
            return Err(SoutenanceError::InvalidJuryComposition {
                violations: assessment.violations,
            });
        }

        self.jury = members;
        self.jury_status = Some(JuryStatus::Proposed);
        self.updated_at = now;

        if self.status == SoutenanceStatus::Submitted {
            self.record(SoutenanceStatus::UnderValidation, Actor::System, None, now);
        }
        Ok(())
    }

    /// Accept or refuse the proposed jury. Only a `Proposed` jury awaits
    /// review; a refused jury blocks authorization until re-proposed.
    pub fn decide_jury(
        &mut self,
        approved: bool,
        now: DateTime<Utc>,
    ) -> Result<JuryStatus, SoutenanceError> {
        match self.jury_status {
            None => Err(SoutenanceError::NoJuryProposed),
            Some(JuryStatus::Proposed) => {
                let status = if approved {
                    JuryStatus::Validated
                } else {
                    JuryStatus::Rejected
                };
                self.jury_status = Some(status);
                self.updated_at = now;
                Ok(status)
            }
            Some(status) => Err(SoutenanceError::JuryAlreadyDecided { status }),
        }
    }

    /// Authorize the defense. Only from `UnderValidation`, only with a
    /// validated jury, and only while the prerequisites — re-evaluated by
    /// the caller at call time — still hold.
    pub fn authorize(
        &mut self,
        scheduled_date: DateTime<Utc>,
        venue: String,
        prerequisites: &PrerequisiteStatus,
        now: DateTime<Utc>,
    ) -> Result<SoutenanceStatus, SoutenanceError> {
        if self.status != SoutenanceStatus::UnderValidation {
            return Err(SoutenanceError::InvalidTransition {
                from: self.status,
                to: SoutenanceStatus::Authorized,
                reason: "authorization only allowed from UNDER_VALIDATION".to_string(),
            });
        }
        match self.jury_status {
            Some(JuryStatus::Validated) => {}
            Some(status) => return Err(SoutenanceError::JuryNotValidated { status }),
            None => return Err(SoutenanceError::NoJuryProposed),
        }
        if !prerequisites.all_satisfied {
            return Err(SoutenanceError::PrerequisitesNotMet {
                status: prerequisites.clone(),
            });
        }

        self.scheduled_date = Some(scheduled_date);
        self.venue = Some(venue);
        self.record(SoutenanceStatus::Authorized, Actor::AdministrativeService, None, now);
        Ok(self.status)
    }

    /// Refuse the defense request. Only from `UnderValidation`, with a
    /// mandatory reason.
    pub fn reject(
        &mut self,
        reason: &str,
        now: DateTime<Utc>,
    ) -> Result<SoutenanceStatus, SoutenanceError> {
        if self.status != SoutenanceStatus::UnderValidation {
            return Err(SoutenanceError::InvalidTransition {
                from: self.status,
                to: SoutenanceStatus::Rejected,
                reason: "refusal only allowed from UNDER_VALIDATION".to_string(),
            });
        }
        let trimmed = reason.trim();
        if trimmed.is_empty() {
            return Err(SoutenanceError::MissingComment {
                action: "refuse a defense request",
            });
        }
        self.record(
            SoutenanceStatus::Rejected,
            Actor::AdministrativeService,
            Some(trimmed.to_string()),
            now,
        );
        Ok(self.status)
    }

    /// Record the defense outcome. Only from `Authorized`, once the
    /// scheduled date has passed.
    pub fn record_outcome(
        &mut self,
        result: DefenseResult,
        now: DateTime<Utc>,
    ) -> Result<SoutenanceStatus, SoutenanceError> {
        if self.status != SoutenanceStatus::Authorized {
            return Err(SoutenanceError::InvalidTransition {
                from: self.status,
                to: SoutenanceStatus::Defended,
                reason: "outcome recording only allowed from AUTHORIZED".to_string(),
            });
        }
        let scheduled = self.scheduled_date.ok_or(SoutenanceError::DefenseNotScheduled)?;
        if scheduled >= now {
            return Err(SoutenanceError::DefenseNotYetHeld { scheduled });
        }

        self.outcome = Some(result);
        self.record(SoutenanceStatus::Defended, Actor::AdministrativeService, None, now);
        Ok(self.status)
    }
}
