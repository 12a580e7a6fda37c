//! # Workflow Engine Façade
//!
//! The boundary the host application calls: one command method per
//! workflow operation. Every command is the same shape — load the record
//! and its version, assemble whatever the rule needs from the collaborator
//! ports, delegate the transition to the state machine, commit through the
//! versioned store. The engine never retries: every failure other than
//! [`crate::ports::StorageError::StaleState`] is a deterministic
//! business-rule rejection, and `StaleState` is the host's
//! reload-and-retry signal.
//!
//! Cross-record rules live here, not in the machines:
//!
//! - enrollment uniqueness (one active inscription per candidate per
//!   campaign) is checked against the store at creation;
//! - a dérogation refusal at either step also rejects the parent
//!   inscription;
//! - the jury's director seat must name the soutenance's registered
//!   director and stays internal, whatever composition a caller proposes.

use chrono::{DateTime, Utc};

use cursus_compliance::eligibility::{
    self, AcademicRecord, EligibilityRequirements, PrerequisiteStatus,
};
use cursus_compliance::jury::{JuryMember, JuryRole};
use cursus_core::{
    elapsed_months, missing_for_defense, CampaignId, DerogationId, InscriptionId, PersonId,
    SoutenanceId, ValidationError,
};
use cursus_state::{DefenseResult, Derogation, Inscription, Soutenance, SoutenanceDraft};

use crate::error::EngineError;
use crate::ports::{
    AcademicProfile, Clock, DocumentStore, EnrollmentHistory, Version, WorkflowStore,
};

// ── Command Results ──────────────────────────────────────────────────

/// The result of submitting an inscription: the advanced record and, when
/// the duration crossed the ceiling, the dérogation that was opened.
#[derive(Debug)]
pub struct InscriptionSubmission {
    /// The inscription after submission.
    pub inscription: Inscription,
    /// The inscription's new version.
    pub version: Version,
    /// The dérogation opened by this submission, when one was required.
    pub derogation: Option<(Derogation, Version)>,
}

/// The result of a dérogation decision: the decided record and, when the
/// decision was a refusal, the parent inscription the refusal propagated
/// to.
#[derive(Debug)]
pub struct DerogationDecision {
    /// The dérogation after the decision.
    pub derogation: Derogation,
    /// The dérogation's new version.
    pub version: Version,
    /// The parent inscription, when the refusal propagated onto it.
    pub inscription: Option<(Inscription, Version)>,
}

// ── The Engine ───────────────────────────────────────────────────────

/// The workflow engine, generic over its five collaborator ports.
#[derive(Debug)]
pub struct WorkflowEngine<S, H, D, P, C> {
    store: S,
    history: H,
    documents: D,
    profile: P,
    clock: C,
    requirements: EligibilityRequirements,
}

impl<S, H, D, P, C> WorkflowEngine<S, H, D, P, C>
where
    S: WorkflowStore,
    H: EnrollmentHistory,
    D: DocumentStore,
    P: AcademicProfile,
    C: Clock,
{
    /// Create an engine with the institution's default eligibility
    /// requirements.
    pub fn new(store: S, history: H, documents: D, profile: P, clock: C) -> Self {
        Self {
            store,
            history,
            documents,
            profile,
            clock,
            requirements: EligibilityRequirements::default(),
        }
    }

    /// Override the eligibility requirements.
    pub fn with_requirements(mut self, requirements: EligibilityRequirements) -> Self {
        self.requirements = requirements;
        self
    }

    /// Access the underlying store (read paths for the host).
    pub fn store(&self) -> &S {
        &self.store
    }

    // ── Enrollment commands ──────────────────────────────────────────

    /// Create a new enrollment draft, enforcing at most one active
    /// inscription per candidate per campaign.
    pub fn create_inscription(
        &self,
        candidate_id: PersonId,
        director_id: PersonId,
        campaign_id: CampaignId,
    ) -> Result<(Inscription, Version), EngineError> {
        if self.store.has_active_inscription(&candidate_id, &campaign_id)? {
            return Err(EngineError::DuplicateActiveInscription {
                candidate_id,
                campaign_id: campaign_id.to_string(),
            });
        }
        let inscription = Inscription::new(
            InscriptionId::new(),
            candidate_id,
            director_id,
            campaign_id,
            self.clock.now(),
        );
        let version = self.store.insert_inscription(inscription.clone())?;
        tracing::info!(inscription = %inscription.id, campaign = %inscription.campaign_id, "inscription created");
        Ok((inscription, version))
    }

    /// Submit an enrollment draft. The doctorate duration is computed here,
    /// once, from the candidate's prior-enrollment history; when it exceeds
    /// the ceiling a dérogation is opened from the supplied justification
    /// and attached before the inscription commits.
    pub fn submit_inscription(
        &self,
        id: &InscriptionId,
        derogation_reason: Option<&str>,
    ) -> Result<InscriptionSubmission, EngineError> {
        let now = self.clock.now();
        let (mut inscription, expected) = self.store.load_inscription(id)?;

        let duration_months = self.doctorate_duration_months(&inscription.candidate_id, now);
        let outcome = inscription.submit(duration_months, now)?;

        let derogation = if outcome.requires_derogation {
            let reason = derogation_reason.ok_or(EngineError::DerogationReasonRequired {
                inscription_id: inscription.id,
                duration_months,
            })?;
            let derogation = Derogation::new(DerogationId::new(), inscription.id, reason, now)?;
            inscription.attach_derogation(derogation.id)?;
            // The dérogation commits first: a failure between the two
            // writes leaves an unreferenced dérogation, never an
            // inscription claiming an approval it does not have.
            let derogation_version = self.store.insert_derogation(derogation.clone())?;
            tracing::info!(
                inscription = %inscription.id,
                derogation = %derogation.id,
                duration_months,
                "dérogation opened for over-ceiling enrollment"
            );
            Some((derogation, derogation_version))
        } else {
            None
        };

        let version = self.store.store_inscription(&inscription, expected)?;
        tracing::info!(
            inscription = %inscription.id,
            status = %inscription.status,
            duration_months,
            "inscription submitted"
        );
        Ok(InscriptionSubmission {
            inscription,
            version,
            derogation,
        })
    }

    /// The thesis director's validation of an enrollment.
    pub fn validate_inscription_by_director(
        &self,
        id: &InscriptionId,
        approved: bool,
        comment: &str,
    ) -> Result<(Inscription, Version), EngineError> {
        let now = self.clock.now();
        let (mut inscription, expected) = self.store.load_inscription(id)?;
        inscription.validate_by_director(approved, comment, now)?;
        let version = self.store.store_inscription(&inscription, expected)?;
        tracing::info!(inscription = %inscription.id, status = %inscription.status, approved, "director validation recorded");
        Ok((inscription, version))
    }

    /// The administrative service's final validation of an enrollment. When
    /// a dérogation is attached it must be `APPROVED` first.
    pub fn validate_inscription_by_admin(
        &self,
        id: &InscriptionId,
        approved: bool,
        comment: &str,
    ) -> Result<(Inscription, Version), EngineError> {
        let now = self.clock.now();
        let (mut inscription, expected) = self.store.load_inscription(id)?;
        let derogation = match inscription.derogation_id {
            Some(derogation_id) => Some(self.store.load_derogation(&derogation_id)?.0),
            None => None,
        };
        inscription.validate_by_admin(approved, comment, derogation.as_ref(), now)?;
        let version = self.store.store_inscription(&inscription, expected)?;
        tracing::info!(inscription = %inscription.id, status = %inscription.status, approved, "administrative validation recorded");
        Ok((inscription, version))
    }

    // ── Dérogation commands ──────────────────────────────────────────

    /// The thesis director's decision on a dérogation. A refusal also
    /// rejects the parent inscription.
    pub fn decide_derogation_by_director(
        &self,
        id: &DerogationId,
        approved: bool,
        comment: &str,
    ) -> Result<DerogationDecision, EngineError> {
        self.decide_derogation(id, approved, comment, DecisionStep::Director)
    }

    /// The institutional authority's decision on a dérogation. A refusal
    /// also rejects the parent inscription.
    pub fn decide_derogation_by_authority(
        &self,
        id: &DerogationId,
        approved: bool,
        comment: &str,
    ) -> Result<DerogationDecision, EngineError> {
        self.decide_derogation(id, approved, comment, DecisionStep::Authority)
    }

    fn decide_derogation(
        &self,
        id: &DerogationId,
        approved: bool,
        comment: &str,
        step: DecisionStep,
    ) -> Result<DerogationDecision, EngineError> {
        let now = self.clock.now();
        let (mut derogation, expected) = self.store.load_derogation(id)?;
        match step {
            DecisionStep::Director => derogation.decide_by_director(approved, comment, now)?,
            DecisionStep::Authority => derogation.decide_by_authority(approved, comment, now)?,
        };
        let version = self.store.store_derogation(&derogation, expected)?;
        tracing::info!(derogation = %derogation.id, status = %derogation.status, approved, "dérogation decision recorded");

        let inscription = if derogation.is_refused() {
            self.propagate_derogation_refusal(&derogation, step, now)?
        } else {
            None
        };

        Ok(DerogationDecision {
            derogation,
            version,
            inscription,
        })
    }

    /// A refused dérogation rejects the parent inscription, equivalent to
    /// an administrative refusal. An inscription that already reached a
    /// terminal status is left untouched.
    fn propagate_derogation_refusal(
        &self,
        derogation: &Derogation,
        step: DecisionStep,
        now: DateTime<Utc>,
    ) -> Result<Option<(Inscription, Version)>, EngineError> {
        let (mut inscription, expected) = self.store.load_inscription(&derogation.inscription_id)?;
        if !inscription.is_active() {
            tracing::warn!(
                inscription = %inscription.id,
                derogation = %derogation.id,
                status = %inscription.status,
                "dérogation refusal not propagated: inscription already terminal"
            );
            return Ok(None);
        }
        let comment = match step {
            DecisionStep::Director => "dérogation refusée par le directeur de thèse",
            DecisionStep::Authority => "dérogation refusée par l'établissement",
        };
        inscription.reject_for_derogation(comment, now)?;
        let version = self.store.store_inscription(&inscription, expected)?;
        tracing::info!(
            inscription = %inscription.id,
            derogation = %derogation.id,
            "dérogation refusal propagated to inscription"
        );
        Ok(Some((inscription, version)))
    }

    // ── Defense commands ─────────────────────────────────────────────

    /// Create a new defense-request draft.
    pub fn create_soutenance(
        &self,
        candidate_id: PersonId,
        director_id: PersonId,
        draft: SoutenanceDraft,
    ) -> Result<(Soutenance, Version), EngineError> {
        let soutenance = Soutenance::new(
            SoutenanceId::new(),
            candidate_id,
            director_id,
            draft,
            self.clock.now(),
        );
        let version = self.store.insert_soutenance(soutenance.clone())?;
        tracing::info!(soutenance = %soutenance.id, "soutenance draft created");
        Ok((soutenance, version))
    }

    /// Update a defense-request draft; editing a refused request reopens
    /// it.
    pub fn update_soutenance_draft(
        &self,
        id: &SoutenanceId,
        draft: SoutenanceDraft,
    ) -> Result<(Soutenance, Version), EngineError> {
        let now = self.clock.now();
        let (mut soutenance, expected) = self.store.load_soutenance(id)?;
        soutenance.update_draft(draft, now)?;
        let version = self.store.store_soutenance(&soutenance, expected)?;
        Ok((soutenance, version))
    }

    /// Submit a defense request. Eligibility and document completeness are
    /// evaluated here from fresh port data.
    pub fn submit_soutenance(
        &self,
        id: &SoutenanceId,
    ) -> Result<(Soutenance, Version), EngineError> {
        let now = self.clock.now();
        let (mut soutenance, expected) = self.store.load_soutenance(id)?;
        let record = self.academic_record(&soutenance.candidate_id, now);
        let prerequisites = eligibility::evaluate(&record, &self.requirements);
        let missing = missing_for_defense(&record.documents);
        soutenance.submit(&prerequisites, &missing, now)?;
        let version = self.store.store_soutenance(&soutenance, expected)?;
        tracing::info!(soutenance = %soutenance.id, status = %soutenance.status, "soutenance submitted");
        Ok((soutenance, version))
    }

    /// Propose a jury composition. The director seat must name the
    /// soutenance's registered director and stays internal; the remaining
    /// composition rules are the validator's.
    pub fn propose_jury(
        &self,
        id: &SoutenanceId,
        members: Vec<JuryMember>,
    ) -> Result<(Soutenance, Version), EngineError> {
        let now = self.clock.now();
        let (mut soutenance, expected) = self.store.load_soutenance(id)?;

        let seats: Vec<&JuryMember> = members
            .iter()
            .filter(|m| m.role == JuryRole::Director)
            .collect();
        // Zero or several director seats fall through to the composition
        // validator, which reports the count violation.
        if let [seat] = seats.as_slice() {
            if seat.person_id != soutenance.director_id {
                return Err(EngineError::DirectorMemberMismatch {
                    expected: soutenance.director_id,
                    detail: format!("proposed seat names {}", seat.person_id),
                });
            }
            if seat.external {
                return Err(EngineError::DirectorMemberMismatch {
                    expected: soutenance.director_id,
                    detail: "the director seat cannot be marked external".to_string(),
                });
            }
        }

        soutenance.propose_jury(members, now)?;
        let version = self.store.store_soutenance(&soutenance, expected)?;
        tracing::info!(
            soutenance = %soutenance.id,
            members = soutenance.jury.len(),
            "jury proposed"
        );
        Ok((soutenance, version))
    }

    /// Accept or refuse the proposed jury.
    pub fn decide_jury(
        &self,
        id: &SoutenanceId,
        approved: bool,
    ) -> Result<(Soutenance, Version), EngineError> {
        let now = self.clock.now();
        let (mut soutenance, expected) = self.store.load_soutenance(id)?;
        let status = soutenance.decide_jury(approved, now)?;
        let version = self.store.store_soutenance(&soutenance, expected)?;
        tracing::info!(soutenance = %soutenance.id, jury_status = %status, "jury decision recorded");
        Ok((soutenance, version))
    }

    /// Authorize the defense, scheduling it. Prerequisites are re-evaluated
    /// against fresh port data at call time, never cached.
    pub fn authorize_soutenance(
        &self,
        id: &SoutenanceId,
        scheduled_date: DateTime<Utc>,
        venue: &str,
    ) -> Result<(Soutenance, Version), EngineError> {
        let venue = venue.trim();
        if venue.is_empty() {
            return Err(ValidationError::BlankField { field: "venue" }.into());
        }
        let now = self.clock.now();
        let (mut soutenance, expected) = self.store.load_soutenance(id)?;
        let record = self.academic_record(&soutenance.candidate_id, now);
        let prerequisites = eligibility::evaluate(&record, &self.requirements);
        soutenance.authorize(scheduled_date, venue.to_string(), &prerequisites, now)?;
        let version = self.store.store_soutenance(&soutenance, expected)?;
        tracing::info!(
            soutenance = %soutenance.id,
            scheduled = %scheduled_date,
            "defense authorized"
        );
        Ok((soutenance, version))
    }

    /// Refuse the defense request.
    pub fn reject_soutenance(
        &self,
        id: &SoutenanceId,
        reason: &str,
    ) -> Result<(Soutenance, Version), EngineError> {
        let now = self.clock.now();
        let (mut soutenance, expected) = self.store.load_soutenance(id)?;
        soutenance.reject(reason, now)?;
        let version = self.store.store_soutenance(&soutenance, expected)?;
        tracing::info!(soutenance = %soutenance.id, "defense request refused");
        Ok((soutenance, version))
    }

    /// Record the defense outcome once the scheduled date has passed.
    pub fn record_defense_outcome(
        &self,
        id: &SoutenanceId,
        result: DefenseResult,
    ) -> Result<(Soutenance, Version), EngineError> {
        let now = self.clock.now();
        let (mut soutenance, expected) = self.store.load_soutenance(id)?;
        soutenance.record_outcome(result, now)?;
        let version = self.store.store_soutenance(&soutenance, expected)?;
        tracing::info!(soutenance = %soutenance.id, "defense outcome recorded");
        Ok((soutenance, version))
    }

    // ── Read paths ───────────────────────────────────────────────────

    /// Evaluate a candidate's defense prerequisites for diagnostic
    /// display. Read-only; the same evaluation gates `submit_soutenance`
    /// and `authorize_soutenance`.
    pub fn eligibility(&self, candidate_id: &PersonId) -> PrerequisiteStatus {
        let now = self.clock.now();
        let record = self.academic_record(candidate_id, now);
        eligibility::evaluate(&record, &self.requirements)
    }

    // ── Internals ────────────────────────────────────────────────────

    /// Doctorate duration in whole months: elapsed time since the earliest
    /// prior enrollment, zero for a first-year candidate.
    fn doctorate_duration_months(&self, candidate_id: &PersonId, now: DateTime<Utc>) -> u32 {
        let earliest = self
            .history
            .prior_enrollments(candidate_id)
            .iter()
            .map(|p| p.started_at)
            .min();
        match earliest {
            Some(start) => elapsed_months(start, now),
            None => 0,
        }
    }

    fn academic_record(&self, candidate_id: &PersonId, now: DateTime<Utc>) -> AcademicRecord {
        AcademicRecord {
            publication_count: self.profile.publication_count(candidate_id),
            training_hours: self.profile.training_hours(candidate_id),
            duration_months: self.doctorate_duration_months(candidate_id, now),
            documents: self.documents.documents(candidate_id),
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum DecisionStep {
    Director,
    Authority,
}
