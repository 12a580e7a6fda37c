//! # Collaborator Ports
//!
//! The engine performs no I/O of its own: everything it needs from the
//! outside world arrives through the traits in this module, implemented by
//! the host. The clock is a port too, so every date-based rule (the
//! 36-month dérogation ceiling, the defense-date-in-past check) is
//! deterministic under test.

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use cursus_core::{CampaignId, DerogationId, DocumentRef, InscriptionId, PersonId, SoutenanceId};
use cursus_state::{Derogation, Inscription, Soutenance};

// ── Clock ────────────────────────────────────────────────────────────

/// The engine's only source of the current instant.
pub trait Clock {
    /// The current UTC time.
    fn now(&self) -> DateTime<Utc>;
}

/// Production clock, reading the system time.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A settable clock for deterministic tests.
#[derive(Debug)]
pub struct FixedClock {
    now: Mutex<DateTime<Utc>>,
}

impl FixedClock {
    /// Create a clock frozen at the given instant.
    pub fn at(now: DateTime<Utc>) -> Self {
        Self { now: Mutex::new(now) }
    }

    /// Move the clock to a new instant.
    pub fn set(&self, now: DateTime<Utc>) {
        *self.now.lock() = now;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock()
    }
}

impl<T: Clock + ?Sized> Clock for &T {
    fn now(&self) -> DateTime<Utc> {
        (**self).now()
    }
}

// ── Candidate History & Profile ──────────────────────────────────────

/// One prior enrollment of a candidate, as reported by the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrollmentPeriod {
    /// The campaign the enrollment belonged to.
    pub campaign_id: CampaignId,
    /// When the enrollment took effect.
    pub started_at: DateTime<Utc>,
}

/// Lookup of a candidate's prior enrollments, for doctorate-duration
/// computation.
pub trait EnrollmentHistory {
    /// All prior enrollments of the candidate, in any order.
    fn prior_enrollments(&self, candidate: &PersonId) -> Vec<EnrollmentPeriod>;
}

impl<T: EnrollmentHistory + ?Sized> EnrollmentHistory for &T {
    fn prior_enrollments(&self, candidate: &PersonId) -> Vec<EnrollmentPeriod> {
        (**self).prior_enrollments(candidate)
    }
}

/// The host's document store. The engine only ever reads presence flags,
/// never content.
pub trait DocumentStore {
    /// Document references for the given owner.
    fn documents(&self, owner: &PersonId) -> Vec<DocumentRef>;
}

/// The independently-sourced academic counters used by eligibility
/// evaluation.
pub trait AcademicProfile {
    /// Number of the candidate's accepted publications.
    fn publication_count(&self, candidate: &PersonId) -> u32;
    /// The candidate's completed doctoral training hours.
    fn training_hours(&self, candidate: &PersonId) -> u32;
}

impl<T: DocumentStore + ?Sized> DocumentStore for &T {
    fn documents(&self, owner: &PersonId) -> Vec<DocumentRef> {
        (**self).documents(owner)
    }
}

impl<T: AcademicProfile + ?Sized> AcademicProfile for &T {
    fn publication_count(&self, candidate: &PersonId) -> u32 {
        (**self).publication_count(candidate)
    }
    fn training_hours(&self, candidate: &PersonId) -> u32 {
        (**self).training_hours(candidate)
    }
}

// ── Persistence ──────────────────────────────────────────────────────

/// A record version for optimistic concurrency control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Version(pub u64);

impl Version {
    /// The version assigned to a freshly inserted record.
    pub fn initial() -> Self {
        Self(1)
    }

    /// The version following this one.
    pub fn next(&self) -> Self {
        Self(self.0 + 1)
    }
}

impl std::fmt::Display for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "v{}", self.0)
    }
}

/// Errors from the persistence boundary.
#[derive(Error, Debug)]
pub enum StorageError {
    /// The record changed since it was read. The caller should reload and
    /// retry; this is a concurrency conflict, not a user error.
    #[error("stale state: expected {expected}, record is at {actual}")]
    StaleState {
        /// The version the command read.
        expected: Version,
        /// The version found at commit time.
        actual: Version,
    },

    /// No record with the given identifier.
    #[error("{kind} {id} not found")]
    NotFound {
        /// The entity kind ("inscription", "derogation", "soutenance").
        kind: &'static str,
        /// The identifier that missed.
        id: String,
    },
}

/// Versioned persistence for the three workflow entities.
///
/// `load_*` returns the record with its current version; `store_*` commits
/// only when `expected` still matches, returning the new version —
/// otherwise [`StorageError::StaleState`]. Hosts that need strict
/// single-command atomicity wrap a command's writes in one transaction;
/// the engine orders its writes so the guarded record commits last.
pub trait WorkflowStore {
    /// Load an inscription with its current version.
    fn load_inscription(&self, id: &InscriptionId) -> Result<(Inscription, Version), StorageError>;
    /// Insert a new inscription at [`Version::initial`].
    fn insert_inscription(&self, inscription: Inscription) -> Result<Version, StorageError>;
    /// Commit an inscription read at `expected`.
    fn store_inscription(
        &self,
        inscription: &Inscription,
        expected: Version,
    ) -> Result<Version, StorageError>;
    /// Whether the candidate already holds an active (non-terminal)
    /// inscription in the campaign.
    fn has_active_inscription(
        &self,
        candidate: &PersonId,
        campaign: &CampaignId,
    ) -> Result<bool, StorageError>;

    /// Load a dérogation with its current version.
    fn load_derogation(&self, id: &DerogationId) -> Result<(Derogation, Version), StorageError>;
    /// Insert a new dérogation at [`Version::initial`].
    fn insert_derogation(&self, derogation: Derogation) -> Result<Version, StorageError>;
    /// Commit a dérogation read at `expected`.
    fn store_derogation(
        &self,
        derogation: &Derogation,
        expected: Version,
    ) -> Result<Version, StorageError>;

    /// Load a soutenance with its current version.
    fn load_soutenance(&self, id: &SoutenanceId) -> Result<(Soutenance, Version), StorageError>;
    /// Insert a new soutenance at [`Version::initial`].
    fn insert_soutenance(&self, soutenance: Soutenance) -> Result<Version, StorageError>;
    /// Commit a soutenance read at `expected`.
    fn store_soutenance(
        &self,
        soutenance: &Soutenance,
        expected: Version,
    ) -> Result<Version, StorageError>;
}

impl<T: WorkflowStore + ?Sized> WorkflowStore for &T {
    fn load_inscription(&self, id: &InscriptionId) -> Result<(Inscription, Version), StorageError> {
        (**self).load_inscription(id)
    }
    fn insert_inscription(&self, inscription: Inscription) -> Result<Version, StorageError> {
        (**self).insert_inscription(inscription)
    }
    fn store_inscription(
        &self,
        inscription: &Inscription,
        expected: Version,
    ) -> Result<Version, StorageError> {
        (**self).store_inscription(inscription, expected)
    }
    fn has_active_inscription(
        &self,
        candidate: &PersonId,
        campaign: &CampaignId,
    ) -> Result<bool, StorageError> {
        (**self).has_active_inscription(candidate, campaign)
    }
    fn load_derogation(&self, id: &DerogationId) -> Result<(Derogation, Version), StorageError> {
        (**self).load_derogation(id)
    }
    fn insert_derogation(&self, derogation: Derogation) -> Result<Version, StorageError> {
        (**self).insert_derogation(derogation)
    }
    fn store_derogation(
        &self,
        derogation: &Derogation,
        expected: Version,
    ) -> Result<Version, StorageError> {
        (**self).store_derogation(derogation, expected)
    }
    fn load_soutenance(&self, id: &SoutenanceId) -> Result<(Soutenance, Version), StorageError> {
        (**self).load_soutenance(id)
    }
    fn insert_soutenance(&self, soutenance: Soutenance) -> Result<Version, StorageError> {
        (**self).insert_soutenance(soutenance)
    }
    fn store_soutenance(
        &self,
        soutenance: &Soutenance,
        expected: Version,
    ) -> Result<Version, StorageError> {
        (**self).store_soutenance(soutenance, expected)
    }
}
