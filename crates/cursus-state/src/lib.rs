//! # cursus-state — Doctoral Lifecycle State Machines
//!
//! The three state machines of the doctoral workflow, one module each:
//!
//! - **Inscription** ([`inscription`]): one enrollment cycle, from draft
//!   through director and administrative validation to acceptance or
//!   rejection.
//!
//! - **Dérogation** ([`derogation`]): the exception sub-process opened when
//!   a doctorate exceeds the 36-month ceiling — director decision first,
//!   institutional authority second, in that order.
//!
//! - **Soutenance** ([`soutenance`]): a thesis-defense request, from draft
//!   through eligibility and jury checks to authorization, scheduling, and
//!   the recorded defense outcome.
//!
//! Each machine is a record struct plus a status enum plus transition
//! methods returning `Result`. Invalid commands are structured errors, never
//! panics; every state change appends a [`transition::TransitionRecord`] to
//! the record's audit log.
//!
//! The machines never read the system clock — every transition takes the
//! current instant from the caller (the engine injects its clock), so every
//! date rule is deterministic under test.

pub mod derogation;
pub mod inscription;
pub mod soutenance;
pub mod transition;

// Re-export primary types.
pub use derogation::{Derogation, DerogationError, DerogationStatus, DEROGATION_THRESHOLD_MONTHS};
pub use inscription::{Inscription, InscriptionError, InscriptionStatus, SubmissionOutcome};
pub use soutenance::{
    DefenseResult, JuryStatus, Mention, Soutenance, SoutenanceDraft, SoutenanceError,
    SoutenanceStatus, Verdict,
};
pub use transition::{Actor, TransitionRecord};
