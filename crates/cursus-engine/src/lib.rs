//! # cursus-engine — Doctoral Workflow Façade
//!
//! The boundary the host application calls. The engine is stateless
//! business logic over records the host persists: it loads an entity and
//! its version through [`ports::WorkflowStore`], gathers rule inputs from
//! the collaborator ports (clock, enrollment history, document store,
//! academic profile), delegates the transition to the `cursus-state`
//! machines, and commits with an optimistic version check. One synchronous
//! command per invocation; no background work; no internal retries.
//!
//! ## Commands
//!
//! Enrollment: [`WorkflowEngine::create_inscription`],
//! [`WorkflowEngine::submit_inscription`],
//! [`WorkflowEngine::validate_inscription_by_director`],
//! [`WorkflowEngine::validate_inscription_by_admin`].
//!
//! Dérogation: [`WorkflowEngine::decide_derogation_by_director`],
//! [`WorkflowEngine::decide_derogation_by_authority`] — a refusal at
//! either step also rejects the parent inscription.
//!
//! Defense: [`WorkflowEngine::create_soutenance`],
//! [`WorkflowEngine::update_soutenance_draft`],
//! [`WorkflowEngine::submit_soutenance`],
//! [`WorkflowEngine::propose_jury`], [`WorkflowEngine::decide_jury`],
//! [`WorkflowEngine::authorize_soutenance`],
//! [`WorkflowEngine::reject_soutenance`],
//! [`WorkflowEngine::record_defense_outcome`], plus the read-only
//! [`WorkflowEngine::eligibility`].

pub mod engine;
pub mod error;
pub mod memory;
pub mod ports;

// Re-export primary types.
pub use engine::{DerogationDecision, InscriptionSubmission, WorkflowEngine};
pub use error::EngineError;
pub use memory::MemoryStore;
pub use ports::{
    AcademicProfile, Clock, DocumentStore, EnrollmentHistory, EnrollmentPeriod, FixedClock,
    StorageError, SystemClock, Version, WorkflowStore,
};
