//! # cursus-compliance — Academic Rule Sets
//!
//! The two pure rule sets of the doctoral workflow, extracted from the
//! screens that used to re-implement them and expressed as functions with
//! no I/O:
//!
//! - [`jury`]: composition rules for a defense jury (size bounds, role
//!   uniqueness, externality quotas). [`jury::validate`] evaluates every
//!   rule and reports all violations together — callers render the list,
//!   they never re-derive it.
//!
//! - [`eligibility`]: the prerequisite gate a candidate must pass before a
//!   defense request can be submitted or authorized (publications, training
//!   hours, doctorate duration, supporting documents).
//!   [`eligibility::evaluate`] always reports all four criteria with
//!   required-versus-actual values, so a rejection is renderable without a
//!   second query.
//!
//! ## Architecture
//!
//! ```text
//! cursus-core (primitives)  -->  cursus-compliance (rules)  -->  cursus-state (machines)
//!   DocumentKind                   validate / evaluate             gate transitions on
//!   PersonId                       JuryAssessment                  JuryAssessment /
//!                                  PrerequisiteStatus              PrerequisiteStatus
//! ```

pub mod eligibility;
pub mod jury;

// Re-export primary types.
pub use eligibility::{
    evaluate, AcademicRecord, Criterion, CriterionOutcome, EligibilityRequirements,
    PrerequisiteStatus,
};
pub use jury::{validate, AcademicRank, JuryAssessment, JuryMember, JuryRole, JuryViolation};
