//! # Transition Audit Records
//!
//! Every state change in every machine is logged with the source and target
//! state names, the acting party, an optional comment, and a timestamp.
//! The log is the audit trail administrative reviews read; it is appended
//! to, never rewritten.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The party responsible for a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Actor {
    /// The doctoral candidate.
    Candidate,
    /// The thesis director.
    Director,
    /// The doctoral administrative service.
    AdministrativeService,
    /// The institutional authority deciding dérogations.
    InstitutionalAuthority,
    /// The engine itself, for auto-advances between human steps.
    System,
}

impl Actor {
    /// The canonical string name of this actor.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Candidate => "CANDIDATE",
            Self::Director => "DIRECTOR",
            Self::AdministrativeService => "ADMINISTRATIVE_SERVICE",
            Self::InstitutionalAuthority => "INSTITUTIONAL_AUTHORITY",
            Self::System => "SYSTEM",
        }
    }
}

impl std::fmt::Display for Actor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A record of a single state transition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitionRecord {
    /// Canonical name of the state before the transition.
    pub from: String,
    /// Canonical name of the state after the transition.
    pub to: String,
    /// Who caused the transition.
    pub actor: Actor,
    /// The decision comment, when one was given.
    pub comment: Option<String>,
    /// When the transition occurred.
    pub timestamp: DateTime<Utc>,
}

impl TransitionRecord {
    /// Build a record from canonical state names.
    pub fn new(
        from: &str,
        to: &str,
        actor: Actor,
        comment: Option<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            from: from.to_string(),
            to: to.to_string(),
            actor,
            comment,
            timestamp,
        }
    }
}
