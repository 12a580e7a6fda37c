//! # Identity Newtypes
//!
//! Domain-primitive newtypes for identifiers throughout the doctoral stack.
//! Each identifier is a distinct type — you cannot pass an [`InscriptionId`]
//! where a [`DerogationId`] is expected.
//!
//! ## Validation
//!
//! UUID-based identifiers ([`PersonId`], [`InscriptionId`], [`SoutenanceId`],
//! [`DerogationId`]) are always valid by construction. The string-based
//! [`CampaignId`] validates its academic-year format at construction time.
//!
//! People (candidates, thesis directors, jury members) share one identity
//! type: the role a person plays is carried by the referencing field
//! (`candidate_id`, `director_id`), never by a parallel id space, so the
//! same person can direct one thesis and sit on another jury without two
//! identities.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ValidationError;

// ---------------------------------------------------------------------------
// UUID-based identifiers (always valid by construction)
// ---------------------------------------------------------------------------

/// A person registered in the institution directory: a doctoral candidate,
/// a thesis director, or a jury member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PersonId(Uuid);

impl PersonId {
    /// Create a new random person identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a person identifier from an existing UUID.
    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for PersonId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for PersonId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A unique identifier for one enrollment record (inscription).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InscriptionId(Uuid);

impl InscriptionId {
    /// Create a new random inscription identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create an inscription identifier from an existing UUID.
    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for InscriptionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for InscriptionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "inscription:{}", self.0)
    }
}

/// A unique identifier for one thesis-defense request (soutenance).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SoutenanceId(Uuid);

impl SoutenanceId {
    /// Create a new random soutenance identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a soutenance identifier from an existing UUID.
    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for SoutenanceId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SoutenanceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "soutenance:{}", self.0)
    }
}

/// A unique identifier for one exception request (dérogation).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DerogationId(Uuid);

impl DerogationId {
    /// Create a new random dérogation identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a dérogation identifier from an existing UUID.
    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for DerogationId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for DerogationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "derogation:{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// String-based identifiers (validated at construction)
// ---------------------------------------------------------------------------

/// An academic-campaign label, e.g. `"2025-2026"`.
///
/// The label is two four-digit years joined by a dash, the second year being
/// the first plus one. Campaigns are the enrollment cycle boundary: a
/// candidate holds at most one active inscription per campaign.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CampaignId(String);

impl CampaignId {
    /// Create a campaign identifier, validating the `YYYY-YYYY` format.
    pub fn new(label: impl Into<String>) -> Result<Self, ValidationError> {
        let label = label.into();
        let mut parts = label.splitn(2, '-');
        let first = parts.next().and_then(parse_year);
        let second = parts.next().and_then(parse_year);
        match (first, second) {
            (Some(a), Some(b)) if b == a + 1 => Ok(Self(label)),
            _ => Err(ValidationError::InvalidCampaignId(label)),
        }
    }

    /// Access the label string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn parse_year(part: &str) -> Option<u32> {
    if part.len() == 4 && part.bytes().all(|b| b.is_ascii_digit()) {
        part.parse().ok()
    } else {
        None
    }
}

impl std::fmt::Display for CampaignId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
