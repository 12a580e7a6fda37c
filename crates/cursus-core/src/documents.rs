//! # Supporting-Document Kinds
//!
//! The portal tracks supporting documents by kind and presence only. The
//! engine never reads document content — upload, storage, and retrieval
//! belong to the host's document store, which reports presence flags
//! through [`DocumentRef`].

use serde::{Deserialize, Serialize};

/// Kinds of supporting documents tracked across the doctoral lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DocumentKind {
    /// The thesis manuscript.
    Manuscript,
    /// The candidate's curriculum vitae.
    CurriculumVitae,
    /// The list of the candidate's publications.
    PublicationsList,
    /// Certificate of completed doctoral training hours.
    TrainingCertificate,
    /// The thesis director's endorsement of the defense request.
    DirectorEndorsement,
}

impl DocumentKind {
    /// All document kinds as a slice.
    pub fn all() -> &'static [DocumentKind] {
        &[
            Self::Manuscript,
            Self::CurriculumVitae,
            Self::PublicationsList,
            Self::TrainingCertificate,
            Self::DirectorEndorsement,
        ]
    }

    /// The document kinds a defense request must have present before it can
    /// be submitted.
    pub fn required_for_defense() -> &'static [DocumentKind] {
        // Every tracked kind is required at defense time; enrollment-stage
        // screens only display a subset.
        Self::all()
    }
}

impl std::fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Manuscript => "manuscript",
            Self::CurriculumVitae => "curriculum_vitae",
            Self::PublicationsList => "publications_list",
            Self::TrainingCertificate => "training_certificate",
            Self::DirectorEndorsement => "director_endorsement",
        };
        write!(f, "{s}")
    }
}

/// A document reference as reported by the host's document store: the kind
/// and whether a complete upload is present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentRef {
    /// The kind of document.
    pub kind: DocumentKind,
    /// Whether the document is uploaded and marked complete.
    pub present: bool,
}

impl DocumentRef {
    /// A present document of the given kind.
    pub fn present(kind: DocumentKind) -> Self {
        Self { kind, present: true }
    }

    /// A missing document of the given kind.
    pub fn missing(kind: DocumentKind) -> Self {
        Self {
            kind,
            present: false,
        }
    }
}

/// Compute which of the defense-required document kinds are not present in
/// the given references. A kind that never appears in `refs` counts as
/// missing.
pub fn missing_for_defense(refs: &[DocumentRef]) -> Vec<DocumentKind> {
    DocumentKind::required_for_defense()
        .iter()
        .copied()
        .filter(|kind| !refs.iter().any(|r| r.kind == *kind && r.present))
        .collect()
}
