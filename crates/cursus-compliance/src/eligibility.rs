//! # Defense Prerequisite Evaluation
//!
//! The eligibility gate a candidate must pass before a defense request can
//! be submitted or authorized: publication count, doctoral training hours,
//! doctorate duration, and supporting-document completeness.
//!
//! [`evaluate`] is pure — the workflow engine assembles an
//! [`AcademicRecord`] snapshot from its collaborator ports and hands it in.
//! The returned [`PrerequisiteStatus`] always details all four criteria with
//! required-versus-actual values, satisfied or not, so the UI renders the
//! same table for a passing and a failing candidate.

use serde::{Deserialize, Serialize};

use cursus_core::{missing_for_defense, DocumentRef};

/// The four prerequisite criteria, in evaluation (and display) order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Criterion {
    /// Minimum number of accepted publications.
    Publications,
    /// Minimum number of doctoral training hours.
    TrainingHours,
    /// Doctorate duration within the allowed bound.
    Duration,
    /// All required supporting documents uploaded and complete.
    Documents,
}

impl Criterion {
    /// The canonical string name of this criterion.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Publications => "publications",
            Self::TrainingHours => "training_hours",
            Self::Duration => "duration",
            Self::Documents => "documents",
        }
    }
}

impl std::fmt::Display for Criterion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One row of the prerequisite table: a criterion with its outcome and the
/// required and actual values rendered as strings for diagnostic display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CriterionOutcome {
    /// Which criterion this row reports.
    pub criterion: Criterion,
    /// Whether the criterion is satisfied.
    pub satisfied: bool,
    /// The required value, rendered for display.
    pub required: String,
    /// The observed value, rendered for display.
    pub actual: String,
}

/// The complete prerequisite evaluation for one candidate.
///
/// `all_satisfied` is the conjunction of the four criterion flags; `details`
/// always lists all four criteria regardless of outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrerequisiteStatus {
    /// Publication-count criterion satisfied.
    pub publications_satisfied: bool,
    /// Training-hours criterion satisfied.
    pub training_hours_satisfied: bool,
    /// Duration-bound criterion satisfied.
    pub duration_satisfied: bool,
    /// Document-completeness criterion satisfied.
    pub documents_satisfied: bool,
    /// Conjunction of the four criterion flags.
    pub all_satisfied: bool,
    /// All four criterion rows, in [`Criterion`] order.
    pub details: Vec<CriterionOutcome>,
}

impl PrerequisiteStatus {
    /// The subset of criterion rows that are not satisfied.
    pub fn unmet(&self) -> Vec<&CriterionOutcome> {
        self.details.iter().filter(|d| !d.satisfied).collect()
    }
}

/// Institution-configurable prerequisite thresholds.
///
/// Defaults: 2 publications, 100 training hours, 72 months. The 72-month
/// bound here gates the *defense*; it is distinct from the 36-month
/// enrollment ceiling that triggers a dérogation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EligibilityRequirements {
    /// Minimum number of accepted publications.
    pub min_publications: u32,
    /// Minimum number of doctoral training hours.
    pub min_training_hours: u32,
    /// Maximum doctorate duration, in whole months.
    pub max_duration_months: u32,
}

impl Default for EligibilityRequirements {
    fn default() -> Self {
        Self {
            min_publications: 2,
            min_training_hours: 100,
            max_duration_months: 72,
        }
    }
}

/// The snapshot of a candidate's academic situation the engine assembles
/// from its collaborator ports before evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AcademicRecord {
    /// Number of accepted publications.
    pub publication_count: u32,
    /// Completed doctoral training hours.
    pub training_hours: u32,
    /// Doctorate duration in whole months, as of evaluation time.
    pub duration_months: u32,
    /// Supporting-document presence flags from the document store.
    pub documents: Vec<DocumentRef>,
}

/// Evaluate a candidate's defense prerequisites against the institution's
/// requirements.
pub fn evaluate(
    record: &AcademicRecord,
    requirements: &EligibilityRequirements,
) -> PrerequisiteStatus {
    let publications_satisfied = record.publication_count >= requirements.min_publications;
    let training_hours_satisfied = record.training_hours >= requirements.min_training_hours;
    let duration_satisfied = record.duration_months <= requirements.max_duration_months;

    let required_documents = cursus_core::DocumentKind::required_for_defense();
    let missing = missing_for_defense(&record.documents);
    let documents_satisfied = missing.is_empty();

    let details = vec![
        CriterionOutcome {
            criterion: Criterion::Publications,
            satisfied: publications_satisfied,
            required: requirements.min_publications.to_string(),
            actual: record.publication_count.to_string(),
        },
        CriterionOutcome {
            criterion: Criterion::TrainingHours,
            satisfied: training_hours_satisfied,
            required: requirements.min_training_hours.to_string(),
            actual: record.training_hours.to_string(),
        },
        CriterionOutcome {
            criterion: Criterion::Duration,
            satisfied: duration_satisfied,
            required: format!("<= {} months", requirements.max_duration_months),
            actual: format!("{} months", record.duration_months),
        },
        CriterionOutcome {
            criterion: Criterion::Documents,
            satisfied: documents_satisfied,
            required: required_documents.len().to_string(),
            actual: (required_documents.len() - missing.len()).to_string(),
        },
    ];

    let all_satisfied = publications_satisfied
        && training_hours_satisfied
        && duration_satisfied
        && documents_satisfied;

    PrerequisiteStatus {
        publications_satisfied,
        training_hours_satisfied,
        duration_satisfied,
        documents_satisfied,
        all_satisfied,
        details,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cursus_core::DocumentKind;

    fn complete_documents() -> Vec<DocumentRef> {
        DocumentKind::required_for_defense()
            .iter()
            .map(|k| DocumentRef::present(*k))
            .collect()
    }

    fn satisfied_record() -> AcademicRecord {
        AcademicRecord {
            publication_count: 2,
            training_hours: 120,
            duration_months: 40,
            documents: complete_documents(),
        }
    }

    #[test]
    fn fully_satisfied_candidate() {
        let status = evaluate(&satisfied_record(), &EligibilityRequirements::default());
        assert!(status.all_satisfied);
        assert_eq!(status.details.len(), 4);
        assert!(status.unmet().is_empty());
    }

    #[test]
    fn publication_shortfall_reports_required_vs_actual() {
        let record = AcademicRecord {
            publication_count: 1,
            ..satisfied_record()
        };
        let status = evaluate(&record, &EligibilityRequirements::default());
        assert!(!status.all_satisfied);
        assert!(!status.publications_satisfied);

        let unmet = status.unmet();
        assert_eq!(unmet.len(), 1);
        assert_eq!(unmet[0].criterion, Criterion::Publications);
        assert_eq!(unmet[0].required, "2");
        assert_eq!(unmet[0].actual, "1");
    }

    #[test]
    fn details_list_all_criteria_even_when_satisfied() {
        let status = evaluate(&satisfied_record(), &EligibilityRequirements::default());
        let criteria: Vec<Criterion> = status.details.iter().map(|d| d.criterion).collect();
        assert_eq!(
            criteria,
            vec![
                Criterion::Publications,
                Criterion::TrainingHours,
                Criterion::Duration,
                Criterion::Documents,
            ]
        );
    }

    #[test]
    fn training_hours_at_threshold_satisfied() {
        let record = AcademicRecord {
            training_hours: 100,
            ..satisfied_record()
        };
        let status = evaluate(&record, &EligibilityRequirements::default());
        assert!(status.training_hours_satisfied);
    }

    #[test]
    fn duration_over_bound_fails() {
        let record = AcademicRecord {
            duration_months: 73,
            ..satisfied_record()
        };
        let status = evaluate(&record, &EligibilityRequirements::default());
        assert!(!status.duration_satisfied);
        assert!(!status.all_satisfied);
        let unmet = status.unmet();
        assert_eq!(unmet[0].criterion, Criterion::Duration);
        assert_eq!(unmet[0].required, "<= 72 months");
        assert_eq!(unmet[0].actual, "73 months");
    }

    #[test]
    fn duration_at_bound_satisfied() {
        let record = AcademicRecord {
            duration_months: 72,
            ..satisfied_record()
        };
        assert!(evaluate(&record, &EligibilityRequirements::default()).duration_satisfied);
    }

    #[test]
    fn missing_document_fails_documents_criterion() {
        let mut documents = complete_documents();
        documents.retain(|d| d.kind != DocumentKind::Manuscript);
        let record = AcademicRecord {
            documents,
            ..satisfied_record()
        };
        let status = evaluate(&record, &EligibilityRequirements::default());
        assert!(!status.documents_satisfied);
        let unmet = status.unmet();
        assert_eq!(unmet[0].criterion, Criterion::Documents);
        assert_eq!(unmet[0].required, "5");
        assert_eq!(unmet[0].actual, "4");
    }

    #[test]
    fn incomplete_upload_counts_as_missing() {
        let mut documents = complete_documents();
        documents[0].present = false;
        let record = AcademicRecord {
            documents,
            ..satisfied_record()
        };
        assert!(!evaluate(&record, &EligibilityRequirements::default()).documents_satisfied);
    }

    #[test]
    fn multiple_shortfalls_all_reported() {
        let record = AcademicRecord {
            publication_count: 0,
            training_hours: 10,
            duration_months: 90,
            documents: vec![],
        };
        let status = evaluate(&record, &EligibilityRequirements::default());
        assert!(!status.all_satisfied);
        assert_eq!(status.unmet().len(), 4);
    }

    #[test]
    fn custom_requirements_respected() {
        let requirements = EligibilityRequirements {
            min_publications: 1,
            min_training_hours: 50,
            max_duration_months: 48,
        };
        let record = AcademicRecord {
            publication_count: 1,
            training_hours: 50,
            duration_months: 48,
            documents: complete_documents(),
        };
        assert!(evaluate(&record, &requirements).all_satisfied);
    }

    #[test]
    fn status_serializes_for_transport() {
        let status = evaluate(&satisfied_record(), &EligibilityRequirements::default());
        let json = serde_json::to_string(&status).unwrap();
        let back: PrerequisiteStatus = serde_json::from_str(&json).unwrap();
        assert_eq!(back, status);
    }
}
