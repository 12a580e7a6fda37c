//! # Jury Composition Rules
//!
//! Composition constraints for a thesis-defense jury, in the strict form
//! applied at submission time: 4 to 8 members, exactly one president,
//! at least two external rapporteurs, at least half the members external
//! to the institution, exactly one thesis director.
//!
//! [`validate`] evaluates every rule independently — no short-circuit — so
//! a caller gets the complete violation list in one pass and the UI can
//! render every problem at once.
//!
//! Identity constraints on the director member (it must be the soutenance's
//! registered director, and cannot be removed or altered by a caller) are
//! enforced by the workflow engine, which knows the soutenance record; this
//! module only checks the composition it is handed.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use cursus_core::PersonId;

/// Minimum number of jury members.
pub const MIN_JURY_SIZE: usize = 4;
/// Maximum number of jury members.
pub const MAX_JURY_SIZE: usize = 8;
/// Minimum number of rapporteurs external to the institution.
pub const MIN_EXTERNAL_RAPPORTEURS: usize = 2;

/// The role a person holds within one jury.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JuryRole {
    /// Presides over the defense. Exactly one per jury.
    President,
    /// Reviews and reports on the manuscript ahead of the defense.
    Rapporteur,
    /// Examines the candidate during the defense.
    Examiner,
    /// The thesis director. Exactly one per jury, derived from the
    /// soutenance record.
    Director,
    /// A co-director of the thesis.
    CoDirector,
}

impl std::fmt::Display for JuryRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::President => "president",
            Self::Rapporteur => "rapporteur",
            Self::Examiner => "examiner",
            Self::Director => "director",
            Self::CoDirector => "co_director",
        };
        write!(f, "{s}")
    }
}

/// Academic rank of a jury member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AcademicRank {
    /// Full professor.
    Professor,
    /// Associate professor.
    AssociateProfessor,
    /// Research director.
    ResearchDirector,
    /// Researcher.
    Researcher,
}

impl std::fmt::Display for AcademicRank {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Professor => "professor",
            Self::AssociateProfessor => "associate_professor",
            Self::ResearchDirector => "research_director",
            Self::Researcher => "researcher",
        };
        write!(f, "{s}")
    }
}

/// A person assigned a role within one jury.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JuryMember {
    /// Identity of the person in the institution directory.
    pub person_id: PersonId,
    /// Full name, as it appears on the defense report.
    pub name: String,
    /// Home institution or laboratory.
    pub affiliation: String,
    /// Academic rank.
    pub rank: AcademicRank,
    /// Role within this jury.
    pub role: JuryRole,
    /// Whether the member is external to the defending institution.
    pub external: bool,
}

/// A composition rule violation, with the observed numbers embedded so the
/// rendered message states the rule and the actual count together.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum JuryViolation {
    /// The jury has too few or too many members.
    #[error("jury size {size} outside allowed range {min}..={max}", min = MIN_JURY_SIZE, max = MAX_JURY_SIZE)]
    SizeOutOfRange {
        /// Number of members in the proposal.
        size: usize,
    },

    /// The jury does not have exactly one president.
    #[error("exactly 1 president required, found {count}")]
    PresidentCount {
        /// Number of members holding the president role.
        count: usize,
    },

    /// Fewer than the required number of external rapporteurs.
    #[error("min {min} external rapporteurs, found {found}", min = MIN_EXTERNAL_RAPPORTEURS)]
    ExternalRapporteurShortfall {
        /// Number of external rapporteurs in the proposal.
        found: usize,
    },

    /// Fewer than half the members are external to the institution.
    #[error("external ratio {external}/{total} < required {required}/{total}")]
    ExternalRatioShortfall {
        /// Number of external members.
        external: usize,
        /// Required number of external members (half the jury, rounded up).
        required: usize,
        /// Total number of members.
        total: usize,
    },

    /// The jury does not have exactly one thesis director.
    #[error("exactly 1 director required, found {count}")]
    DirectorCount {
        /// Number of members holding the director role.
        count: usize,
    },
}

/// The result of validating a proposed jury composition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JuryAssessment {
    /// Whether every composition rule is satisfied.
    pub valid: bool,
    /// All rule violations, in rule order. Empty iff `valid`.
    pub violations: Vec<JuryViolation>,
}

/// Validate a proposed jury composition against the canonical rule set.
///
/// All rules are evaluated independently; the returned assessment carries
/// every violation, not just the first.
pub fn validate(members: &[JuryMember]) -> JuryAssessment {
    let mut violations = Vec::new();

    let size = members.len();
    if !(MIN_JURY_SIZE..=MAX_JURY_SIZE).contains(&size) {
        violations.push(JuryViolation::SizeOutOfRange { size });
    }

    let presidents = members
        .iter()
        .filter(|m| m.role == JuryRole::President)
        .count();
    if presidents != 1 {
        violations.push(JuryViolation::PresidentCount { count: presidents });
    }

    let external_rapporteurs = members
        .iter()
        .filter(|m| m.role == JuryRole::Rapporteur && m.external)
        .count();
    if external_rapporteurs < MIN_EXTERNAL_RAPPORTEURS {
        violations.push(JuryViolation::ExternalRapporteurShortfall {
            found: external_rapporteurs,
        });
    }

    let external = members.iter().filter(|m| m.external).count();
    let required = size.div_ceil(2);
    if external < required {
        violations.push(JuryViolation::ExternalRatioShortfall {
            external,
            required,
            total: size,
        });
    }

    let directors = members
        .iter()
        .filter(|m| m.role == JuryRole::Director)
        .count();
    if directors != 1 {
        violations.push(JuryViolation::DirectorCount { count: directors });
    }

    if !violations.is_empty() {
        tracing::debug!(
            size,
            violation_count = violations.len(),
            "jury composition rejected"
        );
    }

    JuryAssessment {
        valid: violations.is_empty(),
        violations,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member(role: JuryRole, external: bool) -> JuryMember {
        JuryMember {
            person_id: PersonId::new(),
            name: "Someone".to_string(),
            affiliation: if external {
                "Université de Lille".to_string()
            } else {
                "Home University".to_string()
            },
            rank: AcademicRank::Professor,
            role,
            external,
        }
    }

    /// The minimal valid jury: 4 members, 2 external rapporteurs, president
    /// and director internal — exactly 2 externals out of 4.
    fn minimal_valid_jury() -> Vec<JuryMember> {
        vec![
            member(JuryRole::President, false),
            member(JuryRole::Rapporteur, true),
            member(JuryRole::Rapporteur, true),
            member(JuryRole::Director, false),
        ]
    }

    #[test]
    fn minimal_valid_jury_passes() {
        let assessment = validate(&minimal_valid_jury());
        assert!(assessment.valid, "violations: {:?}", assessment.violations);
        assert!(assessment.violations.is_empty());
    }

    #[test]
    fn three_members_always_invalid() {
        // Even with a favorable role mix, 3 members violates the size bound.
        let jury = vec![
            member(JuryRole::President, true),
            member(JuryRole::Rapporteur, true),
            member(JuryRole::Director, true),
        ];
        let assessment = validate(&jury);
        assert!(!assessment.valid);
        assert!(assessment
            .violations
            .iter()
            .any(|v| matches!(v, JuryViolation::SizeOutOfRange { size: 3 })));
    }

    #[test]
    fn nine_members_invalid() {
        let mut jury = minimal_valid_jury();
        for _ in 0..5 {
            jury.push(member(JuryRole::Examiner, true));
        }
        assert_eq!(jury.len(), 9);
        let assessment = validate(&jury);
        assert!(assessment
            .violations
            .iter()
            .any(|v| matches!(v, JuryViolation::SizeOutOfRange { size: 9 })));
    }

    #[test]
    fn eight_members_valid() {
        let mut jury = minimal_valid_jury();
        for _ in 0..4 {
            jury.push(member(JuryRole::Examiner, true));
        }
        assert_eq!(jury.len(), 8);
        assert!(validate(&jury).valid);
    }

    #[test]
    fn single_external_rapporteur_reports_both_shortfalls() {
        // 4 members, 1 president, 1 external rapporteur, 1 examiner,
        // 1 director; 1 external total.
        let jury = vec![
            member(JuryRole::President, false),
            member(JuryRole::Rapporteur, true),
            member(JuryRole::Examiner, false),
            member(JuryRole::Director, false),
        ];
        let assessment = validate(&jury);
        assert!(!assessment.valid);
        assert_eq!(
            assessment.violations,
            vec![
                JuryViolation::ExternalRapporteurShortfall { found: 1 },
                JuryViolation::ExternalRatioShortfall {
                    external: 1,
                    required: 2,
                    total: 4
                },
            ]
        );
        let rendered: Vec<String> = assessment
            .violations
            .iter()
            .map(|v| v.to_string())
            .collect();
        assert!(rendered[0].starts_with("min 2 external rapporteurs"));
        assert_eq!(rendered[1], "external ratio 1/4 < required 2/4");
    }

    #[test]
    fn internal_rapporteurs_do_not_count() {
        let jury = vec![
            member(JuryRole::President, false),
            member(JuryRole::Rapporteur, false),
            member(JuryRole::Rapporteur, true),
            member(JuryRole::Director, false),
        ];
        let assessment = validate(&jury);
        assert!(assessment
            .violations
            .iter()
            .any(|v| matches!(v, JuryViolation::ExternalRapporteurShortfall { found: 1 })));
    }

    #[test]
    fn missing_president_reported() {
        let jury = vec![
            member(JuryRole::Examiner, false),
            member(JuryRole::Rapporteur, true),
            member(JuryRole::Rapporteur, true),
            member(JuryRole::Director, false),
        ];
        let assessment = validate(&jury);
        assert!(assessment
            .violations
            .iter()
            .any(|v| matches!(v, JuryViolation::PresidentCount { count: 0 })));
    }

    #[test]
    fn two_presidents_reported() {
        let jury = vec![
            member(JuryRole::President, false),
            member(JuryRole::President, true),
            member(JuryRole::Rapporteur, true),
            member(JuryRole::Rapporteur, true),
            member(JuryRole::Director, false),
        ];
        let assessment = validate(&jury);
        assert!(assessment
            .violations
            .iter()
            .any(|v| matches!(v, JuryViolation::PresidentCount { count: 2 })));
    }

    #[test]
    fn director_count_enforced() {
        let mut jury = minimal_valid_jury();
        jury.retain(|m| m.role != JuryRole::Director);
        jury.push(member(JuryRole::Examiner, true));
        let assessment = validate(&jury);
        assert!(assessment
            .violations
            .iter()
            .any(|v| matches!(v, JuryViolation::DirectorCount { count: 0 })));
    }

    #[test]
    fn external_ratio_rounds_up_for_odd_sizes() {
        // 5 members require ceil(5/2) = 3 externals.
        let jury = vec![
            member(JuryRole::President, false),
            member(JuryRole::Rapporteur, true),
            member(JuryRole::Rapporteur, true),
            member(JuryRole::Examiner, false),
            member(JuryRole::Director, false),
        ];
        let assessment = validate(&jury);
        assert_eq!(
            assessment.violations,
            vec![JuryViolation::ExternalRatioShortfall {
                external: 2,
                required: 3,
                total: 5
            }]
        );
    }

    #[test]
    fn empty_jury_reports_every_structural_rule() {
        let assessment = validate(&[]);
        assert!(!assessment.valid);
        // Size, president, rapporteurs, director; the ratio rule is
        // vacuously satisfied at 0/0.
        assert_eq!(assessment.violations.len(), 4);
    }

    #[test]
    fn all_violations_reported_together() {
        // A jury violating everything at once: 2 members, no president,
        // no rapporteur, no director, no external.
        let jury = vec![
            member(JuryRole::Examiner, false),
            member(JuryRole::Examiner, false),
        ];
        let assessment = validate(&jury);
        assert_eq!(assessment.violations.len(), 5);
    }

    #[test]
    fn violations_serialize_for_transport() {
        let assessment = validate(&[]);
        let json = serde_json::to_string(&assessment).unwrap();
        let back: JuryAssessment = serde_json::from_str(&json).unwrap();
        assert_eq!(back, assessment);
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        fn arb_role() -> impl Strategy<Value = JuryRole> {
            prop_oneof![
                Just(JuryRole::President),
                Just(JuryRole::Rapporteur),
                Just(JuryRole::Examiner),
                Just(JuryRole::Director),
                Just(JuryRole::CoDirector),
            ]
        }

        fn arb_jury() -> impl Strategy<Value = Vec<JuryMember>> {
            proptest::collection::vec((arb_role(), proptest::bool::ANY), 0..12).prop_map(|seats| {
                seats
                    .into_iter()
                    .map(|(role, external)| member(role, external))
                    .collect()
            })
        }

        proptest! {
            #[test]
            fn valid_juries_have_unique_president_and_director(jury in arb_jury()) {
                let assessment = validate(&jury);
                if assessment.valid {
                    let presidents = jury.iter().filter(|m| m.role == JuryRole::President).count();
                    let directors = jury.iter().filter(|m| m.role == JuryRole::Director).count();
                    prop_assert_eq!(presidents, 1);
                    prop_assert_eq!(directors, 1);
                    prop_assert!((MIN_JURY_SIZE..=MAX_JURY_SIZE).contains(&jury.len()));
                }
            }

            #[test]
            fn valid_is_exactly_no_violations(jury in arb_jury()) {
                let assessment = validate(&jury);
                prop_assert_eq!(assessment.valid, assessment.violations.is_empty());
            }
        }
    }
}
