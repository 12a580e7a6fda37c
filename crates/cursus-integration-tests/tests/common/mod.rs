//! Shared test host: stub ports around the in-memory store, with interior
//! mutability so a test can move the clock or degrade a candidate's
//! profile between commands.

#![allow(dead_code)]

use std::sync::Mutex;

use chrono::{DateTime, TimeZone, Utc};

use cursus_compliance::jury::{AcademicRank, JuryMember, JuryRole};
use cursus_core::{CampaignId, DocumentKind, DocumentRef, PersonId};
use cursus_engine::{
    AcademicProfile, DocumentStore, EnrollmentHistory, EnrollmentPeriod, FixedClock, MemoryStore,
    WorkflowEngine,
};

/// A justification long enough for a dérogation.
pub const LONG_REASON: &str =
    "Retard expérimental lié à la reconstruction du banc d'essai après le déménagement du laboratoire.";

pub fn utc(y: i32, m: u32, d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, 10, 0, 0).unwrap()
}

/// The reference instant most tests freeze their clock at.
pub fn test_now() -> DateTime<Utc> {
    utc(2026, 9, 1)
}

pub struct StubHistory(Mutex<Vec<EnrollmentPeriod>>);

impl StubHistory {
    pub fn set(&self, periods: Vec<EnrollmentPeriod>) {
        *self.0.lock().unwrap() = periods;
    }
}

impl EnrollmentHistory for StubHistory {
    fn prior_enrollments(&self, _candidate: &PersonId) -> Vec<EnrollmentPeriod> {
        self.0.lock().unwrap().clone()
    }
}

pub struct StubDocuments(Mutex<Vec<DocumentRef>>);

impl StubDocuments {
    pub fn set(&self, documents: Vec<DocumentRef>) {
        *self.0.lock().unwrap() = documents;
    }

    pub fn remove(&self, kind: DocumentKind) {
        self.0.lock().unwrap().retain(|d| d.kind != kind);
    }
}

impl DocumentStore for StubDocuments {
    fn documents(&self, _owner: &PersonId) -> Vec<DocumentRef> {
        self.0.lock().unwrap().clone()
    }
}

pub struct StubProfile {
    publications: Mutex<u32>,
    hours: Mutex<u32>,
}

impl StubProfile {
    pub fn set_publications(&self, count: u32) {
        *self.publications.lock().unwrap() = count;
    }

    pub fn set_hours(&self, hours: u32) {
        *self.hours.lock().unwrap() = hours;
    }
}

impl AcademicProfile for StubProfile {
    fn publication_count(&self, _candidate: &PersonId) -> u32 {
        *self.publications.lock().unwrap()
    }
    fn training_hours(&self, _candidate: &PersonId) -> u32 {
        *self.hours.lock().unwrap()
    }
}

/// The full test host: every port plus the store, each reachable for
/// mid-test mutation. `engine()` borrows them all.
pub struct Host {
    pub store: MemoryStore,
    pub history: StubHistory,
    pub documents: StubDocuments,
    pub profile: StubProfile,
    pub clock: FixedClock,
}

pub type TestEngine<'a> = WorkflowEngine<
    &'a MemoryStore,
    &'a StubHistory,
    &'a StubDocuments,
    &'a StubProfile,
    &'a FixedClock,
>;

impl Host {
    /// An eligible candidate: no prior enrollments, every document present,
    /// 2 publications, 120 training hours, clock at [`test_now`].
    pub fn new() -> Self {
        Self {
            store: MemoryStore::new(),
            history: StubHistory(Mutex::new(Vec::new())),
            documents: StubDocuments(Mutex::new(complete_documents())),
            profile: StubProfile {
                publications: Mutex::new(2),
                hours: Mutex::new(120),
            },
            clock: FixedClock::at(test_now()),
        }
    }

    /// A host whose candidate enrolled exactly `months` whole months before
    /// [`test_now`].
    pub fn with_enrollment_months_ago(months: i32) -> Self {
        let host = Self::new();
        let mut year = 2026;
        let mut month = 9i32 - months;
        while month <= 0 {
            month += 12;
            year -= 1;
        }
        host.history.set(vec![EnrollmentPeriod {
            campaign_id: CampaignId::new(format!("{}-{}", year, year + 1)).unwrap(),
            started_at: utc(year, month as u32, 1),
        }]);
        host
    }

    pub fn engine(&self) -> TestEngine<'_> {
        WorkflowEngine::new(
            &self.store,
            &self.history,
            &self.documents,
            &self.profile,
            &self.clock,
        )
    }
}

pub fn complete_documents() -> Vec<DocumentRef> {
    DocumentKind::required_for_defense()
        .iter()
        .map(|k| DocumentRef::present(*k))
        .collect()
}

pub fn campaign() -> CampaignId {
    CampaignId::new("2026-2027").unwrap()
}

pub fn member(role: JuryRole, external: bool) -> JuryMember {
    member_for(role, external, PersonId::new())
}

pub fn member_for(role: JuryRole, external: bool, person_id: PersonId) -> JuryMember {
    JuryMember {
        person_id,
        name: "Someone".to_string(),
        affiliation: if external {
            "Université de Lille".to_string()
        } else {
            "Université de Montpellier".to_string()
        },
        rank: AcademicRank::Professor,
        role,
        external,
    }
}

/// The minimal valid jury for a soutenance directed by `director`.
pub fn valid_jury(director: PersonId) -> Vec<JuryMember> {
    vec![
        member(JuryRole::President, false),
        member(JuryRole::Rapporteur, true),
        member(JuryRole::Rapporteur, true),
        member_for(JuryRole::Director, false, director),
    ]
}
