//! End-to-end enrollment flows through the engine: the two-approval happy
//! path, comment requirements on refusals, terminal immutability, and the
//! one-active-inscription rule across a candidate's campaigns.

mod common;

use common::{campaign, Host};

use cursus_core::{CampaignId, PersonId};
use cursus_engine::{EngineError, WorkflowStore};
use cursus_state::{InscriptionError, InscriptionStatus};

#[test]
fn two_approval_happy_path() {
    let host = Host::new();
    let engine = host.engine();

    let (inscription, _) = engine
        .create_inscription(PersonId::new(), PersonId::new(), campaign())
        .unwrap();
    assert_eq!(inscription.status, InscriptionStatus::Draft);

    let submission = engine.submit_inscription(&inscription.id, None).unwrap();
    assert_eq!(
        submission.inscription.status,
        InscriptionStatus::PendingDirector
    );
    assert!(submission.derogation.is_none());

    let (inscription, _) = engine
        .validate_inscription_by_director(&inscription.id, true, "Dossier complet")
        .unwrap();
    assert_eq!(inscription.status, InscriptionStatus::PendingAdmin);

    let (inscription, _) = engine
        .validate_inscription_by_admin(&inscription.id, true, "")
        .unwrap();
    assert_eq!(inscription.status, InscriptionStatus::Validated);
    assert!(inscription.status.is_terminal());

    // The audit trail shows every step: submit + auto-advance, director
    // approval + auto-advance, administrative validation.
    assert_eq!(inscription.transition_log.len(), 5);
    let names: Vec<&str> = inscription
        .transition_log
        .iter()
        .map(|r| r.to.as_str())
        .collect();
    assert_eq!(
        names,
        vec![
            "SUBMITTED",
            "PENDING_DIRECTOR",
            "DIRECTOR_APPROVED",
            "PENDING_ADMIN",
            "VALIDATED"
        ]
    );
}

#[test]
fn director_refusal_needs_comment_then_terminates() {
    let host = Host::new();
    let engine = host.engine();

    let (inscription, _) = engine
        .create_inscription(PersonId::new(), PersonId::new(), campaign())
        .unwrap();
    engine.submit_inscription(&inscription.id, None).unwrap();

    // Empty comment is rejected without touching the record.
    let err = engine
        .validate_inscription_by_director(&inscription.id, false, "")
        .unwrap_err();
    assert!(matches!(
        err,
        EngineError::Inscription(InscriptionError::MissingComment { .. })
    ));
    let (stored, _) = host.store.load_inscription(&inscription.id).unwrap();
    assert_eq!(stored.status, InscriptionStatus::PendingDirector);

    // With a comment the refusal lands and is terminal.
    let (inscription, _) = engine
        .validate_inscription_by_director(
            &inscription.id,
            false,
            "Sujet hors périmètre du laboratoire",
        )
        .unwrap();
    assert_eq!(inscription.status, InscriptionStatus::DirectorRejected);
    let last = inscription.transition_log.last().unwrap();
    assert_eq!(
        last.comment.as_deref(),
        Some("Sujet hors périmètre du laboratoire")
    );

    // Any further transition attempt fails.
    let err = engine
        .validate_inscription_by_admin(&inscription.id, true, "")
        .unwrap_err();
    assert!(matches!(
        err,
        EngineError::Inscription(InscriptionError::InvalidTransition { .. })
    ));
    let err = engine.submit_inscription(&inscription.id, None).unwrap_err();
    assert!(matches!(
        err,
        EngineError::Inscription(InscriptionError::InvalidTransition { .. })
    ));
}

#[test]
fn admin_refusal_needs_comment() {
    let host = Host::new();
    let engine = host.engine();

    let (inscription, _) = engine
        .create_inscription(PersonId::new(), PersonId::new(), campaign())
        .unwrap();
    engine.submit_inscription(&inscription.id, None).unwrap();
    engine
        .validate_inscription_by_director(&inscription.id, true, "")
        .unwrap();

    let err = engine
        .validate_inscription_by_admin(&inscription.id, false, "   ")
        .unwrap_err();
    assert!(matches!(
        err,
        EngineError::Inscription(InscriptionError::MissingComment { .. })
    ));

    let (inscription, _) = engine
        .validate_inscription_by_admin(&inscription.id, false, "Pièces administratives manquantes")
        .unwrap();
    assert_eq!(inscription.status, InscriptionStatus::Rejected);
}

#[test]
fn admin_cannot_decide_before_director() {
    let host = Host::new();
    let engine = host.engine();

    let (inscription, _) = engine
        .create_inscription(PersonId::new(), PersonId::new(), campaign())
        .unwrap();
    engine.submit_inscription(&inscription.id, None).unwrap();

    let err = engine
        .validate_inscription_by_admin(&inscription.id, true, "")
        .unwrap_err();
    assert!(matches!(
        err,
        EngineError::Inscription(InscriptionError::InvalidTransition { .. })
    ));
}

#[test]
fn one_active_inscription_per_candidate_per_campaign() {
    let host = Host::new();
    let engine = host.engine();
    let candidate = PersonId::new();

    let (first, _) = engine
        .create_inscription(candidate, PersonId::new(), campaign())
        .unwrap();

    // A second one in the same campaign is blocked while the first is
    // active.
    let err = engine
        .create_inscription(candidate, PersonId::new(), campaign())
        .unwrap_err();
    assert!(matches!(err, EngineError::DuplicateActiveInscription { .. }));

    // A different campaign is a different slot.
    engine
        .create_inscription(candidate, PersonId::new(), CampaignId::new("2027-2028").unwrap())
        .unwrap();

    // Once the first is refused, the campaign slot frees up.
    engine.submit_inscription(&first.id, None).unwrap();
    engine
        .validate_inscription_by_director(&first.id, false, "Encadrement indisponible")
        .unwrap();
    engine
        .create_inscription(candidate, PersonId::new(), campaign())
        .unwrap();
}

#[test]
fn other_candidates_are_unaffected() {
    let host = Host::new();
    let engine = host.engine();

    engine
        .create_inscription(PersonId::new(), PersonId::new(), campaign())
        .unwrap();
    engine
        .create_inscription(PersonId::new(), PersonId::new(), campaign())
        .unwrap();
}
