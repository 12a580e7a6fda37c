//! # In-Memory Reference Store
//!
//! A [`WorkflowStore`] over `parking_lot`-guarded maps, with a version
//! counter per record. This is the adapter the test suites run against and
//! the model for host implementations: `store_*` commits only when the
//! expected version still matches, so two actors racing on the same record
//! leave exactly one winner and one [`StorageError::StaleState`].

use std::collections::HashMap;

use parking_lot::Mutex;

use cursus_core::{CampaignId, DerogationId, InscriptionId, PersonId, SoutenanceId};
use cursus_state::{Derogation, Inscription, Soutenance};

use crate::ports::{StorageError, Version, WorkflowStore};

#[derive(Debug, Default)]
struct Tables {
    inscriptions: HashMap<InscriptionId, (Inscription, Version)>,
    derogations: HashMap<DerogationId, (Derogation, Version)>,
    soutenances: HashMap<SoutenanceId, (Soutenance, Version)>,
}

/// An in-memory, thread-safe [`WorkflowStore`].
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

fn commit<K, V>(
    table: &mut HashMap<K, (V, Version)>,
    key: K,
    value: V,
    expected: Version,
    kind: &'static str,
    id: String,
) -> Result<Version, StorageError>
where
    K: std::hash::Hash + Eq,
{
    match table.get_mut(&key) {
        None => Err(StorageError::NotFound { kind, id }),
        Some((_, actual)) if *actual != expected => Err(StorageError::StaleState {
            expected,
            actual: *actual,
        }),
        Some(slot) => {
            let next = expected.next();
            *slot = (value, next);
            Ok(next)
        }
    }
}

impl WorkflowStore for MemoryStore {
    fn load_inscription(&self, id: &InscriptionId) -> Result<(Inscription, Version), StorageError> {
        self.tables
            .lock()
            .inscriptions
            .get(id)
            .cloned()
            .ok_or_else(|| StorageError::NotFound {
                kind: "inscription",
                id: id.to_string(),
            })
    }

    fn insert_inscription(&self, inscription: Inscription) -> Result<Version, StorageError> {
        let version = Version::initial();
        self.tables
            .lock()
            .inscriptions
            .insert(inscription.id, (inscription, version));
        Ok(version)
    }

    fn store_inscription(
        &self,
        inscription: &Inscription,
        expected: Version,
    ) -> Result<Version, StorageError> {
        commit(
            &mut self.tables.lock().inscriptions,
            inscription.id,
            inscription.clone(),
            expected,
            "inscription",
            inscription.id.to_string(),
        )
    }

    fn has_active_inscription(
        &self,
        candidate: &PersonId,
        campaign: &CampaignId,
    ) -> Result<bool, StorageError> {
        Ok(self
            .tables
            .lock()
            .inscriptions
            .values()
            .any(|(inscription, _)| {
                inscription.candidate_id == *candidate
                    && inscription.campaign_id == *campaign
                    && inscription.is_active()
            }))
    }

    fn load_derogation(&self, id: &DerogationId) -> Result<(Derogation, Version), StorageError> {
        self.tables
            .lock()
            .derogations
            .get(id)
            .cloned()
            .ok_or_else(|| StorageError::NotFound {
                kind: "derogation",
                id: id.to_string(),
            })
    }

    fn insert_derogation(&self, derogation: Derogation) -> Result<Version, StorageError> {
        let version = Version::initial();
        self.tables
            .lock()
            .derogations
            .insert(derogation.id, (derogation, version));
        Ok(version)
    }

    fn store_derogation(
        &self,
        derogation: &Derogation,
        expected: Version,
    ) -> Result<Version, StorageError> {
        commit(
            &mut self.tables.lock().derogations,
            derogation.id,
            derogation.clone(),
            expected,
            "derogation",
            derogation.id.to_string(),
        )
    }

    fn load_soutenance(&self, id: &SoutenanceId) -> Result<(Soutenance, Version), StorageError> {
        self.tables
            .lock()
            .soutenances
            .get(id)
            .cloned()
            .ok_or_else(|| StorageError::NotFound {
                kind: "soutenance",
                id: id.to_string(),
            })
    }

    fn insert_soutenance(&self, soutenance: Soutenance) -> Result<Version, StorageError> {
        let version = Version::initial();
        self.tables
            .lock()
            .soutenances
            .insert(soutenance.id, (soutenance, version));
        Ok(version)
    }

    fn store_soutenance(
        &self,
        soutenance: &Soutenance,
        expected: Version,
    ) -> Result<Version, StorageError> {
        commit(
            &mut self.tables.lock().soutenances,
            soutenance.id,
            soutenance.clone(),
            expected,
            "soutenance",
            soutenance.id.to_string(),
        )
    }
}
