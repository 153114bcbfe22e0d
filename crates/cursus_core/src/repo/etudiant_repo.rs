//! Student repository.
//!
//! # Responsibility
//! - Persist students under `EtudiantList` with the program as `ParcoursId`.
//! - Resolve the program reference through `ParcoursRepository` on read.
//!
//! # Invariants
//! - The `(Nom, Prenom, Email)` triple is unique, case-insensitive,
//!   excluding the updated record.

use super::parcours_repo::ParcoursRepository;
use super::records::{load_records, save_records};
use super::{EntityRepository, RepoError, RepoResult};
use crate::model::etudiant::{Etudiant, EtudiantRecord};
use crate::model::id::{next_entity_id, now_epoch_ms, EntityId};
use crate::model::EntityKind;
use crate::storage::KeyValueStore;
use log::debug;

const KIND: EntityKind = EntityKind::Etudiant;

/// Repository persisting students.
pub struct EtudiantRepository<'s, S: KeyValueStore> {
    store: &'s S,
    parcours: ParcoursRepository<'s, S>,
}

impl<'s, S: KeyValueStore> EtudiantRepository<'s, S> {
    pub fn new(store: &'s S) -> Self {
        Self {
            store,
            parcours: ParcoursRepository::new(store),
        }
    }

    /// Lists students enrolled in program `parcours_id`.
    pub fn find_by_parcours(&self, parcours_id: EntityId) -> RepoResult<Vec<Etudiant>> {
        Ok(self
            .list()?
            .into_iter()
            .filter(|etudiant| etudiant.enrolled_in(parcours_id))
            .collect())
    }

    fn load_records(&self) -> Vec<EtudiantRecord> {
        load_records(self.store, KIND).unwrap_or_default()
    }

    fn hydrate(&self, record: &EtudiantRecord) -> RepoResult<Etudiant> {
        let all_parcours = self.parcours.list()?;
        Ok(record.hydrate(&all_parcours))
    }

    fn save(&self, records: &[EtudiantRecord]) -> RepoResult<()> {
        save_records(self.store, KIND, records)
    }

    fn ensure_unique_identity(
        &self,
        records: &[EtudiantRecord],
        candidate: &Etudiant,
        exclude_id: Option<EntityId>,
    ) -> RepoResult<()> {
        let duplicate = records
            .iter()
            .filter(|record| Some(record.id) != exclude_id)
            .map(|record| record.hydrate(&[]))
            .find(|existing| existing.same_identity(candidate));

        match duplicate {
            Some(existing) => Err(RepoError::Conflict(format!(
                "student already exists: {} (id {})",
                existing.display_name(),
                existing.id
            ))),
            None => Ok(()),
        }
    }
}

impl<S: KeyValueStore> EntityRepository for EtudiantRepository<'_, S> {
    type Entity = Etudiant;

    fn list(&self) -> RepoResult<Vec<Etudiant>> {
        let records = self.load_records();
        let all_parcours = self.parcours.list()?;
        Ok(records
            .iter()
            .map(|record| record.hydrate(&all_parcours))
            .collect())
    }

    fn get(&self, id: EntityId) -> RepoResult<Etudiant> {
        let record = self
            .load_records()
            .into_iter()
            .find(|record| record.id == id)
            .ok_or(RepoError::NotFound { entity: KIND, id })?;
        self.hydrate(&record)
    }

    fn create(&self, data: &Etudiant) -> RepoResult<Etudiant> {
        let mut records = self.load_records();
        self.ensure_unique_identity(&records, data, None)?;

        let id = next_entity_id(now_epoch_ms(), records.iter().map(|r| r.id));
        let record = EtudiantRecord {
            id,
            ..data.dehydrate()
        };
        records.push(record.clone());
        self.save(&records)?;

        debug!("event=etudiant_create module=repo status=ok id={id}");
        self.hydrate(&record)
    }

    fn update(&self, id: EntityId, data: &Etudiant) -> RepoResult<Etudiant> {
        let mut records = self.load_records();
        let index = records
            .iter()
            .position(|record| record.id == id)
            .ok_or(RepoError::NotFound { entity: KIND, id })?;
        self.ensure_unique_identity(&records, data, Some(id))?;

        let record = EtudiantRecord {
            id,
            ..data.dehydrate()
        };
        records[index] = record.clone();
        self.save(&records)?;

        debug!("event=etudiant_update module=repo status=ok id={id}");
        self.hydrate(&record)
    }

    fn delete(&self, id: EntityId) -> RepoResult<()> {
        let mut records = self.load_records();
        let before = records.len();
        records.retain(|record| record.id != id);
        if records.len() == before {
            debug!("event=etudiant_delete module=repo status=noop id={id}");
            return Ok(());
        }

        self.save(&records)?;
        debug!("event=etudiant_delete module=repo status=ok id={id}");
        Ok(())
    }
}
