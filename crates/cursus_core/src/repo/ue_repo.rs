//! Course unit repository.
//!
//! # Responsibility
//! - Persist units under `UeListe` with program references as `ParcoursIds`.
//! - Resolve program references through `ParcoursRepository` on every read.
//!
//! # Invariants
//! - `NumeroUe` is unique, case-insensitive, excluding the updated record.
//! - Program ids with no matching program are hidden on read but kept in
//!   storage.

use super::parcours_repo::ParcoursRepository;
use super::records::{load_records, save_records};
use super::{EntityRepository, RepoError, RepoResult};
use crate::model::id::{next_entity_id, now_epoch_ms, EntityId};
use crate::model::ue::{Ue, UeRecord};
use crate::model::{fold_key, EntityKind};
use crate::storage::KeyValueStore;
use log::debug;

const KIND: EntityKind = EntityKind::Ue;

/// Repository persisting course units.
pub struct UeRepository<'s, S: KeyValueStore> {
    store: &'s S,
    parcours: ParcoursRepository<'s, S>,
}

impl<'s, S: KeyValueStore> UeRepository<'s, S> {
    pub fn new(store: &'s S) -> Self {
        Self {
            store,
            parcours: ParcoursRepository::new(store),
        }
    }

    /// Lists units taught in program `parcours_id`.
    pub fn find_by_parcours(&self, parcours_id: EntityId) -> RepoResult<Vec<Ue>> {
        Ok(self
            .list()?
            .into_iter()
            .filter(|ue| ue.belongs_to(parcours_id))
            .collect())
    }

    /// Finds a unit by number, ignoring case.
    pub fn find_by_numero(&self, numero_ue: &str) -> RepoResult<Option<Ue>> {
        Ok(self
            .list()?
            .into_iter()
            .find(|ue| ue.has_numero(numero_ue)))
    }

    fn load_records(&self) -> Vec<UeRecord> {
        load_records(self.store, KIND).unwrap_or_default()
    }

    fn hydrate(&self, record: &UeRecord) -> RepoResult<Ue> {
        let all_parcours = self.parcours.list()?;
        Ok(record.hydrate(&all_parcours))
    }

    fn save(&self, records: &[UeRecord]) -> RepoResult<()> {
        save_records(self.store, KIND, records)
    }
}

impl<S: KeyValueStore> EntityRepository for UeRepository<'_, S> {
    type Entity = Ue;

    fn list(&self) -> RepoResult<Vec<Ue>> {
        let records = self.load_records();
        let all_parcours = self.parcours.list()?;
        Ok(records
            .iter()
            .map(|record| record.hydrate(&all_parcours))
            .collect())
    }

    fn get(&self, id: EntityId) -> RepoResult<Ue> {
        let record = self
            .load_records()
            .into_iter()
            .find(|record| record.id == id)
            .ok_or(RepoError::NotFound { entity: KIND, id })?;
        self.hydrate(&record)
    }

    fn create(&self, data: &Ue) -> RepoResult<Ue> {
        data.validate()?;
        let mut records = self.load_records();
        ensure_unique_numero(&records, &data.numero_ue, None)?;

        let id = next_entity_id(now_epoch_ms(), records.iter().map(|r| r.id));
        let record = UeRecord {
            id,
            ..data.dehydrate()
        };
        records.push(record.clone());
        self.save(&records)?;

        debug!("event=ue_create module=repo status=ok id={id}");
        self.hydrate(&record)
    }

    fn update(&self, id: EntityId, data: &Ue) -> RepoResult<Ue> {
        data.validate()?;
        let mut records = self.load_records();
        let index = records
            .iter()
            .position(|record| record.id == id)
            .ok_or(RepoError::NotFound { entity: KIND, id })?;
        ensure_unique_numero(&records, &data.numero_ue, Some(id))?;

        let record = UeRecord {
            id,
            ..data.dehydrate()
        };
        records[index] = record.clone();
        self.save(&records)?;

        debug!("event=ue_update module=repo status=ok id={id}");
        self.hydrate(&record)
    }

    fn delete(&self, id: EntityId) -> RepoResult<()> {
        let mut records = self.load_records();
        let before = records.len();
        records.retain(|record| record.id != id);
        if records.len() == before {
            debug!("event=ue_delete module=repo status=noop id={id}");
            return Ok(());
        }

        self.save(&records)?;
        debug!("event=ue_delete module=repo status=ok id={id}");
        Ok(())
    }
}

fn ensure_unique_numero(
    records: &[UeRecord],
    numero_ue: &str,
    exclude_id: Option<EntityId>,
) -> RepoResult<()> {
    let wanted = fold_key(numero_ue);
    let duplicate = records
        .iter()
        .filter(|record| Some(record.id) != exclude_id)
        .find(|record| fold_key(&record.numero_ue) == wanted);

    match duplicate {
        Some(existing) => Err(RepoError::Conflict(format!(
            "course unit number `{}` is already used by `{}` (id {})",
            existing.numero_ue, existing.intitule, existing.id
        ))),
        None => Ok(()),
    }
}
