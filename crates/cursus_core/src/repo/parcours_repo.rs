//! Study program repository.
//!
//! # Invariants
//! - An unwritten store lists exactly one default program (`ID` 1); it is
//!   persisted together with the first write.
//! - No uniqueness rule beyond the identifier.

use super::records::{load_records, save_records};
use super::{EntityRepository, RepoError, RepoResult};
use crate::model::id::{next_entity_id, now_epoch_ms, EntityId};
use crate::model::parcours::Parcours;
use crate::model::EntityKind;
use crate::storage::KeyValueStore;
use log::debug;

const KIND: EntityKind = EntityKind::Parcours;

/// Repository persisting programs under `parcoursList`.
pub struct ParcoursRepository<'s, S: KeyValueStore> {
    store: &'s S,
}

impl<'s, S: KeyValueStore> ParcoursRepository<'s, S> {
    pub fn new(store: &'s S) -> Self {
        Self { store }
    }

    fn load(&self) -> Vec<Parcours> {
        load_records(self.store, KIND).unwrap_or_else(|| vec![Parcours::default_seed()])
    }

    fn save(&self, parcours_list: &[Parcours]) -> RepoResult<()> {
        save_records(self.store, KIND, parcours_list)
    }
}

impl<S: KeyValueStore> EntityRepository for ParcoursRepository<'_, S> {
    type Entity = Parcours;

    fn list(&self) -> RepoResult<Vec<Parcours>> {
        Ok(self.load())
    }

    fn get(&self, id: EntityId) -> RepoResult<Parcours> {
        self.load()
            .into_iter()
            .find(|parcours| parcours.id == id)
            .ok_or(RepoError::NotFound { entity: KIND, id })
    }

    fn create(&self, data: &Parcours) -> RepoResult<Parcours> {
        let mut parcours_list = self.load();
        let id = next_entity_id(now_epoch_ms(), parcours_list.iter().map(|p| p.id));
        let created = Parcours {
            id,
            ..data.clone()
        };

        parcours_list.push(created.clone());
        self.save(&parcours_list)?;
        debug!("event=parcours_create module=repo status=ok id={id}");
        Ok(created)
    }

    fn update(&self, id: EntityId, data: &Parcours) -> RepoResult<Parcours> {
        let mut parcours_list = self.load();
        let slot = parcours_list
            .iter_mut()
            .find(|parcours| parcours.id == id)
            .ok_or(RepoError::NotFound { entity: KIND, id })?;
        *slot = Parcours {
            id,
            ..data.clone()
        };
        let updated = slot.clone();

        self.save(&parcours_list)?;
        debug!("event=parcours_update module=repo status=ok id={id}");
        Ok(updated)
    }

    fn delete(&self, id: EntityId) -> RepoResult<()> {
        let mut parcours_list = self.load();
        let before = parcours_list.len();
        parcours_list.retain(|parcours| parcours.id != id);
        if parcours_list.len() == before {
            debug!("event=parcours_delete module=repo status=noop id={id}");
            return Ok(());
        }

        self.save(&parcours_list)?;
        debug!("event=parcours_delete module=repo status=ok id={id}");
        Ok(())
    }
}
