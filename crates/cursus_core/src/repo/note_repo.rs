//! Grade repository.
//!
//! # Responsibility
//! - Persist grades under `NoteList` as `(EtudiantId, UEId)` references.
//! - Resolve both references through the student and unit repositories.
//! - Seed one grade per student on first access of an unwritten store.
//!
//! # Invariants
//! - At most one grade per `(Etudiant, UE)` pair.
//! - Stored grades whose student or unit is gone are left out of every read
//!   (logged as `orphans_dropped`) but stay in storage.
//! - Written grades must reference an existing student and unit.

use super::etudiant_repo::EtudiantRepository;
use super::records::{is_unwritten, load_records, save_records};
use super::ue_repo::UeRepository;
use super::{EntityRepository, RepoError, RepoResult};
use crate::model::etudiant::Etudiant;
use crate::model::id::{next_entity_id, now_epoch_ms, EntityId};
use crate::model::note::{Note, NoteRecord};
use crate::model::ue::Ue;
use crate::model::EntityKind;
use crate::storage::KeyValueStore;
use log::{debug, info, warn};
use std::cell::Cell;

const KIND: EntityKind = EntityKind::Note;

/// Sample grades for seeded notes, by student position. `None` = ungraded.
const SEED_GRADES: [Option<f64>; 5] = [Some(11.0), None, Some(15.0), None, Some(12.0)];

/// Repository persisting grades.
pub struct NoteRepository<'s, S: KeyValueStore> {
    store: &'s S,
    etudiants: EtudiantRepository<'s, S>,
    ues: UeRepository<'s, S>,
    initialized: Cell<bool>,
}

impl<'s, S: KeyValueStore> NoteRepository<'s, S> {
    pub fn new(store: &'s S) -> Self {
        Self {
            store,
            etudiants: EtudiantRepository::new(store),
            ues: UeRepository::new(store),
            initialized: Cell::new(false),
        }
    }

    /// Lists grades recorded for unit `ue_id`.
    pub fn find_by_ue(&self, ue_id: EntityId) -> RepoResult<Vec<Note>> {
        Ok(self
            .list()?
            .into_iter()
            .filter(|note| note.ue.id == ue_id)
            .collect())
    }

    /// Lists grades recorded for student `etudiant_id`.
    pub fn find_by_etudiant(&self, etudiant_id: EntityId) -> RepoResult<Vec<Note>> {
        Ok(self
            .list()?
            .into_iter()
            .filter(|note| note.etudiant.id == etudiant_id)
            .collect())
    }

    /// Returns the grade linking the student and unit, if any.
    pub fn find_by_etudiant_ue(
        &self,
        etudiant_id: EntityId,
        ue_id: EntityId,
    ) -> RepoResult<Option<Note>> {
        Ok(self
            .list()?
            .into_iter()
            .find(|note| note.links(etudiant_id, ue_id)))
    }

    /// Seeds default grades once per repository instance.
    ///
    /// Seeding happens only when `NoteList` was never written and both
    /// students and units exist: one grade per student against the first
    /// unit. The check runs once even if nothing was seeded.
    fn ensure_initialized(&self) -> RepoResult<()> {
        if self.initialized.get() {
            return Ok(());
        }

        if is_unwritten(self.store, KIND) {
            let etudiants = self.etudiants.list()?;
            let ues = self.ues.list()?;
            if let (Some(first_ue), false) = (ues.first(), etudiants.is_empty()) {
                let seeded = seed_records(now_epoch_ms(), &etudiants, first_ue);
                save_records(self.store, KIND, &seeded)?;
                info!(
                    "event=notes_seed module=repo status=ok count={} ue_id={}",
                    seeded.len(),
                    first_ue.id
                );
            }
        }

        self.initialized.set(true);
        Ok(())
    }

    fn load_records(&self) -> RepoResult<Vec<NoteRecord>> {
        self.ensure_initialized()?;
        Ok(load_records(self.store, KIND).unwrap_or_default())
    }

    fn hydrate_all(&self, records: &[NoteRecord]) -> RepoResult<Vec<Note>> {
        let etudiants = self.etudiants.list()?;
        let ues = self.ues.list()?;
        let notes: Vec<Note> = records
            .iter()
            .filter_map(|record| record.hydrate(&etudiants, &ues))
            .collect();

        let dropped = records.len() - notes.len();
        if dropped > 0 {
            warn!(
                "event=notes_load module=repo status=orphans_dropped dropped={dropped} total={}",
                records.len()
            );
        }
        Ok(notes)
    }

    /// Resolves both references of a grade about to be written.
    fn resolve(&self, record: &NoteRecord) -> RepoResult<Note> {
        let etudiants = self.etudiants.list()?;
        let ues = self.ues.list()?;
        if !etudiants.iter().any(|e| e.id == record.etudiant_id) {
            return Err(RepoError::DanglingReference {
                entity: EntityKind::Etudiant,
                id: record.etudiant_id,
            });
        }
        record
            .hydrate(&etudiants, &ues)
            .ok_or(RepoError::DanglingReference {
                entity: EntityKind::Ue,
                id: record.ue_id,
            })
    }

    fn save(&self, records: &[NoteRecord]) -> RepoResult<()> {
        save_records(self.store, KIND, records)
    }
}

impl<S: KeyValueStore> EntityRepository for NoteRepository<'_, S> {
    type Entity = Note;

    fn list(&self) -> RepoResult<Vec<Note>> {
        let records = self.load_records()?;
        self.hydrate_all(&records)
    }

    fn get(&self, id: EntityId) -> RepoResult<Note> {
        self.list()?
            .into_iter()
            .find(|note| note.id == id)
            .ok_or(RepoError::NotFound { entity: KIND, id })
    }

    fn create(&self, data: &Note) -> RepoResult<Note> {
        data.validate()?;
        let mut records = self.load_records()?;
        ensure_unique_pair(&records, data, None)?;

        let id = next_entity_id(now_epoch_ms(), records.iter().map(|r| r.id));
        let record = NoteRecord {
            id,
            ..data.dehydrate()
        };
        let created = self.resolve(&record)?;
        records.push(record);
        self.save(&records)?;

        debug!(
            "event=note_create module=repo status=ok id={id} etudiant_id={} ue_id={}",
            created.etudiant.id, created.ue.id
        );
        Ok(created)
    }

    fn update(&self, id: EntityId, data: &Note) -> RepoResult<Note> {
        data.validate()?;
        let mut records = self.load_records()?;
        let etudiants = self.etudiants.list()?;
        let ues = self.ues.list()?;
        let index = records
            .iter()
            .position(|record| record.id == id && record.hydrate(&etudiants, &ues).is_some())
            .ok_or(RepoError::NotFound { entity: KIND, id })?;
        ensure_unique_pair(&records, data, Some(id))?;

        let record = NoteRecord {
            id,
            ..data.dehydrate()
        };
        let updated = self.resolve(&record)?;
        records[index] = record;
        self.save(&records)?;

        debug!("event=note_update module=repo status=ok id={id}");
        Ok(updated)
    }

    fn delete(&self, id: EntityId) -> RepoResult<()> {
        let mut records = self.load_records()?;
        let before = records.len();
        records.retain(|record| record.id != id);
        if records.len() == before {
            debug!("event=note_delete module=repo status=noop id={id}");
            return Ok(());
        }

        self.save(&records)?;
        debug!("event=note_delete module=repo status=ok id={id}");
        Ok(())
    }
}

fn ensure_unique_pair(
    records: &[NoteRecord],
    candidate: &Note,
    exclude_id: Option<EntityId>,
) -> RepoResult<()> {
    let duplicate = records.iter().find(|record| {
        Some(record.id) != exclude_id
            && record.etudiant_id == candidate.etudiant.id
            && record.ue_id == candidate.ue.id
    });

    match duplicate {
        Some(existing) => Err(RepoError::Conflict(format!(
            "a grade already exists for student {} in course unit {} (id {})",
            existing.etudiant_id, existing.ue_id, existing.id
        ))),
        None => Ok(()),
    }
}

fn seed_records(now_ms: i64, etudiants: &[Etudiant], ue: &Ue) -> Vec<NoteRecord> {
    let mut records: Vec<NoteRecord> = Vec::with_capacity(etudiants.len());
    for (index, etudiant) in etudiants.iter().enumerate() {
        let id = next_entity_id(now_ms, records.iter().map(|r| r.id));
        records.push(NoteRecord {
            id,
            valeur: SEED_GRADES.get(index).copied().flatten(),
            etudiant_id: etudiant.id,
            ue_id: ue.id,
        });
    }
    records
}
