//! Academic records use-case service.
//!
//! # Responsibility
//! - Own exactly one repository per entity type over one shared store.
//! - Provide grade-entry use-cases spanning several repositories.
//!
//! # Invariants
//! - Service APIs never bypass repository validation/persistence contracts.
//! - Service layer remains storage-agnostic.

use crate::model::etudiant::Etudiant;
use crate::model::id::EntityId;
use crate::model::note::Note;
use crate::model::ue::Ue;
use crate::repo::etudiant_repo::EtudiantRepository;
use crate::repo::note_repo::NoteRepository;
use crate::repo::parcours_repo::ParcoursRepository;
use crate::repo::ue_repo::UeRepository;
use crate::repo::{EntityRepository, RepoResult};
use crate::storage::KeyValueStore;

/// One student line of a unit's grade sheet.
#[derive(Debug, Clone, PartialEq)]
pub struct GradeSheetRow {
    pub etudiant: Etudiant,
    /// `None` when no grade was ever recorded for this student.
    pub note: Option<Note>,
}

/// Grade-entry table for one course unit.
#[derive(Debug, Clone, PartialEq)]
pub struct GradeSheet {
    pub ue: Ue,
    /// Students enrolled in one of the unit's programs, plus any student
    /// already graded in the unit, in stored student order.
    pub rows: Vec<GradeSheetRow>,
    /// Mean of graded rows; `None` when nobody is graded.
    pub average: Option<f64>,
}

/// Application-wide entry point bundling the four repositories.
///
/// Construct once per session and pass by reference to callers.
pub struct AcademicRecords<'s, S: KeyValueStore> {
    parcours: ParcoursRepository<'s, S>,
    ues: UeRepository<'s, S>,
    etudiants: EtudiantRepository<'s, S>,
    notes: NoteRepository<'s, S>,
}

impl<'s, S: KeyValueStore> AcademicRecords<'s, S> {
    pub fn new(store: &'s S) -> Self {
        Self {
            parcours: ParcoursRepository::new(store),
            ues: UeRepository::new(store),
            etudiants: EtudiantRepository::new(store),
            notes: NoteRepository::new(store),
        }
    }

    pub fn parcours(&self) -> &ParcoursRepository<'s, S> {
        &self.parcours
    }

    pub fn ues(&self) -> &UeRepository<'s, S> {
        &self.ues
    }

    pub fn etudiants(&self) -> &EtudiantRepository<'s, S> {
        &self.etudiants
    }

    pub fn notes(&self) -> &NoteRepository<'s, S> {
        &self.notes
    }

    /// Sets the grade of a student in a unit, creating the note if needed.
    ///
    /// # Errors
    /// - `NotFound` when the student or unit does not exist.
    /// - `Validation` when `valeur` is outside `[0, 20]`.
    pub fn record_grade(
        &self,
        etudiant_id: EntityId,
        ue_id: EntityId,
        valeur: Option<f64>,
    ) -> RepoResult<Note> {
        let etudiant = self.etudiants.get(etudiant_id)?;
        let ue = self.ues.get(ue_id)?;

        match self.notes.find_by_etudiant_ue(etudiant_id, ue_id)? {
            Some(existing) => {
                let id = existing.id;
                self.notes.update(id, &Note { valeur, ..existing })
            }
            None => self.notes.create(&Note::new(etudiant, ue, valeur)),
        }
    }

    /// Builds the grade sheet of unit `ue_id`.
    pub fn grade_sheet(&self, ue_id: EntityId) -> RepoResult<GradeSheet> {
        let ue = self.ues.get(ue_id)?;
        let notes = self.notes.find_by_ue(ue_id)?;

        let rows: Vec<GradeSheetRow> = self
            .etudiants
            .list()?
            .into_iter()
            .filter_map(|etudiant| {
                let note = notes
                    .iter()
                    .find(|note| note.etudiant.id == etudiant.id)
                    .cloned();
                let enrolled = etudiant
                    .parcours
                    .as_ref()
                    .is_some_and(|parcours| ue.belongs_to(parcours.id));
                (enrolled || note.is_some()).then_some(GradeSheetRow { etudiant, note })
            })
            .collect();

        let grades: Vec<f64> = rows
            .iter()
            .filter_map(|row| row.note.as_ref().and_then(|note| note.valeur))
            .collect();
        let average = if grades.is_empty() {
            None
        } else {
            Some(grades.iter().sum::<f64>() / grades.len() as f64)
        };

        Ok(GradeSheet { ue, rows, average })
    }
}
