//! Grade (`Note`) model.
//!
//! # Invariants
//! - At most one note exists per `(Etudiant, UE)` pair.
//! - `valeur` is `None` (ungraded) or a finite value in `[0, 20]`.
//! - A stored note whose student or unit cannot be resolved is not
//!   representable as a hydrated `Note`.

use super::etudiant::Etudiant;
use super::id::{EntityId, UNSAVED_ID};
use super::ue::Ue;
use super::ValidationError;
use serde::{Deserialize, Serialize};

pub const GRADE_MIN: f64 = 0.0;
pub const GRADE_MAX: f64 = 20.0;

/// Grade with both references resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    #[serde(rename = "ID")]
    pub id: EntityId,
    #[serde(rename = "Valeur")]
    pub valeur: Option<f64>,
    #[serde(rename = "Etudiant")]
    pub etudiant: Etudiant,
    #[serde(rename = "UE")]
    pub ue: Ue,
}

/// Stored shape of a grade.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoteRecord {
    #[serde(rename = "ID")]
    pub id: EntityId,
    #[serde(rename = "Valeur", default)]
    pub valeur: Option<f64>,
    #[serde(rename = "EtudiantId")]
    pub etudiant_id: EntityId,
    #[serde(rename = "UEId")]
    pub ue_id: EntityId,
}

impl Note {
    /// Creates an unsaved grade.
    pub fn new(etudiant: Etudiant, ue: Ue, valeur: Option<f64>) -> Self {
        Self {
            id: UNSAVED_ID,
            valeur,
            etudiant,
            ue,
        }
    }

    pub fn dehydrate(&self) -> NoteRecord {
        NoteRecord {
            id: self.id,
            valeur: self.valeur,
            etudiant_id: self.etudiant.id,
            ue_id: self.ue.id,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        match self.valeur {
            Some(value) if !value.is_finite() || !(GRADE_MIN..=GRADE_MAX).contains(&value) => {
                Err(ValidationError::GradeOutOfRange(value))
            }
            _ => Ok(()),
        }
    }

    /// Returns whether this grade links the given student and unit.
    pub fn links(&self, etudiant_id: EntityId, ue_id: EntityId) -> bool {
        self.etudiant.id == etudiant_id && self.ue.id == ue_id
    }
}

impl NoteRecord {
    /// Resolves both references, or `None` when either is missing.
    pub fn hydrate(&self, etudiants: &[Etudiant], ues: &[Ue]) -> Option<Note> {
        let etudiant = etudiants
            .iter()
            .find(|etudiant| etudiant.id == self.etudiant_id)?;
        let ue = ues.iter().find(|ue| ue.id == self.ue_id)?;

        Some(Note {
            id: self.id,
            valeur: self.valeur,
            etudiant: etudiant.clone(),
            ue: ue.clone(),
        })
    }
}
