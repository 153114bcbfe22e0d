//! Student (`Etudiant`) model.
//!
//! # Invariants
//! - The `(Nom, Prenom, Email)` triple is unique, compared case-insensitively.
//! - A student belongs to at most one study program.

use super::id::{EntityId, UNSAVED_ID};
use super::parcours::Parcours;
use super::{fold_key, null_as_default};
use serde::{Deserialize, Serialize};

/// Student with the enrolled program resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Etudiant {
    #[serde(rename = "ID")]
    pub id: EntityId,
    #[serde(rename = "Nom")]
    pub nom: String,
    #[serde(rename = "Prenom")]
    pub prenom: String,
    #[serde(rename = "Email")]
    pub email: String,
    #[serde(rename = "Parcours")]
    pub parcours: Option<Parcours>,
}

/// Stored shape of a student.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EtudiantRecord {
    #[serde(rename = "ID")]
    pub id: EntityId,
    #[serde(rename = "Nom", default, deserialize_with = "null_as_default")]
    pub nom: String,
    #[serde(rename = "Prenom", default, deserialize_with = "null_as_default")]
    pub prenom: String,
    #[serde(rename = "Email", default, deserialize_with = "null_as_default")]
    pub email: String,
    #[serde(rename = "ParcoursId", default)]
    pub parcours_id: Option<EntityId>,
}

impl Etudiant {
    /// Creates an unsaved student.
    pub fn new(
        nom: impl Into<String>,
        prenom: impl Into<String>,
        email: impl Into<String>,
        parcours: Option<Parcours>,
    ) -> Self {
        Self {
            id: UNSAVED_ID,
            nom: nom.into(),
            prenom: prenom.into(),
            email: email.into(),
            parcours,
        }
    }

    pub fn dehydrate(&self) -> EtudiantRecord {
        EtudiantRecord {
            id: self.id,
            nom: self.nom.clone(),
            prenom: self.prenom.clone(),
            email: self.email.clone(),
            parcours_id: self.parcours.as_ref().map(|parcours| parcours.id),
        }
    }

    /// Returns whether both students share the same identity triple.
    pub fn same_identity(&self, other: &Etudiant) -> bool {
        fold_key(&self.nom) == fold_key(&other.nom)
            && fold_key(&self.prenom) == fold_key(&other.prenom)
            && fold_key(&self.email) == fold_key(&other.email)
    }

    pub fn display_name(&self) -> String {
        format!("{} {} <{}>", self.prenom, self.nom, self.email)
    }

    pub fn enrolled_in(&self, parcours_id: EntityId) -> bool {
        self.parcours
            .as_ref()
            .is_some_and(|parcours| parcours.id == parcours_id)
    }
}

impl EtudiantRecord {
    /// Resolves the stored program id; unknown ids resolve to `None`.
    pub fn hydrate(&self, all_parcours: &[Parcours]) -> Etudiant {
        let parcours = self.parcours_id.and_then(|parcours_id| {
            all_parcours
                .iter()
                .find(|parcours| parcours.id == parcours_id)
                .cloned()
        });

        Etudiant {
            id: self.id,
            nom: self.nom.clone(),
            prenom: self.prenom.clone(),
            email: self.email.clone(),
            parcours,
        }
    }
}
