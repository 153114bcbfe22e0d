//! Study program (`Parcours`) model.
//!
//! Root entity: no outbound references, so the stored record and the
//! hydrated entity share one shape.

use super::id::{EntityId, UNSAVED_ID};
use super::null_as_default;
use serde::{Deserialize, Serialize};

/// Academic study program/track.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parcours {
    #[serde(rename = "ID")]
    pub id: EntityId,
    #[serde(rename = "NomParcours", default, deserialize_with = "null_as_default")]
    pub nom_parcours: String,
    #[serde(rename = "AnneeFormation", default, deserialize_with = "null_as_default")]
    pub annee_formation: i32,
}

impl Parcours {
    /// Creates an unsaved study program.
    pub fn new(nom_parcours: impl Into<String>, annee_formation: i32) -> Self {
        Self::with_id(UNSAVED_ID, nom_parcours, annee_formation)
    }

    pub fn with_id(id: EntityId, nom_parcours: impl Into<String>, annee_formation: i32) -> Self {
        Self {
            id,
            nom_parcours: nom_parcours.into(),
            annee_formation,
        }
    }

    /// Program returned when nothing has been stored yet.
    pub fn default_seed() -> Self {
        Self::with_id(1, "Parcours 1", 2024)
    }
}
