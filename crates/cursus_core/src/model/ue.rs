//! Course unit (`UE`) model.
//!
//! # Invariants
//! - `numero_ue` is unique across stored units, compared case-insensitively.
//! - Persisted form keeps only `ParcoursIds`; unknown ids vanish on hydrate.

use super::id::{EntityId, UNSAVED_ID};
use super::parcours::Parcours;
use super::{ensure_not_blank, fold_key, null_as_default, ValidationError};
use serde::{Deserialize, Serialize};

/// Course unit with its study programs resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ue {
    #[serde(rename = "ID")]
    pub id: EntityId,
    #[serde(rename = "Intitule")]
    pub intitule: String,
    #[serde(rename = "NumeroUe")]
    pub numero_ue: String,
    #[serde(rename = "Parcours")]
    pub parcours: Vec<Parcours>,
}

/// Stored shape of a course unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UeRecord {
    #[serde(rename = "ID")]
    pub id: EntityId,
    #[serde(rename = "Intitule", default, deserialize_with = "null_as_default")]
    pub intitule: String,
    #[serde(rename = "NumeroUe", default, deserialize_with = "null_as_default")]
    pub numero_ue: String,
    #[serde(rename = "ParcoursIds", default, deserialize_with = "null_as_default")]
    pub parcours_ids: Vec<EntityId>,
}

impl Ue {
    /// Creates an unsaved course unit.
    pub fn new(
        intitule: impl Into<String>,
        numero_ue: impl Into<String>,
        parcours: Vec<Parcours>,
    ) -> Self {
        Self {
            id: UNSAVED_ID,
            intitule: intitule.into(),
            numero_ue: numero_ue.into(),
            parcours,
        }
    }

    /// Flattens referenced programs back to their identifiers.
    pub fn dehydrate(&self) -> UeRecord {
        UeRecord {
            id: self.id,
            intitule: self.intitule.clone(),
            numero_ue: self.numero_ue.clone(),
            parcours_ids: self.parcours.iter().map(|parcours| parcours.id).collect(),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        ensure_not_blank("NumeroUe", &self.numero_ue)
    }

    /// Returns whether this unit is taught in the given program.
    pub fn belongs_to(&self, parcours_id: EntityId) -> bool {
        self.parcours.iter().any(|parcours| parcours.id == parcours_id)
    }

    /// Case-insensitive match on the unit number.
    pub fn has_numero(&self, numero_ue: &str) -> bool {
        fold_key(&self.numero_ue) == fold_key(numero_ue)
    }
}

impl UeRecord {
    /// Resolves stored program ids against `all_parcours`.
    ///
    /// Output order follows `all_parcours`; ids with no match are dropped.
    pub fn hydrate(&self, all_parcours: &[Parcours]) -> Ue {
        Ue {
            id: self.id,
            intitule: self.intitule.clone(),
            numero_ue: self.numero_ue.clone(),
            parcours: all_parcours
                .iter()
                .filter(|parcours| self.parcours_ids.contains(&parcours.id))
                .cloned()
                .collect(),
        }
    }
}
