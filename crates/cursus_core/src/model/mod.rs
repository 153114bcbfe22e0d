//! Domain model for academic records.
//!
//! # Responsibility
//! - Define hydrated entities (with nested references) handed to callers.
//! - Define flat persisted records (references as bare identifiers).
//! - Provide pure `hydrate`/`dehydrate` mappings between the two shapes.
//!
//! # Invariants
//! - Persisted field names are PascalCase (`ID`, `NomParcours`, ...).
//! - Mapping functions never touch storage.

use serde::{Deserialize, Deserializer};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod etudiant;
pub mod id;
pub mod note;
pub mod parcours;
pub mod ue;

/// Entity families managed by the repositories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Parcours,
    Ue,
    Etudiant,
    Note,
}

impl EntityKind {
    /// Storage key holding the JSON array of this entity's records.
    pub fn storage_key(self) -> &'static str {
        match self {
            Self::Parcours => "parcoursList",
            Self::Ue => "UeListe",
            Self::Etudiant => "EtudiantList",
            Self::Note => "NoteList",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Parcours => "parcours",
            Self::Ue => "ue",
            Self::Etudiant => "etudiant",
            Self::Note => "note",
        }
    }
}

impl Display for EntityKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Field-level validation failure raised before persistence.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Required text field is empty after trimming.
    BlankField(&'static str),
    /// Grade is NaN/infinite or outside `[0, 20]`.
    GradeOutOfRange(f64),
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankField(field) => write!(f, "`{field}` must not be blank"),
            Self::GradeOutOfRange(value) => {
                write!(f, "grade {value} is outside the allowed range [0, 20]")
            }
        }
    }
}

impl Error for ValidationError {}

/// Reads `null` or a missing field as the type's default.
///
/// Stored blobs written by older clients carry `null` for unset text fields.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

pub(crate) fn ensure_not_blank(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::BlankField(field));
    }
    Ok(())
}

/// Case-insensitive comparison key for uniqueness checks.
///
/// Whitespace is significant: `"INF101 "` and `"INF101"` are distinct keys.
pub(crate) fn fold_key(value: &str) -> String {
    value.to_lowercase()
}
