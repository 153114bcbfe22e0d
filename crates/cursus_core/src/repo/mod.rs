//! Repository layer over the key-value store.
//!
//! # Responsibility
//! - Expose one uniform CRUD contract (`EntityRepository`) per entity type.
//! - Hydrate stored identifiers into nested entities on read and flatten
//!   them back on write.
//! - Enforce uniqueness and validation rules before persistence.
//!
//! # Invariants
//! - Every mutation is load full list -> mutate -> save full list.
//! - Unreadable stored data reads as an empty collection (logged), while
//!   write failures are always returned to the caller.
//! - Semantic errors (`NotFound`, `Conflict`) are never swallowed.

use crate::model::id::EntityId;
use crate::model::{EntityKind, ValidationError};
use crate::storage::StorageError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod etudiant_repo;
pub mod note_repo;
pub mod parcours_repo;
mod records;
pub mod ue_repo;

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error shared by all entity repositories.
#[derive(Debug)]
pub enum RepoError {
    /// Operation targets an identifier that is not stored.
    NotFound { entity: EntityKind, id: EntityId },
    /// Uniqueness constraint violated on create/update.
    Conflict(String),
    /// Entity failed field validation.
    Validation(ValidationError),
    /// Written entity points at a related record that does not exist.
    DanglingReference { entity: EntityKind, id: EntityId },
    /// Key-value store rejected a write.
    Storage(StorageError),
    /// Records could not be encoded for persistence.
    Serialization(serde_json::Error),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound { entity, id } => write!(f, "{entity} not found: {id}"),
            Self::Conflict(message) => write!(f, "conflict: {message}"),
            Self::Validation(err) => write!(f, "{err}"),
            Self::DanglingReference { entity, id } => {
                write!(f, "referenced {entity} does not exist: {id}")
            }
            Self::Storage(err) => write!(f, "{err}"),
            Self::Serialization(err) => write!(f, "failed to encode records: {err}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Storage(err) => Some(err),
            Self::Serialization(err) => Some(err),
            Self::NotFound { .. } => None,
            Self::Conflict(_) => None,
            Self::DanglingReference { .. } => None,
        }
    }
}

impl From<ValidationError> for RepoError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<StorageError> for RepoError {
    fn from(value: StorageError) -> Self {
        Self::Storage(value)
    }
}

impl From<serde_json::Error> for RepoError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialization(value)
    }
}

/// Uniform CRUD contract shared by the four repositories.
///
/// `create` ignores the identifier carried by `data` and assigns a fresh
/// one; `update` keeps `id` whatever `data.id` says.
pub trait EntityRepository {
    type Entity;

    /// Lists all entities in stored order.
    fn list(&self) -> RepoResult<Vec<Self::Entity>>;
    /// Gets one entity or fails with `NotFound`.
    fn get(&self, id: EntityId) -> RepoResult<Self::Entity>;
    /// Persists a new entity and returns it with its assigned identifier.
    fn create(&self, data: &Self::Entity) -> RepoResult<Self::Entity>;
    /// Replaces the stored entity `id` with `data`.
    fn update(&self, id: EntityId, data: &Self::Entity) -> RepoResult<Self::Entity>;
    /// Removes entity `id`. Removing an absent id succeeds.
    fn delete(&self, id: EntityId) -> RepoResult<()>;
}
