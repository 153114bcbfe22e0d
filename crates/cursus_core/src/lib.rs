//! Core data-access layer for the Cursus academic records manager.
//! This crate is the single source of truth for record invariants.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod storage;

pub use config::CoreConfig;
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::etudiant::{Etudiant, EtudiantRecord};
pub use model::id::{EntityId, UNSAVED_ID};
pub use model::note::{Note, NoteRecord};
pub use model::parcours::Parcours;
pub use model::ue::{Ue, UeRecord};
pub use model::{EntityKind, ValidationError};
pub use repo::etudiant_repo::EtudiantRepository;
pub use repo::note_repo::NoteRepository;
pub use repo::parcours_repo::ParcoursRepository;
pub use repo::ue_repo::UeRepository;
pub use repo::{EntityRepository, RepoError, RepoResult};
pub use service::records_service::{AcademicRecords, GradeSheet, GradeSheetRow};
pub use storage::{
    KeyValueStore, MemoryKeyValueStore, SqliteKeyValueStore, StorageError, StorageResult,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
