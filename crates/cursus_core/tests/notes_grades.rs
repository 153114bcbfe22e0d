use cursus_core::{
    EntityKind, EntityRepository, Etudiant, EtudiantRepository, KeyValueStore,
    MemoryKeyValueStore, Note, NoteRepository, RepoError, Ue, UeRepository, ValidationError,
};

struct Fixture {
    store: MemoryKeyValueStore,
}

impl Fixture {
    /// Two students and one unit; `NoteList` left unwritten.
    fn new() -> Self {
        let store = MemoryKeyValueStore::new();
        {
            let etudiants = EtudiantRepository::new(&store);
            etudiants
                .create(&Etudiant::new("Durand", "Alice", "alice@example.org", None))
                .unwrap();
            etudiants
                .create(&Etudiant::new("Martin", "Bob", "bob@example.org", None))
                .unwrap();
            UeRepository::new(&store)
                .create(&Ue::new("Algorithmique", "INF101", Vec::new()))
                .unwrap();
        }
        Self { store }
    }

    /// Same data but with an explicitly empty `NoteList`, so nothing is seeded.
    fn without_seed() -> Self {
        let fixture = Self::new();
        fixture.store.set_item("NoteList", "[]").unwrap();
        fixture
    }

    fn students(&self) -> Vec<Etudiant> {
        EtudiantRepository::new(&self.store).list().unwrap()
    }

    fn unit(&self) -> Ue {
        UeRepository::new(&self.store).list().unwrap().remove(0)
    }
}

#[test]
fn first_access_seeds_one_note_per_student_on_first_unit() {
    let fixture = Fixture::new();
    let repo = NoteRepository::new(&fixture.store);

    let notes = repo.list().unwrap();
    let unit = fixture.unit();
    assert_eq!(notes.len(), 2);
    assert!(notes.iter().all(|note| note.ue.id == unit.id));

    let students = fixture.students();
    assert_eq!(notes[0].etudiant.id, students[0].id);
    assert_eq!(notes[0].valeur, Some(11.0));
    assert_eq!(notes[1].etudiant.id, students[1].id);
    assert_eq!(notes[1].valeur, None);

    let again = NoteRepository::new(&fixture.store).list().unwrap();
    assert_eq!(again, notes, "seeding must not repeat once stored");
}

#[test]
fn nothing_is_seeded_without_units() {
    let store = MemoryKeyValueStore::new();
    EtudiantRepository::new(&store)
        .create(&Etudiant::new("Durand", "Alice", "alice@example.org", None))
        .unwrap();

    let repo = NoteRepository::new(&store);
    assert!(repo.list().unwrap().is_empty());
    assert!(store.get_item("NoteList").unwrap().is_none());

    UeRepository::new(&store)
        .create(&Ue::new("Algo", "INF101", Vec::new()))
        .unwrap();
    assert!(
        repo.list().unwrap().is_empty(),
        "initialization runs once per repository instance"
    );
}

#[test]
fn create_and_get_roundtrip() {
    let fixture = Fixture::without_seed();
    let repo = NoteRepository::new(&fixture.store);
    let student = fixture.students().remove(0);

    let created = repo
        .create(&Note::new(student.clone(), fixture.unit(), Some(14.5)))
        .unwrap();
    let loaded = repo.get(created.id).unwrap();
    assert_eq!(loaded, created);
    assert_eq!(loaded.etudiant, student);

    let raw = fixture.store.get_item("NoteList").unwrap().unwrap();
    let stored: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(stored[0]["EtudiantId"], student.id);
    assert_eq!(stored[0]["Valeur"], 14.5);
    assert!(stored[0].get("Etudiant").is_none());
}

#[test]
fn second_note_for_same_pair_conflicts() {
    let fixture = Fixture::without_seed();
    let repo = NoteRepository::new(&fixture.store);
    let student = fixture.students().remove(0);
    let unit = fixture.unit();

    let first = repo
        .create(&Note::new(student.clone(), unit.clone(), Some(12.0)))
        .unwrap();
    let err = repo
        .create(&Note::new(student.clone(), unit.clone(), Some(8.0)))
        .unwrap_err();
    assert!(matches!(err, RepoError::Conflict(_)));

    let found = repo.find_by_etudiant_ue(student.id, unit.id).unwrap();
    assert_eq!(found, Some(first));
}

#[test]
fn find_by_etudiant_ue_returns_none_without_error() {
    let fixture = Fixture::without_seed();
    let repo = NoteRepository::new(&fixture.store);

    assert_eq!(repo.find_by_etudiant_ue(1, 2).unwrap(), None);
}

#[test]
fn find_by_ue_and_by_etudiant() {
    let fixture = Fixture::new();
    let second_unit = UeRepository::new(&fixture.store)
        .create(&Ue::new("Web", "INF102", Vec::new()))
        .unwrap();
    let repo = NoteRepository::new(&fixture.store);
    let students = fixture.students();

    repo.create(&Note::new(students[0].clone(), second_unit.clone(), None))
        .unwrap();

    assert_eq!(repo.find_by_ue(fixture.unit().id).unwrap().len(), 2);
    assert_eq!(repo.find_by_ue(second_unit.id).unwrap().len(), 1);
    assert_eq!(repo.find_by_etudiant(students[0].id).unwrap().len(), 2);
    assert_eq!(repo.find_by_etudiant(students[1].id).unwrap().len(), 1);
}

#[test]
fn update_changes_grade_and_keeps_id() {
    let fixture = Fixture::new();
    let repo = NoteRepository::new(&fixture.store);
    let seeded = repo.list().unwrap().remove(1);
    assert_eq!(seeded.valeur, None);

    let updated = repo
        .update(
            seeded.id,
            &Note {
                valeur: Some(17.0),
                ..seeded.clone()
            },
        )
        .unwrap();
    assert_eq!(updated.id, seeded.id);
    assert_eq!(repo.get(seeded.id).unwrap().valeur, Some(17.0));
}

#[test]
fn update_onto_an_existing_pair_conflicts() {
    let fixture = Fixture::new();
    let repo = NoteRepository::new(&fixture.store);
    let notes = repo.list().unwrap();

    let err = repo
        .update(
            notes[1].id,
            &Note {
                etudiant: notes[0].etudiant.clone(),
                ..notes[1].clone()
            },
        )
        .unwrap_err();
    assert!(matches!(err, RepoError::Conflict(_)));
}

#[test]
fn out_of_range_grade_is_rejected() {
    let fixture = Fixture::without_seed();
    let repo = NoteRepository::new(&fixture.store);
    let student = fixture.students().remove(0);

    let err = repo
        .create(&Note::new(student, fixture.unit(), Some(21.0)))
        .unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(ValidationError::GradeOutOfRange(_))
    ));
}

#[test]
fn note_for_unknown_student_is_rejected() {
    let fixture = Fixture::without_seed();
    let repo = NoteRepository::new(&fixture.store);
    let mut ghost = fixture.students().remove(0);
    ghost.id = 123;

    let err = repo
        .create(&Note::new(ghost, fixture.unit(), Some(10.0)))
        .unwrap_err();
    assert!(matches!(
        err,
        RepoError::DanglingReference {
            entity: EntityKind::Etudiant,
            id: 123
        }
    ));
}

#[test]
fn orphan_notes_are_hidden_but_kept_in_storage() {
    let fixture = Fixture::new();
    let repo = NoteRepository::new(&fixture.store);
    let notes = repo.list().unwrap();
    let removed_student = notes[0].etudiant.id;

    EtudiantRepository::new(&fixture.store)
        .delete(removed_student)
        .unwrap();

    let visible = repo.list().unwrap();
    assert_eq!(visible.len(), 1);
    assert!(matches!(
        repo.get(notes[0].id).unwrap_err(),
        RepoError::NotFound { .. }
    ));

    repo.delete(notes[1].id).unwrap();
    let raw = fixture.store.get_item("NoteList").unwrap().unwrap();
    let stored: Vec<serde_json::Value> = serde_json::from_str(&raw).unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0]["EtudiantId"], removed_student);
}

#[test]
fn delete_then_get_fails() {
    let fixture = Fixture::new();
    let repo = NoteRepository::new(&fixture.store);
    let note = repo.list().unwrap().remove(0);

    repo.delete(note.id).unwrap();
    repo.delete(note.id).unwrap();
    assert!(matches!(
        repo.get(note.id).unwrap_err(),
        RepoError::NotFound {
            entity: EntityKind::Note,
            ..
        }
    ));
    assert_eq!(repo.list().unwrap().len(), 1);
}
