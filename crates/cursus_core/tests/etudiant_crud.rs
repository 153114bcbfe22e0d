use cursus_core::{
    EntityRepository, Etudiant, EtudiantRepository, KeyValueStore, MemoryKeyValueStore,
    Parcours, ParcoursRepository, RepoError,
};

fn miage() -> Parcours {
    Parcours::with_id(1, "Parcours 1", 2024)
}

#[test]
fn create_resolves_program_and_stores_only_its_id() {
    let store = MemoryKeyValueStore::new();
    let repo = EtudiantRepository::new(&store);

    let created = repo
        .create(&Etudiant::new(
            "Durand",
            "Alice",
            "alice@example.org",
            Some(miage()),
        ))
        .unwrap();
    assert_eq!(created.parcours, Some(miage()));
    assert_eq!(repo.get(created.id).unwrap(), created);

    let raw = store.get_item("EtudiantList").unwrap().unwrap();
    let stored: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(stored[0]["ParcoursId"], 1);
    assert_eq!(stored[0]["Email"], "alice@example.org");
}

#[test]
fn unknown_or_null_program_reads_as_none() {
    let store = MemoryKeyValueStore::new();
    store
        .set_item(
            "EtudiantList",
            r#"[{"ID":5,"Nom":"Durand","Prenom":"Alice","Email":"a@x.fr","ParcoursId":404},
                {"ID":6,"Nom":"Martin","Prenom":"Bob","Email":"b@x.fr","ParcoursId":null}]"#,
        )
        .unwrap();
    let repo = EtudiantRepository::new(&store);

    let listed = repo.list().unwrap();
    assert_eq!(listed.len(), 2);
    assert!(listed.iter().all(|etudiant| etudiant.parcours.is_none()));
}

#[test]
fn duplicate_identity_is_rejected_on_create() {
    let store = MemoryKeyValueStore::new();
    let repo = EtudiantRepository::new(&store);

    repo.create(&Etudiant::new("Durand", "Alice", "alice@example.org", None))
        .unwrap();
    let err = repo
        .create(&Etudiant::new("DURAND", "alice", "Alice@Example.org", None))
        .unwrap_err();
    match err {
        RepoError::Conflict(message) => assert!(message.contains("Alice Durand")),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn update_to_another_students_identity_is_rejected() {
    let store = MemoryKeyValueStore::new();
    let repo = EtudiantRepository::new(&store);
    let alice = repo
        .create(&Etudiant::new("Durand", "Alice", "alice@example.org", None))
        .unwrap();
    let bob = repo
        .create(&Etudiant::new("Martin", "Bob", "bob@example.org", None))
        .unwrap();

    let err = repo
        .update(
            bob.id,
            &Etudiant::new("Durand", "Alice", "alice@example.org", None),
        )
        .unwrap_err();
    assert!(matches!(err, RepoError::Conflict(_)));

    let same_identity = Etudiant::new("Durand", "Alice", "alice@example.org", Some(miage()));
    let updated = repo.update(alice.id, &same_identity).unwrap();
    assert_eq!(updated.id, alice.id);
    assert_eq!(updated.parcours, Some(miage()));
}

#[test]
fn free_form_fields_are_stored_as_given() {
    let store = MemoryKeyValueStore::new();
    let repo = EtudiantRepository::new(&store);

    let created = repo
        .create(&Etudiant::new("Durand", "Alice", "", None))
        .unwrap();
    assert_eq!(created.email, "");
    assert_eq!(repo.get(created.id).unwrap(), created);

    let unnamed = repo.create(&Etudiant::new("", "", "x", None)).unwrap();
    assert_eq!(repo.get(unnamed.id).unwrap(), unnamed);
}

#[test]
fn find_by_parcours_filters_enrolled_students() {
    let store = MemoryKeyValueStore::new();
    let other = ParcoursRepository::new(&store)
        .create(&Parcours::new("Informatique", 2025))
        .unwrap();
    let repo = EtudiantRepository::new(&store);

    let alice = repo
        .create(&Etudiant::new("Durand", "Alice", "alice@example.org", Some(miage())))
        .unwrap();
    repo.create(&Etudiant::new(
        "Martin",
        "Bob",
        "bob@example.org",
        Some(other.clone()),
    ))
    .unwrap();
    repo.create(&Etudiant::new("Petit", "Chloe", "chloe@example.org", None))
        .unwrap();

    let enrolled = repo.find_by_parcours(1).unwrap();
    assert_eq!(enrolled, vec![alice]);
    assert_eq!(repo.find_by_parcours(other.id).unwrap().len(), 1);
}

#[test]
fn delete_then_get_fails() {
    let store = MemoryKeyValueStore::new();
    let repo = EtudiantRepository::new(&store);
    let created = repo
        .create(&Etudiant::new("Durand", "Alice", "alice@example.org", None))
        .unwrap();

    repo.delete(created.id).unwrap();
    repo.delete(created.id).unwrap();
    assert!(matches!(
        repo.get(created.id).unwrap_err(),
        RepoError::NotFound { .. }
    ));
}
