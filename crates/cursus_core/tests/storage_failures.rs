use cursus_core::{
    EntityRepository, Etudiant, EtudiantRepository, KeyValueStore, MemoryKeyValueStore, Note,
    NoteRepository, Parcours, ParcoursRepository, RepoError, StorageError, Ue, UeRepository,
};

#[test]
fn corrupt_stored_json_reads_as_empty_collection() {
    let store = MemoryKeyValueStore::new();
    store.set_item("UeListe", "{not json").unwrap();
    store.set_item("EtudiantList", r#"[{"ID":"oops"}]"#).unwrap();
    store.set_item("parcoursList", "null").unwrap();

    assert!(UeRepository::new(&store).list().unwrap().is_empty());
    assert!(EtudiantRepository::new(&store).list().unwrap().is_empty());
    assert!(ParcoursRepository::new(&store).list().unwrap().is_empty());
}

#[test]
fn corrupt_notes_read_as_empty_and_are_not_reseeded() {
    let store = MemoryKeyValueStore::new();
    EtudiantRepository::new(&store)
        .create(&Etudiant::new("Durand", "Alice", "alice@example.org", None))
        .unwrap();
    UeRepository::new(&store)
        .create(&Ue::new("Algo", "INF101", Vec::new()))
        .unwrap();
    store.set_item("NoteList", "garbage").unwrap();

    let repo = NoteRepository::new(&store);
    assert!(repo.list().unwrap().is_empty());
    assert_eq!(store.get_item("NoteList").unwrap().as_deref(), Some("garbage"));
}

#[test]
fn undecodable_record_does_not_hide_or_erase_its_siblings() {
    let store = MemoryKeyValueStore::new();
    let students = EtudiantRepository::new(&store);
    let alice = students
        .create(&Etudiant::new("Durand", "Alice", "alice@example.org", None))
        .unwrap();
    let bob = students
        .create(&Etudiant::new("Martin", "Bob", "bob@example.org", None))
        .unwrap();
    let unit = UeRepository::new(&store)
        .create(&Ue::new("Algo", "INF101", Vec::new()))
        .unwrap();
    store
        .set_item(
            "NoteList",
            &format!(
                r#"[{{"ID":1,"Valeur":12,"EtudiantId":{a},"UEId":{u}}},{{"ID":2,"Valeur":"15","EtudiantId":{a},"UEId":{u}}}]"#,
                a = alice.id,
                u = unit.id
            ),
        )
        .unwrap();

    let repo = NoteRepository::new(&store);
    let visible = repo.list().unwrap();
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].id, 1);
    assert_eq!(visible[0].valeur, Some(12.0));

    repo.create(&Note::new(bob, unit, Some(10.0))).unwrap();

    let stored: serde_json::Value =
        serde_json::from_str(&store.get_item("NoteList").unwrap().unwrap()).unwrap();
    let ids: Vec<i64> = stored
        .as_array()
        .unwrap()
        .iter()
        .map(|note| note["ID"].as_i64().unwrap())
        .collect();
    assert_eq!(ids.len(), 2);
    assert_eq!(ids[0], 1);
}

#[test]
fn quota_exceeded_on_write_is_surfaced() {
    let store = MemoryKeyValueStore::with_quota(64);
    let repo = ParcoursRepository::new(&store);

    let err = repo
        .create(&Parcours::new("A program name far too long for this tiny quota", 2024))
        .unwrap_err();
    assert!(matches!(
        err,
        RepoError::Storage(StorageError::QuotaExceeded { .. })
    ));
    assert!(store.is_empty(), "failed write must leave storage untouched");
}

#[test]
fn failed_write_does_not_change_visible_state() {
    let store = MemoryKeyValueStore::with_quota(200);
    let repo = EtudiantRepository::new(&store);
    let alice = repo
        .create(&Etudiant::new("Durand", "Alice", "alice@example.org", None))
        .unwrap();

    let err = repo
        .create(&Etudiant::new(
            "Martin-Dupont-De-La-Fontaine",
            "Bob",
            "bob.martin-dupont-de-la-fontaine@universite-exemple.fr",
            None,
        ))
        .unwrap_err();
    assert!(matches!(err, RepoError::Storage(_)));
    assert_eq!(repo.list().unwrap(), vec![alice]);
}
