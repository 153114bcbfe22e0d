//! CLI probe over the configured records store.
//!
//! # Responsibility
//! - Open the store named by `CURSUS_DB_PATH` (in-memory when unset).
//! - Print collection counts, or one collection when named as argument.

use cursus_core::{
    core_version, AcademicRecords, CoreConfig, EntityRepository, RepoResult, SqliteKeyValueStore,
};
use std::process::ExitCode;

const USAGE: &str = "usage: cursus_cli [parcours|ues|etudiants|notes]";

fn main() -> ExitCode {
    let config = CoreConfig::from_env();
    if let Err(err) = config.init_logging() {
        eprintln!("logging disabled: {err}");
    }

    let conn = match config.open_connection() {
        Ok(conn) => conn,
        Err(err) => {
            eprintln!("failed to open records database: {err}");
            return ExitCode::FAILURE;
        }
    };
    let store = match SqliteKeyValueStore::try_new(&conn) {
        Ok(store) => store,
        Err(err) => {
            eprintln!("records database is not usable: {err}");
            return ExitCode::FAILURE;
        }
    };
    let records = AcademicRecords::new(&store);

    let command = std::env::args().nth(1);
    let result = match command.as_deref() {
        None => print_summary(&records),
        Some("parcours") => print_parcours(&records),
        Some("ues") => print_ues(&records),
        Some("etudiants") => print_etudiants(&records),
        Some("notes") => print_notes(&records),
        Some(other) => {
            eprintln!("unknown collection `{other}`\n{USAGE}");
            return ExitCode::FAILURE;
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("event=cli_command module=cli status=error error={err}");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn print_summary(records: &AcademicRecords<'_, SqliteKeyValueStore<'_>>) -> RepoResult<()> {
    println!("cursus_core version={}", core_version());
    println!("parcours={}", records.parcours().list()?.len());
    println!("ues={}", records.ues().list()?.len());
    println!("etudiants={}", records.etudiants().list()?.len());
    println!("notes={}", records.notes().list()?.len());
    Ok(())
}

fn print_parcours(records: &AcademicRecords<'_, SqliteKeyValueStore<'_>>) -> RepoResult<()> {
    for parcours in records.parcours().list()? {
        println!(
            "{}\t{}\t{}",
            parcours.id, parcours.nom_parcours, parcours.annee_formation
        );
    }
    Ok(())
}

fn print_ues(records: &AcademicRecords<'_, SqliteKeyValueStore<'_>>) -> RepoResult<()> {
    for ue in records.ues().list()? {
        let parcours: Vec<_> = ue.parcours.iter().map(|p| p.nom_parcours.as_str()).collect();
        println!(
            "{}\t{}\t{}\t{}",
            ue.id,
            ue.numero_ue,
            ue.intitule,
            parcours.join(", ")
        );
    }
    Ok(())
}

fn print_etudiants(records: &AcademicRecords<'_, SqliteKeyValueStore<'_>>) -> RepoResult<()> {
    for etudiant in records.etudiants().list()? {
        let parcours = etudiant
            .parcours
            .as_ref()
            .map_or("-", |p| p.nom_parcours.as_str());
        println!("{}\t{}\t{}", etudiant.id, etudiant.display_name(), parcours);
    }
    Ok(())
}

fn print_notes(records: &AcademicRecords<'_, SqliteKeyValueStore<'_>>) -> RepoResult<()> {
    for note in records.notes().list()? {
        let valeur = note
            .valeur
            .map_or_else(|| "-".to_string(), |value| value.to_string());
        println!(
            "{}\t{}\t{}\t{}",
            note.id,
            note.etudiant.display_name(),
            note.ue.numero_ue,
            valeur
        );
    }
    Ok(())
}
