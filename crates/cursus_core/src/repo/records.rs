//! JSON array load/save shared by the repositories.

use super::RepoResult;
use crate::model::EntityKind;
use crate::storage::KeyValueStore;
use log::{error, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Loads the stored records for `kind`.
///
/// Returns `None` when the key was never written. Read failures and blobs
/// that are not a JSON array are logged and recovered as an empty list.
/// Elements that fail to decode are skipped one by one so their siblings
/// survive the next write.
pub(crate) fn load_records<S, R>(store: &S, kind: EntityKind) -> Option<Vec<R>>
where
    S: KeyValueStore,
    R: DeserializeOwned,
{
    let key = kind.storage_key();
    let raw = match store.get_item(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(err) => {
            error!(
                "event=records_load module=repo status=error entity={kind} key={key} error_code=storage_read_failed error={err}"
            );
            return Some(Vec::new());
        }
    };

    let elements = match serde_json::from_str::<Vec<serde_json::Value>>(&raw) {
        Ok(elements) => elements,
        Err(err) => {
            error!(
                "event=records_load module=repo status=error entity={kind} key={key} error_code=decode_failed error={err}"
            );
            return Some(Vec::new());
        }
    };

    let total = elements.len();
    let records: Vec<R> = elements
        .into_iter()
        .enumerate()
        .filter_map(|(index, element)| match serde_json::from_value::<R>(element) {
            Ok(record) => Some(record),
            Err(err) => {
                warn!(
                    "event=records_load module=repo status=skipped entity={kind} key={key} index={index} error_code=record_decode_failed error={err}"
                );
                None
            }
        })
        .collect();

    if records.len() < total {
        warn!(
            "event=records_load module=repo status=partial entity={kind} key={key} dropped={} total={total}",
            total - records.len()
        );
    }
    Some(records)
}

/// Replaces the stored records for `kind`.
pub(crate) fn save_records<S, R>(store: &S, kind: EntityKind, records: &[R]) -> RepoResult<()>
where
    S: KeyValueStore,
    R: Serialize,
{
    let key = kind.storage_key();
    let payload = serde_json::to_string(records).map_err(|err| {
        error!(
            "event=records_save module=repo status=error entity={kind} key={key} error_code=encode_failed error={err}"
        );
        err
    })?;

    store.set_item(key, &payload).map_err(|err| {
        error!(
            "event=records_save module=repo status=error entity={kind} key={key} error_code=storage_write_failed error={err}"
        );
        err
    })?;

    Ok(())
}

/// Returns whether the key for `kind` was never written.
///
/// A failing read counts as present so callers never seed over data they
/// could not see.
pub(crate) fn is_unwritten<S: KeyValueStore>(store: &S, kind: EntityKind) -> bool {
    match store.get_item(kind.storage_key()) {
        Ok(value) => value.is_none(),
        Err(err) => {
            error!(
                "event=records_probe module=repo status=error entity={kind} error_code=storage_read_failed error={err}"
            );
            false
        }
    }
}
