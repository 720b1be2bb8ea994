//! JSON catalog import.
//!
//! # Invariants
//! - Every group key is validated before the first row is written.
//! - Each group is inserted atomically; a bad record rolls back its group.

use equivale_core::{FoodGroup, FoodRecord, RepoResult, SqliteFoodStore};
use log::info;
use serde::Serialize;
use std::collections::BTreeMap;

/// Parsed import file, keyed by group.
pub type ImportBatch = Vec<(FoodGroup, Vec<FoodRecord>)>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportedGroup {
    /// Table id of the group written.
    pub group: String,
    pub rows: usize,
}

/// Parses `{ "<group id or label>": [ { "name": .., "energy_kcal": .. } ] }`.
pub fn parse_import(raw: &str) -> Result<ImportBatch, String> {
    let document: BTreeMap<String, Vec<FoodRecord>> =
        serde_json::from_str(raw).map_err(|err| format!("invalid import file: {err}"))?;

    let mut batch: ImportBatch = Vec::with_capacity(document.len());
    for (key, records) in document {
        let group = key.parse::<FoodGroup>().map_err(|err| err.to_string())?;
        match batch.iter_mut().find(|(existing, _)| *existing == group) {
            Some((_, existing)) => existing.extend(records),
            None => batch.push((group, records)),
        }
    }
    batch.sort_by_key(|(group, _)| *group);
    Ok(batch)
}

pub fn apply_import(
    store: &SqliteFoodStore<'_>,
    batch: &ImportBatch,
) -> RepoResult<Vec<ImportedGroup>> {
    let mut imported = Vec::with_capacity(batch.len());
    for (group, records) in batch {
        store.insert_foods(*group, records)?;
        info!(
            "event=catalog_import module=cli status=ok group={} rows={}",
            group,
            records.len()
        );
        imported.push(ImportedGroup {
            group: group.table().to_string(),
            rows: records.len(),
        });
    }
    Ok(imported)
}
