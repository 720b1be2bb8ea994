//! Free-text food name resolution across partitions.
//!
//! # Responsibility
//! - Turn a typed food name into exactly one record plus its group.
//!
//! # Invariants
//! - Lookups run in catalog order and the first hit wins; a weak match in an
//!   earlier group beats an exact match in a later one.
//! - A failing partition is logged and skipped, never fatal.
//! - Blank input resolves to `NotFound` without any store access.

use crate::error::{EngineError, EngineResult};
use crate::logging::sanitize_message;
use crate::model::catalog::{Catalog, FoodGroup};
use crate::model::food::{normalize_query, FoodRecord, ResolvedFood};
use crate::repo::food_repo::{FoodStore, RepoResult};
use log::{debug, info, warn};

const MAX_LOGGED_QUERY_CHARS: usize = 64;

/// One lookup provider per partition.
pub trait PartitionLookup {
    fn group(&self) -> FoodGroup;

    /// Returns the first record whose lower-cased name contains `needle`.
    ///
    /// `needle` is already trimmed and lower-cased.
    fn find_first(&self, needle: &str) -> RepoResult<Option<FoodRecord>>;
}

/// Partition lookup that scans a full store partition.
pub struct StorePartition<'s, S: FoodStore> {
    store: &'s S,
    group: FoodGroup,
}

impl<'s, S: FoodStore> StorePartition<'s, S> {
    pub fn new(store: &'s S, group: FoodGroup) -> Self {
        Self { store, group }
    }
}

impl<S: FoodStore> PartitionLookup for StorePartition<'_, S> {
    fn group(&self) -> FoodGroup {
        self.group
    }

    fn find_first(&self, needle: &str) -> RepoResult<Option<FoodRecord>> {
        let records = self.store.list_all(self.group)?;
        Ok(records.into_iter().find(|record| record.name_contains(needle)))
    }
}

/// Fixed-priority resolver over an ordered list of partition lookups.
pub struct Resolver<'s> {
    lookups: Vec<Box<dyn PartitionLookup + 's>>,
}

impl<'s> Resolver<'s> {
    /// Builds a resolver from lookups already in priority order.
    pub fn new(lookups: Vec<Box<dyn PartitionLookup + 's>>) -> Self {
        Self { lookups }
    }

    /// Builds one store-backed lookup per catalog group, in catalog order.
    pub fn from_catalog<S: FoodStore + 's>(store: &'s S, catalog: &Catalog) -> Self {
        let lookups = catalog
            .groups()
            .iter()
            .map(|group| {
                Box::new(StorePartition::new(store, *group)) as Box<dyn PartitionLookup + 's>
            })
            .collect();
        Self::new(lookups)
    }

    /// Resolves `name` to the first matching record in priority order.
    ///
    /// # Errors
    /// - [`EngineError::NotFound`] when no partition yields a match, including
    ///   blank input.
    pub fn resolve(&self, name: &str) -> EngineResult<ResolvedFood> {
        let needle = normalize_query(name);
        let logged = sanitize_message(&needle, MAX_LOGGED_QUERY_CHARS);
        if needle.is_empty() {
            debug!("event=resolve module=search status=skipped reason=blank_query");
            return Err(EngineError::NotFound(name.trim().to_string()));
        }

        for lookup in &self.lookups {
            let group = lookup.group();
            debug!(
                "event=resolve_partition module=search status=start group={} query={}",
                group, logged
            );
            match lookup.find_first(&needle) {
                Ok(Some(record)) => {
                    info!(
                        "event=resolve module=search status=ok group={} query={} match={}",
                        group,
                        logged,
                        sanitize_message(&record.name, MAX_LOGGED_QUERY_CHARS)
                    );
                    return Ok(ResolvedFood::new(record, group));
                }
                Ok(None) => {}
                Err(err) => {
                    warn!(
                        "event=resolve_partition module=search status=error group={} error={}",
                        group, err
                    );
                }
            }
        }

        info!(
            "event=resolve module=search status=not_found partitions={} query={}",
            self.lookups.len(),
            logged
        );
        Err(EngineError::NotFound(name.trim().to_string()))
    }
}
