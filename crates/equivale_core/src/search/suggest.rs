//! Autocomplete suggestions for partial food names.
//!
//! # Invariants
//! - Results are concatenated in catalog order, each partition contributing
//!   at most `limit_per_partition` names in data-source order.
//! - Duplicates across partitions are kept.
//! - Any partition failure aborts the whole call.

use crate::error::{EngineError, EngineResult};
use crate::model::catalog::Catalog;
use crate::model::food::normalize_query;
use crate::repo::food_repo::FoodStore;
use log::{debug, error};

/// Default number of names taken from each partition.
pub const DEFAULT_SUGGESTION_LIMIT: u32 = 10;

pub struct Suggester<'s, S: FoodStore> {
    store: &'s S,
    catalog: &'s Catalog,
    limit_per_partition: u32,
}

impl<'s, S: FoodStore> Suggester<'s, S> {
    pub fn new(store: &'s S, catalog: &'s Catalog) -> Self {
        Self {
            store,
            catalog,
            limit_per_partition: DEFAULT_SUGGESTION_LIMIT,
        }
    }

    /// Overrides the per-partition cap.
    pub fn with_limit(mut self, limit_per_partition: u32) -> Self {
        self.limit_per_partition = limit_per_partition;
        self
    }

    pub fn limit_per_partition(&self) -> u32 {
        self.limit_per_partition
    }

    /// Returns every matching name across partitions.
    ///
    /// Blank queries return an empty list without touching the store. An
    /// empty list is not an error.
    pub fn suggest(&self, query: &str) -> EngineResult<Vec<String>> {
        let needle = normalize_query(query);
        if needle.is_empty() {
            return Ok(Vec::new());
        }

        let mut names = Vec::new();
        for group in self.catalog.groups() {
            let found = self
                .store
                .search_by_name_contains(*group, &needle, self.limit_per_partition)
                .map_err(|source| {
                    error!(
                        "event=suggest module=search status=error group={} error={}",
                        group, source
                    );
                    EngineError::DataSource {
                        group: *group,
                        source,
                    }
                })?;
            names.extend(found);
        }

        debug!(
            "event=suggest module=search status=ok partitions={} results={}",
            self.catalog.len(),
            names.len()
        );
        Ok(names)
    }
}
