//! Food resolution and caloric equivalence engine.
//! This crate owns the catalog, the food store contract and every lookup rule.

pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod model;
pub mod repo;
pub mod search;
pub mod service;

pub use config::EngineConfig;
pub use error::{EngineError, EngineResult};
pub use logging::{default_log_level, init_logging, init_logging_with, logging_status, LogOptions};
pub use model::catalog::{Catalog, CatalogError, FoodGroup, UnknownFoodGroup};
pub use model::food::{FoodRecord, ResolvedFood};
pub use repo::food_repo::{FoodStore, RepoError, RepoResult, SqliteFoodStore};
pub use search::resolve::{PartitionLookup, Resolver, StorePartition};
pub use search::suggest::{Suggester, DEFAULT_SUGGESTION_LIMIT};
pub use service::catalog_health::{check_catalog, PartitionHealth, PartitionStatus};
pub use service::equivalence::{
    compute_equivalence, parse_quantity, Equivalence, EquivalenceService,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
