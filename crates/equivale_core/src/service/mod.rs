//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate resolution into the equivalence use-case.
//! - Probe catalog partitions for operational checks.
//! - Keep API/CLI layers decoupled from storage details.

pub mod catalog_health;
pub mod equivalence;
