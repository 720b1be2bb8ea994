//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the read contract the lookup engine depends on.
//! - Isolate SQLite query details from resolution and equivalence logic.
//!
//! # Invariants
//! - The engine only reads; writes exist for seeding and import.

pub mod food_repo;
