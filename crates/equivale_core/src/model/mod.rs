//! Food catalog domain model.
//!
//! # Responsibility
//! - Define the food-group partitions and the record shape stored in them.
//! - Keep the resolution priority order explicit and immutable.
//!
//! # Invariants
//! - Records never carry their group; the resolver attaches it at lookup.

pub mod catalog;
pub mod food;
