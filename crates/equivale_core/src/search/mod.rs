//! Food lookup entry points.
//!
//! # Responsibility
//! - Resolve typed names to one record with a fixed group priority.
//! - Produce per-partition capped autocomplete suggestions.

pub mod resolve;
pub mod suggest;
