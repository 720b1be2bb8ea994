//! Boundary crate exposing food lookups as status-plus-JSON responses.

pub mod api;

pub use api::{
    ApiResponse, EquivaleApi, EquivalenceBody, EquivalenceParams, GroupListingBody,
    SuggestionsBody,
};
