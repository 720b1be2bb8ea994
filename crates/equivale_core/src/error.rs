//! Engine-level error taxonomy.
//!
//! # Invariants
//! - `NotFound` and `MissingCaloricData` stay distinct: a food that does not
//!   exist is not the same as a food that exists but cannot be compared.
//! - `user_message()` never exposes storage error text.

use crate::model::catalog::FoodGroup;
use crate::repo::food_repo::RepoError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type EngineResult<T> = Result<T, EngineError>;

/// Failure returned by resolution, suggestion and equivalence operations.
#[derive(Debug)]
pub enum EngineError {
    /// Missing, blank or non-positive required parameter.
    InvalidInput(String),
    /// No partition holds a record matching the name.
    NotFound(String),
    /// A resolved record has no usable positive caloric value.
    MissingCaloricData { food: String, group: FoodGroup },
    /// A partition read failed.
    DataSource { group: FoodGroup, source: RepoError },
}

impl EngineError {
    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "invalid_input",
            Self::NotFound(_) => "not_found",
            Self::MissingCaloricData { .. } => "missing_caloric_data",
            Self::DataSource { .. } => "data_source_failure",
        }
    }

    /// Message safe to show to an end user.
    pub fn user_message(&self) -> String {
        match self {
            Self::InvalidInput(message) => message.clone(),
            Self::NotFound(name) => format!("Food not found: {name}"),
            Self::MissingCaloricData { food, .. } => {
                format!("Cannot compute equivalence: no caloric data for {food}")
            }
            Self::DataSource { .. } => {
                "The food database is unavailable right now, please try again".to_string()
            }
        }
    }
}

impl Display for EngineError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidInput(message) => write!(f, "invalid input: {message}"),
            Self::NotFound(name) => write!(f, "food not found in any group: `{name}`"),
            Self::MissingCaloricData { food, group } => {
                write!(f, "no usable caloric value for `{food}` in {group}")
            }
            Self::DataSource { group, source } => {
                write!(f, "failed to read food group {group}: {source}")
            }
        }
    }
}

impl Error for EngineError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::DataSource { source, .. } => Some(source),
            _ => None,
        }
    }
}
