//! Food groups and the ordered catalog of partitions.
//!
//! # Responsibility
//! - Name the eight food-group partitions and their backing tables.
//! - Hold the resolution priority order as an explicit, immutable value.
//!
//! # Invariants
//! - A catalog is never empty and never lists a group twice.
//! - Catalog order is the resolution priority; it never changes after
//!   construction.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Nutritional group; each one is stored as its own partition table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FoodGroup {
    CerealsAndTubers,
    Fruits,
    Fats,
    Legumes,
    Dairy,
    Protein,
    Seeds,
    Vegetables,
}

impl FoodGroup {
    /// All groups in default priority order.
    pub const ALL: [FoodGroup; 8] = [
        FoodGroup::CerealsAndTubers,
        FoodGroup::Fruits,
        FoodGroup::Fats,
        FoodGroup::Legumes,
        FoodGroup::Dairy,
        FoodGroup::Protein,
        FoodGroup::Seeds,
        FoodGroup::Vegetables,
    ];

    /// Stable partition id. Doubles as the SQLite table name and as the group
    /// identifier reported to callers.
    pub fn table(self) -> &'static str {
        match self {
            Self::CerealsAndTubers => "cereais_e_tuberculos",
            Self::Fruits => "frutas",
            Self::Fats => "gorduras",
            Self::Legumes => "leguminosas",
            Self::Dairy => "leite_e_derivados",
            Self::Protein => "proteina",
            Self::Seeds => "sementes",
            Self::Vegetables => "verduras__hortali_as_e_derivados",
        }
    }

    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            Self::CerealsAndTubers => "cereals and tubers",
            Self::Fruits => "fruits",
            Self::Fats => "fats",
            Self::Legumes => "legumes",
            Self::Dairy => "dairy",
            Self::Protein => "protein",
            Self::Seeds => "seeds",
            Self::Vegetables => "vegetables, greens and derived",
        }
    }
}

impl Display for FoodGroup {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.table())
    }
}

/// Unknown group id passed to [`FoodGroup::from_str`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownFoodGroup(pub String);

impl Display for UnknownFoodGroup {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown food group `{}`", self.0)
    }
}

impl Error for UnknownFoodGroup {}

impl FromStr for FoodGroup {
    type Err = UnknownFoodGroup;

    /// Accepts either the table id or the label, case-insensitively.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_lowercase();
        FoodGroup::ALL
            .into_iter()
            .find(|group| group.table() == normalized || group.label() == normalized)
            .ok_or_else(|| UnknownFoodGroup(value.trim().to_string()))
    }
}

/// Catalog construction errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    Empty,
    DuplicateGroup(FoodGroup),
}

impl Display for CatalogError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "catalog must list at least one food group"),
            Self::DuplicateGroup(group) => write!(f, "food group listed twice: {group}"),
        }
    }
}

impl Error for CatalogError {}

/// Ordered, immutable list of partitions scanned by the resolver and the
/// suggester.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    groups: Vec<FoodGroup>,
}

impl Catalog {
    /// Builds a catalog with a caller-chosen priority order.
    pub fn new(groups: impl IntoIterator<Item = FoodGroup>) -> Result<Self, CatalogError> {
        let mut ordered: Vec<FoodGroup> = Vec::new();
        for group in groups {
            if ordered.contains(&group) {
                return Err(CatalogError::DuplicateGroup(group));
            }
            ordered.push(group);
        }
        if ordered.is_empty() {
            return Err(CatalogError::Empty);
        }
        Ok(Self { groups: ordered })
    }

    /// The eight standard groups in their default order.
    pub fn standard() -> Self {
        Self {
            groups: FoodGroup::ALL.to_vec(),
        }
    }

    pub fn groups(&self) -> &[FoodGroup] {
        &self.groups
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn contains(&self, group: FoodGroup) -> bool {
        self.groups.contains(&group)
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::standard()
    }
}
