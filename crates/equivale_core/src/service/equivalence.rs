//! Caloric equivalence use-case.
//!
//! # Responsibility
//! - Derive the substitute quantity matching the base food's calories.
//! - Orchestrate input validation and resolution of both food names.
//!
//! # Invariants
//! - Input is validated before any store access.
//! - Caloric values are compared as stated, without rescaling by reference
//!   quantity; differing reference quantities are only flagged.
//! - Non-positive caloric values count as missing data.

use crate::error::{EngineError, EngineResult};
use crate::model::catalog::Catalog;
use crate::model::food::{parse_nutrient_text, ResolvedFood};
use crate::repo::food_repo::FoodStore;
use crate::search::resolve::Resolver;
use log::{info, warn};
use serde::Serialize;

/// Result of one equivalence computation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Equivalence {
    pub base: ResolvedFood,
    pub base_quantity: f64,
    pub substitute: ResolvedFood,
    /// Substitute grams rounded to two decimals.
    pub substitute_quantity: f64,
    /// Substitute grams before rounding.
    pub raw_quantity: f64,
    /// Advisory only; callers decide whether to warn.
    pub groups_differ: bool,
}

impl Equivalence {
    /// Substitute quantity with exactly two decimals, e.g. `107.88`.
    pub fn display_quantity(&self) -> String {
        format!("{:.2}", self.substitute_quantity)
    }

    /// One-line human summary of the swap.
    pub fn summary(&self) -> String {
        format!(
            "{}g of {} is equivalent to {}g of {}",
            self.base_quantity,
            self.base.name(),
            self.display_quantity(),
            self.substitute.name()
        )
    }

    /// Cross-group advisory text, present only when the groups differ.
    pub fn group_warning(&self) -> Option<String> {
        if !self.groups_differ {
            return None;
        }
        Some(format!(
            "This swap may not be ideal: \"{}\" belongs to the {} group and \"{}\" belongs to the {} group. \
             Prefer swapping foods from the same group to keep your meal plan's nutritional balance.",
            self.base.name(),
            self.base.group.label(),
            self.substitute.name(),
            self.substitute.group.label()
        ))
    }

    /// Whether both reference quantities are known and unequal, in which case
    /// the unscaled ratio may be misleading.
    pub fn reference_quantities_differ(&self) -> bool {
        match (
            self.base.record.reference_quantity_g,
            self.substitute.record.reference_quantity_g,
        ) {
            (Some(base), Some(substitute)) => (base - substitute).abs() > f64::EPSILON,
            _ => false,
        }
    }
}

/// Computes the substitute quantity carrying the same calories as
/// `base_quantity` grams of `base`.
///
/// # Errors
/// - [`EngineError::InvalidInput`] when `base_quantity` is not a positive,
///   finite number.
/// - [`EngineError::MissingCaloricData`] when either record lacks a positive
///   caloric value.
pub fn compute_equivalence(
    base: &ResolvedFood,
    base_quantity: f64,
    substitute: &ResolvedFood,
) -> EngineResult<Equivalence> {
    if !base_quantity.is_finite() || base_quantity <= 0.0 {
        return Err(EngineError::InvalidInput(
            "baseQuantity must be a positive number".to_string(),
        ));
    }

    let base_kcal = positive_calories(base)?;
    let substitute_kcal = positive_calories(substitute)?;
    let raw_quantity = base_quantity * base_kcal / substitute_kcal;

    Ok(Equivalence {
        base: base.clone(),
        base_quantity,
        substitute: substitute.clone(),
        substitute_quantity: round_to_cents(raw_quantity),
        raw_quantity,
        groups_differ: base.group != substitute.group,
    })
}

/// Parses a gram quantity typed by the user (`"150"`, `"150,5"`, `"150 g"`).
///
/// # Errors
/// - [`EngineError::InvalidInput`] for blank, non-numeric or non-positive text.
pub fn parse_quantity(raw: &str) -> EngineResult<f64> {
    if raw.trim().is_empty() {
        return Err(EngineError::InvalidInput(
            "baseQuantity is required".to_string(),
        ));
    }
    match parse_nutrient_text(raw) {
        Some(value) if value.is_finite() && value > 0.0 => Ok(value),
        _ => Err(EngineError::InvalidInput(format!(
            "baseQuantity must be a positive number of grams, got `{}`",
            raw.trim()
        ))),
    }
}

fn positive_calories(food: &ResolvedFood) -> EngineResult<f64> {
    match food.record.caloric_value() {
        Some(value) if value > 0.0 => Ok(value),
        _ => Err(EngineError::MissingCaloricData {
            food: food.name().to_string(),
            group: food.group,
        }),
    }
}

fn round_to_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Resolves both names and computes their equivalence.
pub struct EquivalenceService<'s> {
    resolver: Resolver<'s>,
}

impl<'s> EquivalenceService<'s> {
    pub fn new<S: FoodStore + 's>(store: &'s S, catalog: &Catalog) -> Self {
        Self::with_resolver(Resolver::from_catalog(store, catalog))
    }

    pub fn with_resolver(resolver: Resolver<'s>) -> Self {
        Self { resolver }
    }

    /// Substitutes `base_quantity` grams of `base_name` with `substitute_name`.
    ///
    /// # Errors
    /// - [`EngineError::InvalidInput`] for blank names or a non-positive
    ///   quantity, raised before any store access.
    /// - [`EngineError::NotFound`] when either name fails to resolve.
    /// - [`EngineError::MissingCaloricData`] when either record has no usable
    ///   caloric value.
    pub fn equivalence(
        &self,
        base_name: &str,
        base_quantity: f64,
        substitute_name: &str,
    ) -> EngineResult<Equivalence> {
        if base_name.trim().is_empty() {
            return Err(EngineError::InvalidInput("baseFood is required".to_string()));
        }
        if substitute_name.trim().is_empty() {
            return Err(EngineError::InvalidInput(
                "substituteFood is required".to_string(),
            ));
        }
        if !base_quantity.is_finite() || base_quantity <= 0.0 {
            return Err(EngineError::InvalidInput(
                "baseQuantity must be a positive number".to_string(),
            ));
        }

        let base = self.resolver.resolve(base_name)?;
        let substitute = self.resolver.resolve(substitute_name)?;
        let equivalence = compute_equivalence(&base, base_quantity, &substitute)?;

        if equivalence.reference_quantities_differ() {
            warn!(
                "event=equivalence module=service status=reference_mismatch base_group={} substitute_group={}",
                base.group, substitute.group
            );
        }
        info!(
            "event=equivalence module=service status=ok base_group={} substitute_group={} groups_differ={}",
            base.group, substitute.group, equivalence.groups_differ
        );
        Ok(equivalence)
    }
}

#[cfg(test)]
mod tests {
    use super::{compute_equivalence, parse_quantity};
    use crate::error::EngineError;
    use crate::model::catalog::FoodGroup;
    use crate::model::food::{FoodRecord, ResolvedFood};

    fn food(name: &str, kcal: f64, group: FoodGroup) -> ResolvedFood {
        ResolvedFood::new(FoodRecord::new(name, kcal, 100.0), group)
    }

    #[test]
    fn banana_to_chicken_breast() {
        let banana = food("banana", 89.0, FoodGroup::Fruits);
        let chicken = food("chicken breast", 165.0, FoodGroup::Protein);

        let result = compute_equivalence(&banana, 200.0, &chicken).unwrap();
        assert_eq!(result.substitute_quantity, 107.88);
        assert_eq!(result.display_quantity(), "107.88");
        assert!(result.groups_differ);
        assert!(result.group_warning().unwrap().contains("protein"));
        assert_eq!(
            result.summary(),
            "200g of banana is equivalent to 107.88g of chicken breast"
        );
    }

    #[test]
    fn same_record_is_identity() {
        let rice = food("arroz integral", 124.0, FoodGroup::CerealsAndTubers);
        let result = compute_equivalence(&rice, 150.0, &rice).unwrap();
        assert_eq!(result.substitute_quantity, 150.0);
        assert!(!result.groups_differ);
        assert!(result.group_warning().is_none());
    }

    #[test]
    fn inverse_round_trip_stays_within_rounding() {
        let pairs = [(89.0, 165.0), (52.0, 884.0), (370.0, 33.0), (1.5, 2.25)];
        for (kcal_a, kcal_b) in pairs {
            let a = food("a", kcal_a, FoodGroup::Fruits);
            let b = food("b", kcal_b, FoodGroup::Fats);
            let forward = compute_equivalence(&a, 200.0, &b).unwrap();
            let back = compute_equivalence(&b, forward.substitute_quantity, &a).unwrap();
            let tolerance = 0.005 * kcal_b / kcal_a + 0.01;
            assert!(
                (back.substitute_quantity - 200.0).abs() <= tolerance,
                "{kcal_a}/{kcal_b}: got {}",
                back.substitute_quantity
            );
        }
    }

    #[test]
    fn fallback_alias_is_used() {
        let base = food("pão francês", 300.0, FoodGroup::CerealsAndTubers);
        let substitute = ResolvedFood::new(
            FoodRecord {
                name: "tapioca".to_string(),
                energy_kcal: None,
                calories: None,
                kcal: Some(150.0),
                reference_quantity_g: Some(100.0),
            },
            FoodGroup::CerealsAndTubers,
        );
        let result = compute_equivalence(&base, 50.0, &substitute).unwrap();
        assert_eq!(result.substitute_quantity, 100.0);
    }

    #[test]
    fn missing_or_negative_calories_are_rejected() {
        let base = food("banana", 89.0, FoodGroup::Fruits);
        let mut empty = food("água", 0.0, FoodGroup::Vegetables);
        empty.record.energy_kcal = None;
        let negative = food("erro", -10.0, FoodGroup::Fats);

        assert!(matches!(
            compute_equivalence(&base, 100.0, &empty),
            Err(EngineError::MissingCaloricData { ref food, .. }) if food == "água"
        ));
        assert!(matches!(
            compute_equivalence(&negative, 100.0, &base),
            Err(EngineError::MissingCaloricData { .. })
        ));
    }

    #[test]
    fn non_positive_quantity_is_invalid() {
        let banana = food("banana", 89.0, FoodGroup::Fruits);
        for quantity in [0.0, -5.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                compute_equivalence(&banana, quantity, &banana),
                Err(EngineError::InvalidInput(_))
            ));
        }
    }

    #[test]
    fn reference_mismatch_is_flagged_not_rescaled() {
        let base = food("azeite", 884.0, FoodGroup::Fats);
        let mut substitute = food("manteiga", 717.0, FoodGroup::Fats);
        substitute.record.reference_quantity_g = Some(10.0);
        let result = compute_equivalence(&base, 10.0, &substitute).unwrap();
        assert!(result.reference_quantities_differ());
        assert_eq!(result.substitute_quantity, 12.33);
    }

    #[test]
    fn quantity_text_parsing() {
        assert_eq!(parse_quantity("200").unwrap(), 200.0);
        assert_eq!(parse_quantity(" 150,5 g").unwrap(), 150.5);
        assert!(matches!(parse_quantity(""), Err(EngineError::InvalidInput(_))));
        assert!(matches!(parse_quantity("abc"), Err(EngineError::InvalidInput(_))));
        assert!(matches!(parse_quantity("-3"), Err(EngineError::InvalidInput(_))));
        assert!(matches!(parse_quantity("0"), Err(EngineError::InvalidInput(_))));
    }
}
