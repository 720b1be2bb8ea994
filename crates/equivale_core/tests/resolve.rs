use equivale_core::db::open_db_in_memory;
use equivale_core::{
    Catalog, EngineError, FoodGroup, FoodRecord, PartitionLookup, RepoError, RepoResult,
    Resolver, SqliteFoodStore,
};
use rusqlite::Connection;

fn seed(conn: &Connection, group: FoodGroup, names: &[(&str, f64)]) {
    let records: Vec<_> = names
        .iter()
        .map(|(name, kcal)| FoodRecord::new(*name, *kcal, 100.0))
        .collect();
    SqliteFoodStore::new(conn)
        .insert_foods(group, &records)
        .unwrap();
}

#[test]
fn resolves_substring_match_case_insensitively() {
    let conn = open_db_in_memory().unwrap();
    seed(&conn, FoodGroup::Fruits, &[("Banana nanica", 92.0)]);
    let store = SqliteFoodStore::new(&conn);
    let resolver = Resolver::from_catalog(&store, &Catalog::standard());

    let food = resolver.resolve("  NANICA ").unwrap();
    assert_eq!(food.name(), "Banana nanica");
    assert_eq!(food.group, FoodGroup::Fruits);
    assert!(food.name().to_lowercase().contains("nanica"));
}

#[test]
fn earlier_partition_wins_over_better_match_later() {
    let conn = open_db_in_memory().unwrap();
    // "Farinha de arroz" sits in cereals (first); exact "arroz" sits in protein.
    seed(&conn, FoodGroup::CerealsAndTubers, &[("Farinha de arroz", 363.0)]);
    seed(&conn, FoodGroup::Protein, &[("arroz", 128.0)]);
    let store = SqliteFoodStore::new(&conn);
    let resolver = Resolver::from_catalog(&store, &Catalog::standard());

    let food = resolver.resolve("arroz").unwrap();
    assert_eq!(food.name(), "Farinha de arroz");
    assert_eq!(food.group, FoodGroup::CerealsAndTubers);
}

#[test]
fn custom_catalog_order_changes_priority() {
    let conn = open_db_in_memory().unwrap();
    seed(&conn, FoodGroup::CerealsAndTubers, &[("Farinha de arroz", 363.0)]);
    seed(&conn, FoodGroup::Protein, &[("arroz", 128.0)]);
    let store = SqliteFoodStore::new(&conn);
    let catalog = Catalog::new([FoodGroup::Protein, FoodGroup::CerealsAndTubers]).unwrap();

    let food = Resolver::from_catalog(&store, &catalog)
        .resolve("arroz")
        .unwrap();
    assert_eq!(food.group, FoodGroup::Protein);
}

#[test]
fn first_duplicate_in_data_source_order_wins() {
    let conn = open_db_in_memory().unwrap();
    seed(&conn, FoodGroup::Dairy, &[("Leite integral", 61.0), ("Leite integral", 99.0)]);
    let store = SqliteFoodStore::new(&conn);

    let food = Resolver::from_catalog(&store, &Catalog::standard())
        .resolve("leite integral")
        .unwrap();
    assert_eq!(food.record.caloric_value(), Some(61.0));
}

#[test]
fn unknown_and_blank_names_are_not_found() {
    let conn = open_db_in_memory().unwrap();
    seed(&conn, FoodGroup::Fruits, &[("banana", 89.0)]);
    let store = SqliteFoodStore::new(&conn);
    let resolver = Resolver::from_catalog(&store, &Catalog::standard());

    assert!(matches!(
        resolver.resolve("xyzabc123"),
        Err(EngineError::NotFound(_))
    ));
    assert!(matches!(resolver.resolve("   "), Err(EngineError::NotFound(_))));
}

#[test]
fn broken_partition_is_skipped_during_resolution() {
    let conn = open_db_in_memory().unwrap();
    seed(&conn, FoodGroup::Protein, &[("Peito de frango", 165.0)]);
    conn.execute_batch("DROP TABLE frutas;").unwrap();
    let store = SqliteFoodStore::new(&conn);

    let food = Resolver::from_catalog(&store, &Catalog::standard())
        .resolve("frango")
        .unwrap();
    assert_eq!(food.group, FoodGroup::Protein);
}

struct FixedLookup {
    group: FoodGroup,
    result: Result<Option<&'static str>, ()>,
}

impl PartitionLookup for FixedLookup {
    fn group(&self) -> FoodGroup {
        self.group
    }

    fn find_first(&self, _needle: &str) -> RepoResult<Option<FoodRecord>> {
        match self.result {
            Ok(name) => Ok(name.map(|name| FoodRecord::new(name, 10.0, 100.0))),
            Err(()) => Err(RepoError::InvalidData("simulated outage".to_string())),
        }
    }
}

#[test]
fn custom_lookups_short_circuit_on_first_hit() {
    let lookups: Vec<Box<dyn PartitionLookup>> = vec![
        Box::new(FixedLookup {
            group: FoodGroup::Fats,
            result: Err(()),
        }),
        Box::new(FixedLookup {
            group: FoodGroup::Seeds,
            result: Ok(None),
        }),
        Box::new(FixedLookup {
            group: FoodGroup::Legumes,
            result: Ok(Some("lentilha")),
        }),
        Box::new(FixedLookup {
            group: FoodGroup::Dairy,
            result: Ok(Some("leite de lentilha")),
        }),
    ];
    let resolver = Resolver::new(lookups);

    let food = resolver.resolve("lentilha").unwrap();
    assert_eq!(food.group, FoodGroup::Legumes);
    assert_eq!(food.name(), "lentilha");
}

#[test]
fn bad_nutrient_value_keeps_its_partition_resolvable() {
    let conn = open_db_in_memory().unwrap();
    seed(&conn, FoodGroup::Fruits, &[("banana", 89.0)]);
    conn.execute_batch("INSERT INTO frutas (name, energy_kcal) VALUES ('kiwi', X'00FF');")
        .unwrap();
    seed(&conn, FoodGroup::Protein, &[("banana empanada", 250.0)]);
    let store = SqliteFoodStore::new(&conn);
    let resolver = Resolver::from_catalog(&store, &Catalog::standard());

    let banana = resolver.resolve("banana").unwrap();
    assert_eq!(banana.name(), "banana");
    assert_eq!(banana.group, FoodGroup::Fruits);

    let kiwi = resolver.resolve("kiwi").unwrap();
    assert_eq!(kiwi.group, FoodGroup::Fruits);
    assert_eq!(kiwi.record.caloric_value(), None);
}
