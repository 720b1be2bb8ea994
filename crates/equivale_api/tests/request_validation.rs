use equivale_api::api::{equivalence, list_group, suggestions, STATUS_BAD_REQUEST};
use equivale_api::EquivalenceParams;
use equivale_core::config::ENV_DB_PATH;
use tempfile::TempDir;

// Every call below must fail validation, so the configured database is never
// opened and its file never created.
#[test]
fn invalid_requests_never_open_the_configured_database() {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("untouched.sqlite3");
    std::env::set_var(ENV_DB_PATH, &db_path);

    let missing = equivalence(EquivalenceParams::default());
    assert_eq!(missing.status, STATUS_BAD_REQUEST);
    assert_eq!(missing.body["code"], "invalid_input");

    let bad_quantity = equivalence(EquivalenceParams::new("banana", "-3", "maçã"));
    assert_eq!(bad_quantity.status, STATUS_BAD_REQUEST);

    assert_eq!(list_group(None).status, STATUS_BAD_REQUEST);
    assert_eq!(list_group(Some("snacks".to_string())).status, STATUS_BAD_REQUEST);
    assert_eq!(suggestions(Some("  ".to_string())).status, STATUS_BAD_REQUEST);

    assert!(!db_path.exists());
}
