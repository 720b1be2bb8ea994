//! Food store contract and SQLite implementation.
//!
//! # Responsibility
//! - Expose read access to one food-group partition at a time.
//! - Keep SQL and column-alias decoding inside the persistence boundary.
//!
//! # Invariants
//! - Rows are returned in data-source order (`id` ascending).
//! - Name matching is a case-insensitive substring test using Unicode
//!   lower-casing, so accented names match regardless of case.
//! - An undecodable nutrient value only blanks that value; the row and its
//!   partition stay readable. A blank or unreadable name is still an error.

use crate::db::DbError;
use crate::model::catalog::FoodGroup;
use crate::model::food::{parse_nutrient_text, FoodRecord};
use log::warn;
use rusqlite::types::Value;
use rusqlite::{params, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Persistence-layer error for partition reads and seeding writes.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid food data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Read capability over the food-group partitions.
pub trait FoodStore {
    /// Returns every record of one partition in data-source order.
    fn list_all(&self, group: FoodGroup) -> RepoResult<Vec<FoodRecord>>;

    /// Returns up to `limit` names containing `query` (case-insensitive), in
    /// data-source order.
    fn search_by_name_contains(
        &self,
        group: FoodGroup,
        query: &str,
        limit: u32,
    ) -> RepoResult<Vec<String>>;

    /// Returns the number of rows stored in one partition.
    fn count(&self, group: FoodGroup) -> RepoResult<u64>;
}

/// SQLite-backed food store; one table per food group.
pub struct SqliteFoodStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteFoodStore<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    /// Appends one record to a partition and returns its row id.
    ///
    /// Used by seeding/import flows; the lookup engine never writes.
    pub fn insert_food(&self, group: FoodGroup, record: &FoodRecord) -> RepoResult<i64> {
        insert_row(self.conn, group, record)
    }

    /// Appends many records to a partition in one transaction.
    ///
    /// Either every record is stored or none is.
    pub fn insert_foods(&self, group: FoodGroup, records: &[FoodRecord]) -> RepoResult<usize> {
        let tx = self.conn.unchecked_transaction()?;
        for record in records {
            insert_row(&tx, group, record)?;
        }
        tx.commit()?;
        Ok(records.len())
    }
}

impl FoodStore for SqliteFoodStore<'_> {
    fn list_all(&self, group: FoodGroup) -> RepoResult<Vec<FoodRecord>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT name, energy_kcal, calories, kcal, quantity_g
             FROM {}
             ORDER BY id ASC;",
            group.table()
        ))?;

        let mut rows = stmt.query([])?;
        let mut records = Vec::new();
        while let Some(row) = rows.next()? {
            records.push(parse_food_row(row, group)?);
        }

        Ok(records)
    }

    fn search_by_name_contains(
        &self,
        group: FoodGroup,
        query: &str,
        limit: u32,
    ) -> RepoResult<Vec<String>> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() || limit == 0 {
            return Ok(Vec::new());
        }

        // SQLite lower()/LIKE only fold ASCII, so matching happens here.
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT name FROM {} ORDER BY id ASC;", group.table()))?;
        let mut rows = stmt.query([])?;
        let mut names = Vec::new();

        while let Some(row) = rows.next()? {
            let name: String = row.get(0)?;
            if name.to_lowercase().contains(&needle) {
                names.push(name);
                if names.len() >= limit as usize {
                    break;
                }
            }
        }

        Ok(names)
    }

    fn count(&self, group: FoodGroup) -> RepoResult<u64> {
        let count: i64 = self.conn.query_row(
            &format!("SELECT COUNT(*) FROM {};", group.table()),
            [],
            |row| row.get(0),
        )?;
        u64::try_from(count)
            .map_err(|_| RepoError::InvalidData(format!("negative row count in {group}")))
    }
}

fn insert_row(conn: &Connection, group: FoodGroup, record: &FoodRecord) -> RepoResult<i64> {
    if !record.is_valid() {
        return Err(RepoError::InvalidData(format!(
            "food name cannot be empty in {group}"
        )));
    }

    conn.execute(
        &format!(
            "INSERT INTO {} (name, energy_kcal, calories, kcal, quantity_g)
             VALUES (?1, ?2, ?3, ?4, ?5);",
            group.table()
        ),
        params![
            record.name.trim(),
            record.energy_kcal,
            record.calories,
            record.kcal,
            record.reference_quantity_g,
        ],
    )?;

    Ok(conn.last_insert_rowid())
}

fn parse_food_row(row: &Row<'_>, group: FoodGroup) -> RepoResult<FoodRecord> {
    let name: String = row.get("name")?;
    let record = FoodRecord {
        energy_kcal: numeric_column(row, "energy_kcal", group)?,
        calories: numeric_column(row, "calories", group)?,
        kcal: numeric_column(row, "kcal", group)?,
        reference_quantity_g: numeric_column(row, "quantity_g", group)?,
        name,
    };

    if !record.is_valid() {
        return Err(RepoError::InvalidData(format!(
            "blank food name in {group}.name"
        )));
    }
    Ok(record)
}

/// Columns are declared without affinity, so legacy imports may hold text.
/// Binary values decode as missing, like unparsable text.
fn numeric_column(row: &Row<'_>, column: &str, group: FoodGroup) -> RepoResult<Option<f64>> {
    match row.get::<_, Value>(column)? {
        Value::Null => Ok(None),
        Value::Integer(value) => Ok(Some(value as f64)),
        Value::Real(value) => Ok(Some(value)),
        Value::Text(text) => Ok(parse_nutrient_text(&text)),
        Value::Blob(bytes) => {
            warn!(
                "event=food_decode module=repo status=skipped group={} column={} bytes={}",
                group,
                column,
                bytes.len()
            );
            Ok(None)
        }
    }
}
