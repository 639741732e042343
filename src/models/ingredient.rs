//! Ingredient model
//!
//! An ingredient's base unit is what every vendor product for it is priced
//! against. It is set on creation and has no update path.

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::DbResult;
use crate::pricing::Unit;

/// An ingredient
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    pub id: i64,
    pub name: String,
    pub base_unit: Unit,
    pub created_at: String,
}

/// Data for creating a new ingredient
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngredientCreate {
    pub name: String,
    pub base_unit: String,
}

impl Ingredient {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            name: row.get("name")?,
            base_unit: Unit::new(row.get::<_, String>("base_unit")?),
            created_at: row.get("created_at")?,
        })
    }

    /// Insert a new ingredient
    pub fn create(conn: &Connection, data: &IngredientCreate) -> DbResult<Self> {
        conn.execute(
            "INSERT INTO ingredients (name, base_unit) VALUES (?1, ?2)",
            params![data.name.trim(), data.base_unit.trim()],
        )?;

        let id = conn.last_insert_rowid();
        Self::get_by_id(conn, id)?
            .ok_or_else(|| crate::db::DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows))
    }

    /// Get an ingredient by ID
    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare(
            "SELECT id, name, base_unit, created_at FROM ingredients WHERE id = ?1",
        )?;

        match stmt.query_row([id], Self::from_row) {
            Ok(ingredient) => Ok(Some(ingredient)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// List all ingredients by name
    pub fn list(conn: &Connection) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare(
            "SELECT id, name, base_unit, created_at FROM ingredients ORDER BY name ASC",
        )?;

        let ingredients = stmt
            .query_map([], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ingredients)
    }

    /// Number of products offered for this ingredient
    pub fn product_count(conn: &Connection, id: i64) -> DbResult<i64> {
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM products WHERE ingredient_id = ?1",
            [id],
            |row| row.get(0),
        )?;
        Ok(count)
    }
}
