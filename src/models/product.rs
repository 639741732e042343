//! Product model
//!
//! A vendor's priced package of an ingredient. Products are the offers that
//! get ranked when comparing prices for an ingredient.

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::DbResult;
use crate::pricing::Priced;

/// Columns selected for every product query (joined with the vendor name)
const PRODUCT_COLUMNS: &str = r#"
    p.id, p.vendor_id, p.ingredient_id, p.name, p.quantity, p.unit, p.price, p.created_at,
    v.name AS vendor_name
"#;

/// A vendor product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub vendor_id: i64,
    pub vendor_name: String,
    pub ingredient_id: i64,
    pub name: String,
    pub quantity: f64,
    pub unit: String,
    pub price: f64,
    pub created_at: String,
}

/// Data for creating a new product
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductCreate {
    pub vendor_id: i64,
    pub ingredient_id: i64,
    pub name: String,
    pub quantity: f64,
    pub unit: String,
    pub price: f64,
}

/// Data for updating a product
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub quantity: Option<f64>,
    pub unit: Option<String>,
    pub price: Option<f64>,
}

impl Priced for Product {
    fn price(&self) -> f64 {
        self.price
    }

    fn quantity(&self) -> f64 {
        self.quantity
    }

    fn unit(&self) -> &str {
        &self.unit
    }
}

impl Product {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            vendor_id: row.get("vendor_id")?,
            vendor_name: row.get("vendor_name")?,
            ingredient_id: row.get("ingredient_id")?,
            name: row.get("name")?,
            quantity: row.get("quantity")?,
            unit: row.get("unit")?,
            price: row.get("price")?,
            created_at: row.get("created_at")?,
        })
    }

    /// Insert a new product
    pub fn create(conn: &Connection, data: &ProductCreate) -> DbResult<Self> {
        conn.execute(
            r#"
            INSERT INTO products (vendor_id, ingredient_id, name, quantity, unit, price)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
            params![
                data.vendor_id,
                data.ingredient_id,
                data.name.trim(),
                data.quantity,
                data.unit.trim(),
                data.price,
            ],
        )?;

        let id = conn.last_insert_rowid();
        Self::get_by_id(conn, id)?
            .ok_or_else(|| crate::db::DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows))
    }

    /// Get a product by ID
    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let sql = format!(
            "SELECT {} FROM products p JOIN vendors v ON v.id = p.vendor_id WHERE p.id = ?1",
            PRODUCT_COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;

        match stmt.query_row([id], Self::from_row) {
            Ok(product) => Ok(Some(product)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// List products, optionally filtered by ingredient and/or vendor, by name
    pub fn list(
        conn: &Connection,
        ingredient_id: Option<i64>,
        vendor_id: Option<i64>,
    ) -> DbResult<Vec<Self>> {
        let mut sql = format!(
            "SELECT {} FROM products p JOIN vendors v ON v.id = p.vendor_id WHERE 1=1",
            PRODUCT_COLUMNS
        );
        let mut params_vec: Vec<i64> = Vec::new();

        if let Some(id) = ingredient_id {
            params_vec.push(id);
            sql.push_str(&format!(" AND p.ingredient_id = ?{}", params_vec.len()));
        }
        if let Some(id) = vendor_id {
            params_vec.push(id);
            sql.push_str(&format!(" AND p.vendor_id = ?{}", params_vec.len()));
        }
        sql.push_str(" ORDER BY p.name ASC");

        let mut stmt = conn.prepare(&sql)?;
        let products = stmt
            .query_map(rusqlite::params_from_iter(params_vec), Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(products)
    }

    /// All products offered for an ingredient, by package price
    pub fn list_for_ingredient(conn: &Connection, ingredient_id: i64) -> DbResult<Vec<Self>> {
        let sql = format!(
            r#"
            SELECT {} FROM products p
            JOIN vendors v ON v.id = p.vendor_id
            WHERE p.ingredient_id = ?1
            ORDER BY p.price ASC, p.id ASC
            "#,
            PRODUCT_COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;

        let products = stmt
            .query_map([ingredient_id], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(products)
    }

    /// Update a product. Returns the unchanged row when there is nothing to update.
    pub fn update(conn: &Connection, id: i64, data: &ProductUpdate) -> DbResult<Option<Self>> {
        let mut updates = Vec::new();
        let mut params_vec: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(ref name) = data.name {
            updates.push(format!("name = ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(name.trim().to_string()));
        }
        if let Some(quantity) = data.quantity {
            updates.push(format!("quantity = ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(quantity));
        }
        if let Some(ref unit) = data.unit {
            updates.push(format!("unit = ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(unit.trim().to_string()));
        }
        if let Some(price) = data.price {
            updates.push(format!("price = ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(price));
        }

        if updates.is_empty() {
            return Self::get_by_id(conn, id);
        }

        let sql = format!(
            "UPDATE products SET {} WHERE id = ?{}",
            updates.join(", "),
            params_vec.len() + 1
        );
        params_vec.push(Box::new(id));

        let params_refs: Vec<&dyn rusqlite::ToSql> = params_vec.iter().map(|p| p.as_ref()).collect();
        conn.execute(&sql, params_refs.as_slice())?;

        Self::get_by_id(conn, id)
    }
}
