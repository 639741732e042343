//! Shopping list model
//!
//! A named list of products with requested quantities. Lists are turned into
//! purchase orders, one per vendor.

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::DbResult;

/// A shopping list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShoppingList {
    pub id: i64,
    pub name: String,
    pub created_at: String,
}

/// A product on a shopping list, with the product and vendor details joined in
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShoppingListItem {
    pub id: i64,
    pub shopping_list_id: i64,
    pub product_id: i64,
    pub quantity_requested: f64,
    pub product_name: String,
    pub product_quantity: f64,
    pub unit: String,
    pub price: f64,
    pub vendor_id: i64,
    pub vendor_name: String,
}

/// A product to add to a shopping list
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShoppingListItemCreate {
    pub product_id: i64,
    /// Defaults to 1
    pub quantity_requested: Option<f64>,
}

impl ShoppingListItem {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            shopping_list_id: row.get("shopping_list_id")?,
            product_id: row.get("product_id")?,
            quantity_requested: row.get("quantity_requested")?,
            product_name: row.get("product_name")?,
            product_quantity: row.get("product_quantity")?,
            unit: row.get("unit")?,
            price: row.get("price")?,
            vendor_id: row.get("vendor_id")?,
            vendor_name: row.get("vendor_name")?,
        })
    }
}

impl ShoppingList {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            name: row.get("name")?,
            created_at: row.get("created_at")?,
        })
    }

    /// Insert a new, empty shopping list
    pub fn create(conn: &Connection, name: &str) -> DbResult<Self> {
        conn.execute("INSERT INTO shopping_lists (name) VALUES (?1)", [name.trim()])?;

        let id = conn.last_insert_rowid();
        Self::get_by_id(conn, id)?
            .ok_or_else(|| crate::db::DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows))
    }

    /// Get a shopping list by ID
    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let mut stmt =
            conn.prepare("SELECT id, name, created_at FROM shopping_lists WHERE id = ?1")?;

        match stmt.query_row([id], Self::from_row) {
            Ok(list) => Ok(Some(list)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// List shopping lists, newest first
    pub fn list(conn: &Connection) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare(
            "SELECT id, name, created_at FROM shopping_lists ORDER BY created_at DESC, id DESC",
        )?;

        let lists = stmt
            .query_map([], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(lists)
    }

    /// Items on a shopping list, in the order they were added
    pub fn items(conn: &Connection, shopping_list_id: i64) -> DbResult<Vec<ShoppingListItem>> {
        let mut stmt = conn.prepare(
            r#"
            SELECT sli.id, sli.shopping_list_id, sli.product_id, sli.quantity_requested,
                   p.name AS product_name, p.quantity AS product_quantity, p.unit, p.price,
                   p.vendor_id, v.name AS vendor_name
            FROM shopping_list_items sli
            JOIN products p ON p.id = sli.product_id
            JOIN vendors v ON v.id = p.vendor_id
            WHERE sli.shopping_list_id = ?1
            ORDER BY sli.id ASC
            "#,
        )?;

        let items = stmt
            .query_map([shopping_list_id], ShoppingListItem::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(items)
    }

    /// Add a product to a shopping list, returning the new item ID
    pub fn add_item(
        conn: &Connection,
        shopping_list_id: i64,
        item: &ShoppingListItemCreate,
    ) -> DbResult<i64> {
        conn.execute(
            r#"
            INSERT INTO shopping_list_items (shopping_list_id, product_id, quantity_requested)
            VALUES (?1, ?2, ?3)
            "#,
            params![
                shopping_list_id,
                item.product_id,
                item.quantity_requested.unwrap_or(1.0)
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// Remove an item from a shopping list. Returns false if it was not on the list.
    pub fn remove_item(conn: &Connection, shopping_list_id: i64, item_id: i64) -> DbResult<bool> {
        let rows = conn.execute(
            "DELETE FROM shopping_list_items WHERE id = ?1 AND shopping_list_id = ?2",
            params![item_id, shopping_list_id],
        )?;
        Ok(rows > 0)
    }

    /// Add and remove items in one transaction, returning the resulting items
    pub fn apply_changes(
        conn: &Connection,
        shopping_list_id: i64,
        add: &[ShoppingListItemCreate],
        remove: &[i64],
    ) -> DbResult<Vec<ShoppingListItem>> {
        let tx = conn.unchecked_transaction()?;

        for item in add {
            Self::add_item(&tx, shopping_list_id, item)?;
        }
        for item_id in remove {
            if !Self::remove_item(&tx, shopping_list_id, *item_id)? {
                tracing::debug!(
                    "Item {} not on shopping list {}, nothing removed",
                    item_id,
                    shopping_list_id
                );
            }
        }

        tx.commit()?;
        Self::items(conn, shopping_list_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrations::run_migrations;
    use crate::db::seed::seed_if_empty;

    fn seeded() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        seed_if_empty(&conn).unwrap();
        conn
    }

    fn add(product_id: i64, quantity_requested: Option<f64>) -> ShoppingListItemCreate {
        ShoppingListItemCreate {
            product_id,
            quantity_requested,
        }
    }

    #[test]
    fn test_items_join_product_and_vendor() {
        let conn = seeded();
        let list = ShoppingList::create(&conn, "Weekly").unwrap();

        let items = ShoppingList::apply_changes(&conn, list.id, &[add(1, Some(2.0)), add(7, None)], &[])
            .unwrap();

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].product_name, "Large eggs 15-dozen case");
        assert_eq!(items[0].quantity_requested, 2.0);
        assert_eq!(items[0].vendor_name, "Sysco");
        assert_eq!(items[1].quantity_requested, 1.0);
        assert_eq!(items[1].vendor_id, 2);
    }

    #[test]
    fn test_remove_only_from_own_list() {
        let conn = seeded();
        let a = ShoppingList::create(&conn, "A").unwrap();
        let b = ShoppingList::create(&conn, "B").unwrap();
        let item_id = ShoppingList::add_item(&conn, a.id, &add(3, None)).unwrap();

        assert!(!ShoppingList::remove_item(&conn, b.id, item_id).unwrap());
        let items = ShoppingList::apply_changes(&conn, a.id, &[add(4, None)], &[item_id]).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].product_id, 4);
    }

    #[test]
    fn test_list_newest_first() {
        let conn = seeded();
        ShoppingList::create(&conn, "First").unwrap();
        ShoppingList::create(&conn, "Second").unwrap();

        let names: Vec<String> = ShoppingList::list(&conn).unwrap().into_iter().map(|l| l.name).collect();
        assert_eq!(names, vec!["Second", "First"]);
    }
}
