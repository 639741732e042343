//! Purchase order model
//!
//! Orders are per vendor. A shopping list spanning several vendors becomes
//! several draft orders, created together in one transaction.

use std::collections::HashMap;

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::{DbError, DbResult};
use super::ShoppingList;

/// Order status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    #[default]
    Draft,
    Sent,
    Confirmed,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Draft => "draft",
            OrderStatus::Sent => "sent",
            OrderStatus::Confirmed => "confirmed",
        }
    }

    /// Parse from string. Unknown values are rejected.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "draft" => Some(OrderStatus::Draft),
            "sent" => Some(OrderStatus::Sent),
            "confirmed" => Some(OrderStatus::Confirmed),
            _ => None,
        }
    }
}

/// A purchase order header
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurchaseOrder {
    pub id: i64,
    pub vendor_id: i64,
    pub vendor_name: String,
    pub status: OrderStatus,
    pub created_at: String,
}

/// A line on a purchase order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurchaseOrderItem {
    pub id: i64,
    pub purchase_order_id: i64,
    pub product_id: i64,
    pub product_name: String,
    pub unit: String,
    pub quantity: f64,
    pub unit_price: f64,
}

/// A requested product, tagged with the vendor that sells it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderLine {
    pub vendor_id: i64,
    pub product_id: i64,
    pub quantity: f64,
    pub unit_price: f64,
}

/// The lines destined for one vendor's order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VendorGroup {
    pub vendor_id: i64,
    pub lines: Vec<OrderLine>,
}

/// Partition lines by vendor
///
/// Groups appear in the order each vendor is first seen; lines keep their
/// relative order within a group.
pub fn partition_by_vendor(lines: &[OrderLine]) -> Vec<VendorGroup> {
    let mut groups: Vec<VendorGroup> = Vec::new();
    let mut index: HashMap<i64, usize> = HashMap::new();

    for line in lines {
        let slot = *index.entry(line.vendor_id).or_insert_with(|| {
            groups.push(VendorGroup {
                vendor_id: line.vendor_id,
                lines: Vec::new(),
            });
            groups.len() - 1
        });
        groups[slot].lines.push(line.clone());
    }

    groups
}

const ORDER_COLUMNS: &str = r#"
    po.id, po.vendor_id, po.status, po.created_at, v.name AS vendor_name
"#;

impl PurchaseOrder {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        let status: String = row.get("status")?;
        Ok(Self {
            id: row.get("id")?,
            vendor_id: row.get("vendor_id")?,
            vendor_name: row.get("vendor_name")?,
            status: OrderStatus::parse(&status).unwrap_or_default(),
            created_at: row.get("created_at")?,
        })
    }

    /// List purchase orders, newest first
    pub fn list(conn: &Connection) -> DbResult<Vec<Self>> {
        let sql = format!(
            r#"
            SELECT {} FROM purchase_orders po
            JOIN vendors v ON v.id = po.vendor_id
            ORDER BY po.created_at DESC, po.id DESC
            "#,
            ORDER_COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;

        let orders = stmt
            .query_map([], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(orders)
    }

    /// Get a purchase order by ID
    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let sql = format!(
            "SELECT {} FROM purchase_orders po JOIN vendors v ON v.id = po.vendor_id WHERE po.id = ?1",
            ORDER_COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;

        match stmt.query_row([id], Self::from_row) {
            Ok(order) => Ok(Some(order)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Lines on a purchase order
    pub fn items(conn: &Connection, purchase_order_id: i64) -> DbResult<Vec<PurchaseOrderItem>> {
        let mut stmt = conn.prepare(
            r#"
            SELECT poi.id, poi.purchase_order_id, poi.product_id, poi.quantity, poi.unit_price,
                   p.name AS product_name, p.unit
            FROM purchase_order_items poi
            JOIN products p ON p.id = poi.product_id
            WHERE poi.purchase_order_id = ?1
            ORDER BY poi.id ASC
            "#,
        )?;

        let items = stmt
            .query_map([purchase_order_id], |row| {
                Ok(PurchaseOrderItem {
                    id: row.get("id")?,
                    purchase_order_id: row.get("purchase_order_id")?,
                    product_id: row.get("product_id")?,
                    product_name: row.get("product_name")?,
                    unit: row.get("unit")?,
                    quantity: row.get("quantity")?,
                    unit_price: row.get("unit_price")?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(items)
    }

    /// Insert one draft order and its lines without opening a transaction
    fn insert_group(conn: &Connection, vendor_id: i64, lines: &[OrderLine]) -> DbResult<i64> {
        conn.execute(
            "INSERT INTO purchase_orders (vendor_id, status) VALUES (?1, ?2)",
            params![vendor_id, OrderStatus::Draft.as_str()],
        )?;
        let order_id = conn.last_insert_rowid();

        let mut insert_item = conn.prepare(
            r#"
            INSERT INTO purchase_order_items (purchase_order_id, product_id, quantity, unit_price)
            VALUES (?1, ?2, ?3, ?4)
            "#,
        )?;
        for line in lines {
            insert_item.execute(params![order_id, line.product_id, line.quantity, line.unit_price])?;
        }

        Ok(order_id)
    }

    /// Create a draft order for one vendor
    pub fn create(conn: &Connection, vendor_id: i64, lines: &[OrderLine]) -> DbResult<Self> {
        let tx = conn.unchecked_transaction()?;
        let order_id = Self::insert_group(&tx, vendor_id, lines)?;
        tx.commit()?;

        Self::get_by_id(conn, order_id)?
            .ok_or_else(|| DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows))
    }

    /// Create one draft order per vendor from a shopping list
    ///
    /// Each line is priced at the product's current package price.
    pub fn create_from_shopping_list(conn: &Connection, shopping_list_id: i64) -> DbResult<Vec<Self>> {
        let lines: Vec<OrderLine> = ShoppingList::items(conn, shopping_list_id)?
            .into_iter()
            .map(|item| OrderLine {
                vendor_id: item.vendor_id,
                product_id: item.product_id,
                quantity: item.quantity_requested,
                unit_price: item.price,
            })
            .collect();

        if lines.is_empty() {
            return Err(DbError::EmptyShoppingList(shopping_list_id));
        }

        let groups = partition_by_vendor(&lines);

        let tx = conn.unchecked_transaction()?;
        let mut order_ids = Vec::with_capacity(groups.len());
        for group in &groups {
            order_ids.push(Self::insert_group(&tx, group.vendor_id, &group.lines)?);
        }
        tx.commit()?;

        tracing::info!(
            "Created {} purchase order(s) from shopping list {}",
            order_ids.len(),
            shopping_list_id
        );

        let mut orders = Vec::with_capacity(order_ids.len());
        for id in order_ids {
            if let Some(order) = Self::get_by_id(conn, id)? {
                orders.push(order);
            }
        }
        Ok(orders)
    }

    /// Set an order's status. Returns None if the order does not exist.
    pub fn update_status(conn: &Connection, id: i64, status: OrderStatus) -> DbResult<Option<Self>> {
        let rows = conn.execute(
            "UPDATE purchase_orders SET status = ?1 WHERE id = ?2",
            params![status.as_str(), id],
        )?;
        if rows == 0 {
            return Ok(None);
        }
        Self::get_by_id(conn, id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrations::run_migrations;
    use crate::db::seed::seed_if_empty;
    use crate::models::ShoppingListItemCreate;

    fn seeded() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        seed_if_empty(&conn).unwrap();
        conn
    }

    fn line(vendor_id: i64, product_id: i64) -> OrderLine {
        OrderLine {
            vendor_id,
            product_id,
            quantity: 1.0,
            unit_price: 1.0,
        }
    }

    #[test]
    fn test_partition_preserves_first_seen_order() {
        let lines = vec![line(2, 10), line(1, 11), line(2, 12), line(3, 13), line(1, 14)];
        let groups = partition_by_vendor(&lines);

        let vendors: Vec<i64> = groups.iter().map(|g| g.vendor_id).collect();
        assert_eq!(vendors, vec![2, 1, 3]);

        let products: Vec<i64> = groups[0].lines.iter().map(|l| l.product_id).collect();
        assert_eq!(products, vec![10, 12]);
        assert_eq!(groups[1].lines.len(), 2);
        assert_eq!(groups[2].lines.len(), 1);
    }

    #[test]
    fn test_partition_empty() {
        assert!(partition_by_vendor(&[]).is_empty());
    }

    #[test]
    fn test_status_parse() {
        assert_eq!(OrderStatus::parse(" Sent"), Some(OrderStatus::Sent));
        assert_eq!(OrderStatus::parse("confirmed"), Some(OrderStatus::Confirmed));
        assert_eq!(OrderStatus::parse("cancelled"), None);
    }

    #[test]
    fn test_create_from_shopping_list() {
        let conn = seeded();
        let list = ShoppingList::create(&conn, "Friday").unwrap();
        let add = |product_id, quantity| ShoppingListItemCreate {
            product_id,
            quantity_requested: Some(quantity),
        };
        // Products 3 (US Foods), 1 (Sysco), 7 (US Foods)
        ShoppingList::apply_changes(&conn, list.id, &[add(3, 4.0), add(1, 1.0), add(7, 2.0)], &[])
            .unwrap();

        let orders = PurchaseOrder::create_from_shopping_list(&conn, list.id).unwrap();
        assert_eq!(orders.len(), 2);
        assert_eq!(orders[0].vendor_name, "US Foods");
        assert_eq!(orders[0].status, OrderStatus::Draft);
        assert_eq!(orders[1].vendor_name, "Sysco");

        let items = PurchaseOrder::items(&conn, orders[0].id).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].product_id, 3);
        assert_eq!(items[0].quantity, 4.0);
        assert_eq!(items[0].unit_price, 3.20);
        assert_eq!(items[1].product_name, "Butter unsalted 1lb");

        assert_eq!(PurchaseOrder::list(&conn).unwrap().len(), 2);
    }

    #[test]
    fn test_empty_shopping_list_rejected() {
        let conn = seeded();
        let list = ShoppingList::create(&conn, "Empty").unwrap();

        let err = PurchaseOrder::create_from_shopping_list(&conn, list.id).unwrap_err();
        assert!(matches!(err, DbError::EmptyShoppingList(id) if id == list.id));
        assert!(PurchaseOrder::list(&conn).unwrap().is_empty());
    }

    #[test]
    fn test_create_and_update_status() {
        let conn = seeded();
        let order = PurchaseOrder::create(&conn, 3, &[line(3, 5), line(3, 8)]).unwrap();
        assert_eq!(order.vendor_name, "Restaurant Depot");
        assert_eq!(PurchaseOrder::items(&conn, order.id).unwrap().len(), 2);

        let sent = PurchaseOrder::update_status(&conn, order.id, OrderStatus::Sent)
            .unwrap()
            .unwrap();
        assert_eq!(sent.status, OrderStatus::Sent);
        assert_eq!(PurchaseOrder::update_status(&conn, 999, OrderStatus::Sent).unwrap(), None);
    }
}
