//! Purchase Order MCP Tools
//!
//! Orders are drafted per vendor, either directly or by splitting a
//! shopping list across the vendors of its products.

use serde::{Deserialize, Serialize};

use crate::db::{Database, DbError};
use crate::models::{
    OrderLine, OrderStatus, Product, PurchaseOrder, PurchaseOrderItem, ShoppingList, Vendor,
};

/// A product and quantity for a new purchase order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItemInput {
    pub product_id: i64,
    pub quantity: f64,
    /// Defaults to the product's current package price
    pub unit_price: Option<f64>,
}

/// A purchase order with its lines
#[derive(Debug, Serialize)]
pub struct PurchaseOrderDetail {
    #[serde(flatten)]
    pub order: PurchaseOrder,
    pub items: Vec<PurchaseOrderItem>,
    pub total: f64,
}

/// Response for list_purchase_orders
#[derive(Debug, Serialize)]
pub struct ListPurchaseOrdersResponse {
    pub purchase_orders: Vec<PurchaseOrder>,
    pub total: usize,
}

/// Response for create_purchase_orders_from_shopping_list
#[derive(Debug, Serialize)]
pub struct CreateFromShoppingListResponse {
    pub shopping_list_id: i64,
    pub purchase_orders: Vec<PurchaseOrderDetail>,
}

fn detail(
    conn: &rusqlite::Connection,
    order: PurchaseOrder,
) -> Result<PurchaseOrderDetail, String> {
    let items = PurchaseOrder::items(conn, order.id)
        .map_err(|e| format!("Failed to get purchase order items: {}", e))?;
    let total = items.iter().map(|i| i.quantity * i.unit_price).sum();
    Ok(PurchaseOrderDetail {
        order,
        items,
        total,
    })
}

/// Create a draft purchase order for one vendor
pub fn create_purchase_order(
    db: &Database,
    vendor_id: i64,
    items: Vec<OrderItemInput>,
) -> Result<PurchaseOrderDetail, String> {
    if items.is_empty() {
        return Err("A purchase order needs at least one item".to_string());
    }
    for item in &items {
        if !item.quantity.is_finite() || item.quantity <= 0.0 {
            return Err(format!(
                "quantity must be greater than 0 (product {})",
                item.product_id
            ));
        }
        if let Some(price) = item.unit_price {
            if !price.is_finite() || price < 0.0 {
                return Err(format!(
                    "unit_price cannot be negative (product {})",
                    item.product_id
                ));
            }
        }
    }

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    if Vendor::get_by_id(&conn, vendor_id)
        .map_err(|e| format!("Database error: {}", e))?
        .is_none()
    {
        return Err(format!("Vendor not found with id: {}", vendor_id));
    }

    let mut lines = Vec::with_capacity(items.len());
    for item in &items {
        let product = Product::get_by_id(&conn, item.product_id)
            .map_err(|e| format!("Database error: {}", e))?
            .ok_or_else(|| format!("Product not found with id: {}", item.product_id))?;
        if product.vendor_id != vendor_id {
            return Err(format!(
                "Product {} is sold by {}, not vendor {}",
                product.id, product.vendor_name, vendor_id
            ));
        }
        lines.push(OrderLine {
            vendor_id,
            product_id: product.id,
            quantity: item.quantity,
            unit_price: item.unit_price.unwrap_or(product.price),
        });
    }

    let order = PurchaseOrder::create(&conn, vendor_id, &lines)
        .map_err(|e| format!("Failed to create purchase order: {}", e))?;
    tracing::info!("Created purchase order {} for {}", order.id, order.vendor_name);

    detail(&conn, order)
}

/// Split a shopping list into one draft purchase order per vendor
pub fn create_purchase_orders_from_shopping_list(
    db: &Database,
    shopping_list_id: i64,
) -> Result<CreateFromShoppingListResponse, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    if ShoppingList::get_by_id(&conn, shopping_list_id)
        .map_err(|e| format!("Database error: {}", e))?
        .is_none()
    {
        return Err(format!("Shopping list not found with id: {}", shopping_list_id));
    }

    let orders = match PurchaseOrder::create_from_shopping_list(&conn, shopping_list_id) {
        Ok(orders) => orders,
        Err(DbError::EmptyShoppingList(id)) => {
            return Err(format!("Shopping list {} has no items", id));
        }
        Err(e) => return Err(format!("Failed to create purchase orders: {}", e)),
    };

    let purchase_orders = orders
        .into_iter()
        .map(|order| detail(&conn, order))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(CreateFromShoppingListResponse {
        shopping_list_id,
        purchase_orders,
    })
}

/// Get a purchase order with its lines
pub fn get_purchase_order(db: &Database, id: i64) -> Result<Option<PurchaseOrderDetail>, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let order = PurchaseOrder::get_by_id(&conn, id)
        .map_err(|e| format!("Failed to get purchase order: {}", e))?;

    order.map(|order| detail(&conn, order)).transpose()
}

/// List purchase orders, newest first
pub fn list_purchase_orders(db: &Database) -> Result<ListPurchaseOrdersResponse, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let purchase_orders =
        PurchaseOrder::list(&conn).map_err(|e| format!("Failed to list purchase orders: {}", e))?;
    let total = purchase_orders.len();

    Ok(ListPurchaseOrdersResponse {
        purchase_orders,
        total,
    })
}

/// Set a purchase order's status (draft, sent or confirmed)
pub fn update_purchase_order_status(
    db: &Database,
    id: i64,
    status: &str,
) -> Result<PurchaseOrder, String> {
    let status = OrderStatus::parse(status).ok_or_else(|| {
        format!(
            "Invalid status '{}'. Expected one of: draft, sent, confirmed",
            status
        )
    })?;

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    PurchaseOrder::update_status(&conn, id, status)
        .map_err(|e| format!("Failed to update purchase order: {}", e))?
        .ok_or_else(|| format!("Purchase order not found with id: {}", id))
}
