//! Shopping List MCP Tools

use serde::Serialize;

use crate::db::Database;
use crate::models::{Product, ShoppingList, ShoppingListItem, ShoppingListItemCreate};

/// A shopping list with its items
#[derive(Debug, Serialize)]
pub struct ShoppingListDetail {
    pub id: i64,
    pub name: String,
    pub created_at: String,
    pub items: Vec<ShoppingListItem>,
    /// Sum of package price times quantity requested
    pub estimated_total: f64,
}

/// Response for list_shopping_lists
#[derive(Debug, Serialize)]
pub struct ListShoppingListsResponse {
    pub shopping_lists: Vec<ShoppingList>,
    pub total: usize,
}

/// Response for update_shopping_list_items
#[derive(Debug, Serialize)]
pub struct UpdateShoppingListItemsResponse {
    pub shopping_list_id: i64,
    pub items: Vec<ShoppingListItem>,
}

/// Create a new, empty shopping list
pub fn create_shopping_list(db: &Database, name: &str) -> Result<ShoppingList, String> {
    if name.trim().is_empty() {
        return Err("Shopping list name cannot be empty".to_string());
    }

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    ShoppingList::create(&conn, name).map_err(|e| format!("Failed to create shopping list: {}", e))
}

/// Get a shopping list with its items
pub fn get_shopping_list(db: &Database, id: i64) -> Result<Option<ShoppingListDetail>, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let list = ShoppingList::get_by_id(&conn, id)
        .map_err(|e| format!("Failed to get shopping list: {}", e))?;

    match list {
        Some(list) => {
            let items = ShoppingList::items(&conn, id)
                .map_err(|e| format!("Failed to get shopping list items: {}", e))?;
            let estimated_total = items.iter().map(|i| i.price * i.quantity_requested).sum();

            Ok(Some(ShoppingListDetail {
                id: list.id,
                name: list.name,
                created_at: list.created_at,
                items,
                estimated_total,
            }))
        }
        None => Ok(None),
    }
}

/// List shopping lists, newest first
pub fn list_shopping_lists(db: &Database) -> Result<ListShoppingListsResponse, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let shopping_lists =
        ShoppingList::list(&conn).map_err(|e| format!("Failed to list shopping lists: {}", e))?;
    let total = shopping_lists.len();

    Ok(ListShoppingListsResponse {
        shopping_lists,
        total,
    })
}

/// Add and/or remove items on a shopping list
pub fn update_shopping_list_items(
    db: &Database,
    id: i64,
    add: Vec<ShoppingListItemCreate>,
    remove: Vec<i64>,
) -> Result<UpdateShoppingListItemsResponse, String> {
    for item in &add {
        if let Some(quantity) = item.quantity_requested {
            if !quantity.is_finite() || quantity <= 0.0 {
                return Err(format!(
                    "quantity_requested must be greater than 0 (product {})",
                    item.product_id
                ));
            }
        }
    }

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    if ShoppingList::get_by_id(&conn, id)
        .map_err(|e| format!("Database error: {}", e))?
        .is_none()
    {
        return Err(format!("Shopping list not found with id: {}", id));
    }

    for item in &add {
        if Product::get_by_id(&conn, item.product_id)
            .map_err(|e| format!("Database error: {}", e))?
            .is_none()
        {
            return Err(format!("Product not found with id: {}", item.product_id));
        }
    }

    let items = ShoppingList::apply_changes(&conn, id, &add, &remove)
        .map_err(|e| format!("Failed to update shopping list: {}", e))?;

    Ok(UpdateShoppingListItemsResponse {
        shopping_list_id: id,
        items,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::test_database;

    #[test]
    fn test_shopping_list_flow() {
        let (_dir, db) = test_database();
        let list = create_shopping_list(&db, "Weekend prep").unwrap();

        let add = vec![
            ShoppingListItemCreate {
                product_id: 3,
                quantity_requested: Some(10.0),
            },
            ShoppingListItemCreate {
                product_id: 8,
                quantity_requested: None,
            },
        ];
        let updated = update_shopping_list_items(&db, list.id, add, vec![]).unwrap();
        assert_eq!(updated.items.len(), 2);

        let detail = get_shopping_list(&db, list.id).unwrap().unwrap();
        // 10 x 3.20 + 1 x 24.00
        assert!((detail.estimated_total - 56.0).abs() < 1e-9);

        let first_item = detail.items[0].id;
        let updated = update_shopping_list_items(&db, list.id, vec![], vec![first_item]).unwrap();
        assert_eq!(updated.items.len(), 1);
        assert_eq!(list_shopping_lists(&db).unwrap().total, 1);
    }

    #[test]
    fn test_update_rejects_bad_input() {
        let (_dir, db) = test_database();
        let list = create_shopping_list(&db, "Bad").unwrap();

        let zero = vec![ShoppingListItemCreate {
            product_id: 1,
            quantity_requested: Some(0.0),
        }];
        assert!(update_shopping_list_items(&db, list.id, zero, vec![]).is_err());

        let missing = vec![ShoppingListItemCreate {
            product_id: 999,
            quantity_requested: None,
        }];
        assert!(update_shopping_list_items(&db, list.id, missing, vec![]).is_err());
        assert!(update_shopping_list_items(&db, 999, vec![], vec![]).is_err());
        assert!(create_shopping_list(&db, "").is_err());
    }
}
