//! Product MCP Tools
//!
//! Vendor products are the offers compared for each ingredient.

use serde::Serialize;

use crate::db::Database;
use crate::models::{Ingredient, Product, ProductCreate, ProductUpdate, Vendor};
use crate::pricing::{ConversionTable, Unit};

/// Response for add_product
#[derive(Debug, Serialize)]
pub struct AddProductResponse {
    #[serde(flatten)]
    pub product: Product,
    /// Set when the product's unit has no known conversion to the ingredient's base unit
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit_warning: Option<String>,
}

/// Response for list_products
#[derive(Debug, Serialize)]
pub struct ListProductsResponse {
    pub products: Vec<Product>,
    pub total: usize,
}

fn validate_amount(field: &str, value: f64) -> Result<(), String> {
    if !value.is_finite() {
        return Err(format!("{} must be a finite number", field));
    }
    if value < 0.0 {
        return Err(format!("{} cannot be negative", field));
    }
    Ok(())
}

/// Warning text for a unit that will be compared 1:1 with the base unit
fn unit_warning(conversions: &ConversionTable, unit: &str, base_unit: &Unit) -> Option<String> {
    let unit = Unit::from(unit);
    if conversions.has_conversion(&unit, base_unit) {
        return None;
    }
    Some(format!(
        "No conversion from '{}' to '{}'; prices will be compared as if 1 {} = 1 {}",
        unit, base_unit, unit, base_unit
    ))
}

/// Add a new product for a vendor and ingredient
pub fn add_product(
    db: &Database,
    conversions: &ConversionTable,
    data: ProductCreate,
) -> Result<AddProductResponse, String> {
    if data.name.trim().is_empty() {
        return Err("Product name cannot be empty".to_string());
    }
    if data.unit.trim().is_empty() {
        return Err("unit cannot be empty".to_string());
    }
    validate_amount("quantity", data.quantity)?;
    validate_amount("price", data.price)?;

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    if Vendor::get_by_id(&conn, data.vendor_id)
        .map_err(|e| format!("Database error: {}", e))?
        .is_none()
    {
        return Err(format!("Vendor not found with id: {}", data.vendor_id));
    }
    let ingredient = Ingredient::get_by_id(&conn, data.ingredient_id)
        .map_err(|e| format!("Database error: {}", e))?
        .ok_or_else(|| format!("Ingredient not found with id: {}", data.ingredient_id))?;

    let product =
        Product::create(&conn, &data).map_err(|e| format!("Failed to create product: {}", e))?;

    let unit_warning = unit_warning(conversions, &product.unit, &ingredient.base_unit);
    if let Some(ref warning) = unit_warning {
        tracing::warn!("Product {}: {}", product.id, warning);
    }

    Ok(AddProductResponse {
        product,
        unit_warning,
    })
}

/// List products, optionally filtered by ingredient and/or vendor
pub fn list_products(
    db: &Database,
    ingredient_id: Option<i64>,
    vendor_id: Option<i64>,
) -> Result<ListProductsResponse, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let products = Product::list(&conn, ingredient_id, vendor_id)
        .map_err(|e| format!("Failed to list products: {}", e))?;
    let total = products.len();

    Ok(ListProductsResponse { products, total })
}

/// Update a product's name, quantity, unit or price
pub fn update_product(db: &Database, id: i64, data: ProductUpdate) -> Result<Product, String> {
    if let Some(ref name) = data.name {
        if name.trim().is_empty() {
            return Err("Product name cannot be empty".to_string());
        }
    }
    if let Some(ref unit) = data.unit {
        if unit.trim().is_empty() {
            return Err("unit cannot be empty".to_string());
        }
    }
    if let Some(quantity) = data.quantity {
        validate_amount("quantity", quantity)?;
    }
    if let Some(price) = data.price {
        validate_amount("price", price)?;
    }

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    Product::update(&conn, id, &data)
        .map_err(|e| format!("Failed to update product: {}", e))?
        .ok_or_else(|| format!("Product not found with id: {}", id))
}
