//! Vendor MCP Tools

use serde::Serialize;

use crate::db::Database;
use crate::models::{Product, Vendor, VendorCreate};

/// Vendor with the number of products it sells
#[derive(Debug, Serialize)]
pub struct VendorDetail {
    pub id: i64,
    pub name: String,
    pub created_at: String,
    pub product_count: usize,
}

/// Response for list_vendors
#[derive(Debug, Serialize)]
pub struct ListVendorsResponse {
    pub vendors: Vec<Vendor>,
    pub total: usize,
}

/// Add a new vendor
pub fn add_vendor(db: &Database, data: VendorCreate) -> Result<Vendor, String> {
    if data.name.trim().is_empty() {
        return Err("Vendor name cannot be empty".to_string());
    }

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    Vendor::create(&conn, &data).map_err(|e| format!("Failed to create vendor: {}", e))
}

/// Get a vendor by ID
pub fn get_vendor(db: &Database, id: i64) -> Result<Option<VendorDetail>, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let vendor = Vendor::get_by_id(&conn, id).map_err(|e| format!("Failed to get vendor: {}", e))?;

    match vendor {
        Some(vendor) => {
            let products = Product::list(&conn, None, Some(id))
                .map_err(|e| format!("Failed to list vendor products: {}", e))?;
            Ok(Some(VendorDetail {
                id: vendor.id,
                name: vendor.name,
                created_at: vendor.created_at,
                product_count: products.len(),
            }))
        }
        None => Ok(None),
    }
}

/// List all vendors
pub fn list_vendors(db: &Database) -> Result<ListVendorsResponse, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let vendors = Vendor::list(&conn).map_err(|e| format!("Failed to list vendors: {}", e))?;
    let total = vendors.len();

    Ok(ListVendorsResponse { vendors, total })
}
