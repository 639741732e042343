//! Order Guide MCP Server Implementation
//!
//! Implements the MCP server with all order guide tools.

use std::path::PathBuf;
use std::sync::Arc;

use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo,
};
use rmcp::{schemars, tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::db::Database;
use crate::models::{IngredientCreate, ProductCreate, ProductUpdate, ShoppingListItemCreate, VendorCreate};
use crate::pricing::ConversionTable;
use crate::tools::purchase_orders::OrderItemInput;
use crate::tools::status::StatusTracker;
use crate::tools::{ingredients, products, purchase_orders, shopping_lists, vendors};

/// Order Guide MCP Service
#[derive(Clone)]
pub struct OrderGuideService {
    status_tracker: Arc<Mutex<StatusTracker>>,
    database: Database,
    conversions: Arc<ConversionTable>,
    tool_router: ToolRouter<OrderGuideService>,
}

impl OrderGuideService {
    pub fn new(database_path: PathBuf, database: Database, conversions: Arc<ConversionTable>) -> Self {
        Self {
            status_tracker: Arc::new(Mutex::new(StatusTracker::new(database_path))),
            database,
            conversions,
            tool_router: Self::tool_router(),
        }
    }
}

/// Serialize a tool result as pretty JSON text content
fn json_result<T: Serialize>(value: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| McpError::internal_error(e.to_string(), None))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}

/// JSON body for a lookup that found nothing
fn not_found(what: &str, id: i64) -> Result<CallToolResult, McpError> {
    Ok(CallToolResult::success(vec![Content::text(format!(
        r#"{{"error": "{} not found", "id": {}}}"#,
        what, id
    ))]))
}

// ============================================================================
// Vendor / Ingredient Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct AddVendorParams {
    /// Vendor name (e.g., "Sysco")
    pub name: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct IdParams {
    pub id: i64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct AddIngredientParams {
    pub name: String,
    /// Unit prices are compared in, e.g. "dozen" or "lb". Cannot be changed later.
    pub base_unit: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct CompareIngredientPricesParams {
    pub ingredient_id: i64,
}

// ============================================================================
// Product Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct AddProductParams {
    pub vendor_id: i64,
    pub ingredient_id: i64,
    pub name: String,
    /// Package size, in `unit`s (e.g., 15 for a 15-dozen case)
    pub quantity: f64,
    /// Package unit: each, dozen, carton, case, lb, oz
    pub unit: String,
    /// Package price in dollars
    pub price: f64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ListProductsParams {
    pub ingredient_id: Option<i64>,
    pub vendor_id: Option<i64>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct UpdateProductParams {
    pub id: i64,
    pub name: Option<String>,
    pub quantity: Option<f64>,
    pub unit: Option<String>,
    pub price: Option<f64>,
}

// ============================================================================
// Shopping List Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct CreateShoppingListParams {
    pub name: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ShoppingListItemInput {
    pub product_id: i64,
    /// Number of packages (default: 1)
    pub quantity_requested: Option<f64>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct UpdateShoppingListItemsParams {
    /// Shopping list ID
    pub id: i64,
    /// Products to add
    #[serde(default)]
    pub add: Vec<ShoppingListItemInput>,
    /// Shopping list item IDs to remove
    #[serde(default)]
    pub remove: Vec<i64>,
}

// ============================================================================
// Purchase Order Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct PurchaseOrderItemParams {
    pub product_id: i64,
    pub quantity: f64,
    /// Defaults to the product's current price
    pub unit_price: Option<f64>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct CreatePurchaseOrderParams {
    pub vendor_id: i64,
    pub items: Vec<PurchaseOrderItemParams>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct CreateFromShoppingListParams {
    pub shopping_list_id: i64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct UpdatePurchaseOrderStatusParams {
    pub id: i64,
    /// draft, sent or confirmed
    pub status: String,
}

// ============================================================================
// Tool Implementations
// ============================================================================

#[tool_router]
impl OrderGuideService {
    // --- Status ---

    #[tool(description = "Get the current status of the order guide service including build info, database status, and process information")]
    async fn order_guide_status(&self) -> Result<CallToolResult, McpError> {
        let tracker = self.status_tracker.lock().await;
        let status = tracker.get_status();
        let json = serde_json::to_string_pretty(&status)
            .map_err(|e| McpError::internal_error(format!("Serialization error: {}", e), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    #[tool(description = "Get instructions for comparing vendor prices and building purchase orders. Call this when starting an ordering session.")]
    fn ordering_instructions(&self) -> Result<CallToolResult, McpError> {
        use crate::tools::status::ORDERING_INSTRUCTIONS;
        Ok(CallToolResult::success(vec![Content::text(ORDERING_INSTRUCTIONS)]))
    }

    // --- Vendors ---

    #[tool(description = "Add a vendor (supplier)")]
    fn add_vendor(&self, Parameters(p): Parameters<AddVendorParams>) -> Result<CallToolResult, McpError> {
        let result = vendors::add_vendor(&self.database, VendorCreate { name: p.name })
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Get a vendor with its product count")]
    fn get_vendor(&self, Parameters(p): Parameters<IdParams>) -> Result<CallToolResult, McpError> {
        match vendors::get_vendor(&self.database, p.id).map_err(|e| McpError::internal_error(e, None))? {
            Some(vendor) => json_result(&vendor),
            None => not_found("Vendor", p.id),
        }
    }

    #[tool(description = "List all vendors")]
    fn list_vendors(&self) -> Result<CallToolResult, McpError> {
        let result = vendors::list_vendors(&self.database).map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    // --- Ingredients ---

    #[tool(description = "Add an ingredient with the base unit its prices are compared in")]
    fn add_ingredient(&self, Parameters(p): Parameters<AddIngredientParams>) -> Result<CallToolResult, McpError> {
        let data = IngredientCreate { name: p.name, base_unit: p.base_unit };
        let result = ingredients::add_ingredient(&self.database, data).map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Get an ingredient with its product count")]
    fn get_ingredient(&self, Parameters(p): Parameters<IdParams>) -> Result<CallToolResult, McpError> {
        match ingredients::get_ingredient(&self.database, p.id).map_err(|e| McpError::internal_error(e, None))? {
            Some(ingredient) => json_result(&ingredient),
            None => not_found("Ingredient", p.id),
        }
    }

    #[tool(description = "List all ingredients")]
    fn list_ingredients(&self) -> Result<CallToolResult, McpError> {
        let result = ingredients::list_ingredients(&self.database).map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Rank every vendor product for an ingredient by price per base unit, cheapest first. Marks all offers tied for the lowest price as best and reports percent differences.")]
    fn compare_ingredient_prices(&self, Parameters(p): Parameters<CompareIngredientPricesParams>) -> Result<CallToolResult, McpError> {
        let result = ingredients::compare_ingredient_prices(&self.database, &self.conversions, p.ingredient_id)
            .map_err(|e| McpError::internal_error(e, None))?;
        match result {
            Some(comparison) => json_result(&comparison),
            None => not_found("Ingredient", p.ingredient_id),
        }
    }

    // --- Products ---

    #[tool(description = "Add a vendor product (package) for an ingredient. Returns a unit_warning if the unit cannot be converted to the ingredient's base unit.")]
    fn add_product(&self, Parameters(p): Parameters<AddProductParams>) -> Result<CallToolResult, McpError> {
        let data = ProductCreate {
            vendor_id: p.vendor_id, ingredient_id: p.ingredient_id, name: p.name,
            quantity: p.quantity, unit: p.unit, price: p.price,
        };
        let result = products::add_product(&self.database, &self.conversions, data)
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "List products, optionally filtered by ingredient and/or vendor")]
    fn list_products(&self, Parameters(p): Parameters<ListProductsParams>) -> Result<CallToolResult, McpError> {
        let result = products::list_products(&self.database, p.ingredient_id, p.vendor_id)
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Update a product's name, package quantity, unit or price")]
    fn update_product(&self, Parameters(p): Parameters<UpdateProductParams>) -> Result<CallToolResult, McpError> {
        let data = ProductUpdate { name: p.name, quantity: p.quantity, unit: p.unit, price: p.price };
        let result = products::update_product(&self.database, p.id, data).map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    // --- Shopping Lists ---

    #[tool(description = "Create an empty shopping list")]
    fn create_shopping_list(&self, Parameters(p): Parameters<CreateShoppingListParams>) -> Result<CallToolResult, McpError> {
        let result = shopping_lists::create_shopping_list(&self.database, &p.name)
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Get a shopping list with its items and estimated total")]
    fn get_shopping_list(&self, Parameters(p): Parameters<IdParams>) -> Result<CallToolResult, McpError> {
        match shopping_lists::get_shopping_list(&self.database, p.id).map_err(|e| McpError::internal_error(e, None))? {
            Some(list) => json_result(&list),
            None => not_found("Shopping list", p.id),
        }
    }

    #[tool(description = "List shopping lists, newest first")]
    fn list_shopping_lists(&self) -> Result<CallToolResult, McpError> {
        let result = shopping_lists::list_shopping_lists(&self.database).map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Add products to and/or remove items from a shopping list in one call")]
    fn update_shopping_list_items(&self, Parameters(p): Parameters<UpdateShoppingListItemsParams>) -> Result<CallToolResult, McpError> {
        let add = p
            .add
            .into_iter()
            .map(|i| ShoppingListItemCreate { product_id: i.product_id, quantity_requested: i.quantity_requested })
            .collect();
        let result = shopping_lists::update_shopping_list_items(&self.database, p.id, add, p.remove)
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    // --- Purchase Orders ---

    #[tool(description = "Create a draft purchase order for one vendor. Every product must belong to that vendor.")]
    fn create_purchase_order(&self, Parameters(p): Parameters<CreatePurchaseOrderParams>) -> Result<CallToolResult, McpError> {
        let items = p
            .items
            .into_iter()
            .map(|i| OrderItemInput { product_id: i.product_id, quantity: i.quantity, unit_price: i.unit_price })
            .collect();
        let result = purchase_orders::create_purchase_order(&self.database, p.vendor_id, items)
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Split a shopping list by vendor into draft purchase orders, one per vendor")]
    fn create_purchase_orders_from_shopping_list(&self, Parameters(p): Parameters<CreateFromShoppingListParams>) -> Result<CallToolResult, McpError> {
        let result = purchase_orders::create_purchase_orders_from_shopping_list(&self.database, p.shopping_list_id)
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Get a purchase order with its lines and total")]
    fn get_purchase_order(&self, Parameters(p): Parameters<IdParams>) -> Result<CallToolResult, McpError> {
        match purchase_orders::get_purchase_order(&self.database, p.id).map_err(|e| McpError::internal_error(e, None))? {
            Some(order) => json_result(&order),
            None => not_found("Purchase order", p.id),
        }
    }

    #[tool(description = "List purchase orders, newest first")]
    fn list_purchase_orders(&self) -> Result<CallToolResult, McpError> {
        let result = purchase_orders::list_purchase_orders(&self.database).map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Set a purchase order's status: draft, sent or confirmed")]
    fn update_purchase_order_status(&self, Parameters(p): Parameters<UpdatePurchaseOrderStatusParams>) -> Result<CallToolResult, McpError> {
        let result = purchase_orders::update_purchase_order_status(&self.database, p.id, &p.status)
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }
}

// ============================================================================
// Server Handler
// ============================================================================

#[tool_handler]
impl ServerHandler for OrderGuideService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "order-guide".into(),
                version: crate::build_info::VERSION.into(),
                title: Some("Order Guide".into()),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Order Guide - restaurant vendor price comparison and purchase orders. \
                 Call ordering_instructions first. \
                 Vendors: add/get/list_vendors. \
                 Ingredients: add/get/list_ingredients, compare_ingredient_prices (price per base unit, best offer first). \
                 Products: add/list/update_product. \
                 Shopping lists: create/get/list_shopping_lists, update_shopping_list_items. \
                 Purchase orders: create_purchase_order, create_purchase_orders_from_shopping_list (one draft per vendor), \
                 get/list_purchase_orders, update_purchase_order_status (draft, sent, confirmed)."
                    .into(),
            ),
        }
    }
}
