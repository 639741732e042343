//! Data models
//!
//! Rust structs representing database entities.

mod ingredient;
mod product;
mod purchase_order;
mod shopping_list;
mod vendor;

pub use ingredient::{Ingredient, IngredientCreate};
pub use product::{Product, ProductCreate, ProductUpdate};
pub use purchase_order::{
    partition_by_vendor, OrderLine, OrderStatus, PurchaseOrder, PurchaseOrderItem, VendorGroup,
};
pub use shopping_list::{ShoppingList, ShoppingListItem, ShoppingListItemCreate};
pub use vendor::{Vendor, VendorCreate};
