//! Ingredient MCP Tools
//!
//! Ingredient management and the vendor price comparison.

use serde::Serialize;

use crate::db::Database;
use crate::models::{Ingredient, IngredientCreate, Product};
use crate::pricing::{ConversionTable, PriceComparison};

/// Ingredient with the number of products offered for it
#[derive(Debug, Serialize)]
pub struct IngredientDetail {
    pub id: i64,
    pub name: String,
    pub base_unit: String,
    pub created_at: String,
    pub product_count: i64,
}

/// Response for list_ingredients
#[derive(Debug, Serialize)]
pub struct ListIngredientsResponse {
    pub ingredients: Vec<Ingredient>,
    pub total: usize,
}

/// Response for compare_ingredient_prices
#[derive(Debug, Serialize)]
pub struct CompareIngredientPricesResponse {
    pub ingredient_id: i64,
    pub ingredient_name: String,
    #[serde(flatten)]
    pub comparison: PriceComparison<Product>,
}

/// Add a new ingredient
pub fn add_ingredient(db: &Database, data: IngredientCreate) -> Result<Ingredient, String> {
    if data.name.trim().is_empty() {
        return Err("Ingredient name cannot be empty".to_string());
    }
    if data.base_unit.trim().is_empty() {
        return Err("base_unit cannot be empty".to_string());
    }

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    Ingredient::create(&conn, &data).map_err(|e| format!("Failed to create ingredient: {}", e))
}

/// Get an ingredient by ID
pub fn get_ingredient(db: &Database, id: i64) -> Result<Option<IngredientDetail>, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let ingredient =
        Ingredient::get_by_id(&conn, id).map_err(|e| format!("Failed to get ingredient: {}", e))?;

    match ingredient {
        Some(ingredient) => {
            let product_count = Ingredient::product_count(&conn, id)
                .map_err(|e| format!("Failed to count products: {}", e))?;
            Ok(Some(IngredientDetail {
                id: ingredient.id,
                name: ingredient.name,
                base_unit: ingredient.base_unit.to_string(),
                created_at: ingredient.created_at,
                product_count,
            }))
        }
        None => Ok(None),
    }
}

/// List all ingredients
pub fn list_ingredients(db: &Database) -> Result<ListIngredientsResponse, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let ingredients =
        Ingredient::list(&conn).map_err(|e| format!("Failed to list ingredients: {}", e))?;
    let total = ingredients.len();

    Ok(ListIngredientsResponse { ingredients, total })
}

/// Rank every vendor product for an ingredient by price per base unit
///
/// Returns None if the ingredient does not exist.
pub fn compare_ingredient_prices(
    db: &Database,
    conversions: &ConversionTable,
    ingredient_id: i64,
) -> Result<Option<CompareIngredientPricesResponse>, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let ingredient = Ingredient::get_by_id(&conn, ingredient_id)
        .map_err(|e| format!("Failed to get ingredient: {}", e))?;
    let Some(ingredient) = ingredient else {
        return Ok(None);
    };

    let products = Product::list_for_ingredient(&conn, ingredient_id)
        .map_err(|e| format!("Failed to list products: {}", e))?;

    let comparison = PriceComparison::compute(conversions, &products, ingredient.base_unit.as_str());

    tracing::debug!(
        "Compared {} product(s) for ingredient {} in {}",
        comparison.offers.len(),
        ingredient.name,
        comparison.base_unit
    );

    Ok(Some(CompareIngredientPricesResponse {
        ingredient_id: ingredient.id,
        ingredient_name: ingredient.name,
        comparison,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::test_database;

    #[test]
    fn test_compare_seeded_eggs() {
        let (_dir, db) = test_database();
        let table = ConversionTable::standard();

        let result = compare_ingredient_prices(&db, &table, 1).unwrap().unwrap();
        assert_eq!(result.ingredient_name, "Eggs");
        assert_eq!(result.comparison.base_unit, "dozen");

        // 42/15 = 2.80, 78/30 = 2.60, 8.50/2.5 = 3.40, 3.20, 5.80
        let names: Vec<&str> = result
            .comparison
            .offers
            .iter()
            .map(|r| r.offer.name.as_str())
            .collect();
        assert_eq!(
            names,
            vec![
                "Large eggs case",
                "Large eggs 15-dozen case",
                "Large Grade A eggs",
                "Large eggs flat",
                "Organic large eggs",
            ]
        );

        let best: Vec<_> = result.comparison.best().collect();
        assert_eq!(best.len(), 1);
        assert_eq!(best[0].offer.vendor_name, "Restaurant Depot");
        assert_eq!(best[0].unit_price_display, "$2.60/dozen");
    }

    #[test]
    fn test_compare_unknown_ingredient() {
        let (_dir, db) = test_database();
        let table = ConversionTable::standard();
        assert!(compare_ingredient_prices(&db, &table, 99).unwrap().is_none());
    }

    #[test]
    fn test_compare_ingredient_without_products() {
        let (_dir, db) = test_database();
        let table = ConversionTable::standard();

        // Chicken breast has no seeded products
        let result = compare_ingredient_prices(&db, &table, 3).unwrap().unwrap();
        assert!(result.comparison.offers.is_empty());
        assert_eq!(result.comparison.best_unit_price, None);
    }

    #[test]
    fn test_add_ingredient_validation() {
        let (_dir, db) = test_database();
        let missing_unit = IngredientCreate {
            name: "Flour".into(),
            base_unit: " ".into(),
        };
        assert!(add_ingredient(&db, missing_unit).is_err());

        let flour = add_ingredient(
            &db,
            IngredientCreate {
                name: "Flour".into(),
                base_unit: "lb".into(),
            },
        )
        .unwrap();
        let detail = get_ingredient(&db, flour.id).unwrap().unwrap();
        assert_eq!(detail.base_unit, "lb");
        assert_eq!(detail.product_count, 0);
        assert_eq!(list_ingredients(&db).unwrap().total, 4);
    }
}
