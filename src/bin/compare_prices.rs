//! Utility to print the vendor price comparison for an ingredient
//!
//! Usage: compare_prices <ingredient_id>

use order_guide::db::{default_database_path, migrations, Database};
use order_guide::pricing::ConversionTable;
use order_guide::tools::ingredients::compare_ingredient_prices;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let ingredient_id: i64 = match std::env::args().nth(1).map(|s| s.parse()) {
        Some(Ok(id)) => id,
        _ => {
            eprintln!("Usage: compare_prices <ingredient_id>");
            std::process::exit(2);
        }
    };

    let db_path = default_database_path();
    let database = Database::new(&db_path)?;
    database.with_conn(|conn| migrations::run_migrations(conn))?;

    let table = ConversionTable::standard();
    let Some(result) = compare_ingredient_prices(&database, &table, ingredient_id)? else {
        eprintln!("Ingredient {} not found", ingredient_id);
        std::process::exit(1);
    };

    println!(
        "{} (#{}) - price per {}",
        result.ingredient_name, result.ingredient_id, result.comparison.base_unit
    );

    if result.comparison.offers.is_empty() {
        println!("  No products");
        return Ok(());
    }

    for (rank, row) in result.comparison.offers.iter().enumerate() {
        let note = match (row.is_best_price, row.percent_better_than_next, row.percent_above_best) {
            (true, Some(pct), _) => format!("BEST, {}% better than next", pct),
            (true, None, _) => "BEST".to_string(),
            (false, _, Some(pct)) => format!("+{}%", pct),
            (false, _, None) => String::new(),
        };
        println!(
            "  {:>2}. {:<14} {:>12}  {:<30} {} {} @ ${:.2}  {}",
            rank + 1,
            row.offer.vendor_name,
            row.unit_price_display,
            row.offer.name,
            row.offer.quantity,
            row.offer.unit,
            row.offer.price,
            note
        );
    }

    Ok(())
}
