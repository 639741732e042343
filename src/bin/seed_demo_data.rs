//! Utility to load the demo vendors, ingredients and products

use order_guide::db::{default_database_path, migrations, seed, Database};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let db_path = default_database_path();
    println!("Database path: {}", db_path.display());

    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let database = Database::new(&db_path)?;

    let inserted = database.with_conn(|conn| {
        migrations::run_migrations(conn)?;
        seed::seed_if_empty(conn)
    })?;

    if inserted {
        println!("Demo data inserted: 3 vendors, 3 ingredients, 8 products");
    } else {
        println!("Database already has vendors; nothing inserted");
    }

    Ok(())
}
