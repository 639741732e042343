//! Demo data
//!
//! Three vendors, three ingredients and a handful of egg and butter products.

use rusqlite::Connection;

use super::connection::DbResult;

/// Insert the demo data if the database has no vendors yet
///
/// Returns true if data was inserted.
pub fn seed_if_empty(conn: &Connection) -> DbResult<bool> {
    let vendor_count: i64 = conn.query_row("SELECT COUNT(*) FROM vendors", [], |row| row.get(0))?;
    if vendor_count > 0 {
        tracing::debug!("Skipping demo data: {} vendors present", vendor_count);
        return Ok(false);
    }

    let tx = conn.unchecked_transaction()?;
    tx.execute_batch(
        r#"
        INSERT INTO vendors (name) VALUES ('Sysco'), ('US Foods'), ('Restaurant Depot');

        INSERT INTO ingredients (name, base_unit) VALUES
            ('Eggs', 'dozen'),
            ('Butter', 'lb'),
            ('Chicken breast', 'lb');

        INSERT INTO products (vendor_id, ingredient_id, name, quantity, unit, price) VALUES
            (1, 1, 'Large eggs 15-dozen case', 15, 'dozen', 42.00),
            (1, 1, 'Large eggs flat', 2.5, 'dozen', 8.50),
            (2, 1, 'Large Grade A eggs', 1, 'dozen', 3.20),
            (2, 1, 'Organic large eggs', 1, 'dozen', 5.80),
            (3, 1, 'Large eggs case', 30, 'dozen', 78.00),
            (1, 2, 'Butter salted 1lb', 1, 'lb', 5.50),
            (2, 2, 'Butter unsalted 1lb', 1, 'lb', 5.90),
            (3, 2, 'Butter 5lb block', 5, 'lb', 24.00);
        "#,
    )?;
    tx.commit()?;

    tracing::info!("Demo data inserted");
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrations::run_migrations;

    #[test]
    fn test_seed_only_once() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();

        assert!(seed_if_empty(&conn).unwrap());
        assert!(!seed_if_empty(&conn).unwrap());

        let products: i64 = conn
            .query_row("SELECT COUNT(*) FROM products", [], |row| row.get(0))
            .unwrap();
        assert_eq!(products, 8);
    }
}
