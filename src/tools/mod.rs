//! Order Guide tools module
//!
//! MCP tool implementations for the order guide.

pub mod ingredients;
pub mod products;
pub mod purchase_orders;
pub mod shopping_lists;
pub mod status;
pub mod vendors;

/// A migrated, seeded database in a temporary directory
#[cfg(test)]
pub(crate) fn test_database() -> (tempfile::TempDir, crate::db::Database) {
    let dir = tempfile::tempdir().unwrap();
    let db = crate::db::Database::new(dir.path().join("order-guide.db")).unwrap();
    db.with_conn(|conn| {
        crate::db::migrations::run_migrations(conn)?;
        crate::db::seed::seed_if_empty(conn)?;
        Ok(())
    })
    .unwrap();
    (dir, db)
}
