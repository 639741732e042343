//! Vendor model
//!
//! A supplier the kitchen buys from.

use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::DbResult;

/// A vendor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vendor {
    pub id: i64,
    pub name: String,
    pub created_at: String,
}

/// Data for creating a new vendor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VendorCreate {
    pub name: String,
}

impl Vendor {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            name: row.get("name")?,
            created_at: row.get("created_at")?,
        })
    }

    /// Insert a new vendor
    pub fn create(conn: &Connection, data: &VendorCreate) -> DbResult<Self> {
        conn.execute("INSERT INTO vendors (name) VALUES (?1)", [data.name.trim()])?;

        let id = conn.last_insert_rowid();
        Self::get_by_id(conn, id)?
            .ok_or_else(|| crate::db::DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows))
    }

    /// Get a vendor by ID
    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT id, name, created_at FROM vendors WHERE id = ?1")?;

        match stmt.query_row([id], Self::from_row) {
            Ok(vendor) => Ok(Some(vendor)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// List all vendors by name
    pub fn list(conn: &Connection) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare("SELECT id, name, created_at FROM vendors ORDER BY name ASC")?;

        let vendors = stmt
            .query_map([], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(vendors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrations::run_migrations;

    #[test]
    fn test_create_and_list() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();

        let sysco = Vendor::create(&conn, &VendorCreate { name: " Sysco ".into() }).unwrap();
        Vendor::create(&conn, &VendorCreate { name: "Restaurant Depot".into() }).unwrap();

        assert_eq!(sysco.name, "Sysco");
        assert_eq!(Vendor::get_by_id(&conn, sysco.id).unwrap(), Some(sysco));
        assert_eq!(Vendor::get_by_id(&conn, 999).unwrap(), None);

        let names: Vec<String> = Vendor::list(&conn).unwrap().into_iter().map(|v| v.name).collect();
        assert_eq!(names, vec!["Restaurant Depot", "Sysco"]);
    }
}
