// ==========================================
// Resto Supply - catalog repositories (supplier / item)
// ==========================================
// Responsibility: CRUD over supplier and item tables.
// Repositories contain no business logic.
// ==========================================

use crate::domain::catalog::{Item, Supplier};
use crate::domain::types::ItemCategory;
use crate::repository::db_utils::{ts_from_db, ts_to_db};
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, OptionalExtension, Result as SqliteResult, Row};
use std::sync::{Arc, Mutex, MutexGuard};

// ==========================================
// SupplierRepository
// ==========================================

pub struct SupplierRepository {
    conn: Arc<Mutex<Connection>>,
}

impl SupplierRepository {
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    fn map_row(row: &Row) -> SqliteResult<Supplier> {
        Ok(Supplier {
            supplier_id: row.get(0)?,
            name: row.get(1)?,
            contact_phone: row.get(2)?,
            contact_email: row.get(3)?,
            active: row.get::<_, i64>(4)? != 0,
            created_at: ts_from_db(&row.get::<_, String>(5)?),
            updated_at: ts_from_db(&row.get::<_, String>(6)?),
        })
    }

    const COLUMNS: &'static str =
        "supplier_id, name, contact_phone, contact_email, active, created_at, updated_at";

    /// Insert or replace a supplier.
    pub fn upsert(&self, supplier: &Supplier) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT OR REPLACE INTO supplier (
                supplier_id, name, contact_phone, contact_email, active, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
            params![
                supplier.supplier_id,
                supplier.name,
                supplier.contact_phone,
                supplier.contact_email,
                supplier.active as i64,
                ts_to_db(supplier.created_at),
                ts_to_db(supplier.updated_at),
            ],
        )?;
        Ok(())
    }

    /// Look up one supplier by id.
    pub fn find_by_id(&self, supplier_id: &str) -> RepositoryResult<Option<Supplier>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM supplier WHERE supplier_id = ?1",
            Self::COLUMNS
        ))?;
        let supplier = stmt
            .query_row(params![supplier_id], Self::map_row)
            .optional()?;
        Ok(supplier)
    }

    /// List active suppliers ordered by name.
    pub fn list_active(&self) -> RepositoryResult<Vec<Supplier>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM supplier WHERE active = 1 ORDER BY name",
            Self::COLUMNS
        ))?;
        let suppliers = stmt
            .query_map([], Self::map_row)?
            .collect::<SqliteResult<Vec<Supplier>>>()?;
        Ok(suppliers)
    }
}

// ==========================================
// ItemRepository
// ==========================================

pub struct ItemRepository {
    conn: Arc<Mutex<Connection>>,
}

impl ItemRepository {
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    const COLUMNS: &'static str = "code, name, category, canonical_unit, supplier_id, \
         current_unit_cost, lead_time_days, active, created_at, updated_at";

    fn map_row(row: &Row) -> SqliteResult<Item> {
        Ok(Item {
            code: row.get(0)?,
            name: row.get(1)?,
            category: ItemCategory::from_str(&row.get::<_, String>(2)?),
            canonical_unit: row.get(3)?,
            supplier_id: row.get(4)?,
            current_unit_cost: row.get(5)?,
            lead_time_days: row.get(6)?,
            active: row.get::<_, i64>(7)? != 0,
            created_at: ts_from_db(&row.get::<_, String>(8)?),
            updated_at: ts_from_db(&row.get::<_, String>(9)?),
        })
    }

    /// Insert or replace an item.
    pub fn upsert(&self, item: &Item) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT OR REPLACE INTO item (
                code, name, category, canonical_unit, supplier_id,
                current_unit_cost, lead_time_days, active, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
            params![
                item.code,
                item.name,
                item.category.to_db_str(),
                item.canonical_unit,
                item.supplier_id,
                item.current_unit_cost,
                item.lead_time_days,
                item.active as i64,
                ts_to_db(item.created_at),
                ts_to_db(item.updated_at),
            ],
        )?;
        Ok(())
    }

    /// Look up one item by its business code.
    pub fn find_by_code(&self, code: &str) -> RepositoryResult<Option<Item>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM item WHERE code = ?1",
            Self::COLUMNS
        ))?;
        let item = stmt.query_row(params![code], Self::map_row).optional()?;
        Ok(item)
    }

    /// List active items ordered by code.
    pub fn list_active(&self) -> RepositoryResult<Vec<Item>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM item WHERE active = 1 ORDER BY code",
            Self::COLUMNS
        ))?;
        let items = stmt
            .query_map([], Self::map_row)?
            .collect::<SqliteResult<Vec<Item>>>()?;
        Ok(items)
    }

    /// Overwrite the cached current unit cost (written by the standardizer).
    pub fn update_current_cost(&self, code: &str, unit_cost: f64) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let affected = conn.execute(
            "UPDATE item SET current_unit_cost = ?1, updated_at = ?2 WHERE code = ?3",
            params![unit_cost, ts_to_db(chrono::Utc::now()), code],
        )?;
        if affected == 0 {
            return Err(RepositoryError::NotFound {
                entity: "Item".to_string(),
                id: code.to_string(),
            });
        }
        Ok(())
    }

    /// Soft-deactivate an item (items are never hard-deleted).
    pub fn deactivate(&self, code: &str) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let affected = conn.execute(
            "UPDATE item SET active = 0, updated_at = ?1 WHERE code = ?2",
            params![ts_to_db(chrono::Utc::now()), code],
        )?;
        if affected == 0 {
            return Err(RepositoryError::NotFound {
                entity: "Item".to_string(),
                id: code.to_string(),
            });
        }
        Ok(())
    }
}
