// ==========================================
// Resto Supply - inventory repository
// ==========================================
// Responsibility: per-item-per-location stock records.
// Stock additions happen only from approved sources (order receipt);
// that rule is enforced by the callers, not here.
// ==========================================

use crate::domain::inventory::InventoryRecord;
use crate::repository::db_utils::{ts_from_db, ts_to_db};
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Result as SqliteResult, Row};
use std::sync::{Arc, Mutex, MutexGuard};

pub struct InventoryRepository {
    conn: Arc<Mutex<Connection>>,
}

impl InventoryRepository {
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    fn map_row(row: &Row) -> SqliteResult<InventoryRecord> {
        Ok(InventoryRecord {
            item_code: row.get(0)?,
            location: row.get(1)?,
            on_hand_qty: row.get(2)?,
            min_qty: row.get(3)?,
            updated_at: ts_from_db(&row.get::<_, String>(4)?),
        })
    }

    /// Insert or replace one stock record.
    pub fn upsert(&self, record: &InventoryRecord) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT OR REPLACE INTO inventory (
                item_code, location, on_hand_qty, min_qty, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![
                record.item_code,
                record.location,
                record.on_hand_qty,
                record.min_qty,
                ts_to_db(record.updated_at),
            ],
        )?;
        Ok(())
    }

    /// Current stock for one item at one location.
    pub fn find(
        &self,
        item_code: &str,
        location: &str,
    ) -> RepositoryResult<Option<InventoryRecord>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT item_code, location, on_hand_qty, min_qty, updated_at
            FROM inventory
            WHERE item_code = ?1 AND location = ?2
            "#,
        )?;
        let record = stmt
            .query_row(params![item_code, location], Self::map_row)
            .optional()?;
        Ok(record)
    }

    /// All stock records at one location, ordered by item code.
    pub fn list_by_location(&self, location: &str) -> RepositoryResult<Vec<InventoryRecord>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT item_code, location, on_hand_qty, min_qty, updated_at
            FROM inventory
            WHERE location = ?1
            ORDER BY item_code
            "#,
        )?;
        let records = stmt
            .query_map(params![location], Self::map_row)?
            .collect::<SqliteResult<Vec<InventoryRecord>>>()?;
        Ok(records)
    }

    /// Add a (positive or negative) delta to on-hand stock, creating the
    /// record with min_qty = 0 when it does not exist yet.
    pub fn adjust_on_hand(
        &self,
        item_code: &str,
        location: &str,
        delta: f64,
    ) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO inventory (item_code, location, on_hand_qty, min_qty, updated_at)
            VALUES (?1, ?2, ?3, 0, ?4)
            ON CONFLICT(item_code, location) DO UPDATE SET
                on_hand_qty = on_hand_qty + excluded.on_hand_qty,
                updated_at = excluded.updated_at
            "#,
            params![item_code, location, delta, ts_to_db(Utc::now())],
        )?;
        Ok(())
    }
}
