// ==========================================
// Resto Supply - standardized cost repository
// ==========================================
// Responsibility: one record per item, recomputed in place (upsert).
// ==========================================

use crate::domain::cost::StandardizedCost;
use crate::repository::db_utils::{ts_from_db, ts_to_db};
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, OptionalExtension, Row, Result as SqliteResult};
use std::sync::{Arc, Mutex, MutexGuard};

pub struct StandardizedCostRepository {
    conn: Arc<Mutex<Connection>>,
}

impl StandardizedCostRepository {
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    fn map_row(row: &Row) -> SqliteResult<StandardizedCost> {
        Ok(StandardizedCost {
            item_code: row.get(0)?,
            unit_cost: row.get(1)?,
            canonical_unit: row.get(2)?,
            invoices_used: row.get(3)?,
            variance_pct: row.get(4)?,
            variance_abs: row.get(5)?,
            notes: row.get(6)?,
            calculated_at: ts_from_db(&row.get::<_, String>(7)?),
        })
    }

    /// Insert or replace the cost record keyed by item.
    pub fn upsert(&self, cost: &StandardizedCost) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT OR REPLACE INTO standardized_cost (
                item_code, unit_cost, canonical_unit, invoices_used,
                variance_pct, variance_abs, notes, calculated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
            params![
                cost.item_code,
                cost.unit_cost,
                cost.canonical_unit,
                cost.invoices_used,
                cost.variance_pct,
                cost.variance_abs,
                cost.notes,
                ts_to_db(cost.calculated_at),
            ],
        )?;
        Ok(())
    }

    pub fn find_by_item(&self, item_code: &str) -> RepositoryResult<Option<StandardizedCost>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT item_code, unit_cost, canonical_unit, invoices_used,
                   variance_pct, variance_abs, notes, calculated_at
            FROM standardized_cost
            WHERE item_code = ?1
            "#,
        )?;
        let cost = stmt
            .query_row(params![item_code], Self::map_row)
            .optional()?;
        Ok(cost)
    }
}
