// ==========================================
// Resto Supply - configuration manager
// ==========================================
// Responsibility: load/override the purchasing tunables
// Storage: config_kv table (key-value)
// ==========================================
// Unreadable or unparsable values fall back to the compiled default with
// a warning; a bad config row must never stop a batch run.
// ==========================================

use crate::db::configure_sqlite_connection;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, OptionalExtension};
use std::sync::{Arc, Mutex};
use tracing::warn;

/// Multiplier applied to plan-driven shortfall quantities (+10%).
pub const DEFAULT_PLAN_BUFFER: f64 = 1.10;
/// Multiplier applied to safety-floor replenishment quantities (+20%).
pub const DEFAULT_SAFETY_BUFFER: f64 = 1.20;
/// Invoice window for cost standardization (most recent approved).
pub const DEFAULT_INVOICE_WINDOW: u32 = 3;

pub const KEY_PLAN_BUFFER: &str = "purchasing/plan_buffer";
pub const KEY_SAFETY_BUFFER: &str = "purchasing/safety_buffer";
pub const KEY_INVOICE_WINDOW: &str = "costing/invoice_window";

// ==========================================
// ConfigManager
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// Create a ConfigManager on the shared connection. The unified PRAGMA
    /// set is re-applied (idempotent) so behavior matches every other user
    /// of the connection.
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> RepositoryResult<Self> {
        {
            let guard = conn
                .lock()
                .map_err(|e| RepositoryError::LockError(e.to_string()))?;
            configure_sqlite_connection(&guard)?;
        }
        Ok(Self { conn })
    }

    fn get_value(&self, key: &str) -> RepositoryResult<Option<String>> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))?;
        let value = conn
            .query_row(
                "SELECT value FROM config_kv WHERE key = ?1",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    /// Write a configuration value (upsert).
    pub fn set_value(&self, key: &str, value: &str) -> RepositoryResult<()> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))?;
        conn.execute(
            r#"
            INSERT INTO config_kv (key, value, updated_at)
            VALUES (?1, ?2, datetime('now'))
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
            params![key, value],
        )?;
        Ok(())
    }

    fn get_f64_or(&self, key: &str, default: f64) -> f64 {
        match self.get_value(key) {
            Ok(Some(raw)) => raw.parse::<f64>().unwrap_or_else(|_| {
                warn!(key, raw, "unparsable config value, using default");
                default
            }),
            Ok(None) => default,
            Err(e) => {
                warn!(key, error = %e, "config read failed, using default");
                default
            }
        }
    }

    // ==========================================
    // Typed getters
    // ==========================================

    /// Buffer multiplier for plan-driven purchases.
    pub fn plan_buffer(&self) -> f64 {
        self.get_f64_or(KEY_PLAN_BUFFER, DEFAULT_PLAN_BUFFER)
    }

    /// Buffer multiplier for safety-floor replenishment.
    pub fn safety_buffer(&self) -> f64 {
        self.get_f64_or(KEY_SAFETY_BUFFER, DEFAULT_SAFETY_BUFFER)
    }

    /// How many recent approved invoices feed cost standardization.
    pub fn invoice_window(&self) -> u32 {
        match self.get_value(KEY_INVOICE_WINDOW) {
            Ok(Some(raw)) => raw.parse::<u32>().ok().filter(|w| *w > 0).unwrap_or_else(|| {
                warn!(raw, "unparsable invoice window, using default");
                DEFAULT_INVOICE_WINDOW
            }),
            Ok(None) => DEFAULT_INVOICE_WINDOW,
            Err(e) => {
                warn!(error = %e, "config read failed, using default");
                DEFAULT_INVOICE_WINDOW
            }
        }
    }
}
