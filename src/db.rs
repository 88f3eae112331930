// ==========================================
// Resto Supply - SQLite connection initialization
// ==========================================
// Goals:
// - one place for Connection::open PRAGMA behavior, so every module gets
//   foreign keys and the same busy_timeout
// - schema creation is idempotent (CREATE TABLE IF NOT EXISTS)
// ==========================================

use rusqlite::Connection;
use std::time::Duration;

/// Default busy_timeout in milliseconds
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// Apply the unified PRAGMA set to a connection.
///
/// foreign_keys and busy_timeout are per-connection settings and must be
/// re-applied on every open.
pub fn configure_sqlite_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))?;
    Ok(())
}

/// Open a SQLite connection with the unified configuration applied.
pub fn open_sqlite_connection(db_path: &str) -> rusqlite::Result<Connection> {
    let conn = Connection::open(db_path)?;
    configure_sqlite_connection(&conn)?;
    Ok(conn)
}

/// Create the full relational schema if it does not exist yet.
///
/// Dates are stored as TEXT `%Y-%m-%d`, timestamps as RFC 3339 TEXT,
/// status/category enums as their SCREAMING_SNAKE_CASE database strings.
pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS supplier (
            supplier_id   TEXT PRIMARY KEY,
            name          TEXT NOT NULL,
            contact_phone TEXT,
            contact_email TEXT,
            active        INTEGER NOT NULL DEFAULT 1,
            created_at    TEXT NOT NULL,
            updated_at    TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS item (
            code              TEXT PRIMARY KEY,
            name              TEXT NOT NULL,
            category          TEXT NOT NULL,
            canonical_unit    TEXT NOT NULL,
            supplier_id       TEXT REFERENCES supplier(supplier_id),
            current_unit_cost REAL,
            lead_time_days    INTEGER NOT NULL DEFAULT 0,
            active            INTEGER NOT NULL DEFAULT 1,
            created_at        TEXT NOT NULL,
            updated_at        TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS invoice (
            invoice_id     TEXT PRIMARY KEY,
            supplier_id    TEXT REFERENCES supplier(supplier_id),
            invoice_number TEXT,
            invoice_date   TEXT NOT NULL,
            status         TEXT NOT NULL DEFAULT 'PENDING',
            approved_at    TEXT,
            created_at     TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS invoice_line (
            line_id      TEXT PRIMARY KEY,
            invoice_id   TEXT NOT NULL REFERENCES invoice(invoice_id) ON DELETE CASCADE,
            item_code    TEXT REFERENCES item(code),
            description  TEXT NOT NULL DEFAULT '',
            unit         TEXT NOT NULL,
            unit_price   REAL NOT NULL,
            invoiced_qty REAL NOT NULL,
            approved_qty REAL
        );
        CREATE INDEX IF NOT EXISTS idx_invoice_line_item ON invoice_line(item_code);

        CREATE TABLE IF NOT EXISTS standardized_cost (
            item_code      TEXT PRIMARY KEY REFERENCES item(code),
            unit_cost      REAL NOT NULL,
            canonical_unit TEXT NOT NULL,
            invoices_used  INTEGER NOT NULL,
            variance_pct   REAL NOT NULL DEFAULT 0,
            variance_abs   REAL NOT NULL DEFAULT 0,
            notes          TEXT NOT NULL DEFAULT '',
            calculated_at  TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS inventory (
            item_code   TEXT NOT NULL REFERENCES item(code),
            location    TEXT NOT NULL,
            on_hand_qty REAL NOT NULL DEFAULT 0,
            min_qty     REAL NOT NULL DEFAULT 0,
            updated_at  TEXT NOT NULL,
            PRIMARY KEY (item_code, location)
        );

        CREATE TABLE IF NOT EXISTS recipe (
            recipe_id  TEXT PRIMARY KEY,
            name       TEXT NOT NULL,
            portions   INTEGER NOT NULL,
            active     INTEGER NOT NULL DEFAULT 1,
            created_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS recipe_ingredient (
            recipe_id TEXT NOT NULL REFERENCES recipe(recipe_id) ON DELETE CASCADE,
            item_code TEXT NOT NULL REFERENCES item(code),
            quantity  REAL NOT NULL,
            unit      TEXT NOT NULL,
            PRIMARY KEY (recipe_id, item_code)
        );

        CREATE TABLE IF NOT EXISTS menu_schedule (
            schedule_id TEXT PRIMARY KEY,
            name        TEXT NOT NULL,
            location    TEXT NOT NULL,
            start_date  TEXT NOT NULL,
            end_date    TEXT NOT NULL,
            created_at  TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS schedule_item (
            schedule_id     TEXT NOT NULL REFERENCES menu_schedule(schedule_id) ON DELETE CASCADE,
            recipe_id       TEXT NOT NULL REFERENCES recipe(recipe_id),
            target_portions INTEGER NOT NULL,
            PRIMARY KEY (schedule_id, recipe_id)
        );

        CREATE TABLE IF NOT EXISTS purchase_order (
            order_id      TEXT PRIMARY KEY,
            supplier_id   TEXT NOT NULL REFERENCES supplier(supplier_id),
            status        TEXT NOT NULL DEFAULT 'DRAFT',
            order_date    TEXT NOT NULL,
            expected_date TEXT NOT NULL,
            total         REAL NOT NULL DEFAULT 0,
            created_at    TEXT NOT NULL,
            updated_at    TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS order_line (
            line_id   TEXT PRIMARY KEY,
            order_id  TEXT NOT NULL REFERENCES purchase_order(order_id) ON DELETE CASCADE,
            item_code TEXT NOT NULL REFERENCES item(code),
            quantity  REAL NOT NULL,
            unit      TEXT NOT NULL,
            unit_cost REAL NOT NULL,
            subtotal  REAL NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_order_line_order ON order_line(order_id);

        CREATE TABLE IF NOT EXISTS config_kv (
            key        TEXT PRIMARY KEY,
            value      TEXT NOT NULL,
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );
        "#,
    )?;
    Ok(())
}
