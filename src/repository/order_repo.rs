// ==========================================
// Resto Supply - purchase order repository
// ==========================================
// Responsibility: purchase_order/order_line CRUD and the status column
// update for the DRAFT -> SENT -> RECEIVED state machine. The transition
// rules themselves live in OrderStatus::can_transition_to; this layer
// enforces them when asked to move an order.
// ==========================================

use crate::domain::order::{OrderLine, PurchaseOrder};
use crate::domain::types::OrderStatus;
use crate::repository::db_utils::{date_from_db, date_to_db, ts_from_db, ts_to_db};
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Result as SqliteResult, Row};
use std::sync::{Arc, Mutex, MutexGuard};

pub struct PurchaseOrderRepository {
    conn: Arc<Mutex<Connection>>,
}

impl PurchaseOrderRepository {
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    fn map_order(row: &Row) -> SqliteResult<PurchaseOrder> {
        Ok(PurchaseOrder {
            order_id: row.get(0)?,
            supplier_id: row.get(1)?,
            status: OrderStatus::from_str(&row.get::<_, String>(2)?),
            order_date: date_from_db(&row.get::<_, String>(3)?),
            expected_date: date_from_db(&row.get::<_, String>(4)?),
            total: row.get(5)?,
            created_at: ts_from_db(&row.get::<_, String>(6)?),
            updated_at: ts_from_db(&row.get::<_, String>(7)?),
        })
    }

    fn map_line(row: &Row) -> SqliteResult<OrderLine> {
        Ok(OrderLine {
            line_id: row.get(0)?,
            order_id: row.get(1)?,
            item_code: row.get(2)?,
            quantity: row.get(3)?,
            unit: row.get(4)?,
            unit_cost: row.get(5)?,
            subtotal: row.get(6)?,
        })
    }

    /// Persist an order header together with its lines in one transaction.
    pub fn insert_with_lines(
        &self,
        order: &PurchaseOrder,
        lines: &[OrderLine],
    ) -> RepositoryResult<()> {
        let mut conn = self.get_conn()?;
        let tx = conn
            .transaction()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        tx.execute(
            r#"
            INSERT INTO purchase_order (
                order_id, supplier_id, status, order_date,
                expected_date, total, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
            params![
                order.order_id,
                order.supplier_id,
                order.status.to_db_str(),
                date_to_db(order.order_date),
                date_to_db(order.expected_date),
                order.total,
                ts_to_db(order.created_at),
                ts_to_db(order.updated_at),
            ],
        )?;

        for line in lines {
            tx.execute(
                r#"
                INSERT INTO order_line (
                    line_id, order_id, item_code, quantity, unit, unit_cost, subtotal
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                "#,
                params![
                    line.line_id,
                    line.order_id,
                    line.item_code,
                    line.quantity,
                    line.unit,
                    line.unit_cost,
                    line.subtotal,
                ],
            )?;
        }

        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;
        Ok(())
    }

    pub fn find_by_id(&self, order_id: &str) -> RepositoryResult<Option<PurchaseOrder>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT order_id, supplier_id, status, order_date,
                   expected_date, total, created_at, updated_at
            FROM purchase_order
            WHERE order_id = ?1
            "#,
        )?;
        let order = stmt
            .query_row(params![order_id], Self::map_order)
            .optional()?;
        Ok(order)
    }

    /// Orders of one supplier, newest first.
    pub fn list_by_supplier(&self, supplier_id: &str) -> RepositoryResult<Vec<PurchaseOrder>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT order_id, supplier_id, status, order_date,
                   expected_date, total, created_at, updated_at
            FROM purchase_order
            WHERE supplier_id = ?1
            ORDER BY order_date DESC, created_at DESC
            "#,
        )?;
        let orders = stmt
            .query_map(params![supplier_id], Self::map_order)?
            .collect::<SqliteResult<Vec<PurchaseOrder>>>()?;
        Ok(orders)
    }

    /// Lines of one order.
    pub fn list_lines(&self, order_id: &str) -> RepositoryResult<Vec<OrderLine>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT line_id, order_id, item_code, quantity, unit, unit_cost, subtotal
            FROM order_line
            WHERE order_id = ?1
            ORDER BY item_code
            "#,
        )?;
        let lines = stmt
            .query_map(params![order_id], Self::map_line)?
            .collect::<SqliteResult<Vec<OrderLine>>>()?;
        Ok(lines)
    }

    /// SENT -> RECEIVED together with the stock posting, in one
    /// transaction: either the order is received and every line quantity
    /// is on hand at the location, or nothing changed.
    ///
    /// # Errors
    /// - NotFound when the order does not exist
    /// - InvalidStateTransition when the order is not SENT
    pub fn receive_with_stock(
        &self,
        order_id: &str,
        location: &str,
    ) -> RepositoryResult<PurchaseOrder> {
        let mut conn = self.get_conn()?;
        let tx = conn
            .transaction()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        let current: String = tx
            .query_row(
                "SELECT status FROM purchase_order WHERE order_id = ?1",
                params![order_id],
                |row| row.get(0),
            )
            .optional()?
            .ok_or_else(|| RepositoryError::NotFound {
                entity: "PurchaseOrder".to_string(),
                id: order_id.to_string(),
            })?;
        let from = OrderStatus::from_str(&current);
        if !from.can_transition_to(OrderStatus::Received) {
            return Err(RepositoryError::InvalidStateTransition {
                from: from.to_db_str().to_string(),
                to: OrderStatus::Received.to_db_str().to_string(),
            });
        }

        let now = ts_to_db(Utc::now());
        tx.execute(
            "UPDATE purchase_order SET status = ?1, updated_at = ?2 WHERE order_id = ?3",
            params![OrderStatus::Received.to_db_str(), now, order_id],
        )?;

        {
            let mut stmt = tx.prepare(
                "SELECT item_code, quantity FROM order_line WHERE order_id = ?1",
            )?;
            let quantities = stmt
                .query_map(params![order_id], |row| {
                    Ok((row.get::<_, String>(0)?, row.get::<_, f64>(1)?))
                })?
                .collect::<SqliteResult<Vec<(String, f64)>>>()?;
            for (item_code, quantity) in quantities {
                tx.execute(
                    r#"
                    INSERT INTO inventory (item_code, location, on_hand_qty, min_qty, updated_at)
                    VALUES (?1, ?2, ?3, 0, ?4)
                    ON CONFLICT(item_code, location) DO UPDATE SET
                        on_hand_qty = on_hand_qty + excluded.on_hand_qty,
                        updated_at = excluded.updated_at
                    "#,
                    params![item_code, location, quantity, now],
                )?;
            }
        }

        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;
        drop(conn);

        self.find_by_id(order_id)?
            .ok_or_else(|| RepositoryError::NotFound {
                entity: "PurchaseOrder".to_string(),
                id: order_id.to_string(),
            })
    }

    /// Move an order to a new status, enforcing the state machine.
    ///
    /// # Errors
    /// - NotFound when the order does not exist
    /// - InvalidStateTransition when the move is illegal
    pub fn transition(&self, order_id: &str, to: OrderStatus) -> RepositoryResult<PurchaseOrder> {
        let conn = self.get_conn()?;
        let current: String = conn
            .query_row(
                "SELECT status FROM purchase_order WHERE order_id = ?1",
                params![order_id],
                |row| row.get(0),
            )
            .optional()?
            .ok_or_else(|| RepositoryError::NotFound {
                entity: "PurchaseOrder".to_string(),
                id: order_id.to_string(),
            })?;

        let from = OrderStatus::from_str(&current);
        if !from.can_transition_to(to) {
            return Err(RepositoryError::InvalidStateTransition {
                from: from.to_db_str().to_string(),
                to: to.to_db_str().to_string(),
            });
        }

        conn.execute(
            "UPDATE purchase_order SET status = ?1, updated_at = ?2 WHERE order_id = ?3",
            params![to.to_db_str(), ts_to_db(Utc::now()), order_id],
        )?;
        drop(conn);

        self.find_by_id(order_id)?
            .ok_or_else(|| RepositoryError::NotFound {
                entity: "PurchaseOrder".to_string(),
                id: order_id.to_string(),
            })
    }
}
