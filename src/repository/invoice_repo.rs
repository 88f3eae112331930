// ==========================================
// Resto Supply - invoice repository
// ==========================================
// Responsibility: invoice/invoice_line CRUD plus the approval-state
// filtered query feeding the cost standardizer.
// ==========================================

use crate::domain::invoice::{ApprovedLine, Invoice, InvoiceLine};
use crate::domain::types::InvoiceStatus;
use crate::repository::db_utils::{date_from_db, date_to_db, ts_from_db, ts_to_db};
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Result as SqliteResult, Row};
use std::sync::{Arc, Mutex, MutexGuard};

pub struct InvoiceRepository {
    conn: Arc<Mutex<Connection>>,
}

impl InvoiceRepository {
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    fn map_invoice(row: &Row) -> SqliteResult<Invoice> {
        Ok(Invoice {
            invoice_id: row.get(0)?,
            supplier_id: row.get(1)?,
            invoice_number: row.get(2)?,
            invoice_date: date_from_db(&row.get::<_, String>(3)?),
            status: InvoiceStatus::from_str(&row.get::<_, String>(4)?),
            approved_at: row.get::<_, Option<String>>(5)?.map(|s| ts_from_db(&s)),
            created_at: ts_from_db(&row.get::<_, String>(6)?),
        })
    }

    fn map_line(row: &Row) -> SqliteResult<InvoiceLine> {
        Ok(InvoiceLine {
            line_id: row.get(0)?,
            invoice_id: row.get(1)?,
            item_code: row.get(2)?,
            description: row.get(3)?,
            unit: row.get(4)?,
            unit_price: row.get(5)?,
            invoiced_qty: row.get(6)?,
            approved_qty: row.get(7)?,
        })
    }

    /// Insert an invoice header together with its lines in one transaction.
    pub fn insert_with_lines(
        &self,
        invoice: &Invoice,
        lines: &[InvoiceLine],
    ) -> RepositoryResult<()> {
        let mut conn = self.get_conn()?;
        let tx = conn
            .transaction()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        tx.execute(
            r#"
            INSERT INTO invoice (
                invoice_id, supplier_id, invoice_number, invoice_date,
                status, approved_at, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
            params![
                invoice.invoice_id,
                invoice.supplier_id,
                invoice.invoice_number,
                date_to_db(invoice.invoice_date),
                invoice.status.to_db_str(),
                invoice.approved_at.map(ts_to_db),
                ts_to_db(invoice.created_at),
            ],
        )?;

        for line in lines {
            tx.execute(
                r#"
                INSERT INTO invoice_line (
                    line_id, invoice_id, item_code, description,
                    unit, unit_price, invoiced_qty, approved_qty
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                "#,
                params![
                    line.line_id,
                    line.invoice_id,
                    line.item_code,
                    line.description,
                    line.unit,
                    line.unit_price,
                    line.invoiced_qty,
                    line.approved_qty,
                ],
            )?;
        }

        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;
        Ok(())
    }

    /// Look up one invoice header.
    pub fn find_by_id(&self, invoice_id: &str) -> RepositoryResult<Option<Invoice>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT invoice_id, supplier_id, invoice_number, invoice_date,
                   status, approved_at, created_at
            FROM invoice
            WHERE invoice_id = ?1
            "#,
        )?;
        let invoice = stmt
            .query_row(params![invoice_id], Self::map_invoice)
            .optional()?;
        Ok(invoice)
    }

    /// List the lines of one invoice.
    pub fn list_lines(&self, invoice_id: &str) -> RepositoryResult<Vec<InvoiceLine>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT line_id, invoice_id, item_code, description,
                   unit, unit_price, invoiced_qty, approved_qty
            FROM invoice_line
            WHERE invoice_id = ?1
            ORDER BY line_id
            "#,
        )?;
        let lines = stmt
            .query_map(params![invoice_id], Self::map_line)?
            .collect::<SqliteResult<Vec<InvoiceLine>>>()?;
        Ok(lines)
    }

    /// Approve an invoice: set status, approval timestamp, and per-line
    /// approved quantities (line_id -> approved qty) in one transaction.
    ///
    /// Lines not present in `approvals` keep their invoiced quantity as the
    /// approved quantity (full acceptance is the default).
    pub fn approve(
        &self,
        invoice_id: &str,
        approved_at: DateTime<Utc>,
        approvals: &[(String, f64)],
    ) -> RepositoryResult<()> {
        let mut conn = self.get_conn()?;
        let tx = conn
            .transaction()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        let current: String = tx
            .query_row(
                "SELECT status FROM invoice WHERE invoice_id = ?1",
                params![invoice_id],
                |row| row.get(0),
            )
            .optional()?
            .ok_or_else(|| RepositoryError::NotFound {
                entity: "Invoice".to_string(),
                id: invoice_id.to_string(),
            })?;
        if InvoiceStatus::from_str(&current) != InvoiceStatus::Pending {
            return Err(RepositoryError::InvalidStateTransition {
                from: current,
                to: InvoiceStatus::Approved.to_db_str().to_string(),
            });
        }

        tx.execute(
            "UPDATE invoice SET status = ?1, approved_at = ?2 WHERE invoice_id = ?3",
            params![
                InvoiceStatus::Approved.to_db_str(),
                ts_to_db(approved_at),
                invoice_id
            ],
        )?;

        // Default: approved = invoiced, then apply explicit partial acceptances.
        tx.execute(
            "UPDATE invoice_line SET approved_qty = invoiced_qty WHERE invoice_id = ?1",
            params![invoice_id],
        )?;
        for (line_id, qty) in approvals {
            tx.execute(
                "UPDATE invoice_line SET approved_qty = ?1 WHERE line_id = ?2 AND invoice_id = ?3",
                params![qty, line_id, invoice_id],
            )?;
        }

        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;
        Ok(())
    }

    /// Reject a pending invoice. Rejected invoices never feed costs or stock.
    pub fn reject(&self, invoice_id: &str) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let current: String = conn
            .query_row(
                "SELECT status FROM invoice WHERE invoice_id = ?1",
                params![invoice_id],
                |row| row.get(0),
            )
            .optional()?
            .ok_or_else(|| RepositoryError::NotFound {
                entity: "Invoice".to_string(),
                id: invoice_id.to_string(),
            })?;
        if InvoiceStatus::from_str(&current) != InvoiceStatus::Pending {
            return Err(RepositoryError::InvalidStateTransition {
                from: current,
                to: InvoiceStatus::Rejected.to_db_str().to_string(),
            });
        }
        conn.execute(
            "UPDATE invoice SET status = ?1 WHERE invoice_id = ?2",
            params![InvoiceStatus::Rejected.to_db_str(), invoice_id],
        )?;
        Ok(())
    }

    /// The cost standardizer's input query: up to `limit` most recently
    /// approved lines for an item, with positive approved quantity and
    /// positive unit price, newest approval first.
    pub fn recent_approved_lines(
        &self,
        item_code: &str,
        limit: u32,
    ) -> RepositoryResult<Vec<ApprovedLine>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT i.invoice_id, i.approved_at, l.unit, l.unit_price, l.approved_qty
            FROM invoice_line l
            JOIN invoice i ON i.invoice_id = l.invoice_id
            WHERE l.item_code = ?1
              AND i.status = 'APPROVED'
              AND l.approved_qty > 0
              AND l.unit_price > 0
            ORDER BY i.approved_at DESC
            LIMIT ?2
            "#,
        )?;
        let lines = stmt
            .query_map(params![item_code, limit], |row| {
                Ok(ApprovedLine {
                    invoice_id: row.get(0)?,
                    approved_at: ts_from_db(&row.get::<_, String>(1)?),
                    unit: row.get(2)?,
                    unit_price: row.get(3)?,
                    approved_qty: row.get(4)?,
                })
            })?
            .collect::<SqliteResult<Vec<ApprovedLine>>>()?;
        Ok(lines)
    }
}
