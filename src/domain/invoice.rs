// ==========================================
// Resto Supply - invoice domain models
// ==========================================
// Aligned with: invoice / invoice_line tables
// Approved quantities are populated only after human approval and may be
// lower than the invoiced quantity (partial acceptance).
// ==========================================

use crate::domain::types::InvoiceStatus;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

// ==========================================
// Invoice - one supplier document
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Invoice {
    pub invoice_id: String, // uuid
    pub supplier_id: Option<String>,
    pub invoice_number: Option<String>, // supplier's own numbering (may be OCR-extracted)
    pub invoice_date: NaiveDate,
    pub status: InvoiceStatus,
    pub approved_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

// ==========================================
// InvoiceLine - one purchased quantity of one item
// ==========================================
// item_code is nullable: OCR lines that could not be matched to a catalog
// item stay item-less and never feed cost standardization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoiceLine {
    pub line_id: String, // uuid
    pub invoice_id: String,
    pub item_code: Option<String>,
    pub description: String,
    pub unit: String, // as invoiced; may differ from the item's canonical unit
    pub unit_price: f64,
    pub invoiced_qty: f64,
    pub approved_qty: Option<f64>, // set on approval, possibly < invoiced_qty
}

// ==========================================
// ApprovedLine - qualifying line for cost standardization
// ==========================================
// Join product of an APPROVED invoice and one of its item-matched lines
// with positive approved quantity and positive unit price.
#[derive(Debug, Clone)]
pub struct ApprovedLine {
    pub invoice_id: String,
    pub approved_at: DateTime<Utc>,
    pub unit: String,
    pub unit_price: f64,
    pub approved_qty: f64,
}
