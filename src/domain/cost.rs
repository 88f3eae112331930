// ==========================================
// Resto Supply - standardized cost domain model
// ==========================================
// Aligned with: standardized_cost table (one row per item)
// Recomputed in place (upsert); history lives only in `notes`.
// ==========================================

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ==========================================
// StandardizedCost - comparable view of recent approved purchases
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StandardizedCost {
    pub item_code: String,
    pub unit_cost: f64,         // arithmetic mean across invoices, per canonical unit
    pub canonical_unit: String, // copied from the item at calculation time
    pub invoices_used: i32,     // at most 3, most recently approved
    pub variance_pct: f64,      // sample std deviation as % of the mean (0 when n=1)
    pub variance_abs: f64,      // max minus min per-invoice unit cost (0 when n=1)
    pub notes: String,          // conversions applied / degraded-path warnings
    pub calculated_at: DateTime<Utc>,
}
