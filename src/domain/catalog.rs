// ==========================================
// Resto Supply - catalog domain models
// ==========================================
// Aligned with: item / supplier tables
// Items are soft-deactivated, never hard-deleted.
// ==========================================

use crate::domain::types::ItemCategory;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ==========================================
// Supplier - authorized vendor master data
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Supplier {
    pub supplier_id: String, // uuid
    pub name: String,
    pub contact_phone: Option<String>, // messaging destination
    pub contact_email: Option<String>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ==========================================
// Item - canonical entity for a tradeable good
// ==========================================
// The canonical unit is the single source of truth for all cross-invoice
// comparison; changing it would invalidate cost history, so it is treated
// as immutable after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    pub code: String, // unique business code (primary key)
    pub name: String,
    pub category: ItemCategory,
    pub canonical_unit: String, // key into the unit conversion table, e.g. "kg"
    pub supplier_id: Option<String>, // authorized supplier (None = cannot auto-order)
    pub current_unit_cost: Option<f64>, // cache, overwritten by the cost standardizer
    pub lead_time_days: i32,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Item {
    /// Unit cost used when pricing order lines (absent cost prices at zero).
    pub fn cost_or_zero(&self) -> f64 {
        self.current_unit_cost.unwrap_or(0.0)
    }
}
