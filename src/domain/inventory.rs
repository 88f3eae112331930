// ==========================================
// Resto Supply - inventory domain model
// ==========================================
// Aligned with: inventory table (one row per item per location)
// Both quantities are expressed in the item's canonical unit.
// ==========================================

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryRecord {
    pub item_code: String,
    pub location: String, // branch/warehouse code
    pub on_hand_qty: f64,
    pub min_qty: f64, // safety-stock floor, always kept on hand
    pub updated_at: DateTime<Utc>,
}

impl InventoryRecord {
    /// Quantity missing against the safety floor (zero when at or above it).
    pub fn below_min_by(&self) -> f64 {
        (self.min_qty - self.on_hand_qty).max(0.0)
    }
}
