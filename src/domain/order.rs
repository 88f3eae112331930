// ==========================================
// Resto Supply - purchase order domain models
// ==========================================
// Aligned with: purchase_order / order_line tables
// Total is always the exact sum of line subtotals (cent precision).
// ==========================================

use crate::domain::types::OrderStatus;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

// ==========================================
// PurchaseOrder - draft-to-received header, one supplier
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurchaseOrder {
    pub order_id: String, // uuid
    pub supplier_id: String,
    pub status: OrderStatus,
    pub order_date: NaiveDate,
    pub expected_date: NaiveDate, // order_date + max lead time across lines
    pub total: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One item line of a purchase order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderLine {
    pub line_id: String, // uuid
    pub order_id: String,
    pub item_code: String,
    pub quantity: f64,
    pub unit: String, // the item's canonical unit
    pub unit_cost: f64, // last-known standardized cost, 0.0 when absent
    pub subtotal: f64,  // unit_cost * quantity, rounded to cents
}

/// Round a money amount to the currency's minor unit (cents).
pub fn round_money(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_money() {
        assert_eq!(round_money(3.14159), 3.14);
        assert_eq!(round_money(16.4999), 16.5);
        assert_eq!(round_money(0.1 + 0.2), 0.3);
        assert_eq!(round_money(0.0), 0.0);
    }
}
