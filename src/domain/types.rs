// ==========================================
// Resto Supply - domain type definitions
// ==========================================
// Serialization format: SCREAMING_SNAKE_CASE (matches database)
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// Item category
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ItemCategory {
    RawMaterial,  // ingredients purchased from suppliers
    Supply,       // non-food consumables (napkins, cleaning, packaging)
    FinishedGood, // sold as-is, no recipe
}

impl fmt::Display for ItemCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemCategory::RawMaterial => write!(f, "RAW_MATERIAL"),
            ItemCategory::Supply => write!(f, "SUPPLY"),
            ItemCategory::FinishedGood => write!(f, "FINISHED_GOOD"),
        }
    }
}

impl ItemCategory {
    /// Parse from a database string (unknown values fall back to RawMaterial)
    pub fn from_str(s: &str) -> Self {
        match s.to_uppercase().as_str() {
            "RAW_MATERIAL" => ItemCategory::RawMaterial,
            "SUPPLY" => ItemCategory::Supply,
            "FINISHED_GOOD" => ItemCategory::FinishedGood,
            _ => ItemCategory::RawMaterial,
        }
    }

    /// String stored in the database
    pub fn to_db_str(&self) -> &'static str {
        match self {
            ItemCategory::RawMaterial => "RAW_MATERIAL",
            ItemCategory::Supply => "SUPPLY",
            ItemCategory::FinishedGood => "FINISHED_GOOD",
        }
    }
}

// ==========================================
// Invoice status
// ==========================================
// Quantities enter inventory only from APPROVED invoices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InvoiceStatus {
    Pending,  // captured (OCR or manual), awaiting human approval
    Approved, // approved quantities populated, feeds cost standardization
    Rejected,
}

impl fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvoiceStatus::Pending => write!(f, "PENDING"),
            InvoiceStatus::Approved => write!(f, "APPROVED"),
            InvoiceStatus::Rejected => write!(f, "REJECTED"),
        }
    }
}

impl InvoiceStatus {
    pub fn from_str(s: &str) -> Self {
        match s.to_uppercase().as_str() {
            "APPROVED" => InvoiceStatus::Approved,
            "REJECTED" => InvoiceStatus::Rejected,
            _ => InvoiceStatus::Pending,
        }
    }

    pub fn to_db_str(&self) -> &'static str {
        match self {
            InvoiceStatus::Pending => "PENDING",
            InvoiceStatus::Approved => "APPROVED",
            InvoiceStatus::Rejected => "REJECTED",
        }
    }
}

// ==========================================
// Purchase order status
// ==========================================
// State machine: DRAFT -> SENT -> RECEIVED, CANCELLED from DRAFT or SENT.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Draft,
    Sent,
    Received,
    Cancelled,
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderStatus::Draft => write!(f, "DRAFT"),
            OrderStatus::Sent => write!(f, "SENT"),
            OrderStatus::Received => write!(f, "RECEIVED"),
            OrderStatus::Cancelled => write!(f, "CANCELLED"),
        }
    }
}

impl OrderStatus {
    pub fn from_str(s: &str) -> Self {
        match s.to_uppercase().as_str() {
            "SENT" => OrderStatus::Sent,
            "RECEIVED" => OrderStatus::Received,
            "CANCELLED" => OrderStatus::Cancelled,
            _ => OrderStatus::Draft,
        }
    }

    pub fn to_db_str(&self) -> &'static str {
        match self {
            OrderStatus::Draft => "DRAFT",
            OrderStatus::Sent => "SENT",
            OrderStatus::Received => "RECEIVED",
            OrderStatus::Cancelled => "CANCELLED",
        }
    }

    /// Whether the transition `self -> to` is legal.
    ///
    /// Rules:
    /// - only DRAFT orders can be sent
    /// - only SENT orders can be marked received
    /// - cancellation is blocked once RECEIVED
    pub fn can_transition_to(&self, to: OrderStatus) -> bool {
        matches!(
            (self, to),
            (OrderStatus::Draft, OrderStatus::Sent)
                | (OrderStatus::Sent, OrderStatus::Received)
                | (OrderStatus::Draft, OrderStatus::Cancelled)
                | (OrderStatus::Sent, OrderStatus::Cancelled)
        )
    }
}

// ==========================================
// Unit compatibility class
// ==========================================
// Conversion between two units is only legal within the same class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UnitClass {
    Weight, // canonical: kilogram
    Volume, // canonical: liter
    Count,  // canonical: bare unit
}

impl fmt::Display for UnitClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnitClass::Weight => write!(f, "WEIGHT"),
            UnitClass::Volume => write!(f, "VOLUME"),
            UnitClass::Count => write!(f, "COUNT"),
        }
    }
}
