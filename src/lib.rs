// ==========================================
// Resto Supply - core library
// ==========================================
// Restaurant-chain supply core: unit-cost standardization across
// heterogeneous invoice units, menu-driven shortfall planning, and
// purchase-order generation. The surrounding HTTP/OCR/chat application
// lives elsewhere and drives this crate through the api layer.
// ==========================================

// Domain layer - entities and types
pub mod domain;

// Repository layer - data access
pub mod repository;

// Engine layer - business rules
pub mod engine;

// Notification boundary
pub mod notify;

// Configuration layer
pub mod config;

// Database infrastructure (connection init / PRAGMA / schema)
pub mod db;

// Logging
pub mod logging;

// API layer - business interfaces
pub mod api;

// Application layer - composition root
pub mod app;

// ==========================================
// Core type re-exports
// ==========================================

pub use domain::types::{InvoiceStatus, ItemCategory, OrderStatus, UnitClass};

pub use domain::{
    InventoryRecord, Invoice, InvoiceLine, Item, MenuSchedule, OrderLine, PurchaseOrder, Recipe,
    RecipeIngredient, ScheduleItem, StandardizedCost, Supplier,
};

pub use engine::{
    CostStandardizer, ItemRequirement, PurchaseOrderGenerator, ShortfallCalculator,
    ShortfallReport,
};

pub use api::{CostApi, PurchasingApi};

pub use notify::{LoggingNotifier, SupplierNotifier};

// ==========================================
// Constants
// ==========================================

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub const APP_NAME: &str = "Resto Supply";
