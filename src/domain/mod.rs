// ==========================================
// Resto Supply - domain model layer
// ==========================================
// Responsibility: entities, types, business-rule interfaces
// No data access logic, no engine logic.
// ==========================================

pub mod catalog;
pub mod cost;
pub mod inventory;
pub mod invoice;
pub mod order;
pub mod recipe;
pub mod types;

// Re-export core types
pub use catalog::{Item, Supplier};
pub use cost::StandardizedCost;
pub use inventory::InventoryRecord;
pub use invoice::{ApprovedLine, Invoice, InvoiceLine};
pub use order::{round_money, OrderLine, PurchaseOrder};
pub use recipe::{MenuSchedule, Recipe, RecipeIngredient, ScheduleItem};
pub use types::{InvoiceStatus, ItemCategory, OrderStatus, UnitClass};
