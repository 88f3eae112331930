// ==========================================
// Resto Supply - engine layer (business rules)
// ==========================================
// Data flows one-directional:
// invoices/approvals -> CostStandardizer -> item cost cache
// menu schedule -> ShortfallCalculator -> PurchaseOrderGenerator -> orders
// ==========================================

pub mod cost_standardizer;
pub mod order_generator;
pub mod shortfall;
pub mod units;

pub use cost_standardizer::{BatchSummary, CostStandardizer};
pub use order_generator::{GeneratedOrder, GenerationOutcome, PurchaseOrderGenerator};
pub use shortfall::{
    shortfall_qty, ItemRequirement, ShortfallCalculator, ShortfallEntry, ShortfallReport,
    SufficientEntry,
};
pub use units::{class_of, compatible, convert, factor_of, UnitConversionError};
