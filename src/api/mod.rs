// ==========================================
// Resto Supply - API layer (business interfaces)
// ==========================================
// Invoked from within the surrounding application's HTTP request
// lifecycle; that layer is out of scope here.
// ==========================================

pub mod cost_api;
pub mod error;
pub mod purchasing_api;

pub use cost_api::CostApi;
pub use error::{ApiError, ApiResult};
pub use purchasing_api::PurchasingApi;
