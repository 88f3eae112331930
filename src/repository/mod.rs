// ==========================================
// Resto Supply - data repository layer
// ==========================================
// Responsibility: data access over the shared SQLite connection.
// Repositories contain no business logic.
// ==========================================

pub mod catalog_repo;
pub mod cost_repo;
mod db_utils;
pub mod error;
pub mod inventory_repo;
pub mod invoice_repo;
pub mod order_repo;
pub mod recipe_repo;

pub use catalog_repo::{ItemRepository, SupplierRepository};
pub use cost_repo::StandardizedCostRepository;
pub use error::{RepositoryError, RepositoryResult};
pub use inventory_repo::InventoryRepository;
pub use invoice_repo::InvoiceRepository;
pub use order_repo::PurchaseOrderRepository;
pub use recipe_repo::{MenuScheduleRepository, RecipeRepository};
