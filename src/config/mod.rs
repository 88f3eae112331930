// ==========================================
// Resto Supply - configuration layer
// ==========================================

pub mod config_manager;

pub use config_manager::{
    ConfigManager, DEFAULT_INVOICE_WINDOW, DEFAULT_PLAN_BUFFER, DEFAULT_SAFETY_BUFFER,
    KEY_INVOICE_WINDOW, KEY_PLAN_BUFFER, KEY_SAFETY_BUFFER,
};
