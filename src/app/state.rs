// ==========================================
// Resto Supply - application state (composition root)
// ==========================================
// Responsibility: construct repositories, engines, the notifier, and the
// API instances over one shared connection. All collaborators are
// explicitly injected here; nothing module-level, nothing global.
// ==========================================

use std::sync::{Arc, Mutex};

use crate::api::{CostApi, PurchasingApi};
use crate::config::ConfigManager;
use crate::db::{init_schema, open_sqlite_connection};
use crate::engine::{CostStandardizer, PurchaseOrderGenerator, ShortfallCalculator};
use crate::notify::{LoggingNotifier, SupplierNotifier};
use crate::repository::{
    InventoryRepository, InvoiceRepository, ItemRepository, MenuScheduleRepository,
    PurchaseOrderRepository, RecipeRepository, StandardizedCostRepository, SupplierRepository,
};

/// Application state: all API instances and shared resources.
pub struct AppState {
    pub db_path: String,

    pub cost_api: Arc<CostApi>,
    pub purchasing_api: Arc<PurchasingApi>,

    // Repositories the surrounding CRUD layer drives directly.
    pub supplier_repo: Arc<SupplierRepository>,
    pub item_repo: Arc<ItemRepository>,
    pub invoice_repo: Arc<InvoiceRepository>,
    pub inventory_repo: Arc<InventoryRepository>,
    pub recipe_repo: Arc<RecipeRepository>,
    pub schedule_repo: Arc<MenuScheduleRepository>,

    pub config: Arc<ConfigManager>,
}

impl AppState {
    /// Open (and if necessary create) the database and wire everything
    /// with the default logging notifier.
    pub fn new(db_path: String) -> anyhow::Result<Self> {
        Self::with_notifier(db_path, Arc::new(LoggingNotifier))
    }

    /// Same as `new`, with an injected notification transport.
    pub fn with_notifier(
        db_path: String,
        notifier: Arc<dyn SupplierNotifier>,
    ) -> anyhow::Result<Self> {
        tracing::info!(db_path, "initializing AppState");

        let conn = open_sqlite_connection(&db_path)?;
        init_schema(&conn)?;
        let conn = Arc::new(Mutex::new(conn));

        // ===== repository layer =====
        let supplier_repo = Arc::new(SupplierRepository::from_connection(conn.clone()));
        let item_repo = Arc::new(ItemRepository::from_connection(conn.clone()));
        let invoice_repo = Arc::new(InvoiceRepository::from_connection(conn.clone()));
        let inventory_repo = Arc::new(InventoryRepository::from_connection(conn.clone()));
        let recipe_repo = Arc::new(RecipeRepository::from_connection(conn.clone()));
        let schedule_repo = Arc::new(MenuScheduleRepository::from_connection(conn.clone()));
        let cost_repo = Arc::new(StandardizedCostRepository::from_connection(conn.clone()));
        let order_repo = Arc::new(PurchaseOrderRepository::from_connection(conn.clone()));

        let config = Arc::new(ConfigManager::from_connection(conn.clone())?);

        // ===== engine layer =====
        let standardizer = Arc::new(CostStandardizer::new(
            item_repo.clone(),
            invoice_repo.clone(),
            cost_repo.clone(),
            config.clone(),
        ));
        let shortfall = Arc::new(ShortfallCalculator::new(
            schedule_repo.clone(),
            recipe_repo.clone(),
            item_repo.clone(),
            inventory_repo.clone(),
            config.clone(),
        ));
        let generator = Arc::new(PurchaseOrderGenerator::new(
            item_repo.clone(),
            supplier_repo.clone(),
            order_repo.clone(),
            notifier,
        ));

        // ===== API layer =====
        let cost_api = Arc::new(CostApi::new(standardizer, cost_repo));
        let purchasing_api = Arc::new(PurchasingApi::new(shortfall, generator, order_repo));

        Ok(Self {
            db_path,
            cost_api,
            purchasing_api,
            supplier_repo,
            item_repo,
            invoice_repo,
            inventory_repo,
            recipe_repo,
            schedule_repo,
            config,
        })
    }
}

/// Default database location under the user data directory.
pub fn get_default_db_path() -> String {
    let base = dirs::data_dir().unwrap_or_else(|| std::path::PathBuf::from("."));
    base.join("resto-supply")
        .join("resto_supply.db")
        .to_string_lossy()
        .to_string()
}
