// ==========================================
// Resto Supply - costing API
// ==========================================
// Responsibility: cost standardization entry points for the surrounding
// application (single item on invoice approval, full batch on the weekly
// trigger) plus cost lookups.
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::domain::cost::StandardizedCost;
use crate::engine::{BatchSummary, CostStandardizer};
use crate::repository::StandardizedCostRepository;
use std::sync::Arc;

pub struct CostApi {
    standardizer: Arc<CostStandardizer>,
    cost_repo: Arc<StandardizedCostRepository>,
}

impl CostApi {
    pub fn new(
        standardizer: Arc<CostStandardizer>,
        cost_repo: Arc<StandardizedCostRepository>,
    ) -> Self {
        Self {
            standardizer,
            cost_repo,
        }
    }

    /// Recompute one item's standardized cost.
    ///
    /// # Returns
    /// - Ok(Some): updated record
    /// - Ok(None): insufficient data; callers fall back to the item's
    ///   manually-set price
    pub fn standardize_item(&self, item_code: &str) -> ApiResult<Option<StandardizedCost>> {
        if item_code.trim().is_empty() {
            return Err(ApiError::InvalidInput("item code must not be empty".to_string()));
        }
        Ok(self.standardizer.standardize_item(item_code)?)
    }

    /// Run the full recomputation batch (the weekly job body).
    pub fn standardize_all(&self) -> ApiResult<BatchSummary> {
        Ok(self.standardizer.standardize_all()?)
    }

    /// Current standardized cost of one item, if any.
    pub fn get_cost(&self, item_code: &str) -> ApiResult<Option<StandardizedCost>> {
        Ok(self.cost_repo.find_by_item(item_code)?)
    }
}
