// ==========================================
// Resto Supply - purchasing API
// ==========================================
// Responsibility: shortfall planning, order generation, and the order
// lifecycle (send / receive / cancel). Receiving an order is the only
// path that adds quantities to inventory, honoring the rule that stock
// only ever enters after approval.
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::domain::order::{OrderLine, PurchaseOrder};
use crate::domain::types::OrderStatus;
use crate::engine::{GenerationOutcome, PurchaseOrderGenerator, ShortfallCalculator, ShortfallReport};
use crate::repository::PurchaseOrderRepository;
use chrono::Utc;
use std::sync::Arc;
use tracing::info;

pub struct PurchasingApi {
    shortfall: Arc<ShortfallCalculator>,
    generator: Arc<PurchaseOrderGenerator>,
    order_repo: Arc<PurchaseOrderRepository>,
}

impl PurchasingApi {
    pub fn new(
        shortfall: Arc<ShortfallCalculator>,
        generator: Arc<PurchaseOrderGenerator>,
        order_repo: Arc<PurchaseOrderRepository>,
    ) -> Self {
        Self {
            shortfall,
            generator,
            order_repo,
        }
    }

    // ==========================================
    // Planning
    // ==========================================

    /// Shortfall report for a schedule, without creating orders.
    pub fn plan_purchases(&self, schedule_id: &str) -> ApiResult<ShortfallReport> {
        if schedule_id.trim().is_empty() {
            return Err(ApiError::InvalidInput("schedule id must not be empty".to_string()));
        }
        Ok(self.shortfall.calculate(schedule_id)?)
    }

    /// Compute the shortfall for a schedule and create one draft order per
    /// authorized supplier covering it (plan requirements first, then
    /// safety-floor requirements).
    pub async fn generate_orders(&self, schedule_id: &str) -> ApiResult<GenerationOutcome> {
        let report = self.plan_purchases(schedule_id)?;
        let requirements = report.requirements();
        info!(
            schedule_id,
            plan_items = report.to_buy_for_plan.len(),
            safety_items = report.to_buy_for_safety.len(),
            "generating purchase orders from shortfall"
        );
        let today = Utc::now().date_naive();
        Ok(self.generator.generate(&requirements, today).await?)
    }

    // ==========================================
    // Order lifecycle
    // ==========================================

    /// DRAFT -> SENT.
    pub fn send_order(&self, order_id: &str) -> ApiResult<PurchaseOrder> {
        Ok(self.order_repo.transition(order_id, OrderStatus::Sent)?)
    }

    /// SENT -> RECEIVED; posts every line quantity into inventory at the
    /// given location. Transition and stock posting commit atomically, so
    /// a received order always has its full delivery on hand.
    pub fn receive_order(&self, order_id: &str, location: &str) -> ApiResult<PurchaseOrder> {
        if location.trim().is_empty() {
            return Err(ApiError::InvalidInput("location must not be empty".to_string()));
        }
        let order = self.order_repo.receive_with_stock(order_id, location)?;
        info!(order_id, location, "order received, stock posted");
        Ok(order)
    }

    /// DRAFT/SENT -> CANCELLED. Blocked once received.
    pub fn cancel_order(&self, order_id: &str) -> ApiResult<PurchaseOrder> {
        Ok(self.order_repo.transition(order_id, OrderStatus::Cancelled)?)
    }

    /// Order header with its lines.
    pub fn get_order(&self, order_id: &str) -> ApiResult<(PurchaseOrder, Vec<OrderLine>)> {
        let order = self
            .order_repo
            .find_by_id(order_id)?
            .ok_or_else(|| ApiError::NotFound(format!("PurchaseOrder (id={}) does not exist", order_id)))?;
        let lines = self.order_repo.list_lines(order_id)?;
        Ok((order, lines))
    }
}
