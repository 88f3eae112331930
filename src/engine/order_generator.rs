// ==========================================
// Resto Supply - purchase order generation engine
// ==========================================
// Responsibility: convert flat (item, quantity-needed) pairs into one
// draft order per authorized supplier.
// Input: requirements from the shortfall calculator
// Output: persisted purchase_order + order_line rows, best-effort
//         supplier notification
// ==========================================
// Items lacking an authorized supplier cannot be auto-ordered and are
// excluded from the batch (reported, not raised).
// Notification failure never rolls back the created order.
// ==========================================

use crate::domain::catalog::Item;
use crate::domain::order::{round_money, OrderLine, PurchaseOrder};
use crate::domain::types::OrderStatus;
use crate::engine::shortfall::ItemRequirement;
use crate::notify::SupplierNotifier;
use crate::repository::error::RepositoryResult;
use crate::repository::{ItemRepository, PurchaseOrderRepository, SupplierRepository};
use chrono::{Duration, NaiveDate, Utc};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, instrument, warn};
use uuid::Uuid;

// ==========================================
// Outcome types
// ==========================================

/// One created order with its lines.
#[derive(Debug, Clone)]
pub struct GeneratedOrder {
    pub order: PurchaseOrder,
    pub lines: Vec<OrderLine>,
}

/// Result of one generation batch.
#[derive(Debug, Default)]
pub struct GenerationOutcome {
    pub orders: Vec<GeneratedOrder>,
    pub skipped_no_supplier: Vec<String>, // item codes excluded from the batch
    pub notified: usize,
    pub notify_failed: usize, // logged, orders stand regardless
}

// ==========================================
// PurchaseOrderGenerator
// ==========================================
pub struct PurchaseOrderGenerator {
    item_repo: Arc<ItemRepository>,
    supplier_repo: Arc<SupplierRepository>,
    order_repo: Arc<PurchaseOrderRepository>,
    notifier: Arc<dyn SupplierNotifier>,
}

impl PurchaseOrderGenerator {
    pub fn new(
        item_repo: Arc<ItemRepository>,
        supplier_repo: Arc<SupplierRepository>,
        order_repo: Arc<PurchaseOrderRepository>,
        notifier: Arc<dyn SupplierNotifier>,
    ) -> Self {
        Self {
            item_repo,
            supplier_repo,
            order_repo,
            notifier,
        }
    }

    /// Create one draft order per authorized supplier covering the given
    /// requirements, persist them, then best-effort notify each supplier.
    #[instrument(skip(self, requirements), fields(requirement_count = requirements.len()))]
    pub async fn generate(
        &self,
        requirements: &[ItemRequirement],
        today: NaiveDate,
    ) -> RepositoryResult<GenerationOutcome> {
        let mut outcome = GenerationOutcome::default();

        // 1. Group by authorized supplier. BTreeMap keeps order creation
        //    deterministic across runs.
        let mut groups: BTreeMap<String, Vec<(Item, f64)>> = BTreeMap::new();

        for req in requirements {
            if req.quantity <= 0.0 {
                continue;
            }
            let item = match self.item_repo.find_by_code(&req.item_code)? {
                Some(i) => i,
                None => {
                    warn!(item_code = %req.item_code, "requirement references unknown item, skipped");
                    continue;
                }
            };
            match item.supplier_id.clone() {
                Some(supplier_id) => {
                    groups.entry(supplier_id).or_default().push((item, req.quantity));
                }
                None => {
                    debug!(item_code = %item.code, "no authorized supplier, excluded from auto-ordering");
                    outcome.skipped_no_supplier.push(item.code);
                }
            }
        }

        // 2. One draft order per supplier group.
        for (supplier_id, group) in groups {
            let max_lead = group
                .iter()
                .map(|(item, _)| item.lead_time_days.max(0))
                .max()
                .unwrap_or(0);
            let expected_date = today + Duration::days(max_lead as i64);

            let order_id = Uuid::new_v4().to_string();
            let now = Utc::now();

            let lines: Vec<OrderLine> = group
                .iter()
                .map(|(item, qty)| {
                    let unit_cost = item.cost_or_zero();
                    OrderLine {
                        line_id: Uuid::new_v4().to_string(),
                        order_id: order_id.clone(),
                        item_code: item.code.clone(),
                        quantity: *qty,
                        unit: item.canonical_unit.clone(),
                        unit_cost,
                        subtotal: round_money(unit_cost * qty),
                    }
                })
                .collect();

            let total = round_money(lines.iter().map(|l| l.subtotal).sum());

            let order = PurchaseOrder {
                order_id: order_id.clone(),
                supplier_id: supplier_id.clone(),
                status: OrderStatus::Draft,
                order_date: today,
                expected_date,
                total,
                created_at: now,
                updated_at: now,
            };

            self.order_repo.insert_with_lines(&order, &lines)?;
            debug!(
                order_id = %order_id,
                supplier_id = %supplier_id,
                lines = lines.len(),
                total,
                "draft purchase order created"
            );

            // 3. Best-effort notification; the order is already committed
            //    and a delivery failure must not affect it.
            match self.notify_supplier(&supplier_id, &order, &lines).await {
                Ok(()) => outcome.notified += 1,
                Err(e) => {
                    warn!(order_id = %order_id, supplier_id = %supplier_id, error = %e, "supplier notification failed, order stands");
                    outcome.notify_failed += 1;
                }
            }

            outcome.orders.push(GeneratedOrder { order, lines });
        }

        Ok(outcome)
    }

    async fn notify_supplier(
        &self,
        supplier_id: &str,
        order: &PurchaseOrder,
        lines: &[OrderLine],
    ) -> anyhow::Result<()> {
        let supplier = self
            .supplier_repo
            .find_by_id(supplier_id)?
            .ok_or_else(|| anyhow::anyhow!("supplier {} not found", supplier_id))?;

        let destination = supplier
            .contact_phone
            .or(supplier.contact_email)
            .ok_or_else(|| anyhow::anyhow!("supplier {} has no contact destination", supplier_id))?;

        let mut payload = format!(
            "Purchase order {} ({} lines, total {:.2}), expected delivery {}:\n",
            order.order_id,
            lines.len(),
            order.total,
            order.expected_date
        );
        for line in lines {
            payload.push_str(&format!(
                "- {}: {:.3} {}\n",
                line.item_code, line.quantity, line.unit
            ));
        }

        self.notifier.notify(&destination, &payload).await
    }
}
