// ==========================================
// Resto Supply - cost standardization engine
// ==========================================
// Responsibility: one standardized-cost record per item from its most
// recent approved invoice history, expressed in the item's canonical unit.
// Input: item code
// Output: upserted standardized_cost row + overwritten item cost cache
// ==========================================
// Averaging is the plain arithmetic mean of per-invoice unit costs, NOT
// quantity-weighted. Preserved as-is; see DESIGN.md before changing.
// ==========================================

use crate::config::ConfigManager;
use crate::domain::catalog::Item;
use crate::domain::cost::StandardizedCost;
use crate::domain::invoice::ApprovedLine;
use crate::engine::units;
use crate::repository::error::RepositoryResult;
use crate::repository::{InvoiceRepository, ItemRepository, StandardizedCostRepository};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, instrument, warn};

// ==========================================
// CostStandardizer
// ==========================================
pub struct CostStandardizer {
    item_repo: Arc<ItemRepository>,
    invoice_repo: Arc<InvoiceRepository>,
    cost_repo: Arc<StandardizedCostRepository>,
    config: Arc<ConfigManager>,
}

/// Outcome of a batch recomputation run. Serialized as the batch
/// binary's machine-readable result line.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchSummary {
    pub updated: usize,
    pub skipped: usize, // insufficient data, no record produced
    pub failed: usize,  // logged and skipped, never aborts the run
}

impl CostStandardizer {
    pub fn new(
        item_repo: Arc<ItemRepository>,
        invoice_repo: Arc<InvoiceRepository>,
        cost_repo: Arc<StandardizedCostRepository>,
        config: Arc<ConfigManager>,
    ) -> Self {
        Self {
            item_repo,
            invoice_repo,
            cost_repo,
            config,
        }
    }

    // ==========================================
    // Core methods
    // ==========================================

    /// Recompute and persist the standardized cost of one item.
    ///
    /// # Returns
    /// - Ok(Some(record)): record upserted, item cost cache overwritten
    /// - Ok(None): insufficient data (zero qualifying invoice lines) —
    ///   callers must tolerate missing cost data
    /// - Err: database failure
    #[instrument(skip(self))]
    pub fn standardize_item(&self, item_code: &str) -> RepositoryResult<Option<StandardizedCost>> {
        let item = match self.item_repo.find_by_code(item_code)? {
            Some(item) if item.active => item,
            Some(_) => {
                debug!(item_code, "item inactive, skipping standardization");
                return Ok(None);
            }
            None => {
                debug!(item_code, "item not found, skipping standardization");
                return Ok(None);
            }
        };

        let window = self.config.invoice_window();
        let lines = self.invoice_repo.recent_approved_lines(item_code, window)?;

        let record = match Self::standardize_lines(&item, &lines) {
            Some(record) => record,
            None => {
                debug!(item_code, "insufficient data, no cost record produced");
                return Ok(None);
            }
        };

        self.cost_repo.upsert(&record)?;
        self.item_repo
            .update_current_cost(item_code, record.unit_cost)?;
        debug!(
            item_code,
            unit_cost = record.unit_cost,
            invoices_used = record.invoices_used,
            "standardized cost updated"
        );
        Ok(Some(record))
    }

    /// Weekly batch body: recompute every active item sequentially.
    /// A failure on one item is logged and the loop continues.
    #[instrument(skip(self))]
    pub fn standardize_all(&self) -> RepositoryResult<BatchSummary> {
        let items = self.item_repo.list_active()?;
        let mut summary = BatchSummary::default();

        for item in items {
            match self.standardize_item(&item.code) {
                Ok(Some(_)) => summary.updated += 1,
                Ok(None) => summary.skipped += 1,
                Err(e) => {
                    warn!(item_code = %item.code, error = %e, "cost standardization failed, continuing");
                    summary.failed += 1;
                }
            }
        }

        tracing::info!(
            updated = summary.updated,
            skipped = summary.skipped,
            failed = summary.failed,
            "cost recomputation batch finished"
        );
        Ok(summary)
    }

    // ==========================================
    // Pure calculation (no I/O)
    // ==========================================

    /// Compute the standardized cost from pre-fetched qualifying lines.
    ///
    /// Per line, in the item's canonical unit:
    /// - same unit: unit price as-is
    /// - same class: cost = unit_price * approved_qty / converted_qty
    /// - incompatible/unknown: raw unit price unconverted, warning note
    ///   (degraded but non-fatal; the record is still produced)
    ///
    /// Returns None when no line qualifies.
    pub fn standardize_lines(item: &Item, lines: &[ApprovedLine]) -> Option<StandardizedCost> {
        if lines.is_empty() {
            return None;
        }

        let canonical = item.canonical_unit.as_str();
        let mut per_invoice_costs: Vec<f64> = Vec::with_capacity(lines.len());
        let mut notes: Vec<String> = Vec::new();

        for line in lines {
            if line.unit.trim().eq_ignore_ascii_case(canonical) {
                per_invoice_costs.push(line.unit_price);
                continue;
            }

            match units::convert(line.approved_qty, &line.unit, canonical) {
                Ok(converted_qty) if converted_qty > 0.0 => {
                    let cost = line.unit_price * line.approved_qty / converted_qty;
                    per_invoice_costs.push(cost);
                    notes.push(format!(
                        "invoice {}: converted {:.3} {} -> {:.3} {}",
                        line.invoice_id, line.approved_qty, line.unit, converted_qty, canonical
                    ));
                }
                Ok(_) => {
                    // Zero converted quantity would divide by zero; degrade.
                    per_invoice_costs.push(line.unit_price);
                    notes.push(format!(
                        "WARNING invoice {}: zero converted quantity for {} {}, raw unit price used",
                        line.invoice_id, line.approved_qty, line.unit
                    ));
                }
                Err(e) => {
                    per_invoice_costs.push(line.unit_price);
                    notes.push(format!(
                        "WARNING invoice {}: unit '{}' not convertible to '{}' ({}), raw unit price used - estimate untrustworthy",
                        line.invoice_id, line.unit, canonical, e
                    ));
                }
            }
        }

        let n = per_invoice_costs.len();
        let mean = per_invoice_costs.iter().sum::<f64>() / n as f64;

        // Sample standard deviation; exactly zero with a single invoice
        // (no division, no NaN).
        let (variance_pct, variance_abs) = if n > 1 {
            let var = per_invoice_costs
                .iter()
                .map(|c| (c - mean).powi(2))
                .sum::<f64>()
                / (n - 1) as f64;
            let std_dev = var.sqrt();
            let pct = if mean != 0.0 {
                std_dev / mean * 100.0
            } else {
                0.0
            };
            let max = per_invoice_costs.iter().cloned().fold(f64::MIN, f64::max);
            let min = per_invoice_costs.iter().cloned().fold(f64::MAX, f64::min);
            (pct, max - min)
        } else {
            (0.0, 0.0)
        };

        Some(StandardizedCost {
            item_code: item.code.clone(),
            unit_cost: mean,
            canonical_unit: item.canonical_unit.clone(),
            invoices_used: n as i32,
            variance_pct,
            variance_abs,
            notes: notes.join("; "),
            calculated_at: Utc::now(),
        })
    }
}
