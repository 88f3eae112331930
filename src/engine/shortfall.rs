// ==========================================
// Resto Supply - inventory shortfall engine
// ==========================================
// Responsibility: given a menu schedule, compute net item quantities still
// needed after current stock, plus the independent safety-floor check.
// Input: schedule id
// Output: ShortfallReport (plan list / safety list / sufficient list)
// ==========================================
// Two deliberately separate concerns:
// 1) "fulfil this plan"    - shortfall against the schedule's needs
// 2) "replenish the floor" - any item below its safety minimum, whether or
//    not the current schedule needs it
// ==========================================

use crate::config::ConfigManager;
use crate::engine::units;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::{
    InventoryRepository, ItemRepository, MenuScheduleRepository, RecipeRepository,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{instrument, warn};

// ==========================================
// Report types
// ==========================================

/// One item that must be purchased, with the buffered order quantity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShortfallEntry {
    pub item_code: String,
    pub needed: f64,   // plan list: schedule need; safety list: min_qty
    pub on_hand: f64,
    pub to_order: f64, // (needed - on_hand) * buffer, in the canonical unit
}

/// One item whose need is fully covered by on-hand stock.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SufficientEntry {
    pub item_code: String,
    pub needed: f64,
    pub on_hand: f64,
}

/// Output of a shortfall calculation. The two to-buy lists are disjoint;
/// an item below its floor that the plan already orders appears only in
/// the plan list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShortfallReport {
    pub schedule_id: String,
    pub location: String,
    pub to_buy_for_plan: Vec<ShortfallEntry>,
    pub to_buy_for_safety: Vec<ShortfallEntry>,
    pub sufficient: Vec<SufficientEntry>,
    pub warnings: Vec<String>,
}

/// Flat (item, quantity) pair handed to the purchase-order generator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemRequirement {
    pub item_code: String,
    pub quantity: f64, // in the item's canonical unit
}

impl ShortfallReport {
    /// Plan-driven requirements first, then safety-floor requirements,
    /// so callers can prioritize plan purchasing.
    pub fn requirements(&self) -> Vec<ItemRequirement> {
        self.to_buy_for_plan
            .iter()
            .chain(self.to_buy_for_safety.iter())
            .map(|e| ItemRequirement {
                item_code: e.item_code.clone(),
                quantity: e.to_order,
            })
            .collect()
    }
}

/// Shortfall is never negative, including on_hand > need.
pub fn shortfall_qty(need: f64, on_hand: f64) -> f64 {
    (need - on_hand).max(0.0)
}

// ==========================================
// ShortfallCalculator
// ==========================================
pub struct ShortfallCalculator {
    schedule_repo: Arc<MenuScheduleRepository>,
    recipe_repo: Arc<RecipeRepository>,
    item_repo: Arc<ItemRepository>,
    inventory_repo: Arc<InventoryRepository>,
    config: Arc<ConfigManager>,
}

impl ShortfallCalculator {
    pub fn new(
        schedule_repo: Arc<MenuScheduleRepository>,
        recipe_repo: Arc<RecipeRepository>,
        item_repo: Arc<ItemRepository>,
        inventory_repo: Arc<InventoryRepository>,
        config: Arc<ConfigManager>,
    ) -> Self {
        Self {
            schedule_repo,
            recipe_repo,
            item_repo,
            inventory_repo,
            config,
        }
    }

    /// Compute the shortfall report for one schedule.
    #[instrument(skip(self))]
    pub fn calculate(&self, schedule_id: &str) -> RepositoryResult<ShortfallReport> {
        let schedule = self
            .schedule_repo
            .find_by_id(schedule_id)?
            .ok_or_else(|| RepositoryError::NotFound {
                entity: "MenuSchedule".to_string(),
                id: schedule_id.to_string(),
            })?;

        let mut warnings: Vec<String> = Vec::new();

        // 1. Expand scheduled recipes into total need per item, in the
        //    item's canonical unit. BTreeMap keeps output deterministic.
        let mut needs: BTreeMap<String, f64> = BTreeMap::new();

        for sched_item in self.schedule_repo.list_items(schedule_id)? {
            let recipe = match self.recipe_repo.find_by_id(&sched_item.recipe_id)? {
                Some(r) => r,
                None => {
                    warnings.push(format!("recipe {} not found, skipped", sched_item.recipe_id));
                    continue;
                }
            };
            if recipe.portions <= 0 {
                warnings.push(format!(
                    "recipe {} has non-positive portion yield, skipped",
                    recipe.recipe_id
                ));
                continue;
            }
            let scale = sched_item.target_portions as f64 / recipe.portions as f64;

            for ing in self.recipe_repo.list_ingredients(&recipe.recipe_id)? {
                let item = match self.item_repo.find_by_code(&ing.item_code)? {
                    Some(i) => i,
                    None => {
                        warnings.push(format!("item {} not found, skipped", ing.item_code));
                        continue;
                    }
                };

                let scaled_qty = ing.quantity * scale;
                let qty = if ing.unit.trim().eq_ignore_ascii_case(&item.canonical_unit) {
                    scaled_qty
                } else {
                    match units::convert(scaled_qty, &ing.unit, &item.canonical_unit) {
                        Ok(q) => q,
                        Err(e) => {
                            warn!(item_code = %item.code, error = %e, "ingredient unit not convertible, raw quantity used");
                            warnings.push(format!(
                                "item {}: ingredient unit '{}' not convertible to '{}', raw quantity used",
                                item.code, ing.unit, item.canonical_unit
                            ));
                            scaled_qty
                        }
                    }
                };

                *needs.entry(item.code).or_insert(0.0) += qty;
            }
        }

        // 2. Plan pass: shortfall against on-hand stock at the schedule's
        //    location, floored at zero; fully-covered items reported as
        //    sufficient for visibility.
        let plan_buffer = self.config.plan_buffer();
        let mut to_buy_for_plan: Vec<ShortfallEntry> = Vec::new();
        let mut sufficient: Vec<SufficientEntry> = Vec::new();

        for (item_code, need) in needs.iter().filter(|(_, need)| **need > 0.0) {
            let on_hand = self
                .inventory_repo
                .find(item_code, &schedule.location)?
                .map(|r| r.on_hand_qty)
                .unwrap_or(0.0);

            let shortfall = shortfall_qty(*need, on_hand);
            if shortfall > 0.0 {
                to_buy_for_plan.push(ShortfallEntry {
                    item_code: item_code.clone(),
                    needed: *need,
                    on_hand,
                    to_order: shortfall * plan_buffer,
                });
            } else {
                sufficient.push(SufficientEntry {
                    item_code: item_code.clone(),
                    needed: *need,
                    on_hand,
                });
            }
        }

        // 3. Safety pass: every stocked item at the location, independent
        //    of the schedule. Items the plan already orders are left out to
        //    keep the two lists disjoint.
        let safety_buffer = self.config.safety_buffer();
        let mut to_buy_for_safety: Vec<ShortfallEntry> = Vec::new();

        for record in self.inventory_repo.list_by_location(&schedule.location)? {
            if to_buy_for_plan
                .iter()
                .any(|e| e.item_code == record.item_code)
            {
                continue;
            }
            let below = record.below_min_by();
            if below > 0.0 {
                to_buy_for_safety.push(ShortfallEntry {
                    item_code: record.item_code.clone(),
                    needed: record.min_qty,
                    on_hand: record.on_hand_qty,
                    to_order: below * safety_buffer,
                });
            }
        }

        Ok(ShortfallReport {
            schedule_id: schedule_id.to_string(),
            location: schedule.location,
            to_buy_for_plan,
            to_buy_for_safety,
            sufficient,
            warnings,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shortfall_never_negative() {
        assert_eq!(shortfall_qty(20.0, 5.0), 15.0);
        assert_eq!(shortfall_qty(12.0, 15.0), 0.0);
        assert_eq!(shortfall_qty(0.0, 0.0), 0.0);
        assert_eq!(shortfall_qty(-3.0, 1.0), 0.0);
    }
}
