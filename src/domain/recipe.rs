// ==========================================
// Resto Supply - recipe and menu-schedule domain models
// ==========================================
// Aligned with: recipe / recipe_ingredient / menu_schedule / schedule_item
// A recipe yields `portions` servings; ingredient quantities are for that
// yield and are scaled linearly by a schedule's target portion count.
// ==========================================

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

// ==========================================
// Recipe - a named dish with a portion yield
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recipe {
    pub recipe_id: String, // uuid
    pub name: String,
    pub portions: i32, // yield the ingredient quantities are stated for
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

/// One (item, quantity, unit) line of a recipe.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeIngredient {
    pub recipe_id: String,
    pub item_code: String,
    pub quantity: f64,
    pub unit: String, // may differ from the item's canonical unit
}

// ==========================================
// MenuSchedule - a date-range-and-location scoped plan
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuSchedule {
    pub schedule_id: String, // uuid
    pub name: String,
    pub location: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

/// One scheduled recipe with its target portion count.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleItem {
    pub schedule_id: String,
    pub recipe_id: String,
    pub target_portions: i32,
}
