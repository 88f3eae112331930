// ==========================================
// Test helpers
// ==========================================
// Temp-database setup and seed-data builders shared by the integration
// tests (each test file pulls this in with `mod test_helpers;`).
// ==========================================

#![allow(dead_code)]

use chrono::{NaiveDate, Utc};
use resto_supply::app::AppState;
use resto_supply::domain::types::{InvoiceStatus, ItemCategory};
use resto_supply::domain::{
    InventoryRecord, Invoice, InvoiceLine, Item, MenuSchedule, Recipe, RecipeIngredient,
    ScheduleItem, Supplier,
};
use tempfile::NamedTempFile;
use uuid::Uuid;

/// Create a temp database and a fully wired AppState over it.
///
/// The NamedTempFile must be kept alive for the duration of the test.
pub fn create_test_state() -> (NamedTempFile, AppState) {
    resto_supply::logging::init_test();
    let temp_file = NamedTempFile::new().expect("temp db file");
    let db_path = temp_file.path().to_str().unwrap().to_string();
    let state = AppState::new(db_path).expect("AppState init");
    (temp_file, state)
}

pub fn seed_supplier(state: &AppState, supplier_id: &str, name: &str, phone: Option<&str>) {
    let now = Utc::now();
    state
        .supplier_repo
        .upsert(&Supplier {
            supplier_id: supplier_id.to_string(),
            name: name.to_string(),
            contact_phone: phone.map(str::to_string),
            contact_email: None,
            active: true,
            created_at: now,
            updated_at: now,
        })
        .expect("seed supplier");
}

pub fn seed_item(
    state: &AppState,
    code: &str,
    canonical_unit: &str,
    supplier_id: Option<&str>,
    current_unit_cost: Option<f64>,
    lead_time_days: i32,
) {
    let now = Utc::now();
    state
        .item_repo
        .upsert(&Item {
            code: code.to_string(),
            name: code.to_string(),
            category: ItemCategory::RawMaterial,
            canonical_unit: canonical_unit.to_string(),
            supplier_id: supplier_id.map(str::to_string),
            current_unit_cost,
            lead_time_days,
            active: true,
            created_at: now,
            updated_at: now,
        })
        .expect("seed item");
}

/// Insert a single-line invoice and approve it at the given timestamp
/// (approved qty = invoiced qty).
pub fn seed_approved_invoice(
    state: &AppState,
    supplier_id: &str,
    item_code: &str,
    unit: &str,
    unit_price: f64,
    qty: f64,
    approved_at: chrono::DateTime<Utc>,
) -> String {
    let invoice_id = Uuid::new_v4().to_string();
    let invoice = Invoice {
        invoice_id: invoice_id.clone(),
        supplier_id: Some(supplier_id.to_string()),
        invoice_number: None,
        invoice_date: approved_at.date_naive(),
        status: InvoiceStatus::Pending,
        approved_at: None,
        created_at: approved_at,
    };
    let line = InvoiceLine {
        line_id: Uuid::new_v4().to_string(),
        invoice_id: invoice_id.clone(),
        item_code: Some(item_code.to_string()),
        description: item_code.to_string(),
        unit: unit.to_string(),
        unit_price,
        invoiced_qty: qty,
        approved_qty: None,
    };
    state
        .invoice_repo
        .insert_with_lines(&invoice, &[line])
        .expect("seed invoice");
    state
        .invoice_repo
        .approve(&invoice_id, approved_at, &[])
        .expect("approve invoice");
    invoice_id
}

pub fn seed_inventory(state: &AppState, item_code: &str, location: &str, on_hand: f64, min: f64) {
    state
        .inventory_repo
        .upsert(&InventoryRecord {
            item_code: item_code.to_string(),
            location: location.to_string(),
            on_hand_qty: on_hand,
            min_qty: min,
            updated_at: Utc::now(),
        })
        .expect("seed inventory");
}

/// Insert a recipe with its ingredient lines: (item_code, quantity, unit).
pub fn seed_recipe(
    state: &AppState,
    recipe_id: &str,
    portions: i32,
    ingredients: &[(&str, f64, &str)],
) {
    let recipe = Recipe {
        recipe_id: recipe_id.to_string(),
        name: recipe_id.to_string(),
        portions,
        active: true,
        created_at: Utc::now(),
    };
    let lines: Vec<RecipeIngredient> = ingredients
        .iter()
        .map(|(item_code, qty, unit)| RecipeIngredient {
            recipe_id: recipe_id.to_string(),
            item_code: item_code.to_string(),
            quantity: *qty,
            unit: unit.to_string(),
        })
        .collect();
    state
        .recipe_repo
        .upsert_with_ingredients(&recipe, &lines)
        .expect("seed recipe");
}

/// Insert a schedule referencing (recipe_id, target_portions) pairs.
pub fn seed_schedule(
    state: &AppState,
    schedule_id: &str,
    location: &str,
    recipes: &[(&str, i32)],
) {
    let schedule = MenuSchedule {
        schedule_id: schedule_id.to_string(),
        name: schedule_id.to_string(),
        location: location.to_string(),
        start_date: NaiveDate::from_ymd_opt(2026, 9, 1).unwrap(),
        end_date: NaiveDate::from_ymd_opt(2026, 9, 7).unwrap(),
        created_at: Utc::now(),
    };
    let items: Vec<ScheduleItem> = recipes
        .iter()
        .map(|(recipe_id, portions)| ScheduleItem {
            schedule_id: schedule_id.to_string(),
            recipe_id: recipe_id.to_string(),
            target_portions: *portions,
        })
        .collect();
    state
        .schedule_repo
        .upsert_with_items(&schedule, &items)
        .expect("seed schedule");
}
