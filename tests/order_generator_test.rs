// ==========================================
// Purchase order generation integration tests
// ==========================================
// Target: supplier grouping, the no-supplier exclusion, money rounding,
// lead-time-driven expected dates, and notification failure tolerance.
// ==========================================

mod test_helpers;

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{Duration, Utc};
use resto_supply::app::AppState;
use resto_supply::notify::SupplierNotifier;
use tempfile::NamedTempFile;
use test_helpers::*;

/// Records every outbound message; optionally fails all deliveries.
struct RecordingNotifier {
    sent: Mutex<Vec<(String, String)>>,
    fail: bool,
}

impl RecordingNotifier {
    fn new(fail: bool) -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail,
        }
    }
}

#[async_trait]
impl SupplierNotifier for RecordingNotifier {
    async fn notify(&self, destination: &str, payload: &str) -> anyhow::Result<()> {
        if self.fail {
            anyhow::bail!("transport down");
        }
        self.sent
            .lock()
            .unwrap()
            .push((destination.to_string(), payload.to_string()));
        Ok(())
    }
}

fn create_state_with_notifier(
    notifier: Arc<RecordingNotifier>,
) -> (NamedTempFile, AppState) {
    resto_supply::logging::init_test();
    let temp_file = NamedTempFile::new().expect("temp db file");
    let db_path = temp_file.path().to_str().unwrap().to_string();
    let state = AppState::with_notifier(db_path, notifier).expect("AppState init");
    (temp_file, state)
}

#[tokio::test]
async fn test_one_order_per_supplier() {
    let notifier = Arc::new(RecordingNotifier::new(false));
    let (_tmp, state) = create_state_with_notifier(notifier.clone());

    seed_supplier(&state, "S-MEAT", "Carnes del Sur", Some("+5491144445555"));
    seed_supplier(&state, "S-VEG", "Verduras Lopez", Some("+5491166667777"));
    seed_item(&state, "CHICKEN", "kg", Some("S-MEAT"), Some(3.20), 2);
    seed_item(&state, "BEEF", "kg", Some("S-MEAT"), Some(8.50), 3);
    seed_item(&state, "TOMATO", "kg", Some("S-VEG"), Some(0.90), 1);
    seed_recipe(
        &state,
        "R-MIX",
        10,
        &[("CHICKEN", 10.0, "kg"), ("BEEF", 4.0, "kg"), ("TOMATO", 6.0, "kg")],
    );
    seed_schedule(&state, "SCH-1", "CENTRO", &[("R-MIX", 10)]);

    let outcome = state.purchasing_api.generate_orders("SCH-1").await.unwrap();

    assert_eq!(outcome.orders.len(), 2);
    assert!(outcome.skipped_no_supplier.is_empty());
    assert_eq!(outcome.notified, 2);
    assert_eq!(outcome.notify_failed, 0);

    let meat = outcome
        .orders
        .iter()
        .find(|o| o.order.supplier_id == "S-MEAT")
        .expect("meat order");
    let veg = outcome
        .orders
        .iter()
        .find(|o| o.order.supplier_id == "S-VEG")
        .expect("veg order");
    assert_eq!(meat.lines.len(), 2);
    assert_eq!(veg.lines.len(), 1);

    // Line quantities carry the plan buffer: (need - 0) * 1.10.
    let chicken = meat
        .lines
        .iter()
        .find(|l| l.item_code == "CHICKEN")
        .unwrap();
    assert!((chicken.quantity - 11.0).abs() < 1e-9);

    // Orders are persisted, not just returned.
    let (stored, stored_lines) = state.purchasing_api.get_order(&meat.order.order_id).unwrap();
    assert_eq!(stored.supplier_id, "S-MEAT");
    assert_eq!(stored_lines.len(), 2);

    // One message per supplier, sent to the contact phone.
    let sent = notifier.sent.lock().unwrap();
    assert_eq!(sent.len(), 2);
    assert!(sent.iter().any(|(dest, _)| dest == "+5491144445555"));
}

#[tokio::test]
async fn test_totals_and_expected_date() {
    let notifier = Arc::new(RecordingNotifier::new(false));
    let (_tmp, state) = create_state_with_notifier(notifier);

    seed_supplier(&state, "S1", "Carnes del Sur", Some("+5491144445555"));
    // Lead times 2 and 5: expected date follows the slowest line.
    seed_item(&state, "CHICKEN", "kg", Some("S1"), Some(3.333), 2);
    seed_item(&state, "BEEF", "kg", Some("S1"), Some(8.499), 5);
    seed_recipe(&state, "R-MIX", 10, &[("CHICKEN", 10.0, "kg"), ("BEEF", 4.0, "kg")]);
    seed_schedule(&state, "SCH-1", "CENTRO", &[("R-MIX", 10)]);

    let outcome = state.purchasing_api.generate_orders("SCH-1").await.unwrap();
    assert_eq!(outcome.orders.len(), 1);
    let generated = &outcome.orders[0];

    let today = Utc::now().date_naive();
    assert_eq!(generated.order.order_date, today);
    assert_eq!(generated.order.expected_date, today + Duration::days(5));

    // Subtotals are rounded to cents and the total is their exact sum.
    for line in &generated.lines {
        assert!((line.subtotal * 100.0 - (line.subtotal * 100.0).round()).abs() < 1e-9);
    }
    let sum: f64 = generated.lines.iter().map(|l| l.subtotal).sum();
    assert!((generated.order.total - (sum * 100.0).round() / 100.0).abs() < 1e-9);
}

#[tokio::test]
async fn test_items_without_supplier_are_excluded() {
    let notifier = Arc::new(RecordingNotifier::new(false));
    let (_tmp, state) = create_state_with_notifier(notifier);

    seed_supplier(&state, "S1", "Verduras Lopez", Some("+5491166667777"));
    seed_item(&state, "TOMATO", "kg", Some("S1"), Some(0.90), 1);
    seed_item(&state, "HERBS", "kg", None, Some(12.0), 1);
    seed_recipe(&state, "R-SALSA", 10, &[("TOMATO", 6.0, "kg"), ("HERBS", 0.5, "kg")]);
    seed_schedule(&state, "SCH-1", "CENTRO", &[("R-SALSA", 10)]);

    let outcome = state.purchasing_api.generate_orders("SCH-1").await.unwrap();

    assert_eq!(outcome.orders.len(), 1);
    assert_eq!(outcome.skipped_no_supplier, vec!["HERBS".to_string()]);
    assert!(outcome.orders[0]
        .lines
        .iter()
        .all(|l| l.item_code == "TOMATO"));
}

#[tokio::test]
async fn test_notification_failure_does_not_roll_back() {
    let notifier = Arc::new(RecordingNotifier::new(true));
    let (_tmp, state) = create_state_with_notifier(notifier);

    seed_supplier(&state, "S1", "Carnes del Sur", Some("+5491144445555"));
    seed_item(&state, "CHICKEN", "kg", Some("S1"), Some(3.20), 2);
    seed_recipe(&state, "R-GRILL", 10, &[("CHICKEN", 10.0, "kg")]);
    seed_schedule(&state, "SCH-1", "CENTRO", &[("R-GRILL", 10)]);

    let outcome = state.purchasing_api.generate_orders("SCH-1").await.unwrap();

    assert_eq!(outcome.orders.len(), 1);
    assert_eq!(outcome.notified, 0);
    assert_eq!(outcome.notify_failed, 1);

    // The order survived the failed delivery.
    let order_id = &outcome.orders[0].order.order_id;
    assert!(state.purchasing_api.get_order(order_id).is_ok());
}

#[tokio::test]
async fn test_fully_stocked_schedule_creates_no_orders() {
    let notifier = Arc::new(RecordingNotifier::new(false));
    let (_tmp, state) = create_state_with_notifier(notifier);

    seed_supplier(&state, "S1", "Verduras Lopez", Some("+5491166667777"));
    seed_item(&state, "TOMATO", "kg", Some("S1"), Some(0.90), 1);
    seed_recipe(&state, "R-SALSA", 10, &[("TOMATO", 6.0, "kg")]);
    seed_schedule(&state, "SCH-1", "CENTRO", &[("R-SALSA", 10)]);
    seed_inventory(&state, "TOMATO", "CENTRO", 50.0, 5.0);

    let outcome = state.purchasing_api.generate_orders("SCH-1").await.unwrap();
    assert!(outcome.orders.is_empty());
    assert_eq!(outcome.notified, 0);
}
