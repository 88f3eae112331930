// ==========================================
// Purchase order lifecycle integration tests
// ==========================================
// Target: the DRAFT -> SENT -> RECEIVED / CANCELLED state machine and
// the stock posting that receiving triggers.
// ==========================================

mod test_helpers;

use resto_supply::api::ApiError;
use resto_supply::domain::types::OrderStatus;
use test_helpers::*;

/// Seed a one-supplier, one-item shortfall and generate the draft order.
async fn seed_draft_order(state: &resto_supply::app::AppState) -> String {
    seed_supplier(state, "S1", "Carnes del Sur", Some("+5491144445555"));
    seed_item(state, "CHICKEN", "kg", Some("S1"), Some(3.20), 2);
    seed_recipe(state, "R-GRILL", 10, &[("CHICKEN", 10.0, "kg")]);
    seed_schedule(state, "SCH-1", "CENTRO", &[("R-GRILL", 10)]);

    let outcome = state.purchasing_api.generate_orders("SCH-1").await.unwrap();
    assert_eq!(outcome.orders.len(), 1);
    assert_eq!(outcome.orders[0].order.status, OrderStatus::Draft);
    outcome.orders[0].order.order_id.clone()
}

#[tokio::test]
async fn test_send_then_receive_posts_stock() {
    let (_tmp, state) = create_test_state();
    let order_id = seed_draft_order(&state).await;

    let sent = state.purchasing_api.send_order(&order_id).unwrap();
    assert_eq!(sent.status, OrderStatus::Sent);

    let received = state
        .purchasing_api
        .receive_order(&order_id, "CENTRO")
        .unwrap();
    assert_eq!(received.status, OrderStatus::Received);

    // The ordered 11 kg (10 kg need, +10% buffer) landed in stock.
    let stock = state
        .inventory_repo
        .find("CHICKEN", "CENTRO")
        .unwrap()
        .expect("stock record created");
    assert!((stock.on_hand_qty - 11.0).abs() < 1e-9);
}

#[tokio::test]
async fn test_receive_requires_sent() {
    let (_tmp, state) = create_test_state();
    let order_id = seed_draft_order(&state).await;

    let err = state
        .purchasing_api
        .receive_order(&order_id, "CENTRO")
        .unwrap_err();
    assert!(matches!(err, ApiError::InvalidStateTransition { .. }));

    // No stock posted on the failed transition.
    assert!(state.inventory_repo.find("CHICKEN", "CENTRO").unwrap().is_none());

    // Same guarantee after cancellation: the order stays cancelled and
    // nothing reaches inventory.
    state.purchasing_api.cancel_order(&order_id).unwrap();
    let err = state
        .purchasing_api
        .receive_order(&order_id, "CENTRO")
        .unwrap_err();
    assert!(matches!(err, ApiError::InvalidStateTransition { .. }));
    let (order, _) = state.purchasing_api.get_order(&order_id).unwrap();
    assert_eq!(order.status, OrderStatus::Cancelled);
    assert!(state.inventory_repo.find("CHICKEN", "CENTRO").unwrap().is_none());
}

#[tokio::test]
async fn test_cancel_draft_and_sent_but_not_received() {
    let (_tmp, state) = create_test_state();

    // Draft can be cancelled.
    let draft_id = seed_draft_order(&state).await;
    let cancelled = state.purchasing_api.cancel_order(&draft_id).unwrap();
    assert_eq!(cancelled.status, OrderStatus::Cancelled);

    // Once cancelled, nothing moves.
    let err = state.purchasing_api.send_order(&draft_id).unwrap_err();
    assert!(matches!(err, ApiError::InvalidStateTransition { .. }));

    // A received order can no longer be cancelled.
    seed_schedule(&state, "SCH-2", "CENTRO", &[("R-GRILL", 10)]);
    let outcome = state.purchasing_api.generate_orders("SCH-2").await.unwrap();
    let order_id = outcome.orders[0].order.order_id.clone();
    state.purchasing_api.send_order(&order_id).unwrap();
    state
        .purchasing_api
        .receive_order(&order_id, "CENTRO")
        .unwrap();
    let err = state.purchasing_api.cancel_order(&order_id).unwrap_err();
    assert!(matches!(err, ApiError::InvalidStateTransition { .. }));
}

#[tokio::test]
async fn test_unknown_order_is_not_found() {
    let (_tmp, state) = create_test_state();
    let err = state.purchasing_api.send_order("missing").unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));
    let err = state.purchasing_api.get_order("missing").unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));
}
