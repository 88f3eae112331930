// ==========================================
// ShortfallCalculator integration tests
// ==========================================
// Target: recipe expansion, zero-floored shortfall, the sufficient list,
// buffers, and the independent safety-floor pass.
// ==========================================

mod test_helpers;

use test_helpers::*;

#[test]
fn test_covered_need_is_reported_sufficient() {
    let (_tmp, state) = create_test_state();
    seed_supplier(&state, "S1", "Proveedora Norte", None);
    seed_item(&state, "TOMATO", "kg", Some("S1"), Some(0.9), 1);
    seed_recipe(&state, "R-SALSA", 10, &[("TOMATO", 12.0, "kg")]);
    seed_schedule(&state, "SCH-1", "CENTRO", &[("R-SALSA", 10)]);
    seed_inventory(&state, "TOMATO", "CENTRO", 15.0, 2.0);

    let report = state.purchasing_api.plan_purchases("SCH-1").unwrap();

    assert!(report.to_buy_for_plan.is_empty());
    assert_eq!(report.sufficient.len(), 1);
    let entry = &report.sufficient[0];
    assert_eq!(entry.item_code, "TOMATO");
    assert!((entry.needed - 12.0).abs() < 1e-9);
    assert!((entry.on_hand - 15.0).abs() < 1e-9);

    // Stock consumption flips the same schedule into shortfall.
    state
        .inventory_repo
        .adjust_on_hand("TOMATO", "CENTRO", -10.0)
        .unwrap();
    let report = state.purchasing_api.plan_purchases("SCH-1").unwrap();
    assert_eq!(report.to_buy_for_plan.len(), 1);
    assert!((report.to_buy_for_plan[0].on_hand - 5.0).abs() < 1e-9);
}

#[test]
fn test_shortfall_with_plan_buffer() {
    let (_tmp, state) = create_test_state();
    seed_supplier(&state, "S1", "Proveedora Norte", None);
    seed_item(&state, "CHICKEN", "kg", Some("S1"), Some(3.2), 2);
    seed_recipe(&state, "R-GRILL", 10, &[("CHICKEN", 20.0, "kg")]);
    seed_schedule(&state, "SCH-1", "CENTRO", &[("R-GRILL", 10)]);
    seed_inventory(&state, "CHICKEN", "CENTRO", 5.0, 1.0);

    let report = state.purchasing_api.plan_purchases("SCH-1").unwrap();

    assert_eq!(report.to_buy_for_plan.len(), 1);
    let entry = &report.to_buy_for_plan[0];
    assert_eq!(entry.item_code, "CHICKEN");
    // (20 - 5) * 1.10 = 16.5
    assert!((entry.to_order - 16.5).abs() < 1e-9);
    assert!(report.sufficient.is_empty());
    // Shortfalled item is not duplicated into the safety list.
    assert!(report.to_buy_for_safety.is_empty());
}

#[test]
fn test_portion_scaling_and_aggregation_across_recipes() {
    let (_tmp, state) = create_test_state();
    seed_supplier(&state, "S1", "Proveedora Norte", None);
    seed_item(&state, "RICE", "kg", Some("S1"), Some(1.1), 2);
    // Recipe stated for 4 portions; schedule wants 10 -> scale 2.5.
    seed_recipe(&state, "R-A", 4, &[("RICE", 2.0, "kg")]);
    // Second recipe in grams, stated for 10 portions; schedule wants 20.
    seed_recipe(&state, "R-B", 10, &[("RICE", 500.0, "g")]);
    seed_schedule(&state, "SCH-1", "CENTRO", &[("R-A", 10), ("R-B", 20)]);

    let report = state.purchasing_api.plan_purchases("SCH-1").unwrap();

    // Need = 2.0 * 2.5 + 0.5 kg * 2 = 6.0 kg; no stock record -> on_hand 0.
    assert_eq!(report.to_buy_for_plan.len(), 1);
    let entry = &report.to_buy_for_plan[0];
    assert!((entry.needed - 6.0).abs() < 1e-9);
    assert!((entry.on_hand - 0.0).abs() < 1e-12);
    assert!((entry.to_order - 6.6).abs() < 1e-9);
}

#[test]
fn test_safety_floor_pass_is_independent_of_schedule() {
    let (_tmp, state) = create_test_state();
    seed_supplier(&state, "S1", "Proveedora Norte", None);
    seed_item(&state, "TOMATO", "kg", Some("S1"), Some(0.9), 1);
    seed_item(&state, "BLEACH", "l", Some("S1"), Some(1.5), 5);
    seed_recipe(&state, "R-SALSA", 10, &[("TOMATO", 10.0, "kg")]);
    seed_schedule(&state, "SCH-1", "CENTRO", &[("R-SALSA", 10)]);
    seed_inventory(&state, "TOMATO", "CENTRO", 30.0, 5.0);
    // Not needed by the schedule, but below its floor of 10 l.
    seed_inventory(&state, "BLEACH", "CENTRO", 4.0, 10.0);

    let report = state.purchasing_api.plan_purchases("SCH-1").unwrap();

    assert!(report.to_buy_for_plan.is_empty());
    assert_eq!(report.to_buy_for_safety.len(), 1);
    let entry = &report.to_buy_for_safety[0];
    assert_eq!(entry.item_code, "BLEACH");
    // (10 - 4) * 1.20 = 7.2
    assert!((entry.to_order - 7.2).abs() < 1e-9);
}

#[test]
fn test_incompatible_ingredient_unit_warns_and_uses_raw_quantity() {
    let (_tmp, state) = create_test_state();
    seed_supplier(&state, "S1", "Proveedora Norte", None);
    // Weight-canonical item, recipe written in a volume unit.
    seed_item(&state, "HONEY", "kg", Some("S1"), Some(5.4), 3);
    seed_recipe(&state, "R-GLAZE", 10, &[("HONEY", 2.0, "l")]);
    seed_schedule(&state, "SCH-1", "CENTRO", &[("R-GLAZE", 10)]);

    let report = state.purchasing_api.plan_purchases("SCH-1").unwrap();

    assert_eq!(report.warnings.len(), 1);
    assert!(report.warnings[0].contains("HONEY"));
    assert!(report.warnings[0].contains("not convertible"));

    // The raw scaled quantity still feeds the need (degraded, not dropped).
    assert_eq!(report.to_buy_for_plan.len(), 1);
    let entry = &report.to_buy_for_plan[0];
    assert_eq!(entry.item_code, "HONEY");
    assert!((entry.needed - 2.0).abs() < 1e-9);
    assert!((entry.to_order - 2.2).abs() < 1e-9);
}

#[test]
fn test_configured_buffers_override_defaults() {
    let (_tmp, state) = create_test_state();
    state
        .config
        .set_value(resto_supply::config::KEY_PLAN_BUFFER, "1.50")
        .unwrap();

    seed_supplier(&state, "S1", "Proveedora Norte", None);
    seed_item(&state, "CHICKEN", "kg", Some("S1"), None, 2);
    seed_recipe(&state, "R-GRILL", 10, &[("CHICKEN", 10.0, "kg")]);
    seed_schedule(&state, "SCH-1", "CENTRO", &[("R-GRILL", 10)]);

    let report = state.purchasing_api.plan_purchases("SCH-1").unwrap();
    assert!((report.to_buy_for_plan[0].to_order - 15.0).abs() < 1e-9);
}

#[test]
fn test_missing_schedule_is_not_found() {
    let (_tmp, state) = create_test_state();
    let err = state.purchasing_api.plan_purchases("NOPE").unwrap_err();
    assert!(matches!(err, resto_supply::api::ApiError::NotFound(_)));
}
