use super::*;

#[test]
fn test_create_order() {
    let (engine, _store, _clock) = create_test_engine(10);

    let order = engine.create_order(new_order(2)).unwrap();

    assert_eq!(order.status, OrderStatus::CreatedUnpaid);
    assert_eq!(order.code.len(), 8);
    assert_eq!(order.code_suffix, order.code[4..]);
    assert_eq!(order.product_name, "Test Product");
    assert_eq!(order.unit_price, Decimal::new(1000, 2));
    assert_eq!(order.total_amount, Decimal::new(2000, 2));
    assert!(order.token.is_none());

    // Creation holds no stock
    assert_eq!(available(&engine), 10);
}

#[test]
fn test_create_order_rejects_bad_quantity() {
    let (engine, _store, _clock) = create_test_engine(10);

    assert!(matches!(
        engine.create_order(new_order(0)),
        Err(EngineError::InvalidQuantity(0))
    ));
    assert!(matches!(
        engine.create_order(new_order(-3)),
        Err(EngineError::InvalidQuantity(-3))
    ));
}

#[test]
fn test_create_order_unknown_product() {
    let (engine, _store, _clock) = create_test_engine(10);

    let mut input = new_order(1);
    input.product_id = 99;
    assert!(matches!(
        engine.create_order(input),
        Err(EngineError::ProductNotFound(99))
    ));
}

#[test]
fn test_reserve_holds_stock_and_issues_token() {
    let (engine, _store, clock) = create_test_engine(10);
    let order = engine.create_order(new_order(6)).unwrap();

    let reserved = engine.transition(&order.id, LifecycleEvent::Reserve).unwrap();

    assert_eq!(reserved.status, OrderStatus::Reserved);
    assert_eq!(
        reserved.reserved_until,
        Some(clock.now() + Duration::hours(48))
    );
    assert!(reserved.token.is_some());
    assert_eq!(available(&engine), 4);
}

#[test]
fn test_reserve_insufficient_stock() {
    let (engine, _store, _clock) = create_test_engine(5);
    let order = engine.create_order(new_order(8)).unwrap();

    let err = engine.transition(&order.id, LifecycleEvent::Reserve).unwrap_err();
    assert!(matches!(
        err,
        EngineError::InsufficientStock {
            requested: 8,
            available: 5
        }
    ));

    // No partial state change
    let order = engine.order(&order.id).unwrap().unwrap();
    assert_eq!(order.status, OrderStatus::CreatedUnpaid);
    assert!(order.reserved_until.is_none());
    assert_eq!(available(&engine), 5);
}

#[test]
fn test_out_of_table_transition_rejected() {
    let (engine, _store, _clock) = create_test_engine(10);
    let order = engine.create_order(new_order(1)).unwrap();

    let err = engine
        .transition(&order.id, LifecycleEvent::ConfirmPayment)
        .unwrap_err();
    assert!(matches!(
        err,
        EngineError::InvalidTransition {
            from: OrderStatus::CreatedUnpaid,
            event: LifecycleEvent::ConfirmPayment
        }
    ));

    // State untouched
    let order = engine.order(&order.id).unwrap().unwrap();
    assert_eq!(order.status, OrderStatus::CreatedUnpaid);
    assert_eq!(order.version, 0);
}

#[test]
fn test_transition_unknown_order() {
    let (engine, _store, _clock) = create_test_engine(10);
    assert!(matches!(
        engine.transition("no-such-id", LifecycleEvent::Reserve),
        Err(EngineError::OrderNotFound(_))
    ));
}

#[test]
fn test_issue_token_idempotent() {
    let (engine, _store, _clock) = create_test_engine(10);
    let order = engine.create_order(new_order(1)).unwrap();

    let first = engine.issue_token(&order.id).unwrap();
    let second = engine.issue_token(&order.id).unwrap();
    assert_eq!(first, second);
    assert_eq!(first.len(), 32);
}

#[test]
fn test_cancel_releases_stock_and_revokes_token() {
    let (engine, _store, _clock) = create_test_engine(10);
    let order = engine.create_order(new_order(4)).unwrap();
    engine.transition(&order.id, LifecycleEvent::Reserve).unwrap();
    assert_eq!(available(&engine), 6);

    let cancelled = engine.transition(&order.id, LifecycleEvent::Cancel).unwrap();

    assert_eq!(cancelled.status, OrderStatus::Cancelled);
    assert!(cancelled.token.is_none());
    assert!(cancelled.token_image_path.is_none());
    assert!(cancelled.reserved_until.is_none());
    assert_eq!(available(&engine), 10);
}

#[test]
fn test_find_by_code_and_suffix() {
    let (engine, _store, _clock) = create_test_engine(10);
    let order = engine.create_order(new_order(1)).unwrap();

    let by_full = engine.find_by_code(&order.code).unwrap();
    assert_eq!(by_full.len(), 1);
    assert_eq!(by_full[0].id, order.id);

    let by_suffix = engine.find_by_code(&order.code_suffix).unwrap();
    assert!(by_suffix.iter().any(|o| o.id == order.id));

    // Terms of any other length never hit the store
    assert!(engine.find_by_code("ab").unwrap().is_empty());
}

#[test]
fn test_codes_distinct_across_orders() {
    let (engine, _store, _clock) = create_test_engine(1000);
    let mut codes = std::collections::HashSet::new();
    for _ in 0..50 {
        let order = engine.create_order(new_order(1)).unwrap();
        assert!(codes.insert(order.code), "duplicate code allocated");
    }
}
