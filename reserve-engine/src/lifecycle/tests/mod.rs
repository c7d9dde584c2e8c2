use super::*;
use crate::clock::ManualClock;
use crate::store::MemoryStore;
use chrono::Duration;
use shared::{NewOrder, OrderSource, Product};

mod test_concurrency;
mod test_core;

/// Engine over a fresh memory store with one product stocked to `total`
fn create_test_engine(total: i64) -> (OrderEngine, Arc<MemoryStore>, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new(Utc::now()));
    let store = Arc::new(MemoryStore::new());
    let now = clock.now();
    store
        .insert_product(Product::new(1, "Test Product", 2, now).with_sell_price(Decimal::new(1000, 2)))
        .unwrap();
    store.record_receipt(1, total, now).unwrap();

    let engine = OrderEngine::new(store.clone(), clock.clone(), EngineConfig::default());
    (engine, store, clock)
}

fn new_order(quantity: i32) -> NewOrder {
    NewOrder {
        product_id: 1,
        quantity,
        unit_price: None,
        customer_name: "Test Customer".to_string(),
        customer_phone: "+34600111222".to_string(),
        customer_city: Some("Madrid".to_string()),
        source: OrderSource::Storefront,
    }
}

fn available(engine: &OrderEngine) -> i64 {
    engine.stock_level(1).unwrap().available
}
