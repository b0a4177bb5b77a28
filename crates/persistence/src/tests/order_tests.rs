// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::{create_test_created_at, create_test_order};
use crate::Persistence;
use crate::error::PersistenceError;
use fotoexpres::Order;
use fotoexpres_domain::{OrderNumber, OrderStatus};
use time::Duration;

fn number(value: &str) -> OrderNumber {
    OrderNumber::parse(value).unwrap()
}

#[test]
fn test_insert_and_get_order_round_trips_all_fields() {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    let order: Order = create_test_order("ORD-100200", create_test_created_at());

    persistence.insert_order(&order).unwrap();

    let loaded: Order = persistence
        .get_order(&number("ORD-100200"))
        .unwrap()
        .expect("order should exist");
    assert_eq!(loaded, order);
    assert_eq!(loaded.total_photos(), 6);
    assert_eq!(loaded.archive_path(), "order-ORD-100200.zip");
}

#[test]
fn test_get_missing_order_returns_none() {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    assert!(persistence.get_order(&number("ORD-999999")).unwrap().is_none());
}

#[test]
fn test_duplicate_order_number_is_rejected() {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    let order: Order = create_test_order("ORD-555555", create_test_created_at());

    persistence.insert_order(&order).unwrap();
    let result: Result<i64, PersistenceError> = persistence.insert_order(&order);

    assert_eq!(
        result,
        Err(PersistenceError::DuplicateOrderNumber(String::from(
            "ORD-555555"
        )))
    );
    assert_eq!(persistence.list_orders().unwrap().len(), 1);
}

#[test]
fn test_order_exists() {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    persistence
        .insert_order(&create_test_order("ORD-300300", create_test_created_at()))
        .unwrap();

    assert!(persistence.order_exists(&number("ORD-300300")).unwrap());
    assert!(!persistence.order_exists(&number("ORD-300301")).unwrap());
}

#[test]
fn test_list_orders_newest_first() {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    let base: time::OffsetDateTime = create_test_created_at();

    persistence
        .insert_order(&create_test_order("ORD-111111", base - Duration::days(2)))
        .unwrap();
    persistence
        .insert_order(&create_test_order("ORD-333333", base))
        .unwrap();
    persistence
        .insert_order(&create_test_order("ORD-222222", base - Duration::days(1)))
        .unwrap();

    let numbers: Vec<String> = persistence
        .list_orders()
        .unwrap()
        .iter()
        .map(|order| order.order_number().to_string())
        .collect();
    assert_eq!(numbers, vec!["ORD-333333", "ORD-222222", "ORD-111111"]);
}

#[test]
fn test_list_orders_same_second_uses_insertion_order() {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    let at: time::OffsetDateTime = create_test_created_at();

    persistence
        .insert_order(&create_test_order("ORD-400001", at))
        .unwrap();
    persistence
        .insert_order(&create_test_order("ORD-400002", at))
        .unwrap();

    let orders: Vec<Order> = persistence.list_orders().unwrap();
    assert_eq!(orders[0].order_number().as_str(), "ORD-400002");
    assert_eq!(orders[1].order_number().as_str(), "ORD-400001");
}

#[test]
fn test_update_order_status() {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    persistence
        .insert_order(&create_test_order("ORD-700700", create_test_created_at()))
        .unwrap();

    persistence
        .update_order_status(&number("ORD-700700"), OrderStatus::Completed)
        .unwrap();

    let loaded: Order = persistence
        .get_order(&number("ORD-700700"))
        .unwrap()
        .unwrap();
    assert_eq!(loaded.status(), OrderStatus::Completed);
}

#[test]
fn test_update_status_of_missing_order_fails() {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();

    let result: Result<(), PersistenceError> =
        persistence.update_order_status(&number("ORD-700701"), OrderStatus::Processing);

    assert_eq!(
        result,
        Err(PersistenceError::OrderNotFound(String::from("ORD-700701")))
    );
}

#[test]
fn test_delete_order() {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    persistence
        .insert_order(&create_test_order("ORD-800800", create_test_created_at()))
        .unwrap();

    persistence.delete_order(&number("ORD-800800")).unwrap();

    assert!(!persistence.order_exists(&number("ORD-800800")).unwrap());
    assert!(matches!(
        persistence.delete_order(&number("ORD-800800")),
        Err(PersistenceError::OrderNotFound(_))
    ));
}
