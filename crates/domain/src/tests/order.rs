// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{DomainError, OrderNumber, OrderStatus};
use std::str::FromStr;

#[test]
fn test_order_status_parses_exactly_three_values() {
    assert_eq!(OrderStatus::from_str("pending").unwrap(), OrderStatus::Pending);
    assert_eq!(
        OrderStatus::from_str("processing").unwrap(),
        OrderStatus::Processing
    );
    assert_eq!(
        OrderStatus::from_str("completed").unwrap(),
        OrderStatus::Completed
    );

    for invalid in ["", "Pending", "shipped", "cancelled"] {
        let result: Result<OrderStatus, DomainError> = OrderStatus::from_str(invalid);
        assert!(matches!(result, Err(DomainError::InvalidOrderStatus(_))));
    }
}

#[test]
fn test_order_status_serializes_lowercase() {
    let json: String = serde_json::to_string(&OrderStatus::Processing).unwrap();
    assert_eq!(json, "\"processing\"");
    assert_eq!(OrderStatus::default(), OrderStatus::Pending);
}

#[test]
fn test_order_number_accepts_six_digits() {
    let number: OrderNumber = OrderNumber::parse("ORD-123456").unwrap();
    assert_eq!(number.as_str(), "ORD-123456");
    assert_eq!(number.to_string(), "ORD-123456");
}

#[test]
fn test_order_number_rejects_bad_shapes() {
    for invalid in [
        "123456",
        "ORD-12345",
        "ORD-1234567",
        "ORD-12a456",
        "ord-123456",
        "ORD-../../x",
    ] {
        let result: Result<OrderNumber, DomainError> = OrderNumber::parse(invalid);
        assert!(
            matches!(result, Err(DomainError::InvalidOrderNumber(_))),
            "{invalid} should be rejected"
        );
    }
}

#[test]
fn test_order_number_from_suffix_pads() {
    let number: OrderNumber = OrderNumber::from_suffix(4_321).unwrap();
    assert_eq!(number.as_str(), "ORD-004321");
    assert!(OrderNumber::from_suffix(1_000_000).is_err());
}

#[test]
fn test_order_number_deserialization_validates() {
    let ok: Result<OrderNumber, _> = serde_json::from_str("\"ORD-654321\"");
    assert!(ok.is_ok());
    let bad: Result<OrderNumber, _> = serde_json::from_str("\"ORD-x\"");
    assert!(bad.is_err());
}
