// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::helpers::{create_test_contact, create_test_now, create_test_specs};
use crate::{CoreError, Order, OrderRequest, assemble_order, generate_order_number};
use fotoexpres_domain::{DomainError, OrderNumber, OrderStatus, PhotoSpec, ProcessingOptions};

#[test]
fn test_generated_order_numbers_match_pattern() {
    for _ in 0..1_000 {
        let number: OrderNumber = generate_order_number().unwrap();
        let suffix: u32 = number.as_str()[4..].parse().unwrap();
        assert!(number.as_str().starts_with("ORD-"));
        assert!((100_000..=999_999).contains(&suffix));
    }
}

#[test]
fn test_assemble_order_recomputes_total() {
    let order: Order = assemble_order(
        OrderNumber::parse("ORD-100200").unwrap(),
        create_test_contact(),
        create_test_specs(),
        String::from("orders_zips/order-ORD-100200.zip"),
        OrderStatus::Pending,
        create_test_now(),
    );

    assert_eq!(order.total_photos(), 5);
    assert_eq!(order.status(), OrderStatus::Pending);
    assert_eq!(order.photo_specs().len(), 2);
    assert_eq!(order.archive_path(), "orders_zips/order-ORD-100200.zip");
}

#[test]
fn test_order_serializes_camel_case() {
    let order: Order = assemble_order(
        OrderNumber::parse("ORD-100200").unwrap(),
        create_test_contact(),
        create_test_specs(),
        String::from("order-ORD-100200.zip"),
        OrderStatus::Processing,
        create_test_now(),
    );
    let json: serde_json::Value = serde_json::to_value(&order).unwrap();

    assert_eq!(json["orderNumber"], "ORD-100200");
    assert_eq!(json["status"], "processing");
    assert_eq!(json["createdAt"], "2026-10-18T14:30:05Z");
    assert_eq!(json["totalPhotos"], 5);
    assert_eq!(json["contactInfo"]["postalCode"], "11000");

    let parsed: Order = serde_json::from_value(json).unwrap();
    assert_eq!(parsed, order);
}

#[test]
fn test_with_status_changes_only_status() {
    let order: Order = assemble_order(
        OrderNumber::parse("ORD-100200").unwrap(),
        create_test_contact(),
        create_test_specs(),
        String::from("order-ORD-100200.zip"),
        OrderStatus::Pending,
        create_test_now(),
    );
    let updated: Order = order.clone().with_status(OrderStatus::Completed);
    assert_eq!(updated.status(), OrderStatus::Completed);
    assert_eq!(updated.order_number(), order.order_number());
    assert_eq!(updated.total_photos(), order.total_photos());
}

#[test]
fn test_order_request_accepts_legacy_photo_settings() {
    let json: &str = r#"{
        "contactInfo": {
            "fullName": "Jelena Jovanović",
            "email": "jelena@example.com",
            "phone": "0631234567",
            "street": "Knez Mihailova 5",
            "postalCode": "11000",
            "city": "Beograd"
        },
        "photoSettings": [
            {"fileName": "a.jpg", "format": "10x15", "finish": "mat", "quantity": 2}
        ],
        "processingOptions": {"cropOption": true}
    }"#;
    let request: OrderRequest = serde_json::from_str(json).unwrap();

    assert_eq!(request.photo_specs, vec![PhotoSpec::new("a.jpg", "10x15", "mat", 2)]);
    assert!(request.processing_options.crop_to_format);
    assert!(request.validate().is_ok());
}

#[test]
fn test_order_request_validation_rejects_empty_order() {
    let request: OrderRequest = OrderRequest {
        contact_info: create_test_contact(),
        photo_specs: Vec::new(),
        processing_options: ProcessingOptions::default(),
    };
    assert_eq!(
        request.validate(),
        Err(CoreError::DomainViolation(DomainError::EmptyOrder))
    );
}
