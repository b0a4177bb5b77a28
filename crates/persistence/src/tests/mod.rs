// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::expect_used, clippy::unwrap_used)]

mod operator_tests;
mod order_tests;

use fotoexpres::{Order, assemble_order};
use fotoexpres_domain::{ContactInfo, OrderNumber, OrderStatus, PhotoSpec};
use time::OffsetDateTime;
use time::macros::datetime;

pub fn create_test_contact() -> ContactInfo {
    ContactInfo::new(
        "Marko Petrović",
        "marko@example.com",
        "+381 64 111 2233",
        "Bulevar oslobođenja 12",
        "21000",
        "Novi Sad",
        None,
    )
}

pub fn create_test_specs() -> Vec<PhotoSpec> {
    vec![
        PhotoSpec::new("more.jpg", "10x15", "sjajni", 4),
        PhotoSpec::new("selo.png", "13x18", "mat", 2),
    ]
}

pub fn create_test_order(number: &str, created_at: OffsetDateTime) -> Order {
    let order_number: OrderNumber = OrderNumber::parse(number).unwrap();
    let archive_path: String = format!("order-{order_number}.zip");
    assemble_order(
        order_number,
        create_test_contact(),
        create_test_specs(),
        archive_path,
        OrderStatus::Pending,
        created_at,
    )
}

pub fn create_test_created_at() -> OffsetDateTime {
    datetime!(2026-10-18 14:30:05 UTC)
}
