// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use fotoexpres_domain::{
    ContactInfo, DeliverySettings, OrderNumber, PhotoSpec, PriceTable, Promotion, PromotionScope,
};
use time::OffsetDateTime;
use time::macros::datetime;

pub fn create_test_contact() -> ContactInfo {
    ContactInfo::new(
        "Jelena Jovanović",
        "jelena@example.com",
        "+381 63 555 0101",
        "Knez Mihailova 5",
        "11000",
        "Beograd",
        Some("Pozvati pre dostave"),
    )
}

pub fn create_test_order_number() -> OrderNumber {
    OrderNumber::parse("ORD-482913").unwrap()
}

pub fn create_test_specs() -> Vec<PhotoSpec> {
    vec![
        PhotoSpec::new("plaza.jpg", "9x13", "sjajni", 2),
        PhotoSpec::new("planina.jpg", "10x15", "mat", 3),
    ]
}

pub fn create_test_prices() -> PriceTable {
    PriceTable::new([("9x13", 12_u64), ("10x15", 18_u64)])
}

pub const fn create_test_delivery() -> DeliverySettings {
    DeliverySettings {
        delivery_price: 400,
        free_delivery_limit: 5000,
    }
}

pub fn create_test_promotion(scope: PromotionScope, percent: u32) -> Promotion {
    Promotion {
        is_active: true,
        format: scope,
        discount_percent: percent,
        valid_until: String::from("2026-12-31T23:59"),
        message: String::from("Jesenja akcija"),
    }
}

pub const fn create_test_now() -> OffsetDateTime {
    datetime!(2026-10-18 14:30:05 UTC)
}
