// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod contact;
mod error;
mod order;
mod photo;
mod store;
mod validation;

#[cfg(test)]
mod tests;

// Re-export public types
pub use contact::ContactInfo;
pub use error::DomainError;
pub use order::{ORDER_NUMBER_DIGITS, ORDER_NUMBER_PREFIX, OrderNumber, OrderStatus};
pub use photo::{PhotoSpec, ProcessingOptions, sanitize_path_segment, total_photo_count};
pub use store::{
    DeliverySettings, DiscountTier, PriceTable, Promotion, PromotionScope, QuantityDiscountTable,
    StoreSettings,
};
pub use validation::{
    validate_contact_info, validate_file_name, validate_photo_specs, validate_price_table,
    validate_promotion, validate_quantity_discounts, validate_store_settings,
};
