// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::helpers::{
    create_test_delivery, create_test_now, create_test_prices, create_test_promotion,
    create_test_specs,
};
use crate::{PricingResult, compute_pricing, percent_of};
use fotoexpres_domain::{
    PhotoSpec, PriceTable, Promotion, PromotionScope, QuantityDiscountTable,
};
use time::macros::datetime;

fn assert_totals_consistent(result: &PricingResult) {
    assert_eq!(
        result.grand_total,
        result.subtotal - result.quantity_discount_amount - result.promotion_discount_amount
            + result.delivery_fee
    );
    assert!(result.quantity_discount_amount <= result.subtotal);
    assert!(result.promotion_discount_amount <= result.subtotal - result.quantity_discount_amount);
    let line_sum: u64 = result.lines.iter().map(|line| line.line_total).sum();
    assert_eq!(result.subtotal, line_sum);
}

#[test]
fn test_basic_order_without_discounts() {
    let result: PricingResult = compute_pricing(
        &create_test_specs(),
        &create_test_prices(),
        &QuantityDiscountTable::empty(),
        None,
        &create_test_delivery(),
        create_test_now(),
    );

    assert_eq!(result.lines[0].unit_price, 12);
    assert_eq!(result.lines[0].line_total, 24);
    assert_eq!(result.lines[1].unit_price, 18);
    assert_eq!(result.lines[1].line_total, 54);
    assert_eq!(result.total_photos, 5);
    assert_eq!(result.subtotal, 78);
    assert_eq!(result.quantity_discount_amount, 0);
    assert_eq!(result.promotion_discount_amount, 0);
    assert_eq!(result.delivery_fee, 400);
    assert!(!result.free_delivery);
    assert_eq!(result.grand_total, 478);
    assert!(result.missing_price_formats.is_empty());
    assert_totals_consistent(&result);
}

#[test]
fn test_quantity_tier_uses_highest_threshold_reached() {
    let specs: Vec<PhotoSpec> = vec![
        PhotoSpec::new("a.jpg", "10x15", "mat", 70),
        PhotoSpec::new("b.jpg", "10x15", "sjajni", 50),
    ];
    let result: PricingResult = compute_pricing(
        &specs,
        &create_test_prices(),
        &QuantityDiscountTable::default(),
        None,
        &create_test_delivery(),
        create_test_now(),
    );

    assert_eq!(result.total_photos, 120);
    assert_eq!(result.quantity_discount_threshold, Some(100));
    assert_eq!(result.quantity_discount_percent, 10);
    assert_eq!(result.subtotal, 2160);
    assert_eq!(result.quantity_discount_amount, 216);
    assert_eq!(result.discounted_subtotal, 1944);
    assert_eq!(result.grand_total, 2344);
    assert_totals_consistent(&result);
}

#[test]
fn test_quantity_tier_counts_prints_not_entries() {
    let specs: Vec<PhotoSpec> = vec![PhotoSpec::new("a.jpg", "9x13", "mat", 50)];
    let result: PricingResult = compute_pricing(
        &specs,
        &create_test_prices(),
        &QuantityDiscountTable::default(),
        None,
        &create_test_delivery(),
        create_test_now(),
    );

    assert_eq!(result.quantity_discount_threshold, Some(50));
    assert_eq!(result.quantity_discount_percent, 5);
    assert_eq!(result.quantity_discount_amount, 30);
}

#[test]
fn test_free_delivery_when_threshold_met() {
    let prices: PriceTable = PriceTable::default();
    let specs: Vec<PhotoSpec> = vec![PhotoSpec::new("poster.jpg", "30x45", "mat", 24)];
    let result: PricingResult = compute_pricing(
        &specs,
        &prices,
        &QuantityDiscountTable::empty(),
        None,
        &create_test_delivery(),
        create_test_now(),
    );

    assert_eq!(result.discounted_subtotal, 6000);
    assert_eq!(result.delivery_fee, 0);
    assert!(result.free_delivery);
    assert_eq!(result.grand_total, 6000);
}

#[test]
fn test_free_delivery_at_exact_threshold() {
    let specs: Vec<PhotoSpec> = vec![PhotoSpec::new("poster.jpg", "30x45", "mat", 20)];
    let result: PricingResult = compute_pricing(
        &specs,
        &PriceTable::default(),
        &QuantityDiscountTable::empty(),
        None,
        &create_test_delivery(),
        create_test_now(),
    );

    assert_eq!(result.discounted_subtotal, 5000);
    assert_eq!(result.delivery_fee, 0);
}

#[test]
fn test_delivery_charged_when_discount_drops_below_threshold() {
    // 21 x 250 = 5250, 5% tier at 20 photos leaves 4987.
    let specs: Vec<PhotoSpec> = vec![PhotoSpec::new("poster.jpg", "30x45", "mat", 21)];
    let result: PricingResult = compute_pricing(
        &specs,
        &PriceTable::default(),
        &QuantityDiscountTable::new([(20, 5)]),
        None,
        &create_test_delivery(),
        create_test_now(),
    );

    assert_eq!(result.subtotal, 5250);
    assert_eq!(result.quantity_discount_amount, 263);
    assert_eq!(result.discounted_subtotal, 4987);
    assert_eq!(result.delivery_fee, 400);
    assert_totals_consistent(&result);
}

#[test]
fn test_missing_price_is_zero_and_recorded() {
    let specs: Vec<PhotoSpec> = vec![
        PhotoSpec::new("a.jpg", "50x70", "mat", 3),
        PhotoSpec::new("b.jpg", "10x15", "mat", 1),
        PhotoSpec::new("c.jpg", "50x70", "sjajni", 2),
    ];
    let result: PricingResult = compute_pricing(
        &specs,
        &create_test_prices(),
        &QuantityDiscountTable::empty(),
        None,
        &create_test_delivery(),
        create_test_now(),
    );

    assert_eq!(result.lines[0].unit_price, 0);
    assert!(result.lines[0].price_missing);
    assert!(!result.lines[1].price_missing);
    assert_eq!(result.subtotal, 18);
    assert_eq!(result.missing_price_formats, vec![String::from("50x70")]);
}

#[test]
fn test_store_wide_promotion() {
    let promotion: Promotion = create_test_promotion(PromotionScope::All, 10);
    let result: PricingResult = compute_pricing(
        &create_test_specs(),
        &create_test_prices(),
        &QuantityDiscountTable::empty(),
        Some(&promotion),
        &create_test_delivery(),
        create_test_now(),
    );

    assert_eq!(result.promotion_discount_percent, 10);
    assert_eq!(result.promotion_discount_amount, 8);
    assert_eq!(result.promotion_scope, Some(PromotionScope::All));
    assert_eq!(result.grand_total, 470);
    assert_totals_consistent(&result);
}

#[test]
fn test_scoped_promotion_uses_matching_lines_only() {
    let promotion: Promotion =
        create_test_promotion(PromotionScope::Format(String::from("10x15")), 20);
    let result: PricingResult = compute_pricing(
        &create_test_specs(),
        &create_test_prices(),
        &QuantityDiscountTable::empty(),
        Some(&promotion),
        &create_test_delivery(),
        create_test_now(),
    );

    // 20% of the 54 contributed by 10x15 lines.
    assert_eq!(result.promotion_discount_amount, 11);
    assert_eq!(result.grand_total, 467);
}

#[test]
fn test_scoped_promotion_without_matching_lines_does_not_apply() {
    let promotion: Promotion =
        create_test_promotion(PromotionScope::Format(String::from("20x30")), 20);
    let result: PricingResult = compute_pricing(
        &create_test_specs(),
        &create_test_prices(),
        &QuantityDiscountTable::empty(),
        Some(&promotion),
        &create_test_delivery(),
        create_test_now(),
    );

    assert_eq!(result.promotion_discount_amount, 0);
    assert_eq!(result.promotion_discount_percent, 0);
    assert_eq!(result.promotion_scope, None);
}

#[test]
fn test_expired_promotion_is_ignored() {
    let promotion: Promotion = create_test_promotion(PromotionScope::All, 10);
    let result: PricingResult = compute_pricing(
        &create_test_specs(),
        &create_test_prices(),
        &QuantityDiscountTable::empty(),
        Some(&promotion),
        &create_test_delivery(),
        datetime!(2027-01-01 00:00 UTC),
    );

    assert_eq!(result.promotion_discount_amount, 0);
    assert_eq!(result.grand_total, 478);
}

#[test]
fn test_discounts_are_additive_not_compounded() {
    let specs: Vec<PhotoSpec> = vec![PhotoSpec::new("a.jpg", "10x15", "mat", 120)];
    let promotion: Promotion = create_test_promotion(PromotionScope::All, 10);
    let result: PricingResult = compute_pricing(
        &specs,
        &create_test_prices(),
        &QuantityDiscountTable::default(),
        Some(&promotion),
        &create_test_delivery(),
        create_test_now(),
    );

    assert_eq!(result.subtotal, 2160);
    assert_eq!(result.quantity_discount_amount, 216);
    assert_eq!(result.promotion_discount_amount, 216);
    assert_eq!(result.total_discount(), 432);
    assert_eq!(result.applied_discount_count(), 2);
    assert_eq!(result.discounted_subtotal, 1728);
    assert_totals_consistent(&result);
}

#[test]
fn test_promotion_is_clamped_to_remaining_subtotal() {
    let promotion: Promotion = create_test_promotion(PromotionScope::All, 50);
    let result: PricingResult = compute_pricing(
        &create_test_specs(),
        &create_test_prices(),
        &QuantityDiscountTable::new([(1, 100)]),
        Some(&promotion),
        &create_test_delivery(),
        create_test_now(),
    );

    assert_eq!(result.quantity_discount_amount, 78);
    assert_eq!(result.promotion_discount_amount, 0);
    assert_eq!(result.discounted_subtotal, 0);
    assert_eq!(result.grand_total, 400);
    assert_totals_consistent(&result);
}

#[test]
fn test_pricing_is_deterministic() {
    let promotion: Promotion = create_test_promotion(PromotionScope::All, 15);
    let compute = || {
        compute_pricing(
            &create_test_specs(),
            &create_test_prices(),
            &QuantityDiscountTable::default(),
            Some(&promotion),
            &create_test_delivery(),
            create_test_now(),
        )
    };
    assert_eq!(compute(), compute());
}

#[test]
fn test_percent_of_rounds_half_up_and_caps() {
    assert_eq!(percent_of(78, 10), 8);
    assert_eq!(percent_of(75, 10), 8);
    assert_eq!(percent_of(74, 10), 7);
    assert_eq!(percent_of(0, 50), 0);
    assert_eq!(percent_of(5, 150), 5);
    assert_eq!(percent_of(u64::MAX, 100), u64::MAX);
}
