// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Order pricing.
//!
//! All amounts are whole currency units. Pricing is a pure computation over
//! the photo specifications and the store configuration in effect for the
//! request; the instant used to evaluate promotion expiry is passed in.

use fotoexpres_domain::{
    DeliverySettings, DiscountTier, PhotoSpec, PriceTable, Promotion, PromotionScope,
    QuantityDiscountTable, total_photo_count,
};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Pricing of a single photo specification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinePricing {
    /// The uploaded file this line refers to.
    pub file_name: String,
    /// The print format.
    pub format: String,
    /// The paper finish.
    pub finish: String,
    /// Number of physical prints.
    pub quantity: u32,
    /// Unit price; zero when the format has no configured price.
    pub unit_price: u64,
    /// `unit_price * quantity`.
    pub line_total: u64,
    /// Whether the format was missing from the price table.
    pub price_missing: bool,
}

/// The full price breakdown of an order.
///
/// `grand_total == subtotal - quantity_discount_amount - promotion_discount_amount + delivery_fee`
/// always holds, and neither discount exceeds the amount it is drawn from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingResult {
    /// Per-line pricing in specification order.
    pub lines: Vec<LinePricing>,
    /// Sum of all quantities.
    pub total_photos: u32,
    /// Sum of all line totals.
    pub subtotal: u64,
    /// The quantity tier threshold that was reached, if any.
    pub quantity_discount_threshold: Option<u32>,
    /// The applied quantity discount percentage (zero if none).
    pub quantity_discount_percent: u32,
    /// The quantity discount amount.
    pub quantity_discount_amount: u64,
    /// The applied promotion percentage (zero if no promotion applied).
    pub promotion_discount_percent: u32,
    /// The promotion discount amount.
    pub promotion_discount_amount: u64,
    /// The scope of the applied promotion, if one applied.
    pub promotion_scope: Option<PromotionScope>,
    /// `subtotal` minus both discounts.
    pub discounted_subtotal: u64,
    /// The delivery fee; zero when free delivery applies.
    pub delivery_fee: u64,
    /// The free-delivery threshold the order was measured against.
    pub free_delivery_limit: u64,
    /// Whether the free-delivery threshold was met.
    pub free_delivery: bool,
    /// Amount payable.
    pub grand_total: u64,
    /// Formats requested by the order that have no configured price,
    /// in order of first appearance.
    pub missing_price_formats: Vec<String>,
}

impl PricingResult {
    /// Returns the sum of both discount amounts.
    #[must_use]
    pub const fn total_discount(&self) -> u64 {
        self.quantity_discount_amount + self.promotion_discount_amount
    }

    /// Returns the number of discounts with a non-zero amount.
    #[must_use]
    pub fn applied_discount_count(&self) -> usize {
        [self.quantity_discount_amount, self.promotion_discount_amount]
            .iter()
            .filter(|amount| **amount > 0)
            .count()
    }
}

/// Returns `round(amount * percent / 100)`, rounding halves up.
///
/// Percentages above 100 are treated as 100, so the result never exceeds `amount`.
#[must_use]
pub fn percent_of(amount: u64, percent: u32) -> u64 {
    let percent: u128 = u128::from(percent.min(100));
    let scaled: u128 = (u128::from(amount) * percent + 50) / 100;
    u64::try_from(scaled).unwrap_or(amount).min(amount)
}

/// Computes the price breakdown of an order.
///
/// # Arguments
///
/// * `specs` - The order's photo specifications
/// * `prices` - Unit price per format
/// * `discounts` - Quantity discount tiers
/// * `promotion` - The configured promotion, if any
/// * `delivery` - Delivery fee and free-delivery threshold
/// * `evaluated_at` - The instant at which promotion expiry is evaluated
///
/// # Returns
///
/// The complete [`PricingResult`]. A format with no configured price is
/// priced at zero and listed in `missing_price_formats`.
#[must_use]
pub fn compute_pricing(
    specs: &[PhotoSpec],
    prices: &PriceTable,
    discounts: &QuantityDiscountTable,
    promotion: Option<&Promotion>,
    delivery: &DeliverySettings,
    evaluated_at: OffsetDateTime,
) -> PricingResult {
    let mut missing_price_formats: Vec<String> = Vec::new();
    let lines: Vec<LinePricing> = specs
        .iter()
        .map(|spec| {
            let configured: Option<u64> = prices.unit_price(&spec.format);
            if configured.is_none() && !missing_price_formats.contains(&spec.format) {
                missing_price_formats.push(spec.format.clone());
            }
            let unit_price: u64 = configured.unwrap_or(0);
            LinePricing {
                file_name: spec.file_name.clone(),
                format: spec.format.clone(),
                finish: spec.finish.clone(),
                quantity: spec.quantity,
                unit_price,
                line_total: unit_price.saturating_mul(u64::from(spec.quantity)),
                price_missing: configured.is_none(),
            }
        })
        .collect();

    let subtotal: u64 = lines
        .iter()
        .fold(0u64, |acc, line| acc.saturating_add(line.line_total));
    let total_photos: u32 = total_photo_count(specs);

    let tier: Option<DiscountTier> = discounts.tier_for(total_photos);
    let quantity_discount_percent: u32 = tier.map_or(0, |tier| tier.percent.min(100));
    let quantity_discount_amount: u64 = percent_of(subtotal, quantity_discount_percent);

    let remaining: u64 = subtotal - quantity_discount_amount;
    let (promotion_discount_percent, promotion_discount_amount, promotion_scope) =
        match promotion.filter(|promotion| promotion.is_effective_at(evaluated_at)) {
            Some(promotion) => {
                let base: u64 = lines
                    .iter()
                    .filter(|line| promotion.format.covers(&line.format))
                    .fold(0u64, |acc, line| acc.saturating_add(line.line_total));
                if base == 0 {
                    (0, 0, None)
                } else {
                    let amount: u64 =
                        percent_of(base, promotion.discount_percent).min(remaining);
                    (
                        promotion.discount_percent.min(100),
                        amount,
                        Some(promotion.format.clone()),
                    )
                }
            }
            None => (0, 0, None),
        };

    let discounted_subtotal: u64 = remaining - promotion_discount_amount;
    let free_delivery: bool = discounted_subtotal >= delivery.free_delivery_limit;
    let delivery_fee: u64 = if free_delivery {
        0
    } else {
        delivery.delivery_price
    };

    PricingResult {
        lines,
        total_photos,
        subtotal,
        quantity_discount_threshold: tier.map(|tier| tier.threshold),
        quantity_discount_percent,
        quantity_discount_amount,
        promotion_discount_percent,
        promotion_discount_amount,
        promotion_scope,
        discounted_subtotal,
        delivery_fee,
        free_delivery_limit: delivery.free_delivery_limit,
        free_delivery,
        grand_total: discounted_subtotal.saturating_add(delivery_fee),
        missing_price_formats,
    }
}
