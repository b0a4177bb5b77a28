// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Store configuration documents.
//!
//! These are the externally mutable configuration surfaces consumed by the
//! pricing engine and the order recap. Each has a defined default that is
//! used when the document has never been written.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{Date, OffsetDateTime, PrimitiveDateTime, Time};

/// Mapping from print format to unit price in whole currency units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PriceTable {
    prices: BTreeMap<String, u64>,
}

impl PriceTable {
    /// Creates a price table from `(format, unit price)` pairs.
    #[must_use]
    pub fn new<I, S>(prices: I) -> Self
    where
        I: IntoIterator<Item = (S, u64)>,
        S: Into<String>,
    {
        Self {
            prices: prices
                .into_iter()
                .map(|(format, price)| (format.into(), price))
                .collect(),
        }
    }

    /// Returns the unit price for a format, if configured.
    #[must_use]
    pub fn unit_price(&self, format: &str) -> Option<u64> {
        self.prices.get(format).copied()
    }

    /// Iterates over `(format, unit price)` pairs in format order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, u64)> {
        self.prices
            .iter()
            .map(|(format, price)| (format.as_str(), *price))
    }

    /// Returns whether the table has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }
}

impl Default for PriceTable {
    fn default() -> Self {
        Self::new([
            ("9x13", 12),
            ("10x15", 18),
            ("13x18", 25),
            ("15x21", 50),
            ("20x30", 150),
            ("30x45", 250),
        ])
    }
}

/// Mapping from a photo-count threshold to a discount percentage.
///
/// Only one tier ever applies: the highest threshold that does not exceed
/// the order's total photo count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuantityDiscountTable {
    tiers: BTreeMap<u32, u32>,
}

/// The quantity discount tier selected for an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiscountTier {
    /// The photo-count threshold that was reached.
    pub threshold: u32,
    /// The discount percentage for this tier.
    pub percent: u32,
}

impl QuantityDiscountTable {
    /// Creates a discount table from `(threshold, percent)` pairs.
    #[must_use]
    pub fn new<I>(tiers: I) -> Self
    where
        I: IntoIterator<Item = (u32, u32)>,
    {
        Self {
            tiers: tiers.into_iter().collect(),
        }
    }

    /// Returns a table with no tiers.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            tiers: BTreeMap::new(),
        }
    }

    /// Selects the tier for a total photo count.
    ///
    /// Returns the highest threshold that is less than or equal to
    /// `total_photos`, or `None` when no threshold has been reached.
    #[must_use]
    pub fn tier_for(&self, total_photos: u32) -> Option<DiscountTier> {
        self.tiers
            .range(..=total_photos)
            .next_back()
            .map(|(threshold, percent)| DiscountTier {
                threshold: *threshold,
                percent: *percent,
            })
    }

    /// Iterates over `(threshold, percent)` pairs in ascending threshold order.
    pub fn entries(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        self.tiers
            .iter()
            .map(|(threshold, percent)| (*threshold, *percent))
    }
}

impl Default for QuantityDiscountTable {
    fn default() -> Self {
        Self::new([(50, 5), (100, 10), (200, 15)])
    }
}

/// Which part of an order a promotion applies to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PromotionScope {
    /// The promotion applies to the whole order.
    All,
    /// The promotion applies only to lines printed in this format.
    Format(String),
}

impl PromotionScope {
    /// Returns whether a line in the given format is covered by this scope.
    #[must_use]
    pub fn covers(&self, format: &str) -> bool {
        match self {
            Self::All => true,
            Self::Format(scoped) => scoped == format,
        }
    }
}

impl From<String> for PromotionScope {
    fn from(value: String) -> Self {
        let trimmed: &str = value.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("all") {
            Self::All
        } else {
            Self::Format(trimmed.to_string())
        }
    }
}

impl From<PromotionScope> for String {
    fn from(scope: PromotionScope) -> Self {
        match scope {
            PromotionScope::All => Self::from("all"),
            PromotionScope::Format(format) => format,
        }
    }
}

impl std::fmt::Display for PromotionScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::All => write!(f, "all"),
            Self::Format(format) => write!(f, "{format}"),
        }
    }
}

/// A time-boxed percentage discount, store-wide or scoped to one format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Promotion {
    /// The stored activation flag, as set by an admin.
    #[serde(default)]
    pub is_active: bool,
    /// Which lines the promotion applies to.
    #[serde(default = "default_scope")]
    pub format: PromotionScope,
    /// The discount percentage.
    #[serde(default)]
    pub discount_percent: u32,
    /// Expiry timestamp. Empty means the promotion never expires.
    #[serde(default)]
    pub valid_until: String,
    /// Message displayed to customers.
    #[serde(default)]
    pub message: String,
}

const fn default_scope() -> PromotionScope {
    PromotionScope::All
}

impl Default for Promotion {
    fn default() -> Self {
        Self {
            is_active: false,
            format: PromotionScope::All,
            discount_percent: 10,
            valid_until: String::new(),
            message: String::from("10% popusta na sve porudžbine!"),
        }
    }
}

impl Promotion {
    /// Parses the expiry timestamp.
    ///
    /// Accepted forms are RFC 3339, `YYYY-MM-DDTHH:MM[:SS]` (UTC) and
    /// `YYYY-MM-DD` (the end of that day, UTC).
    ///
    /// # Returns
    ///
    /// * `Ok(None)` if no expiry is set
    /// * `Ok(Some(expiry))` if the expiry parsed
    ///
    /// # Errors
    ///
    /// Returns an error if the expiry is set but matches none of the accepted forms.
    pub fn expiry(&self) -> Result<Option<OffsetDateTime>, DomainError> {
        let raw: &str = self.valid_until.trim();
        if raw.is_empty() {
            return Ok(None);
        }

        if let Ok(expiry) = OffsetDateTime::parse(raw, &Rfc3339) {
            return Ok(Some(expiry));
        }
        if let Ok(expiry) = PrimitiveDateTime::parse(
            raw,
            format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]"),
        ) {
            return Ok(Some(expiry.assume_utc()));
        }
        if let Ok(expiry) =
            PrimitiveDateTime::parse(raw, format_description!("[year]-[month]-[day]T[hour]:[minute]"))
        {
            return Ok(Some(expiry.assume_utc()));
        }

        Date::parse(raw, format_description!("[year]-[month]-[day]"))
            .map(|date| Some(PrimitiveDateTime::new(date, Time::MAX).assume_utc()))
            .map_err(|e| DomainError::InvalidPromotionExpiry {
                value: raw.to_string(),
                error: e.to_string(),
            })
    }

    /// Returns whether the promotion is in effect at the given instant.
    ///
    /// A promotion is in effect when its stored flag is set and it has not
    /// expired. An unparseable expiry counts as expired. The stored flag is
    /// never modified here.
    #[must_use]
    pub fn is_effective_at(&self, now: OffsetDateTime) -> bool {
        if !self.is_active {
            return false;
        }
        match self.expiry() {
            Ok(None) => true,
            Ok(Some(expiry)) => now <= expiry,
            Err(_) => false,
        }
    }
}

/// Flat delivery fee and the order value above which delivery is free.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliverySettings {
    /// The flat delivery fee.
    pub delivery_price: u64,
    /// Discounted subtotal at or above which delivery is free.
    pub free_delivery_limit: u64,
}

/// General store settings managed by admins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StoreSettings {
    /// Discounted subtotal at or above which delivery is free.
    pub free_delivery_limit: u64,
    /// The flat delivery fee.
    pub delivery_price: u64,
    /// Public contact phone number.
    pub contact_phone: String,
    /// Public contact email address.
    pub contact_email: String,
    /// Currency label printed next to every amount.
    pub currency: String,
    /// Payment method text printed in the recap footer.
    pub payment_method: String,
    /// Delivery lead time text printed in the recap footer.
    pub delivery_lead_time: String,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            free_delivery_limit: 5000,
            delivery_price: 400,
            contact_phone: String::from("+381 65 46 000 46"),
            contact_email: String::from("kontakt@fotoexpres.rs"),
            currency: String::from("RSD"),
            payment_method: String::from("Plaćanje pouzećem"),
            delivery_lead_time: String::from("2 do 7 radnih dana"),
        }
    }
}

impl StoreSettings {
    /// Returns the delivery part of the settings.
    #[must_use]
    pub const fn delivery(&self) -> DeliverySettings {
        DeliverySettings {
            delivery_price: self.delivery_price,
            free_delivery_limit: self.free_delivery_limit,
        }
    }
}
