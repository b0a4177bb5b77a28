// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// The prefix shared by every order number.
pub const ORDER_NUMBER_PREFIX: &str = "ORD-";

/// Number of digits following the order number prefix.
pub const ORDER_NUMBER_DIGITS: usize = 6;

/// Processing status of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// Received, not yet worked on.
    #[default]
    Pending,
    /// Being printed.
    Processing,
    /// Printed and shipped.
    Completed,
}

impl OrderStatus {
    /// Returns the persisted string form of the status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Completed => "completed",
        }
    }
}

impl FromStr for OrderStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "processing" => Ok(Self::Processing),
            "completed" => Ok(Self::Completed),
            _ => Err(DomainError::InvalidOrderStatus(s.to_string())),
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Externally displayable order identifier of the form `ORD-NNNNNN`.
///
/// Uniqueness is not guaranteed here; the datastore enforces it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct OrderNumber(String);

impl OrderNumber {
    /// Parses and validates an order number.
    ///
    /// # Arguments
    ///
    /// * `value` - The raw order number
    ///
    /// # Errors
    ///
    /// Returns an error if the value is not `ORD-` followed by exactly six digits.
    pub fn parse(value: &str) -> Result<Self, DomainError> {
        let digits: &str = value
            .strip_prefix(ORDER_NUMBER_PREFIX)
            .ok_or_else(|| DomainError::InvalidOrderNumber(value.to_string()))?;

        if digits.len() != ORDER_NUMBER_DIGITS || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(DomainError::InvalidOrderNumber(value.to_string()));
        }

        Ok(Self(value.to_string()))
    }

    /// Builds an order number from its numeric suffix.
    ///
    /// # Errors
    ///
    /// Returns an error if the suffix does not have exactly six digits.
    pub fn from_suffix(suffix: u32) -> Result<Self, DomainError> {
        Self::parse(&format!("{ORDER_NUMBER_PREFIX}{suffix:06}"))
    }

    /// Returns the order number as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for OrderNumber {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<OrderNumber> for String {
    fn from(number: OrderNumber) -> Self {
        number.0
    }
}

impl std::fmt::Display for OrderNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
