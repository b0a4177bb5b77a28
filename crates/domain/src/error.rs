// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

/// Errors that can occur during domain validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A required contact field is empty or malformed.
    InvalidContactField {
        /// The field that failed validation.
        field: &'static str,
        /// A human-readable description of the problem.
        reason: String,
    },
    /// The order does not contain any photos.
    EmptyOrder,
    /// A photo specification is invalid.
    InvalidPhotoSpec {
        /// Zero-based position of the specification in the order.
        index: usize,
        /// A human-readable description of the problem.
        reason: String,
    },
    /// A file name cannot be used as an archive entry name.
    InvalidFileName(String),
    /// The order status value is not one of the known statuses.
    InvalidOrderStatus(String),
    /// The order number does not match the `ORD-NNNNNN` pattern.
    InvalidOrderNumber(String),
    /// A format key in a price table or promotion is invalid.
    InvalidFormatKey(String),
    /// A percentage is outside of `0..=100`.
    InvalidPercent {
        /// The field holding the percentage.
        field: String,
        /// The offending value.
        value: u32,
    },
    /// A quantity discount threshold is invalid.
    InvalidDiscountThreshold(u32),
    /// A promotion expiry timestamp could not be parsed.
    InvalidPromotionExpiry {
        /// The raw expiry value.
        value: String,
        /// The parser error message.
        error: String,
    },
    /// A store setting is empty or invalid.
    InvalidStoreSetting {
        /// The setting name.
        field: &'static str,
        /// A human-readable description of the problem.
        reason: String,
    },
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidContactField { field, reason } => {
                write!(f, "Invalid contact field '{field}': {reason}")
            }
            Self::EmptyOrder => write!(f, "Order must contain at least one photo"),
            Self::InvalidPhotoSpec { index, reason } => {
                write!(f, "Invalid photo specification #{}: {reason}", index + 1)
            }
            Self::InvalidFileName(name) => write!(f, "Invalid file name: '{name}'"),
            Self::InvalidOrderStatus(status) => {
                write!(
                    f,
                    "Invalid order status: '{status}'. Must be one of pending, processing, completed"
                )
            }
            Self::InvalidOrderNumber(value) => {
                write!(
                    f,
                    "Invalid order number: '{value}'. Expected ORD- followed by 6 digits"
                )
            }
            Self::InvalidFormatKey(key) => write!(f, "Invalid format key: '{key}'"),
            Self::InvalidPercent { field, value } => {
                write!(
                    f,
                    "Invalid percentage for {field}: {value}. Must be between 0 and 100"
                )
            }
            Self::InvalidDiscountThreshold(threshold) => {
                write!(
                    f,
                    "Invalid discount threshold: {threshold}. Must be greater than 0"
                )
            }
            Self::InvalidPromotionExpiry { value, error } => {
                write!(f, "Failed to parse promotion expiry '{value}': {error}")
            }
            Self::InvalidStoreSetting { field, reason } => {
                write!(f, "Invalid store setting '{field}': {reason}")
            }
        }
    }
}

impl std::error::Error for DomainError {}
