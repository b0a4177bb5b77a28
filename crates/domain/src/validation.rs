// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::contact::ContactInfo;
use crate::error::DomainError;
use crate::photo::{PhotoSpec, sanitize_path_segment};
use crate::store::{PriceTable, Promotion, PromotionScope, QuantityDiscountTable, StoreSettings};

/// Validates that every required contact field is present.
///
/// Notes are optional and never checked.
///
/// # Arguments
///
/// * `contact` - The contact information to validate
///
/// # Errors
///
/// Returns an error if:
/// - Any of name, email, phone, street, postal code or city is blank
/// - The email address has no `@` or nothing on either side of it
pub fn validate_contact_info(contact: &ContactInfo) -> Result<(), DomainError> {
    let required: [(&'static str, &str); 6] = [
        ("fullName", &contact.full_name),
        ("email", &contact.email),
        ("phone", &contact.phone),
        ("street", &contact.street),
        ("postalCode", &contact.postal_code),
        ("city", &contact.city),
    ];

    for (field, value) in required {
        if value.trim().is_empty() {
            return Err(DomainError::InvalidContactField {
                field,
                reason: String::from("must not be empty"),
            });
        }
    }

    match contact.email.trim().split_once('@') {
        Some((local, host)) if !local.is_empty() && !host.is_empty() => Ok(()),
        _ => Err(DomainError::InvalidContactField {
            field: "email",
            reason: format!("'{}' is not a valid email address", contact.email),
        }),
    }
}

/// Validates that a file name can be used as the last segment of an
/// archive entry path.
///
/// # Errors
///
/// Returns an error if the name is blank, contains a path separator or a
/// parent-directory reference, or contains control characters.
pub fn validate_file_name(file_name: &str) -> Result<(), DomainError> {
    let invalid: bool = file_name.trim().is_empty()
        || file_name.contains('/')
        || file_name.contains('\\')
        || file_name.contains("..")
        || file_name.chars().any(char::is_control);

    if invalid {
        return Err(DomainError::InvalidFileName(file_name.to_string()));
    }
    Ok(())
}

/// Validates the photo specification list of an order.
///
/// # Arguments
///
/// * `specs` - The photo specifications to validate
///
/// # Errors
///
/// Returns an error if:
/// - The list is empty
/// - Any quantity is zero
/// - Any file name is unusable as an archive entry name
/// - Any format or finish sanitizes to an empty path segment
pub fn validate_photo_specs(specs: &[PhotoSpec]) -> Result<(), DomainError> {
    if specs.is_empty() {
        return Err(DomainError::EmptyOrder);
    }

    for (index, spec) in specs.iter().enumerate() {
        if spec.quantity == 0 {
            return Err(DomainError::InvalidPhotoSpec {
                index,
                reason: String::from("quantity must be at least 1"),
            });
        }
        if validate_file_name(&spec.file_name).is_err() {
            return Err(DomainError::InvalidPhotoSpec {
                index,
                reason: format!("file name '{}' is not allowed", spec.file_name),
            });
        }
        if spec.format_segment().is_empty() {
            return Err(DomainError::InvalidPhotoSpec {
                index,
                reason: format!("format '{}' is not allowed", spec.format),
            });
        }
        if spec.finish_segment().is_empty() {
            return Err(DomainError::InvalidPhotoSpec {
                index,
                reason: format!("finish '{}' is not allowed", spec.finish),
            });
        }
    }

    Ok(())
}

fn validate_format_key(key: &str) -> Result<(), DomainError> {
    if key.is_empty() || sanitize_path_segment(key) != key {
        return Err(DomainError::InvalidFormatKey(key.to_string()));
    }
    Ok(())
}

fn validate_percent(field: &str, value: u32) -> Result<(), DomainError> {
    if value > 100 {
        return Err(DomainError::InvalidPercent {
            field: field.to_string(),
            value,
        });
    }
    Ok(())
}

/// Validates a price table before it is stored.
///
/// # Errors
///
/// Returns an error if any format key is not already a safe, lowercase path token.
pub fn validate_price_table(prices: &PriceTable) -> Result<(), DomainError> {
    for (format, _) in prices.entries() {
        validate_format_key(format)?;
    }
    Ok(())
}

/// Validates a quantity discount table before it is stored.
///
/// # Errors
///
/// Returns an error if any threshold is zero or any percentage exceeds 100.
pub fn validate_quantity_discounts(discounts: &QuantityDiscountTable) -> Result<(), DomainError> {
    for (threshold, percent) in discounts.entries() {
        if threshold == 0 {
            return Err(DomainError::InvalidDiscountThreshold(threshold));
        }
        validate_percent(&format!("discount tier {threshold}"), percent)?;
    }
    Ok(())
}

/// Validates a promotion before it is stored.
///
/// # Errors
///
/// Returns an error if the percentage exceeds 100, a scoped format is not a
/// valid format key, or the expiry cannot be parsed.
pub fn validate_promotion(promotion: &Promotion) -> Result<(), DomainError> {
    validate_percent("promotion", promotion.discount_percent)?;
    if let PromotionScope::Format(format) = &promotion.format {
        validate_format_key(format)?;
    }
    promotion.expiry()?;
    Ok(())
}

/// Validates general store settings before they are stored.
///
/// # Errors
///
/// Returns an error if the currency, contact phone or contact email is blank.
pub fn validate_store_settings(settings: &StoreSettings) -> Result<(), DomainError> {
    let required: [(&'static str, &str); 3] = [
        ("currency", &settings.currency),
        ("contactPhone", &settings.contact_phone),
        ("contactEmail", &settings.contact_email),
    ];

    for (field, value) in required {
        if value.trim().is_empty() {
            return Err(DomainError::InvalidStoreSetting {
                field,
                reason: String::from("must not be empty"),
            });
        }
    }
    Ok(())
}
