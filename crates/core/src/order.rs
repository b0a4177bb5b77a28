// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::CoreError;
use fotoexpres_domain::{
    ContactInfo, OrderNumber, OrderStatus, PhotoSpec, ProcessingOptions, total_photo_count,
    validate_contact_info, validate_photo_specs,
};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// The structured part of an order submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRequest {
    /// The customer's contact information.
    pub contact_info: ContactInfo,
    /// One entry per photo placement.
    #[serde(alias = "photoSettings")]
    pub photo_specs: Vec<PhotoSpec>,
    /// The customer's processing choices.
    #[serde(default)]
    pub processing_options: ProcessingOptions,
}

impl OrderRequest {
    /// Validates the contact information and photo specifications.
    ///
    /// # Errors
    ///
    /// Returns an error if a required contact field is missing or any photo
    /// specification is invalid.
    pub fn validate(&self) -> Result<(), CoreError> {
        validate_contact_info(&self.contact_info)?;
        validate_photo_specs(&self.photo_specs)?;
        Ok(())
    }
}

/// A persisted order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    order_number: OrderNumber,
    status: OrderStatus,
    #[serde(with = "time::serde::rfc3339")]
    created_at: OffsetDateTime,
    contact_info: ContactInfo,
    photo_specs: Vec<PhotoSpec>,
    archive_path: String,
    total_photos: u32,
}

impl Order {
    /// Reconstructs an order from stored fields.
    ///
    /// The stored total is kept as-is; only [`assemble_order`] derives it.
    #[must_use]
    pub const fn restore(
        order_number: OrderNumber,
        status: OrderStatus,
        created_at: OffsetDateTime,
        contact_info: ContactInfo,
        photo_specs: Vec<PhotoSpec>,
        archive_path: String,
        total_photos: u32,
    ) -> Self {
        Self {
            order_number,
            status,
            created_at,
            contact_info,
            photo_specs,
            archive_path,
            total_photos,
        }
    }

    /// Returns the order number.
    #[must_use]
    pub const fn order_number(&self) -> &OrderNumber {
        &self.order_number
    }

    /// Returns the processing status.
    #[must_use]
    pub const fn status(&self) -> OrderStatus {
        self.status
    }

    /// Returns when the order was created.
    #[must_use]
    pub const fn created_at(&self) -> OffsetDateTime {
        self.created_at
    }

    /// Returns the customer's contact information.
    #[must_use]
    pub const fn contact_info(&self) -> &ContactInfo {
        &self.contact_info
    }

    /// Returns the photo specifications.
    #[must_use]
    pub fn photo_specs(&self) -> &[PhotoSpec] {
        &self.photo_specs
    }

    /// Returns the stored archive reference.
    #[must_use]
    pub fn archive_path(&self) -> &str {
        &self.archive_path
    }

    /// Returns the total number of physical prints.
    #[must_use]
    pub const fn total_photos(&self) -> u32 {
        self.total_photos
    }

    /// Returns a copy of the order with a new status.
    #[must_use]
    pub fn with_status(self, status: OrderStatus) -> Self {
        Self { status, ..self }
    }
}

/// Builds the order entity once its archive exists.
///
/// The total photo count is always recomputed from `photo_specs`.
///
/// # Arguments
///
/// * `order_number` - The order's number
/// * `contact_info` - The customer's contact information
/// * `photo_specs` - The order's photo specifications
/// * `archive_path` - Reference to the published archive
/// * `status` - The initial status, normally [`OrderStatus::Pending`]
/// * `created_at` - The order timestamp
#[must_use]
pub fn assemble_order(
    order_number: OrderNumber,
    contact_info: ContactInfo,
    photo_specs: Vec<PhotoSpec>,
    archive_path: String,
    status: OrderStatus,
    created_at: OffsetDateTime,
) -> Order {
    let total_photos: u32 = total_photo_count(&photo_specs);
    Order {
        order_number,
        status,
        created_at,
        contact_info,
        photo_specs,
        archive_path,
        total_photos,
    }
}
