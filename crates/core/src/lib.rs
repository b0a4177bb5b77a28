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

mod archive;
mod error;
mod order;
mod order_number;
mod pricing;
mod summary;

#[cfg(test)]
mod tests;

// Re-export public types and functions
pub use archive::{
    ArchiveManifest, EntrySource, ManifestEntry, ORDER_DETAILS_FILE_NAME, StagedUploads,
    StagingDir, build_manifest, build_order_archive, photo_archive_path, verify_staged_uploads,
};
pub use error::CoreError;
pub use order::{Order, OrderRequest, assemble_order};
pub use order_number::generate_order_number;
pub use pricing::{LinePricing, PricingResult, compute_pricing, percent_of};
pub use summary::{
    LABEL_CITY, LABEL_CROP, LABEL_DATE, LABEL_DELIVERY, LABEL_EMAIL, LABEL_FILL_WHITE,
    LABEL_FULL_NAME, LABEL_GRAND_TOTAL, LABEL_LEAD_TIME, LABEL_NOTES, LABEL_ORDER_NUMBER,
    LABEL_PAYMENT, LABEL_PHONE, LABEL_POSTAL_CODE, LABEL_PROMOTION_DISCOUNT,
    LABEL_QUANTITY_DISCOUNT, LABEL_STREET, LABEL_SUBTOTAL, LABEL_TOTAL_DISCOUNT,
    LABEL_TOTAL_PHOTOS, SECTION_CUSTOMER, SECTION_FORMAT_RECAP, SECTION_PHOTOS,
    SECTION_PRICING, SECTION_PROCESSING, SummaryInput, format_order_summary,
};
