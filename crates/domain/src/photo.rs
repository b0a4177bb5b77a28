// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use serde::{Deserialize, Serialize};

/// One line item of an order: a single uploaded photo printed in one
/// format and finish, `quantity` times.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotoSpec {
    /// The uploaded file this line refers to.
    pub file_name: String,
    /// The print format, also the key into the price table (e.g. `10x15`).
    pub format: String,
    /// The paper finish (e.g. `sjajni`, `mat`).
    pub finish: String,
    /// Number of physical prints.
    pub quantity: u32,
}

impl PhotoSpec {
    /// Creates a new photo specification.
    ///
    /// # Arguments
    ///
    /// * `file_name` - The uploaded file name
    /// * `format` - The print format key
    /// * `finish` - The paper finish
    /// * `quantity` - Number of physical prints
    #[must_use]
    pub fn new(file_name: &str, format: &str, finish: &str, quantity: u32) -> Self {
        Self {
            file_name: file_name.to_string(),
            format: format.to_string(),
            finish: finish.to_string(),
            quantity,
        }
    }

    /// Returns the format as a safe archive path segment.
    #[must_use]
    pub fn format_segment(&self) -> String {
        sanitize_path_segment(&self.format)
    }

    /// Returns the finish as a safe archive path segment.
    #[must_use]
    pub fn finish_segment(&self) -> String {
        sanitize_path_segment(&self.finish)
    }
}

/// Image processing choices made by the customer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessingOptions {
    /// Crop the photo so it fills the chosen format.
    #[serde(default, alias = "cropOption")]
    pub crop_to_format: bool,
    /// Pad the photo with white instead of cropping.
    #[serde(default, alias = "fillWhiteOption")]
    pub fill_white: bool,
}

/// Sums the physical print count across all specifications.
///
/// This is the discount-eligibility count. It is neither the number of
/// specifications nor the number of uploaded files.
#[must_use]
pub fn total_photo_count(specs: &[PhotoSpec]) -> u32 {
    specs
        .iter()
        .fold(0u32, |acc, spec| acc.saturating_add(spec.quantity))
}

/// Reduces a value to a token that is safe to use as one archive path segment.
///
/// The value is trimmed and lowercased. Letters, digits, `-` and `_` are kept,
/// whitespace becomes `_`, everything else (separators, dots, control
/// characters) is dropped. The result may be empty; callers reject that.
#[must_use]
pub fn sanitize_path_segment(value: &str) -> String {
    value
        .trim()
        .chars()
        .filter_map(|c| {
            if c.is_alphanumeric() || c == '-' || c == '_' {
                Some(c)
            } else if c.is_whitespace() {
                Some('_')
            } else {
                None
            }
        })
        .flat_map(char::to_lowercase)
        .collect()
}
