// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use serde::{Deserialize, Serialize};

/// Customer identity and delivery destination.
///
/// The delivery address is kept as three separate fields. Consumers of the
/// order recap parse street, postal code and city by label, one per line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactInfo {
    /// The customer's full name.
    pub full_name: String,
    /// The customer's email address.
    pub email: String,
    /// The customer's phone number.
    pub phone: String,
    /// Street and house number.
    pub street: String,
    /// Postal code.
    pub postal_code: String,
    /// City.
    pub city: String,
    /// Optional free-text notes from the customer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl ContactInfo {
    /// Creates new contact information.
    ///
    /// # Arguments
    ///
    /// * `full_name` - The customer's full name
    /// * `email` - The customer's email address
    /// * `phone` - The customer's phone number
    /// * `street` - Street and house number
    /// * `postal_code` - Postal code
    /// * `city` - City
    /// * `notes` - Optional free-text notes
    #[must_use]
    pub fn new(
        full_name: &str,
        email: &str,
        phone: &str,
        street: &str,
        postal_code: &str,
        city: &str,
        notes: Option<&str>,
    ) -> Self {
        Self {
            full_name: full_name.to_string(),
            email: email.to_string(),
            phone: phone.to_string(),
            street: street.to_string(),
            postal_code: postal_code.to_string(),
            city: city.to_string(),
            notes: notes.map(str::to_string),
        }
    }

    /// Returns the notes, treating blank notes as absent.
    #[must_use]
    pub fn notes(&self) -> Option<&str> {
        self.notes
            .as_deref()
            .map(str::trim)
            .filter(|notes| !notes.is_empty())
    }
}
