// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use serde::{Deserialize, Serialize};

/// A stored admin operator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperatorData {
    pub operator_id: i64,
    pub login_name: String,
    pub display_name: String,
    pub password_hash: String,
    pub role: String,
    pub created_at: String,
    pub last_login_at: Option<String>,
}

/// A stored login session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionData {
    pub session_id: i64,
    pub session_token: String,
    pub operator_id: i64,
    pub created_at: String,
    pub last_activity_at: String,
    pub expires_at: String,
}

/// Keys of the store configuration documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreDocument {
    /// The price table.
    Prices,
    /// The quantity discount tiers.
    Discounts,
    /// The promotion.
    Promotion,
    /// General store settings.
    Settings,
}

impl StoreDocument {
    /// Returns the storage key of the document.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Prices => "prices",
            Self::Discounts => "discounts",
            Self::Promotion => "promotion",
            Self::Settings => "settings",
        }
    }
}
