// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API request and response data transfer objects.

use fotoexpres::{Order, PricingResult};
use fotoexpres_domain::{PhotoSpec, Promotion};
use serde::{Deserialize, Serialize};

/// One uploaded photo, as received from the request layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    /// The declared file name.
    pub file_name: String,
    /// The file content.
    pub bytes: Vec<u8>,
}

/// API response for a successfully created order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderResponse {
    /// Always `true`.
    pub success: bool,
    /// The new order's number.
    pub order_number: String,
    /// A success message.
    pub message: String,
    /// The archive file name.
    pub zip_file_path: String,
    /// The charged amounts, as written into the recap.
    pub pricing: PricingResult,
}

/// Result of a chunked-upload finalize.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FinalizeOutcome {
    /// This call built and persisted the order.
    Created(CreateOrderResponse),
    /// The order already existed; nothing was rebuilt.
    AlreadyFinalized(Order),
}

/// API response for a finalize call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinalizeResponse {
    /// Always `true`.
    pub success: bool,
    /// The order number.
    pub order_number: String,
    /// A human-readable message.
    pub message: String,
    /// Whether the order had already been finalized by an earlier call.
    pub already_finalized: bool,
    /// The archive file name.
    pub zip_file_path: String,
    /// The charged amounts; only present when this call created the order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pricing: Option<PricingResult>,
}

impl From<FinalizeOutcome> for FinalizeResponse {
    fn from(outcome: FinalizeOutcome) -> Self {
        match outcome {
            FinalizeOutcome::Created(created) => Self {
                success: true,
                order_number: created.order_number,
                message: created.message,
                already_finalized: false,
                zip_file_path: created.zip_file_path,
                pricing: Some(created.pricing),
            },
            FinalizeOutcome::AlreadyFinalized(order) => Self {
                success: true,
                order_number: order.order_number().to_string(),
                message: String::from("Order was already finalized"),
                already_finalized: true,
                zip_file_path: order.archive_path().to_string(),
                pricing: None,
            },
        }
    }
}

/// API response for a chunked upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    /// Always `true`.
    pub success: bool,
    /// The order number the files were staged for.
    pub order_number: String,
    /// Number of files stored by this call.
    pub uploaded: usize,
}

/// API response carrying one order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderResponse {
    /// Always `true`.
    pub success: bool,
    /// The order.
    pub order: Order,
}

/// API response carrying all orders, newest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListOrdersResponse {
    /// Always `true`.
    pub success: bool,
    /// The orders.
    pub orders: Vec<Order>,
}

/// API request to change an order's status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateStatusRequest {
    /// The new status: `pending`, `processing` or `completed`.
    pub status: String,
}

/// Generic success response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    /// Always `true`.
    pub success: bool,
    /// A human-readable message.
    pub message: String,
}

impl MessageResponse {
    /// Creates a success response.
    #[must_use]
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}

/// API request for an order quote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteRequest {
    /// The photo specifications to price.
    #[serde(alias = "photoSettings")]
    pub photo_specs: Vec<PhotoSpec>,
}

/// API response for an order quote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteResponse {
    /// Always `true`.
    pub success: bool,
    /// The computed pricing.
    pub pricing: PricingResult,
}

/// The promotion as shown to customers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicPromotionResponse {
    /// The stored promotion.
    #[serde(flatten)]
    pub promotion: Promotion,
    /// Whether the promotion applies right now, taking expiry into account.
    pub is_currently_active: bool,
}

/// API request to log in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRequest {
    /// The login name.
    pub username: String,
    /// The password.
    pub password: String,
}

/// API response for a successful login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    /// Always `true`.
    pub success: bool,
    /// The bearer token for subsequent requests.
    pub token: String,
    /// A human-readable message.
    pub message: String,
    /// The operator's role: `admin` or `viewer`.
    pub role: String,
}

/// API request to change the current operator's credentials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeCredentialsRequest {
    /// The current password.
    pub current_password: String,
    /// An optional new login name.
    #[serde(default)]
    pub new_username: Option<String>,
    /// An optional new password.
    #[serde(default)]
    pub new_password: Option<String>,
}
