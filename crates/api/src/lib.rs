// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API boundary layer for the Fotoexpres order backend.
//!
//! Translates requests into core operations, owns the order-creation
//! workflow (staging, archive publication, persistence, notification) and
//! enforces authentication and authorization. Transport concerns stay in the
//! server crate.

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
#![allow(clippy::multiple_crate_versions)]

mod auth;
mod error;
mod handlers;
mod notify;
mod orders;
mod password_policy;
mod request_response;
mod storage;

#[cfg(test)]
mod tests;

pub use auth::{AuthenticatedActor, AuthenticationService, AuthorizationService, Role};
pub use error::{ApiError, AuthError, translate_core_error, translate_domain_error};
pub use handlers::{
    change_credentials, get_discounts, get_prices, get_promotion, get_public_promotion,
    get_settings, login, logout, update_discounts, update_prices, update_promotion,
    update_settings,
};
pub use notify::{LogNotifier, Notifier, NotifyError, OrderNotification, dispatch};
pub use orders::{OrderService, StoreConfiguration};
pub use password_policy::{PasswordPolicy, PasswordPolicyError};
pub use request_response::{
    ChangeCredentialsRequest, CreateOrderResponse, FinalizeOutcome, FinalizeResponse,
    ListOrdersResponse, LoginRequest, LoginResponse, MessageResponse, OrderResponse,
    PublicPromotionResponse, QuoteRequest, QuoteResponse, UpdateStatusRequest, UploadResponse,
    UploadedFile,
};
pub use storage::{ORDERS_DIR_NAME, OrderStorage, PendingArchive, ZIPS_DIR_NAME};
