// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Request handlers for authentication and store configuration.
//!
//! Order handling lives in [`crate::orders`].

use fotoexpres_domain::{
    PriceTable, Promotion, QuantityDiscountTable, StoreSettings, validate_price_table,
    validate_promotion, validate_quantity_discounts, validate_store_settings,
};
use fotoexpres_persistence::{OperatorData, Persistence, StoreDocument};
use time::OffsetDateTime;
use tracing::info;

use crate::auth::{AuthenticatedActor, AuthenticationService, AuthorizationService};
use crate::error::{ApiError, translate_domain_error};
use crate::request_response::{
    ChangeCredentialsRequest, LoginRequest, LoginResponse, MessageResponse,
    PublicPromotionResponse,
};

// ========================================================================
// Authentication Handlers
// ========================================================================

/// Authenticates an operator and creates a session.
///
/// # Arguments
///
/// * `persistence` - The persistence layer
/// * `request` - The login request
///
/// # Errors
///
/// Returns an error if the credentials are wrong or the session cannot be
/// created.
pub fn login(persistence: &mut Persistence, request: &LoginRequest) -> Result<LoginResponse, ApiError> {
    let (token, actor, _operator): (String, AuthenticatedActor, OperatorData) =
        AuthenticationService::login(persistence, &request.username, &request.password)?;

    Ok(LoginResponse {
        success: true,
        token,
        message: String::from("Login successful"),
        role: actor.role.as_str().to_string(),
    })
}

/// Logs out by deleting the session.
///
/// # Errors
///
/// Returns an error if the logout fails.
pub fn logout(persistence: &mut Persistence, session_token: &str) -> Result<MessageResponse, ApiError> {
    AuthenticationService::logout(persistence, session_token)?;
    Ok(MessageResponse::ok("Logged out"))
}

/// Changes the current operator's login name and/or password.
///
/// Only Admin actors may change credentials. All of the operator's sessions
/// are revoked on success.
///
/// # Errors
///
/// Returns an error if:
/// - The actor is not authorized (not an Admin)
/// - The current password is wrong
/// - The new password violates the password policy
/// - The new login name is taken
pub fn change_credentials(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    operator: &OperatorData,
    request: &ChangeCredentialsRequest,
) -> Result<MessageResponse, ApiError> {
    AuthorizationService::authorize_mutation(actor, "change_credentials")?;

    AuthenticationService::change_credentials(
        persistence,
        operator,
        &request.current_password,
        request.new_username.as_deref(),
        request.new_password.as_deref(),
    )?;

    Ok(MessageResponse::ok(
        "Credentials updated. Please log in again.",
    ))
}

// ========================================================================
// Store Configuration Handlers
// ========================================================================

/// Returns the price table.
///
/// # Errors
///
/// Returns an error if the stored document cannot be read.
pub fn get_prices(persistence: &mut Persistence) -> Result<PriceTable, ApiError> {
    Ok(persistence.get_document(StoreDocument::Prices)?)
}

/// Replaces the price table.
///
/// # Errors
///
/// Returns an error if the actor is not an admin or a format key is invalid.
pub fn update_prices(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    prices: &PriceTable,
) -> Result<MessageResponse, ApiError> {
    AuthorizationService::authorize_mutation(actor, "update_prices")?;
    validate_price_table(prices).map_err(translate_domain_error)?;

    persistence.put_document(StoreDocument::Prices, prices)?;
    info!(actor = %actor.id, formats = prices.entries().count(), "Prices updated");
    Ok(MessageResponse::ok("Prices updated"))
}

/// Returns the quantity discount tiers.
///
/// # Errors
///
/// Returns an error if the stored document cannot be read.
pub fn get_discounts(persistence: &mut Persistence) -> Result<QuantityDiscountTable, ApiError> {
    Ok(persistence.get_document(StoreDocument::Discounts)?)
}

/// Replaces the quantity discount tiers.
///
/// # Errors
///
/// Returns an error if the actor is not an admin or a tier is invalid.
pub fn update_discounts(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    discounts: &QuantityDiscountTable,
) -> Result<MessageResponse, ApiError> {
    AuthorizationService::authorize_mutation(actor, "update_discounts")?;
    validate_quantity_discounts(discounts).map_err(translate_domain_error)?;

    persistence.put_document(StoreDocument::Discounts, discounts)?;
    info!(actor = %actor.id, "Quantity discounts updated");
    Ok(MessageResponse::ok("Discounts updated"))
}

/// Returns the stored promotion.
///
/// # Errors
///
/// Returns an error if the stored document cannot be read.
pub fn get_promotion(persistence: &mut Persistence) -> Result<Promotion, ApiError> {
    Ok(persistence.get_document(StoreDocument::Promotion)?)
}

/// Replaces the promotion.
///
/// # Errors
///
/// Returns an error if the actor is not an admin, the percentage is out of
/// range, the scope is not a valid format, or the expiry cannot be parsed.
pub fn update_promotion(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    promotion: &Promotion,
) -> Result<MessageResponse, ApiError> {
    AuthorizationService::authorize_mutation(actor, "update_promotion")?;
    validate_promotion(promotion).map_err(translate_domain_error)?;

    persistence.put_document(StoreDocument::Promotion, promotion)?;
    info!(
        actor = %actor.id,
        active = promotion.is_active,
        scope = %promotion.format,
        "Promotion updated"
    );
    Ok(MessageResponse::ok("Promotion updated"))
}

/// Returns the promotion as customers see it, with its effective activity at
/// `now`.
///
/// # Errors
///
/// Returns an error if the stored document cannot be read.
pub fn get_public_promotion(
    persistence: &mut Persistence,
    now: OffsetDateTime,
) -> Result<PublicPromotionResponse, ApiError> {
    let promotion: Promotion = persistence.get_document(StoreDocument::Promotion)?;
    let is_currently_active: bool = promotion.is_effective_at(now);
    Ok(PublicPromotionResponse {
        promotion,
        is_currently_active,
    })
}

/// Returns the store settings.
///
/// Every setting is customer-facing, so the same document serves the public
/// and admin reads.
///
/// # Errors
///
/// Returns an error if the stored document cannot be read.
pub fn get_settings(persistence: &mut Persistence) -> Result<StoreSettings, ApiError> {
    Ok(persistence.get_document(StoreDocument::Settings)?)
}

/// Replaces the store settings.
///
/// # Errors
///
/// Returns an error if the actor is not an admin or a required setting is
/// blank.
pub fn update_settings(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    settings: &StoreSettings,
) -> Result<MessageResponse, ApiError> {
    AuthorizationService::authorize_mutation(actor, "update_settings")?;
    validate_store_settings(settings).map_err(translate_domain_error)?;

    persistence.put_document(StoreDocument::Settings, settings)?;
    info!(actor = %actor.id, "Store settings updated");
    Ok(MessageResponse::ok("Settings updated"))
}
