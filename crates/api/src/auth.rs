// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Authentication and authorization types and services.

use fotoexpres_persistence::{OperatorData, Persistence, PersistenceError, SessionData};
use time::format_description::well_known::Rfc3339;
use time::{Duration, OffsetDateTime};
use tracing::{info, warn};

use crate::error::{ApiError, AuthError};
use crate::password_policy::PasswordPolicy;

/// Operator roles for authorization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Admin role: may read and change orders, store configuration and
    /// credentials.
    Admin,
    /// Viewer role: read-only access to orders and store configuration.
    Viewer,
}

impl Role {
    /// Returns the stored name of the role.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Viewer => "viewer",
        }
    }

    /// Parses a stored role name.
    ///
    /// # Errors
    ///
    /// Returns an error if the role is unknown.
    pub fn parse(value: &str) -> Result<Self, AuthError> {
        match value {
            "admin" => Ok(Self::Admin),
            "viewer" => Ok(Self::Viewer),
            _ => Err(AuthError::AuthenticationFailed {
                reason: format!("Invalid role: {value}"),
            }),
        }
    }
}

/// An authenticated operator with an associated role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedActor {
    /// The operator's login name.
    pub id: String,
    /// The role assigned to this actor.
    pub role: Role,
}

impl AuthenticatedActor {
    /// Creates a new authenticated actor.
    ///
    /// # Arguments
    ///
    /// * `id` - The operator's login name
    /// * `role` - The role assigned to this actor
    #[must_use]
    pub const fn new(id: String, role: Role) -> Self {
        Self { id, role }
    }
}

/// Authorization service for enforcing role-based access control.
pub struct AuthorizationService;

impl AuthorizationService {
    /// Checks that an actor may change data.
    ///
    /// Only Admin actors may mutate orders, store configuration or
    /// credentials; viewers are read-only.
    ///
    /// # Arguments
    ///
    /// * `actor` - The authenticated actor
    /// * `action` - The attempted action, for the error message
    ///
    /// # Errors
    ///
    /// Returns an error if the actor does not have the Admin role.
    pub fn authorize_mutation(actor: &AuthenticatedActor, action: &str) -> Result<(), AuthError> {
        match actor.role {
            Role::Admin => Ok(()),
            Role::Viewer => Err(AuthError::Unauthorized {
                action: action.to_string(),
                required_role: String::from("Admin"),
            }),
        }
    }
}

/// Authentication service for session-based authentication.
pub struct AuthenticationService;

impl AuthenticationService {
    /// Session lifetime.
    pub const SESSION_DURATION: Duration = Duration::hours(24);

    /// Authenticates an operator and creates a session.
    ///
    /// Expired sessions are purged as part of every login.
    ///
    /// # Arguments
    ///
    /// * `persistence` - The persistence layer
    /// * `login_name` - The operator login name
    /// * `password` - The plain-text password
    ///
    /// # Returns
    ///
    /// A tuple of (`session_token`, `authenticated_actor`, `operator_data`)
    ///
    /// # Errors
    ///
    /// Returns an error if the credentials are wrong or the session cannot be
    /// created.
    pub fn login(
        persistence: &mut Persistence,
        login_name: &str,
        password: &str,
    ) -> Result<(String, AuthenticatedActor, OperatorData), AuthError> {
        let now: OffsetDateTime = OffsetDateTime::now_utc();
        persistence
            .delete_expired_sessions(&format_session_time(now)?)
            .map_err(Self::map_persistence_error)?;

        // Unknown login and wrong password are indistinguishable to the caller
        let operator: OperatorData = persistence
            .get_operator_by_login(login_name)
            .map_err(Self::map_persistence_error)?
            .ok_or_else(|| {
                warn!(login_name, "Login attempt for unknown operator");
                invalid_credentials()
            })?;

        let password_valid: bool = persistence
            .verify_password(password, &operator.password_hash)
            .map_err(Self::map_persistence_error)?;
        if !password_valid {
            warn!(login_name = %operator.login_name, "Login attempt with wrong password");
            return Err(invalid_credentials());
        }

        let role: Role = Role::parse(&operator.role)?;

        let session_token: String = Self::generate_session_token();
        let expires_at: String = format_session_time(now + Self::SESSION_DURATION)?;

        persistence
            .create_session(&session_token, operator.operator_id, &expires_at)
            .map_err(|e| AuthError::AuthenticationFailed {
                reason: format!("Failed to create session: {e}"),
            })?;

        persistence
            .update_last_login(operator.operator_id)
            .map_err(|e| AuthError::AuthenticationFailed {
                reason: format!("Failed to update last login: {e}"),
            })?;

        info!(login_name = %operator.login_name, role = role.as_str(), "Operator logged in");

        let authenticated_actor: AuthenticatedActor =
            AuthenticatedActor::new(operator.login_name.clone(), role);

        Ok((session_token, authenticated_actor, operator))
    }

    /// Validates a session token and returns the authenticated actor.
    ///
    /// # Arguments
    ///
    /// * `persistence` - The persistence layer
    /// * `session_token` - The session token to validate
    ///
    /// # Returns
    ///
    /// A tuple of (`authenticated_actor`, `operator_data`)
    ///
    /// # Errors
    ///
    /// Returns an error if the session is invalid or expired.
    pub fn validate_session(
        persistence: &mut Persistence,
        session_token: &str,
    ) -> Result<(AuthenticatedActor, OperatorData), AuthError> {
        let session: SessionData = persistence
            .get_session_by_token(session_token)
            .map_err(Self::map_persistence_error)?
            .ok_or_else(|| AuthError::AuthenticationFailed {
                reason: String::from("Invalid session token"),
            })?;

        let expires_at: OffsetDateTime = OffsetDateTime::parse(&session.expires_at, &Rfc3339)
            .map_err(|e| AuthError::AuthenticationFailed {
                reason: format!("Failed to parse session expiration: {e}"),
            })?;

        if OffsetDateTime::now_utc() > expires_at {
            return Err(AuthError::AuthenticationFailed {
                reason: String::from("Session expired"),
            });
        }

        let operator: OperatorData = persistence
            .get_operator_by_id(session.operator_id)
            .map_err(Self::map_persistence_error)?
            .ok_or_else(|| AuthError::AuthenticationFailed {
                reason: String::from("Operator not found"),
            })?;

        let role: Role = Role::parse(&operator.role)?;

        persistence
            .update_session_activity(session.session_id)
            .map_err(Self::map_persistence_error)?;

        let authenticated_actor: AuthenticatedActor =
            AuthenticatedActor::new(operator.login_name.clone(), role);

        Ok((authenticated_actor, operator))
    }

    /// Logs out by deleting the session.
    ///
    /// # Errors
    ///
    /// Returns an error if the logout fails.
    pub fn logout(persistence: &mut Persistence, session_token: &str) -> Result<(), AuthError> {
        persistence
            .delete_session(session_token)
            .map_err(|e| AuthError::AuthenticationFailed {
                reason: format!("Failed to delete session: {e}"),
            })?;

        Ok(())
    }

    /// Creates an operator unless one with this login already exists.
    ///
    /// Used to seed the configured admin and viewer accounts on start-up.
    /// Existing operators keep their stored password, so credentials changed
    /// at runtime survive a restart.
    ///
    /// # Returns
    ///
    /// `true` if the operator was created.
    ///
    /// # Errors
    ///
    /// Returns an error if the lookup or insert fails.
    pub fn ensure_operator(
        persistence: &mut Persistence,
        login_name: &str,
        password: &str,
        role: Role,
    ) -> Result<bool, ApiError> {
        if persistence.get_operator_by_login(login_name)?.is_some() {
            return Ok(false);
        }

        let display_name: &str = match role {
            Role::Admin => "Administrator",
            Role::Viewer => "Viewer",
        };
        persistence.create_operator(login_name, display_name, password, role.as_str())?;
        info!(login_name, role = role.as_str(), "Seeded operator");
        Ok(true)
    }

    /// Changes an operator's login name and/or password.
    ///
    /// The current password must be supplied. Every session of the operator
    /// is revoked afterwards, including the one used for this request.
    ///
    /// # Arguments
    ///
    /// * `persistence` - The persistence layer
    /// * `operator` - The operator changing their credentials
    /// * `current_password` - The operator's current password
    /// * `new_login_name` - An optional new login name
    /// * `new_password` - An optional new password
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The current password is wrong
    /// - Neither a new login name nor a new password is given
    /// - The new password violates the password policy
    /// - The new login name is empty or taken
    pub fn change_credentials(
        persistence: &mut Persistence,
        operator: &OperatorData,
        current_password: &str,
        new_login_name: Option<&str>,
        new_password: Option<&str>,
    ) -> Result<(), ApiError> {
        let password_valid: bool = persistence
            .verify_password(current_password, &operator.password_hash)
            .map_err(Self::map_persistence_error)?;
        if !password_valid {
            return Err(ApiError::AuthenticationFailed {
                reason: String::from("Current password is incorrect"),
            });
        }

        let new_login_name: Option<&str> = new_login_name
            .map(str::trim)
            .filter(|login| !login.is_empty());
        let new_password: Option<&str> = new_password.filter(|password| !password.is_empty());

        if new_login_name.is_none() && new_password.is_none() {
            return Err(ApiError::InvalidInput {
                field: String::from("newUsername"),
                message: String::from("Provide a new username, a new password, or both"),
            });
        }

        if let Some(password) = new_password {
            let effective_login: &str = new_login_name.unwrap_or(&operator.login_name);
            PasswordPolicy::default().validate(password, effective_login)?;
        }

        if let Some(login) = new_login_name {
            persistence.update_login_name(operator.operator_id, login)?;
        }
        if let Some(password) = new_password {
            persistence.update_password(operator.operator_id, password)?;
        }

        let revoked: usize = persistence.delete_sessions_for_operator(operator.operator_id)?;
        info!(
            operator_id = operator.operator_id,
            revoked, "Operator credentials changed"
        );

        Ok(())
    }

    /// Generates a random 256-bit session token, hex encoded.
    fn generate_session_token() -> String {
        format!(
            "{:032x}{:032x}",
            rand::random::<u128>(),
            rand::random::<u128>()
        )
    }

    /// Maps persistence errors to authentication errors.
    fn map_persistence_error(err: PersistenceError) -> AuthError {
        AuthError::AuthenticationFailed {
            reason: format!("Database error: {err}"),
        }
    }
}

fn invalid_credentials() -> AuthError {
    AuthError::AuthenticationFailed {
        reason: String::from("Invalid username or password"),
    }
}

/// Formats a session timestamp as RFC 3339 UTC with whole seconds, so stored
/// values order correctly as strings.
fn format_session_time(at: OffsetDateTime) -> Result<String, AuthError> {
    let whole_seconds: OffsetDateTime =
        at.replace_nanosecond(0)
            .map_err(|e| AuthError::AuthenticationFailed {
                reason: format!("Failed to format session time: {e}"),
            })?;
    whole_seconds
        .format(&Rfc3339)
        .map_err(|e| AuthError::AuthenticationFailed {
            reason: format!("Failed to format session time: {e}"),
        })
}
