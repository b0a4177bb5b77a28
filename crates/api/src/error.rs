// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the API layer.

use crate::password_policy::PasswordPolicyError;
use fotoexpres::CoreError;
use fotoexpres_domain::DomainError;
use fotoexpres_persistence::PersistenceError;

/// Authentication and authorization errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Authentication failed.
    AuthenticationFailed {
        /// The reason authentication failed.
        reason: String,
    },
    /// Authorization failed.
    Unauthorized {
        /// The action that was attempted.
        action: String,
        /// The role required for this action.
        required_role: String,
    },
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AuthenticationFailed { reason } => {
                write!(f, "Authentication failed: {reason}")
            }
            Self::Unauthorized {
                action,
                required_role,
            } => {
                write!(f, "Unauthorized: '{action}' requires {required_role} role")
            }
        }
    }
}

impl std::error::Error for AuthError {}

/// API-level errors.
///
/// These are distinct from domain/core errors and represent the API contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Authentication failed.
    AuthenticationFailed {
        /// The reason authentication failed.
        reason: String,
    },
    /// Authorization failed - the actor does not have permission.
    Unauthorized {
        /// The action that was attempted.
        action: String,
        /// The role required for this action.
        required_role: String,
    },
    /// A domain rule was violated.
    DomainRuleViolation {
        /// The rule that was violated.
        rule: String,
        /// A human-readable description of the violation.
        message: String,
    },
    /// Invalid input was provided.
    InvalidInput {
        /// The field that was invalid.
        field: String,
        /// A human-readable description of the error.
        message: String,
    },
    /// A requested resource was not found.
    ResourceNotFound {
        /// The type of resource that was not found.
        resource_type: String,
        /// A human-readable description of what was not found.
        message: String,
    },
    /// Reading or writing order files failed.
    StorageFailure {
        /// A description of the failure.
        message: String,
        /// Whether the caller may retry the request.
        retryable: bool,
    },
    /// An internal error occurred.
    Internal {
        /// A description of the internal error.
        message: String,
    },
    /// Password policy violation.
    PasswordPolicyViolation {
        /// A human-readable description of the policy violation.
        message: String,
    },
}

impl ApiError {
    /// Builds a retryable storage failure.
    #[must_use]
    pub fn storage(message: impl Into<String>) -> Self {
        Self::StorageFailure {
            message: message.into(),
            retryable: true,
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AuthenticationFailed { reason } => {
                write!(f, "Authentication failed: {reason}")
            }
            Self::Unauthorized {
                action,
                required_role,
            } => {
                write!(f, "Unauthorized: '{action}' requires {required_role} role")
            }
            Self::DomainRuleViolation { rule, message } => {
                write!(f, "Domain rule violation ({rule}): {message}")
            }
            Self::InvalidInput { field, message } => {
                write!(f, "Invalid input for field '{field}': {message}")
            }
            Self::ResourceNotFound {
                resource_type,
                message,
            } => {
                write!(f, "{resource_type} not found: {message}")
            }
            Self::StorageFailure { message, retryable } => {
                if *retryable {
                    write!(f, "Storage failure (try again later): {message}")
                } else {
                    write!(f, "Storage failure: {message}")
                }
            }
            Self::Internal { message } => {
                write!(f, "Internal error: {message}")
            }
            Self::PasswordPolicyViolation { message } => {
                write!(f, "Password policy violation: {message}")
            }
        }
    }
}

impl std::error::Error for ApiError {}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::AuthenticationFailed { reason } => Self::AuthenticationFailed { reason },
            AuthError::Unauthorized {
                action,
                required_role,
            } => Self::Unauthorized {
                action,
                required_role,
            },
        }
    }
}

impl From<PasswordPolicyError> for ApiError {
    fn from(err: PasswordPolicyError) -> Self {
        Self::PasswordPolicyViolation {
            message: err.to_string(),
        }
    }
}

impl From<PersistenceError> for ApiError {
    fn from(err: PersistenceError) -> Self {
        match err {
            PersistenceError::OrderNotFound(number) => Self::ResourceNotFound {
                resource_type: String::from("Order"),
                message: format!("Order {number} does not exist"),
            },
            PersistenceError::DuplicateOrderNumber(number) => Self::DomainRuleViolation {
                rule: String::from("unique_order_number"),
                message: format!("Order {number} already exists"),
            },
            PersistenceError::DuplicateLoginName(login) => Self::DomainRuleViolation {
                rule: String::from("unique_login_name"),
                message: format!("Login name '{login}' is already in use"),
            },
            PersistenceError::OperatorNotFound(msg) => Self::ResourceNotFound {
                resource_type: String::from("Operator"),
                message: msg,
            },
            PersistenceError::DatabaseConnectionFailed(msg) => Self::storage(msg),
            _ => Self::Internal {
                message: err.to_string(),
            },
        }
    }
}

/// Translates a domain error into an API error.
///
/// This translation is explicit and ensures domain errors are not leaked directly.
#[must_use]
pub fn translate_domain_error(err: DomainError) -> ApiError {
    match err {
        DomainError::InvalidContactField { field, reason } => ApiError::InvalidInput {
            field: format!("contactInfo.{field}"),
            message: reason,
        },
        DomainError::EmptyOrder => ApiError::InvalidInput {
            field: String::from("photoSpecs"),
            message: String::from("Order must contain at least one photo"),
        },
        DomainError::InvalidPhotoSpec { index, reason } => ApiError::InvalidInput {
            field: format!("photoSpecs[{index}]"),
            message: reason,
        },
        DomainError::InvalidFileName(name) => ApiError::InvalidInput {
            field: String::from("fileName"),
            message: format!("File name '{name}' is not allowed"),
        },
        DomainError::InvalidOrderStatus(status) => ApiError::InvalidInput {
            field: String::from("status"),
            message: format!(
                "Invalid status: '{status}'. Must be one of pending, processing, completed"
            ),
        },
        DomainError::InvalidOrderNumber(value) => ApiError::InvalidInput {
            field: String::from("orderNumber"),
            message: format!("Invalid order number: '{value}'"),
        },
        DomainError::InvalidFormatKey(key) => ApiError::InvalidInput {
            field: String::from("format"),
            message: format!("Format key '{key}' is not allowed"),
        },
        DomainError::InvalidPercent { field, value } => ApiError::InvalidInput {
            field,
            message: format!("Percentage {value} must be between 0 and 100"),
        },
        DomainError::InvalidDiscountThreshold(threshold) => ApiError::InvalidInput {
            field: String::from("discounts"),
            message: format!("Threshold {threshold} must be greater than 0"),
        },
        DomainError::InvalidPromotionExpiry { value, error } => ApiError::InvalidInput {
            field: String::from("validUntil"),
            message: format!("Failed to parse '{value}': {error}"),
        },
        DomainError::InvalidStoreSetting { field, reason } => ApiError::InvalidInput {
            field: field.to_string(),
            message: reason,
        },
    }
}

/// Translates a core error into an API error.
///
/// Client errors become rejections; archive and I/O failures become
/// retryable storage failures.
#[must_use]
pub fn translate_core_error(err: CoreError) -> ApiError {
    match err {
        CoreError::DomainViolation(domain_err) => translate_domain_error(domain_err),
        CoreError::MissingUpload { file_name } => ApiError::InvalidInput {
            field: String::from("photos"),
            message: format!("Photo '{file_name}' is referenced by the order but was not uploaded"),
        },
        CoreError::Archive(message) => ApiError::storage(format!("Archive error: {message}")),
        CoreError::Io { context, message } => {
            ApiError::storage(format!("I/O error while {context}: {message}"))
        }
    }
}
