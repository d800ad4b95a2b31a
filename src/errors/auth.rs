use poem_openapi::{payload::Json, ApiResponse};
use std::fmt;

use crate::auth::gate::GateError;
use crate::errors::internal::{AccountError, InternalError};
use crate::types::dto::common::ErrorResponse;

/// Authentication/authorization error responses for the /auth surface
#[derive(ApiResponse, Debug)]
pub enum AuthError {
    /// Malformed or missing input
    #[oai(status = 400)]
    Validation(Json<ErrorResponse>),

    /// Unknown email or wrong password
    #[oai(status = 401)]
    InvalidCredentials(Json<ErrorResponse>),

    /// No bearer token or cookie on an authenticated endpoint
    #[oai(status = 401)]
    MissingToken(Json<ErrorResponse>),

    /// Malformed or tampered session token
    #[oai(status = 401)]
    TokenInvalid(Json<ErrorResponse>),

    /// Session token past its expiry
    #[oai(status = 401)]
    TokenExpired(Json<ErrorResponse>),

    /// Account is suspended; checked against the live row on every request
    #[oai(status = 403)]
    AccountSuspended(Json<ErrorResponse>),

    /// Authenticated but the role/permission check failed
    #[oai(status = 403)]
    PermissionDenied(Json<ErrorResponse>),

    /// Too many attempts from this client
    #[oai(status = 429)]
    RateLimited(Json<ErrorResponse>),

    /// Unexpected failure; detail stays in server logs
    #[oai(status = 500)]
    Internal(Json<ErrorResponse>),
}

impl AuthError {
    pub fn validation(message: impl Into<String>) -> Self {
        AuthError::Validation(Json(ErrorResponse {
            error: "validation_error".to_string(),
            message: message.into(),
            status_code: 400,
        }))
    }

    pub fn invalid_credentials() -> Self {
        AuthError::InvalidCredentials(Json(ErrorResponse {
            error: "invalid_credentials".to_string(),
            message: "Invalid email or password".to_string(),
            status_code: 401,
        }))
    }

    pub fn missing_token() -> Self {
        AuthError::MissingToken(Json(ErrorResponse {
            error: "missing_token".to_string(),
            message: "Authentication required".to_string(),
            status_code: 401,
        }))
    }

    pub fn token_invalid() -> Self {
        AuthError::TokenInvalid(Json(ErrorResponse {
            error: "token_invalid".to_string(),
            message: "Invalid session token".to_string(),
            status_code: 401,
        }))
    }

    pub fn token_expired() -> Self {
        AuthError::TokenExpired(Json(ErrorResponse {
            error: "token_expired".to_string(),
            message: "Session token has expired".to_string(),
            status_code: 401,
        }))
    }

    pub fn account_suspended() -> Self {
        AuthError::AccountSuspended(Json(ErrorResponse {
            error: "account_suspended".to_string(),
            message: "This account has been suspended".to_string(),
            status_code: 403,
        }))
    }

    pub fn permission_denied() -> Self {
        AuthError::PermissionDenied(Json(ErrorResponse {
            error: "permission_denied".to_string(),
            message: "You do not have permission to perform this action".to_string(),
            status_code: 403,
        }))
    }

    pub fn rate_limited() -> Self {
        AuthError::RateLimited(Json(ErrorResponse {
            error: "rate_limited".to_string(),
            message: "Too many attempts, try again later".to_string(),
            status_code: 429,
        }))
    }

    /// Log the detailed cause server-side, return a generic message
    pub fn internal(cause: impl fmt::Display) -> Self {
        tracing::error!("internal error on auth surface: {}", cause);
        AuthError::Internal(Json(ErrorResponse {
            error: "internal_error".to_string(),
            message: "An unexpected error occurred".to_string(),
            status_code: 500,
        }))
    }

    /// Get the error message from the error variant
    pub fn message(&self) -> String {
        match self {
            AuthError::Validation(json) => json.0.message.clone(),
            AuthError::InvalidCredentials(json) => json.0.message.clone(),
            AuthError::MissingToken(json) => json.0.message.clone(),
            AuthError::TokenInvalid(json) => json.0.message.clone(),
            AuthError::TokenExpired(json) => json.0.message.clone(),
            AuthError::AccountSuspended(json) => json.0.message.clone(),
            AuthError::PermissionDenied(json) => json.0.message.clone(),
            AuthError::RateLimited(json) => json.0.message.clone(),
            AuthError::Internal(json) => json.0.message.clone(),
        }
    }
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl From<InternalError> for AuthError {
    fn from(err: InternalError) -> Self {
        match err {
            InternalError::Account(AccountError::EmailTaken(_)) => {
                AuthError::validation("Email is already registered")
            }
            other => AuthError::internal(other),
        }
    }
}

impl From<GateError> for AuthError {
    fn from(err: GateError) -> Self {
        match err {
            GateError::MissingToken => AuthError::missing_token(),
            GateError::TokenInvalid => AuthError::token_invalid(),
            GateError::TokenExpired => AuthError::token_expired(),
            GateError::Suspended => AuthError::account_suspended(),
            GateError::PermissionDenied(_) | GateError::RoleDenied => {
                AuthError::permission_denied()
            }
            GateError::Internal(inner) => AuthError::internal(inner),
        }
    }
}
