use poem_openapi::{payload::Json, ApiResponse};
use std::fmt;

use crate::auth::gate::GateError;
use crate::errors::internal::{AccountError, InternalError};
use crate::types::dto::common::ErrorResponse;
use crate::types::internal::moderation::VerificationStatus;

/// Error responses for the /admin moderation surface
#[derive(ApiResponse, Debug)]
pub enum AdminError {
    /// Malformed input (unknown role, bad decision, invalid transition)
    #[oai(status = 400)]
    Validation(Json<ErrorResponse>),

    /// Missing, invalid or expired credential
    #[oai(status = 401)]
    Unauthorized(Json<ErrorResponse>),

    /// Authenticated but not allowed (non-admin, suspended, self-moderation)
    #[oai(status = 403)]
    Forbidden(Json<ErrorResponse>),

    /// Target account or profile does not exist
    #[oai(status = 404)]
    NotFound(Json<ErrorResponse>),

    /// Unexpected failure; detail stays in server logs
    #[oai(status = 500)]
    Internal(Json<ErrorResponse>),
}

impl AdminError {
    pub fn validation(message: impl Into<String>) -> Self {
        AdminError::Validation(Json(ErrorResponse {
            error: "validation_error".to_string(),
            message: message.into(),
            status_code: 400,
        }))
    }

    pub fn unauthorized() -> Self {
        AdminError::Unauthorized(Json(ErrorResponse {
            error: "unauthorized".to_string(),
            message: "Authentication required".to_string(),
            status_code: 401,
        }))
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        AdminError::Forbidden(Json(ErrorResponse {
            error: "forbidden".to_string(),
            message: message.into(),
            status_code: 403,
        }))
    }

    pub fn self_moderation_denied() -> Self {
        Self::forbidden("Admins cannot moderate their own account")
    }

    pub fn not_found(kind: &str, id: &str) -> Self {
        AdminError::NotFound(Json(ErrorResponse {
            error: "not_found".to_string(),
            message: format!("No {} with id {}", kind, id),
            status_code: 404,
        }))
    }

    pub fn invalid_transition(from: VerificationStatus) -> Self {
        Self::validation(format!(
            "Profile verification is already finalized as '{}'",
            from
        ))
    }

    /// Log the detailed cause server-side, return a generic message
    pub fn internal(cause: impl fmt::Display) -> Self {
        tracing::error!("internal error on admin surface: {}", cause);
        AdminError::Internal(Json(ErrorResponse {
            error: "internal_error".to_string(),
            message: "An unexpected error occurred".to_string(),
            status_code: 500,
        }))
    }

    /// Get the error message from the error variant
    pub fn message(&self) -> String {
        match self {
            AdminError::Validation(json) => json.0.message.clone(),
            AdminError::Unauthorized(json) => json.0.message.clone(),
            AdminError::Forbidden(json) => json.0.message.clone(),
            AdminError::NotFound(json) => json.0.message.clone(),
            AdminError::Internal(json) => json.0.message.clone(),
        }
    }
}

impl fmt::Display for AdminError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl From<InternalError> for AdminError {
    fn from(err: InternalError) -> Self {
        match err {
            InternalError::Account(AccountError::NotFound(id)) => {
                AdminError::not_found("account", &id)
            }
            InternalError::Account(AccountError::ProfileNotFound(id)) => {
                AdminError::not_found("profile", &id)
            }
            other => AdminError::internal(other),
        }
    }
}

impl From<GateError> for AdminError {
    fn from(err: GateError) -> Self {
        match err {
            GateError::MissingToken | GateError::TokenInvalid | GateError::TokenExpired => {
                AdminError::unauthorized()
            }
            GateError::Suspended => AdminError::forbidden("This account has been suspended"),
            GateError::PermissionDenied(_) | GateError::RoleDenied => {
                AdminError::forbidden("Admin access required")
            }
            GateError::Internal(inner) => AdminError::internal(inner),
        }
    }
}
