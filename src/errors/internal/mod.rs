use thiserror::Error;

pub mod account;
pub mod audit;
pub mod database;

pub use account::AccountError;
pub use audit::AuditError;
pub use database::DatabaseError;

/// Internal error type for store and service operations
///
/// Separates infrastructure errors (shared) from domain errors
/// (store-specific). Never exposed via the API - endpoints convert to
/// AuthError or AdminError at the boundary.
#[derive(Error, Debug)]
pub enum InternalError {
    #[error(transparent)]
    Database(#[from] DatabaseError),

    #[error(transparent)]
    Account(#[from] AccountError),

    #[error(transparent)]
    Audit(#[from] AuditError),

    #[error("crypto error: {operation} failed: {message}")]
    Crypto { operation: String, message: String },

    #[error("parse error: failed to parse {value_type}: {message}")]
    Parse { value_type: String, message: String },

    #[error("configuration error: {0}")]
    Config(String),
}

impl InternalError {
    pub fn database(operation: &str, source: sea_orm::DbErr) -> InternalError {
        InternalError::Database(DatabaseError::Operation {
            operation: operation.to_string(),
            source,
        })
    }

    pub fn crypto(operation: &str, message: impl Into<String>) -> InternalError {
        InternalError::Crypto {
            operation: operation.to_string(),
            message: message.into(),
        }
    }

    pub fn parse(value_type: &str, message: impl Into<String>) -> InternalError {
        InternalError::Parse {
            value_type: value_type.to_string(),
            message: message.into(),
        }
    }
}
