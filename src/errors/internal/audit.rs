use thiserror::Error;

/// Errors raised while writing or reading the admin action log
#[derive(Error, Debug)]
pub enum AuditError {
    #[error("failed to serialize action state snapshot: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("failed to write admin action entry: {0}")]
    Write(#[source] sea_orm::DbErr),
}
