use thiserror::Error;

/// Infrastructure-level database failures
#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("database operation '{operation}' failed: {source}")]
    Operation {
        operation: String,
        #[source]
        source: sea_orm::DbErr,
    },

    #[error("transaction '{operation}' failed: {source}")]
    Transaction {
        operation: String,
        #[source]
        source: sea_orm::DbErr,
    },
}
