use thiserror::Error;

use crate::types::internal::auth::UnknownVariant;

/// Domain errors raised by the account and profile stores
#[derive(Error, Debug)]
pub enum AccountError {
    #[error("email already registered: {0}")]
    EmailTaken(String),

    #[error("account not found: {0}")]
    NotFound(String),

    #[error("profile not found for account: {0}")]
    ProfileNotFound(String),

    #[error("account {account_id} has a corrupt stored value: {source}")]
    CorruptRow {
        account_id: String,
        #[source]
        source: UnknownVariant,
    },
}
