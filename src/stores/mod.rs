// Stores layer - persistence operations over the SeaORM entities
pub mod account_store;
pub mod audit_store;
pub mod profile_store;

pub use account_store::{AccountFilter, AccountStore, NewAccount};
pub use audit_store::AuditStore;
pub use profile_store::{NewProfile, ProfileStore};
