// Database entities - SeaORM models
pub mod account;
pub mod admin_action;
pub mod profile;
