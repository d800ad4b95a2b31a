pub mod admin;
pub mod auth;
pub mod internal;

pub use internal::InternalError;
