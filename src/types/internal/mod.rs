// Internal types shared across service and store layers
pub mod auth;
pub mod moderation;
