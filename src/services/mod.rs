// Services layer - orchestration between stores, tokens and the API surface
pub mod admin_service;
pub mod auth_service;
pub mod crypto;
pub mod rate_limiter;
pub mod token_service;

pub use admin_service::AdminService;
pub use auth_service::AuthService;
pub use rate_limiter::{NoopLimiter, RateLimiter, SlidingWindowLimiter};
pub use token_service::TokenService;
