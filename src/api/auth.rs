use std::sync::Arc;

use poem::Request;
use poem_openapi::{payload::Json, OpenApi, Tags};

use crate::api::helpers;
use crate::auth::AuthGate;
use crate::config::CookieSettings;
use crate::errors::auth::AuthError;
use crate::services::{AuthService, RateLimiter};
use crate::types::dto::auth::{
    AccountView, ChangePasswordRequest, LoginRequest, LogoutApiResponse, RegisterApiResponse,
    RegisterRequest, SessionApiResponse, SessionResponse, UpdateProfileRequest, VerifyResponse,
};
use crate::types::dto::common::MessageResponse;

/// Authentication and self-service account endpoints
pub struct AuthApi {
    auth_service: Arc<AuthService>,
    gate: Arc<AuthGate>,
    login_limiter: Arc<dyn RateLimiter>,
    cookie: CookieSettings,
}

/// API tags for authentication endpoints
#[derive(Tags)]
enum AuthTags {
    /// Account registration, login and self-service
    Authentication,
}

impl AuthApi {
    pub fn new(
        auth_service: Arc<AuthService>,
        gate: Arc<AuthGate>,
        login_limiter: Arc<dyn RateLimiter>,
        cookie: CookieSettings,
    ) -> Self {
        Self {
            auth_service,
            gate,
            login_limiter,
            cookie,
        }
    }

    fn session_response(&self, token: String, account: AccountView) -> (Json<SessionResponse>, String) {
        let expires_in = self.auth_service.token_ttl_seconds();
        let cookie = helpers::session_cookie(&self.cookie, &token, expires_in);
        (
            Json(SessionResponse {
                token,
                token_type: "Bearer".to_string(),
                expires_in,
                account,
            }),
            cookie,
        )
    }
}

#[OpenApi(prefix_path = "/auth")]
impl AuthApi {
    /// Register a new account, optionally with an organization profile
    #[oai(path = "/register", method = "post", tag = "AuthTags::Authentication")]
    pub async fn register(
        &self,
        body: Json<RegisterRequest>,
    ) -> Result<RegisterApiResponse, AuthError> {
        let (token, account) = self.auth_service.register(body.0).await?;

        let (payload, cookie) = self.session_response(token, account);
        Ok(RegisterApiResponse::Created(payload, cookie))
    }

    /// Login with email and password
    ///
    /// Rate-limited per client address before credentials are examined.
    #[oai(path = "/login", method = "post", tag = "AuthTags::Authentication")]
    pub async fn login(
        &self,
        req: &Request,
        body: Json<LoginRequest>,
    ) -> Result<SessionApiResponse, AuthError> {
        let client = helpers::client_ip(req);
        if !self.login_limiter.allow(&client) {
            tracing::warn!(client = %client, "login throttled");
            return Err(AuthError::rate_limited());
        }

        let (token, account) = self.auth_service.login(body.0).await?;

        let (payload, cookie) = self.session_response(token, account);
        Ok(SessionApiResponse::Ok(payload, cookie))
    }

    /// Resolve the current session to the live account and profile
    #[oai(path = "/verify", method = "get", tag = "AuthTags::Authentication")]
    pub async fn verify(&self, req: &Request) -> Result<Json<VerifyResponse>, AuthError> {
        let resolved = self.gate.require_authenticated(req).await?;

        Ok(Json(VerifyResponse {
            account: AccountView::from_models(resolved.account, resolved.profile),
        }))
    }

    /// Update contact details and, for organization accounts, profile fields
    #[oai(path = "/profile", method = "put", tag = "AuthTags::Authentication")]
    pub async fn update_profile(
        &self,
        req: &Request,
        body: Json<UpdateProfileRequest>,
    ) -> Result<Json<AccountView>, AuthError> {
        let resolved = self.gate.require_authenticated(req).await?;

        let view = self.auth_service.update_profile(&resolved, body.0).await?;
        Ok(Json(view))
    }

    /// Change password after re-verifying the current one
    #[oai(path = "/password", method = "put", tag = "AuthTags::Authentication")]
    pub async fn change_password(
        &self,
        req: &Request,
        body: Json<ChangePasswordRequest>,
    ) -> Result<SessionApiResponse, AuthError> {
        let resolved = self.gate.require_authenticated(req).await?;

        let token = self.auth_service.change_password(&resolved, body.0).await?;

        let account = AccountView::from_models(resolved.account, resolved.profile);
        let (payload, cookie) = self.session_response(token, account);
        Ok(SessionApiResponse::Ok(payload, cookie))
    }

    /// Clear the session cookie. The bearer token itself simply expires.
    #[oai(path = "/logout", method = "post", tag = "AuthTags::Authentication")]
    pub async fn logout(&self) -> LogoutApiResponse {
        LogoutApiResponse::Ok(
            Json(MessageResponse {
                message: "Logged out".to_string(),
            }),
            helpers::clear_session_cookie(&self.cookie),
        )
    }
}
