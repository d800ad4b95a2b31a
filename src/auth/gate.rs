use std::str::FromStr;
use std::sync::Arc;

use poem::Request;
use thiserror::Error;

use crate::auth::permissions::{Action, PermissionTable};
use crate::errors::internal::{AccountError, InternalError};
use crate::services::token_service::{TokenError, TokenService};
use crate::stores::{AccountStore, ProfileStore};
use crate::types::db::{account, profile};
use crate::types::internal::auth::{AccountStatus, Role};
use crate::types::internal::moderation::VerificationStatus;

/// Cookie mirroring the bearer token so browser clients need no local storage
pub const SESSION_COOKIE: &str = "ecohub_token";

/// Gate decision failures, mapped to API error enums at the boundary
#[derive(Debug, Error)]
pub enum GateError {
    #[error("no credential on the request")]
    MissingToken,

    #[error("invalid session token")]
    TokenInvalid,

    #[error("expired session token")]
    TokenExpired,

    #[error("account is suspended")]
    Suspended,

    #[error("permission denied for action '{0}'")]
    PermissionDenied(String),

    #[error("role not permitted")]
    RoleDenied,

    #[error(transparent)]
    Internal(#[from] InternalError),
}

/// An authenticated actor: the live account row plus its profile, if any
///
/// Always freshly read from the store - never reconstructed from token
/// claims - so suspension takes effect on the very next request.
#[derive(Debug)]
pub struct ResolvedAccount {
    pub account: account::Model,
    pub profile: Option<profile::Model>,
    pub role: Role,
}

impl ResolvedAccount {
    pub fn id(&self) -> &str {
        &self.account.id
    }

    /// Whether the attached profile has been approved by an admin.
    /// `None` for accounts without a profile. Feature gating on this is left
    /// to consumers.
    pub fn profile_verified(&self) -> Option<bool> {
        self.profile.as_ref().map(|p| {
            VerificationStatus::from_str(&p.verification_status)
                .map(|s| s == VerificationStatus::Approved)
                .unwrap_or(false)
        })
    }
}

/// Per-request authorization gate
///
/// `resolve` is the only effectful step (token decode plus one account read
/// and, for org roles, one profile read). The require_* checks are pure
/// decisions over the resolved account; rejecting the request is the
/// caller's job.
pub struct AuthGate {
    accounts: Arc<AccountStore>,
    profiles: Arc<ProfileStore>,
    tokens: Arc<TokenService>,
    permissions: Arc<PermissionTable>,
}

impl AuthGate {
    pub fn new(
        accounts: Arc<AccountStore>,
        profiles: Arc<ProfileStore>,
        tokens: Arc<TokenService>,
        permissions: Arc<PermissionTable>,
    ) -> Self {
        Self {
            accounts,
            profiles,
            tokens,
            permissions,
        }
    }

    /// Pull the session token off a request: Authorization header first,
    /// `ecohub_token` cookie as the fallback.
    pub fn extract_token(req: &Request) -> Option<String> {
        if let Some(header) = req.header("Authorization") {
            if let Some(token) = header.strip_prefix("Bearer ") {
                if !token.is_empty() {
                    return Some(token.to_string());
                }
            }
        }

        let cookies = req.header("Cookie")?;
        for pair in cookies.split(';') {
            let mut parts = pair.trim().splitn(2, '=');
            if parts.next() == Some(SESSION_COOKIE) {
                let value = parts.next().unwrap_or_default();
                if !value.is_empty() {
                    return Some(value.to_string());
                }
            }
        }

        None
    }

    /// Resolve a token to the live account row
    ///
    /// Status is re-checked against the current row, not the token claims:
    /// suspending an account invalidates every outstanding token at the cost
    /// of one read per authenticated request.
    pub async fn resolve(&self, token: &str) -> Result<ResolvedAccount, GateError> {
        let claims = self.tokens.validate(token).map_err(|e| match e {
            TokenError::Expired => GateError::TokenExpired,
            _ => GateError::TokenInvalid,
        })?;

        // A token for a deleted account is indistinguishable from a forged one
        let account = self
            .accounts
            .find_by_id(&claims.sub)
            .await?
            .ok_or(GateError::TokenInvalid)?;

        let role = Role::from_str(&account.role).map_err(|source| {
            GateError::Internal(
                AccountError::CorruptRow {
                    account_id: account.id.clone(),
                    source,
                }
                .into(),
            )
        })?;

        match AccountStatus::from_str(&account.status) {
            Ok(AccountStatus::Active) => {}
            Ok(AccountStatus::Suspended) => return Err(GateError::Suspended),
            Err(source) => {
                return Err(GateError::Internal(
                    AccountError::CorruptRow {
                        account_id: account.id.clone(),
                        source,
                    }
                    .into(),
                ))
            }
        }

        let profile = match role {
            Role::Business | Role::Community => {
                self.profiles.find_by_account_id(&account.id).await?
            }
            _ => None,
        };

        Ok(ResolvedAccount {
            account,
            profile,
            role,
        })
    }

    /// Any resolved, non-suspended account
    pub async fn require_authenticated(&self, req: &Request) -> Result<ResolvedAccount, GateError> {
        let token = Self::extract_token(req).ok_or(GateError::MissingToken)?;
        self.resolve(&token).await
    }

    /// Attach the account when a valid, non-suspended token is present;
    /// otherwise proceed unauthenticated. Never fails the request.
    pub async fn optional(&self, req: &Request) -> Option<ResolvedAccount> {
        let token = Self::extract_token(req)?;
        self.resolve(&token).await.ok()
    }

    /// Exact role membership
    pub fn require_role(&self, resolved: &ResolvedAccount, roles: &[Role]) -> Result<(), GateError> {
        if roles.contains(&resolved.role) {
            Ok(())
        } else {
            Err(GateError::RoleDenied)
        }
    }

    /// Role -> capability lookup; admin holds every permission
    pub fn require_permission(
        &self,
        resolved: &ResolvedAccount,
        action: Action,
    ) -> Result<(), GateError> {
        if self.permissions.allows(resolved.role, action) {
            Ok(())
        } else {
            Err(GateError::PermissionDenied(action.as_str().to_string()))
        }
    }
}
