use std::str::FromStr;
use std::sync::Arc;

use crate::auth::gate::ResolvedAccount;
use crate::errors::auth::AuthError;
use crate::services::{crypto, TokenService};
use crate::stores::{AccountStore, NewAccount, NewProfile, ProfileStore};
use crate::types::dto::auth::{
    AccountView, ChangePasswordRequest, LoginRequest, RegisterRequest, UpdateProfileRequest,
};
use crate::types::internal::auth::{AccountStatus, Role};
use crate::types::internal::moderation::ProfileKind;

/// Orchestrates registration, login and self-service account updates
///
/// Coordinates AccountStore, ProfileStore and TokenService; the API layer
/// adds the transport concerns (cookies, rate limiting) on top.
pub struct AuthService {
    accounts: Arc<AccountStore>,
    profiles: Arc<ProfileStore>,
    tokens: Arc<TokenService>,
    min_password_len: usize,
}

impl AuthService {
    pub fn new(
        accounts: Arc<AccountStore>,
        profiles: Arc<ProfileStore>,
        tokens: Arc<TokenService>,
        min_password_len: usize,
    ) -> Self {
        Self {
            accounts,
            profiles,
            tokens,
            min_password_len,
        }
    }

    pub fn token_ttl_seconds(&self) -> i64 {
        self.tokens.ttl_seconds()
    }

    fn validate_password(&self, password: &str) -> Result<(), AuthError> {
        if password.len() < self.min_password_len {
            return Err(AuthError::validation(format!(
                "Password must be at least {} characters",
                self.min_password_len
            )));
        }
        Ok(())
    }

    /// Create an account and, for organization roles with a payload, its
    /// pending profile. Returns a signed token plus the client view.
    pub async fn register(
        &self,
        req: RegisterRequest,
    ) -> Result<(String, AccountView), AuthError> {
        let name = req.name.trim();
        let email = req.email.trim().to_lowercase();

        if name.is_empty() {
            return Err(AuthError::validation("Name is required"));
        }
        if email.is_empty() || !email.contains('@') {
            return Err(AuthError::validation("A valid email address is required"));
        }
        self.validate_password(&req.password)?;

        let role = Role::from_str(&req.role)
            .map_err(|_| AuthError::validation(format!("Unknown role '{}'", req.role)))?;
        if !role.registrable() {
            return Err(AuthError::validation("This role cannot be self-registered"));
        }

        let password_hash = crypto::hash_password(&req.password)?;

        let account = self
            .accounts
            .insert(NewAccount {
                email,
                name: name.to_string(),
                phone: req.phone,
                password_hash,
                role,
            })
            .await?;

        // A profile payload only means something for organization roles
        let profile_kind = match role {
            Role::Business => Some(ProfileKind::Business),
            Role::Community => Some(ProfileKind::Community),
            _ => None,
        };
        let profile = match (profile_kind, req.profile) {
            (Some(kind), Some(payload)) => {
                if payload.org_name.trim().is_empty() {
                    return Err(AuthError::validation("Organization name is required"));
                }
                Some(
                    self.profiles
                        .insert(NewProfile {
                            account_id: account.id.clone(),
                            kind,
                            org_name: payload.org_name,
                            registration_no: payload.registration_no,
                            address: payload.address,
                            focus_tags: payload.focus_tags,
                        })
                        .await?,
                )
            }
            _ => None,
        };

        let token = self
            .tokens
            .issue(&account.id, role)
            .map_err(AuthError::internal)?;

        tracing::info!(account_id = %account.id, role = %role, "account registered");

        Ok((token, AccountView::from_models(account, profile)))
    }

    /// Verify credentials and issue a fresh token
    ///
    /// Suspension beats a correct password: the caller gets 403, never a
    /// token.
    pub async fn login(&self, req: LoginRequest) -> Result<(String, AccountView), AuthError> {
        let email = req.email.trim().to_lowercase();

        let account = self
            .accounts
            .find_by_email(&email)
            .await?
            .ok_or_else(AuthError::invalid_credentials)?;

        if !crypto::verify_password(&req.password, &account.password_hash)? {
            tracing::debug!(account_id = %account.id, "login failed: password mismatch");
            return Err(AuthError::invalid_credentials());
        }

        match AccountStatus::from_str(&account.status) {
            Ok(AccountStatus::Active) => {}
            Ok(AccountStatus::Suspended) => return Err(AuthError::account_suspended()),
            Err(e) => return Err(AuthError::internal(e)),
        }

        let role = Role::from_str(&account.role).map_err(AuthError::internal)?;

        self.accounts.touch_last_login(&account.id).await?;

        let profile = match role {
            Role::Business | Role::Community => {
                self.profiles.find_by_account_id(&account.id).await?
            }
            _ => None,
        };

        let token = self
            .tokens
            .issue(&account.id, role)
            .map_err(AuthError::internal)?;

        tracing::info!(account_id = %account.id, "login succeeded");

        // Reload so the view carries the login timestamp just written
        let account = self.accounts.get(&account.id).await?;

        Ok((token, AccountView::from_models(account, profile)))
    }

    /// Update the allow-listed contact and organization fields
    pub async fn update_profile(
        &self,
        resolved: &ResolvedAccount,
        req: UpdateProfileRequest,
    ) -> Result<AccountView, AuthError> {
        let touches_org = req.org_name.is_some()
            || req.registration_no.is_some()
            || req.address.is_some()
            || req.focus_tags.is_some();

        if touches_org && resolved.profile.is_none() {
            return Err(AuthError::validation(
                "This account has no organization profile to update",
            ));
        }
        if let Some(name) = &req.name {
            if name.trim().is_empty() {
                return Err(AuthError::validation("Name cannot be blank"));
            }
        }

        let account = self
            .accounts
            .update_contact(resolved.id(), req.name, req.phone, req.avatar_url)
            .await?;

        let profile = if touches_org {
            Some(
                self.profiles
                    .update_org_fields(
                        resolved.id(),
                        req.org_name,
                        req.registration_no,
                        req.address,
                        req.focus_tags,
                    )
                    .await?,
            )
        } else {
            self.profiles.find_by_account_id(resolved.id()).await?
        };

        Ok(AccountView::from_models(account, profile))
    }

    /// Swap the password after re-verifying the current one; returns a fresh
    /// token
    pub async fn change_password(
        &self,
        resolved: &ResolvedAccount,
        req: ChangePasswordRequest,
    ) -> Result<String, AuthError> {
        if !crypto::verify_password(&req.current_password, &resolved.account.password_hash)? {
            return Err(AuthError::invalid_credentials());
        }
        self.validate_password(&req.new_password)?;

        let password_hash = crypto::hash_password(&req.new_password)?;
        self.accounts
            .update_password_hash(resolved.id(), password_hash)
            .await?;

        tracing::info!(account_id = %resolved.id(), "password changed");

        self.tokens
            .issue(resolved.id(), resolved.role)
            .map_err(AuthError::internal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use migration::{Migrator, MigratorTrait};
    use sea_orm::Database;

    use crate::types::dto::auth::ProfilePayload;

    async fn setup_service() -> (AuthService, sea_orm::DatabaseConnection) {
        let db = Database::connect("sqlite::memory:")
            .await
            .expect("Failed to create test database");
        Migrator::up(&db, None)
            .await
            .expect("Failed to run migrations");

        let accounts = Arc::new(AccountStore::new(db.clone()));
        let profiles = Arc::new(ProfileStore::new(db.clone()));
        let tokens = Arc::new(TokenService::new(
            "test-secret-key-minimum-32-characters-long".to_string(),
            3600,
        ));

        (AuthService::new(accounts, profiles, tokens, 8), db)
    }

    fn register_request(email: &str, role: &str) -> RegisterRequest {
        RegisterRequest {
            name: "Test User".to_string(),
            email: email.to_string(),
            password: "password123".to_string(),
            role: role.to_string(),
            phone: None,
            profile: None,
        }
    }

    #[tokio::test]
    async fn test_register_returns_token_and_view_without_hash() {
        let (service, _db) = setup_service().await;

        let (token, view) = service
            .register(register_request("user@example.org", "individual"))
            .await
            .unwrap();

        assert!(!token.is_empty());
        assert_eq!(view.email, "user@example.org");
        assert_eq!(view.role, "individual");
        assert_eq!(view.status, "active");

        // The serialized view must never leak the credential
        let serialized = serde_json::to_string(&view).unwrap();
        assert!(!serialized.contains("password"));
        assert!(!serialized.contains("argon2"));
    }

    #[tokio::test]
    async fn test_register_rejects_short_password() {
        let (service, _db) = setup_service().await;

        let mut req = register_request("short@example.org", "individual");
        req.password = "short".to_string();

        assert!(matches!(
            service.register(req).await,
            Err(AuthError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_register_rejects_unknown_role_and_admin() {
        let (service, _db) = setup_service().await;

        assert!(matches!(
            service
                .register(register_request("x@example.org", "wizard"))
                .await,
            Err(AuthError::Validation(_))
        ));
        assert!(matches!(
            service
                .register(register_request("y@example.org", "admin"))
                .await,
            Err(AuthError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_register_duplicate_email_is_validation_error() {
        let (service, _db) = setup_service().await;
        service
            .register(register_request("dup@example.org", "individual"))
            .await
            .unwrap();

        let result = service
            .register(register_request("dup@example.org", "business"))
            .await;

        assert!(matches!(result, Err(AuthError::Validation(_))));
    }

    #[tokio::test]
    async fn test_register_business_with_payload_creates_pending_profile() {
        let (service, _db) = setup_service().await;

        let mut req = register_request("acme@example.org", "business");
        req.profile = Some(ProfilePayload {
            org_name: "Acme".to_string(),
            registration_no: None,
            address: None,
            focus_tags: None,
        });

        let (_, view) = service.register(req).await.unwrap();

        let profile = view.profile.expect("profile should be embedded");
        assert_eq!(profile.verification_status, "pending");
        assert_eq!(profile.kind, "business");
    }

    #[tokio::test]
    async fn test_register_individual_ignores_profile_payload() {
        let (service, _db) = setup_service().await;

        let mut req = register_request("solo@example.org", "individual");
        req.profile = Some(ProfilePayload {
            org_name: "Not An Org".to_string(),
            registration_no: None,
            address: None,
            focus_tags: None,
        });

        let (_, view) = service.register(req).await.unwrap();

        assert!(view.profile.is_none());
    }

    #[tokio::test]
    async fn test_login_with_wrong_password_fails() {
        let (service, _db) = setup_service().await;
        service
            .register(register_request("login@example.org", "individual"))
            .await
            .unwrap();

        let result = service
            .login(LoginRequest {
                email: "login@example.org".to_string(),
                password: "wrong-password".to_string(),
            })
            .await;

        assert!(matches!(result, Err(AuthError::InvalidCredentials(_))));
    }

    #[tokio::test]
    async fn test_login_touches_last_login() {
        let (service, _db) = setup_service().await;
        let (_, registered) = service
            .register(register_request("seen@example.org", "individual"))
            .await
            .unwrap();
        assert!(registered.last_login_at.is_none());

        let (_, view) = service
            .login(LoginRequest {
                email: "seen@example.org".to_string(),
                password: "password123".to_string(),
            })
            .await
            .unwrap();

        assert!(view.last_login_at.is_some());
    }

    #[tokio::test]
    async fn test_login_normalizes_email_case() {
        let (service, _db) = setup_service().await;
        service
            .register(register_request("case@example.org", "individual"))
            .await
            .unwrap();

        let result = service
            .login(LoginRequest {
                email: "Case@Example.org".to_string(),
                password: "password123".to_string(),
            })
            .await;

        assert!(result.is_ok());
    }
}
