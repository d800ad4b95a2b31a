use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::auth::{AuthGate, PermissionTable};
use crate::config::AppSettings;
use crate::errors::InternalError;
use crate::services::{
    crypto, AdminService, AuthService, RateLimiter, SlidingWindowLimiter, TokenService,
};
use crate::stores::{AccountStore, AuditStore, NewAccount, ProfileStore};
use crate::types::internal::auth::Role;

/// Centralized application data following the main-owned stores pattern
///
/// All stores and services are created once here and shared via `Arc` with
/// the API structs, so there is a single instance of each per process.
pub struct AppData {
    pub db: DatabaseConnection,
    pub account_store: Arc<AccountStore>,
    pub profile_store: Arc<ProfileStore>,
    pub audit_store: Arc<AuditStore>,
    pub token_service: Arc<TokenService>,
    pub auth_service: Arc<AuthService>,
    pub admin_service: Arc<AdminService>,
    pub gate: Arc<AuthGate>,
    pub login_limiter: Arc<dyn RateLimiter>,
}

impl AppData {
    /// Wire up stores and services. The database must already be migrated.
    ///
    /// Fails when the permission table does not validate - a typo in an
    /// action name aborts startup instead of denying at request time.
    pub fn init(db: DatabaseConnection, settings: &AppSettings) -> Result<Self, InternalError> {
        tracing::info!("Initializing AppData...");

        let permissions = Arc::new(
            PermissionTable::load().map_err(|e| InternalError::Config(e.to_string()))?,
        );

        let account_store = Arc::new(AccountStore::new(db.clone()));
        let profile_store = Arc::new(ProfileStore::new(db.clone()));
        let audit_store = Arc::new(AuditStore::new(db.clone()));

        let token_service = Arc::new(TokenService::new(
            settings.jwt_secret.clone(),
            settings.session_ttl_seconds,
        ));

        let auth_service = Arc::new(AuthService::new(
            account_store.clone(),
            profile_store.clone(),
            token_service.clone(),
            settings.min_password_len,
        ));

        let admin_service = Arc::new(AdminService::new(
            db.clone(),
            account_store.clone(),
            profile_store.clone(),
            audit_store.clone(),
        ));

        let gate = Arc::new(AuthGate::new(
            account_store.clone(),
            profile_store.clone(),
            token_service.clone(),
            permissions,
        ));

        let login_limiter: Arc<dyn RateLimiter> = Arc::new(SlidingWindowLimiter::new(
            std::time::Duration::from_secs(settings.login_rate_window_seconds),
            settings.login_rate_max_attempts,
        ));

        tracing::info!("AppData initialization complete");

        Ok(Self {
            db,
            account_store,
            profile_store,
            audit_store,
            token_service,
            auth_service,
            admin_service,
            gate,
            login_limiter,
        })
    }

    /// Seed the bootstrap admin account when configured and absent, so
    /// moderation is reachable on a fresh database.
    pub async fn seed_bootstrap_admin(&self, settings: &AppSettings) -> Result<(), InternalError> {
        let Some(bootstrap) = &settings.bootstrap_admin else {
            return Ok(());
        };

        if self
            .account_store
            .find_by_email(&bootstrap.email)
            .await?
            .is_some()
        {
            tracing::debug!("bootstrap admin already exists, skipping seed");
            return Ok(());
        }

        let password_hash = crypto::hash_password(&bootstrap.password)?;
        let admin = self
            .account_store
            .insert(NewAccount {
                email: bootstrap.email.clone(),
                name: "EcoHub Admin".to_string(),
                phone: None,
                password_hash,
                role: Role::Admin,
            })
            .await?;

        tracing::info!(account_id = %admin.id, "bootstrap admin seeded");

        Ok(())
    }
}
