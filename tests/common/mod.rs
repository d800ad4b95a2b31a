use std::sync::Arc;
use std::time::Duration;

use migration::{Migrator, MigratorTrait};
use poem::Request;
use poem_openapi::payload::Json;
use sea_orm::{Database, DatabaseConnection};

use ecohub_backend::api::{AdminApi, AuthApi};
use ecohub_backend::auth::{AuthGate, PermissionTable};
use ecohub_backend::config::CookieSettings;
use ecohub_backend::services::{
    crypto, AdminService, AuthService, RateLimiter, SlidingWindowLimiter, TokenService,
};
use ecohub_backend::stores::{AccountStore, AuditStore, NewAccount, ProfileStore};
use ecohub_backend::types::dto::auth::{LoginRequest, ProfilePayload, RegisterRequest};
use ecohub_backend::types::internal::auth::Role;

pub const TEST_SECRET: &str = "test-secret-key-minimum-32-characters-long";

/// Everything an end-to-end scenario needs, wired the same way main() does it
pub struct TestApp {
    pub auth_api: AuthApi,
    pub admin_api: AdminApi,
    pub accounts: Arc<AccountStore>,
    pub profiles: Arc<ProfileStore>,
    pub audit: Arc<AuditStore>,
    pub tokens: Arc<TokenService>,
    pub db: DatabaseConnection,
}

/// Fresh in-memory database with migrations applied and a permissive login
/// limiter (5 attempts per minute, matching the default shape)
pub async fn spawn_app() -> TestApp {
    spawn_app_with_limiter(Arc::new(SlidingWindowLimiter::new(
        Duration::from_secs(60),
        5,
    )))
    .await
}

pub async fn spawn_app_with_limiter(limiter: Arc<dyn RateLimiter>) -> TestApp {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to create test database");
    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    let accounts = Arc::new(AccountStore::new(db.clone()));
    let profiles = Arc::new(ProfileStore::new(db.clone()));
    let audit = Arc::new(AuditStore::new(db.clone()));
    let tokens = Arc::new(TokenService::new(TEST_SECRET.to_string(), 3600));
    let permissions = Arc::new(PermissionTable::load().expect("permission table must load"));

    let auth_service = Arc::new(AuthService::new(
        accounts.clone(),
        profiles.clone(),
        tokens.clone(),
        8,
    ));
    let admin_service = Arc::new(AdminService::new(
        db.clone(),
        accounts.clone(),
        profiles.clone(),
        audit.clone(),
    ));
    let gate = Arc::new(AuthGate::new(
        accounts.clone(),
        profiles.clone(),
        tokens.clone(),
        permissions,
    ));

    let cookie = CookieSettings {
        secure: false,
        same_site: "Lax".to_string(),
    };

    TestApp {
        auth_api: AuthApi::new(auth_service, gate.clone(), limiter, cookie),
        admin_api: AdminApi::new(admin_service, gate),
        accounts,
        profiles,
        audit,
        tokens,
        db,
    }
}

impl TestApp {
    /// Insert an admin directly (admins cannot self-register) and return
    /// (id, authenticated request factory input token)
    pub async fn seed_admin(&self, email: &str) -> (String, String) {
        let admin = self
            .accounts
            .insert(NewAccount {
                email: email.to_string(),
                name: "Admin".to_string(),
                phone: None,
                password_hash: crypto::hash_password("admin-password").unwrap(),
                role: Role::Admin,
            })
            .await
            .unwrap();
        let token = self.tokens.issue(&admin.id, Role::Admin).unwrap();
        (admin.id, token)
    }
}

pub fn bearer(token: &str) -> Request {
    Request::builder()
        .header("Authorization", format!("Bearer {}", token))
        .finish()
}

pub fn anonymous() -> Request {
    Request::builder().finish()
}

pub fn register_body(email: &str, role: &str) -> Json<RegisterRequest> {
    Json(RegisterRequest {
        name: "Test User".to_string(),
        email: email.to_string(),
        password: "password123".to_string(),
        role: role.to_string(),
        phone: None,
        profile: None,
    })
}

pub fn register_business_body(email: &str, org_name: &str) -> Json<RegisterRequest> {
    Json(RegisterRequest {
        name: "Org Owner".to_string(),
        email: email.to_string(),
        password: "password123".to_string(),
        role: "business".to_string(),
        phone: None,
        profile: Some(ProfilePayload {
            org_name: org_name.to_string(),
            registration_no: Some("556677-8899".to_string()),
            address: None,
            focus_tags: Some(vec!["recycling".to_string()]),
        }),
    })
}

pub fn login_body(email: &str, password: &str) -> Json<LoginRequest> {
    Json(LoginRequest {
        email: email.to_string(),
        password: password.to_string(),
    })
}
