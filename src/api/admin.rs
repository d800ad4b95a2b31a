use std::str::FromStr;
use std::sync::Arc;

use poem::Request;
use poem_openapi::{
    param::{Path, Query},
    payload::Json,
    OpenApi, Tags,
};

use crate::auth::{AuthGate, ResolvedAccount};
use crate::errors::admin::AdminError;
use crate::services::AdminService;
use crate::stores::AccountFilter;
use crate::types::dto::admin::{
    AccountListResponse, AdminActionListResponse, ChangeRoleRequest, ProfileListResponse,
    SuspendRequest, VerifyProfileRequest,
};
use crate::types::dto::common::MessageResponse;
use crate::types::internal::auth::{AccountStatus, Role};
use crate::types::internal::moderation::VerificationStatus;

/// Moderation endpoints: account lifecycle, role changes, verification queue
pub struct AdminApi {
    admin_service: Arc<AdminService>,
    gate: Arc<AuthGate>,
}

/// API tags for admin endpoints
#[derive(Tags)]
enum AdminTags {
    /// Account moderation and profile verification
    Admin,
}

impl AdminApi {
    pub fn new(admin_service: Arc<AdminService>, gate: Arc<AuthGate>) -> Self {
        Self {
            admin_service,
            gate,
        }
    }

    /// Resolve the caller and require the admin role
    async fn require_admin(&self, req: &Request) -> Result<ResolvedAccount, AdminError> {
        let resolved = self.gate.require_authenticated(req).await?;
        self.gate.require_role(&resolved, &[Role::Admin])?;
        Ok(resolved)
    }
}

#[OpenApi(prefix_path = "/admin")]
impl AdminApi {
    /// List and search accounts
    ///
    /// `q` is a substring match against email or name; role and status
    /// narrow further.
    #[oai(path = "/accounts", method = "get", tag = "AdminTags::Admin")]
    pub async fn list_accounts(
        &self,
        req: &Request,
        q: Query<Option<String>>,
        role: Query<Option<String>>,
        status: Query<Option<String>>,
        page: Query<Option<u64>>,
        per_page: Query<Option<u64>>,
    ) -> Result<Json<AccountListResponse>, AdminError> {
        self.require_admin(req).await?;

        let role = match role.0 {
            Some(raw) => Some(
                Role::from_str(&raw)
                    .map_err(|_| AdminError::validation(format!("Unknown role '{}'", raw)))?,
            ),
            None => None,
        };
        let status = match status.0 {
            Some(raw) => Some(
                AccountStatus::from_str(&raw)
                    .map_err(|_| AdminError::validation(format!("Unknown status '{}'", raw)))?,
            ),
            None => None,
        };

        let filter = AccountFilter {
            query: q.0,
            role,
            status,
        };

        let listing = self
            .admin_service
            .list_accounts(filter, page.0.unwrap_or(0), per_page.0.unwrap_or(25))
            .await?;
        Ok(Json(listing))
    }

    /// Suspend an account
    #[oai(path = "/accounts/:id/suspend", method = "post", tag = "AdminTags::Admin")]
    pub async fn suspend(
        &self,
        req: &Request,
        id: Path<String>,
        body: Json<SuspendRequest>,
    ) -> Result<Json<MessageResponse>, AdminError> {
        let actor = self.require_admin(req).await?;

        self.admin_service
            .suspend(actor.id(), &id.0, body.0.reason)
            .await?;

        Ok(Json(MessageResponse {
            message: "Account suspended".to_string(),
        }))
    }

    /// Re-activate a suspended account
    #[oai(path = "/accounts/:id/activate", method = "post", tag = "AdminTags::Admin")]
    pub async fn activate(
        &self,
        req: &Request,
        id: Path<String>,
    ) -> Result<Json<MessageResponse>, AdminError> {
        let actor = self.require_admin(req).await?;

        self.admin_service.activate(actor.id(), &id.0).await?;

        Ok(Json(MessageResponse {
            message: "Account activated".to_string(),
        }))
    }

    /// Change an account's role
    #[oai(path = "/accounts/:id/role", method = "post", tag = "AdminTags::Admin")]
    pub async fn change_role(
        &self,
        req: &Request,
        id: Path<String>,
        body: Json<ChangeRoleRequest>,
    ) -> Result<Json<MessageResponse>, AdminError> {
        let actor = self.require_admin(req).await?;

        let role = Role::from_str(&body.0.role)
            .map_err(|_| AdminError::validation(format!("Unknown role '{}'", body.0.role)))?;

        self.admin_service
            .change_role(actor.id(), &id.0, role)
            .await?;

        Ok(Json(MessageResponse {
            message: "Role updated".to_string(),
        }))
    }

    /// The pending profile verification queue
    #[oai(path = "/profiles/pending", method = "get", tag = "AdminTags::Admin")]
    pub async fn pending_profiles(
        &self,
        req: &Request,
        page: Query<Option<u64>>,
        per_page: Query<Option<u64>>,
    ) -> Result<Json<ProfileListResponse>, AdminError> {
        self.require_admin(req).await?;

        let queue = self
            .admin_service
            .pending_profiles(page.0.unwrap_or(0), per_page.0.unwrap_or(25))
            .await?;
        Ok(Json(queue))
    }

    /// Approve or reject a pending profile
    #[oai(path = "/profiles/:id/verify", method = "post", tag = "AdminTags::Admin")]
    pub async fn verify_profile(
        &self,
        req: &Request,
        id: Path<String>,
        body: Json<VerifyProfileRequest>,
    ) -> Result<Json<MessageResponse>, AdminError> {
        let actor = self.require_admin(req).await?;

        let decision = VerificationStatus::from_str(&body.0.decision).map_err(|_| {
            AdminError::validation(format!("Unknown decision '{}'", body.0.decision))
        })?;

        self.admin_service
            .verify_profile(actor.id(), &id.0, decision, body.0.notes)
            .await?;

        Ok(Json(MessageResponse {
            message: "Verification recorded".to_string(),
        }))
    }

    /// Read the admin action trail
    #[oai(path = "/actions", method = "get", tag = "AdminTags::Admin")]
    pub async fn list_actions(
        &self,
        req: &Request,
        target_id: Query<Option<String>>,
        page: Query<Option<u64>>,
        per_page: Query<Option<u64>>,
    ) -> Result<Json<AdminActionListResponse>, AdminError> {
        self.require_admin(req).await?;

        let trail = self
            .admin_service
            .list_actions(target_id.0, page.0.unwrap_or(0), per_page.0.unwrap_or(25))
            .await?;
        Ok(Json(trail))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use migration::{Migrator, MigratorTrait};
    use sea_orm::Database;

    use crate::auth::PermissionTable;
    use crate::services::{crypto, TokenService};
    use crate::stores::{AccountStore, AuditStore, NewAccount, NewProfile, ProfileStore};
    use crate::types::internal::moderation::ProfileKind;

    struct Fixture {
        api: AdminApi,
        accounts: Arc<AccountStore>,
        profiles: Arc<ProfileStore>,
        tokens: Arc<TokenService>,
    }

    async fn setup() -> Fixture {
        let db = Database::connect("sqlite::memory:")
            .await
            .expect("Failed to create test database");
        Migrator::up(&db, None)
            .await
            .expect("Failed to run migrations");

        let accounts = Arc::new(AccountStore::new(db.clone()));
        let profiles = Arc::new(ProfileStore::new(db.clone()));
        let audit = Arc::new(AuditStore::new(db.clone()));
        let tokens = Arc::new(TokenService::new(
            "test-secret-key-minimum-32-characters-long".to_string(),
            3600,
        ));
        let permissions = Arc::new(PermissionTable::load().unwrap());

        let admin_service = Arc::new(AdminService::new(
            db,
            accounts.clone(),
            profiles.clone(),
            audit,
        ));
        let gate = Arc::new(AuthGate::new(
            accounts.clone(),
            profiles.clone(),
            tokens.clone(),
            permissions,
        ));

        Fixture {
            api: AdminApi::new(admin_service, gate),
            accounts,
            profiles,
            tokens,
        }
    }

    async fn seed(fixture: &Fixture, email: &str, role: Role) -> String {
        fixture
            .accounts
            .insert(NewAccount {
                email: email.to_string(),
                name: "Someone".to_string(),
                phone: None,
                password_hash: crypto::hash_password("password123").unwrap(),
                role,
            })
            .await
            .unwrap()
            .id
    }

    fn as_account(fixture: &Fixture, id: &str, role: Role) -> Request {
        let token = fixture.tokens.issue(id, role).unwrap();
        Request::builder()
            .header("Authorization", format!("Bearer {}", token))
            .finish()
    }

    #[tokio::test]
    async fn test_non_admin_caller_is_forbidden() {
        let fixture = setup().await;
        let user = seed(&fixture, "user@example.org", Role::Individual).await;
        let target = seed(&fixture, "target@example.org", Role::Individual).await;

        let result = fixture
            .api
            .suspend(
                &as_account(&fixture, &user, Role::Individual),
                Path(target),
                Json(SuspendRequest { reason: None }),
            )
            .await;

        assert!(matches!(result, Err(AdminError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_missing_credential_is_unauthorized() {
        let fixture = setup().await;

        let result = fixture
            .api
            .activate(&Request::builder().finish(), Path("whoever".to_string()))
            .await;

        assert!(matches!(result, Err(AdminError::Unauthorized(_))));
    }

    #[tokio::test]
    async fn test_suspend_then_activate_round_trip() {
        let fixture = setup().await;
        let admin = seed(&fixture, "admin@example.org", Role::Admin).await;
        let target = seed(&fixture, "target@example.org", Role::Individual).await;
        let admin_req = || as_account(&fixture, &admin, Role::Admin);

        fixture
            .api
            .suspend(
                &admin_req(),
                Path(target.clone()),
                Json(SuspendRequest {
                    reason: Some("tos violation".to_string()),
                }),
            )
            .await
            .unwrap();
        assert_eq!(
            fixture.accounts.get(&target).await.unwrap().status,
            "suspended"
        );

        fixture
            .api
            .activate(&admin_req(), Path(target.clone()))
            .await
            .unwrap();
        assert_eq!(fixture.accounts.get(&target).await.unwrap().status, "active");

        // Two moderation operations leave exactly two trail entries
        let trail = fixture
            .api
            .list_actions(
                &admin_req(),
                Query(Some(target.clone())),
                Query(None),
                Query(None),
            )
            .await
            .unwrap();
        assert_eq!(trail.0.total, 2);
    }

    #[tokio::test]
    async fn test_suspend_unknown_account_is_404() {
        let fixture = setup().await;
        let admin = seed(&fixture, "admin@example.org", Role::Admin).await;

        let result = fixture
            .api
            .suspend(
                &as_account(&fixture, &admin, Role::Admin),
                Path("ghost".to_string()),
                Json(SuspendRequest { reason: None }),
            )
            .await;

        assert!(matches!(result, Err(AdminError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_change_role_validates_the_role_name() {
        let fixture = setup().await;
        let admin = seed(&fixture, "admin@example.org", Role::Admin).await;
        let target = seed(&fixture, "target@example.org", Role::Individual).await;

        let result = fixture
            .api
            .change_role(
                &as_account(&fixture, &admin, Role::Admin),
                Path(target),
                Json(ChangeRoleRequest {
                    role: "superuser".to_string(),
                }),
            )
            .await;

        assert!(matches!(result, Err(AdminError::Validation(_))));
    }

    #[tokio::test]
    async fn test_verification_queue_and_decision_flow() {
        let fixture = setup().await;
        let admin = seed(&fixture, "admin@example.org", Role::Admin).await;
        let business = seed(&fixture, "acme@example.org", Role::Business).await;
        fixture
            .profiles
            .insert(NewProfile {
                account_id: business.clone(),
                kind: ProfileKind::Business,
                org_name: "Acme".to_string(),
                registration_no: None,
                address: None,
                focus_tags: None,
            })
            .await
            .unwrap();
        let admin_req = || as_account(&fixture, &admin, Role::Admin);

        let queue = fixture
            .api
            .pending_profiles(&admin_req(), Query(None), Query(None))
            .await
            .unwrap();
        assert_eq!(queue.0.total, 1);

        fixture
            .api
            .verify_profile(
                &admin_req(),
                Path(business.clone()),
                Json(VerifyProfileRequest {
                    decision: "approved".to_string(),
                    notes: None,
                }),
            )
            .await
            .unwrap();

        let queue = fixture
            .api
            .pending_profiles(&admin_req(), Query(None), Query(None))
            .await
            .unwrap();
        assert_eq!(queue.0.total, 0);

        let profile = fixture.profiles.get(&business).await.unwrap();
        assert_eq!(profile.verification_status, "approved");
        assert_eq!(profile.verified_by.as_deref(), Some(admin.as_str()));
    }

    #[tokio::test]
    async fn test_suspended_admin_loses_access_immediately() {
        let fixture = setup().await;
        let admin_a = seed(&fixture, "a@example.org", Role::Admin).await;
        let admin_b = seed(&fixture, "b@example.org", Role::Admin).await;

        // B suspends A; A's outstanding token stops working at the gate
        fixture
            .api
            .suspend(
                &as_account(&fixture, &admin_b, Role::Admin),
                Path(admin_a.clone()),
                Json(SuspendRequest { reason: None }),
            )
            .await
            .unwrap();

        let result = fixture
            .api
            .list_accounts(
                &as_account(&fixture, &admin_a, Role::Admin),
                Query(None),
                Query(None),
                Query(None),
                Query(None),
                Query(None),
            )
            .await;

        assert!(matches!(result, Err(AdminError::Forbidden(_))));
    }
}
