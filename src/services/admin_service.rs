use std::str::FromStr;
use std::sync::Arc;

use sea_orm::{DatabaseConnection, DatabaseTransaction, TransactionTrait};
use serde_json::json;

use crate::errors::admin::AdminError;
use crate::errors::internal::DatabaseError;
use crate::stores::{AccountFilter, AccountStore, AuditStore, ProfileStore};
use crate::types::dto::admin::{
    AccountListResponse, AdminActionListResponse, AdminActionView, ProfileListResponse,
};
use crate::types::dto::auth::{AccountView, ProfileView};
use crate::types::internal::auth::{AccountStatus, Role};
use crate::types::internal::moderation::{
    ActionKind, AdminActionEntry, TargetKind, VerificationStatus,
};

/// Moderation workflows: account lifecycle, role changes and profile
/// verification
///
/// Every state change commits in one transaction together with exactly one
/// admin action log entry; a failed log write rolls the change back. Admin
/// authorization is the gate's job at the API boundary - this service only
/// adds the self-moderation guard.
pub struct AdminService {
    db: DatabaseConnection,
    accounts: Arc<AccountStore>,
    profiles: Arc<ProfileStore>,
    audit: Arc<AuditStore>,
}

impl AdminService {
    pub fn new(
        db: DatabaseConnection,
        accounts: Arc<AccountStore>,
        profiles: Arc<ProfileStore>,
        audit: Arc<AuditStore>,
    ) -> Self {
        Self {
            db,
            accounts,
            profiles,
            audit,
        }
    }

    async fn begin(&self, operation: &'static str) -> Result<DatabaseTransaction, AdminError> {
        self.db.begin().await.map_err(|source| {
            AdminError::internal(DatabaseError::Transaction {
                operation: operation.to_string(),
                source,
            })
        })
    }

    async fn commit(
        &self,
        txn: DatabaseTransaction,
        operation: &'static str,
    ) -> Result<(), AdminError> {
        txn.commit().await.map_err(|source| {
            AdminError::internal(DatabaseError::Transaction {
                operation: operation.to_string(),
                source,
            })
        })
    }

    /// Suspend an account. Effective on the target's next authorization
    /// check - no token bookkeeping needed since the gate re-reads the row.
    pub async fn suspend(
        &self,
        actor_id: &str,
        target_id: &str,
        reason: Option<String>,
    ) -> Result<(), AdminError> {
        let account = self.accounts.get(target_id).await?;

        if actor_id == target_id {
            return Err(AdminError::self_moderation_denied());
        }
        if account.status == AccountStatus::Suspended.as_str() {
            return Err(AdminError::validation("Account is already suspended"));
        }

        let txn = self.begin("suspend").await?;

        self.accounts
            .set_status(&txn, target_id, AccountStatus::Suspended)
            .await?;

        let entry = AdminActionEntry::new(actor_id, ActionKind::Suspend, TargetKind::Account, target_id)
            .with_reason(reason)
            .with_states(
                json!({"status": account.status}),
                json!({"status": AccountStatus::Suspended.as_str()}),
            );
        self.audit.append(&txn, entry).await?;

        self.commit(txn, "suspend").await?;

        tracing::info!(target_id, actor_id, "account suspended");

        Ok(())
    }

    /// Inverse of `suspend`
    pub async fn activate(&self, actor_id: &str, target_id: &str) -> Result<(), AdminError> {
        let account = self.accounts.get(target_id).await?;

        if actor_id == target_id {
            return Err(AdminError::self_moderation_denied());
        }
        if account.status == AccountStatus::Active.as_str() {
            return Err(AdminError::validation("Account is already active"));
        }

        let txn = self.begin("activate").await?;

        self.accounts
            .set_status(&txn, target_id, AccountStatus::Active)
            .await?;

        let entry = AdminActionEntry::new(actor_id, ActionKind::Activate, TargetKind::Account, target_id)
            .with_states(
                json!({"status": account.status}),
                json!({"status": AccountStatus::Active.as_str()}),
            );
        self.audit.append(&txn, entry).await?;

        self.commit(txn, "activate").await?;

        tracing::info!(target_id, actor_id, "account activated");

        Ok(())
    }

    /// Overwrite the role. Pure metadata change: the profile row, if any, is
    /// deliberately left alone.
    pub async fn change_role(
        &self,
        actor_id: &str,
        target_id: &str,
        new_role: Role,
    ) -> Result<(), AdminError> {
        let account = self.accounts.get(target_id).await?;

        if actor_id == target_id {
            return Err(AdminError::self_moderation_denied());
        }
        if account.role == new_role.as_str() {
            return Err(AdminError::validation(format!(
                "Account already has role '{}'",
                new_role
            )));
        }

        let txn = self.begin("change_role").await?;

        self.accounts.set_role(&txn, target_id, new_role).await?;

        let entry = AdminActionEntry::new(actor_id, ActionKind::RoleChange, TargetKind::Account, target_id)
            .with_states(
                json!({"role": account.role}),
                json!({"role": new_role.as_str()}),
            );
        self.audit.append(&txn, entry).await?;

        self.commit(txn, "change_role").await?;

        tracing::info!(target_id, actor_id, role = %new_role, "account role changed");

        Ok(())
    }

    /// Decide a pending profile verification
    ///
    /// `pending -> {approved, rejected}`; both outcomes are terminal, so a
    /// second decision on the same profile is rejected.
    pub async fn verify_profile(
        &self,
        actor_id: &str,
        profile_account_id: &str,
        decision: VerificationStatus,
        notes: Option<String>,
    ) -> Result<(), AdminError> {
        if !decision.is_terminal() {
            return Err(AdminError::validation(
                "Decision must be 'approved' or 'rejected'",
            ));
        }

        let profile = self.profiles.get(profile_account_id).await?;

        let current = VerificationStatus::from_str(&profile.verification_status)
            .map_err(AdminError::internal)?;
        if current.is_terminal() {
            return Err(AdminError::invalid_transition(current));
        }

        let txn = self.begin("verify_profile").await?;

        self.profiles
            .set_verification(&txn, profile_account_id, decision, actor_id, notes.clone())
            .await?;

        let entry = AdminActionEntry::new(
            actor_id,
            ActionKind::ProfileVerify,
            TargetKind::Profile,
            profile_account_id,
        )
        .with_reason(notes)
        .with_states(
            json!({"verification_status": profile.verification_status}),
            json!({"verification_status": decision.as_str()}),
        );
        self.audit.append(&txn, entry).await?;

        self.commit(txn, "verify_profile").await?;

        tracing::info!(
            profile_account_id,
            actor_id,
            decision = %decision,
            "profile verification decided"
        );

        Ok(())
    }

    /// Listing/search for the admin accounts screen
    pub async fn list_accounts(
        &self,
        filter: AccountFilter,
        page: u64,
        per_page: u64,
    ) -> Result<AccountListResponse, AdminError> {
        let per_page = per_page.clamp(1, 100);
        let (accounts, total) = self.accounts.search(&filter, page, per_page).await?;

        let mut views = Vec::with_capacity(accounts.len());
        for account in accounts {
            let profile = match Role::from_str(&account.role) {
                Ok(Role::Business) | Ok(Role::Community) => {
                    self.profiles.find_by_account_id(&account.id).await?
                }
                _ => None,
            };
            views.push(AccountView::from_models(account, profile));
        }

        Ok(AccountListResponse {
            accounts: views,
            total,
            page,
            per_page,
        })
    }

    /// The verification queue, oldest first
    pub async fn pending_profiles(
        &self,
        page: u64,
        per_page: u64,
    ) -> Result<ProfileListResponse, AdminError> {
        let per_page = per_page.clamp(1, 100);
        let (profiles, total) = self.profiles.list_pending(page, per_page).await?;

        Ok(ProfileListResponse {
            profiles: profiles.into_iter().map(ProfileView::from_model).collect(),
            total,
            page,
            per_page,
        })
    }

    /// Read the admin action trail
    pub async fn list_actions(
        &self,
        target_id: Option<String>,
        page: u64,
        per_page: u64,
    ) -> Result<AdminActionListResponse, AdminError> {
        let per_page = per_page.clamp(1, 100);
        let (actions, total) = self
            .audit
            .list(target_id.as_deref(), page, per_page)
            .await?;

        Ok(AdminActionListResponse {
            actions: actions.into_iter().map(AdminActionView::from_model).collect(),
            total,
            page,
            per_page,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use migration::{Migrator, MigratorTrait};
    use sea_orm::Database;

    use crate::services::crypto;
    use crate::stores::{NewAccount, NewProfile};
    use crate::types::internal::moderation::ProfileKind;

    struct Fixture {
        service: AdminService,
        accounts: Arc<AccountStore>,
        profiles: Arc<ProfileStore>,
        audit: Arc<AuditStore>,
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

        Fixture {
            service: AdminService::new(db, accounts.clone(), profiles.clone(), audit.clone()),
            accounts,
            profiles,
            audit,
        }
    }

    async fn seed_account(fixture: &Fixture, email: &str, role: Role) -> String {
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

    #[tokio::test]
    async fn test_suspend_flips_status_and_logs_once() {
        let fixture = setup().await;
        let target = seed_account(&fixture, "target@example.org", Role::Individual).await;

        fixture
            .service
            .suspend("admin-1", &target, Some("spam".to_string()))
            .await
            .unwrap();

        let account = fixture.accounts.get(&target).await.unwrap();
        assert_eq!(account.status, "suspended");

        let (actions, total) = fixture.audit.list(Some(&target), 0, 10).await.unwrap();
        assert_eq!(total, 1);
        assert_eq!(actions[0].action, "suspend");
        assert_eq!(actions[0].actor_id, "admin-1");
        assert_eq!(actions[0].reason.as_deref(), Some("spam"));
    }

    #[tokio::test]
    async fn test_suspend_unknown_account_is_not_found() {
        let fixture = setup().await;

        let result = fixture.service.suspend("admin-1", "ghost", None).await;

        assert!(matches!(result, Err(AdminError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_self_suspension_is_denied() {
        let fixture = setup().await;
        let admin = seed_account(&fixture, "admin@example.org", Role::Admin).await;

        let result = fixture.service.suspend(&admin, &admin, None).await;

        assert!(matches!(result, Err(AdminError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_activate_reverses_suspension() {
        let fixture = setup().await;
        let target = seed_account(&fixture, "back@example.org", Role::Individual).await;

        fixture.service.suspend("admin-1", &target, None).await.unwrap();
        fixture.service.activate("admin-1", &target).await.unwrap();

        let account = fixture.accounts.get(&target).await.unwrap();
        assert_eq!(account.status, "active");

        let (_, total) = fixture.audit.list(Some(&target), 0, 10).await.unwrap();
        assert_eq!(total, 2);
    }

    #[tokio::test]
    async fn test_change_role_logs_before_and_after_snapshots() {
        let fixture = setup().await;
        let target = seed_account(&fixture, "promote@example.org", Role::Individual).await;

        fixture
            .service
            .change_role("admin-1", &target, Role::Business)
            .await
            .unwrap();

        let account = fixture.accounts.get(&target).await.unwrap();
        assert_eq!(account.role, "business");

        let (actions, total) = fixture.audit.list(Some(&target), 0, 10).await.unwrap();
        assert_eq!(total, 1);
        let action = &actions[0];
        assert_eq!(action.action, "role_change");

        let previous: serde_json::Value =
            serde_json::from_str(action.previous_state.as_deref().unwrap()).unwrap();
        let new: serde_json::Value =
            serde_json::from_str(action.new_state.as_deref().unwrap()).unwrap();
        assert_eq!(previous["role"], "individual");
        assert_eq!(new["role"], "business");
    }

    #[tokio::test]
    async fn test_change_role_leaves_the_profile_row_alone() {
        let fixture = setup().await;
        let target = seed_account(&fixture, "org@example.org", Role::Business).await;
        fixture
            .profiles
            .insert(NewProfile {
                account_id: target.clone(),
                kind: ProfileKind::Business,
                org_name: "Acme".to_string(),
                registration_no: None,
                address: None,
                focus_tags: None,
            })
            .await
            .unwrap();

        fixture
            .service
            .change_role("admin-1", &target, Role::Individual)
            .await
            .unwrap();

        // Orphaned on purpose: no cascade from role changes
        let profile = fixture.profiles.find_by_account_id(&target).await.unwrap();
        assert!(profile.is_some());
    }

    #[tokio::test]
    async fn test_verify_profile_approves_and_logs() {
        let fixture = setup().await;
        let target = seed_account(&fixture, "acme@example.org", Role::Business).await;
        fixture
            .profiles
            .insert(NewProfile {
                account_id: target.clone(),
                kind: ProfileKind::Business,
                org_name: "Acme".to_string(),
                registration_no: None,
                address: None,
                focus_tags: None,
            })
            .await
            .unwrap();

        fixture
            .service
            .verify_profile(
                "admin-1",
                &target,
                VerificationStatus::Approved,
                Some("docs check out".to_string()),
            )
            .await
            .unwrap();

        let profile = fixture.profiles.get(&target).await.unwrap();
        assert_eq!(profile.verification_status, "approved");
        assert_eq!(profile.verified_by.as_deref(), Some("admin-1"));

        let (actions, total) = fixture.audit.list(Some(&target), 0, 10).await.unwrap();
        assert_eq!(total, 1);
        assert_eq!(actions[0].action, "profile_verify");
    }

    #[tokio::test]
    async fn test_verify_profile_is_terminal() {
        let fixture = setup().await;
        let target = seed_account(&fixture, "once@example.org", Role::Business).await;
        fixture
            .profiles
            .insert(NewProfile {
                account_id: target.clone(),
                kind: ProfileKind::Business,
                org_name: "Acme".to_string(),
                registration_no: None,
                address: None,
                focus_tags: None,
            })
            .await
            .unwrap();

        fixture
            .service
            .verify_profile("admin-1", &target, VerificationStatus::Rejected, None)
            .await
            .unwrap();

        // No transition out of a finalized state, not even approve-after-reject
        let result = fixture
            .service
            .verify_profile("admin-1", &target, VerificationStatus::Approved, None)
            .await;

        assert!(matches!(result, Err(AdminError::Validation(_))));

        let profile = fixture.profiles.get(&target).await.unwrap();
        assert_eq!(profile.verification_status, "rejected");
    }

    #[tokio::test]
    async fn test_verify_profile_rejects_pending_as_decision() {
        let fixture = setup().await;

        let result = fixture
            .service
            .verify_profile("admin-1", "whatever", VerificationStatus::Pending, None)
            .await;

        assert!(matches!(result, Err(AdminError::Validation(_))));
    }

    #[tokio::test]
    async fn test_list_accounts_embeds_profiles_for_org_roles() {
        let fixture = setup().await;
        seed_account(&fixture, "solo@example.org", Role::Individual).await;
        let business = seed_account(&fixture, "org@example.org", Role::Business).await;
        fixture
            .profiles
            .insert(NewProfile {
                account_id: business,
                kind: ProfileKind::Business,
                org_name: "Acme".to_string(),
                registration_no: None,
                address: None,
                focus_tags: None,
            })
            .await
            .unwrap();

        let listing = fixture
            .service
            .list_accounts(AccountFilter::default(), 0, 10)
            .await
            .unwrap();

        assert_eq!(listing.total, 2);
        let org = listing
            .accounts
            .iter()
            .find(|a| a.role == "business")
            .unwrap();
        assert!(org.profile.is_some());
    }
}
