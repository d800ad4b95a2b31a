use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use crate::errors::internal::{AccountError, InternalError};
use crate::types::db::account::{self, Entity as Account};
use crate::types::internal::auth::{AccountStatus, Role};

/// Fields required to insert a new account row
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub email: String,
    pub name: String,
    pub phone: Option<String>,
    pub password_hash: String,
    pub role: Role,
}

/// Filters for the admin account listing
#[derive(Debug, Clone, Default)]
pub struct AccountFilter {
    /// Substring match against email or name
    pub query: Option<String>,
    pub role: Option<Role>,
    pub status: Option<AccountStatus>,
}

/// AccountStore manages account rows: the credential store of the service
pub struct AccountStore {
    db: DatabaseConnection,
}

impl AccountStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Insert a new account
    ///
    /// # Errors
    /// `AccountError::EmailTaken` when the email is already registered; the
    /// UNIQUE constraint is the second line of defense against races.
    pub async fn insert(&self, new: NewAccount) -> Result<account::Model, InternalError> {
        let existing = Account::find()
            .filter(account::Column::Email.eq(&new.email))
            .one(&self.db)
            .await
            .map_err(|e| InternalError::database("find_account_by_email", e))?;

        if existing.is_some() {
            return Err(AccountError::EmailTaken(new.email).into());
        }

        let now = Utc::now().timestamp();
        let model = account::ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            email: Set(new.email.clone()),
            name: Set(new.name),
            phone: Set(new.phone),
            avatar_url: Set(None),
            password_hash: Set(new.password_hash),
            role: Set(new.role.as_str().to_string()),
            status: Set(AccountStatus::Active.as_str().to_string()),
            created_at: Set(now),
            updated_at: Set(now),
            last_login_at: Set(None),
        };

        model.insert(&self.db).await.map_err(|e| {
            if e.to_string().contains("UNIQUE") {
                AccountError::EmailTaken(new.email).into()
            } else {
                InternalError::database("insert_account", e)
            }
        })
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<account::Model>, InternalError> {
        Account::find()
            .filter(account::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(|e| InternalError::database("find_account_by_email", e))
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<account::Model>, InternalError> {
        Account::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| InternalError::database("find_account_by_id", e))
    }

    /// Load an account or fail with `AccountError::NotFound`
    pub async fn get(&self, id: &str) -> Result<account::Model, InternalError> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AccountError::NotFound(id.to_string()).into())
    }

    /// Record a successful login on the account row
    pub async fn touch_last_login(&self, id: &str) -> Result<(), InternalError> {
        let model = account::ActiveModel {
            id: Set(id.to_string()),
            last_login_at: Set(Some(Utc::now().timestamp())),
            ..Default::default()
        };

        model
            .update(&self.db)
            .await
            .map_err(|e| InternalError::database("touch_last_login", e))?;

        Ok(())
    }

    /// Update the allow-listed contact fields. `None` leaves a column untouched.
    pub async fn update_contact(
        &self,
        id: &str,
        name: Option<String>,
        phone: Option<String>,
        avatar_url: Option<String>,
    ) -> Result<account::Model, InternalError> {
        let mut model = account::ActiveModel {
            id: Set(id.to_string()),
            updated_at: Set(Utc::now().timestamp()),
            ..Default::default()
        };

        if let Some(name) = name {
            model.name = Set(name);
        }
        if let Some(phone) = phone {
            model.phone = Set(Some(phone));
        }
        if let Some(avatar_url) = avatar_url {
            model.avatar_url = Set(Some(avatar_url));
        }

        model
            .update(&self.db)
            .await
            .map_err(|e| InternalError::database("update_contact", e))
    }

    pub async fn update_password_hash(
        &self,
        id: &str,
        password_hash: String,
    ) -> Result<(), InternalError> {
        let model = account::ActiveModel {
            id: Set(id.to_string()),
            password_hash: Set(password_hash),
            updated_at: Set(Utc::now().timestamp()),
            ..Default::default()
        };

        model
            .update(&self.db)
            .await
            .map_err(|e| InternalError::database("update_password_hash", e))?;

        Ok(())
    }

    /// Flip the lifecycle status. Takes any connection so moderation can run
    /// it inside the same transaction as the audit-log write.
    pub async fn set_status<C: ConnectionTrait>(
        &self,
        conn: &C,
        id: &str,
        status: AccountStatus,
    ) -> Result<(), InternalError> {
        let model = account::ActiveModel {
            id: Set(id.to_string()),
            status: Set(status.as_str().to_string()),
            updated_at: Set(Utc::now().timestamp()),
            ..Default::default()
        };

        model
            .update(conn)
            .await
            .map_err(|e| InternalError::database("set_account_status", e))?;

        Ok(())
    }

    /// Overwrite the role. Pure metadata change: never touches the profile row.
    pub async fn set_role<C: ConnectionTrait>(
        &self,
        conn: &C,
        id: &str,
        role: Role,
    ) -> Result<(), InternalError> {
        let model = account::ActiveModel {
            id: Set(id.to_string()),
            role: Set(role.as_str().to_string()),
            updated_at: Set(Utc::now().timestamp()),
            ..Default::default()
        };

        model
            .update(conn)
            .await
            .map_err(|e| InternalError::database("set_account_role", e))?;

        Ok(())
    }

    /// Paginated listing/search for the admin surface
    pub async fn search(
        &self,
        filter: &AccountFilter,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<account::Model>, u64), InternalError> {
        let mut select = Account::find();

        if let Some(query) = &filter.query {
            let pattern = format!("%{}%", query);
            select = select.filter(
                Condition::any()
                    .add(account::Column::Email.like(pattern.as_str()))
                    .add(account::Column::Name.like(pattern.as_str())),
            );
        }
        if let Some(role) = filter.role {
            select = select.filter(account::Column::Role.eq(role.as_str()));
        }
        if let Some(status) = filter.status {
            select = select.filter(account::Column::Status.eq(status.as_str()));
        }

        let paginator = select
            .order_by_desc(account::Column::CreatedAt)
            .paginate(&self.db, per_page);

        let total = paginator
            .num_items()
            .await
            .map_err(|e| InternalError::database("count_accounts", e))?;
        let accounts = paginator
            .fetch_page(page)
            .await
            .map_err(|e| InternalError::database("search_accounts", e))?;

        Ok((accounts, total))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use migration::{Migrator, MigratorTrait};
    use sea_orm::Database;

    async fn setup_store() -> AccountStore {
        let db = Database::connect("sqlite::memory:")
            .await
            .expect("Failed to create test database");
        Migrator::up(&db, None)
            .await
            .expect("Failed to run migrations");
        AccountStore::new(db)
    }

    fn new_account(email: &str) -> NewAccount {
        NewAccount {
            email: email.to_string(),
            name: "Test User".to_string(),
            phone: None,
            password_hash: "$argon2id$fake-hash".to_string(),
            role: Role::Individual,
        }
    }

    #[tokio::test]
    async fn test_insert_defaults_to_active_individual() {
        let store = setup_store().await;

        let account = store.insert(new_account("a@example.org")).await.unwrap();

        assert_eq!(account.status, "active");
        assert_eq!(account.role, "individual");
        assert!(account.last_login_at.is_none());
    }

    #[tokio::test]
    async fn test_duplicate_email_is_rejected_without_inserting() {
        let store = setup_store().await;
        store.insert(new_account("dup@example.org")).await.unwrap();

        let result = store.insert(new_account("dup@example.org")).await;

        match result {
            Err(InternalError::Account(AccountError::EmailTaken(email))) => {
                assert_eq!(email, "dup@example.org");
            }
            other => panic!("Expected EmailTaken, got {:?}", other.map(|a| a.email)),
        }

        let (_, total) = store
            .search(&AccountFilter::default(), 0, 10)
            .await
            .unwrap();
        assert_eq!(total, 1);
    }

    #[tokio::test]
    async fn test_touch_last_login_sets_timestamp() {
        let store = setup_store().await;
        let account = store.insert(new_account("login@example.org")).await.unwrap();

        store.touch_last_login(&account.id).await.unwrap();

        let reloaded = store.get(&account.id).await.unwrap();
        assert!(reloaded.last_login_at.is_some());
    }

    #[tokio::test]
    async fn test_update_contact_leaves_omitted_fields_alone() {
        let store = setup_store().await;
        let account = store.insert(new_account("contact@example.org")).await.unwrap();

        let updated = store
            .update_contact(&account.id, None, Some("+46 70 000 00 00".to_string()), None)
            .await
            .unwrap();

        assert_eq!(updated.name, "Test User");
        assert_eq!(updated.phone.as_deref(), Some("+46 70 000 00 00"));
        assert!(updated.avatar_url.is_none());
    }

    #[tokio::test]
    async fn test_search_filters_by_role_and_query() {
        let store = setup_store().await;
        store.insert(new_account("alice@example.org")).await.unwrap();
        store
            .insert(NewAccount {
                role: Role::Business,
                ..new_account("acme@example.org")
            })
            .await
            .unwrap();

        let filter = AccountFilter {
            role: Some(Role::Business),
            ..Default::default()
        };
        let (matches, total) = store.search(&filter, 0, 10).await.unwrap();
        assert_eq!(total, 1);
        assert_eq!(matches[0].email, "acme@example.org");

        let filter = AccountFilter {
            query: Some("alice".to_string()),
            ..Default::default()
        };
        let (matches, _) = store.search(&filter, 0, 10).await.unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].email, "alice@example.org");
    }

    #[tokio::test]
    async fn test_get_unknown_id_is_not_found() {
        let store = setup_store().await;

        let result = store.get("missing-id").await;

        assert!(matches!(
            result,
            Err(InternalError::Account(AccountError::NotFound(_)))
        ));
    }
}
