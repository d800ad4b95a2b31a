use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Set,
};

use crate::errors::internal::{AccountError, InternalError};
use crate::types::db::profile::{self, Entity as Profile};
use crate::types::internal::moderation::{ProfileKind, VerificationStatus};

/// Fields required to insert a new profile row
#[derive(Debug, Clone)]
pub struct NewProfile {
    pub account_id: String,
    pub kind: ProfileKind,
    pub org_name: String,
    pub registration_no: Option<String>,
    pub address: Option<String>,
    pub focus_tags: Option<Vec<String>>,
}

/// ProfileStore manages the one-per-account business/community profile rows
pub struct ProfileStore {
    db: DatabaseConnection,
}

impl ProfileStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Insert a profile in `pending` verification state
    pub async fn insert(&self, new: NewProfile) -> Result<profile::Model, InternalError> {
        let focus_tags = match &new.focus_tags {
            Some(tags) => Some(
                serde_json::to_string(tags)
                    .map_err(|e| InternalError::parse("focus_tags", e.to_string()))?,
            ),
            None => None,
        };

        let now = Utc::now().timestamp();
        let model = profile::ActiveModel {
            account_id: Set(new.account_id),
            kind: Set(new.kind.as_str().to_string()),
            org_name: Set(new.org_name),
            registration_no: Set(new.registration_no),
            address: Set(new.address),
            focus_tags: Set(focus_tags),
            verification_status: Set(VerificationStatus::Pending.as_str().to_string()),
            verified_by: Set(None),
            verified_at: Set(None),
            review_notes: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        };

        model
            .insert(&self.db)
            .await
            .map_err(|e| InternalError::database("insert_profile", e))
    }

    pub async fn find_by_account_id(
        &self,
        account_id: &str,
    ) -> Result<Option<profile::Model>, InternalError> {
        Profile::find_by_id(account_id)
            .one(&self.db)
            .await
            .map_err(|e| InternalError::database("find_profile", e))
    }

    /// Load a profile or fail with `AccountError::ProfileNotFound`
    pub async fn get(&self, account_id: &str) -> Result<profile::Model, InternalError> {
        self.find_by_account_id(account_id)
            .await?
            .ok_or_else(|| AccountError::ProfileNotFound(account_id.to_string()).into())
    }

    /// Update the allow-listed organization fields. `None` leaves a column untouched.
    pub async fn update_org_fields(
        &self,
        account_id: &str,
        org_name: Option<String>,
        registration_no: Option<String>,
        address: Option<String>,
        focus_tags: Option<Vec<String>>,
    ) -> Result<profile::Model, InternalError> {
        let mut model = profile::ActiveModel {
            account_id: Set(account_id.to_string()),
            updated_at: Set(Utc::now().timestamp()),
            ..Default::default()
        };

        if let Some(org_name) = org_name {
            model.org_name = Set(org_name);
        }
        if let Some(registration_no) = registration_no {
            model.registration_no = Set(Some(registration_no));
        }
        if let Some(address) = address {
            model.address = Set(Some(address));
        }
        if let Some(tags) = focus_tags {
            let raw = serde_json::to_string(&tags)
                .map_err(|e| InternalError::parse("focus_tags", e.to_string()))?;
            model.focus_tags = Set(Some(raw));
        }

        model
            .update(&self.db)
            .await
            .map_err(|e| InternalError::database("update_profile", e))
    }

    /// Write a verification decision. Takes any connection so the admin
    /// workflow can pair it with the audit-log write in one transaction.
    pub async fn set_verification<C: ConnectionTrait>(
        &self,
        conn: &C,
        account_id: &str,
        decision: VerificationStatus,
        verified_by: &str,
        notes: Option<String>,
    ) -> Result<(), InternalError> {
        let now = Utc::now().timestamp();
        let model = profile::ActiveModel {
            account_id: Set(account_id.to_string()),
            verification_status: Set(decision.as_str().to_string()),
            verified_by: Set(Some(verified_by.to_string())),
            verified_at: Set(Some(now)),
            review_notes: Set(notes),
            updated_at: Set(now),
            ..Default::default()
        };

        model
            .update(conn)
            .await
            .map_err(|e| InternalError::database("set_profile_verification", e))?;

        Ok(())
    }

    /// The admin verification queue, oldest first
    pub async fn list_pending(
        &self,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<profile::Model>, u64), InternalError> {
        let paginator = Profile::find()
            .filter(profile::Column::VerificationStatus.eq(VerificationStatus::Pending.as_str()))
            .order_by_asc(profile::Column::CreatedAt)
            .paginate(&self.db, per_page);

        let total = paginator
            .num_items()
            .await
            .map_err(|e| InternalError::database("count_pending_profiles", e))?;
        let profiles = paginator
            .fetch_page(page)
            .await
            .map_err(|e| InternalError::database("list_pending_profiles", e))?;

        Ok((profiles, total))
    }
}
