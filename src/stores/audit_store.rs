use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Set,
};

use crate::errors::internal::{AuditError, InternalError};
use crate::types::db::admin_action::{self, Entity as AdminAction};
use crate::types::internal::moderation::AdminActionEntry;

/// Repository for the append-only admin action log
pub struct AuditStore {
    db: DatabaseConnection,
}

impl AuditStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Append one admin action entry
    ///
    /// Takes any connection: moderation passes its open transaction so the
    /// log entry commits - or rolls back - together with the state change it
    /// records.
    pub async fn append<C: ConnectionTrait>(
        &self,
        conn: &C,
        entry: AdminActionEntry,
    ) -> Result<(), InternalError> {
        let previous_state = entry
            .previous_state
            .map(|v| serde_json::to_string(&v))
            .transpose()
            .map_err(AuditError::Serialization)?;
        let new_state = entry
            .new_state
            .map(|v| serde_json::to_string(&v))
            .transpose()
            .map_err(AuditError::Serialization)?;

        let model = admin_action::ActiveModel {
            id: sea_orm::ActiveValue::NotSet,
            actor_id: Set(entry.actor_id),
            action: Set(entry.action.as_str().to_string()),
            target_kind: Set(entry.target_kind.as_str().to_string()),
            target_id: Set(entry.target_id),
            reason: Set(entry.reason),
            previous_state: Set(previous_state),
            new_state: Set(new_state),
            created_at: Set(Utc::now().timestamp()),
        };

        model
            .insert(conn)
            .await
            .map_err(|e| InternalError::Audit(AuditError::Write(e)))?;

        Ok(())
    }

    /// Paginated trail, newest first, optionally narrowed to one target
    pub async fn list(
        &self,
        target_id: Option<&str>,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<admin_action::Model>, u64), InternalError> {
        let mut select = AdminAction::find();

        if let Some(target_id) = target_id {
            select = select.filter(admin_action::Column::TargetId.eq(target_id));
        }

        let paginator = select
            .order_by_desc(admin_action::Column::Id)
            .paginate(&self.db, per_page);

        let total = paginator
            .num_items()
            .await
            .map_err(|e| InternalError::database("count_admin_actions", e))?;
        let actions = paginator
            .fetch_page(page)
            .await
            .map_err(|e| InternalError::database("list_admin_actions", e))?;

        Ok((actions, total))
    }
}
