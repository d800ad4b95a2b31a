use poem_openapi::Object;
use serde::{Deserialize, Serialize};

use crate::types::db::admin_action;
use crate::types::dto::auth::{AccountView, ProfileView};

/// Request model for POST /admin/accounts/:id/suspend
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct SuspendRequest {
    /// Why the account is being suspended (recorded in the action log)
    pub reason: Option<String>,
}

/// Request model for POST /admin/accounts/:id/role
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct ChangeRoleRequest {
    /// New role: "individual", "business", "community" or "admin"
    pub role: String,
}

/// Request model for POST /admin/profiles/:id/verify
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct VerifyProfileRequest {
    /// Verification decision: "approved" or "rejected"
    pub decision: String,

    /// Reviewer notes stored on the profile and in the action log
    pub notes: Option<String>,
}

/// Paginated account listing
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct AccountListResponse {
    pub accounts: Vec<AccountView>,
    pub total: u64,
    pub page: u64,
    pub per_page: u64,
}

/// Paginated verification queue
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct ProfileListResponse {
    pub profiles: Vec<ProfileView>,
    pub total: u64,
    pub page: u64,
    pub per_page: u64,
}

/// One admin action log entry as returned to clients
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct AdminActionView {
    pub id: i32,
    pub actor_id: String,
    pub action: String,
    pub target_kind: String,
    pub target_id: String,
    pub reason: Option<String>,
    pub previous_state: Option<String>,
    pub new_state: Option<String>,
    pub created_at: i64,
}

/// Paginated action log listing
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct AdminActionListResponse {
    pub actions: Vec<AdminActionView>,
    pub total: u64,
    pub page: u64,
    pub per_page: u64,
}

impl AdminActionView {
    pub fn from_model(action: admin_action::Model) -> Self {
        Self {
            id: action.id,
            actor_id: action.actor_id,
            action: action.action,
            target_kind: action.target_kind,
            target_id: action.target_id,
            reason: action.reason,
            previous_state: action.previous_state,
            new_state: action.new_state,
            created_at: action.created_at,
        }
    }
}
