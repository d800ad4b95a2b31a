use poem_openapi::{payload::Json, ApiResponse, Object};
use serde::{Deserialize, Serialize};

use crate::types::db::{account, profile};
use crate::types::dto::common::MessageResponse;

/// Request model for account registration
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct RegisterRequest {
    /// Display name
    pub name: String,

    /// Email address, unique per account
    pub email: String,

    /// Plaintext password, hashed server-side
    pub password: String,

    /// Requested role: "individual", "business" or "community"
    pub role: String,

    /// Optional contact phone
    pub phone: Option<String>,

    /// Organization details, used only for business/community roles
    pub profile: Option<ProfilePayload>,
}

/// Organization attributes supplied at registration
#[derive(Object, Debug, Clone, Serialize, Deserialize)]
pub struct ProfilePayload {
    /// Organization name
    pub org_name: String,

    /// Company/charity registration identifier
    pub registration_no: Option<String>,

    /// Postal address
    pub address: Option<String>,

    /// Sector or focus tags
    pub focus_tags: Option<Vec<String>>,
}

/// Request model for login
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Account as returned to clients. Never carries the password hash.
#[derive(Object, Debug, Clone, Serialize, Deserialize)]
pub struct AccountView {
    pub id: String,
    pub email: String,
    pub name: String,
    pub phone: Option<String>,
    pub avatar_url: Option<String>,
    pub role: String,
    pub status: String,
    pub created_at: i64,
    pub last_login_at: Option<i64>,

    /// Attached business/community profile, when one exists
    pub profile: Option<ProfileView>,
}

/// Business/community profile as returned to clients
#[derive(Object, Debug, Clone, Serialize, Deserialize)]
pub struct ProfileView {
    pub account_id: String,
    pub kind: String,
    pub org_name: String,
    pub registration_no: Option<String>,
    pub address: Option<String>,
    pub focus_tags: Option<Vec<String>>,
    pub verification_status: String,
    pub verified_at: Option<i64>,
    pub review_notes: Option<String>,
}

/// Response model for register/login/password-change: token plus account
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct SessionResponse {
    /// Signed session token for API authentication
    pub token: String,

    /// Token type (always "Bearer")
    pub token_type: String,

    /// Seconds until the token expires
    pub expires_in: i64,

    pub account: AccountView,
}

/// Response model for GET /auth/verify
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct VerifyResponse {
    pub account: AccountView,
}

/// Request model for PUT /auth/profile. Only the allow-listed fields below
/// are ever written; omitted fields leave the stored row unchanged.
#[derive(Object, Debug, Default, Serialize, Deserialize)]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub avatar_url: Option<String>,
    pub org_name: Option<String>,
    pub registration_no: Option<String>,
    pub address: Option<String>,
    pub focus_tags: Option<Vec<String>>,
}

/// Request model for PUT /auth/password
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct ChangePasswordRequest {
    /// Current password for re-verification
    pub current_password: String,

    /// New password to set
    pub new_password: String,
}

/// API response for registration: session issued, cookie attached
#[derive(ApiResponse)]
pub enum RegisterApiResponse {
    /// Account created
    #[oai(status = 201)]
    Created(Json<SessionResponse>, #[oai(header = "Set-Cookie")] String),
}

/// API response for login and password change: fresh session, cookie attached
#[derive(ApiResponse)]
pub enum SessionApiResponse {
    /// Session issued
    #[oai(status = 200)]
    Ok(Json<SessionResponse>, #[oai(header = "Set-Cookie")] String),
}

/// API response for logout: clears the session cookie
#[derive(ApiResponse)]
pub enum LogoutApiResponse {
    /// Cookie cleared
    #[oai(status = 200)]
    Ok(Json<MessageResponse>, #[oai(header = "Set-Cookie")] String),
}

impl AccountView {
    /// Build the client view from entity rows, dropping the password hash.
    pub fn from_models(account: account::Model, profile: Option<profile::Model>) -> Self {
        Self {
            id: account.id,
            email: account.email,
            name: account.name,
            phone: account.phone,
            avatar_url: account.avatar_url,
            role: account.role,
            status: account.status,
            created_at: account.created_at,
            last_login_at: account.last_login_at,
            profile: profile.map(ProfileView::from_model),
        }
    }
}

impl ProfileView {
    pub fn from_model(profile: profile::Model) -> Self {
        let focus_tags = profile
            .focus_tags
            .as_deref()
            .and_then(|raw| serde_json::from_str(raw).ok());

        Self {
            account_id: profile.account_id,
            kind: profile.kind,
            org_name: profile.org_name,
            registration_no: profile.registration_no,
            address: profile.address,
            focus_tags,
            verification_status: profile.verification_status,
            verified_at: profile.verified_at,
            review_notes: profile.review_notes,
        }
    }
}
