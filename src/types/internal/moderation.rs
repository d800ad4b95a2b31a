use std::fmt;
use std::str::FromStr;

use super::auth::UnknownVariant;

/// Action kinds recorded in the admin action log
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    Suspend,
    Activate,
    RoleChange,
    ProfileVerify,
}

impl ActionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Suspend => "suspend",
            Self::Activate => "activate",
            Self::RoleChange => "role_change",
            Self::ProfileVerify => "profile_verify",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What an admin action targeted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetKind {
    Account,
    Profile,
}

impl TargetKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Account => "account",
            Self::Profile => "profile",
        }
    }
}

/// Profile kind, mirrors the owning account's role at creation time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileKind {
    Business,
    Community,
}

impl ProfileKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Business => "business",
            Self::Community => "community",
        }
    }
}

impl FromStr for ProfileKind {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "business" => Ok(Self::Business),
            "community" => Ok(Self::Community),
            other => Err(UnknownVariant {
                kind: "profile kind",
                value: other.to_string(),
            }),
        }
    }
}

/// Admin-controlled approval state of a business/community profile
///
/// `Approved` and `Rejected` are terminal; only `Pending` profiles accept a
/// verification decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerificationStatus {
    Pending,
    Approved,
    Rejected,
}

impl VerificationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }
}

impl FromStr for VerificationStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            other => Err(UnknownVariant {
                kind: "verification status",
                value: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for VerificationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry bound for the admin action log
///
/// State snapshots are JSON values so callers can record whatever shape the
/// mutation touched (a status string, a role pair, a verification decision).
#[derive(Debug, Clone)]
pub struct AdminActionEntry {
    pub actor_id: String,
    pub action: ActionKind,
    pub target_kind: TargetKind,
    pub target_id: String,
    pub reason: Option<String>,
    pub previous_state: Option<serde_json::Value>,
    pub new_state: Option<serde_json::Value>,
}

impl AdminActionEntry {
    pub fn new(
        actor_id: impl Into<String>,
        action: ActionKind,
        target_kind: TargetKind,
        target_id: impl Into<String>,
    ) -> Self {
        Self {
            actor_id: actor_id.into(),
            action,
            target_kind,
            target_id: target_id.into(),
            reason: None,
            previous_state: None,
            new_state: None,
        }
    }

    pub fn with_reason(mut self, reason: Option<String>) -> Self {
        self.reason = reason;
        self
    }

    pub fn with_states(
        mut self,
        previous: serde_json::Value,
        new: serde_json::Value,
    ) -> Self {
        self.previous_state = Some(previous);
        self.new_state = Some(new);
        self
    }
}
