use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use crate::types::internal::auth::Role;

/// Named actions a role may perform across the platform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    // Base set, held by every role
    ViewCampaigns,
    JoinCampaign,
    TrackEnergy,
    BrowseMarketplace,

    // Business capabilities
    ListWaste,
    ManageListings,
    RespondInquiries,

    // Community capabilities
    CreateCampaign,
    ManageCampaign,
    ModerateMembers,

    // Admin-only, granted through the wildcard
    ModerateAccounts,
    VerifyProfiles,
}

impl Action {
    pub const ALL: [Action; 12] = [
        Self::ViewCampaigns,
        Self::JoinCampaign,
        Self::TrackEnergy,
        Self::BrowseMarketplace,
        Self::ListWaste,
        Self::ManageListings,
        Self::RespondInquiries,
        Self::CreateCampaign,
        Self::ManageCampaign,
        Self::ModerateMembers,
        Self::ModerateAccounts,
        Self::VerifyProfiles,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ViewCampaigns => "view_campaigns",
            Self::JoinCampaign => "join_campaign",
            Self::TrackEnergy => "track_energy",
            Self::BrowseMarketplace => "browse_marketplace",
            Self::ListWaste => "list_waste",
            Self::ManageListings => "manage_listings",
            Self::RespondInquiries => "respond_inquiries",
            Self::CreateCampaign => "create_campaign",
            Self::ManageCampaign => "manage_campaign",
            Self::ModerateMembers => "moderate_members",
            Self::ModerateAccounts => "moderate_accounts",
            Self::VerifyProfiles => "verify_profiles",
        }
    }
}

impl FromStr for Action {
    type Err = PermissionConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Action::ALL
            .iter()
            .copied()
            .find(|action| action.as_str() == s)
            .ok_or_else(|| PermissionConfigError::UnknownAction(s.to_string()))
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PermissionConfigError {
    #[error("unknown action name in permission table: {0}")]
    UnknownAction(String),
}

// The grant lists are authored as action names and parsed against the Action
// enum when the table is built, so a typo aborts startup instead of silently
// denying at request time.
const BASE_GRANTS: &[&str] = &[
    "view_campaigns",
    "join_campaign",
    "track_energy",
    "browse_marketplace",
];
const BUSINESS_GRANTS: &[&str] = &["list_waste", "manage_listings", "respond_inquiries"];
const COMMUNITY_GRANTS: &[&str] = &["create_campaign", "manage_campaign", "moderate_members"];

/// Static role -> capability-set table
///
/// Admin is a wildcard over every action. Business and community each hold
/// the individual base set plus their own capabilities. Lookups for actions
/// outside a role's set are denied.
pub struct PermissionTable {
    individual: HashSet<Action>,
    business: HashSet<Action>,
    community: HashSet<Action>,
}

impl PermissionTable {
    /// Build and validate the table. Called once at startup.
    pub fn load() -> Result<Self, PermissionConfigError> {
        let base = Self::parse_grants(BASE_GRANTS)?;

        let mut business = base.clone();
        business.extend(Self::parse_grants(BUSINESS_GRANTS)?);

        let mut community = base.clone();
        community.extend(Self::parse_grants(COMMUNITY_GRANTS)?);

        Ok(Self {
            individual: base,
            business,
            community,
        })
    }

    fn parse_grants(names: &[&str]) -> Result<HashSet<Action>, PermissionConfigError> {
        names.iter().map(|name| name.parse()).collect()
    }

    /// Fail-closed permission lookup
    pub fn allows(&self, role: Role, action: Action) -> bool {
        match role {
            Role::Admin => true,
            Role::Individual => self.individual.contains(&action),
            Role::Business => self.business.contains(&action),
            Role::Community => self.community.contains(&action),
        }
    }

    /// Lookup by action name; unknown names are denied, never an error
    pub fn allows_name(&self, role: Role, action: &str) -> bool {
        match action.parse::<Action>() {
            Ok(action) => self.allows(role, action),
            Err(_) => false,
        }
    }
}
