use serde::{Deserialize, Serialize};

/// Links an identity to the one organization it is responsible for
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationMembership {
    pub identity_id: String,
    pub organization_id: String,
}
