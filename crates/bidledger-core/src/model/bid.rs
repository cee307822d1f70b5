use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{AuthorType, BidStatus, EntityKind};
use crate::errors::{LedgerError, Result};
use crate::rules::validation::{
    validate_identifier, validate_text, DESCRIPTION_MAX_CHARS, NAME_MAX_CHARS,
};
use crate::versioned::Versioned;

/// Bid - a proposal submitted against a tender
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bid {
    /// Unique identifier (UUID v7)
    pub id: String,

    pub name: String,

    pub description: String,

    pub status: BidStatus,

    /// Tender this bid targets
    pub tender_id: String,

    pub author_type: AuthorType,

    /// Identity or organization id, depending on `author_type`
    pub author_id: String,

    /// Owning organization, copied from the tender when the bid is created
    pub organization_id: String,

    /// Identity that submitted the bid
    pub creator_id: String,

    pub version: u32,

    pub created_at: DateTime<Utc>,
}

impl Bid {
    /// Create a bid at version 1 in status `Created`
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: String,
        name: String,
        description: String,
        tender_id: String,
        author_type: AuthorType,
        author_id: String,
        organization_id: String,
        creator_id: String,
    ) -> Self {
        Self {
            id,
            name,
            description,
            status: BidStatus::Created,
            tender_id,
            author_type,
            author_id,
            organization_id,
            creator_id,
            version: 1,
            created_at: Utc::now(),
        }
    }
}

impl Versioned for Bid {
    type Patch = BidPatch;

    const KIND: EntityKind = EntityKind::Bid;

    fn id(&self) -> &str {
        &self.id
    }

    fn version(&self) -> u32 {
        self.version
    }

    fn set_version(&mut self, version: u32) {
        self.version = version;
    }

    fn apply_patch(&mut self, patch: &BidPatch) {
        if let Some(name) = &patch.name {
            self.name = name.clone();
        }
        if let Some(description) = &patch.description {
            self.description = description.clone();
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
    }

    fn restore_fields(&mut self, snapshot: &Bid) {
        self.name = snapshot.name.clone();
        self.description = snapshot.description.clone();
        self.status = snapshot.status;
        self.tender_id = snapshot.tender_id.clone();
        self.author_type = snapshot.author_type;
        self.author_id = snapshot.author_id.clone();
        self.organization_id = snapshot.organization_id.clone();
        self.creator_id = snapshot.creator_id.clone();
    }
}

/// Input for submitting a bid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBid {
    pub name: String,
    pub description: String,
    pub tender_id: String,
    pub author_type: AuthorType,
    pub author_id: String,
    pub creator_username: String,
}

impl NewBid {
    /// # Errors
    /// Returns `InvalidField` for the first malformed field.
    pub fn validate(&self) -> Result<()> {
        validate_text("name", &self.name, NAME_MAX_CHARS)?;
        validate_text("description", &self.description, DESCRIPTION_MAX_CHARS)?;
        validate_identifier("tenderId", &self.tender_id)?;
        validate_identifier("authorId", &self.author_id)?;
        validate_identifier("creatorUsername", &self.creator_username)
    }
}

/// Sparse update of a bid; `None` fields are left unchanged
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BidPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<BidStatus>,
}

impl BidPatch {
    /// Patch that only moves the status
    pub fn status(status: BidStatus) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none() && self.status.is_none()
    }

    /// Validate an edit of `bid_id`; see [`super::TenderPatch::validate_edit`].
    ///
    /// # Errors
    /// `EmptyPatch` when nothing is supplied, `InvalidField` otherwise.
    pub fn validate_edit(&self, bid_id: &str) -> Result<()> {
        if self.is_empty() {
            return Err(LedgerError::EmptyPatch {
                entity_id: bid_id.to_string(),
            });
        }
        if self.status.is_some() {
            return Err(LedgerError::InvalidField {
                field: "status".to_string(),
                reason: "status is changed through the status operation".to_string(),
            });
        }
        if let Some(name) = &self.name {
            validate_text("name", name, NAME_MAX_CHARS)?;
        }
        if let Some(description) = &self.description {
            validate_text("description", description, DESCRIPTION_MAX_CHARS)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bid() -> Bid {
        Bid::new(
            "b1".to_string(),
            "Offer".to_string(),
            "We deliver".to_string(),
            "t1".to_string(),
            AuthorType::User,
            "user-2".to_string(),
            "org-1".to_string(),
            "user-2".to_string(),
        )
    }

    #[test]
    fn test_patch_only_touches_supplied_fields() {
        let mut b = bid();
        b.apply_patch(&BidPatch {
            description: Some("We deliver faster".to_string()),
            ..Default::default()
        });

        assert_eq!(b.name, "Offer");
        assert_eq!(b.description, "We deliver faster");
        assert_eq!(b.status, BidStatus::Created);
        assert_eq!(b.version, 1);
    }

    #[test]
    fn test_restore_keeps_identity_and_creation_time() {
        let original = bid();
        let mut other = bid();
        other.id = "b2".to_string();
        other.name = "Other".to_string();

        let mut restored = original.clone();
        restored.restore_fields(&other);

        assert_eq!(restored.id, "b1");
        assert_eq!(restored.created_at, original.created_at);
        assert_eq!(restored.name, "Other");
    }

    #[test]
    fn test_empty_bid_patch_rejected() {
        assert!(matches!(
            BidPatch::default().validate_edit("b1"),
            Err(LedgerError::EmptyPatch { .. })
        ));
    }

    #[test]
    fn test_serialized_bid_uses_camel_case() {
        let json = serde_json::to_value(bid()).unwrap();
        assert_eq!(json["authorType"], "User");
        assert_eq!(json["tenderId"], "t1");
        assert_eq!(json["status"], "Created");
    }
}
