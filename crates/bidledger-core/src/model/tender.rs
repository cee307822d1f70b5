use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{EntityKind, ServiceType, TenderStatus};
use crate::errors::{LedgerError, Result};
use crate::rules::validation::{
    validate_identifier, validate_text, DESCRIPTION_MAX_CHARS, NAME_MAX_CHARS,
};
use crate::versioned::Versioned;

/// Tender - a procurement request published by an organization
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tender {
    /// Unique identifier (UUID v7)
    pub id: String,

    pub name: String,

    pub description: String,

    pub status: TenderStatus,

    pub service_type: ServiceType,

    /// Organization that owns the tender
    pub organization_id: String,

    /// Identity that created the tender
    pub creator_id: String,

    /// Starts at 1, incremented by every change
    pub version: u32,

    /// Set once at creation, never changed
    pub created_at: DateTime<Utc>,
}

impl Tender {
    /// Create a tender at version 1 in status `Created`
    pub fn new(
        id: String,
        name: String,
        description: String,
        service_type: ServiceType,
        organization_id: String,
        creator_id: String,
    ) -> Self {
        Self {
            id,
            name,
            description,
            status: TenderStatus::Created,
            service_type,
            organization_id,
            creator_id,
            version: 1,
            created_at: Utc::now(),
        }
    }
}

impl Versioned for Tender {
    type Patch = TenderPatch;

    const KIND: EntityKind = EntityKind::Tender;

    fn id(&self) -> &str {
        &self.id
    }

    fn version(&self) -> u32 {
        self.version
    }

    fn set_version(&mut self, version: u32) {
        self.version = version;
    }

    fn apply_patch(&mut self, patch: &TenderPatch) {
        if let Some(name) = &patch.name {
            self.name = name.clone();
        }
        if let Some(description) = &patch.description {
            self.description = description.clone();
        }
        if let Some(service_type) = patch.service_type {
            self.service_type = service_type;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
    }

    fn restore_fields(&mut self, snapshot: &Tender) {
        self.name = snapshot.name.clone();
        self.description = snapshot.description.clone();
        self.status = snapshot.status;
        self.service_type = snapshot.service_type;
        self.organization_id = snapshot.organization_id.clone();
        self.creator_id = snapshot.creator_id.clone();
    }
}

/// Input for creating a tender
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTender {
    pub name: String,
    pub description: String,
    pub service_type: ServiceType,
    pub organization_id: String,
    pub creator_username: String,
}

impl NewTender {
    /// # Errors
    /// Returns `InvalidField` for the first malformed field.
    pub fn validate(&self) -> Result<()> {
        validate_text("name", &self.name, NAME_MAX_CHARS)?;
        validate_text("description", &self.description, DESCRIPTION_MAX_CHARS)?;
        validate_identifier("organizationId", &self.organization_id)?;
        validate_identifier("creatorUsername", &self.creator_username)
    }
}

/// Sparse update of a tender; `None` fields are left unchanged
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TenderPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_type: Option<ServiceType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<TenderStatus>,
}

impl TenderPatch {
    /// Patch that only moves the status
    pub fn status(status: TenderStatus) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.service_type.is_none()
            && self.status.is_none()
    }

    /// Validate an edit of `tender_id`. Status changes go through the
    /// state machine and are rejected here.
    ///
    /// # Errors
    /// `EmptyPatch` when nothing is supplied, `InvalidField` otherwise.
    pub fn validate_edit(&self, tender_id: &str) -> Result<()> {
        if self.is_empty() {
            return Err(LedgerError::EmptyPatch {
                entity_id: tender_id.to_string(),
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
