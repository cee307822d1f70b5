//! Authorization gate
//!
//! Actors arrive as external usernames. The gate resolves a username to an
//! identity, the identity to the one organization it is responsible for, and
//! compares that organization with the owning organization of the target
//! record. Lookups go through the [`Directory`] seam so the gate itself holds
//! no storage.
//!
//! Lookup failures and authorization failures stay distinct: an unknown
//! username is `Unauthorized`, a missing record is `NotFound`, and only a
//! resolved identity without responsibility is `Forbidden`.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::{LedgerError, Result};
use crate::model::EntityKind;

/// Internal identity of an employee
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IdentityId(String);

impl IdentityId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for IdentityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Organization identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrganizationId(String);

impl OrganizationId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OrganizationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Keyed lookups the gate depends on.
///
/// Every method returns `Ok(None)` / `Ok(false)` for "absent" and reserves
/// `Err` for failures of the lookup itself.
pub trait Directory {
    fn identity_by_username(&self, username: &str) -> Result<Option<IdentityId>>;

    fn identity_exists(&self, identity_id: &str) -> Result<bool>;

    fn organization_by_identity(&self, identity_id: &IdentityId)
        -> Result<Option<OrganizationId>>;

    /// Owning organization of a tender or bid; `None` when the record does not exist
    fn organization_by_entity(
        &self,
        kind: EntityKind,
        entity_id: &str,
    ) -> Result<Option<OrganizationId>>;
}

impl<D: Directory + ?Sized> Directory for &D {
    fn identity_by_username(&self, username: &str) -> Result<Option<IdentityId>> {
        (**self).identity_by_username(username)
    }

    fn identity_exists(&self, identity_id: &str) -> Result<bool> {
        (**self).identity_exists(identity_id)
    }

    fn organization_by_identity(
        &self,
        identity_id: &IdentityId,
    ) -> Result<Option<OrganizationId>> {
        (**self).organization_by_identity(identity_id)
    }

    fn organization_by_entity(
        &self,
        kind: EntityKind,
        entity_id: &str,
    ) -> Result<Option<OrganizationId>> {
        (**self).organization_by_entity(kind, entity_id)
    }
}

fn not_found(kind: EntityKind, entity_id: &str) -> LedgerError {
    match kind {
        EntityKind::Tender => LedgerError::TenderNotFound {
            tender_id: entity_id.to_string(),
        },
        EntityKind::Bid => LedgerError::BidNotFound {
            bid_id: entity_id.to_string(),
        },
    }
}

/// Resolves actors and answers responsibility questions over a [`Directory`]
pub struct AuthorizationGate<D> {
    directory: D,
}

impl<D: Directory> AuthorizationGate<D> {
    pub fn new(directory: D) -> Self {
        Self { directory }
    }

    /// # Errors
    /// `IdentityNotFound` (Unauthorized) when the username has no identity.
    pub fn resolve_identity(&self, username: &str) -> Result<IdentityId> {
        self.directory
            .identity_by_username(username)?
            .ok_or_else(|| LedgerError::IdentityNotFound {
                username: username.to_string(),
            })
    }

    /// `None` when the identity holds no membership.
    ///
    /// # Errors
    /// Only lookup failures.
    pub fn resolve_organization(&self, identity: &IdentityId) -> Result<Option<OrganizationId>> {
        self.directory.organization_by_identity(identity)
    }

    /// True iff the identity's organization owns the target record.
    ///
    /// # Errors
    /// `TenderNotFound` / `BidNotFound` when the target does not exist.
    pub fn is_responsible_for(
        &self,
        identity: &IdentityId,
        kind: EntityKind,
        entity_id: &str,
    ) -> Result<bool> {
        let owner = self
            .directory
            .organization_by_entity(kind, entity_id)?
            .ok_or_else(|| not_found(kind, entity_id))?;

        Ok(self.resolve_organization(identity)?.as_ref() == Some(&owner))
    }

    /// Ownership of a bid is same-organization responsibility, not
    /// authorship: any responsible member of the bid's organization owns it.
    ///
    /// # Errors
    /// `BidNotFound` when the bid does not exist.
    pub fn is_owner(&self, identity: &IdentityId, bid_id: &str) -> Result<bool> {
        self.is_responsible_for(identity, EntityKind::Bid, bid_id)
    }

    /// The identity's organization, or `Forbidden` when it has none.
    ///
    /// # Errors
    /// `NoMembership` (Forbidden).
    pub fn require_membership(&self, identity: &IdentityId) -> Result<OrganizationId> {
        self.resolve_organization(identity)?
            .ok_or_else(|| LedgerError::NoMembership {
                identity_id: identity.to_string(),
            })
    }

    /// Membership first, then existence of the target, then comparison.
    ///
    /// # Errors
    /// `NoMembership` or `NotResponsible` (Forbidden), `TenderNotFound` /
    /// `BidNotFound` (NotFound).
    pub fn require_responsible(
        &self,
        identity: &IdentityId,
        kind: EntityKind,
        entity_id: &str,
    ) -> Result<OrganizationId> {
        let organization = self.require_membership(identity)?;

        let owner = self
            .directory
            .organization_by_entity(kind, entity_id)?
            .ok_or_else(|| not_found(kind, entity_id))?;

        if owner != organization {
            tracing::debug!(
                identity_id = %identity,
                entity_kind = %kind,
                entity_id,
                "identity not responsible for target"
            );
            return Err(LedgerError::NotResponsible {
                identity_id: identity.to_string(),
                kind,
                entity_id: entity_id.to_string(),
            });
        }

        Ok(organization)
    }

    /// # Errors
    /// See [`Self::require_responsible`].
    pub fn require_owner(&self, identity: &IdentityId, bid_id: &str) -> Result<OrganizationId> {
        self.require_responsible(identity, EntityKind::Bid, bid_id)
    }

    /// The identity must be responsible for exactly `organization_id`.
    ///
    /// # Errors
    /// `NoMembership` or `NotResponsibleForOrganization` (Forbidden).
    pub fn require_organization(
        &self,
        identity: &IdentityId,
        organization_id: &str,
    ) -> Result<OrganizationId> {
        let organization = self.require_membership(identity)?;
        if organization.as_str() != organization_id {
            return Err(LedgerError::NotResponsibleForOrganization {
                identity_id: identity.to_string(),
                organization_id: organization_id.to_string(),
            });
        }
        Ok(organization)
    }

    /// # Errors
    /// `AuthorNotFound` (Unauthorized) when no such identity exists.
    pub fn require_identity_exists(&self, identity_id: &str) -> Result<()> {
        if self.directory.identity_exists(identity_id)? {
            Ok(())
        } else {
            Err(LedgerError::AuthorNotFound {
                author_id: identity_id.to_string(),
            })
        }
    }
}
