//! Identities, organizations and memberships
//!
//! [`SqliteDirectory`] answers the authorization gate's lookups over any
//! connection or open transaction. [`DirectoryRepo`] seeds the tables.

use bidledger_core::auth::{Directory, IdentityId, OrganizationId};
use bidledger_core::errors::Result as LedgerResult;
use bidledger_core::model::{new_record_id, EntityKind, OrganizationMembership};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use serde::{Deserialize, Serialize};

use crate::errors::{from_rusqlite, ledger_storage, Result};
use crate::repo::rows::{timestamp, to_millis, truncate_to_millis};

/// A person who can act in the system
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: String,
    pub username: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Employee {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            id: new_record_id(),
            username: username.into(),
            first_name: None,
            last_name: None,
            created_at: truncate_to_millis(Utc::now()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Organization {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Organization {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: new_record_id(),
            name: name.into(),
            description: None,
            created_at: truncate_to_millis(Utc::now()),
        }
    }
}

/// Writes and listings for the directory tables
pub struct DirectoryRepo;

impl DirectoryRepo {
    pub fn insert_employee(conn: &Connection, employee: &Employee) -> Result<()> {
        conn.execute(
            "INSERT INTO employee (id, username, first_name, last_name, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                employee.id,
                employee.username,
                employee.first_name,
                employee.last_name,
                to_millis(&employee.created_at),
            ],
        )
        .map_err(from_rusqlite)?;
        Ok(())
    }

    pub fn insert_organization(conn: &Connection, organization: &Organization) -> Result<()> {
        conn.execute(
            "INSERT INTO organization (id, name, description, created_at) VALUES (?1, ?2, ?3, ?4)",
            params![
                organization.id,
                organization.name,
                organization.description,
                to_millis(&organization.created_at),
            ],
        )
        .map_err(from_rusqlite)?;
        Ok(())
    }

    /// Make `identity_id` responsible for `organization_id`.
    ///
    /// An identity holds at most one membership; a second grant violates the
    /// unique constraint and fails with `StorageFailure`.
    pub fn grant_responsibility(
        conn: &Connection,
        identity_id: &str,
        organization_id: &str,
    ) -> Result<OrganizationMembership> {
        conn.execute(
            "INSERT INTO organization_responsible (id, organization_id, user_id) VALUES (?1, ?2, ?3)",
            params![new_record_id(), organization_id, identity_id],
        )
        .map_err(from_rusqlite)?;
        Ok(OrganizationMembership {
            identity_id: identity_id.to_string(),
            organization_id: organization_id.to_string(),
        })
    }

    pub fn employee_by_username(conn: &Connection, username: &str) -> Result<Option<Employee>> {
        conn.query_row(
            "SELECT id, username, first_name, last_name, created_at FROM employee WHERE username = ?1",
            [username],
            |row| {
                Ok(Employee {
                    id: row.get("id")?,
                    username: row.get("username")?,
                    first_name: row.get("first_name")?,
                    last_name: row.get("last_name")?,
                    created_at: timestamp(row, "created_at")?,
                })
            },
        )
        .optional()
        .map_err(from_rusqlite)
    }

    /// Organizations ordered by name
    pub fn list_organizations(conn: &Connection) -> Result<Vec<Organization>> {
        let mut stmt = conn
            .prepare("SELECT id, name, description, created_at FROM organization ORDER BY name, id")
            .map_err(from_rusqlite)?;
        let organizations = stmt
            .query_map([], |row| {
                Ok(Organization {
                    id: row.get("id")?,
                    name: row.get("name")?,
                    description: row.get("description")?,
                    created_at: timestamp(row, "created_at")?,
                })
            })
            .map_err(from_rusqlite)?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(from_rusqlite)?;
        Ok(organizations)
    }
}

/// [`Directory`] backed by the directory and record tables
pub struct SqliteDirectory<'c> {
    conn: &'c Connection,
}

impl<'c> SqliteDirectory<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }
}

impl Directory for SqliteDirectory<'_> {
    fn identity_by_username(&self, username: &str) -> LedgerResult<Option<IdentityId>> {
        self.conn
            .query_row(
                "SELECT id FROM employee WHERE username = ?1",
                [username],
                |row| row.get::<_, String>(0),
            )
            .optional()
            .map(|id| id.map(IdentityId::new))
            .map_err(ledger_storage)
    }

    fn identity_exists(&self, identity_id: &str) -> LedgerResult<bool> {
        self.conn
            .query_row(
                "SELECT EXISTS(SELECT 1 FROM employee WHERE id = ?1)",
                [identity_id],
                |row| row.get(0),
            )
            .map_err(ledger_storage)
    }

    fn organization_by_identity(
        &self,
        identity_id: &IdentityId,
    ) -> LedgerResult<Option<OrganizationId>> {
        self.conn
            .query_row(
                "SELECT organization_id FROM organization_responsible WHERE user_id = ?1",
                [identity_id.as_str()],
                |row| row.get::<_, String>(0),
            )
            .optional()
            .map(|id| id.map(OrganizationId::new))
            .map_err(ledger_storage)
    }

    fn organization_by_entity(
        &self,
        kind: EntityKind,
        entity_id: &str,
    ) -> LedgerResult<Option<OrganizationId>> {
        let sql = match kind {
            EntityKind::Tender => "SELECT organization_id FROM tenders WHERE id = ?1",
            EntityKind::Bid => "SELECT organization_id FROM bids WHERE id = ?1",
        };
        self.conn
            .query_row(sql, [entity_id], |row| row.get::<_, String>(0))
            .optional()
            .map(|id| id.map(OrganizationId::new))
            .map_err(ledger_storage)
    }
}
