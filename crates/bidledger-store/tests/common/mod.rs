#![allow(dead_code)]

use bidledger_core::model::{new_record_id, AuthorType, Bid, ServiceType, Tender};
use bidledger_store::{db, migrations, DirectoryRepo, Employee, Organization, VersionedStore};
use rusqlite::Connection;
use tempfile::TempDir;

/// Migrated on-disk database plus one organization with one responsible user
pub struct Fixture {
    pub dir: TempDir,
    pub conn: Connection,
    pub org: Organization,
    pub user: Employee,
}

impl Fixture {
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let mut conn = db::open(dir.path().join("store.db")).unwrap();
        db::configure(&conn, db::DEFAULT_BUSY_TIMEOUT).unwrap();
        migrations::apply_migrations(&mut conn).unwrap();

        let org = Organization::new("Acme");
        let user = Employee::new("alice");
        DirectoryRepo::insert_organization(&conn, &org).unwrap();
        DirectoryRepo::insert_employee(&conn, &user).unwrap();
        DirectoryRepo::grant_responsibility(&conn, &user.id, &org.id).unwrap();

        Self {
            dir,
            conn,
            org,
            user,
        }
    }

    pub fn db_path(&self) -> std::path::PathBuf {
        self.dir.path().join("store.db")
    }

    pub fn tender(&self) -> Tender {
        let tender = Tender::new(
            new_record_id(),
            "Road works".to_string(),
            "Resurface the ring road".to_string(),
            ServiceType::Construction,
            self.org.id.clone(),
            self.user.id.clone(),
        );
        VersionedStore::insert_new(&self.conn, &tender).unwrap()
    }

    pub fn bid(&self, tender: &Tender) -> Bid {
        let bid = Bid::new(
            new_record_id(),
            "Offer".to_string(),
            "Asphalt in two weeks".to_string(),
            tender.id.clone(),
            AuthorType::User,
            self.user.id.clone(),
            tender.organization_id.clone(),
            self.user.id.clone(),
        );
        VersionedStore::insert_new(&self.conn, &bid).unwrap()
    }
}
