#![allow(dead_code)]

use bidledger_core::model::{AuthorType, Bid, NewBid, NewTender, ServiceType, Tender};
use bidledger_core_types::RequestContext;
use bidledger_engine::commands::bid::bid_create;
use bidledger_engine::commands::tender::tender_create;
use bidledger_engine::Settings;
use bidledger_store::{DirectoryRepo, Employee, Organization};
use rusqlite::Connection;
use tempfile::TempDir;

/// Two organizations, each with one responsible user, plus an employee
/// without any membership.
pub struct World {
    pub dir: TempDir,
    pub settings: Settings,
    pub conn: Connection,
    pub o1: Organization,
    pub o2: Organization,
    /// Responsible for `o1`
    pub u1: Employee,
    /// Responsible for `o2`
    pub u2: Employee,
    /// No membership
    pub loner: Employee,
}

impl World {
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let settings = Settings {
            database_path: dir.path().join("ledger.db"),
            ..Settings::default()
        };
        let conn = settings.open_store().unwrap();

        let o1 = Organization::new("Buyer Ltd");
        let o2 = Organization::new("Supplier Ltd");
        let u1 = Employee::new("user1");
        let u2 = Employee::new("user2");
        let loner = Employee::new("loner");
        for org in [&o1, &o2] {
            DirectoryRepo::insert_organization(&conn, org).unwrap();
        }
        for user in [&u1, &u2, &loner] {
            DirectoryRepo::insert_employee(&conn, user).unwrap();
        }
        DirectoryRepo::grant_responsibility(&conn, &u1.id, &o1.id).unwrap();
        DirectoryRepo::grant_responsibility(&conn, &u2.id, &o2.id).unwrap();

        Self {
            dir,
            settings,
            conn,
            o1,
            o2,
            u1,
            u2,
            loner,
        }
    }

    pub fn ctx(&self) -> RequestContext {
        self.settings.request_context()
    }

    /// Tender owned by `o1`, created by `user1`
    pub fn tender(&mut self) -> Tender {
        let ctx = self.ctx();
        tender_create(
            &mut self.conn,
            &ctx,
            &NewTender {
                name: "Road works".to_string(),
                description: "Resurface the ring road".to_string(),
                service_type: ServiceType::Construction,
                organization_id: self.o1.id.clone(),
                creator_username: "user1".to_string(),
            },
        )
        .unwrap()
    }

    /// Bid by `user2` on `tender`
    pub fn bid(&mut self, tender: &Tender) -> Bid {
        let ctx = self.ctx();
        let author_id = self.u2.id.clone();
        bid_create(
            &mut self.conn,
            &ctx,
            &NewBid {
                name: "Asphalt offer".to_string(),
                description: "Two weeks, fixed price".to_string(),
                tender_id: tender.id.clone(),
                author_type: AuthorType::User,
                author_id,
                creator_username: "user2".to_string(),
            },
        )
        .unwrap()
    }
}
