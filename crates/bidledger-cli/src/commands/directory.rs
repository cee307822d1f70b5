//! Directory maintenance: employees, organizations, responsibilities

use bidledger_core::errors::LedgerError;
use bidledger_engine::Settings;
use bidledger_store::db::with_immediate;
use bidledger_store::{DirectoryRepo, Employee, Organization};
use clap::{Args, Subcommand};

use super::print_json;
use crate::error::CliError;

#[derive(Debug, Args)]
pub struct DirectoryArgs {
    #[command(subcommand)]
    pub command: DirectoryCommand,
}

#[derive(Debug, Subcommand)]
pub enum DirectoryCommand {
    /// Register an employee
    AddUser(AddUserArgs),
    /// Register an organization
    AddOrg(AddOrgArgs),
    /// Make an employee responsible for an organization
    Grant(GrantArgs),
    /// List organizations
    Orgs,
}

#[derive(Debug, Args)]
pub struct AddUserArgs {
    pub username: String,

    #[arg(long)]
    pub first_name: Option<String>,

    #[arg(long)]
    pub last_name: Option<String>,
}

#[derive(Debug, Args)]
pub struct AddOrgArgs {
    pub name: String,

    #[arg(long)]
    pub description: Option<String>,
}

#[derive(Debug, Args)]
pub struct GrantArgs {
    pub username: String,

    pub organization_id: String,
}

pub fn execute(args: DirectoryArgs, settings: &Settings) -> Result<(), CliError> {
    let mut conn = settings.open_store()?;
    let ctx = settings.request_context();

    match args.command {
        DirectoryCommand::AddUser(a) => {
            let employee = Employee {
                first_name: a.first_name,
                last_name: a.last_name,
                ..Employee::new(a.username)
            };
            with_immediate(&mut conn, &ctx, |tx| DirectoryRepo::insert_employee(tx, &employee))?;
            print_json(&employee)
        }
        DirectoryCommand::AddOrg(a) => {
            let organization = Organization {
                description: a.description,
                ..Organization::new(a.name)
            };
            with_immediate(&mut conn, &ctx, |tx| {
                DirectoryRepo::insert_organization(tx, &organization)
            })?;
            print_json(&organization)
        }
        DirectoryCommand::Grant(a) => {
            let membership = with_immediate(&mut conn, &ctx, |tx| {
                let employee = DirectoryRepo::employee_by_username(tx, &a.username)?
                    .ok_or_else(|| LedgerError::IdentityNotFound {
                        username: a.username.clone(),
                    })?;
                DirectoryRepo::grant_responsibility(tx, &employee.id, &a.organization_id)
            })?;
            print_json(&membership)
        }
        DirectoryCommand::Orgs => {
            let organizations = DirectoryRepo::list_organizations(&conn)?;
            print_json(&organizations)
        }
    }
}
