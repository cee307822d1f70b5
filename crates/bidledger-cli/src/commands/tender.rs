//! Tender commands

use bidledger_core::model::{NewTender, ServiceType, TenderPatch, TenderStatus};
use bidledger_engine::commands::tender::{
    tender_change_status, tender_create, tender_edit, tender_history, tender_rollback,
    tender_status,
};
use bidledger_engine::Settings;
use clap::{Args, Subcommand};
use serde_json::json;

use super::{parse_label, print_json};
use crate::error::CliError;

#[derive(Debug, Args)]
pub struct TenderArgs {
    /// Acting username
    #[arg(long, short = 'u', global = true)]
    pub username: Option<String>,

    #[command(subcommand)]
    pub command: TenderCommand,
}

#[derive(Debug, Subcommand)]
pub enum TenderCommand {
    /// Create a tender in status Created
    Create(CreateArgs),
    /// Change name, description or service type
    Edit(EditArgs),
    /// Print the current status
    Status { tender_id: String },
    /// Move to another status (Published, Closed, Canceled)
    SetStatus { tender_id: String, status: String },
    /// Restore the live row to an earlier version
    Rollback { tender_id: String, version: u32 },
    /// List superseded versions, oldest first
    History { tender_id: String },
}

#[derive(Debug, Args)]
pub struct CreateArgs {
    #[arg(long)]
    pub name: String,

    #[arg(long)]
    pub description: String,

    /// Construction, Delivery or Manufacture
    #[arg(long)]
    pub service_type: String,

    #[arg(long)]
    pub organization_id: String,
}

#[derive(Debug, Args)]
pub struct EditArgs {
    pub tender_id: String,

    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub description: Option<String>,

    #[arg(long)]
    pub service_type: Option<String>,
}

pub fn execute(args: TenderArgs, settings: &Settings) -> Result<(), CliError> {
    let username = args
        .username
        .ok_or_else(|| CliError::Usage("--username is required".to_string()))?;
    let mut conn = settings.open_store()?;
    let ctx = settings.request_context();

    match args.command {
        TenderCommand::Create(a) => {
            let request = NewTender {
                name: a.name,
                description: a.description,
                service_type: parse_label::<ServiceType>(&a.service_type)?,
                organization_id: a.organization_id,
                creator_username: username,
            };
            print_json(&tender_create(&mut conn, &ctx, &request)?)
        }
        TenderCommand::Edit(a) => {
            let patch = TenderPatch {
                name: a.name,
                description: a.description,
                service_type: a
                    .service_type
                    .as_deref()
                    .map(parse_label::<ServiceType>)
                    .transpose()?,
                status: None,
            };
            print_json(&tender_edit(&mut conn, &ctx, &a.tender_id, &username, &patch)?)
        }
        TenderCommand::Status { tender_id } => {
            let status = tender_status(&mut conn, &ctx, &tender_id, &username)?;
            print_json(&json!({ "tenderId": tender_id, "status": status }))
        }
        TenderCommand::SetStatus { tender_id, status } => {
            let target = parse_label::<TenderStatus>(&status)?;
            print_json(&tender_change_status(
                &mut conn, &ctx, &tender_id, &username, target,
            )?)
        }
        TenderCommand::Rollback { tender_id, version } => print_json(&tender_rollback(
            &mut conn, &ctx, &tender_id, version, &username,
        )?),
        TenderCommand::History { tender_id } => {
            print_json(&tender_history(&mut conn, &ctx, &tender_id, &username)?)
        }
    }
}
