//! Bid commands, decisions and feedback

use bidledger_core::errors::LedgerError;
use bidledger_core::model::{AuthorType, BidDecision, BidPatch, BidStatus, NewBid};
use bidledger_engine::commands::bid::{
    bid_change_status, bid_create, bid_edit, bid_history, bid_record_decision, bid_rollback,
    bid_status,
};
use bidledger_engine::commands::review::{bid_attach_feedback, bid_reviews};
use bidledger_engine::Settings;
use bidledger_store::DirectoryRepo;
use clap::{Args, Subcommand};
use serde_json::json;

use super::{parse_label, print_json};
use crate::error::CliError;

#[derive(Debug, Args)]
pub struct BidArgs {
    /// Acting username
    #[arg(long, short = 'u', global = true)]
    pub username: Option<String>,

    #[command(subcommand)]
    pub command: BidCommand,
}

#[derive(Debug, Subcommand)]
pub enum BidCommand {
    /// Submit a bid against a tender
    Create(CreateArgs),
    /// Change name or description
    Edit(EditArgs),
    /// Print the current status
    Status { bid_id: String },
    /// Publish or cancel a bid
    SetStatus { bid_id: String, status: String },
    /// Approve or reject a published bid on behalf of the tender's organization
    Decide { bid_id: String, decision: String },
    /// Restore the live row to an earlier version
    Rollback { bid_id: String, version: u32 },
    /// List superseded versions, oldest first
    History { bid_id: String },
    /// Leave review text on a bid
    Feedback(FeedbackArgs),
    /// Reviews left on an author's bids, seen from a tender
    Reviews(ReviewsArgs),
}

#[derive(Debug, Args)]
pub struct CreateArgs {
    #[arg(long)]
    pub name: String,

    #[arg(long)]
    pub description: String,

    #[arg(long)]
    pub tender_id: String,

    /// Organization or User
    #[arg(long, default_value = "User")]
    pub author_type: String,

    /// Author identity or organization id; defaults to the acting user
    #[arg(long)]
    pub author_id: Option<String>,
}

#[derive(Debug, Args)]
pub struct EditArgs {
    pub bid_id: String,

    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub description: Option<String>,
}

#[derive(Debug, Args)]
pub struct FeedbackArgs {
    pub bid_id: String,

    #[arg(long)]
    pub text: String,
}

#[derive(Debug, Args)]
pub struct ReviewsArgs {
    pub tender_id: String,

    /// Username of the bid author whose reviews are listed
    #[arg(long)]
    pub author: String,
}

pub fn execute(args: BidArgs, settings: &Settings) -> Result<(), CliError> {
    let username = args
        .username
        .ok_or_else(|| CliError::Usage("--username is required".to_string()))?;
    let mut conn = settings.open_store()?;
    let ctx = settings.request_context();

    match args.command {
        BidCommand::Create(a) => {
            let author_id = match a.author_id {
                Some(id) => id,
                None => DirectoryRepo::employee_by_username(&conn, &username)?
                    .map(|employee| employee.id)
                    .ok_or_else(|| LedgerError::IdentityNotFound {
                        username: username.clone(),
                    })?,
            };
            let request = NewBid {
                name: a.name,
                description: a.description,
                tender_id: a.tender_id,
                author_type: parse_label::<AuthorType>(&a.author_type)?,
                author_id,
                creator_username: username,
            };
            print_json(&bid_create(&mut conn, &ctx, &request)?)
        }
        BidCommand::Edit(a) => {
            let patch = BidPatch {
                name: a.name,
                description: a.description,
                status: None,
            };
            print_json(&bid_edit(&mut conn, &ctx, &a.bid_id, &username, &patch)?)
        }
        BidCommand::Status { bid_id } => {
            let status = bid_status(&mut conn, &ctx, &bid_id, &username)?;
            print_json(&json!({ "bidId": bid_id, "status": status }))
        }
        BidCommand::SetStatus { bid_id, status } => {
            let target = parse_label::<BidStatus>(&status)?;
            print_json(&bid_change_status(
                &mut conn, &ctx, &bid_id, &username, target,
            )?)
        }
        BidCommand::Decide { bid_id, decision } => {
            let decision = parse_label::<BidDecision>(&decision)?;
            print_json(&bid_record_decision(
                &mut conn, &ctx, &bid_id, &username, decision,
            )?)
        }
        BidCommand::Rollback { bid_id, version } => print_json(&bid_rollback(
            &mut conn, &ctx, &bid_id, version, &username,
        )?),
        BidCommand::History { bid_id } => {
            print_json(&bid_history(&mut conn, &ctx, &bid_id, &username)?)
        }
        BidCommand::Feedback(a) => print_json(&bid_attach_feedback(
            &mut conn, &ctx, &a.bid_id, &username, &a.text,
        )?),
        BidCommand::Reviews(a) => print_json(&bid_reviews(
            &mut conn, &ctx, &a.tender_id, &a.author, &username,
        )?),
    }
}
