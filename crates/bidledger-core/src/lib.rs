//! bidledger core - domain model and rules for tenders and bids
//!
//! Pure, storage-agnostic building blocks:
//! - Tender, Bid and Feedback records with their closed label vocabularies
//! - Revision arithmetic for versioned records ([`versioned`])
//! - Status state machines ([`lifecycle`])
//! - Identity and organization-responsibility checks ([`auth`])
//! - The error facility shared by every layer ([`errors`])
//!
//! Persistence lives in `bidledger-store`; operations that tie these pieces
//! together live in `bidledger-engine`.

pub mod auth;
pub mod errors;
pub mod lifecycle;
pub mod logging_facility;
pub mod model;
pub mod rules;
pub mod versioned;

pub use auth::{AuthorizationGate, Directory, IdentityId, OrganizationId};
pub use errors::{LedgerError, OpError, OpErrorKind, Result};
pub use lifecycle::{validate_transition, Lifecycle};
pub use model::{
    AuthorType, Bid, BidDecision, BidPatch, BidStatus, EntityKind, Feedback, HistoryRecord,
    NewBid, NewTender, ServiceType, Tender, TenderPatch, TenderStatus,
    new_record_id,
};
pub use versioned::Versioned;
