pub mod bid;
pub mod feedback;
pub mod history;
pub mod labels;
pub mod membership;
pub mod tender;

use serde::{Deserialize, Serialize};
use std::fmt;

pub use bid::{Bid, BidPatch, NewBid};
pub use feedback::Feedback;
pub use history::HistoryRecord;
pub use labels::{AuthorType, BidDecision, BidStatus, ServiceType, TenderStatus};
pub use membership::OrganizationMembership;
pub use tender::{NewTender, Tender, TenderPatch};

/// The two versioned record families
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Tender,
    Bid,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKind::Tender => f.write_str("Tender"),
            EntityKind::Bid => f.write_str("Bid"),
        }
    }
}

/// Fresh record identifier (UUID v7, time-ordered)
pub fn new_record_id() -> String {
    uuid::Uuid::now_v7().to_string()
}
