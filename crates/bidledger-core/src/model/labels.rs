//! Closed vocabularies persisted and exchanged as human-readable labels
//!
//! Each enum is the single canonical representation of its vocabulary. The
//! label (`"Created"`, `"Published"`, ...) is what the store persists and what
//! crosses the external boundary; parsing is exact and case-sensitive.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::LedgerError;

macro_rules! labelled {
    ($name:ident, $vocabulary:literal, { $($variant:ident => $label:literal),+ $(,)? }) => {
        impl $name {
            /// Every member of the vocabulary, in declaration order
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// The canonical label
            pub fn as_label(&self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_label())
            }
        }

        impl FromStr for $name {
            type Err = LedgerError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($label => Ok($name::$variant),)+
                    other => Err(LedgerError::UnknownLabel {
                        vocabulary: $vocabulary.to_string(),
                        value: other.to_string(),
                    }),
                }
            }
        }
    };
}

/// Tender lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TenderStatus {
    Created,
    Published,
    Closed,
    Canceled,
}

labelled!(TenderStatus, "tender status", {
    Created => "Created",
    Published => "Published",
    Closed => "Closed",
    Canceled => "Canceled",
});

/// Bid lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BidStatus {
    Created,
    Published,
    Canceled,
    Approved,
    Rejected,
}

labelled!(BidStatus, "bid status", {
    Created => "Created",
    Published => "Published",
    Canceled => "Canceled",
    Approved => "Approved",
    Rejected => "Rejected",
});

/// Tender classification tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ServiceType {
    Construction,
    Delivery,
    Manufacture,
}

labelled!(ServiceType, "service type", {
    Construction => "Construction",
    Delivery => "Delivery",
    Manufacture => "Manufacture",
});

/// Whether a bid is authored by a single identity or by an organization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AuthorType {
    Organization,
    User,
}

labelled!(AuthorType, "author type", {
    Organization => "Organization",
    User => "User",
});

/// Decision recorded by the tender's organization on a published bid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BidDecision {
    Approved,
    Rejected,
}

labelled!(BidDecision, "bid decision", {
    Approved => "Approved",
    Rejected => "Rejected",
});

impl BidDecision {
    /// The bid status a decision moves the bid into
    pub fn target_status(&self) -> BidStatus {
        match self {
            BidDecision::Approved => BidStatus::Approved,
            BidDecision::Rejected => BidStatus::Rejected,
        }
    }
}
