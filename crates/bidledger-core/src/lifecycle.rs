//! Status state machines for tenders and bids
//!
//! Two independent lookup tables. Nothing here performs I/O or holds state:
//! callers consult [`validate_transition`] before a status change reaches the
//! store.
//!
//! ```text
//! Tender:  Created -> Published -> Closed
//!          Created -> Canceled
//!          Published -> Canceled
//!
//! Bid:     Created -> Published -> { Canceled, Approved, Rejected }
//! ```

use crate::errors::{LedgerError, Result};
use crate::model::{BidStatus, EntityKind, TenderStatus};

/// A closed status vocabulary with a fixed transition table
pub trait Lifecycle: Copy + Eq + std::fmt::Display + 'static {
    const KIND: EntityKind;

    /// Statuses directly reachable from `self`
    fn successors(self) -> &'static [Self];

    fn is_terminal(self) -> bool {
        self.successors().is_empty()
    }

    fn can_transition_to(self, requested: Self) -> bool {
        self.successors().contains(&requested)
    }
}

impl Lifecycle for TenderStatus {
    const KIND: EntityKind = EntityKind::Tender;

    fn successors(self) -> &'static [Self] {
        match self {
            TenderStatus::Created => &[TenderStatus::Published, TenderStatus::Canceled],
            TenderStatus::Published => &[TenderStatus::Closed, TenderStatus::Canceled],
            TenderStatus::Closed | TenderStatus::Canceled => &[],
        }
    }
}

impl Lifecycle for BidStatus {
    const KIND: EntityKind = EntityKind::Bid;

    fn successors(self) -> &'static [Self] {
        match self {
            BidStatus::Created => &[BidStatus::Published],
            BidStatus::Published => &[
                BidStatus::Canceled,
                BidStatus::Approved,
                BidStatus::Rejected,
            ],
            BidStatus::Canceled | BidStatus::Approved | BidStatus::Rejected => &[],
        }
    }
}

/// Check that `requested` is directly reachable from `current`.
///
/// Staying in the same status is not a transition and is rejected.
///
/// # Errors
/// Returns `InvalidTransition` naming both statuses.
pub fn validate_transition<S: Lifecycle>(current: S, requested: S) -> Result<()> {
    if current.can_transition_to(requested) {
        Ok(())
    } else {
        Err(LedgerError::InvalidTransition {
            kind: S::KIND,
            from: current.to_string(),
            to: requested.to_string(),
        })
    }
}
