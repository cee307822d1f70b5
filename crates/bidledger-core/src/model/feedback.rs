use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::Result;
use crate::rules::validation::{validate_text, FEEDBACK_MAX_CHARS};

/// Feedback - free-text review attached to a bid; immutable once created
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Feedback {
    pub id: String,
    pub bid_id: String,
    /// Identity that wrote the review
    pub author_id: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

impl Feedback {
    pub fn new(id: String, bid_id: String, author_id: String, description: String) -> Self {
        Self {
            id,
            bid_id,
            author_id,
            description,
            created_at: Utc::now(),
        }
    }
}

/// Validate feedback text before it reaches the store.
///
/// # Errors
/// Returns `InvalidField` when the text is blank or too long.
pub fn validate_feedback_text(text: &str) -> Result<()> {
    validate_text("bidFeedback", text, FEEDBACK_MAX_CHARS)
}
