use crate::errors::{LedgerError, Result};

/// Maximum length, in characters, of a tender or bid name
pub const NAME_MAX_CHARS: usize = 100;
/// Maximum length, in characters, of a tender or bid description
pub const DESCRIPTION_MAX_CHARS: usize = 500;
/// Maximum length, in characters, of a feedback text
pub const FEEDBACK_MAX_CHARS: usize = 1000;
/// Maximum length, in characters, of an identifier or username
pub const IDENTIFIER_MAX_CHARS: usize = 100;

/// Validate a free-text field: non-blank and at most `max_chars` characters.
///
/// # Errors
/// Returns `InvalidField` naming `field` when the value is blank or too long.
pub fn validate_text(field: &str, value: &str, max_chars: usize) -> Result<()> {
    if value.trim().is_empty() {
        return Err(LedgerError::InvalidField {
            field: field.to_string(),
            reason: "must not be empty".to_string(),
        });
    }

    let len = value.chars().count();
    if len > max_chars {
        return Err(LedgerError::InvalidField {
            field: field.to_string(),
            reason: format!("must be at most {} characters, got {}", max_chars, len),
        });
    }

    Ok(())
}

/// Validate an identifier or username reference.
///
/// # Errors
/// Returns `InvalidField` when the value is blank, too long, or contains whitespace.
pub fn validate_identifier(field: &str, value: &str) -> Result<()> {
    validate_text(field, value, IDENTIFIER_MAX_CHARS)?;

    if value.chars().any(char::is_whitespace) {
        return Err(LedgerError::InvalidField {
            field: field.to_string(),
            reason: "must not contain whitespace".to_string(),
        });
    }

    Ok(())
}

/// Validate a rollback target version.
///
/// # Errors
/// Returns `InvalidField` for version 0; versions start at 1.
pub fn validate_version(version: u32) -> Result<()> {
    if version == 0 {
        return Err(LedgerError::InvalidField {
            field: "version".to_string(),
            reason: "versions start at 1".to_string(),
        });
    }
    Ok(())
}
