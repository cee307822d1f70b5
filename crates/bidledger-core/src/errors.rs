use bidledger_core_types::{RequestId, TraceId};
use thiserror::Error;

use crate::model::EntityKind;

/// Result type alias using LedgerError
pub type Result<T> = std::result::Result<T, LedgerError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Every failure that crosses the engine boundary is one of these kinds.
/// The transport layer chooses the wire representation per kind; the core
/// only guarantees the kind is correct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpErrorKind {
    /// Entity, version or referenced record absent
    NotFound,
    /// Identity cannot be resolved
    Unauthorized,
    /// Identity resolved but lacks organizational responsibility
    Forbidden,
    /// Requested status not reachable from the current status
    InvalidTransition,
    /// Malformed or empty input
    ValidationError,
    /// Transaction could not commit; retryable by the caller
    StorageFailure,
}

impl OpErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            OpErrorKind::NotFound => "ERR_NOT_FOUND",
            OpErrorKind::Unauthorized => "ERR_UNAUTHORIZED",
            OpErrorKind::Forbidden => "ERR_FORBIDDEN",
            OpErrorKind::InvalidTransition => "ERR_INVALID_TRANSITION",
            OpErrorKind::ValidationError => "ERR_VALIDATION",
            OpErrorKind::StorageFailure => "ERR_STORAGE_FAILURE",
        }
    }

    /// Only storage failures may be retried, and only by the caller.
    pub fn is_retryable(&self) -> bool {
        matches!(self, OpErrorKind::StorageFailure)
    }
}

/// Canonical structured error type
///
/// Carries the classification used for programmatic handling plus the
/// context (operation, entity, version, request) needed for debugging.
#[derive(Debug, Clone)]
pub struct OpError {
    kind: OpErrorKind,
    op: Option<String>,
    entity_id: Option<String>,
    version: Option<u32>,
    request_id: Option<RequestId>,
    trace_id: Option<TraceId>,
    message: String,
}

impl OpError {
    /// Create a new error with the specified kind
    pub fn new(kind: OpErrorKind) -> Self {
        Self {
            kind,
            op: None,
            entity_id: None,
            version: None,
            request_id: None,
            trace_id: None,
            message: String::new(),
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add entity ID context
    pub fn with_entity_id(mut self, id: impl Into<String>) -> Self {
        self.entity_id = Some(id.into());
        self
    }

    /// Add version context
    pub fn with_version(mut self, version: u32) -> Self {
        self.version = Some(version);
        self
    }

    /// Add request ID context
    pub fn with_request_id(mut self, request_id: RequestId) -> Self {
        self.request_id = Some(request_id);
        self
    }

    /// Add trace ID context
    pub fn with_trace_id(mut self, trace_id: TraceId) -> Self {
        self.trace_id = Some(trace_id);
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> OpErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Get the operation context, if any
    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    /// Get the entity ID context, if any
    pub fn entity_id(&self) -> Option<&str> {
        self.entity_id.as_deref()
    }

    /// Get the version context, if any
    pub fn version(&self) -> Option<u32> {
        self.version
    }

    /// Get the request ID context, if any
    pub fn request_id(&self) -> Option<&RequestId> {
        self.request_id.as_ref()
    }

    /// Get the trace ID context, if any
    pub fn trace_id(&self) -> Option<&TraceId> {
        self.trace_id.as_ref()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for OpError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(entity_id) = &self.entity_id {
            write!(f, " (entity_id: {})", entity_id)?;
        }
        if let Some(version) = self.version {
            write!(f, " (version: {})", version)?;
        }
        if let Some(request_id) = &self.request_id {
            write!(f, " (request_id: {})", request_id)?;
        }
        Ok(())
    }
}

impl std::error::Error for OpError {}

// ========== End Error Facility ==========

/// Domain failures raised by the core and mapped onto [`OpErrorKind`]
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LedgerError {
    // ===== Lookup Errors =====
    #[error("Tender not found: {tender_id}")]
    TenderNotFound { tender_id: String },

    #[error("Bid not found: {bid_id}")]
    BidNotFound { bid_id: String },

    /// No history record exists for the requested version
    #[error("{kind} {entity_id} has no recorded version {version}")]
    VersionNotFound {
        kind: EntityKind,
        entity_id: String,
        version: u32,
    },

    // ===== Authorization Errors =====
    /// Username has no matching identity
    #[error("No identity for username: {username}")]
    IdentityNotFound { username: String },

    /// Bid author identity does not exist
    #[error("Bid author does not exist: {author_id}")]
    AuthorNotFound { author_id: String },

    /// Identity exists but holds no organization membership
    #[error("Identity {identity_id} is not responsible for any organization")]
    NoMembership { identity_id: String },

    /// Identity's organization differs from the entity's owning organization
    #[error("Identity {identity_id} is not responsible for {kind} {entity_id}")]
    NotResponsible {
        identity_id: String,
        kind: EntityKind,
        entity_id: String,
    },

    /// Identity is not responsible for the named organization
    #[error("Identity {identity_id} is not responsible for organization {organization_id}")]
    NotResponsibleForOrganization {
        identity_id: String,
        organization_id: String,
    },

    // ===== Lifecycle Errors =====
    #[error("Invalid {kind} status transition: {from} -> {to}")]
    InvalidTransition {
        kind: EntityKind,
        from: String,
        to: String,
    },

    // ===== Validation Errors =====
    /// Partial update supplied no fields
    #[error("Update for {entity_id} supplies no fields")]
    EmptyPatch { entity_id: String },

    #[error("Invalid field '{field}': {reason}")]
    InvalidField { field: String, reason: String },

    /// Label outside the closed vocabulary
    #[error("Unknown {vocabulary} label: {value}")]
    UnknownLabel { vocabulary: String, value: String },

    // ===== Storage Errors =====
    #[error("Storage failure: {message}")]
    Storage { message: String },

    /// Request deadline passed before the transaction committed
    #[error("Request deadline exceeded; transaction aborted")]
    DeadlineExceeded,
}

impl LedgerError {
    /// The operation error kind this failure maps to
    pub fn kind(&self) -> OpErrorKind {
        match self {
            LedgerError::TenderNotFound { .. }
            | LedgerError::BidNotFound { .. }
            | LedgerError::VersionNotFound { .. } => OpErrorKind::NotFound,
            LedgerError::IdentityNotFound { .. } | LedgerError::AuthorNotFound { .. } => {
                OpErrorKind::Unauthorized
            }
            LedgerError::NoMembership { .. }
            | LedgerError::NotResponsible { .. }
            | LedgerError::NotResponsibleForOrganization { .. } => OpErrorKind::Forbidden,
            LedgerError::InvalidTransition { .. } => OpErrorKind::InvalidTransition,
            LedgerError::EmptyPatch { .. }
            | LedgerError::InvalidField { .. }
            | LedgerError::UnknownLabel { .. } => OpErrorKind::ValidationError,
            LedgerError::Storage { .. } | LedgerError::DeadlineExceeded => {
                OpErrorKind::StorageFailure
            }
        }
    }

    fn entity_id(&self) -> Option<&str> {
        match self {
            LedgerError::TenderNotFound { tender_id } => Some(tender_id),
            LedgerError::BidNotFound { bid_id } => Some(bid_id),
            LedgerError::VersionNotFound { entity_id, .. }
            | LedgerError::NotResponsible { entity_id, .. }
            | LedgerError::EmptyPatch { entity_id } => Some(entity_id),
            _ => None,
        }
    }
}

impl From<LedgerError> for OpError {
    fn from(err: LedgerError) -> Self {
        let mut ex = OpError::new(err.kind()).with_message(err.to_string());
        if let Some(entity_id) = err.entity_id() {
            ex = ex.with_entity_id(entity_id);
        }
        if let LedgerError::VersionNotFound { version, .. } = err {
            ex = ex.with_version(version);
        }
        ex
    }
}
