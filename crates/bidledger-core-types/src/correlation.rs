//! Request correlation and deadlines
//!
//! A [`RequestContext`] travels from the caller into every store transaction.
//! Its ids tag log lines and errors; its deadline stops an abandoned request
//! from committing.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{Duration, Instant};
use uuid::Uuid;

macro_rules! correlation_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Fresh time-ordered id (UUID v7)
            pub fn new() -> Self {
                Self(Uuid::now_v7().to_string())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

correlation_id!(
    /// Identifies one inbound request; every log line it causes carries it
    RequestId
);

correlation_id!(
    /// Caller-supplied id spanning several requests
    TraceId
);

/// Context carried from the inbound request into the store
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    pub request_id: RequestId,
    pub trace_id: Option<TraceId>,
    /// Point in time after which the request's transaction must not commit
    pub deadline: Option<Instant>,
}

impl RequestContext {
    /// Fresh request id, no trace, no deadline
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_request_id(mut self, request_id: impl Into<RequestId>) -> Self {
        self.request_id = request_id.into();
        self
    }

    pub fn with_trace_id(mut self, trace_id: impl Into<TraceId>) -> Self {
        self.trace_id = Some(trace_id.into());
        self
    }

    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Deadline `timeout` from now
    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    /// Time left before the deadline; `None` without a deadline.
    pub fn remaining(&self) -> Option<Duration> {
        self.deadline
            .map(|deadline| deadline.saturating_duration_since(Instant::now()))
    }

    /// A context without a deadline never expires.
    pub fn is_expired(&self) -> bool {
        self.remaining().is_some_and(|left| left.is_zero())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_unique_and_displayable() {
        let a = RequestId::new();
        let b = RequestId::new();
        assert_ne!(a, b);
        assert_eq!(a.to_string(), a.as_str());
    }

    #[test]
    fn test_ids_serialize_as_plain_strings() {
        let id = TraceId::from("trace-7");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"trace-7\"");
        let back: TraceId = serde_json::from_str("\"trace-7\"").unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn test_context_without_deadline_never_expires() {
        let ctx = RequestContext::new();
        assert!(ctx.trace_id.is_none());
        assert!(ctx.remaining().is_none());
        assert!(!ctx.is_expired());
    }

    #[test]
    fn test_caller_supplied_ids() {
        let ctx = RequestContext::new()
            .with_request_id("req-1")
            .with_trace_id("trace-1");
        assert_eq!(ctx.request_id.as_str(), "req-1");
        assert_eq!(ctx.trace_id.as_ref().map(TraceId::as_str), Some("trace-1"));
    }

    #[test]
    fn test_deadline_now_is_expired() {
        let ctx = RequestContext::new().with_deadline(Instant::now());
        assert!(ctx.is_expired());
        assert_eq!(ctx.remaining(), Some(Duration::ZERO));
    }

    #[test]
    fn test_generous_timeout_is_not_expired() {
        let ctx = RequestContext::new().with_timeout(Duration::from_secs(3600));
        assert!(!ctx.is_expired());
        assert!(ctx.remaining().unwrap() > Duration::from_secs(3500));
    }
}
