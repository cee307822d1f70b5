//! Field keys and event names shared by every operation log line
//!
//! Operation macros emit these keys; the test capture reads them back.

pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";
pub const FIELD_REQUEST_ID: &str = "request_id";

// Record identifiers carried by tender and bid operations
pub const FIELD_TENDER_ID: &str = "tender_id";
pub const FIELD_BID_ID: &str = "bid_id";
pub const FIELD_VERSION: &str = "version";
pub const FIELD_USERNAME: &str = "username";

pub const FIELD_ERR_KIND: &str = "err.kind";
pub const FIELD_ERR_CODE: &str = "err.code";
pub const FIELD_ERR_MESSAGE: &str = "err.message";

pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_names_are_distinct() {
        assert_ne!(EVENT_START, EVENT_END);
        assert_ne!(EVENT_START, EVENT_END_ERROR);
        assert_ne!(EVENT_END, EVENT_END_ERROR);
    }

    #[test]
    fn test_error_fields_share_prefix() {
        for key in [FIELD_ERR_KIND, FIELD_ERR_CODE, FIELD_ERR_MESSAGE] {
            assert!(key.starts_with("err."), "{key}");
        }
    }
}
