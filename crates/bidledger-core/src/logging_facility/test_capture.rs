//! In-memory capture of log events for test assertions
//!
//! The capture subscriber is process-global. Tests running in parallel share
//! it, so assertions should narrow by operation name or request id.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, OnceLock};
use tracing::field::{Field, Visit};
use tracing::{Level, Subscriber};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::Layer;

use bidledger_core_types::schema::{
    EVENT_END, EVENT_END_ERROR, EVENT_START, FIELD_ERR_CODE, FIELD_EVENT, FIELD_OP,
    FIELD_REQUEST_ID,
};

/// One recorded event, fields rendered as strings
#[derive(Clone, Debug)]
pub struct CapturedEvent {
    pub level: Level,
    pub fields: BTreeMap<String, String>,
}

impl CapturedEvent {
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    pub fn op(&self) -> Option<&str> {
        self.field(FIELD_OP)
    }

    pub fn event(&self) -> Option<&str> {
        self.field(FIELD_EVENT)
    }

    pub fn request_id(&self) -> Option<&str> {
        self.field(FIELD_REQUEST_ID)
    }

    pub fn err_code(&self) -> Option<&str> {
        self.field(FIELD_ERR_CODE)
    }
}

#[derive(Default)]
struct FieldRecorder(BTreeMap<String, String>);

impl FieldRecorder {
    fn put(&mut self, field: &Field, value: String) {
        self.0.insert(field.name().to_string(), value);
    }
}

impl Visit for FieldRecorder {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        self.put(field, format!("{value:?}"));
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.put(field, value.to_string());
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.put(field, value.to_string());
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.put(field, value.to_string());
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.put(field, value.to_string());
    }
}

struct CaptureLayer {
    sink: Arc<Mutex<Vec<CapturedEvent>>>,
}

impl<S> Layer<S> for CaptureLayer
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        let mut recorder = FieldRecorder::default();
        event.record(&mut recorder);
        let captured = CapturedEvent {
            level: *event.metadata().level(),
            fields: recorder.0,
        };
        if let Ok(mut sink) = self.sink.lock() {
            sink.push(captured);
        }
    }
}

/// Shared handle over the captured events
#[derive(Clone)]
pub struct TestCapture {
    sink: Arc<Mutex<Vec<CapturedEvent>>>,
}

impl TestCapture {
    pub fn events(&self) -> Vec<CapturedEvent> {
        self.sink.lock().map(|e| e.clone()).unwrap_or_default()
    }

    /// Events emitted under operation `op`
    pub fn events_for_op(&self, op: &str) -> Vec<CapturedEvent> {
        self.events()
            .into_iter()
            .filter(|e| e.op() == Some(op))
            .collect()
    }

    /// Events tagged with `request_id`
    pub fn events_for_request(&self, request_id: &str) -> Vec<CapturedEvent> {
        self.events()
            .into_iter()
            .filter(|e| e.request_id() == Some(request_id))
            .collect()
    }

    /// # Panics
    /// When no event matches `op` and `event`.
    pub fn assert_event_exists(&self, op: &str, event: &str) {
        let matching = self
            .events_for_op(op)
            .iter()
            .filter(|e| e.event() == Some(event))
            .count();
        assert!(matching > 0, "no '{event}' event captured for op '{op}'");
    }

    /// Assert the request produced a start event followed by a clean end.
    ///
    /// # Panics
    /// When either event is missing, out of order, or an error was logged.
    pub fn assert_completed(&self, request_id: &str) {
        let events: Vec<String> = self
            .events_for_request(request_id)
            .iter()
            .filter_map(|e| e.event().map(str::to_string))
            .collect();
        assert_eq!(
            events,
            vec![EVENT_START.to_string(), EVENT_END.to_string()],
            "request {request_id} did not complete cleanly"
        );
    }

    /// Assert the request ended in an error event carrying `code`.
    ///
    /// # Panics
    /// When no such error event exists for the request.
    pub fn assert_failed_with(&self, request_id: &str, code: &str) {
        let found = self.events_for_request(request_id).iter().any(|e| {
            e.event() == Some(EVENT_END_ERROR) && e.err_code() == Some(code)
        });
        assert!(found, "request {request_id} has no error event with code {code}");
    }

    pub fn clear(&self) {
        if let Ok(mut sink) = self.sink.lock() {
            sink.clear();
        }
    }
}

static GLOBAL_CAPTURE: OnceLock<TestCapture> = OnceLock::new();

/// Install the capture subscriber once and return a handle to it.
///
/// ```
/// use bidledger_core::logging_facility::init_test_capture;
/// use bidledger_core::log_op_start;
///
/// let capture = init_test_capture();
/// log_op_start!("tender_status");
/// capture.assert_event_exists("tender_status", "start");
/// ```
pub fn init_test_capture() -> TestCapture {
    GLOBAL_CAPTURE
        .get_or_init(|| {
            let sink = Arc::new(Mutex::new(Vec::new()));
            let layer = CaptureLayer { sink: sink.clone() };
            // Another subscriber may already be global; capture then stays empty.
            let _ = tracing_subscriber::registry().with(layer).try_init();
            TestCapture { sink }
        })
        .clone()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_accessors() {
        let mut fields = BTreeMap::new();
        fields.insert("op".to_string(), "bid_edit".to_string());
        fields.insert("event".to_string(), "end_error".to_string());
        fields.insert("err.code".to_string(), "ERR_FORBIDDEN".to_string());
        let event = CapturedEvent {
            level: Level::ERROR,
            fields,
        };

        assert_eq!(event.op(), Some("bid_edit"));
        assert_eq!(event.err_code(), Some("ERR_FORBIDDEN"));
        assert_eq!(event.request_id(), None);
    }
}
