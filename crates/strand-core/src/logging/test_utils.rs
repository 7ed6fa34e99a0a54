//! Capture tracing output in memory for assertions.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::field::{Field, Visit};
use tracing::level_filters::LevelFilter;
use tracing::span::{Attributes, Id};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::Layer;
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;

/// One recorded event.
#[derive(Clone, Debug)]
pub struct CapturedEvent {
    /// Event level.
    pub level: Level,
    /// Module the event came from.
    pub target: String,
    /// Rendered message.
    pub message: String,
    /// Structured fields in recording order.
    pub fields: Vec<(String, String)>,
}

impl CapturedEvent {
    /// Value of a recorded field, if present.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Default)]
struct Captured {
    events: Vec<CapturedEvent>,
    spans: Vec<String>,
}

/// Handle to everything recorded by a [`capture_logs`] subscriber.
#[derive(Clone, Default)]
pub struct CapturedLogs {
    inner: Arc<Mutex<Captured>>,
}

impl CapturedLogs {
    fn lock(&self) -> MutexGuard<'_, Captured> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Recorded events, oldest first.
    pub fn events(&self) -> Vec<CapturedEvent> {
        self.lock().events.clone()
    }

    /// First event whose message contains `needle`.
    pub fn find(&self, needle: &str) -> Option<CapturedEvent> {
        self.lock()
            .events
            .iter()
            .find(|e| e.message.contains(needle))
            .cloned()
    }

    /// Whether an event at `level` mentions `needle`.
    pub fn has_event(&self, level: Level, needle: &str) -> bool {
        self.lock()
            .events
            .iter()
            .any(|e| e.level == level && e.message.contains(needle))
    }

    /// Whether a span named `name` was opened.
    pub fn has_span(&self, name: &str) -> bool {
        self.lock().spans.iter().any(|s| s == name)
    }
}

#[derive(Default)]
struct Fields {
    message: String,
    values: Vec<(String, String)>,
}

impl Fields {
    fn put(&mut self, field: &Field, value: String) {
        if field.name() == "message" {
            self.message = value;
        } else {
            self.values.push((field.name().to_owned(), value));
        }
    }
}

// Numbers and bools fall through to `record_debug`; only strings need
// special handling to avoid debug quoting.
impl Visit for Fields {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        self.put(field, format!("{value:?}"));
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.put(field, value.to_owned());
    }
}

struct CaptureLayer(CapturedLogs);

impl<S: Subscriber> Layer<S> for CaptureLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut fields = Fields::default();
        event.record(&mut fields);
        let meta = event.metadata();
        self.0.lock().events.push(CapturedEvent {
            level: *meta.level(),
            target: meta.target().to_owned(),
            message: fields.message,
            fields: fields.values,
        });
    }

    fn on_new_span(&self, attrs: &Attributes<'_>, _id: &Id, _ctx: Context<'_, S>) {
        self.0.lock().spans.push(attrs.metadata().name().to_owned());
    }
}

/// Install a capturing subscriber for the current thread.
///
/// Keep the guard alive for the duration of the test. Async tests must run
/// on a current-thread runtime for events from spawned tasks to land here.
pub fn capture_logs() -> (CapturedLogs, tracing::subscriber::DefaultGuard) {
    let logs = CapturedLogs::default();
    let guard = tracing_subscriber::registry()
        .with(CaptureLayer(logs.clone()))
        .with(LevelFilter::TRACE)
        .set_default();
    (logs, guard)
}
