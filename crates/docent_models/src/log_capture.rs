//! Records tracing events emitted while a closure runs.

use std::sync::{Arc, Mutex};

use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

#[derive(Clone, Default)]
pub(crate) struct CapturedEvents(Arc<Mutex<Vec<(Level, String)>>>);

impl CapturedEvents {
    /// Runs `f` with a subscriber that records every event into the returned set.
    pub(crate) fn during<T>(f: impl FnOnce() -> T) -> (T, Self) {
        let captured = Self::default();
        let subscriber = tracing_subscriber::registry().with(captured.clone());
        let output = tracing::subscriber::with_default(subscriber, f);
        (output, captured)
    }

    pub(crate) fn contains(&self, level: Level, needle: &str) -> bool {
        self.0
            .lock()
            .unwrap()
            .iter()
            .any(|(recorded, message)| *recorded == level && message.contains(needle))
    }
}

impl<S: Subscriber> Layer<S> for CapturedEvents {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);
        self.0
            .lock()
            .unwrap()
            .push((*event.metadata().level(), visitor.0));
    }
}

#[derive(Default)]
struct MessageVisitor(String);

impl Visit for MessageVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn core::fmt::Debug) {
        if field.name() == "message" {
            self.0 = format!("{value:?}");
        }
    }
}
