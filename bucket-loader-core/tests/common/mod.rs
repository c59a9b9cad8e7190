use std::fmt;
use std::sync::{Arc, Mutex};

use tracing::field::{Field, Visit};
use tracing::Level;
use tracing_subscriber::{layer::Context, Layer};

/// An event as seen by [`EventCollector`]: its level and the names of its fields.
#[derive(Debug, Clone)]
pub struct CapturedEvent {
    pub level: Level,
    pub fields: Vec<String>,
}

impl CapturedEvent {
    pub fn has_field(&self, name: &str) -> bool {
        self.fields.iter().any(|field| field == name)
    }
}

/// Custom Layer to collect emitted events.
#[derive(Clone, Default)]
pub struct EventCollector {
    pub events: Arc<Mutex<Vec<CapturedEvent>>>,
}

impl EventCollector {
    pub fn errors(&self) -> Vec<CapturedEvent> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter(|event| event.level == Level::ERROR)
            .cloned()
            .collect()
    }
}

struct FieldNames(Vec<String>);

impl Visit for FieldNames {
    fn record_debug(&mut self, field: &Field, _value: &dyn fmt::Debug) {
        self.0.push(field.name().to_string());
    }
}

impl<S> Layer<S> for EventCollector
where
    S: tracing::Subscriber,
{
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        let mut names = FieldNames(Vec::new());
        event.record(&mut names);
        self.events.lock().unwrap().push(CapturedEvent {
            level: *event.metadata().level(),
            fields: names.0,
        });
    }
}
