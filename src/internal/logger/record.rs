// src/internal/logger/record.rs

use std::fmt;

use chrono::{DateTime, Local};
use serde_json::{Map, Value};
use tracing::field::{Field as TracingField, Visit};
use tracing::Event;

use super::level::Level;

/// Target of every event a [`Logger`](super::Logger) dispatches
pub(crate) const EVENT_TARGET: &str = "logctx";

// Names of the fields carried by a dispatched event.
pub(crate) const SEVERITY: &str = "severity";
pub(crate) const TIMESTAMP: &str = "timestamp";
pub(crate) const MESSAGE: &str = "message";
pub(crate) const LOGGER: &str = "logger";
pub(crate) const CALLER: &str = "caller";
pub(crate) const FIELDS: &str = "fields";
pub(crate) const STACKTRACE: &str = "stacktrace";

/// An event read back from `tracing`, shared by the encoder and the hook layer
#[derive(Debug, Default)]
pub(crate) struct EventRecord {
    pub severity: Option<Level>,
    pub timestamp_micros: Option<i64>,
    pub message: String,
    pub logger: Option<String>,
    pub caller: Option<String>,
    pub fields: Map<String, Value>,
    pub stacktrace: Option<String>,
}

impl EventRecord {
    pub fn from_event(event: &Event<'_>) -> Self {
        let mut record = Self::default();
        event.record(&mut record);
        if record.severity.is_none() {
            record.severity = Some(Level::from_tracing(*event.metadata().level()));
        }
        record
    }

    pub fn level(&self) -> Level {
        self.severity.unwrap_or_default()
    }

    pub fn time(&self) -> DateTime<Local> {
        self.timestamp_micros
            .and_then(DateTime::from_timestamp_micros)
            .map(|utc| utc.with_timezone(&Local))
            .unwrap_or_else(Local::now)
    }
}

impl Visit for EventRecord {
    fn record_str(&mut self, field: &TracingField, value: &str) {
        match field.name() {
            SEVERITY => self.severity = value.parse().ok(),
            MESSAGE => self.message = value.to_string(),
            LOGGER => self.logger = Some(value.to_string()),
            CALLER => self.caller = Some(value.to_string()),
            STACKTRACE => self.stacktrace = Some(value.to_string()),
            FIELDS => match serde_json::from_str(value) {
                Ok(Value::Object(map)) => self.fields.extend(map),
                _ => {
                    self.fields
                        .insert(FIELDS.to_string(), Value::String(value.to_string()));
                }
            },
            other => {
                self.fields
                    .insert(other.to_string(), Value::String(value.to_string()));
            }
        }
    }

    fn record_i64(&mut self, field: &TracingField, value: i64) {
        if field.name() == TIMESTAMP {
            self.timestamp_micros = Some(value);
        } else {
            self.fields.insert(field.name().to_string(), value.into());
        }
    }

    fn record_u64(&mut self, field: &TracingField, value: u64) {
        self.fields.insert(field.name().to_string(), value.into());
    }

    fn record_f64(&mut self, field: &TracingField, value: f64) {
        let value = serde_json::Number::from_f64(value)
            .map(Value::Number)
            .unwrap_or_else(|| Value::String(value.to_string()));
        self.fields.insert(field.name().to_string(), value);
    }

    fn record_bool(&mut self, field: &TracingField, value: bool) {
        self.fields.insert(field.name().to_string(), value.into());
    }

    fn record_debug(&mut self, field: &TracingField, value: &dyn fmt::Debug) {
        self.record_str(field, &format!("{:?}", value));
    }
}
