// src/internal/logger/encoder.rs

use std::fmt;

use serde_json::{Map, Value};
use tracing::{Event, Subscriber};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::registry::LookupSpan;

use super::record::EventRecord;

/// ISO-8601 with milliseconds and numeric offset
pub const TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f%z";

/// Names of the fixed elements of every JSON record. An empty name omits
/// the element from the output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncoderConfig {
    pub time_key: String,
    pub level_key: String,
    pub name_key: String,
    pub caller_key: String,
    pub message_key: String,
    pub stacktrace_key: String,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            time_key: "@timestamp".to_string(),
            level_key: "level".to_string(),
            name_key: "logger".to_string(),
            caller_key: "caller".to_string(),
            message_key: "msg".to_string(),
            stacktrace_key: "stacktrace".to_string(),
        }
    }
}

/// Writes each event as one JSON object per line
#[derive(Debug, Clone, Default)]
pub struct JsonEncoder {
    config: EncoderConfig,
}

impl JsonEncoder {
    pub fn new(config: EncoderConfig) -> Self {
        Self { config }
    }

    pub(crate) fn encode(&self, record: &EventRecord) -> String {
        let cfg = &self.config;
        let mut object = Map::new();

        put(
            &mut object,
            &cfg.time_key,
            Value::String(record.time().format(TIME_FORMAT).to_string()),
        );
        put(
            &mut object,
            &cfg.level_key,
            Value::String(record.level().as_str().to_string()),
        );
        if let Some(name) = &record.logger {
            put(&mut object, &cfg.name_key, Value::String(name.clone()));
        }
        if let Some(caller) = &record.caller {
            put(&mut object, &cfg.caller_key, Value::String(caller.clone()));
        }
        put(
            &mut object,
            &cfg.message_key,
            Value::String(record.message.clone()),
        );

        // Structured fields never replace the fixed elements above.
        for (key, value) in &record.fields {
            if !object.contains_key(key) {
                object.insert(key.clone(), value.clone());
            }
        }

        if let Some(stack) = &record.stacktrace {
            put(&mut object, &cfg.stacktrace_key, Value::String(stack.clone()));
        }

        Value::Object(object).to_string()
    }
}

fn put(object: &mut Map<String, Value>, key: &str, value: Value) {
    if !key.is_empty() {
        object.insert(key.to_string(), value);
    }
}

impl<S, N> FormatEvent<S, N> for JsonEncoder
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let record = EventRecord::from_event(event);
        writeln!(writer, "{}", self.encode(&record))
    }
}
