// src/internal/logger/hooks.rs

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Local};
use serde_json::{Map, Value};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::{Context as LayerContext, Layer};

use super::level::Level;
use super::record::EventRecord;

/// An emitted entry as seen by hooks
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    pub level: Level,
    pub time: DateTime<Local>,
    pub logger_name: Option<String>,
    pub message: String,
    pub caller: Option<String>,
    pub fields: Map<String, Value>,
    pub stack: Option<String>,
}

impl From<EventRecord> for Entry {
    fn from(record: EventRecord) -> Self {
        Self {
            level: record.level(),
            time: record.time(),
            logger_name: record.logger,
            message: record.message,
            caller: record.caller,
            fields: record.fields,
            stack: record.stacktrace,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum HookError {
    #[error("hook failed: {0}")]
    Failed(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl HookError {
    pub fn failed(message: impl Into<String>) -> Self {
        HookError::Failed(message.into())
    }
}

/// Callback run for every entry that passes the level threshold
#[derive(Clone)]
pub struct Hook(Arc<dyn Fn(&Entry) -> Result<(), HookError> + Send + Sync>);

impl Hook {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&Entry) -> Result<(), HookError> + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    pub fn call(&self, entry: &Entry) -> Result<(), HookError> {
        (self.0)(entry)
    }
}

impl fmt::Debug for Hook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Hook(..)")
    }
}

/// Layer running hooks in registration order. Failures go to stderr and
/// never reach the code that logged.
pub(crate) struct HookLayer {
    hooks: Arc<[Hook]>,
}

impl HookLayer {
    pub fn new(hooks: Vec<Hook>) -> Self {
        Self {
            hooks: hooks.into(),
        }
    }
}

impl<S> Layer<S> for HookLayer
where
    S: Subscriber,
{
    fn on_event(&self, event: &Event<'_>, _ctx: LayerContext<'_, S>) {
        if self.hooks.is_empty() {
            return;
        }
        let entry = Entry::from(EventRecord::from_event(event));
        for hook in self.hooks.iter() {
            if let Err(e) = hook.call(&entry) {
                eprintln!("[logctx] hook error on {} entry: {}", entry.level, e);
            }
        }
    }
}
