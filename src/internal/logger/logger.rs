// src/internal/logger/logger.rs

use std::backtrace::Backtrace;
use std::fmt;
use std::panic::Location;
use std::sync::Arc;

use chrono::Utc;
use serde_json::Map;
use tracing::callsite::Callsite;
use tracing::field::Value;
use tracing::{Dispatch, Event, Metadata};
use tracing_subscriber::{fmt as tracing_fmt, layer::SubscriberExt};

use super::encoder::{EncoderConfig, JsonEncoder};
use super::field::Field;
use super::hooks::{Hook, HookLayer};
use super::level::{AtomicLevel, Level};
use super::record::EVENT_TARGET;
use super::sink::Sink;

/// What a fatal entry does once it has been written
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FatalAction {
    /// Exit the process with status 1
    #[default]
    Exit,
    /// Panic with the fatal message, unwinding instead of exiting
    Panic,
}

impl FatalAction {
    fn terminate(self, msg: &str) -> ! {
        match self {
            FatalAction::Exit => std::process::exit(1),
            FatalAction::Panic => panic!("fatal log entry: {}", msg),
        }
    }
}

/// Level threshold plus the `tracing` dispatcher entries are written through
struct Core {
    dispatch: Option<Dispatch>,
    level: AtomicLevel,
    stacktrace_level: Option<Level>,
    fatal_action: FatalAction,
}

impl Core {
    fn enabled(&self, level: Level) -> bool {
        self.dispatch.is_some() && self.level.enabled(level)
    }
}

/// Structured logger handle.
///
/// Cloning is cheap. [`Logger::with`] derives a child carrying extra fields
/// and leaves the parent untouched. Two loggers compare equal when they share
/// the same core and carry the same name and fields.
#[derive(Clone)]
pub struct Logger {
    core: Arc<Core>,
    name: Option<Arc<str>>,
    fields: Arc<[Field]>,
}

impl Logger {
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::default()
    }

    /// Logger that never writes anything. Fatal entries still terminate.
    pub fn nop() -> Self {
        Self::from_core(Core {
            dispatch: None,
            level: AtomicLevel::default(),
            stacktrace_level: None,
            fatal_action: FatalAction::default(),
        })
    }

    fn from_core(core: Core) -> Self {
        Self {
            core: Arc::new(core),
            name: None,
            fields: Arc::from(Vec::new()),
        }
    }

    /// Child logger with `fields` appended to the ones already carried
    pub fn with<I>(&self, fields: I) -> Logger
    where
        I: IntoIterator<Item = Field>,
    {
        let mut merged = self.fields.to_vec();
        merged.extend(fields);
        Logger {
            core: Arc::clone(&self.core),
            name: self.name.clone(),
            fields: merged.into(),
        }
    }

    /// Child logger whose name is `name` appended to the current one with a dot
    pub fn named(&self, name: &str) -> Logger {
        let name: Arc<str> = match &self.name {
            Some(parent) if !name.is_empty() => format!("{}.{}", parent, name).into(),
            Some(parent) => Arc::clone(parent),
            None => name.into(),
        };
        Logger {
            core: Arc::clone(&self.core),
            name: Some(name),
            fields: Arc::clone(&self.fields),
        }
    }

    /// Copy of this logger with a different fatal behavior
    pub fn with_fatal_action(&self, action: FatalAction) -> Logger {
        Logger {
            core: Arc::new(Core {
                dispatch: self.core.dispatch.clone(),
                level: self.core.level.clone(),
                stacktrace_level: self.core.stacktrace_level,
                fatal_action: action,
            }),
            name: self.name.clone(),
            fields: Arc::clone(&self.fields),
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn atomic_level(&self) -> &AtomicLevel {
        &self.core.level
    }

    pub fn enabled(&self, level: Level) -> bool {
        self.core.enabled(level)
    }

    #[track_caller]
    pub fn log(&self, level: Level, msg: &str, fields: &[Field]) {
        if level == Level::Fatal {
            self.fatal(msg, fields);
        }
        self.write(level, msg, fields, Location::caller());
    }

    #[track_caller]
    pub fn debug(&self, msg: &str, fields: &[Field]) {
        self.write(Level::Debug, msg, fields, Location::caller());
    }

    #[track_caller]
    pub fn info(&self, msg: &str, fields: &[Field]) {
        self.write(Level::Info, msg, fields, Location::caller());
    }

    #[track_caller]
    pub fn warn(&self, msg: &str, fields: &[Field]) {
        self.write(Level::Warn, msg, fields, Location::caller());
    }

    #[track_caller]
    pub fn error(&self, msg: &str, fields: &[Field]) {
        self.write(Level::Error, msg, fields, Location::caller());
    }

    /// Writes the entry, then terminates according to the logger's
    /// [`FatalAction`], whether or not the entry passed the threshold.
    #[track_caller]
    pub fn fatal(&self, msg: &str, fields: &[Field]) -> ! {
        self.write(Level::Fatal, msg, fields, Location::caller());
        self.core.fatal_action.terminate(msg)
    }

    fn write(&self, level: Level, msg: &str, fields: &[Field], location: &Location<'_>) {
        if !self.core.enabled(level) {
            return;
        }
        let Some(dispatch) = &self.core.dispatch else {
            return;
        };

        let mut merged = Map::new();
        for field in self.fields.iter().chain(fields) {
            merged.insert(field.key().to_string(), field.value().clone());
        }
        let encoded_fields =
            (!merged.is_empty()).then(|| serde_json::Value::Object(merged).to_string());

        let stacktrace = self
            .core
            .stacktrace_level
            .filter(|threshold| level >= *threshold)
            .map(|_| Backtrace::force_capture().to_string());

        let caller = short_caller(location);
        let caller = caller.as_str();
        let severity = level.as_str();
        let timestamp = Utc::now().timestamp_micros();
        let logger = self.name.as_deref();
        let fields = encoded_fields.as_deref();
        let stacktrace = stacktrace.as_deref();

        // Dispatched straight to this logger's subscriber; the thread-local
        // default stays untouched so hooks and outer layers may log again.
        let meta = event_metadata(level);
        if !dispatch.enabled(meta) {
            return;
        }
        let field_set = meta.fields();
        let names: Vec<tracing::field::Field> = field_set.iter().collect();
        let [severity_f, timestamp_f, message_f, logger_f, caller_f, fields_f, stacktrace_f] =
            names.as_slice()
        else {
            return;
        };
        let entries = [
            (severity_f, Some(&severity as &dyn Value)),
            (timestamp_f, Some(&timestamp as &dyn Value)),
            (message_f, Some(&msg as &dyn Value)),
            (logger_f, Some(&logger as &dyn Value)),
            (caller_f, Some(&caller as &dyn Value)),
            (fields_f, Some(&fields as &dyn Value)),
            (stacktrace_f, Some(&stacktrace as &dyn Value)),
        ];
        let values = field_set.value_set(&entries);
        dispatch.event(&Event::new(meta, &values));
    }
}

macro_rules! entry_callsite {
    ($level:expr) => {{
        let callsite = tracing::callsite! {
            name: "logctx entry",
            kind: tracing::metadata::Kind::EVENT,
            target: EVENT_TARGET,
            level: $level,
            fields: severity, timestamp, message, logger, caller, fields, stacktrace
        };
        callsite.metadata()
    }};
}

/// Fatal has no `tracing` counterpart; it travels as ERROR and the severity
/// field carries the real level.
fn event_metadata(level: Level) -> &'static Metadata<'static> {
    match level {
        Level::Debug => entry_callsite!(tracing::Level::DEBUG),
        Level::Info => entry_callsite!(tracing::Level::INFO),
        Level::Warn => entry_callsite!(tracing::Level::WARN),
        Level::Error | Level::Fatal => entry_callsite!(tracing::Level::ERROR),
    }
}

/// `dir/file.rs:line`
fn short_caller(location: &Location<'_>) -> String {
    let file = location.file();
    let is_sep = |c: char| c == '/' || c == '\\';
    let short = match file.rfind(is_sep) {
        Some(last) => match file[..last].rfind(is_sep) {
            Some(prev) => &file[prev + 1..],
            None => file,
        },
        None => file,
    };
    format!("{}:{}", short, location.line())
}

impl PartialEq for Logger {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.core, &other.core)
            && self.name == other.name
            && self.fields == other.fields
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("name", &self.name)
            .field("level", &self.core.level)
            .field("fields", &self.fields)
            .field("nop", &self.core.dispatch.is_none())
            .finish()
    }
}

/// Assembles a [`Logger`] and the `tracing` subscriber behind it
#[derive(Debug)]
pub struct LoggerBuilder {
    level: AtomicLevel,
    sink: Sink,
    encoder: EncoderConfig,
    hooks: Vec<Hook>,
    stacktrace_level: Option<Level>,
    fatal_action: FatalAction,
    name: Option<String>,
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self {
            level: AtomicLevel::default(),
            sink: Sink::default(),
            encoder: EncoderConfig::default(),
            hooks: Vec::new(),
            stacktrace_level: Some(Level::Fatal),
            fatal_action: FatalAction::default(),
            name: None,
        }
    }
}

impl LoggerBuilder {
    /// Threshold to share; later `set_level` calls on it apply to the built logger
    pub fn level(mut self, level: AtomicLevel) -> Self {
        self.level = level;
        self
    }

    pub fn sink(mut self, sink: Sink) -> Self {
        self.sink = sink;
        self
    }

    pub fn encoder(mut self, encoder: EncoderConfig) -> Self {
        self.encoder = encoder;
        self
    }

    pub fn hooks<I>(mut self, hooks: I) -> Self
    where
        I: IntoIterator<Item = Hook>,
    {
        self.hooks.extend(hooks);
        self
    }

    /// Entries at or above this level carry a stack trace; `None` disables it
    pub fn stacktrace_level(mut self, level: Option<Level>) -> Self {
        self.stacktrace_level = level;
        self
    }

    pub fn fatal_action(mut self, action: FatalAction) -> Self {
        self.fatal_action = action;
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn build(self) -> Logger {
        let fmt_layer = tracing_fmt::layer()
            .with_ansi(false)
            .event_format(JsonEncoder::new(self.encoder))
            .with_writer(self.sink.make_writer());

        let subscriber = tracing_subscriber::registry()
            .with(fmt_layer)
            .with(HookLayer::new(self.hooks));

        let mut logger = Logger::from_core(Core {
            dispatch: Some(Dispatch::new(subscriber)),
            level: self.level,
            stacktrace_level: self.stacktrace_level,
            fatal_action: self.fatal_action,
        });
        if let Some(name) = self.name {
            logger.name = Some(name.into());
        }
        logger
    }
}
