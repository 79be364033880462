// src/internal/settings/mod.rs

//! Process-wide logging state.
//!
//! [`Settings`] owns the shared level threshold, the hook list and the
//! options every default logger is built with. One instance backs the
//! crate-level functions ([`Settings::global`]); separate instances can be
//! created for embedding and tests.
//!
//! Lifecycle: configure the instance (level, sink, hooks) during startup,
//! before any logging begins. `set_level` is safe at any time; hooks
//! registered after a default logger was built are not seen by that logger.

use std::sync::{OnceLock, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::internal::config::LoggingConfig;
use crate::internal::context::Context;
use crate::internal::logger::{
    AtomicLevel, EncoderConfig, FatalAction, Field, Hook, Level, Logger, ParseLevelError,
    Sink,
};

#[derive(Debug, thiserror::Error)]
pub enum ConfigureError {
    #[error("invalid level: {0}")]
    Level(#[from] ParseLevelError),
    #[error("failed to open log output: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, Default)]
struct Defaults {
    name: Option<String>,
    sink: Sink,
    encoder: EncoderConfig,
    stacktrace_level: Option<Level>,
    fatal_action: FatalAction,
}

#[derive(Debug)]
pub struct Settings {
    level: AtomicLevel,
    hooks: RwLock<Vec<Hook>>,
    defaults: RwLock<Defaults>,
}

static GLOBAL: OnceLock<Settings> = OnceLock::new();

impl Default for Settings {
    fn default() -> Self {
        Self::new()
    }
}

impl Settings {
    pub fn new() -> Self {
        Self {
            level: AtomicLevel::default(),
            hooks: RwLock::new(Vec::new()),
            defaults: RwLock::new(Defaults {
                stacktrace_level: Some(Level::Fatal),
                ..Defaults::default()
            }),
        }
    }

    /// Instance used by the crate-level functions, created on first use
    pub fn global() -> &'static Settings {
        GLOBAL.get_or_init(Settings::new)
    }

    pub fn level(&self) -> Level {
        self.level.level()
    }

    /// Applies to every default logger built from these settings, including
    /// ones built before the call.
    pub fn set_level(&self, level: Level) {
        self.level.set_level(level);
    }

    pub fn atomic_level(&self) -> &AtomicLevel {
        &self.level
    }

    /// Appends hooks for default loggers built from now on. Call during
    /// startup only: loggers already built keep the hooks they were built
    /// with.
    pub fn add_hooks<I>(&self, hooks: I)
    where
        I: IntoIterator<Item = Hook>,
    {
        self.hooks_mut().extend(hooks);
    }

    pub fn hook_count(&self) -> usize {
        self.hooks.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn set_sink(&self, sink: Sink) {
        self.defaults_mut().sink = sink;
    }

    pub fn set_name(&self, name: Option<String>) {
        self.defaults_mut().name = name;
    }

    pub fn set_encoder(&self, encoder: EncoderConfig) {
        self.defaults_mut().encoder = encoder;
    }

    pub fn set_stacktrace_level(&self, level: Option<Level>) {
        self.defaults_mut().stacktrace_level = level;
    }

    pub fn set_fatal_action(&self, action: FatalAction) {
        self.defaults_mut().fatal_action = action;
    }

    /// Applies a loaded [`LoggingConfig`]. Nothing changes when the config is
    /// invalid.
    pub fn configure(&self, cfg: &LoggingConfig) -> Result<(), ConfigureError> {
        let level = cfg.level()?;
        let stacktrace_level = cfg.stacktrace_level()?;
        let sink = match &cfg.output_path {
            Some(path) => Sink::file(path, cfg.append_to_file)?,
            None => Sink::Stdout,
        };

        self.set_level(level);
        let mut defaults = self.defaults_mut();
        defaults.name = cfg.name.clone();
        defaults.stacktrace_level = stacktrace_level;
        defaults.sink = sink;
        Ok(())
    }

    /// Builds a fresh logger from the current options, level and hooks.
    /// Not cached: every call pays the construction cost.
    pub fn default_logger(&self) -> Logger {
        let defaults = self.defaults().clone();
        let hooks = self.hooks.read().unwrap_or_else(PoisonError::into_inner).clone();

        let mut builder = Logger::builder()
            .level(self.level.clone())
            .sink(defaults.sink)
            .encoder(defaults.encoder)
            .stacktrace_level(defaults.stacktrace_level)
            .fatal_action(defaults.fatal_action)
            .hooks(hooks);
        if let Some(name) = defaults.name {
            builder = builder.name(name);
        }
        builder.build()
    }

    /// Logger bound to `ctx`, or a new default logger
    pub fn resolve(&self, ctx: &Context) -> Logger {
        match ctx.logger() {
            Some(logger) => logger.clone(),
            None => self.default_logger(),
        }
    }

    /// Derives a context whose logger carries `fields`; with no fields the
    /// same context is returned.
    pub fn with_fields<I>(&self, ctx: &Context, fields: I) -> Context
    where
        I: IntoIterator<Item = Field>,
    {
        let fields: Vec<Field> = fields.into_iter().collect();
        if fields.is_empty() {
            return ctx.clone();
        }
        ctx.with_logger(self.resolve(ctx).with(fields))
    }

    pub fn with_trace_id(&self, ctx: &Context, trace_id: impl Into<String>) -> Context {
        self.with_fields(ctx, [Field::trace_id(trace_id)])
    }

    fn defaults(&self) -> RwLockReadGuard<'_, Defaults> {
        self.defaults.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn defaults_mut(&self) -> RwLockWriteGuard<'_, Defaults> {
        self.defaults.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn hooks_mut(&self) -> RwLockWriteGuard<'_, Vec<Hook>> {
        self.hooks.write().unwrap_or_else(PoisonError::into_inner)
    }
}
