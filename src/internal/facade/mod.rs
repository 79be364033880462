// src/internal/facade/mod.rs

//! Context-scoped shorthand over the global [`Settings`].
//!
//! Every emitter resolves the logger bound to the given context, falling
//! back to a freshly built default logger, and reports the caller's source
//! location rather than its own.

use crate::internal::config::LoggingConfig;
use crate::internal::context::Context;
use crate::internal::logger::{Field, Hook, Level, Logger};
use crate::internal::settings::{ConfigureError, Settings};

/// Context carrying `logger`; use this to log through something other than
/// the default logger.
pub fn bind(ctx: &Context, logger: Logger) -> Context {
    ctx.with_logger(logger)
}

/// Logger bound to `ctx`, or the default logger when none is bound
pub fn from(ctx: &Context) -> Logger {
    Settings::global().resolve(ctx)
}

pub fn with_fields<I>(ctx: &Context, fields: I) -> Context
where
    I: IntoIterator<Item = Field>,
{
    Settings::global().with_fields(ctx, fields)
}

/// Adds the `trace_id` field to the logger in the context
pub fn with_trace_id(ctx: &Context, trace_id: impl Into<String>) -> Context {
    Settings::global().with_trace_id(ctx, trace_id)
}

pub fn set_level(level: Level) {
    Settings::global().set_level(level);
}

pub fn level() -> Level {
    Settings::global().level()
}

/// Registers hooks run for every entry written by default loggers.
///
/// Hooks can slow down every log call. Register them while the application
/// starts, before anything logs: loggers built earlier do not see them.
pub fn add_hooks<I>(hooks: I)
where
    I: IntoIterator<Item = Hook>,
{
    Settings::global().add_hooks(hooks);
}

pub fn configure(cfg: &LoggingConfig) -> Result<(), ConfigureError> {
    Settings::global().configure(cfg)
}

#[track_caller]
pub fn log(ctx: &Context, level: Level, msg: &str, fields: &[Field]) {
    from(ctx).log(level, msg, fields);
}

#[track_caller]
pub fn debug(ctx: &Context, msg: &str, fields: &[Field]) {
    from(ctx).debug(msg, fields);
}

#[track_caller]
pub fn info(ctx: &Context, msg: &str, fields: &[Field]) {
    from(ctx).info(msg, fields);
}

#[track_caller]
pub fn warn(ctx: &Context, msg: &str, fields: &[Field]) {
    from(ctx).warn(msg, fields);
}

#[track_caller]
pub fn error(ctx: &Context, msg: &str, fields: &[Field]) {
    from(ctx).error(msg, fields);
}

/// Logs at fatal level, then terminates as configured (process exit by default)
#[track_caller]
pub fn fatal(ctx: &Context, msg: &str, fields: &[Field]) -> ! {
    from(ctx).fatal(msg, fields)
}

// Convenience logging macros: `log_info!(&ctx, "msg", "key" => value, ...)`
// where each value implements `serde::Serialize`.

#[macro_export]
macro_rules! log_debug {
    ($ctx:expr, $msg:expr $(, $key:expr => $value:expr)* $(,)?) => {
        $crate::debug($ctx, $msg, &[$($crate::Field::any($key, &$value)),*])
    };
}

#[macro_export]
macro_rules! log_info {
    ($ctx:expr, $msg:expr $(, $key:expr => $value:expr)* $(,)?) => {
        $crate::info($ctx, $msg, &[$($crate::Field::any($key, &$value)),*])
    };
}

#[macro_export]
macro_rules! log_warn {
    ($ctx:expr, $msg:expr $(, $key:expr => $value:expr)* $(,)?) => {
        $crate::warn($ctx, $msg, &[$($crate::Field::any($key, &$value)),*])
    };
}

#[macro_export]
macro_rules! log_error {
    ($ctx:expr, $msg:expr $(, $key:expr => $value:expr)* $(,)?) => {
        $crate::error($ctx, $msg, &[$($crate::Field::any($key, &$value)),*])
    };
}

#[macro_export]
macro_rules! log_fatal {
    ($ctx:expr, $msg:expr $(, $key:expr => $value:expr)* $(,)?) => {
        $crate::fatal($ctx, $msg, &[$($crate::Field::any($key, &$value)),*])
    };
}
