pub mod internal;

// Re-export commonly used types
pub use internal::config::LoggingConfig;
pub use internal::context::{Context, ContextKey};
pub use internal::facade::{
    add_hooks, bind, configure, debug, error, fatal, from, info, level, log, set_level, warn,
    with_fields, with_trace_id,
};
pub use internal::logger::{
    AtomicLevel, EncoderConfig, Entry, FatalAction, Field, Hook, HookError, Level, Logger,
    LoggerBuilder, ParseLevelError, SharedWriter, Sink, TRACE_ID,
};
pub use internal::settings::{ConfigureError, Settings};
