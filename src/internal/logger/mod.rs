// src/internal/logger/mod.rs

pub mod encoder;
pub mod field;
pub mod hooks;
pub mod level;
pub mod logger;
pub(crate) mod record;
pub mod sink;

pub use encoder::{EncoderConfig, JsonEncoder};
pub use field::{Field, TRACE_ID};
pub use hooks::{Entry, Hook, HookError};
pub use level::{AtomicLevel, Level, ParseLevelError};
pub use logger::{FatalAction, Logger, LoggerBuilder};
pub use sink::{SharedWriter, Sink};
