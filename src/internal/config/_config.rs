use std::path::Path;

use config::{Config, ConfigBuilder, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};

use crate::internal::logger::{Level, ParseLevelError};

/// Prefix of the environment variables read by [`LoggingConfig::load`]
pub const ENV_PREFIX: &str = "LOGCTX";

/// Base name of the optional config file looked up in the working directory
const DEFAULT_FILE: &str = "logctx";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_stacktrace_level")]
    pub stacktrace_level: String,
    #[serde(default)]
    pub disable_stacktrace: bool,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub output_path: Option<String>,
    #[serde(default)]
    pub append_to_file: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}
fn default_stacktrace_level() -> String {
    "fatal".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            stacktrace_level: default_stacktrace_level(),
            disable_stacktrace: false,
            name: None,
            output_path: None,
            append_to_file: false,
        }
    }
}

impl LoggingConfig {
    /// Defaults, then `./logctx.{toml,yaml,json,..}` if present, then
    /// `LOGCTX_*` environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        Self::builder()?
            .add_source(File::with_name(DEFAULT_FILE).required(false))
            .add_source(environment())
            .build()?
            .try_deserialize()
    }

    /// Like [`LoggingConfig::load`] but with an explicit, required file
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::builder()?
            .add_source(File::from(path.as_ref()).required(true))
            .add_source(environment())
            .build()?
            .try_deserialize()
    }

    fn builder() -> Result<ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        Config::builder()
            .set_default("level", default_log_level())?
            .set_default("stacktrace_level", default_stacktrace_level())?
            .set_default("disable_stacktrace", false)?
            .set_default("append_to_file", false)
    }

    pub fn level(&self) -> Result<Level, ParseLevelError> {
        self.level.parse()
    }

    /// `None` when stack traces are disabled
    pub fn stacktrace_level(&self) -> Result<Option<Level>, ParseLevelError> {
        if self.disable_stacktrace {
            return Ok(None);
        }
        self.stacktrace_level.parse().map(Some)
    }
}

fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}
