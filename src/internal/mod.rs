pub mod config;
pub mod context;
pub mod facade;
pub mod logger;
pub mod settings;
