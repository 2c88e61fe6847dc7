//! Process-level plumbing for the server binary: layered configuration,
//! home directory resolution and logging setup.

pub mod config;
pub mod logging;
pub mod paths;

pub use config::{
    AppConfig, AppConfigProvider, CliArgs, DatabaseConfig, LoggingConfig, Section, ServerConfig,
};
