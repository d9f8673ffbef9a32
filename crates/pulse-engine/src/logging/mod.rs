//! Logger initialization over the `log` facade with an `env_logger` backend.

mod init;

pub use init::{DEFAULT_FILTER, LoggingConfig, init_logging};
