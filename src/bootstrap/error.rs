//! Errors raised while bringing a service up: config and logger setup.
//!
//! These never reach clients; request-path failures use
//! [`AppError`](crate::errors::AppError).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("config error: {0}")]
    Config(String),

    #[error("logger error: {0}")]
    Logger(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
