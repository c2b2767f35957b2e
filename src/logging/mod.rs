//! Process-wide structured logging.
//!
//! [`Logger::init`] installs a single global `tracing` subscriber built from
//! [`LoggingConfig`](crate::config::LoggingConfig): console (JSON or human
//! readable), a rotated JSON file, or both. Everything else logs through the
//! `tracing` macros or the helpers in this module.
//!
//! - **logger** — sink selection, level parsing, the `Logger` handle.
//! - **events** — field binding and request / query / error helpers.

mod events;
mod logger;

pub use events::{
    FieldLogger, error_with_stack, fatal, log_app_error, log_db_query, log_http_request,
    log_service_error, with_fields,
};
pub use logger::{LogFormat, LogOutput, Logger, parse_level};
