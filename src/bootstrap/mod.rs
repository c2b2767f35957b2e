//! Bootstrap layer — what runs before a service starts handling work.
//!
//! - **error** — `BootstrapError`, shared by config loading and logger setup.

mod error;

pub use error::BootstrapError;
