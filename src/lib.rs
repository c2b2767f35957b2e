//! Shared scaffolding for the smart document services: layered
//! configuration, the application error taxonomy, and structured logging.

pub mod bootstrap;
pub mod config;
pub mod errors;
pub mod logging;
