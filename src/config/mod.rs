//! Configuration loading with file layers and env-var overrides.
//!
//! # Module layout
//!
//! - **types** — Public configuration structs (`Config`, `LoggingConfig`, …)
//!   with their built-in defaults.
//! - **load** — Layered loading: `merge_toml`, env overlay, `load`,
//!   `load_from`, `search_paths`, `expand_home`.
//! - **env** — `env_or` / `require_env` for values read straight from the
//!   environment.

mod env;
mod load;
mod types;

pub use env::{env_or, require_env};
pub use load::{ENV_PREFIX, expand_home, load, load_from, search_paths};
pub use types::*;
