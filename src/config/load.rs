//! Layered configuration loading.
//!
//! Layers, lowest precedence first:
//!
//! 1. built-in defaults ([`Config::default`])
//! 2. `<service>.toml`, first match on the search path
//! 3. `config-<environment>.toml`, first match on the search path
//! 4. `SD_*` environment variables (`server.read_timeout` ↔ `SD_SERVER_READ_TIMEOUT`)
//!
//! Missing files are skipped. Unreadable or malformed files are fatal.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::bootstrap::BootstrapError;

use super::types::Config;

/// Prefix for environment overrides.
pub const ENV_PREFIX: &str = "SD";

/// Directories searched after the caller's config dir.
const FALLBACK_DIRS: [&str; 3] = ["./etc", "../etc", "../../etc"];

/// Deep-merge two TOML values.
/// Tables are merged recursively — the overlay only needs to specify keys that
/// differ from the base. For every other type (string, integer, array, …)
/// the overlay value replaces the base value wholesale.
fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_tbl), toml::Value::Table(overlay_tbl)) => {
            for (key, ov_val) in overlay_tbl {
                let merged = match base_tbl.remove(&key) {
                    Some(base_val) => merge_toml(base_val, ov_val),
                    None => ov_val,
                };
                base_tbl.insert(key, merged);
            }
            toml::Value::Table(base_tbl)
        }
        (_, overlay) => overlay,
    }
}

fn read_toml(path: &Path) -> Result<toml::Value, BootstrapError> {
    let raw = fs::read_to_string(path)
        .map_err(|e| BootstrapError::Config(format!("cannot read {}: {e}", path.display())))?;
    toml::from_str(&raw)
        .map_err(|e| BootstrapError::Config(format!("parse error in {}: {e}", path.display())))
}

/// First existing `name` in `dirs`.
fn find_file(dirs: &[PathBuf], name: &str) -> Option<PathBuf> {
    dirs.iter().map(|d| d.join(name)).find(|p| p.is_file())
}

/// Merge `name` from the search path into `base`, if such a file exists.
fn merge_optional(
    base: toml::Value,
    dirs: &[PathBuf],
    name: &str,
) -> Result<toml::Value, BootstrapError> {
    match find_file(dirs, name) {
        Some(path) => {
            debug!(path = %path.display(), "merging config file");
            Ok(merge_toml(base, read_toml(&path)?))
        }
        None => {
            debug!(file = name, "config file not found, skipping");
            Ok(base)
        }
    }
}

/// Search path for a config dir: the dir itself, then `./etc`, `../etc`,
/// `../../etc`.
pub fn search_paths(config_dir: &Path) -> Vec<PathBuf> {
    let mut dirs = vec![config_dir.to_path_buf()];
    for dir in FALLBACK_DIRS {
        let dir = PathBuf::from(dir);
        if !dirs.contains(&dir) {
            dirs.push(dir);
        }
    }
    dirs
}

/// Load `<service_name>.toml` (plus overrides) for a service, reading the
/// process environment.
pub fn load(config_dir: impl AsRef<Path>, service_name: &str) -> Result<Config, BootstrapError> {
    load_from(&search_paths(config_dir.as_ref()), service_name, |key| env::var(key).ok())
}

/// Loader with explicit search dirs and environment lookup.
/// Tests pass a lookup closure instead of mutating env vars.
pub fn load_from<F>(
    search_dirs: &[PathBuf],
    service_name: &str,
    lookup: F,
) -> Result<Config, BootstrapError>
where
    F: Fn(&str) -> Option<String>,
{
    if service_name.trim().is_empty() {
        return Err(BootstrapError::Config("service name must not be empty".into()));
    }

    let lookup = |key: &str| lookup(key).filter(|v| !v.is_empty());

    let defaults = toml::Value::try_from(Config::default())
        .map_err(|e| BootstrapError::Config(format!("cannot encode defaults: {e}")))?;

    let merged = merge_optional(defaults, search_dirs, &format!("{service_name}.toml"))?;

    let environment = lookup(&format!("{ENV_PREFIX}_ENVIRONMENT"))
        .or_else(|| {
            merged
                .get("environment")
                .and_then(|v| v.as_str())
                .map(str::to_string)
        })
        .unwrap_or_else(|| Config::default().environment);

    let mut merged = merge_optional(merged, search_dirs, &format!("config-{environment}.toml"))?;

    apply_env_overrides(&mut merged, ENV_PREFIX, &lookup)?;

    Config::deserialize(merged).map_err(|e: toml::de::Error| {
        BootstrapError::Config(format!("config error for {service_name}: {e}"))
    })
}

/// Replace every leaf whose env name is set. Leaves are addressed by joining
/// the upper-cased key path with `_` under `prefix`.
fn apply_env_overrides<F>(
    value: &mut toml::Value,
    prefix: &str,
    lookup: &F,
) -> Result<(), BootstrapError>
where
    F: Fn(&str) -> Option<String>,
{
    let toml::Value::Table(table) = value else {
        return Ok(());
    };
    for (key, child) in table.iter_mut() {
        let name = format!("{prefix}_{}", key.to_ascii_uppercase());
        if child.is_table() {
            apply_env_overrides(child, &name, lookup)?;
        } else if let Some(raw) = lookup(&name) {
            *child = parse_env_value(&name, child, &raw)?;
        }
    }
    Ok(())
}

/// Parse `raw` into the same TOML type as `current`.
fn parse_env_value(
    name: &str,
    current: &toml::Value,
    raw: &str,
) -> Result<toml::Value, BootstrapError> {
    let invalid = |expected: &str| {
        BootstrapError::Config(format!("{name}: expected {expected}, got '{raw}'"))
    };
    let trimmed = raw.trim();
    let value = match current {
        toml::Value::Integer(_) => {
            toml::Value::Integer(trimmed.parse().map_err(|_| invalid("an integer"))?)
        }
        toml::Value::Float(_) => {
            toml::Value::Float(trimmed.parse().map_err(|_| invalid("a number"))?)
        }
        toml::Value::Boolean(_) => {
            toml::Value::Boolean(parse_bool(trimmed).ok_or_else(|| invalid("a boolean"))?)
        }
        toml::Value::Array(_) => toml::Value::Array(
            trimmed
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(|s| toml::Value::String(s.to_string()))
                .collect(),
        ),
        _ => toml::Value::String(raw.to_string()),
    };
    Ok(value)
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Expand a leading `~` to the user's home directory.
/// Absolute or relative paths without `~` are returned unchanged.
pub fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    if path == "~" {
        if let Some(home) = dirs::home_dir() {
            return home;
        }
    }
    PathBuf::from(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    fn table(src: &str) -> toml::Value {
        toml::from_str(src).unwrap()
    }

    #[test]
    fn merge_overlays_nested_tables() {
        let base = table("[server]\nhost = \"0.0.0.0\"\nport = 8080\n");
        let overlay = table("[server]\nport = 9090\n");
        let merged = merge_toml(base, overlay);
        assert_eq!(merged["server"]["host"].as_str(), Some("0.0.0.0"));
        assert_eq!(merged["server"]["port"].as_integer(), Some(9090));
    }

    #[test]
    fn merge_replaces_arrays_wholesale() {
        let base = table("brokers = [\"a\", \"b\"]\n");
        let overlay = table("brokers = [\"c\"]\n");
        let merged = merge_toml(base, overlay);
        assert_eq!(merged["brokers"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn env_overrides_follow_key_paths() {
        let mut value = toml::Value::try_from(Config::default()).unwrap();
        let env: HashMap<&str, &str> = HashMap::from([
            ("SD_SERVER_READ_TIMEOUT", "45"),
            ("SD_STORAGE_MINIO_USE_SSL", "yes"),
            ("SD_KAFKA_BROKERS", "k1:9092, k2:9092"),
            ("SD_DATABASE_HOST", "db.internal"),
        ]);
        let lookup = |k: &str| env.get(k).map(|v| v.to_string());
        apply_env_overrides(&mut value, ENV_PREFIX, &lookup).unwrap();
        let cfg = Config::deserialize(value).unwrap();
        assert_eq!(cfg.server.read_timeout, 45);
        assert!(cfg.storage.minio.use_ssl);
        assert_eq!(cfg.kafka.brokers, vec!["k1:9092", "k2:9092"]);
        assert_eq!(cfg.database.host, "db.internal");
    }

    #[test]
    fn bad_env_integer_is_fatal() {
        let mut value = toml::Value::try_from(Config::default()).unwrap();
        let lookup = |k: &str| (k == "SD_SERVER_PORT").then(|| "eighty".to_string());
        let err = apply_env_overrides(&mut value, ENV_PREFIX, &lookup).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("SD_SERVER_PORT"));
        assert!(msg.contains("integer"));
    }

    #[test]
    fn bool_spellings() {
        assert_eq!(parse_bool("TRUE"), Some(true));
        assert_eq!(parse_bool("0"), Some(false));
        assert_eq!(parse_bool("off"), Some(false));
        assert_eq!(parse_bool("maybe"), None);
    }

    #[test]
    fn defaults_when_nothing_found() {
        let dir = tempfile::TempDir::new().unwrap();
        let cfg = load_from(&[dir.path().to_path_buf()], "gateway", no_env).unwrap();
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn empty_service_name_rejected() {
        let err = load_from(&[], " ", no_env).unwrap_err();
        assert!(err.to_string().contains("service name"));
    }

    #[test]
    fn search_paths_start_with_config_dir() {
        let dirs = search_paths(Path::new("/srv/conf"));
        assert_eq!(dirs[0], PathBuf::from("/srv/conf"));
        assert_eq!(dirs.len(), 4);
        assert_eq!(search_paths(Path::new("./etc")).len(), 3);
    }

    #[test]
    fn tilde_expands_to_home() {
        let home = dirs::home_dir().expect("home dir must exist in test env");
        let expanded = expand_home("~/.smart-document");
        assert!(expanded.starts_with(&home));
        assert!(expanded.ends_with(".smart-document"));
    }

    #[test]
    fn absolute_path_unchanged() {
        let p = expand_home("/absolute/path");
        assert_eq!(p, PathBuf::from("/absolute/path"));
    }

    #[test]
    fn relative_path_unchanged() {
        let p = expand_home("relative/path");
        assert_eq!(p, PathBuf::from("relative/path"));
    }
}
