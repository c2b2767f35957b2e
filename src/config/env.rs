//! Direct environment lookups for settings that live outside the config
//! files (secrets injected by the deployment, mostly).

use std::env;

use crate::bootstrap::BootstrapError;

/// Value of `key`, or `default` when unset or empty.
pub fn env_or(key: &str, default: &str) -> String {
    non_empty(env::var(key).ok()).unwrap_or_else(|| default.to_string())
}

/// Value of `key`; unset or empty is a config error.
pub fn require_env(key: &str) -> Result<String, BootstrapError> {
    non_empty(env::var(key).ok()).ok_or_else(|| {
        BootstrapError::Config(format!("required environment variable {key} is not set"))
    })
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    const UNSET: &str = "SD_TEST_VARIABLE_THAT_IS_NEVER_SET";

    #[test]
    fn env_or_falls_back() {
        assert_eq!(env_or(UNSET, "fallback"), "fallback");
    }

    #[test]
    fn require_env_errors_when_unset() {
        let err = require_env(UNSET).unwrap_err();
        assert!(err.to_string().contains(UNSET));
    }

    #[test]
    fn empty_counts_as_unset() {
        assert_eq!(non_empty(Some(String::new())), None);
        assert_eq!(non_empty(Some("x".into())), Some("x".to_string()));
        assert_eq!(non_empty(None), None);
    }
}
