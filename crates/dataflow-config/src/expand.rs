//! Environment lookups for `dataflow.toml` values.
//!
//! `${VAR}` must be set; `${VAR:-default}` falls back to the default. Bare
//! `$VAR` is left as written since API keys and URLs may contain `$`.

use std::borrow::Cow;

use crate::ConfigError;

/// Variable consulted when neither the file nor the CLI supplies a key.
pub(crate) const API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Referenced variable that is not set.
struct UnsetVar(String);

fn lookup(var: &str) -> Result<Option<String>, UnsetVar> {
    match std::env::var(var) {
        Ok(value) => Ok(Some(value)),
        Err(_) => Err(UnsetVar(var.to_owned())),
    }
}

/// Expand a single string field, naming `field` in the error.
pub(crate) fn expand_env(value: &str, field: &str) -> Result<String, ConfigError> {
    if !value.contains("${") {
        return Ok(value.to_owned());
    }

    shellexpand::env_with_context(value, lookup)
        .map(Cow::into_owned)
        .map_err(|e| ConfigError::EnvVar {
            field: field.to_owned(),
            message: format!("${{{}}} not set", e.cause.0),
        })
}

/// Expand every entry of an API key list.
///
/// Entries are reported as `field[i]` and dropped when they expand to blank,
/// so optional keys can be declared as `${VAR:-}`.
pub(crate) fn expand_api_keys(keys: &[String], field: &str) -> Result<Vec<String>, ConfigError> {
    let mut expanded = Vec::with_capacity(keys.len());
    for (index, key) in keys.iter().enumerate() {
        let value = expand_env(key, &format!("{field}[{index}]"))?;
        if !value.trim().is_empty() {
            expanded.push(value);
        }
    }
    Ok(expanded)
}

/// Non-blank key from [`API_KEY_ENV`], if any.
pub(crate) fn api_key_from_env() -> Option<String> {
    std::env::var(API_KEY_ENV)
        .ok()
        .filter(|key| !key.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn keys(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| (*v).to_owned()).collect()
    }

    #[test]
    fn test_literal_value_unchanged() {
        assert_eq!(
            expand_env("https://generativelanguage.googleapis.com", "gemini.base_url").unwrap(),
            "https://generativelanguage.googleapis.com"
        );
        assert_eq!(expand_env("key$VALUE", "gemini.api_keys[0]").unwrap(), "key$VALUE");
    }

    #[test]
    fn test_model_default_used_when_unset() {
        // SAFETY: each test uses its own variable name
        unsafe {
            std::env::remove_var("DATAFLOW_EXPAND_MODEL");
        }
        let result = expand_env(
            "${DATAFLOW_EXPAND_MODEL:-models/gemini-1.5-flash}",
            "gemini.model",
        )
        .unwrap();
        assert_eq!(result, "models/gemini-1.5-flash");
    }

    #[test]
    fn test_embedded_host() {
        // SAFETY: each test uses its own variable name
        unsafe {
            std::env::set_var("DATAFLOW_EXPAND_HOST", "proxy.internal");
        }
        let result = expand_env("https://${DATAFLOW_EXPAND_HOST}/gemini", "gemini.base_url").unwrap();
        assert_eq!(result, "https://proxy.internal/gemini");
        unsafe {
            std::env::remove_var("DATAFLOW_EXPAND_HOST");
        }
    }

    #[test]
    fn test_api_keys_expanded_and_blank_dropped() {
        // SAFETY: each test uses its own variable name
        unsafe {
            std::env::set_var("DATAFLOW_EXPAND_KEY_A", "AIza-a");
            std::env::set_var("DATAFLOW_EXPAND_KEY_BLANK", "   ");
            std::env::remove_var("DATAFLOW_EXPAND_KEY_UNSET");
        }
        let result = expand_api_keys(
            &keys(&[
                "${DATAFLOW_EXPAND_KEY_A}",
                "${DATAFLOW_EXPAND_KEY_UNSET:-}",
                "${DATAFLOW_EXPAND_KEY_BLANK}",
                "literal",
            ]),
            "gemini.api_keys",
        )
        .unwrap();
        assert_eq!(result, vec!["AIza-a", "literal"]);
        unsafe {
            std::env::remove_var("DATAFLOW_EXPAND_KEY_A");
            std::env::remove_var("DATAFLOW_EXPAND_KEY_BLANK");
        }
    }

    #[test]
    fn test_api_key_error_names_entry() {
        // SAFETY: each test uses its own variable name
        unsafe {
            std::env::remove_var("DATAFLOW_EXPAND_KEY_MISSING");
        }
        let err = expand_api_keys(
            &keys(&["first", "${DATAFLOW_EXPAND_KEY_MISSING}"]),
            "gemini.api_keys",
        )
        .unwrap_err();
        match err {
            ConfigError::EnvVar { field, message } => {
                assert_eq!(field, "gemini.api_keys[1]");
                assert_eq!(message, "${DATAFLOW_EXPAND_KEY_MISSING} not set");
            }
            other => panic!("Expected EnvVar error, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_key_list() {
        assert!(expand_api_keys(&[], "gemini.api_keys").unwrap().is_empty());
    }
}
