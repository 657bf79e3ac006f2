//! `${VAR}` expansion in configuration strings.
//!
//! `${VAR}` must be set; `${VAR:-default}` falls back to `default`. A bare
//! `$VAR` is left alone, since URLs and host patterns may contain `$`.

use crate::ConfigError;

/// Expand `${...}` references in `value` from the process environment.
///
/// `field` names the configuration key for error messages.
pub(crate) fn expand_env(value: &str, field: &str) -> Result<String, ConfigError> {
    expand_with(value, field, |var| std::env::var(var).ok())
}

/// Expand `${...}` references in `value`, resolving variables with `lookup`.
fn expand_with(
    value: &str,
    field: &str,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<String, ConfigError> {
    if !value.contains("${") {
        return Ok(value.to_owned());
    }

    shellexpand::env_with_context(value, |var| lookup(var).map(Some).ok_or(Unset))
        .map(std::borrow::Cow::into_owned)
        .map_err(|e| ConfigError::EnvVar {
            field: field.to_owned(),
            message: format!("${{{}}} not set", e.var_name),
        })
}

/// Lookup failure marker; the variable name travels in `shellexpand::LookupError`.
#[derive(Debug)]
struct Unset;

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use pretty_assertions::assert_eq;

    use super::*;

    fn expand(value: &str) -> Result<String, ConfigError> {
        let vars: HashMap<&str, &str> =
            HashMap::from([("SITE_DOMAIN", "example.com"), ("PING_HOST", "ping.example.com")]);
        expand_with(value, "general.domain", |var| {
            vars.get(var).map(|v| (*v).to_owned())
        })
    }

    #[test]
    fn test_literal_unchanged() {
        assert_eq!(expand("shop.example.com").unwrap(), "shop.example.com");
    }

    #[test]
    fn test_expand_set_var() {
        assert_eq!(expand("${SITE_DOMAIN}").unwrap(), "example.com");
        assert_eq!(
            expand("https://${PING_HOST}/ping").unwrap(),
            "https://ping.example.com/ping"
        );
    }

    #[test]
    fn test_default_used_when_unset() {
        assert_eq!(expand("${UNSET:-fallback.example.com}").unwrap(), "fallback.example.com");
        assert_eq!(expand("${SITE_DOMAIN:-other.example.com}").unwrap(), "example.com");
    }

    #[test]
    fn test_missing_var_error_names_field_and_var() {
        let err = expand("${UNSET}").unwrap_err();

        assert!(matches!(err, ConfigError::EnvVar { .. }));
        assert_eq!(
            err.to_string(),
            "Environment variable error in general.domain: ${UNSET} not set"
        );
    }

    #[test]
    fn test_bare_dollar_not_expanded() {
        assert_eq!(expand("$SITE_DOMAIN").unwrap(), "$SITE_DOMAIN");
    }

    #[test]
    fn test_process_environment() {
        assert_eq!(expand_env("${SMAP_SURELY_UNSET_VAR:-x}", "server.host").unwrap(), "x");
    }
}
