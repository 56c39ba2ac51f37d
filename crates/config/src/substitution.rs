use anyhow::{Context, Result};
use regex::Regex;
use std::env;
use tracing::{debug, warn};

const ENV_VAR_PATTERN: &str = r"\$\{(\w+)\}|\$(\w+)";

/// Substitute environment variables in the format ${VAR_NAME} or $VAR_NAME
pub fn substitute_env_vars(content: &str) -> Result<String> {
    let re = Regex::new(ENV_VAR_PATTERN).context("Invalid environment variable pattern")?;
    let mut missing_vars = Vec::new();

    let result = re.replace_all(content, |caps: &regex::Captures<'_>| {
        let placeholder = caps.get(0).map(|m| m.as_str()).unwrap_or_default();
        let var_name = caps
            .get(1)
            .or_else(|| caps.get(2))
            .map(|m| m.as_str())
            .unwrap_or_default();

        match env::var(var_name) {
            Ok(value) => {
                debug!("Substituting environment variable: {}", var_name);
                value
            }
            Err(_) => {
                warn!("Environment variable '{}' not set", var_name);
                missing_vars.push(var_name.to_string());
                // Keep the placeholder, the validator reports it
                placeholder.to_string()
            }
        }
    });

    if !missing_vars.is_empty() {
        debug!(
            "Environment variables not set (may use defaults or fail validation): {:?}",
            missing_vars
        );
    }

    Ok(result.into_owned())
}

/// Check if a string contains unresolved environment variable placeholders
pub fn has_unresolved_env_vars(content: &str) -> bool {
    Regex::new(ENV_VAR_PATTERN)
        .map(|re| re.is_match(content))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_substitutes_braced_and_bare_forms() {
        env::set_var("TICKFORGE_SUBST_HOST", "127.0.0.1");
        env::set_var("TICKFORGE_SUBST_PORT", "9000");

        let out = substitute_env_vars("host: ${TICKFORGE_SUBST_HOST}\nport: $TICKFORGE_SUBST_PORT").unwrap();

        assert_eq!(out, "host: 127.0.0.1\nport: 9000");
    }

    #[test]
    fn test_missing_variable_keeps_placeholder() {
        env::remove_var("TICKFORGE_SUBST_MISSING");

        let out = substitute_env_vars("secret: ${TICKFORGE_SUBST_MISSING}").unwrap();

        assert_eq!(out, "secret: ${TICKFORGE_SUBST_MISSING}");
        assert!(has_unresolved_env_vars(&out));
    }
}
