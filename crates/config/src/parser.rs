use crate::*;
use anyhow::{Context, Result};
use std::env;
use std::fs;
use std::path::Path;
use tracing::{debug, info, instrument, warn};

/// Environment variable overriding `service.port`.
pub const ENV_PORT: &str = "PORT";
/// Environment variable overriding `service.shared_secret`.
pub const ENV_SHARED_SECRET: &str = "INTERNAL_API_SECRET";
/// Environment variable overriding `provider`.
pub const ENV_DATA_PROVIDER: &str = "DATA_PROVIDER";

#[instrument(skip(path))]
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<MasterConfig> {
    let path = path.as_ref();
    info!("Loading configuration from: {:?}", path);

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    debug!("Config file content length: {} bytes", content.len());

    let mut config = parse_config(&content)?;
    apply_env_overrides(&mut config)?;

    info!(provider = %config.provider, "Configuration loaded successfully");
    Ok(config)
}

/// Parse a YAML document after environment substitution. No overrides are applied.
pub fn parse_config(content: &str) -> Result<MasterConfig> {
    let substituted = substitution::substitute_env_vars(content)?;
    debug!("Environment variable substitution completed");

    serde_yaml::from_str(&substituted).with_context(|| "Failed to parse YAML configuration")
}

/// Apply the process-level overrides (`PORT`, `INTERNAL_API_SECRET`, `DATA_PROVIDER`).
///
/// An override that is set but unparseable is an error rather than being ignored.
pub fn apply_env_overrides(config: &mut MasterConfig) -> Result<()> {
    if let Ok(port) = env::var(ENV_PORT) {
        config.service.port = port
            .trim()
            .parse()
            .with_context(|| format!("{} must be a port number, got '{}'", ENV_PORT, port))?;
        debug!(port = config.service.port, "Port overridden from environment");
    }

    if let Ok(secret) = env::var(ENV_SHARED_SECRET) {
        if secret.is_empty() {
            warn!("{} is set but empty, keeping configured secret", ENV_SHARED_SECRET);
        } else {
            config.service.shared_secret = secret;
            debug!("Shared secret overridden from environment");
        }
    }

    if let Ok(provider) = env::var(ENV_DATA_PROVIDER) {
        config.provider = provider
            .parse()
            .map_err(anyhow::Error::msg)
            .with_context(|| format!("Invalid {}", ENV_DATA_PROVIDER))?;
        debug!(provider = %config.provider, "Provider overridden from environment");
    }

    Ok(())
}

#[instrument]
pub fn generate_default_config() -> MasterConfig {
    MasterConfig {
        service: ServiceConfig::default(),
        provider: ProviderKind::Synthetic,
        live: LiveConfig::default(),
        synthetic: SyntheticConfig::default(),
        options: OptionsConfig::default(),
        logging: LoggingConfig::default(),
        metrics: MetricsConfig::default(),
    }
}

#[instrument]
pub fn save_config<P: AsRef<Path> + std::fmt::Debug>(config: &MasterConfig, path: P) -> Result<()> {
    let path = path.as_ref();
    info!("Saving configuration to: {:?}", path);

    let yaml = serde_yaml::to_string(config)
        .with_context(|| "Failed to serialize configuration to YAML")?;

    fs::write(path, yaml)
        .with_context(|| format!("Failed to write config file: {:?}", path))?;

    info!("Configuration saved successfully");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    // Overrides read process-wide variables; keep every case in one test so they never race.
    #[test]
    fn test_env_overrides() {
        env::set_var(ENV_PORT, "9100");
        env::set_var(ENV_SHARED_SECRET, "s3cret");
        env::set_var(ENV_DATA_PROVIDER, "live");

        let mut config = generate_default_config();
        apply_env_overrides(&mut config).unwrap();
        assert_eq!(config.service.port, 9100);
        assert_eq!(config.service.shared_secret, "s3cret");
        assert_eq!(config.provider, ProviderKind::Live);

        env::set_var(ENV_PORT, "not-a-port");
        let mut config = generate_default_config();
        assert!(apply_env_overrides(&mut config).is_err());

        env::remove_var(ENV_PORT);
        env::set_var(ENV_DATA_PROVIDER, "yahoo");
        let mut config = generate_default_config();
        assert!(apply_env_overrides(&mut config).is_err());

        env::remove_var(ENV_SHARED_SECRET);
        env::remove_var(ENV_DATA_PROVIDER);
    }

    #[test]
    fn test_save_and_reload_default_config() {
        let path = env::temp_dir().join(format!("tickforge-config-{}.yaml", std::process::id()));
        let config = generate_default_config();

        save_config(&config, &path).unwrap();
        let content = fs::read_to_string(&path).unwrap();
        let reloaded = parse_config(&content).unwrap();
        fs::remove_file(&path).ok();

        assert_eq!(reloaded.service.port, config.service.port);
        assert_eq!(reloaded.provider, config.provider);
        assert_eq!(reloaded.synthetic.session_open, config.synthetic.session_open);
        assert_eq!(reloaded.options.default_strike_interval, config.options.default_strike_interval);
    }

    #[test]
    fn test_load_missing_file_fails() {
        let err = load_config("/nonexistent/tickforge.yaml").unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }
}
