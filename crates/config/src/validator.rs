use crate::*;
use regex::Regex;
use thiserror::Error;
use url::Url;

#[derive(Error, Debug, Clone)]
pub enum ValidationError {
    #[error("Service name is required")]
    MissingServiceName,

    #[error("Service port must be non-zero")]
    InvalidPort,

    #[error("Invalid URL for {field}: {message}")]
    InvalidUrl { field: String, message: String },

    #[error("Invalid time format '{time}': {message}")]
    InvalidTimeFormat { time: String, message: String },

    #[error("Trading session is empty: opens at {open}, closes at {close}")]
    EmptySession { open: String, close: String },

    #[error("{field} must be a positive integer")]
    InvalidPositiveInteger { field: String },

    #[error("{field} must be a positive float")]
    InvalidPositiveFloat { field: String },

    #[error("options.default_atm_levels ({default}) exceeds options.max_atm_levels ({max})")]
    AtmLevelsAboveMax { default: u32, max: u32 },

    #[error("Invalid log format: {0}. Must be one of: pretty, json, compact")]
    InvalidLogFormat(String),

    #[error("Metrics port {0} collides with the service port")]
    MetricsPortConflict(u16),

    #[error("Environment variable '{var}' is missing or invalid: {message}")]
    InvalidEnvVar { var: String, message: String },
}

#[derive(Debug, Clone)]
pub struct ValidationWarning {
    pub field: String,
    pub message: String,
}

#[derive(Debug, Clone)]
pub struct DefaultApplied {
    pub field: String,
    pub value: String,
}

#[derive(Debug, Clone)]
pub struct ValidationReport {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
    pub defaults_applied: Vec<DefaultApplied>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self {
            errors: Vec::new(),
            warnings: Vec::new(),
            defaults_applied: Vec::new(),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, field: &str, message: &str) {
        self.warnings.push(ValidationWarning {
            field: field.to_string(),
            message: message.to_string(),
        });
    }

    pub fn add_default(&mut self, field: &str, value: &str) {
        self.defaults_applied.push(DefaultApplied {
            field: field.to_string(),
            value: value.to_string(),
        });
    }
}

impl Default for ValidationReport {
    fn default() -> Self {
        Self::new()
    }
}

pub fn validate_config(config: &MasterConfig) -> ValidationReport {
    let mut report = ValidationReport::new();

    validate_service(&config.service, &mut report);
    validate_live(&config.live, config.provider, &mut report);
    validate_synthetic(&config.synthetic, &mut report);
    validate_options(&config.options, &mut report);
    validate_monitoring(config, &mut report);

    report
}

/// Parse an `HH:MM` wall-clock time into minutes after midnight.
pub fn parse_session_time(time: &str) -> Result<u32, ValidationError> {
    let invalid = |message: &str| ValidationError::InvalidTimeFormat {
        time: time.to_string(),
        message: message.to_string(),
    };

    let re = Regex::new(r"^(\d{2}):(\d{2})$").map_err(|e| invalid(&e.to_string()))?;
    let caps = re
        .captures(time)
        .ok_or_else(|| invalid("expected HH:MM"))?;

    let hours: u32 = caps[1].parse().map_err(|_| invalid("hour is not a number"))?;
    let minutes: u32 = caps[2].parse().map_err(|_| invalid("minute is not a number"))?;

    if hours > 23 {
        return Err(invalid("hour must be between 00 and 23"));
    }
    if minutes > 59 {
        return Err(invalid("minute must be between 00 and 59"));
    }

    Ok(hours * 60 + minutes)
}

fn validate_service(service: &ServiceConfig, report: &mut ValidationReport) {
    if service.name.is_empty() {
        report.add_error(ValidationError::MissingServiceName);
    }

    if service.port == 0 {
        report.add_error(ValidationError::InvalidPort);
    }

    if has_unresolved_env_vars(&service.shared_secret) {
        report.add_error(ValidationError::InvalidEnvVar {
            var: service.shared_secret.clone(),
            message: "shared_secret references an unset environment variable".to_string(),
        });
    } else if service.shared_secret == PLACEHOLDER_SECRET {
        report.add_warning(
            "service.shared_secret",
            "Shared secret is still the placeholder value; set INTERNAL_API_SECRET",
        );
    }
}

fn validate_url(field: &str, value: &str, report: &mut ValidationReport) {
    match Url::parse(value) {
        Ok(url) if url.scheme() == "http" || url.scheme() == "https" => {}
        Ok(url) => report.add_error(ValidationError::InvalidUrl {
            field: field.to_string(),
            message: format!("unsupported scheme '{}'", url.scheme()),
        }),
        Err(e) => report.add_error(ValidationError::InvalidUrl {
            field: field.to_string(),
            message: e.to_string(),
        }),
    }
}

fn validate_live(live: &LiveConfig, provider: ProviderKind, report: &mut ValidationReport) {
    // The live section is parsed regardless of provider; only check it when it matters.
    if provider != ProviderKind::Live {
        return;
    }

    match &live.reference_path {
        Some(path) if path.trim().is_empty() => {
            report.add_warning("live.reference_path", "Empty path, falling back to reference_url");
            validate_url("live.reference_url", &live.reference_url, report);
        }
        Some(_) => {}
        None => validate_url("live.reference_url", &live.reference_url, report),
    }

    validate_url("live.candle_base_url", &live.candle_base_url, report);

    if live.timeout_seconds == 0 {
        report.add_error(ValidationError::InvalidPositiveInteger {
            field: "live.timeout_seconds".to_string(),
        });
    } else if live.timeout_seconds > 60 {
        report.add_warning(
            "live.timeout_seconds",
            &format!(
                "Timeout of {}s lets a slow upstream hold a request for a long time",
                live.timeout_seconds
            ),
        );
    }

    if live.user_agent.is_empty() {
        report.add_default("live.user_agent", &default_user_agent());
    }
}

fn validate_synthetic(synthetic: &SyntheticConfig, report: &mut ValidationReport) {
    let open = parse_session_time(&synthetic.session_open);
    let close = parse_session_time(&synthetic.session_close);

    if synthetic.interval_minutes == 0 {
        report.add_error(ValidationError::InvalidPositiveInteger {
            field: "synthetic.interval_minutes".to_string(),
        });
    }

    match (open, close) {
        (Ok(open), Ok(close)) => {
            if open + synthetic.interval_minutes > close {
                report.add_error(ValidationError::EmptySession {
                    open: synthetic.session_open.clone(),
                    close: synthetic.session_close.clone(),
                });
            }
        }
        (open, close) => {
            if let Err(e) = open {
                report.add_error(e);
            }
            if let Err(e) = close {
                report.add_error(e);
            }
        }
    }

    if synthetic.seed.is_some() {
        report.add_warning(
            "synthetic.seed",
            "Fixed seed configured; synthetic output repeats across restarts",
        );
    }
}

fn validate_options(options: &OptionsConfig, report: &mut ValidationReport) {
    if !options.default_strike_interval.is_finite() || options.default_strike_interval <= 0.0 {
        report.add_error(ValidationError::InvalidPositiveFloat {
            field: "options.default_strike_interval".to_string(),
        });
    }

    if options.default_atm_levels > options.max_atm_levels {
        report.add_error(ValidationError::AtmLevelsAboveMax {
            default: options.default_atm_levels,
            max: options.max_atm_levels,
        });
    }

    if options.default_atm_levels == 0 {
        report.add_warning(
            "options.default_atm_levels",
            "Zero levels yields only the at-the-money strike",
        );
    }
}

fn validate_monitoring(config: &MasterConfig, report: &mut ValidationReport) {
    let valid_formats = ["pretty", "json", "compact"];
    if !valid_formats.contains(&config.logging.format.as_str()) {
        report.add_error(ValidationError::InvalidLogFormat(config.logging.format.clone()));
    }

    if config.metrics.enabled && config.metrics.port == config.service.port {
        report.add_error(ValidationError::MetricsPortConflict(config.metrics.port));
    }
}
