use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub mod defaults;
pub mod parser;
pub mod substitution;
pub mod validator;

pub use defaults::*;
pub use parser::*;
pub use substitution::*;
pub use validator::*;

// ==================================================================================
// SERVICE CONFIG
// ==================================================================================

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServiceConfig {
    #[serde(default = "default_service_name")]
    pub name: String,
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Secret shared with the gatekeeper in front of the service. Carried, never checked here.
    #[serde(default = "default_shared_secret")]
    pub shared_secret: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            name: default_service_name(),
            host: default_host(),
            port: default_port(),
            shared_secret: default_shared_secret(),
        }
    }
}

// ==================================================================================
// PROVIDER SELECTION
// ==================================================================================

/// Which underlying data strategy the process runs with. Fixed at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    Live,
    #[default]
    Synthetic,
}

impl ProviderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::Live => "live",
            ProviderKind::Synthetic => "synthetic",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "live" | "upstox" => Ok(ProviderKind::Live),
            "synthetic" | "random" => Ok(ProviderKind::Synthetic),
            other => Err(format!(
                "unknown data provider '{}', expected 'live' or 'synthetic'",
                other
            )),
        }
    }
}

// ==================================================================================
// LIVE PROVIDER CONFIG
// ==================================================================================

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LiveConfig {
    /// Remote instrument master (gzip-compressed CSV).
    #[serde(default = "default_reference_url")]
    pub reference_url: String,
    /// Local instrument file used instead of `reference_url` when set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_path: Option<String>,
    #[serde(default = "default_candle_base_url")]
    pub candle_base_url: String,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for LiveConfig {
    fn default() -> Self {
        Self {
            reference_url: default_reference_url(),
            reference_path: None,
            candle_base_url: default_candle_base_url(),
            timeout_seconds: default_timeout_seconds(),
            user_agent: default_user_agent(),
        }
    }
}

// ==================================================================================
// SYNTHETIC PROVIDER CONFIG
// ==================================================================================

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SyntheticConfig {
    /// Fixed RNG seed. Entropy-seeded when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    #[serde(default = "default_session_open")]
    pub session_open: String,
    #[serde(default = "default_session_close")]
    pub session_close: String,
    #[serde(default = "default_interval_minutes")]
    pub interval_minutes: u32,
}

impl Default for SyntheticConfig {
    fn default() -> Self {
        Self {
            seed: None,
            session_open: default_session_open(),
            session_close: default_session_close(),
            interval_minutes: default_interval_minutes(),
        }
    }
}

// ==================================================================================
// OPTIONS CONFIG
// ==================================================================================

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OptionsConfig {
    #[serde(default = "default_atm_levels")]
    pub default_atm_levels: u32,
    /// Widest ladder a request may ask for.
    #[serde(default = "default_max_atm_levels")]
    pub max_atm_levels: u32,
    #[serde(default = "default_strike_interval")]
    pub default_strike_interval: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for OptionsConfig {
    fn default() -> Self {
        Self {
            default_atm_levels: default_atm_levels(),
            max_atm_levels: default_max_atm_levels(),
            default_strike_interval: default_strike_interval(),
            seed: None,
        }
    }
}

// ==================================================================================
// MONITORING CONFIG
// ==================================================================================

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// One of `pretty`, `json`, `compact`.
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: default_log_format(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MetricsConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_metrics_port")]
    pub port: u16,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            port: default_metrics_port(),
        }
    }
}

// ==================================================================================
// MASTER CONFIG
// ==================================================================================

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct MasterConfig {
    #[serde(default)]
    pub service: ServiceConfig,
    #[serde(default)]
    pub provider: ProviderKind,
    #[serde(default)]
    pub live: LiveConfig,
    #[serde(default)]
    pub synthetic: SyntheticConfig,
    #[serde(default)]
    pub options: OptionsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
}

impl MasterConfig {
    /// Address the HTTP server binds to.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.service.host, self.service.port)
    }
}
