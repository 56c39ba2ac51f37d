/// Placeholder secret written by `init`. The validator warns when it is still in use.
pub const PLACEHOLDER_SECRET: &str = "change-me";

// Service defaults
pub fn default_service_name() -> String {
    "tickforge".to_string()
}

pub fn default_host() -> String {
    "0.0.0.0".to_string()
}

pub fn default_port() -> u16 {
    8080
}

pub fn default_shared_secret() -> String {
    PLACEHOLDER_SECRET.to_string()
}

// Live provider defaults
pub fn default_reference_url() -> String {
    "https://assets.upstox.com/market-quote/instruments/exchange/NSE.csv.gz".to_string()
}

pub fn default_candle_base_url() -> String {
    "https://api.upstox.com/v2".to_string()
}

pub fn default_timeout_seconds() -> u64 {
    10
}

pub fn default_user_agent() -> String {
    format!("tickforge/{}", env!("CARGO_PKG_VERSION"))
}

// Synthetic provider defaults
pub fn default_session_open() -> String {
    "09:15".to_string()
}

pub fn default_session_close() -> String {
    "15:30".to_string()
}

pub fn default_interval_minutes() -> u32 {
    5
}

// Options defaults
pub fn default_atm_levels() -> u32 {
    5
}

pub fn default_max_atm_levels() -> u32 {
    50
}

pub fn default_strike_interval() -> f64 {
    50.0
}

// Monitoring defaults
pub fn default_log_format() -> String {
    "pretty".to_string()
}

pub fn default_metrics_port() -> u16 {
    9090
}
