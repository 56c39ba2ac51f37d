use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

const DEFAULT_CONFIG: &str = "master_config/tickforge.yaml";

#[derive(Parser, Debug)]
#[command(name = "tickforge")]
#[command(about = "Tickforge - synthetic and live OHLCV data with derived option premiums")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP API
    Start {
        /// Path to the configuration file
        #[arg(short, long, default_value = DEFAULT_CONFIG)]
        config: PathBuf,

        /// Override the data provider
        #[arg(long, value_enum)]
        provider: Option<ProviderArg>,

        /// Override HTTP port
        #[arg(long)]
        http: Option<u16>,
    },

    /// Validate configuration without starting
    Validate {
        /// Path to the configuration file
        #[arg(short, long, default_value = DEFAULT_CONFIG)]
        config: PathBuf,
    },

    /// Write a configuration file with all defaults
    Init {
        /// Output path for the new configuration file
        #[arg(short, long, default_value = "tickforge.yaml")]
        output: PathBuf,
    },

    /// Load the reference table and resolve a symbol to its instrument key
    Resolve {
        /// Symbol, e.g. RELIANCE or RELIANCE.NS
        symbol: String,

        #[arg(short, long, default_value = DEFAULT_CONFIG)]
        config: PathBuf,
    },

    /// Print the daily record for an underlying as JSON
    Daily {
        #[arg(value_enum)]
        underlying_type: UnderlyingArg,

        symbol: String,

        /// Date as YYYY-MM-DD
        date: String,

        /// Include the 5-minute intraday series
        #[arg(long)]
        timewise: bool,

        #[arg(short, long, default_value = DEFAULT_CONFIG)]
        config: PathBuf,

        #[arg(long, value_enum)]
        provider: Option<ProviderArg>,
    },

    /// Print the option contract ladder for an underlying as JSON
    Contracts {
        #[arg(value_enum)]
        underlying_type: UnderlyingArg,

        symbol: String,

        /// Expiry as YYYY-MM-DD
        expiry: String,

        /// Strikes on each side of ATM (defaults to the configured value)
        #[arg(long)]
        levels: Option<u32>,

        /// Strike spacing (defaults to the configured value)
        #[arg(long)]
        interval: Option<f64>,

        /// Spot date as YYYY-MM-DD (defaults to today)
        #[arg(long)]
        date: Option<String>,

        #[arg(short, long, default_value = DEFAULT_CONFIG)]
        config: PathBuf,

        #[arg(long, value_enum)]
        provider: Option<ProviderArg>,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProviderArg {
    /// Historical candle API
    Live,
    /// Seeded random walk
    Synthetic,
}

impl ProviderArg {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderArg::Live => "live",
            ProviderArg::Synthetic => "synthetic",
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnderlyingArg {
    Stock,
    Sector,
}

impl UnderlyingArg {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnderlyingArg::Stock => "stock",
            UnderlyingArg::Sector => "sector",
        }
    }
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
