//! Tickforge CLI and Server Binary
//!
//! `start` serves the HTTP API; `resolve`, `daily` and `contracts` run a
//! single query against the configured provider and print JSON.

use anyhow::{Context, Result};
use cli::{Cli, Commands, ProviderArg, UnderlyingArg};
use config::{
    generate_default_config, load_config, save_config, validate_config, MasterConfig, ProviderKind,
};
use gateway::AppState;
use instrument::{InstrumentResolver, ReferenceLoader};
use market_data::{market_today, MarketDataService, UnderlyingType};
use observability::{init_logging, init_logging_named, init_metrics, DataMetrics, LogFormat};
use options::{parse_date, OptionsEngine};
use serde::Serialize;
use server::{
    run_until_shutdown, ComponentStatus, HealthState, HttpServer, ServerConfig, ShutdownController,
};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

const SERVICE_NAME: &str = "tickforge";

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse_args();

    match cli.command {
        Commands::Start {
            config,
            provider,
            http,
        } => start_command(&config, provider, http).await,
        Commands::Validate { config } => {
            init_logging(SERVICE_NAME, LogFormat::Pretty)?;
            validate_command(&config)
        }
        Commands::Init { output } => {
            init_logging(SERVICE_NAME, LogFormat::Pretty)?;
            init_command(&output)
        }
        Commands::Resolve { symbol, config } => resolve_command(&config, &symbol).await,
        Commands::Daily {
            underlying_type,
            symbol,
            date,
            timewise,
            config,
            provider,
        } => daily_command(&config, provider, underlying_type, &symbol, &date, timewise).await,
        Commands::Contracts {
            underlying_type,
            symbol,
            expiry,
            levels,
            interval,
            date,
            config,
            provider,
        } => {
            contracts_command(
                &config,
                provider,
                underlying_type,
                &symbol,
                &expiry,
                levels,
                interval,
                date.as_deref(),
            )
            .await
        }
    }
}

/// Load the configuration, apply CLI overrides, start logging and refuse
/// to continue on validation errors.
fn prepare(config_path: &Path, provider: Option<ProviderArg>, http: Option<u16>) -> Result<MasterConfig> {
    let mut config = load_config(config_path)?;

    if let Some(provider) = provider {
        config.provider = provider.as_str().parse().map_err(anyhow::Error::msg)?;
    }
    if let Some(port) = http {
        config.service.port = port;
    }

    init_logging_named(SERVICE_NAME, &config.logging.format)?;
    debug!(path = ?config_path, provider = %config.provider, "Configuration prepared");

    let report = validate_config(&config);
    for warning in &report.warnings {
        warn!(field = %warning.field, message = %warning.message, "Configuration warning");
    }
    if !report.is_valid() {
        for err in &report.errors {
            error!("{}", err);
        }
        anyhow::bail!(
            "Configuration validation failed with {} error(s)",
            report.errors.len()
        );
    }

    Ok(config)
}

/// Fill the resolver when the live provider needs it. Returns the table size,
/// or `None` when the active provider does not resolve symbols.
async fn load_reference_table(config: &MasterConfig, resolver: &InstrumentResolver) -> Result<Option<usize>> {
    if config.provider != ProviderKind::Live {
        return Ok(None);
    }

    let loader = ReferenceLoader::from_config(&config.live)?;
    let count = loader.load_into(resolver).await;
    DataMetrics::new(config.provider.as_str()).set_reference_symbols(count);
    Ok(Some(count))
}

async fn build_market(config: &MasterConfig) -> Result<MarketDataService> {
    let resolver = Arc::new(InstrumentResolver::empty());
    load_reference_table(config, &resolver).await?;
    Ok(MarketDataService::from_config(config, resolver)?)
}

async fn start_command(config_path: &Path, provider: Option<ProviderArg>, http: Option<u16>) -> Result<()> {
    let config = prepare(config_path, provider, http)?;

    if config.metrics.enabled {
        init_metrics(config.metrics.port)?;
    }

    let shutdown = ShutdownController::with_signals();
    let resolver = Arc::new(InstrumentResolver::empty());
    let health = HealthState::new(&config.service.name);
    health
        .update_component(ComponentStatus::healthy("provider", config.provider.as_str()))
        .await;

    // The table is loaded before the listener binds
    let loaded = run_until_shutdown(
        shutdown.child_token(),
        load_reference_table(&config, &resolver),
    )
    .await;
    match loaded {
        None => {
            info!("Shutdown requested during startup");
            return Ok(());
        }
        Some(Ok(Some(0))) => {
            health
                .update_component(ComponentStatus::degraded(
                    "reference_table",
                    "empty, every symbol resolves as not found",
                ))
                .await;
        }
        Some(Ok(Some(count))) => {
            health
                .update_component(ComponentStatus::healthy(
                    "reference_table",
                    format!("{} symbols", count),
                ))
                .await;
        }
        Some(Ok(None)) => {}
        Some(Err(e)) => return Err(e),
    }

    let market = MarketDataService::from_config(&config, resolver)?;
    let options = OptionsEngine::from_config(&config.options, market.clone());
    let router = gateway::router(AppState::new(market, options, health));

    let server = HttpServer::bind(
        &ServerConfig::new(&config.service.host, config.service.port),
        router,
    )
    .await?;

    info!(
        address = %server.local_addr(),
        provider = %config.provider,
        "Tickforge starting"
    );
    server.serve(shutdown.child_token()).await?;
    info!("Tickforge stopped");

    Ok(())
}

fn validate_command(config_path: &Path) -> Result<()> {
    info!(path = ?config_path, "Validating configuration");

    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(e) => {
            error!(%e, "Failed to load configuration");
            anyhow::bail!(e);
        }
    };

    let report = validate_config(&config);

    println!("\n=== Configuration Validation Report ===\n");

    if !report.defaults_applied.is_empty() {
        println!("Defaults Applied ({}):", report.defaults_applied.len());
        for default in &report.defaults_applied {
            println!("  [info] {} = {}", default.field, default.value);
        }
        println!();
    }

    if !report.warnings.is_empty() {
        println!("Warnings ({}):", report.warnings.len());
        for warning in &report.warnings {
            println!("  [warn] [{}] {}", warning.field, warning.message);
        }
        println!();
    }

    if !report.errors.is_empty() {
        println!("Errors ({}):", report.errors.len());
        for err in &report.errors {
            println!("  [error] {}", err);
        }
        println!();
        anyhow::bail!("Configuration validation failed");
    }

    println!("[ok] Configuration is valid!");
    println!();
    println!("Service: {} on {}", config.service.name, config.bind_address());
    println!("Provider: {}", config.provider);
    println!(
        "Session: {} - {} every {} min",
        config.synthetic.session_open, config.synthetic.session_close, config.synthetic.interval_minutes
    );
    println!(
        "Option ladder: {} levels (max {}), interval {}",
        config.options.default_atm_levels, config.options.max_atm_levels, config.options.default_strike_interval
    );
    println!("Metrics: {}", if config.metrics.enabled { "enabled" } else { "disabled" });

    Ok(())
}

fn init_command(output_path: &Path) -> Result<()> {
    info!(?output_path, "Initializing new configuration file");

    let config = generate_default_config();

    if let Some(parent) = output_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {:?}", parent))?;
    }

    save_config(&config, output_path)?;

    println!("[ok] Configuration file created successfully!");
    println!();
    println!("Location: {:?}", output_path);
    println!();
    println!("Next steps:");
    println!("  1. Pick the data provider (synthetic or live)");
    println!("  2. Set INTERNAL_API_SECRET for the gatekeeper in front of this service");
    println!(
        "  3. Run 'tickforge validate --config {:?}' to check configuration",
        output_path
    );
    println!(
        "  4. Run 'tickforge start --config {:?}' to start serving",
        output_path
    );

    Ok(())
}

#[derive(Serialize)]
struct Resolved<'a> {
    symbol: &'a str,
    instrument_key: String,
    table_size: usize,
}

async fn resolve_command(config_path: &Path, symbol: &str) -> Result<()> {
    let config = prepare(config_path, None, None)?;

    let resolver = InstrumentResolver::empty();
    let table_size = ReferenceLoader::from_config(&config.live)?
        .load_into(&resolver)
        .await;
    let key = resolver.resolve(symbol)?;

    print_json(&Resolved {
        symbol,
        instrument_key: key.to_string(),
        table_size,
    })
}

async fn daily_command(
    config_path: &Path,
    provider: Option<ProviderArg>,
    underlying_type: UnderlyingArg,
    symbol: &str,
    date: &str,
    timewise: bool,
) -> Result<()> {
    let config = prepare(config_path, provider, None)?;
    let date = parse_date(date)?;

    let market = build_market(&config).await?;
    let record = market
        .get_daily(underlying(underlying_type), symbol, date, timewise)
        .await?;

    print_json(&record)
}

#[allow(clippy::too_many_arguments)]
async fn contracts_command(
    config_path: &Path,
    provider: Option<ProviderArg>,
    underlying_type: UnderlyingArg,
    symbol: &str,
    expiry: &str,
    levels: Option<u32>,
    interval: Option<f64>,
    date: Option<&str>,
) -> Result<()> {
    let config = prepare(config_path, provider, None)?;
    let expiry = parse_date(expiry)?;
    let spot_date = match date {
        Some(date) => parse_date(date)?,
        None => market_today(),
    };

    let market = build_market(&config).await?;
    let engine = OptionsEngine::from_config(&config.options, market);
    let contracts = engine
        .generate_contracts_on(
            spot_date,
            underlying(underlying_type),
            symbol,
            expiry,
            levels.unwrap_or(engine.default_atm_levels()),
            interval.unwrap_or(engine.default_strike_interval()),
        )
        .await?;

    print_json(&contracts)
}

fn underlying(arg: UnderlyingArg) -> UnderlyingType {
    match arg {
        UnderlyingArg::Stock => UnderlyingType::Stock,
        UnderlyingArg::Sector => UnderlyingType::Sector,
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{}", json);
    Ok(())
}
