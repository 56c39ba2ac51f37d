//! Shared handler state

use market_data::MarketDataService;
use options::OptionsEngine;
use server::HealthState;
use std::sync::Arc;

/// Everything the handlers need, cheap to clone per request.
#[derive(Clone)]
pub struct AppState {
    pub market: MarketDataService,
    pub options: Arc<OptionsEngine>,
    pub health: Arc<HealthState>,
}

impl AppState {
    pub fn new(market: MarketDataService, options: OptionsEngine, health: HealthState) -> Self {
        Self {
            market,
            options: Arc::new(options),
            health: Arc::new(health),
        }
    }
}
