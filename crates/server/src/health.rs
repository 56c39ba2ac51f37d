//! Service health
//!
//! Startup records the state of each component; the gateway's `/health`
//! route renders [`HealthState::report`].

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tokio::sync::RwLock;

/// Health check body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    /// `healthy`, or `degraded` when any component is unhealthy
    pub status: String,
    pub service: String,
    pub version: String,
    pub timestamp: String,
    pub uptime_seconds: u64,
    pub components: Vec<ComponentStatus>,
}

/// One component (reference table, data provider)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ComponentStatus {
    pub name: String,
    pub healthy: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl ComponentStatus {
    pub fn healthy(name: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            healthy: true,
            detail: Some(detail.into()),
        }
    }

    pub fn degraded(name: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            healthy: false,
            detail: Some(detail.into()),
        }
    }
}

/// Component states for one service.
pub struct HealthState {
    service: String,
    started: Instant,
    components: RwLock<Vec<ComponentStatus>>,
}

impl HealthState {
    pub fn new(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
            started: Instant::now(),
            components: RwLock::new(Vec::new()),
        }
    }

    /// Insert or replace the entry for `status.name`.
    pub async fn update_component(&self, status: ComponentStatus) {
        let mut components = self.components.write().await;
        match components.iter_mut().find(|c| c.name == status.name) {
            Some(existing) => *existing = status,
            None => components.push(status),
        }
    }

    /// Snapshot for the health endpoint.
    ///
    /// A degraded component leaves the service up; it keeps serving what it can.
    pub async fn report(&self) -> HealthStatus {
        let components = self.components.read().await.clone();
        let status = if components.iter().all(|c| c.healthy) {
            "healthy"
        } else {
            "degraded"
        };

        HealthStatus {
            status: status.to_string(),
            service: self.service.clone(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            timestamp: Utc::now().to_rfc3339(),
            uptime_seconds: self.started.elapsed().as_secs(),
            components,
        }
    }
}
