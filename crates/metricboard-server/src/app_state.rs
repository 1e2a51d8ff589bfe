//! Shared application state for the metricboard server.
//!
//! Built once at startup from a validated config and cloned into every
//! handler. The store lives here for the whole process and goes away with it.

use std::sync::Arc;
use std::time::Instant;

use metricboard_core::error::Result;
use metricboard_core::{aggregate, Averages, Store, UnitRegistry};

use crate::config::ServerConfig;
use crate::obs::metrics::ServerMetrics;

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    cfg: ServerConfig,
    store: Store,
    units: UnitRegistry,
    metrics: ServerMetrics,
}

impl AppState {
    /// Build application state.
    /// Returns Result so main can handle errors gracefully (no panic).
    pub fn new(cfg: ServerConfig) -> Result<Self> {
        cfg.validate()?;

        let store = Store::new(cfg.registration.name_policy);
        tracing::info!(name_policy = ?store.name_policy(), "store ready");
        let units = cfg.unit_registry();
        if !units.is_empty() {
            tracing::info!(overrides = units.len(), "explicit metric units configured");
        }

        Ok(Self {
            inner: Arc::new(AppStateInner {
                cfg,
                store,
                units,
                metrics: ServerMetrics::default(),
            }),
        })
    }

    pub fn cfg(&self) -> &ServerConfig {
        &self.inner.cfg
    }

    pub fn store(&self) -> &Store {
        &self.inner.store
    }

    pub fn units(&self) -> &UnitRegistry {
        &self.inner.units
    }

    pub fn metrics(&self) -> &ServerMetrics {
        &self.inner.metrics
    }

    /// Compute current averages and record how long it took.
    pub fn averages(&self) -> Averages {
        let started = Instant::now();
        let out = aggregate(self.store(), self.units());
        self.metrics()
            .aggregate_duration
            .observe(&[], started.elapsed());
        out
    }

    /// Gauge lines appended to `/metrics`.
    pub fn metrics_extra(&self) -> Vec<(&'static str, u64)> {
        vec![
            ("metricboard_users", self.store().user_count() as u64),
            ("metricboard_samples", self.store().sample_count() as u64),
        ]
    }
}
