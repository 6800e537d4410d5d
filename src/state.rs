use std::sync::Arc;
use std::time::Instant;

use crate::config::{AnalysisConfig, Config};
use crate::store::Store;

#[derive(Clone)]
pub struct AppState {
    store: Arc<Store>,
    analysis: AnalysisConfig,
    started_at: Instant,
}

impl AppState {
    pub fn new(store: Arc<Store>, config: &Config) -> Self {
        Self {
            store,
            analysis: config.analysis.clone(),
            started_at: Instant::now(),
        }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Owned handle for work moved onto the blocking pool.
    pub fn store_handle(&self) -> Arc<Store> {
        self.store.clone()
    }

    pub fn analysis(&self) -> &AnalysisConfig {
        &self.analysis
    }

    pub fn uptime_secs(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}
