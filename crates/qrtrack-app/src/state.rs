use std::sync::Arc;

use qrtrack_config::Config;
use tokio::sync::RwLock;

use crate::gate::AnalyzeGate;

pub struct AppState {
    pub config: Arc<RwLock<Config>>,
    pub gate: Arc<AnalyzeGate>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            config: Arc::new(RwLock::new(config)),
            gate: Arc::new(AnalyzeGate::new()),
        }
    }
}
