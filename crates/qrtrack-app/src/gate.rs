use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use qrtrack_core::Analyzer;
use tokio::sync::Notify;

/// Single-slot permit modelling `setAnalyzeImage`.
///
/// The analyzer takes the slot before delivering a result; it only reopens when the
/// scan loop calls `set_analyze_image(true)`, so at most one result is in flight.
pub struct AnalyzeGate {
    enabled: AtomicBool,
    notify: Notify,
}

impl AnalyzeGate {
    pub fn new() -> Self {
        Self {
            enabled: AtomicBool::new(false),
            notify: Notify::new(),
        }
    }

    pub fn set(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::SeqCst);
        if enabled {
            self.notify.notify_one();
        }
    }

    pub fn is_open(&self) -> bool {
        self.enabled.load(Ordering::SeqCst)
    }

    /// Wait until analysis is enabled, then close the gate behind us
    pub async fn acquire(&self) {
        loop {
            if self.enabled.swap(false, Ordering::SeqCst) {
                return;
            }
            // notify_one leaves a permit behind if nobody is waiting yet
            self.notify.notified().await;
        }
    }
}

impl Default for AnalyzeGate {
    fn default() -> Self {
        Self::new()
    }
}

/// The scan loop's view of the analyzer
pub struct GateHandle(Arc<AnalyzeGate>);

impl GateHandle {
    pub fn new(gate: Arc<AnalyzeGate>) -> Self {
        Self(gate)
    }
}

impl Analyzer for GateHandle {
    fn set_analyze_image(&mut self, enabled: bool) {
        tracing::trace!("set_analyze_image({})", enabled);
        self.0.set(enabled);
    }
}
