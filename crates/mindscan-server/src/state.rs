use std::sync::Arc;

use tokio::sync::Mutex;

use mindscan_instruments::InstrumentRegistry;
use mindscan_storage::AssessmentStore;

/// Shared application state, injected into all route handlers via Axum state.
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<InstrumentRegistry>,
    pub store: Arc<Mutex<AssessmentStore>>,
    /// How long stored assessments are kept. `None` keeps them indefinitely.
    pub retention: Option<jiff::SignedDuration>,
}

impl AppState {
    pub fn new(registry: InstrumentRegistry, store: AssessmentStore, retention: Option<jiff::SignedDuration>) -> Self {
        Self {
            registry: Arc::new(registry),
            store: Arc::new(Mutex::new(store)),
            retention,
        }
    }
}
