use sample_order::SampleOrchestrator;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<SampleOrchestrator>,
}

impl AppState {
    pub fn new(orchestrator: SampleOrchestrator) -> Self {
        Self { orchestrator: Arc::new(orchestrator) }
    }
}
