use std::sync::Arc;

use service::LodeService;

/// Shared, read-only handler state.
#[derive(Clone)]
pub struct AppState {
    pub lode: Arc<LodeService>,
}

impl AppState {
    pub fn new(lode: LodeService) -> Self {
        Self { lode: Arc::new(lode) }
    }
}
