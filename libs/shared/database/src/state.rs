use std::sync::Arc;

use shared_config::AppConfig;

use crate::store::ClinicStore;

/// Router state handed to every cell: configuration plus the injected store.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub store: Arc<dyn ClinicStore>,
}

impl AppState {
    pub fn new(config: AppConfig, store: Arc<dyn ClinicStore>) -> Self {
        Self {
            config: Arc::new(config),
            store,
        }
    }
}
