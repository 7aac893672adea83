use crate::config::Config;
use crate::provider::StoreProvider;
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub provider: StoreProvider,
    pub config: Arc<Config>,
}
