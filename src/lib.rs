pub mod api;
pub mod config;
pub mod error;
pub mod logging;
pub mod relay;
pub mod site;
pub mod validation;

use std::sync::Arc;

use config::Config;
use relay::{Relay, SuggestionSource};

/// Application state that will be shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub relay: Arc<dyn SuggestionSource>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let relay = Arc::new(Relay::new(&config));
        Self::with_source(config, relay)
    }

    pub fn with_source(config: Config, relay: Arc<dyn SuggestionSource>) -> Self {
        AppState {
            config: Arc::new(config),
            relay,
        }
    }
}
