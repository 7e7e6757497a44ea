// Shared request state. Configuration is read once at startup and stays
// read-only for the process lifetime.
use crate::config::Config;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self { config }
    }
}
