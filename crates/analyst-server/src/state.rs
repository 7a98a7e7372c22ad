//! Application State

use std::sync::Arc;

use analyst_core::Analyst;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Analysis client wrapping the configured provider
    pub analyst: Arc<Analyst>,
}

impl AppState {
    pub fn new(analyst: Analyst) -> Self {
        Self {
            analyst: Arc::new(analyst),
        }
    }
}
